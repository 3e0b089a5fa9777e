//! Common utilities for the Wombat markup parser.
//!
//! This crate provides shared infrastructure used by all parser stages:
//! - **Warning System** - colored terminal lines for lenient recoveries
//!   (unmatched end tags, malformed attributes), rendered per parse

pub mod warning;
