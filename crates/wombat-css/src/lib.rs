//! Structural selector queries for the Wombat document tree.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, universal and attribute (`[attr]`, `[attr=value]`)
//!     selectors
//!   - Compound selectors
//!   - Descendant and child combinators
//!
//! # Not Implemented
//!
//! - Sibling combinators, pseudo-classes and pseudo-elements
//! - Attribute operators other than `=`
//! - Specificity and the cascade

/// Selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;

pub use selector::{ParsedSelector, parse_selector, query_selector, query_selector_first};
