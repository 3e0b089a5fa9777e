//! Tree construction from a token stream.

/// Stack-of-open-elements tree builder.
pub mod builder;

pub use builder::{HTMLParser, ParseIssue, print_tree, tree_to_string};
