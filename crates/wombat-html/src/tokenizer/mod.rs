//! Markup tokenizer module.
//!
//! Turns raw text into the five [`Token`] kinds with a single forward-only
//! cursor. The only fatal condition is a `<!` that is neither a doctype nor a
//! comment.

/// Helper methods for cursor movement and token emission.
pub mod helpers;
/// The scanner itself.
pub mod scanner;
/// Token types produced by the tokenizer.
pub mod token;

pub use scanner::{HTMLTokenizer, TokenizerIssue};
pub use token::{Token, TokenKind};
