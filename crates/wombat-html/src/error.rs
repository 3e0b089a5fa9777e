//! Fatal tokenizer errors.

use thiserror::Error;

/// The only failure the pipeline can produce.
///
/// Everything else (missing `=`, unterminated quotes, stray end tags) is
/// handled leniently and never surfaces as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexicalError {
    /// A `<!` that starts neither `<!DOCTYPE` (any case) nor `<!--`.
    #[error(
        "malformed markup declaration at byte offset {offset}: expected `<!DOCTYPE` or `<!--`, found `<!{found}`"
    )]
    MalformedDeclaration {
        /// Byte offset of the `<` in the caller's original input.
        offset: usize,
        /// Up to eight characters following the `<!`.
        found: String,
    },
}

impl LexicalError {
    /// Byte offset of the offending construct in the original input.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::MalformedDeclaration { offset, .. } => *offset,
        }
    }
}
