//! Markup tokenizer and tree builder for Wombat.
//!
//! # Scope
//!
//! This crate implements a deliberately small subset of HTML parsing:
//! - **Tokenizer**: start, end and self-closing tags, double-quoted
//!   attributes, text, comments and doctypes. The only fatal condition is a
//!   `<!` that opens neither a doctype nor a comment.
//! - **Tree builder**: a single stack of open elements. End tags always pop
//!   the innermost element; mismatches are recorded as [`ParseIssue`]s.
//! - **Serializer**: compact markup output that the tokenizer reads back
//!   into the same tree.
//!
//! # Not Implemented
//!
//! - Character references and escaping
//! - Implied tags, void elements and insertion modes
//! - Raw text elements such as `<script>` and `<style>`

use wombat_common::warning::render_warnings;

/// Errors reported by the tokenizer.
pub mod error;
/// Tree construction from tokens.
pub mod parser;
/// Tree-to-markup serialization.
pub mod serializer;
/// Markup tokenizer.
pub mod tokenizer;

pub use error::LexicalError;
pub use parser::{HTMLParser, ParseIssue, print_tree, tree_to_string};
pub use serializer::serialize;
pub use tokenizer::{HTMLTokenizer, Token, TokenKind, TokenizerIssue};
pub use wombat_dom::{Attribute, DomTree, NodeId};

/// Tokenize `input` into a flat token stream.
///
/// # Errors
///
/// Returns a [`LexicalError`] for a malformed `<!` declaration.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexicalError> {
    HTMLTokenizer::new(input).run()
}

/// Tokenize and build a tree in one step.
///
/// # Errors
///
/// Returns a [`LexicalError`] when tokenization fails; no partial tree is
/// produced.
pub fn parse(input: &str) -> Result<DomTree, LexicalError> {
    Ok(HTMLParser::new(tokenize(input)?).run())
}

/// Everything one parse accepted leniently, from both stages.
///
/// A report belongs to a single call; nothing is remembered between parses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Recoveries made by the tokenizer, in input order.
    pub tokenizer: Vec<TokenizerIssue>,
    /// Issues tolerated by the tree builder, in token order.
    pub tree_builder: Vec<ParseIssue>,
}

impl ParseReport {
    /// True when the input needed no recovery at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokenizer.is_empty() && self.tree_builder.is_empty()
    }

    /// Total number of recorded issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokenizer.len() + self.tree_builder.len()
    }

    /// Colored warning lines, tokenizer first. Repeated messages within a
    /// stage appear once.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let mut lines = render_warnings(
            "Tokenizer",
            self.tokenizer
                .iter()
                .map(|issue| format!("{} at offset {}", issue.message, issue.offset)),
        );
        lines.extend(render_warnings(
            "Tree Builder",
            self.tree_builder.iter().map(|issue| issue.message.as_str()),
        ));
        lines
    }

    /// Print [`render`](Self::render) to stderr.
    pub fn print(&self) {
        for line in self.render() {
            eprintln!("{line}");
        }
    }
}

/// Like [`parse`], also returning what both stages tolerated.
///
/// # Errors
///
/// Returns a [`LexicalError`] when tokenization fails.
pub fn parse_with_issues(input: &str) -> Result<(DomTree, ParseReport), LexicalError> {
    let (tokens, tokenizer) = HTMLTokenizer::new(input).run_with_issues()?;
    let (tree, tree_builder) = HTMLParser::new(tokens).run_with_issues();
    Ok((
        tree,
        ParseReport {
            tokenizer,
            tree_builder,
        },
    ))
}
