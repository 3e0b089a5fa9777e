//! Helper functions for the markup tokenizer.
//!
//! This module contains utility functions used throughout the tokenizer:
//! - Input/character handling (peek, consume, lookahead)
//! - Token emission
//! - Diagnostics for leniently accepted input

use super::scanner::{HTMLTokenizer, TokenizerIssue};
use super::token::Token;

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// Returns the character at the current position and advances the position.
    /// Returns None if we've reached the end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Peek at a codepoint at the given offset from the current position without
    /// consuming it.
    #[must_use]
    pub fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.current_pos..].chars().nth(offset)
    }

    /// Check if the next few characters match the target string exactly.
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// Check if the next few characters match the target string using
    /// ASCII case-insensitive comparison.
    #[must_use]
    pub fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input[self.current_pos..]
            .get(..target.len())
            .is_some_and(|window| window.eq_ignore_ascii_case(target))
    }

    /// Consume the given string from the input.
    /// Caller must have already verified the characters are present; only
    /// ASCII targets are used, so the cursor stays on a char boundary.
    pub(super) const fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }

    /// Consume the maximal run of characters satisfying `accept`.
    pub(super) fn consume_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let rest = &self.input[self.current_pos..];
        let len = rest.find(|c: char| !accept(c)).unwrap_or(rest.len());
        let run = rest[..len].to_string();
        self.current_pos += len;
        run
    }

    /// Whitespace between tokens is never emitted.
    pub(super) fn skip_whitespace(&mut self) {
        let rest = &self.input[self.current_pos..];
        self.current_pos += rest.len() - rest.trim_start().len();
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// Adds the token to the output stream.
    pub(super) fn emit_token(&mut self, token: Token) {
        self.token_stream.push(token);
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

impl HTMLTokenizer {
    /// Record input that was accepted leniently, at the cursor.
    pub(super) fn log_parse_error(&mut self, message: &str) {
        self.issues.push(TokenizerIssue {
            message: message.to_string(),
            offset: self.trimmed_prefix + self.current_pos,
        });
    }
}
