//! The single-pass markup scanner.
//!
//! [`HTMLTokenizer`] walks its input once with a byte cursor and emits
//! [`Token`]s. Malformed but recoverable input is recorded as a
//! [`TokenizerIssue`] on the scanner itself, so every run reports only what
//! it saw.

use wombat_dom::Attribute;

use super::token::Token;
use crate::error::LexicalError;

/// Number of characters after `<!` quoted back in a [`LexicalError`].
const DECLARATION_CONTEXT_CHARS: usize = 8;

/// Something the tokenizer accepted leniently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerIssue {
    /// Human-readable description.
    pub message: String,
    /// Byte offset into the caller's untrimmed input.
    pub offset: usize,
}

/// Single-pass scanner that turns markup text into [`Token`]s.
///
/// The scanner owns a forward-only cursor over its (trimmed) input and never
/// backtracks. It is consumed by [`run`](Self::run), so a fresh instance is
/// needed to scan again.
///
/// Dispatch at each cursor position, highest priority first:
/// 1. whitespace between tokens is skipped, never emitted
/// 2. `<!` starts a doctype or a comment; anything else there is fatal
/// 3. `</` starts an end tag
/// 4. `<` starts a start tag, with `/>` expanding to open + close
/// 5. anything else is text up to the next `<`
pub struct HTMLTokenizer {
    /// The caller's input with leading and trailing whitespace removed.
    pub(super) input: String,
    /// Bytes trimmed from the front, to report offsets against the original.
    pub(super) trimmed_prefix: usize,
    /// Byte position of the cursor in `input`.
    pub(super) current_pos: usize,
    pub(super) token_stream: Vec<Token>,
    /// Recoveries made during this run.
    pub(super) issues: Vec<TokenizerIssue>,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// The input is trimmed once, here; offsets in errors still refer to the
    /// untrimmed text.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let trimmed_prefix = input.len() - input.trim_start().len();
        Self {
            input: input.trim().to_string(),
            trimmed_prefix,
            current_pos: 0,
            token_stream: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Scan the whole input and return the token stream.
    ///
    /// # Errors
    ///
    /// Returns [`LexicalError::MalformedDeclaration`] for a `<!` that is
    /// neither a doctype nor a comment. No partial token list is returned.
    pub fn run(self) -> Result<Vec<Token>, LexicalError> {
        Ok(self.run_with_issues()?.0)
    }

    /// Scan the whole input and return the token stream together with the
    /// recoveries made along the way.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_with_issues(mut self) -> Result<(Vec<Token>, Vec<TokenizerIssue>), LexicalError> {
        loop {
            self.skip_whitespace();
            match self.peek_codepoint(0) {
                None => break,
                Some('<') => self.consume_markup()?,
                Some(_) => self.consume_text(),
            }
        }
        Ok((self.token_stream, self.issues))
    }

    /// Cursor is on a `<`.
    fn consume_markup(&mut self) -> Result<(), LexicalError> {
        match self.peek_codepoint(1) {
            Some('!') => self.consume_declaration(),
            Some('/') => {
                self.consume_end_tag();
                Ok(())
            }
            _ => {
                self.consume_start_tag();
                Ok(())
            }
        }
    }

    /// `<!DOCTYPE ...>` or `<!-- ... -->`.
    fn consume_declaration(&mut self) -> Result<(), LexicalError> {
        let start = self.current_pos;
        self.consume_string("<!");

        if self.next_few_characters_are_case_insensitive("DOCTYPE") {
            self.consume_string("DOCTYPE");
            self.consume_doctype();
            return Ok(());
        }

        if self.next_few_characters_are("--") {
            self.consume_string("--");
            self.consume_comment();
            return Ok(());
        }

        Err(LexicalError::MalformedDeclaration {
            offset: self.trimmed_prefix + start,
            found: self.input[self.current_pos..]
                .chars()
                .take(DECLARATION_CONTEXT_CHARS)
                .collect(),
        })
    }

    /// Cursor is just past `<!DOCTYPE`. Keeps letters only, up to `>`.
    fn consume_doctype(&mut self) {
        let mut value = String::new();
        let mut closed = false;
        while let Some(c) = self.consume() {
            if c == '>' {
                closed = true;
                break;
            }
            if c.is_alphabetic() {
                value.push(c);
            }
        }
        if !closed {
            self.log_parse_error("unterminated DOCTYPE");
        }
        self.emit_token(Token::Doctype { value });
    }

    /// Cursor is just past `<!--`. The body runs to the first `-->`, or to
    /// the end of input when there is none.
    fn consume_comment(&mut self) {
        let rest = &self.input[self.current_pos..];
        let (body_len, skip) = rest.find("-->").map_or_else(
            || (rest.len(), rest.len()),
            |end| (end, end + "-->".len()),
        );
        let value = rest[..body_len].trim().to_string();
        if skip == body_len {
            self.log_parse_error("unterminated comment");
        }
        self.current_pos += skip;
        self.emit_token(Token::Comment { value });
    }

    /// `</name>`
    fn consume_end_tag(&mut self) {
        self.consume_string("</");
        let name = self.consume_tag_name();
        self.skip_past_tag_end();
        self.emit_token(Token::TagClose { name });
    }

    /// `<name attrs>` or `<name attrs/>`
    fn consume_start_tag(&mut self) {
        self.consume_string("<");
        let name = self.consume_tag_name();
        let attributes = self.consume_attributes();

        if self.next_few_characters_are("/>") {
            self.consume_string("/>");
            // Self-closing: the pair is emitted as one unit so the tree
            // builder never sees a flag.
            self.emit_token(Token::TagOpen {
                name: name.clone(),
                attributes,
            });
            self.emit_token(Token::TagClose { name });
            return;
        }

        self.skip_past_tag_end();
        self.emit_token(Token::TagOpen { name, attributes });
    }

    fn consume_tag_name(&mut self) -> String {
        self.consume_while(|c| c.is_ascii_alphanumeric())
    }

    /// Attributes until `>`, `/`, a stray `<`, or end of input.
    fn consume_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek_codepoint(0) {
                None | Some('>' | '/' | '<') => break,
                Some(_) => {
                    if let Some(attribute) = self.consume_attribute() {
                        attributes.push(attribute);
                    }
                }
            }
        }
        attributes
    }

    /// `name="value"`, `name=`, or a bare `name`.
    ///
    /// A missing `=` leaves the value empty; a character that can neither
    /// start a name nor be `=` is dropped so the cursor always advances.
    fn consume_attribute(&mut self) -> Option<Attribute> {
        let name = self.consume_while(|c| c.is_ascii_alphanumeric() || c == '-');

        if self.peek_codepoint(0) == Some('=') {
            let _ = self.consume();
        } else if name.is_empty() {
            if let Some(c) = self.consume() {
                self.log_parse_error(&format!("unexpected {c:?} in attribute list"));
            }
            return None;
        } else {
            self.log_parse_error(&format!("missing '=' after attribute {name:?}"));
        }

        let value = if self.peek_codepoint(0) == Some('"') {
            self.consume_quoted_attribute_value()
        } else {
            String::new()
        };
        Some(Attribute { name, value })
    }

    /// Cursor is on the opening `"`. A missing closing quote runs the value
    /// to the end of input.
    fn consume_quoted_attribute_value(&mut self) -> String {
        self.consume_string("\"");
        let rest = &self.input[self.current_pos..];
        if let Some(end) = rest.find('"') {
            let value = rest[..end].to_string();
            self.current_pos += end + 1;
            value
        } else {
            let value = rest.to_string();
            self.current_pos = self.input.len();
            self.log_parse_error("unterminated attribute value");
            value
        }
    }

    /// Step over the `>` closing a tag. When something else is there, skip
    /// to just past the next `>`, stopping early at a `<` so the next tag
    /// survives.
    fn skip_past_tag_end(&mut self) {
        if self.peek_codepoint(0) == Some('>') {
            let _ = self.consume();
            return;
        }
        self.log_parse_error("tag not closed by '>'");
        while let Some(c) = self.peek_codepoint(0) {
            if c == '<' {
                break;
            }
            let _ = self.consume();
            if c == '>' {
                break;
            }
        }
    }

    /// Everything up to, not including, the next `<`.
    fn consume_text(&mut self) {
        let rest = &self.input[self.current_pos..];
        let len = rest.find('<').unwrap_or(rest.len());
        let value = rest[..len].to_string();
        self.current_pos += len;
        self.emit_token(Token::Text { value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        HTMLTokenizer::new(input).run().unwrap()
    }

    #[test]
    fn test_cursor_never_stalls_on_junk_in_attribute_list() {
        // Quotes and `?` are dropped one at a time; `x` becomes a bare name.
        let tokens = tokens("<a 'x' ?? b=\"1\">t</a>");
        assert_eq!(
            tokens[0],
            Token::tag_open("a", vec![Attribute::new("x", ""), Attribute::new("b", "1")])
        );
        assert_eq!(tokens[1], Token::text("t"));
    }

    #[test]
    fn test_stray_less_than_in_tag_does_not_swallow_next_tag() {
        let tokens = tokens("<a <b>");
        assert_eq!(
            tokens,
            vec![Token::tag_open("a", vec![]), Token::tag_open("b", vec![])]
        );
    }

    #[test]
    fn test_error_context_is_bounded() {
        let err = HTMLTokenizer::new("<![CDATA[ long section ]]>").run().unwrap_err();
        assert_eq!(
            err,
            LexicalError::MalformedDeclaration {
                offset: 0,
                found: "[CDATA[ ".to_string(),
            }
        );
    }

    #[test]
    fn test_recoveries_are_reported_per_run() {
        let (tokens, issues) = HTMLTokenizer::new("  <a b>").run_with_issues().unwrap();
        assert_eq!(tokens, vec![Token::tag_open("a", vec![Attribute::new("b", "")])]);
        assert_eq!(
            issues,
            vec![TokenizerIssue {
                message: "missing '=' after attribute \"b\"".to_string(),
                offset: 6,
            }]
        );

        // A second scan of the same input reports the same recovery again.
        let (_, again) = HTMLTokenizer::new("  <a b>").run_with_issues().unwrap();
        assert_eq!(again, issues);
    }

    #[test]
    fn test_well_formed_input_has_no_recoveries() {
        let (_, issues) = HTMLTokenizer::new("<p a=\"1\">t<!--c--></p>")
            .run_with_issues()
            .unwrap();
        assert!(issues.is_empty());
    }
}
