use core::fmt;

use serde::Serialize;
use strum_macros::{Display, EnumDiscriminants, EnumIter, IntoStaticStr};
use wombat_dom::Attribute;

/// A structural token produced by [`HTMLTokenizer`](super::HTMLTokenizer).
///
/// Tokens carry no position information and are consumed in emission order.
/// A self-closing `<x/>` never appears as its own kind: the tokenizer emits
/// `TagOpen` immediately followed by a synthetic `TagClose` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, EnumDiscriminants)]
#[serde(tag = "type")]
#[strum_discriminants(name(TokenKind))]
#[strum_discriminants(derive(Display, IntoStaticStr, Hash, EnumIter))]
pub enum Token {
    /// `<name attr="value" ...>`
    TagOpen {
        /// Maximal alphanumeric run after `<`.
        name: String,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
    },

    /// `</name>`, or the synthetic close of a self-closing tag.
    TagClose {
        /// Maximal alphanumeric run after `</`.
        name: String,
    },

    /// Character data up to the next `<`, verbatim.
    Text {
        /// The raw characters.
        value: String,
    },

    /// `<!-- value -->`
    Comment {
        /// Body with leading and trailing whitespace removed.
        value: String,
    },

    /// `<!DOCTYPE value>`
    Doctype {
        /// Letters between `<!DOCTYPE` and `>`, everything else dropped.
        value: String,
    },
}

impl Token {
    /// Create a start tag token.
    #[must_use]
    pub fn tag_open(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self::TagOpen {
            name: name.into(),
            attributes,
        }
    }

    /// Create an end tag token.
    #[must_use]
    pub fn tag_close(name: impl Into<String>) -> Self {
        Self::TagClose { name: name.into() }
    }

    /// Create a text token.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Create a comment token.
    #[must_use]
    pub fn comment(value: impl Into<String>) -> Self {
        Self::Comment {
            value: value.into(),
        }
    }

    /// Create a doctype token.
    #[must_use]
    pub fn doctype(value: impl Into<String>) -> Self {
        Self::Doctype {
            value: value.into(),
        }
    }

    /// Which of the five kinds this token is.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        TokenKind::from(self)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagOpen { name, attributes } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                write!(f, ">")
            }
            Self::TagClose { name } => write!(f, "</{name}>"),
            Self::Text { value } => write!(f, "Text({value:?})"),
            Self::Comment { value } => write!(f, "<!--{value}-->"),
            Self::Doctype { value } => write!(f, "DOCTYPE {value}"),
        }
    }
}
