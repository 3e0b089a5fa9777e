//! Selector parsing and matching.
//!
//! A small subset of [Selectors Level 4](https://www.w3.org/TR/selectors-4/):
//! type, `#id`, `.class`, `*` and `[attr]`/`[attr=value]` simple selectors,
//! combined into compounds and chained with the descendant (whitespace) and
//! child (`>`) combinators.
//!
//! Matching runs top-down from a scope node, so a query only ever sees the
//! scope and its descendants.

use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;

use wombat_dom::{DomTree, ElementData, NodeId};

/// A single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Compared against the tag name exactly, case included.
    ///
    /// Examples: `div`, `p`, `h1`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Matches when the `class` attribute, split on single spaces, has an
    /// entry equal to this name.
    ///
    /// Examples: `.highlight`, `.nav-item`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Examples: `#main`, `#nav-bar`
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    ///
    /// Matches any element. Example: `*`
    Universal,

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Examples: `[href]`, `[type=text]`, `[title="a b"]`
    Attribute(AttributeSelector),
}

/// The two attribute tests that are supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`: the element has the attribute, with any value.
    Exists(String),

    /// `[attr=value]`: the first attribute named `attr` has exactly this
    /// value. Quotes around the value in the selector are not part of it.
    Equals(String, String),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// Simple selectors written without a combinator between them, all of which
/// must hold for the same element. `div#a.b[k=v]` is one compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The conditions, in source order.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// Check every simple selector against `element`.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        self.simple_selectors
            .iter()
            .all(|simple| simple.matches(element))
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any depth below the previous match.
    Descendant,

    /// `>`: a direct child of the previous match.
    Child,
}

/// One compound of a selector chain, with its relationship to the compound
/// before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorStep {
    /// How this step relates to the previous step's match. For the first
    /// step the "previous match" is the query scope, and the combinator is
    /// always [`Combinator::Descendant`].
    pub combinator: Combinator,
    /// What the element at this step must look like.
    pub compound: CompoundSelector,
}

/// A parsed selector ready for matching.
///
/// Steps are stored left to right, in the order they are written:
/// `div > ul li` is `[(Descendant, div), (Child, ul), (Descendant, li)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// Never empty when produced by [`parse_selector`].
    pub steps: Vec<SelectorStep>,
}

impl ParsedSelector {
    /// Check if this is a single compound (no combinators).
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        self.steps.len() == 1
    }

    /// Match a single element without tree context.
    ///
    /// Only a simple selector can match this way; anything with a
    /// combinator needs [`select`](Self::select).
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self.steps.as_slice() {
            [only] => only.compound.matches(element),
            _ => false,
        }
    }

    /// Collect every element under (or at) `scope` that the whole chain
    /// matches, in document order and without duplicates.
    ///
    /// Work items are `(node, step)` pairs meaning "`node` is a candidate
    /// for `step`". A node matching its step passes its children on to the
    /// next step. Under a descendant combinator the children also remain
    /// candidates for the same step, whether or not the node matched.
    #[must_use]
    pub fn select(&self, tree: &DomTree, scope: NodeId) -> Vec<NodeId> {
        let Some(last) = self.steps.len().checked_sub(1) else {
            return Vec::new();
        };

        let mut matched = HashSet::new();
        let mut visited = HashSet::new();
        let mut work = vec![(scope, 0_usize)];

        while let Some((node_id, index)) = work.pop() {
            if !visited.insert((node_id, index)) {
                continue;
            }
            let Some(step) = self.steps.get(index) else {
                continue;
            };
            let children = tree.children(node_id);

            let is_match = tree
                .as_element(node_id)
                .is_some_and(|element| step.compound.matches(element));
            if is_match {
                if index == last {
                    let _ = matched.insert(node_id);
                } else {
                    work.extend(children.iter().map(|&child| (child, index + 1)));
                }
            }

            if step.combinator == Combinator::Descendant {
                work.extend(children.iter().map(|&child| (child, index)));
            }
        }

        if matched.is_empty() {
            return Vec::new();
        }
        std::iter::once(scope)
            .chain(tree.descendants(scope))
            .filter(|id| matched.contains(id))
            .collect()
    }
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Type(name) => element.tag_name == *name,
            Self::Class(class_name) => element.has_class(class_name),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Universal => true,
            Self::Attribute(AttributeSelector::Exists(name)) => {
                element.get_attribute(name).is_some()
            }
            Self::Attribute(AttributeSelector::Equals(name, value)) => {
                element.get_attribute(name) == Some(value.as_str())
            }
        }
    }
}

/// Find every element under (or at) `scope` matching `selector`.
///
/// A selector that cannot be parsed matches nothing. Use [`parse_selector`]
/// to tell an unsupported selector apart from one with no matches.
#[must_use]
pub fn query_selector(tree: &DomTree, scope: NodeId, selector: &str) -> Vec<NodeId> {
    parse_selector(selector).map_or_else(Vec::new, |parsed| parsed.select(tree, scope))
}

/// The first match of [`query_selector`] in document order.
#[must_use]
pub fn query_selector_first(tree: &DomTree, scope: NodeId, selector: &str) -> Option<NodeId> {
    query_selector(tree, scope, selector).into_iter().next()
}

/// Identifier characters for tag names, ids, classes and attribute names.
const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|ch| ch.is_whitespace()) {
        let _ = chars.next();
    }
}

/// Consume an identifier, or fail if there is none at the cursor.
fn consume_ident(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&ch) = chars.peek() {
        if !is_ident_char(ch) {
            break;
        }
        ident.push(ch);
        let _ = chars.next();
    }
    (!ident.is_empty()).then_some(ident)
}

/// Parse the inside of `[...]`; the `[` is already consumed.
fn parse_attribute_selector(chars: &mut Peekable<Chars<'_>>) -> Option<AttributeSelector> {
    skip_whitespace(chars);
    let name = consume_ident(chars)?;
    skip_whitespace(chars);

    match chars.next()? {
        ']' => Some(AttributeSelector::Exists(name)),
        '=' => {
            let value = parse_attr_value(chars)?;
            skip_whitespace(chars);
            if chars.next() != Some(']') {
                return None;
            }
            Some(AttributeSelector::Equals(name, value))
        }
        _ => None,
    }
}

/// Parse the value in `[attr=value]`, quoted with `"`/`'` or bare.
///
/// A bare value runs to the closing `]` and may contain spaces; only the
/// trailing ones are dropped.
fn parse_attr_value(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    skip_whitespace(chars);

    match chars.peek() {
        Some(&quote @ ('"' | '\'')) => {
            let _ = chars.next();
            let mut value = String::new();
            for ch in chars.by_ref() {
                if ch == quote {
                    return Some(value);
                }
                value.push(ch);
            }
            None
        }
        Some(_) => {
            let mut value = String::new();
            while let Some(&ch) = chars.peek() {
                if ch == ']' {
                    break;
                }
                value.push(ch);
                let _ = chars.next();
            }
            let value = value.trim_end();
            (!value.is_empty()).then(|| value.to_string())
        }
        None => None,
    }
}

/// Parse a raw selector string into a [`ParsedSelector`].
///
/// Supports:
/// - Type selectors: `div`, `p`, `span`
/// - Class selectors: `.class`
/// - ID selectors: `#id`
/// - Universal selector: `*`
/// - Attribute selectors: `[attr]`, `[attr=value]`, `[attr="value"]`
/// - Compound selectors: `div#id.class[k=v]`
/// - Descendant and child combinators: `div p`, `ul > li`, `ul>li`
///
/// Returns `None` for anything else, including empty input, a dangling or
/// doubled `>`, and an empty `.`/`#`/`[]`.
#[must_use]
pub fn parse_selector(raw: &str) -> Option<ParsedSelector> {
    let mut steps = Vec::new();
    let mut compound = Vec::new();
    let mut combinator = Combinator::Descendant;
    let mut chars = raw.trim().chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => compound.push(SimpleSelector::Class(consume_ident(&mut chars)?)),
            '#' => compound.push(SimpleSelector::Id(consume_ident(&mut chars)?)),
            '*' => compound.push(SimpleSelector::Universal),
            '[' => compound.push(SimpleSelector::Attribute(parse_attribute_selector(
                &mut chars,
            )?)),
            '>' => {
                if compound.is_empty() {
                    return None;
                }
                steps.push(SelectorStep {
                    combinator,
                    compound: CompoundSelector {
                        simple_selectors: std::mem::take(&mut compound),
                    },
                });
                combinator = Combinator::Child;
                skip_whitespace(&mut chars);
            }
            _ if c.is_whitespace() => {
                skip_whitespace(&mut chars);
                // `a >b` and `a > b`: the `>` arm closes the compound.
                if chars.peek() == Some(&'>') {
                    continue;
                }
                if compound.is_empty() {
                    return None;
                }
                steps.push(SelectorStep {
                    combinator,
                    compound: CompoundSelector {
                        simple_selectors: std::mem::take(&mut compound),
                    },
                });
                combinator = Combinator::Descendant;
            }
            _ if is_ident_char(c) => {
                let mut name = String::from(c);
                if let Some(rest) = consume_ident(&mut chars) {
                    name.push_str(&rest);
                }
                compound.push(SimpleSelector::Type(name));
            }
            _ => return None,
        }
    }

    if compound.is_empty() {
        return None;
    }
    steps.push(SelectorStep {
        combinator,
        compound: CompoundSelector {
            simple_selectors: compound,
        },
    });

    Some(ParsedSelector { steps })
}
