use std::fmt::Write as _;

use wombat_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::Token;

/// Something the tree builder accepted leniently.
///
/// Issues never stop tree construction; they are collected so callers who
/// want stricter guarantees (matching end tags, no unclosed elements) can
/// check them after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Human-readable description.
    pub message: String,
    /// Index into the token stream where this issue was encountered.
    /// Equal to the stream length for issues found at end of input.
    pub token_index: usize,
    /// Set for every issue when the builder runs in strict mode.
    pub is_error: bool,
}

/// Builds a [`DomTree`] from a token stream.
///
/// The builder keeps an explicit stack of open elements. The current
/// insertion node is the top of that stack, or the root when it is empty:
/// - a start tag appends a new element to the current node and pushes it
/// - an end tag pops the stack, whatever its name
/// - text and comments are appended as leaves
/// - doctypes are dropped unless [`with_doctype_nodes`](Self::with_doctype_nodes)
///   is set
pub struct HTMLParser {
    /// Stores `NodeId`s into the arena. Never contains the root.
    stack_of_open_elements: Vec<NodeId>,

    /// `NodeId::ROOT` (index 0) is the root node.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// Current position in token stream.
    token_index: usize,

    /// Parse issues encountered during building.
    issues: Vec<ParseIssue>,

    /// If true, issues are recorded as errors rather than warnings.
    strict_mode: bool,

    /// If true, doctype tokens become `NodeType::Doctype` leaves.
    keep_doctype: bool,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            stack_of_open_elements: Vec::new(),
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            issues: Vec::new(),
            strict_mode: false,
            keep_doctype: false,
        }
    }

    /// Enable strict mode: mismatched, unmatched and unclosed tags are
    /// reported as errors. The tree is built exactly as in lenient mode.
    #[must_use]
    pub const fn with_strict_mode(mut self) -> Self {
        self.strict_mode = true;
        self
    }

    /// Keep doctype declarations as leaf nodes instead of dropping them.
    #[must_use]
    pub const fn with_doctype_nodes(mut self) -> Self {
        self.keep_doctype = true;
        self
    }

    /// Run the parser and return the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the tree and any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        let token_count = tokens.len();
        for (index, token) in tokens.into_iter().enumerate() {
            self.token_index = index;
            self.process_token(token);
        }

        self.token_index = token_count;
        if let Some(&innermost) = self.stack_of_open_elements.last() {
            let open = self.stack_of_open_elements.len();
            let name = self.tag_name(innermost).to_string();
            self.parse_issue(&format!(
                "{open} element(s) left open at end of input, innermost <{name}>"
            ));
        }

        (self.tree, self.issues)
    }

    fn process_token(&mut self, token: Token) {
        match token {
            Token::TagOpen { name, attributes } => {
                let element = self
                    .tree
                    .alloc(NodeType::Element(ElementData::new(name, attributes)));
                if self.insert(element) {
                    self.stack_of_open_elements.push(element);
                }
            }
            Token::TagClose { name } => self.close_element(&name),
            Token::Text { value } => {
                let text = self.tree.alloc(NodeType::Text(value));
                let _ = self.insert(text);
            }
            Token::Comment { value } => {
                let comment = self.tree.alloc(NodeType::Comment(value));
                let _ = self.insert(comment);
            }
            Token::Doctype { value } => {
                if self.keep_doctype {
                    let doctype = self.tree.alloc(NodeType::Doctype(value));
                    let _ = self.insert(doctype);
                }
            }
        }
    }

    /// The element being populated, or the root.
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    /// Append a freshly allocated node to the current node. Returns false,
    /// leaving `node` detached, if the tree refused the append.
    fn insert(&mut self, node: NodeId) -> bool {
        let parent = self.current_node();
        self.tree.append_child(parent, node)
    }

    /// Pop the current element regardless of `name`; at the root this is a
    /// no-op.
    fn close_element(&mut self, name: &str) {
        match self.stack_of_open_elements.pop() {
            Some(closed) => {
                let open_name = self.tag_name(closed);
                if open_name != name {
                    let message = format!("end tag </{name}> closed <{open_name}>");
                    self.parse_issue(&message);
                }
            }
            None => self.parse_issue(&format!("end tag </{name}> has no open element")),
        }
    }

    fn tag_name(&self, id: NodeId) -> &str {
        self.tree
            .as_element(id)
            .map_or("", |data| data.tag_name.as_str())
    }

    fn parse_issue(&mut self, message: &str) {
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
            is_error: self.strict_mode,
        });
    }
}

/// Render the subtree at `id` as an indented outline, one node per line.
#[must_use]
pub fn tree_to_string(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    let mut stack = vec![(id, 0_usize)];
    while let Some((node_id, depth)) = stack.pop() {
        let Some(node) = tree.get(node_id) else {
            continue;
        };
        let prefix = "  ".repeat(depth);
        let _ = match &node.node_type {
            NodeType::Root => writeln!(out, "{prefix}root"),
            NodeType::Element(data) => {
                let attrs: String = data
                    .attrs
                    .iter()
                    .map(|attr| format!(" {}=\"{}\"", attr.name, attr.value))
                    .collect();
                writeln!(out, "{prefix}<{}{attrs}>", data.tag_name)
            }
            NodeType::Text(data) => {
                let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                writeln!(out, "{prefix}\"{display}\"")
            }
            NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
            NodeType::Doctype(data) => writeln!(out, "{prefix}<!DOCTYPE {data}>"),
        };
        stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
    }
    out
}

/// Print the subtree at `id` to stdout, indented by `indent` levels.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    for line in tree_to_string(tree, id).lines() {
        println!("{prefix}{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_indices_point_at_offending_token() {
        let tokens = vec![
            Token::tag_close("x"),
            Token::tag_open("a", vec![]),
            Token::tag_close("b"),
        ];
        let (_, issues) = HTMLParser::new(tokens).run_with_issues();
        let indices: Vec<_> = issues.iter().map(|i| i.token_index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert!(issues.iter().all(|i| !i.is_error));
    }

    #[test]
    fn test_unclosed_elements_reported_at_end_of_input() {
        let tokens = vec![Token::tag_open("a", vec![]), Token::tag_open("b", vec![])];
        let (_, issues) = HTMLParser::new(tokens).with_strict_mode().run_with_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].token_index, 2);
        assert!(issues[0].is_error);
        assert!(issues[0].message.contains("<b>"));
    }

    #[test]
    fn test_tree_to_string_outline() {
        let tokens = vec![
            Token::tag_open("p", vec![wombat_dom::Attribute::new("id", "x")]),
            Token::text("a b"),
            Token::tag_close("p"),
            Token::comment("c"),
        ];
        let tree = HTMLParser::new(tokens).run();
        assert_eq!(
            tree_to_string(&tree, NodeId::ROOT),
            "root\n  <p id=\"x\">\n    \"a\u{00B7}b\"\n  <!-- c -->\n"
        );
    }

    #[test]
    fn test_every_open_element_is_attached() {
        let mut parser = HTMLParser::new(Vec::new());
        for token in [
            Token::tag_open("a", vec![]),
            Token::text("t"),
            Token::tag_open("b", vec![]),
            Token::tag_close("x"),
            Token::tag_open("c", vec![]),
        ] {
            parser.process_token(token);
        }
        let open: Vec<_> = parser
            .stack_of_open_elements
            .iter()
            .map(|&id| parser.tag_name(id))
            .collect();
        assert_eq!(open, vec!["a", "c"]);
        for &id in &parser.stack_of_open_elements {
            assert!(parser.tree.parent(id).is_some());
        }
    }

    #[test]
    fn test_refused_append_leaves_stack_unchanged() {
        let mut parser = HTMLParser::new(Vec::new());
        let leaf = parser.tree.alloc(NodeType::Text("leaf".to_string()));
        assert!(parser.tree.append_child(NodeId::ROOT, leaf));
        // A text leaf cannot take children; force it to be the insertion point.
        parser.stack_of_open_elements.push(leaf);

        parser.process_token(Token::tag_open("p", vec![]));
        assert_eq!(parser.stack_of_open_elements, vec![leaf]);
        assert!(parser.tree.children(leaf).is_empty());
        let p = NodeId(parser.tree.len() - 1);
        assert_eq!(parser.tree.parent(p), None);
    }
}
