//! Markup serialization of a built tree.
//!
//! Output is the compact form the tokenizer reads back: no whitespace is
//! added between tags, attributes are always double-quoted, and leaf nodes
//! are written verbatim. Nothing is escaped.

use wombat_dom::{DomTree, NodeId, NodeType};

enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Serialize the subtree at `id` back into markup.
///
/// The root serializes as the concatenation of its children. An id outside
/// the tree yields an empty string.
#[must_use]
pub fn serialize(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Open(id)];

    while let Some(step) = stack.pop() {
        let node_id = match step {
            Step::Open(node_id) => node_id,
            Step::Close(node_id) => {
                if let Some(data) = tree.as_element(node_id) {
                    out.push_str("</");
                    out.push_str(&data.tag_name);
                    out.push('>');
                }
                continue;
            }
        };
        let Some(node) = tree.get(node_id) else {
            continue;
        };

        match &node.node_type {
            NodeType::Root => {}
            NodeType::Element(data) => {
                out.push('<');
                out.push_str(&data.tag_name);
                for attr in &data.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&attr.value);
                    out.push('"');
                }
                out.push('>');
                stack.push(Step::Close(node_id));
            }
            NodeType::Text(value) => out.push_str(value),
            NodeType::Comment(value) => {
                out.push_str("<!-- ");
                out.push_str(value);
                out.push_str(" -->");
            }
            NodeType::Doctype(value) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(value);
                out.push('>');
            }
        }

        stack.extend(node.children.iter().rev().map(|&child| Step::Open(child)));
    }

    out
}
