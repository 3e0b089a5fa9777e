//! Document tree implementation for the Wombat markup parser.
//!
//! This crate provides an arena-based tree of markup nodes: the single
//! [`NodeType::Root`], elements, text, comments and (optionally retained)
//! doctypes.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Every
//! node is owned by the arena; parents and children are stored as indices,
//! and a node's parent is set exactly once, when it is appended.

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use strum_macros::{Display, EnumDiscriminants, EnumIter, IntoStaticStr};

/// A name/value pair on an element.
///
/// Attribute names are not required to be unique within one element; lookups
/// by name return the first match in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Run of alphanumerics and hyphens.
    pub name: String,
    /// Text between the double quotes, or empty.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A type-safe index into the document tree.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// One unit of the tree: its payload plus its position.
#[derive(Debug, Clone)]
pub struct Node {
    /// What this node is.
    pub node_type: NodeType,

    /// The node this one was appended to. `None` for the root and for
    /// allocated-but-detached nodes.
    pub parent: Option<NodeId>,

    /// Children in document order. Always empty for leaves.
    pub children: Vec<NodeId>,
}

/// The payload of a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(NodeKind))]
#[strum_discriminants(derive(Display, IntoStaticStr, Hash, EnumIter))]
pub enum NodeType {
    /// The sole entry point of a parsed document. Its name is `"root"`.
    Root,
    /// A tag with attributes and children.
    Element(ElementData),
    /// Verbatim character data, no entity decoding.
    Text(String),
    /// The text between `<!--` and `-->`.
    Comment(String),
    /// A retained `<!DOCTYPE ...>` declaration (letters only).
    Doctype(String),
}

impl NodeType {
    /// Text, comment and doctype nodes never have children or attributes.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Comment(_) | Self::Doctype(_))
    }
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// The tag name, exactly as written.
    pub tag_name: String,
    /// Attributes in source order, duplicates preserved.
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// Create element data from a tag name and its attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, attrs: Vec<Attribute>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs,
        }
    }

    /// Value of the first attribute called `name`, if any.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// Class names from the class attribute, split on single spaces.
    ///
    /// Consecutive spaces produce empty entries, which never equal a real
    /// class name.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attribute("class")
            .into_iter()
            .flat_map(|list| list.split(' '))
    }

    /// Whether `class_name` is an exact member of the class list.
    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes().any(|c| c == class_name)
    }
}

/// Arena-based document tree with O(1) node access and traversal.
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. This provides:
/// - O(1) access to any node by `NodeId`
/// - O(1) parent traversal
/// - No borrowing issues (indices instead of references)
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The root node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the root node.
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            node_type: NodeType::Root,
            parent: None,
            children: Vec::new(),
        };
        Self { nodes: vec![root] }
    }

    /// Get the root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the tree, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is allocated on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// A node's parent is set once. Appending a node that already has a
    /// parent, appending to a leaf, appending a node below itself, or using
    /// an id from outside the arena is ignored and reported as `false`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let attachable = parent != child
            && child != NodeId::ROOT
            && self.get(parent).is_some_and(|p| !p.node_type.is_leaf())
            && self.get(child).is_some_and(|c| c.parent.is_none())
            && (self.children(child).is_empty() || !self.is_descendant_of(parent, child));
        if !attachable {
            return false;
        }

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        true
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over every node below `id` in document (pre-)order.
    ///
    /// Uses an explicit stack, so arbitrarily deep trees are safe to walk.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Get the comment body if this node is a comment.
    #[must_use]
    pub fn as_comment(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Comment(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// The node's kind, if the id is valid.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(|n| NodeKind::from(&n.node_type))
    }

    /// The node's name: `"root"` for the root, the tag name for elements,
    /// and `#text`, `#comment` or `#doctype` for leaves.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| match &n.node_type {
            NodeType::Root => "root",
            NodeType::Element(data) => data.tag_name.as_str(),
            NodeType::Text(_) => "#text",
            NodeType::Comment(_) => "#comment",
            NodeType::Doctype(_) => "#doctype",
        })
    }

    /// Value of the first attribute called `name` on an element.
    ///
    /// Returns `None` for non-elements and for missing attributes.
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id)?.get_attribute(name)
    }

    /// Concatenated text of every text node at or below `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.as_text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.as_text(d))
            .collect()
    }

    /// The first element child of the root, typically `<html>`.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// A nested, serde-serializable view of the subtree rooted at `id`.
    #[must_use]
    pub const fn serializable(&self, id: NodeId) -> SerializableNode<'_> {
        SerializableNode { tree: self, id }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Borrowed view of a subtree that serializes as nested objects:
/// `{"type": "element", "name": ..., "attributes": [...], "children": [...]}`,
/// `{"type": "text", "value": ...}` and so on.
#[derive(Clone, Copy)]
pub struct SerializableNode<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl SerializableNode<'_> {
    fn children(&self) -> Vec<Self> {
        self.tree
            .children(self.id)
            .iter()
            .map(|&id| Self {
                tree: self.tree,
                id,
            })
            .collect()
    }
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(node) = self.tree.get(self.id) else {
            return serializer.serialize_none();
        };
        match &node.node_type {
            NodeType::Root => {
                let mut s = serializer.serialize_struct("Node", 2)?;
                s.serialize_field("type", "root")?;
                s.serialize_field("children", &self.children())?;
                s.end()
            }
            NodeType::Element(data) => {
                let mut s = serializer.serialize_struct("Node", 4)?;
                s.serialize_field("type", "element")?;
                s.serialize_field("name", &data.tag_name)?;
                s.serialize_field("attributes", &data.attrs)?;
                s.serialize_field("children", &self.children())?;
                s.end()
            }
            NodeType::Text(value) => serialize_leaf(serializer, "text", value),
            NodeType::Comment(value) => serialize_leaf(serializer, "comment", value),
            NodeType::Doctype(value) => serialize_leaf(serializer, "doctype", value),
        }
    }
}

fn serialize_leaf<S: Serializer>(serializer: S, kind: &str, value: &str) -> Result<S::Ok, S::Error> {
    let mut s = serializer.serialize_struct("Node", 2)?;
    s.serialize_field("type", kind)?;
    s.serialize_field("value", value)?;
    s.end()
}
