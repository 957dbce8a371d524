//! DOM tree implementation for rebubble.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), trimmed down to what
//! event delegation needs: parent links, element names, `id` and `class`.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues.
//! Upward walks that must stop at a delegation boundary go through
//! [`DomTree::chain_to`].

pub mod event;
pub mod fixture;

pub use event::Event;
pub use fixture::{Fixture, FixtureError};

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Write};

/// Errors from tree mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// A node id does not belong to this tree.
    #[error("{0} is not part of this tree")]
    UnknownNode(NodeId),

    /// [§ 4.2.3 Pre-insert](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    ///
    /// "If node is a host-including inclusive ancestor of parent, then throw a
    /// `HierarchyRequestError` `DOMException`."
    #[error("cannot append {child} to {parent}: {child} is an inclusive ancestor of {parent}")]
    HierarchyRequest {
        /// The node that would become the parent.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
    },
}

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data.
///
/// NOTE: Only the local name and the attribute list are stored. Namespaces
/// and custom element state are out of scope.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attrs.insert(name.into(), value.into());
        self
    }

    /// [§ 4.9 Element.id](https://dom.spec.whatwg.org/#dom-element-id)
    ///
    /// "The id attribute must reflect the "id" content attribute."
    /// A missing attribute reflects as the empty string.
    #[must_use]
    pub fn id(&self) -> &str {
        self.attrs.get("id").map_or("", String::as_str)
    }

    /// [§ 4.9 `Element.className`](https://dom.spec.whatwg.org/#dom-element-classname)
    ///
    /// The raw `class` attribute value, or the empty string when absent.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.attrs.get("class").map_or("", String::as_str)
    }

    /// Returns the set of class names from the class attribute.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.class_name().split_ascii_whitespace().collect()
    }

    /// [§ 4.4 `Node.nodeName`](https://dom.spec.whatwg.org/#dom-node-nodename)
    ///
    /// For HTML elements this is the qualified name in ASCII uppercase.
    #[must_use]
    pub fn node_name(&self) -> String {
        self.tag_name.to_ascii_uppercase()
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// All nodes live in one vector and refer to each other by index. The
/// Document node is always at index 0 ([`NodeId::ROOT`]).
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Whether `id` refers to a node of this tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        id
    }

    /// Allocate an element and append it to `parent` in one step.
    ///
    /// If `parent` is not part of the tree the element is left detached.
    pub fn create_element(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let id = self.alloc(NodeType::Element(data));
        let _ = self.append_child(parent, id);
        id
    }

    /// Allocate a text node and append it to `parent` in one step.
    ///
    /// If `parent` is not part of the tree the node is left detached.
    pub fn create_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.alloc(NodeType::Text(text.into()));
        let _ = self.append_child(parent, id);
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent`, updating all relationships.
    /// A child that is still attached elsewhere is removed from its old
    /// parent first, mirroring the DOM's adopt-on-insert behavior.
    ///
    /// # Errors
    ///
    /// - [`DomError::UnknownNode`] if either id is not in the tree.
    /// - [`DomError::HierarchyRequest`] if `child` is `parent` or one of its
    ///   ancestors. The tree is left unchanged, so parent chains stay acyclic.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        for id in [parent, child] {
            if !self.contains(id) {
                return Err(DomError::UnknownNode(id));
            }
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        let old_parent = self.nodes[child.0].parent;
        if let Some(old_parent) = old_parent {
            self.remove_child(old_parent, child);
        }

        let prev_last_child = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
        Ok(())
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detaches `child` from `parent` and stitches the sibling links back
    /// together. Does nothing if `child` is not a child of `parent`, including
    /// when either id is not in the tree.
    /// The node stays allocated and can be re-appended later.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(pos) = self
            .get(parent)
            .and_then(|n| n.children.iter().position(|&c| c == child))
        else {
            return;
        };
        let _ = self.nodes[parent.0].children.remove(pos);

        let prev = self.nodes[child.0].prev_sibling.take();
        let next = self.nodes[child.0].next_sibling.take();
        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = next;
        }
        if let Some(next_id) = next {
            self.nodes[next_id.0].prev_sibling = prev;
        }
        self.nodes[child.0].parent = None;
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

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6 Inclusive ancestor](https://dom.spec.whatwg.org/#concept-tree-inclusive-ancestor)
    ///
    /// "An inclusive ancestor is an object or one of its ancestors."
    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate from `start` upward through its inclusive ancestors, stopping
    /// after `boundary` has been yielded.
    ///
    /// If `boundary` is not an inclusive ancestor of `start` the iterator
    /// runs to the document root.
    #[must_use]
    pub fn chain_to(&self, start: NodeId, boundary: NodeId) -> ChainIterator<'_> {
        ChainIterator {
            tree: self,
            current: self.contains(start).then_some(start),
            boundary,
        }
    }

    /// Pre-order iteration over the descendants of `id` (excluding `id`).
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

    /// [§ 4.4 `Node.nodeName`](https://dom.spec.whatwg.org/#dom-node-nodename)
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<String> {
        self.get(id).map(|n| match &n.node_type {
            NodeType::Document => "#document".to_string(),
            NodeType::Element(data) => data.node_name(),
            NodeType::Text(_) => "#text".to_string(),
            NodeType::Comment(_) => "#comment".to_string(),
        })
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// [§ 4.5 `Document.getElementById`](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
    ///
    /// "return the first element, in tree order, within this's descendants,
    /// whose ID is `elementId`"
    #[must_use]
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        if element_id.is_empty() {
            return None;
        }
        self.descendants(NodeId::ROOT)
            .find(|&id| self.as_element(id).is_some_and(|e| e.id() == element_id))
    }

    /// [§ 4.5 `getElementsByClassName`](https://dom.spec.whatwg.org/#concept-getelementsbyclassname)
    ///
    /// Elements, in tree order, whose class list contains every token of
    /// `class_names`.
    #[must_use]
    pub fn get_elements_by_class_name(&self, class_names: &str) -> Vec<NodeId> {
        let wanted: Vec<&str> = class_names.split_ascii_whitespace().collect();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.descendants(NodeId::ROOT)
            .filter(|&id| {
                self.as_element(id).is_some_and(|e| {
                    let classes = e.classes();
                    wanted.iter().all(|c| classes.contains(c))
                })
            })
            .collect()
    }

    /// [§ 4.5 `getElementsByTagName`](https://dom.spec.whatwg.org/#concept-getelementsbyqualifiedname)
    ///
    /// Elements, in tree order, whose tag name matches ASCII case-insensitively.
    #[must_use]
    pub fn get_elements_by_tag_name(&self, tag_name: &str) -> Vec<NodeId> {
        self.descendants(NodeId::ROOT)
            .filter(|&id| {
                self.as_element(id)
                    .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(tag_name))
            })
            .collect()
    }

    /// Short, selector-like description of a node: `div#content.blog-title`,
    /// `#text "hello"`, `#document`.
    #[must_use]
    pub fn describe(&self, id: NodeId) -> String {
        match self.get(id).map(|n| &n.node_type) {
            None => format!("<unknown {id}>"),
            Some(NodeType::Document) => "#document".to_string(),
            Some(NodeType::Element(data)) => {
                let mut out = data.tag_name.to_ascii_lowercase();
                if !data.id().is_empty() {
                    out.push('#');
                    out.push_str(data.id());
                }
                for class in data.class_name().split_ascii_whitespace() {
                    out.push('.');
                    out.push_str(class);
                }
                out
            }
            Some(NodeType::Text(text)) => format!("#text {:?}", text.trim()),
            Some(NodeType::Comment(text)) => format!("#comment {:?}", text.trim()),
        }
    }

    /// Render the subtree rooted at `id` as an indented outline, one node per line.
    ///
    /// This is what `print_tree` writes to stdout.
    #[must_use]
    pub fn render_tree(&self, id: NodeId) -> String {
        fn walk(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
            let _ = writeln!(out, "{}{}", "  ".repeat(depth), tree.describe(id));
            for &child in tree.children(id) {
                walk(tree, child, depth + 1, out);
            }
        }

        let mut out = String::new();
        walk(self, id, 0, &mut out);
        out
    }

    /// Print the subtree rooted at `id` to stdout, as rendered by
    /// [`DomTree::render_tree`].
    pub fn print_tree(&self, id: NodeId) {
        print!("{}", self.render_tree(id));
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
#[derive(Debug)]
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

/// Iterator over a node and its ancestors, bounded (inclusively) by a
/// boundary node. Created by [`DomTree::chain_to`].
#[derive(Debug, Clone)]
pub struct ChainIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
    boundary: NodeId,
}

impl Iterator for ChainIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = if id == self.boundary {
            None
        } else {
            self.tree.parent(id)
        };
        Some(id)
    }
}

/// Pre-order iterator over descendants of a node.
#[derive(Debug)]
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
