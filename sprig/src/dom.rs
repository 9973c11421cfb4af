//! Arena-based DOM.
//!
//! A [`Dom`] owns every node it ever created in one indextree arena. Nodes are
//! addressed by [`NodeId`]; parent and child links are the arena's own, so a
//! node's parent always agrees with its parent's child list.
//!
//! Detached nodes stay in the arena until the `Dom` is dropped or they are
//! [disposed](Dom::dispose), which lets callers keep handles to nodes they
//! removed and reinsert them later. This includes the children dropped by
//! [`set_text_content`](Dom::set_text_content) and the text nodes merged or
//! emptied away by [`normalize`](Dom::normalize).

use html5ever::tendril::StrTendril;
use indextree::{Arena, NodeId};

use crate::error::DomError;
use crate::node::{ElementData, Namespace, NodeData, NodeKind};
use crate::predicates::is_text_node;

/// A tree (or forest) of HTML nodes living in one arena.
#[derive(Debug, Clone)]
pub struct Dom {
    /// THE tree - all nodes live here
    pub arena: Arena<NodeData>,

    /// The document (or fragment) node the parser produced
    pub root: NodeId,

    /// DOCTYPE if present (usually "html")
    pub doctype: Option<StrTendril>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create an empty tree whose root is a `Document` node.
    pub fn new() -> Self {
        Self::with_root(NodeKind::Document)
    }

    /// Create an empty tree whose root is a `DocumentFragment` node.
    pub fn new_fragment() -> Self {
        Self::with_root(NodeKind::DocumentFragment)
    }

    fn with_root(kind: NodeKind) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::new(kind));
        Self {
            arena,
            root,
            doctype: None,
        }
    }

    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// Get mutable reference to node data
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.arena[id].get_mut()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    /// The DOM `nodeName`: `#document`, `#document-fragment`, `#text`,
    /// `#comment`, or the element's tag.
    pub fn node_name(&self, id: NodeId) -> &str {
        self.kind(id).name()
    }

    /// Tag name of an element, `None` for every other kind.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.kind(id).as_element().map(|elem| elem.tag.as_ref())
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.kind(id).as_element()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    /// Iterate children of a node
    pub fn children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].first_child()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].last_child()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].previous_sibling()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].next_sibling()
    }

    /// Position of `id` in its parent's child list.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        self.parent(id)?;
        Some(id.preceding_siblings(&self.arena).count() - 1)
    }

    /// The fragment holding a `<template>`'s contents, if any.
    pub fn template_contents(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(|elem| elem.template_contents)
    }

    /// Get the `<body>` element if present
    pub fn body(&self) -> Option<NodeId> {
        self.find_root_section("body")
    }

    /// Get the `<head>` element if present
    pub fn head(&self) -> Option<NodeId> {
        self.find_root_section("head")
    }

    fn find_root_section(&self, tag: &str) -> Option<NodeId> {
        let html = self
            .children(self.root)
            .find(|&id| self.tag_name(id) == Some("html"))?;
        self.children(html)
            .find(|&id| self.tag_name(id) == Some(tag))
    }

    pub(crate) fn ensure_container(&self, id: NodeId) -> Result<(), DomError> {
        let data = self.get(id);
        if data.is_container() {
            Ok(())
        } else {
            Err(DomError::NotAContainer {
                kind: data.kind.label(),
            })
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a fresh, unattached element with no attributes or children.
    pub fn create_element(&mut self, tag: &str, ns: Namespace) -> NodeId {
        let mut elem = ElementData::new(tag, ns);
        if ns == Namespace::Html && tag.eq_ignore_ascii_case("template") {
            elem.template_contents = Some(self.create_fragment());
        }
        self.arena.new_node(NodeData::new(NodeKind::Element(elem)))
    }

    /// Create a fresh, unattached text node.
    pub fn create_text(&mut self, value: &str) -> NodeId {
        self.arena
            .new_node(NodeData::new(NodeKind::Text(StrTendril::from(value))))
    }

    /// Create a fresh, unattached comment node.
    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.arena
            .new_node(NodeData::new(NodeKind::Comment(StrTendril::from(data))))
    }

    /// Create a fresh, empty document fragment.
    pub fn create_fragment(&mut self) -> NodeId {
        self.arena
            .new_node(NodeData::new(NodeKind::DocumentFragment))
    }

    /// Free a node and its whole subtree (template contents included).
    ///
    /// The ids become invalid; using them afterwards is a caller bug.
    pub fn dispose(&mut self, id: NodeId) {
        let templates: Vec<NodeId> = id
            .descendants(&self.arena)
            .filter_map(|n| self.template_contents(n))
            .collect();
        for fragment in templates {
            self.dispose(fragment);
        }
        id.remove_subtree(&mut self.arena);
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Index of the attribute named `name` (case-insensitive), or `None` if
    /// it is absent or `id` is not an element.
    pub fn get_attribute_index(&self, id: NodeId, name: &str) -> Option<usize> {
        self.element(id)?.attrs.index_of(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute_index(id, name).is_some()
    }

    /// Value of the attribute named `name` (case-insensitive).
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attrs.get(name)
    }

    /// Overwrite the first attribute matching `name` in place, or append a
    /// new one.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let data = self.get_mut(id);
        let label = data.kind.label();
        let elem = data
            .kind
            .as_element_mut()
            .ok_or(DomError::NotAnElement { kind: label })?;
        trace!("set_attribute {}={:?} on {:?}", name, value, id);
        elem.attrs.set(name, value);
        Ok(())
    }

    /// Remove the first attribute matching `name`. Absent attributes and
    /// non-elements are a no-op.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<StrTendril> {
        self.get_mut(id).kind.as_element_mut()?.attrs.remove(name)
    }

    // =========================================================================
    // Text content
    // =========================================================================

    /// DOM `textContent` read: a comment's data, a text node's value, or the
    /// concatenation of every descendant text node. Comments nested under
    /// the node do not contribute.
    pub fn get_text_content(&self, id: NodeId) -> StrTendril {
        match self.kind(id) {
            NodeKind::Text(text) | NodeKind::Comment(text) => text.clone(),
            _ => {
                let mut out = StrTendril::new();
                for text_id in self.node_walk_all(id, is_text_node) {
                    if let NodeKind::Text(text) = self.kind(text_id) {
                        out.push_tendril(text);
                    }
                }
                out
            }
        }
    }

    /// DOM `textContent` write. Containers lose all their children and get a
    /// single text node instead.
    pub fn set_text_content(&mut self, id: NodeId, value: &str) {
        if let NodeKind::Text(text) | NodeKind::Comment(text) = &mut self.get_mut(id).kind {
            *text = StrTendril::from(value);
            return;
        }

        let old: Vec<NodeId> = id.children(&self.arena).collect();
        for child in old {
            child.detach(&mut self.arena);
        }
        let text = self.create_text(value);
        id.append(text, &mut self.arena);
    }
}
