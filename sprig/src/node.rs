//! Node payloads stored in the arena.
//!
//! Structure (parent, children, siblings) lives in the indextree arena; this
//! module only describes what each slot carries.

use indextree::NodeId;
use html5ever::tendril::StrTendril;

/// What goes in each arena slot
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    /// Where the parser found this node. Opaque to the engine.
    pub location: Option<SourceLocation>,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// Returns true for the kinds that own a child list.
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Document | NodeKind::DocumentFragment | NodeKind::Element(_)
        )
    }
}

/// Node types
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Document root (invisible, parent of `<html>`)
    Document,
    /// Container whose children get spliced in place of itself on insertion
    DocumentFragment,
    /// Element with tag and attributes
    Element(ElementData),
    /// Text content (StrTendril is refcounted - cheap to clone)
    Text(StrTendril),
    /// HTML comment
    Comment(StrTendril),
}

impl NodeKind {
    /// The DOM `nodeName` of this kind: `#document`, `#text`, ... or the tag.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Document => "#document",
            NodeKind::DocumentFragment => "#document-fragment",
            NodeKind::Element(elem) => elem.tag.as_ref(),
            NodeKind::Text(_) => "#text",
            NodeKind::Comment(_) => "#comment",
        }
    }

    /// Static label used in error messages.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::DocumentFragment => "document fragment",
            NodeKind::Element(_) => "element",
            NodeKind::Text(_) => "text",
            NodeKind::Comment(_) => "comment",
        }
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match self {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }
}

/// Element data (tag + attributes)
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name as the parser or caller spelled it
    pub tag: StrTendril,

    pub ns: Namespace,

    /// Attributes in source order
    pub attrs: Attributes,

    /// For `<template>`: the fragment holding the template's contents.
    /// The fragment lives in the same arena but has no parent.
    pub template_contents: Option<NodeId>,
}

impl ElementData {
    pub fn new(tag: impl Into<StrTendril>, ns: Namespace) -> Self {
        Self {
            tag: tag.into(),
            ns,
            attrs: Attributes::new(),
            template_contents: None,
        }
    }
}

/// Provenance attached by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// 1-based line of the token that created the node
    pub line: u64,
}

/// XML/HTML namespace for elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
    MathMl,
}

impl Namespace {
    pub fn from_url(url: &str) -> Self {
        match url {
            "http://www.w3.org/1999/xhtml" => Namespace::Html,
            "http://www.w3.org/2000/svg" => Namespace::Svg,
            "http://www.w3.org/1998/Math/MathML" => Namespace::MathMl,
            _ => Namespace::Html, // default
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::Svg => "http://www.w3.org/2000/svg",
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
        }
    }
}

/// An ordered collection of attributes with case-insensitive names.
///
/// Names keep the case they were stored with; lookups lowercase both sides.
/// Setting a name that already exists (in any case) overwrites the value in
/// place, so a logical name never appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    /// Ordered list of (name, value) pairs
    entries: Vec<(String, StrTendril)>,
}

impl Attributes {
    /// Create a new empty attribute collection.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create from an iterator of (name, value) pairs.
    /// If a name appears multiple times, only the first is kept.
    pub fn collect_from<I, N, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<StrTendril>,
    {
        let mut attrs = Self::new();
        for (name, value) in iter {
            attrs.set_if_missing(name.into(), value.into());
        }
        attrs
    }

    /// Position of the first attribute whose name matches case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Get an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|i| self.entries[i].1.as_ref())
    }

    /// Set an attribute value. If the attribute already exists, updates its
    /// value and keeps its stored name and position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<StrTendril>) {
        let name = name.into();
        match self.index_of(&name) {
            Some(i) => self.entries[i].1 = value.into(),
            None => self.entries.push((name, value.into())),
        }
    }

    /// Set an attribute only if it doesn't already exist (first-wins semantics).
    pub fn set_if_missing(&mut self, name: String, value: StrTendril) {
        if self.index_of(&name).is_none() {
            self.entries.push((name, value));
        }
    }

    /// Remove an attribute by name. Returns the old value if it existed.
    pub fn remove(&mut self, name: &str) -> Option<StrTendril> {
        let pos = self.index_of(name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Check if an attribute exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Iterate over all attributes in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Get the number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
