//! HTML parsing into the arena via html5ever's tree builder.
//!
//! html5ever does the HTML5 tree construction (implied elements, error
//! recovery, foreign content); the sink below only records what it is told
//! into a [`Dom`].

use std::borrow::Cow;
use std::cell::{Cell, RefCell};

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, QualName};
use indextree::{Arena, NodeId};

use crate::dom::Dom;
use crate::node::{Attributes, ElementData, Namespace, NodeData, NodeKind, SourceLocation};

/// Parse a complete HTML document.
///
/// The root is a `Document` node; `<html>`, `<head>` and `<body>` are
/// always present because the HTML5 algorithm implies them. The doctype
/// name, if any, ends up in [`Dom::doctype`].
pub fn parse_document(html: &str) -> Dom {
    let sink = ArenaSink::new();
    let tendril = StrTendril::from(html);
    html5ever::parse_document(sink, Default::default()).one(tendril)
}

/// Parse HTML as body content.
///
/// The root of the returned tree is a `DocumentFragment` holding exactly the
/// nodes the markup produced, with no implied `<html>`/`<head>`/`<body>`
/// wrappers.
pub fn parse_fragment(html: &str) -> Dom {
    let mut source = String::with_capacity(html.len() + 6);
    source.push_str("<body>");
    source.push_str(html);

    let mut dom = parse_document(&source);
    let fragment = dom.create_fragment();
    if let Some(body) = dom.body() {
        let children: Vec<NodeId> = dom.children(body).collect();
        for child in children {
            child.detach(&mut dom.arena);
            fragment.append(child, &mut dom.arena);
        }
    }

    let document = dom.root;
    dom.root = fragment;
    dom.doctype = None;
    dom.dispose(document);
    dom
}

/// Owned element name wrapper
#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &html5ever::Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink implementation that builds a [`Dom`]
struct ArenaSink {
    arena: RefCell<Arena<NodeData>>,

    /// Document node (parent of `<html>`)
    document: NodeId,

    doctype: RefCell<Option<StrTendril>>,

    /// Line of the token currently being processed
    current_line: Cell<u64>,
}

impl ArenaSink {
    fn new() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(NodeData::new(NodeKind::Document));

        ArenaSink {
            arena: RefCell::new(arena),
            document,
            doctype: RefCell::new(None),
            current_line: Cell::new(1),
        }
    }

    fn node_data(&self, kind: NodeKind) -> NodeData {
        NodeData {
            kind,
            location: Some(SourceLocation {
                line: self.current_line.get(),
            }),
        }
    }

    fn new_node(&self, kind: NodeKind) -> NodeId {
        let data = self.node_data(kind);
        self.arena.borrow_mut().new_node(data)
    }

    /// Append `text` to `target` if it is a text node.
    fn merge_text(&self, target: Option<NodeId>, text: &StrTendril) -> bool {
        let Some(target) = target else {
            return false;
        };
        match &mut self.arena.borrow_mut()[target].get_mut().kind {
            NodeKind::Text(existing) => {
                existing.push_tendril(text);
                true
            }
            _ => false,
        }
    }
}

/// `xlink:href` and friends keep their prefix so they serialize as written.
fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = Dom;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        Dom {
            arena: self.arena.into_inner(),
            root: self.document,
            doctype: self.doctype.into_inner(),
        }
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // html5ever recovers on its own; the message is only of diagnostic
        // interest.
        debug!("html parse error: {}", _msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn set_current_line(&self, line_number: u64) {
        self.current_line.set(line_number);
    }

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        let arena = self.arena.borrow();
        match arena[*target].get().kind.as_element() {
            Some(elem) => OwnedElemName(QualName::new(
                None,
                html5ever::Namespace::from(elem.ns.url()),
                LocalName::from(elem.tag.as_ref()),
            )),
            // Not an element - return placeholder
            None => OwnedElemName(QualName::new(
                None,
                html5ever::Namespace::from(Namespace::Html.url()),
                LocalName::from(""),
            )),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        let mut elem = ElementData::new(
            StrTendril::from(name.local.as_ref()),
            Namespace::from_url(name.ns.as_ref()),
        );
        elem.attrs = Attributes::collect_from(
            attrs
                .into_iter()
                .map(|attr| (attribute_name(&attr.name), attr.value)),
        );
        if flags.template {
            let contents = self
                .arena
                .borrow_mut()
                .new_node(NodeData::new(NodeKind::DocumentFragment));
            elem.template_contents = Some(contents);
        }

        self.new_node(NodeKind::Element(elem))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.new_node(NodeKind::Comment(text))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        // Processing instructions - create empty comment
        self.new_node(NodeKind::Comment(StrTendril::new()))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, &mut self.arena.borrow_mut());
            }
            NodeOrText::AppendText(text) => {
                // Merge with a trailing text node, as a browser would
                let last_child = self.arena.borrow()[*parent].last_child();
                if self.merge_text(last_child, &text) {
                    return;
                }

                let text_node = self.new_node(NodeKind::Text(text));
                parent.append(text_node, &mut self.arena.borrow_mut());
            }
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        match new_node {
            NodeOrText::AppendNode(node) => {
                sibling.insert_before(node, &mut self.arena.borrow_mut());
            }
            NodeOrText::AppendText(text) => {
                let prev = self.arena.borrow()[*sibling].previous_sibling();
                if self.merge_text(prev, &text) {
                    return;
                }

                let text_node = self.new_node(NodeKind::Text(text));
                sibling.insert_before(text_node, &mut self.arena.borrow_mut());
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.arena.borrow()[*element].parent().is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        *self.doctype.borrow_mut() = Some(name);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        self.arena.borrow()[*target]
            .get()
            .kind
            .as_element()
            .and_then(|elem| elem.template_contents)
            .unwrap_or(*target)
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let Some(elem) = arena[*target].get_mut().kind.as_element_mut() {
            for attr in attrs {
                elem.attrs.set_if_missing(attribute_name(&attr.name), attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&arena).collect();
        for child in children {
            child.detach(&mut arena);
            new_parent.append(child, &mut arena);
        }
    }
}
