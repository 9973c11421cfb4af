//! Node predicates and their combinators.
//!
//! A predicate is anything implementing [`Predicate`], which every
//! `Fn(&Dom, NodeId) -> bool` does. The kind checks are plain functions and
//! can be passed directly (`dom.node_walk(root, is_element)`); the
//! parameterized ones return closures.
//!
//! ```
//! use sprig::predicates::{has_class, has_tag_name, is_text_node, not};
//! use sprig::{and, parse_fragment};
//!
//! let dom = parse_fragment(r#"<ul><li class="a b">x</li><li class="c">y</li></ul>"#);
//! let li = dom.query(dom.root, and!(has_tag_name("LI"), has_class("b"))).unwrap();
//! assert_eq!(dom.get_attribute(li, "class"), Some("a b"));
//!
//! let non_text = dom.node_walk_all(li, not(is_text_node));
//! assert_eq!(non_text, vec![li]);
//! ```

use indextree::NodeId;

use crate::dom::Dom;
use crate::node::NodeKind;

/// A pure boolean test over a single node.
pub trait Predicate {
    fn matches(&self, dom: &Dom, node: NodeId) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&Dom, NodeId) -> bool,
{
    fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        self(dom, node)
    }
}

/// Type-erased predicate, used for the variadic combinators.
pub type BoxedPredicate = Box<dyn Fn(&Dom, NodeId) -> bool>;

/// Erase a predicate's type so it can sit in a list with others.
pub fn boxed<P>(predicate: P) -> BoxedPredicate
where
    P: Predicate + 'static,
{
    Box::new(move |dom: &Dom, node: NodeId| predicate.matches(dom, node))
}

// =============================================================================
// Kind checks
// =============================================================================

pub fn is_document(dom: &Dom, node: NodeId) -> bool {
    matches!(dom.kind(node), NodeKind::Document)
}

pub fn is_document_fragment(dom: &Dom, node: NodeId) -> bool {
    matches!(dom.kind(node), NodeKind::DocumentFragment)
}

pub fn is_element(dom: &Dom, node: NodeId) -> bool {
    matches!(dom.kind(node), NodeKind::Element(_))
}

pub fn is_text_node(dom: &Dom, node: NodeId) -> bool {
    matches!(dom.kind(node), NodeKind::Text(_))
}

pub fn is_comment_node(dom: &Dom, node: NodeId) -> bool {
    matches!(dom.kind(node), NodeKind::Comment(_))
}

// =============================================================================
// Tag, attribute and text checks
// =============================================================================

/// Element whose tag equals `name`, ignoring ASCII case.
pub fn has_tag_name(name: &str) -> impl Fn(&Dom, NodeId) -> bool + use<> {
    let name = name.to_owned();
    move |dom: &Dom, node: NodeId| {
        dom.tag_name(node)
            .is_some_and(|tag| tag.eq_ignore_ascii_case(&name))
    }
}

/// Element whose lowercased tag satisfies `pattern`.
///
/// The pattern is whatever the caller wants it to be: a substring test, a
/// regex, a lookup table.
pub fn has_matching_tag_name<F>(pattern: F) -> impl Fn(&Dom, NodeId) -> bool
where
    F: Fn(&str) -> bool,
{
    move |dom: &Dom, node: NodeId| {
        dom.tag_name(node)
            .is_some_and(|tag| pattern(&tag.to_ascii_lowercase()))
    }
}

pub fn has_attr(name: &str) -> impl Fn(&Dom, NodeId) -> bool + use<> {
    let name = name.to_owned();
    move |dom: &Dom, node: NodeId| dom.get_attribute_index(node, &name).is_some()
}

/// Attribute `name` is present and exactly equal to `value`.
pub fn has_attr_value(name: &str, value: &str) -> impl Fn(&Dom, NodeId) -> bool + use<> {
    let name = name.to_owned();
    let value = value.to_owned();
    move |dom: &Dom, node: NodeId| dom.get_attribute(node, &name) == Some(value.as_str())
}

/// Attribute `name`, split on single spaces, contains `token`.
pub fn has_space_separated_attr_value(
    name: &str,
    token: &str,
) -> impl Fn(&Dom, NodeId) -> bool + use<> {
    let name = name.to_owned();
    let token = token.to_owned();
    move |dom: &Dom, node: NodeId| {
        dom.get_attribute(node, &name)
            .is_some_and(|value| value.split(' ').any(|part| part == token))
    }
}

pub fn has_class(name: &str) -> impl Fn(&Dom, NodeId) -> bool + use<> {
    has_space_separated_attr_value("class", name)
}

/// The node's full text content equals `value`.
pub fn has_text_value(value: &str) -> impl Fn(&Dom, NodeId) -> bool + use<> {
    let value = value.to_owned();
    move |dom: &Dom, node: NodeId| dom.get_text_content(node).as_ref() == value
}

// =============================================================================
// Combinators
// =============================================================================

/// True when every predicate holds. Stops at the first false; `and(vec![])`
/// is true.
pub fn and(predicates: Vec<BoxedPredicate>) -> impl Fn(&Dom, NodeId) -> bool {
    move |dom: &Dom, node: NodeId| predicates.iter().all(|p| p(dom, node))
}

/// True when any predicate holds. Stops at the first true; `or(vec![])` is
/// false.
pub fn or(predicates: Vec<BoxedPredicate>) -> impl Fn(&Dom, NodeId) -> bool {
    move |dom: &Dom, node: NodeId| predicates.iter().any(|p| p(dom, node))
}

pub fn not<P>(predicate: P) -> impl Fn(&Dom, NodeId) -> bool
where
    P: Predicate,
{
    move |dom: &Dom, node: NodeId| !predicate.matches(dom, node)
}

/// Some strict ancestor of the node satisfies `predicate`.
pub fn parent_matches<P>(predicate: P) -> impl Fn(&Dom, NodeId) -> bool
where
    P: Predicate,
{
    move |dom: &Dom, node: NodeId| dom.ancestors(node).any(|a| predicate.matches(dom, a))
}

/// `and!(p1, p2, ...)`: boxes each argument and combines them with
/// [`and`](crate::predicates::and).
#[macro_export]
macro_rules! and {
    ($($predicate:expr),* $(,)?) => {
        $crate::predicates::and(vec![$($crate::predicates::boxed($predicate)),*])
    };
}

/// `or!(p1, p2, ...)`: boxes each argument and combines them with
/// [`or`](crate::predicates::or).
#[macro_export]
macro_rules! or {
    ($($predicate:expr),* $(,)?) => {
        $crate::predicates::or(vec![$($crate::predicates::boxed($predicate)),*])
    };
}
