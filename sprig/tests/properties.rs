//! Behavioral properties of the tree: attributes, predicates, walks,
//! mutation and text handling.

mod common;

use sprig::predicates::{
    BoxedPredicate, and, boxed, has_attr, has_class, has_tag_name, is_comment_node, is_element,
    is_text_node, not, or,
};
use sprig::{Dom, DomError, Namespace, NodeId, NodeKind, parse_fragment};

fn element(dom: &mut Dom, parent: Option<NodeId>, tag: &str) -> NodeId {
    let id = dom.create_element(tag, Namespace::Html);
    if let Some(parent) = parent {
        dom.append(parent, id).unwrap();
    }
    id
}

fn text(dom: &mut Dom, parent: NodeId, value: &str) -> NodeId {
    let id = dom.create_text(value);
    dom.append(parent, id).unwrap();
    id
}

fn children(dom: &Dom, parent: NodeId) -> Vec<NodeId> {
    dom.children(parent).collect()
}

fn text_value(dom: &Dom, node: NodeId) -> Option<String> {
    match dom.kind(node) {
        NodeKind::Text(text) => Some(text.to_string()),
        _ => None,
    }
}

#[test]
fn attribute_set_get_roundtrip() {
    common::setup();
    let mut dom = Dom::new();
    let document = dom.root;
    let e = element(&mut dom, Some(document), "div");

    for (name, value) in [("Foo", "x"), ("data-y", ""), ("ID", "with space")] {
        dom.set_attribute(e, name, value).unwrap();
        assert_eq!(dom.get_attribute(e, name), Some(value));
        assert_eq!(dom.get_attribute(e, &name.to_uppercase()), Some(value));
        assert_eq!(dom.get_attribute(e, &name.to_lowercase()), Some(value));
    }
}

#[test]
fn attribute_set_on_non_element_fails() {
    common::setup();
    let mut dom = Dom::new();
    let t = dom.create_text("t");
    assert!(matches!(
        dom.set_attribute(t, "a", "b"),
        Err(DomError::NotAnElement { kind: "text" })
    ));
    assert_eq!(dom.get_attribute(t, "a"), None);
}

#[test]
fn no_duplicate_attributes() {
    common::setup();
    let mut dom = Dom::new();
    let e = element(&mut dom, None, "div");

    dom.set_attribute(e, "class", "v1").unwrap();
    dom.set_attribute(e, "CLASS", "v2").unwrap();

    let attrs: Vec<_> = dom.element(e).unwrap().attrs.iter().collect();
    assert_eq!(attrs, vec![("class", "v2")]);

    assert_eq!(dom.remove_attribute(e, "Class").as_deref(), Some("v2"));
    assert!(!dom.has_attribute(e, "class"));
    assert_eq!(dom.remove_attribute(e, "class"), None);
}

#[test]
fn predicate_combinator_identities() {
    common::setup();
    let dom = parse_fragment(r#"<div class="x" id="d">hi<!--c--><span></span></div>"#);
    let nodes = dom.depth_first(dom.root, Default::default()).collect::<Vec<_>>();

    let list = || -> Vec<BoxedPredicate> {
        vec![boxed(is_element), boxed(has_class("x")), boxed(has_attr("id"))]
    };
    let all = and(list());
    let any = or(list());
    let negated = not(is_text_node);

    for &x in &nodes {
        let each: Vec<bool> = list().iter().map(|p| p(&dom, x)).collect();
        assert_eq!(all(&dom, x), each.iter().all(|&b| b));
        assert_eq!(any(&dom, x), each.iter().any(|&b| b));
        assert_eq!(negated(&dom, x), !is_text_node(&dom, x));
    }
}

/// `root{A{B, C{D}}, E}`
fn lettered_tree() -> (Dom, [NodeId; 6]) {
    let mut dom = Dom::new();
    let document = dom.root;
    let root = element(&mut dom, Some(document), "root");
    let a = element(&mut dom, Some(root), "a");
    let b = element(&mut dom, Some(a), "b");
    let c = element(&mut dom, Some(a), "c");
    let d = element(&mut dom, Some(c), "d");
    let e = element(&mut dom, Some(root), "e");
    (dom, [root, a, b, c, d, e])
}

#[test]
fn traversal_completeness_and_order() {
    common::setup();
    let (dom, ids) = lettered_tree();
    let [root, ..] = ids;
    assert_eq!(dom.node_walk_all(root, is_element), ids.to_vec());
    assert_eq!(dom.node_walk(root, is_element), Some(root));
    assert_eq!(dom.query(root, is_element), Some(ids[1]));
}

#[test]
fn query_excludes_non_elements() {
    common::setup();
    let mut dom = Dom::new();
    let document = dom.root;
    let div = element(&mut dom, Some(document), "div");
    text(&mut dom, div, "hello");
    let span = element(&mut dom, Some(div), "span");
    text(&mut dom, div, "world");

    let always = |_: &Dom, _: NodeId| true;
    assert_eq!(dom.query_all(div, always), vec![span]);
    assert_eq!(dom.query(div, always), Some(span));
}

#[test]
fn remove_insert_invariant() {
    common::setup();
    let (mut dom, [root, a, _b, c, _d, e]) = lettered_tree();

    dom.remove(c);
    assert_eq!(dom.parent(c), None);
    assert!(!children(&dom, a).contains(&c));

    dom.insert_before(root, e, c).unwrap();
    assert_eq!(dom.parent(c), Some(root));
    let kids = children(&dom, root);
    let at = kids.iter().position(|&id| id == c).unwrap();
    assert_eq!(kids[at + 1], e);
    assert_eq!(kids, vec![a, c, e]);
}

#[test]
fn fragment_flattening_on_insert() {
    common::setup();
    let mut dom = Dom::new();
    let document = dom.root;
    let p = element(&mut dom, Some(document), "p");
    let first = element(&mut dom, Some(p), "first");
    let last = element(&mut dom, Some(p), "last");

    let fragment = dom.create_fragment();
    let x = element(&mut dom, Some(fragment), "x");
    let y = element(&mut dom, Some(fragment), "y");

    let i = 1;
    dom.insert_node(p, i, fragment, false).unwrap();

    let kids = children(&dom, p);
    assert_eq!(kids, vec![first, x, y, last]);
    assert_eq!((kids[i], kids[i + 1]), (x, y));
    assert_eq!(dom.parent(x), Some(p));
    assert_eq!(dom.parent(y), Some(p));
    assert!(children(&dom, fragment).is_empty());
}

#[test]
fn fragment_from_parser_can_be_spliced() {
    common::setup();
    let mut dom = parse_fragment("<ul><li>a</li></ul>");
    let ul = dom.query(dom.root, has_tag_name("ul")).unwrap();

    let fragment = dom.create_fragment();
    let li = element(&mut dom, Some(fragment), "li");
    text(&mut dom, li, "b");
    dom.append(ul, fragment).unwrap();

    assert_eq!(dom.to_html(), "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn text_content_roundtrip() {
    common::setup();
    let mut dom = parse_fragment("<div><p>old <b>markup</b></p></div>");
    let div = dom.query(dom.root, has_tag_name("div")).unwrap();

    for s in ["plain", "", "a < b & c", "multi\nline"] {
        dom.set_text_content(div, s);
        assert_eq!(dom.get_text_content(div).as_ref(), s);
        assert_eq!(dom.children(div).count(), 1);
    }
}

#[test]
fn normalize_coalesces_adjacent_text() {
    common::setup();
    let mut dom = Dom::new();
    let document = dom.root;
    let div = element(&mut dom, Some(document), "div");
    text(&mut dom, div, "foo");
    text(&mut dom, div, "bar");
    let span = element(&mut dom, Some(div), "span");
    text(&mut dom, div, "baz");

    dom.normalize(div);

    let kids = children(&dom, div);
    assert_eq!(kids.len(), 3);
    assert_eq!(text_value(&dom, kids[0]).as_deref(), Some("foobar"));
    assert_eq!(kids[1], span);
    assert_eq!(text_value(&dom, kids[2]).as_deref(), Some("baz"));
}

#[test]
fn comments_excluded_from_text_content() {
    common::setup();
    let mut dom = Dom::new();
    let document = dom.root;
    let div = element(&mut dom, Some(document), "div");
    text(&mut dom, div, "a");
    let comment = dom.create_comment("b");
    dom.append(div, comment).unwrap();
    text(&mut dom, div, "c");

    assert_eq!(dom.get_text_content(div).as_ref(), "ac");
    assert_eq!(dom.get_text_content(comment).as_ref(), "b");
    assert_eq!(dom.node_walk_all(div, is_comment_node), vec![comment]);
}

#[test]
fn node_walk_prior_reverse_order() {
    common::setup();
    let mut dom = Dom::new();
    let root = element(&mut dom, None, "root");
    let a = element(&mut dom, Some(root), "a");
    let b = element(&mut dom, Some(root), "b");
    let c = element(&mut dom, Some(root), "c");

    let leaf = not(has_tag_name("root"));
    assert_eq!(dom.node_walk_prior(c, &leaf), Some(b));
    assert_eq!(dom.node_walk_prior(b, &leaf), Some(a));
    assert_eq!(dom.node_walk_prior(a, &leaf), None);

    // the root itself is an element too
    assert_eq!(dom.node_walk_prior(a, is_element), Some(root));
}

#[test]
fn node_walk_all_prior_table() {
    common::setup();
    let (dom, [root, a, b, c, d, e]) = lettered_tree();

    let cases: [(NodeId, Vec<NodeId>); 6] = [
        (e, vec![e, d, c, b, a, root]),
        (d, vec![d, c, b, a, root]),
        (c, vec![c, b, a, root]),
        (b, vec![b, a, root]),
        (a, vec![a, root]),
        (root, vec![root]),
    ];
    for (start, expected) in cases {
        assert_eq!(dom.node_walk_all_prior(start, is_element), expected);
    }

    // prior stops at the tree root; the document is above it
    assert_eq!(dom.prior(root).collect::<Vec<_>>(), vec![dom.root]);
}

#[test]
fn normalize_is_idempotent() {
    common::setup();
    let mut dom = parse_fragment("<div>a<span>b</span>c<p>d</p></div>");
    let div = dom.query(dom.root, has_tag_name("div")).unwrap();
    let span = dom.query(div, has_tag_name("span")).unwrap();
    let p = dom.query(div, has_tag_name("p")).unwrap();

    // add adjacency and empties by hand
    for (parent, value) in [(div, "x"), (div, ""), (span, "y"), (p, ""), (p, "z")] {
        text(&mut dom, parent, value);
    }

    dom.normalize(dom.root);
    let once = dom.to_html();
    let shape_once: Vec<_> = dom.depth_first(dom.root, Default::default()).collect();

    dom.normalize(dom.root);
    assert_eq!(dom.to_html(), once);
    assert_eq!(
        dom.depth_first(dom.root, Default::default()).collect::<Vec<_>>(),
        shape_once
    );
    assert_eq!(once, "<div>a<span>by</span>c<p>dz</p>x</div>");
}
