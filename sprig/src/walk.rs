//! Tree searches.
//!
//! Forward walks are pre-order and visit siblings left to right. The "prior"
//! family walks backwards through the document from a starting node, which is
//! how you find "the closest preceding `<link>`" and similar.
//!
//! Text and comment nodes have no children, so walking into them finds
//! nothing; walks that climb stop cleanly at a node without a parent.

use indextree::NodeId;

use crate::dom::Dom;
use crate::predicates::{Predicate, is_element};

/// Which nodes count as a node's children during a forward walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildNodes {
    /// Only the node's own children.
    #[default]
    Default,
    /// Also descend into `<template>` contents, after the template's own
    /// children.
    IncludeTemplate,
}

/// Pre-order iterator over a subtree, root first.
pub struct DepthFirst<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
    child_nodes: ChildNodes,
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        if self.child_nodes == ChildNodes::IncludeTemplate
            && let Some(contents) = self.dom.template_contents(node)
        {
            self.stack.extend(self.dom.children(contents).rev());
        }
        self.stack.extend(self.dom.children(node).rev());
        Some(node)
    }
}

/// Iterator over every node that comes before a starting node in document
/// order, nearest first, ending at the root.
pub struct Prior<'a> {
    dom: &'a Dom,
    next: Option<NodeId>,
}

impl Prior<'_> {
    /// Deepest last descendant of `node` (or `node` itself if it is a leaf).
    fn last_leaf(&self, mut node: NodeId) -> NodeId {
        while let Some(last) = self.dom.last_child(node) {
            node = last;
        }
        node
    }

    fn step(&self, node: NodeId) -> Option<NodeId> {
        match self.dom.previous_sibling(node) {
            Some(sibling) => Some(self.last_leaf(sibling)),
            None => self.dom.parent(node),
        }
    }
}

impl Iterator for Prior<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.next?;
        self.next = self.step(node);
        Some(node)
    }
}

impl Dom {
    // =========================================================================
    // Iterators
    // =========================================================================

    /// Pre-order walk of `root` and its descendants.
    pub fn depth_first(&self, root: NodeId, child_nodes: ChildNodes) -> DepthFirst<'_> {
        DepthFirst {
            dom: self,
            stack: vec![root],
            child_nodes,
        }
    }

    /// Strict ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.ancestors(&self.arena).skip(1)
    }

    /// Earlier siblings of `node`, nearest first.
    pub fn previous_siblings(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.preceding_siblings(&self.arena).skip(1)
    }

    /// Every node before `node` in reverse document order: each earlier
    /// sibling's subtree (deepest-last first), then the parent, and so on up
    /// to the root.
    pub fn prior(&self, node: NodeId) -> Prior<'_> {
        let mut prior = Prior {
            dom: self,
            next: None,
        };
        prior.next = prior.step(node);
        prior
    }

    // =========================================================================
    // Forward walks
    // =========================================================================

    /// First node (starting with `root` itself, then its descendants in
    /// pre-order) satisfying `predicate`.
    pub fn node_walk<P: Predicate>(&self, root: NodeId, predicate: P) -> Option<NodeId> {
        self.node_walk_with(root, predicate, ChildNodes::Default)
    }

    pub fn node_walk_with<P: Predicate>(
        &self,
        root: NodeId,
        predicate: P,
        child_nodes: ChildNodes,
    ) -> Option<NodeId> {
        self.depth_first(root, child_nodes)
            .find(|&node| predicate.matches(self, node))
    }

    /// Every node in `root`'s subtree (root included) satisfying `predicate`,
    /// in pre-order.
    pub fn node_walk_all<P: Predicate>(&self, root: NodeId, predicate: P) -> Vec<NodeId> {
        let mut matches = Vec::new();
        self.node_walk_all_into(root, predicate, &mut matches, ChildNodes::Default);
        matches
    }

    pub fn node_walk_all_with<P: Predicate>(
        &self,
        root: NodeId,
        predicate: P,
        child_nodes: ChildNodes,
    ) -> Vec<NodeId> {
        let mut matches = Vec::new();
        self.node_walk_all_into(root, predicate, &mut matches, child_nodes);
        matches
    }

    /// Like [`node_walk_all_with`](Self::node_walk_all_with), appending to a
    /// caller-supplied accumulator.
    pub fn node_walk_all_into<P: Predicate>(
        &self,
        root: NodeId,
        predicate: P,
        matches: &mut Vec<NodeId>,
        child_nodes: ChildNodes,
    ) {
        matches.extend(
            self.depth_first(root, child_nodes)
                .filter(|&node| predicate.matches(self, node)),
        );
    }

    /// First element below `root` satisfying `predicate`.
    ///
    /// Like DOM `querySelector`, `root` itself is never returned, and neither
    /// is any non-element node.
    pub fn query<P: Predicate>(&self, root: NodeId, predicate: P) -> Option<NodeId> {
        self.query_with(root, predicate, ChildNodes::Default)
    }

    pub fn query_with<P: Predicate>(
        &self,
        root: NodeId,
        predicate: P,
        child_nodes: ChildNodes,
    ) -> Option<NodeId> {
        self.depth_first(root, child_nodes)
            .skip(1)
            .find(|&node| is_element(self, node) && predicate.matches(self, node))
    }

    /// Every element below `root` satisfying `predicate`, in pre-order.
    pub fn query_all<P: Predicate>(&self, root: NodeId, predicate: P) -> Vec<NodeId> {
        self.query_all_with(root, predicate, ChildNodes::Default)
    }

    pub fn query_all_with<P: Predicate>(
        &self,
        root: NodeId,
        predicate: P,
        child_nodes: ChildNodes,
    ) -> Vec<NodeId> {
        self.depth_first(root, child_nodes)
            .skip(1)
            .filter(|&node| is_element(self, node) && predicate.matches(self, node))
            .collect()
    }

    /// Pre-order walk that concatenates whatever `f` returns for each node.
    pub fn tree_map<U, I, F>(&self, root: NodeId, mut f: F) -> Vec<U>
    where
        F: FnMut(&Dom, NodeId) -> I,
        I: IntoIterator<Item = U>,
    {
        let mut out = Vec::new();
        for node in self.depth_first(root, ChildNodes::Default) {
            out.extend(f(self, node));
        }
        out
    }

    // =========================================================================
    // Backward walks
    // =========================================================================

    /// Nearest strict ancestor satisfying `predicate`.
    pub fn node_walk_ancestors<P: Predicate>(&self, node: NodeId, predicate: P) -> Option<NodeId> {
        self.ancestors(node)
            .find(|&ancestor| predicate.matches(self, ancestor))
    }

    /// First match scanning backwards from `node` (exclusive).
    ///
    /// Earlier siblings are tried right to left; each one is tested and then
    /// searched with a forward [`node_walk`](Self::node_walk). After the
    /// siblings comes the parent, then the parent's own earlier siblings,
    /// and so on up to the root.
    pub fn node_walk_prior<P: Predicate>(&self, node: NodeId, predicate: P) -> Option<NodeId> {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            for sibling in self.previous_siblings(current) {
                let found = self
                    .depth_first(sibling, ChildNodes::Default)
                    .find(|&node| predicate.matches(self, node));
                if found.is_some() {
                    return found;
                }
            }
            if predicate.matches(self, parent) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// Every match from `node` backwards to the root, in reverse document
    /// order. `node` itself is tested first.
    pub fn node_walk_all_prior<P: Predicate>(&self, node: NodeId, predicate: P) -> Vec<NodeId> {
        let mut matches = Vec::new();
        self.node_walk_all_prior_into(node, predicate, &mut matches);
        matches
    }

    pub fn node_walk_all_prior_into<P: Predicate>(
        &self,
        node: NodeId,
        predicate: P,
        matches: &mut Vec<NodeId>,
    ) {
        if predicate.matches(self, node) {
            matches.push(node);
        }
        matches.extend(
            self.prior(node)
                .filter(|&prior| predicate.matches(self, prior)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Namespace;
    use crate::predicates::{has_tag_name, is_text_node};

    /// Builds `root{a{b, c{d}}, e}` under a document, returning the ids in
    /// pre-order.
    fn build() -> (Dom, [NodeId; 6]) {
        let mut dom = Dom::new();
        let make = |dom: &mut Dom, parent: Option<NodeId>, tag: &str| {
            let id = dom.create_element(tag, Namespace::Html);
            if let Some(parent) = parent {
                dom.append(parent, id).unwrap();
            }
            id
        };
        let root = make(&mut dom, None, "root");
        let a = make(&mut dom, Some(root), "a");
        let b = make(&mut dom, Some(a), "b");
        let c = make(&mut dom, Some(a), "c");
        let d = make(&mut dom, Some(c), "d");
        let e = make(&mut dom, Some(root), "e");
        (dom, [root, a, b, c, d, e])
    }

    #[test]
    fn test_depth_first_order() {
        let (dom, ids) = build();
        let order: Vec<_> = dom.depth_first(ids[0], ChildNodes::Default).collect();
        assert_eq!(order, ids.to_vec());
    }

    #[test]
    fn test_node_walk_includes_root() {
        let (dom, [root, _, _, c, _, _]) = build();
        assert_eq!(dom.node_walk(root, is_element), Some(root));
        assert_eq!(dom.node_walk(root, has_tag_name("c")), Some(c));
        assert_eq!(dom.node_walk(root, has_tag_name("zzz")), None);
    }

    #[test]
    fn test_query_skips_element_root() {
        let mut dom = Dom::new();
        let div = dom.create_element("div", Namespace::Html);
        dom.append(dom.root, div).unwrap();

        assert_eq!(dom.query(div, has_tag_name("div")), None);
        assert!(dom.query_all(div, has_tag_name("div")).is_empty());
        assert_eq!(dom.node_walk(div, has_tag_name("div")), Some(div));
    }

    #[test]
    fn test_node_walk_all_into_appends() {
        let (dom, [root, a, _, _, _, e]) = build();
        let mut acc = vec![e];
        dom.node_walk_all_into(root, has_tag_name("a"), &mut acc, ChildNodes::Default);
        assert_eq!(acc, vec![e, a]);
    }

    #[test]
    fn test_leaf_walks_find_nothing_inside() {
        let mut dom = Dom::new();
        let text = dom.create_text("x");
        assert_eq!(dom.node_walk_all(text, is_element), Vec::<NodeId>::new());
        assert_eq!(dom.query(text, is_element), None);
        assert_eq!(dom.node_walk(text, is_text_node), Some(text));
    }

    #[test]
    fn test_ancestors() {
        let (dom, [root, a, _, c, d, _]) = build();
        assert_eq!(dom.ancestors(d).collect::<Vec<_>>(), vec![c, a, root]);
        assert_eq!(dom.node_walk_ancestors(d, is_element), Some(c));
        assert_eq!(dom.node_walk_ancestors(d, has_tag_name("root")), Some(root));
        assert_eq!(dom.node_walk_ancestors(d, has_tag_name("d")), None);
        assert_eq!(dom.node_walk_ancestors(root, is_element), None);
    }

    #[test]
    fn test_prior_is_reverse_document_order() {
        let (dom, [root, a, b, c, d, e]) = build();
        assert_eq!(dom.prior(e).collect::<Vec<_>>(), vec![d, c, b, a, root]);
        assert_eq!(dom.prior(root).count(), 0);
        assert_eq!(dom.previous_siblings(e).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_node_walk_prior_tests_sibling_before_its_subtree() {
        let (dom, [root, a, _, c, _, e]) = build();
        // a is tested before its descendants, unlike `prior`
        assert_eq!(dom.node_walk_prior(e, is_element), Some(a));
        assert_eq!(dom.node_walk_prior(e, has_tag_name("c")), Some(c));
        assert_eq!(dom.node_walk_prior(c, has_tag_name("root")), Some(root));
        assert_eq!(dom.node_walk_prior(root, is_element), None);
    }

    #[test]
    fn test_node_walk_all_prior_order() {
        let (dom, [root, a, b, c, d, e]) = build();
        assert_eq!(
            dom.node_walk_all_prior(e, is_element),
            vec![e, d, c, b, a, root]
        );
        assert_eq!(dom.node_walk_all_prior(d, is_element), vec![d, c, b, a, root]);
        assert_eq!(dom.node_walk_all_prior(b, has_tag_name("e")), Vec::<NodeId>::new());
    }

    #[test]
    fn test_tree_map() {
        let (dom, [root, ..]) = build();
        let tags: Vec<String> = dom.tree_map(root, |dom, node| {
            dom.tag_name(node).map(|tag| tag.to_uppercase())
        });
        assert_eq!(tags, vec!["ROOT", "A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_template_contents_strategy() {
        let mut dom = Dom::new();
        let template = dom.create_element("template", Namespace::Html);
        dom.append(dom.root, template).unwrap();
        let contents = dom.template_contents(template).unwrap();
        let p = dom.create_element("p", Namespace::Html);
        dom.append(contents, p).unwrap();

        assert_eq!(dom.query(dom.root, has_tag_name("p")), None);
        assert_eq!(
            dom.query_with(dom.root, has_tag_name("p"), ChildNodes::IncludeTemplate),
            Some(p)
        );
        assert_eq!(
            dom.node_walk_all_with(dom.root, is_element, ChildNodes::IncludeTemplate),
            vec![template, p]
        );
        assert_eq!(
            dom.query_all_with(dom.root, is_element, ChildNodes::IncludeTemplate),
            vec![template, p]
        );
    }
}
