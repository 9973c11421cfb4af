//! Tree mutation.
//!
//! Every operation keeps parent links and child lists in agreement: a node
//! that is inserted somewhere is first detached from wherever it was, and a
//! node that is removed has no parent afterwards.

use html5ever::tendril::StrTendril;
use indextree::NodeId;
use smallvec::{SmallVec, smallvec};

use crate::dom::Dom;
use crate::error::DomError;
use crate::node::NodeKind;

impl Dom {
    /// Check that `new_node` (or, for a fragment, each of its children) can
    /// go under `parent` without creating a cycle. Nothing is moved.
    pub(crate) fn check_insertable(
        &self,
        parent: NodeId,
        new_node: NodeId,
    ) -> Result<(), DomError> {
        self.ensure_container(parent)?;
        let would_cycle =
            |node: NodeId| node == parent || self.ancestors(parent).any(|a| a == node);
        let refused = if matches!(self.kind(new_node), NodeKind::DocumentFragment) {
            new_node.children(&self.arena).any(would_cycle)
        } else {
            would_cycle(new_node)
        };
        if refused {
            return Err(DomError::WouldCycle);
        }
        Ok(())
    }

    /// Insert `new_node` into `parent`'s children at `index`.
    ///
    /// A document fragment is never inserted itself: its children are moved
    /// over in order and the fragment is left empty. Any other node is
    /// detached from its current parent first. `index` past the end appends.
    /// With `replace`, the child that was at `index` is detached; replacing a
    /// child with itself does nothing.
    pub fn insert_node(
        &mut self,
        parent: NodeId,
        index: usize,
        new_node: NodeId,
        replace: bool,
    ) -> Result<(), DomError> {
        self.check_insertable(parent, new_node)?;
        if replace && parent.children(&self.arena).nth(index) == Some(new_node) {
            return Ok(());
        }

        let new_nodes: SmallVec<[NodeId; 8]> =
            if matches!(self.kind(new_node), NodeKind::DocumentFragment) {
                new_node.children(&self.arena).collect()
            } else {
                smallvec![new_node]
            };

        for &node in &new_nodes {
            node.detach(&mut self.arena);
        }

        let displaced = parent.children(&self.arena).nth(index);
        trace!(
            "insert_node: parent={:?} index={} count={} replace={}",
            parent,
            index,
            new_nodes.len(),
            replace
        );

        for &node in &new_nodes {
            match displaced {
                Some(reference) => reference.checked_insert_before(node, &mut self.arena)?,
                None => parent.checked_append(node, &mut self.arena)?,
            }
        }

        if replace && let Some(old) = displaced {
            old.detach(&mut self.arena);
        }

        Ok(())
    }

    /// Put `new_node` where `old_node` is, detaching `old_node`.
    pub fn replace(&mut self, old_node: NodeId, new_node: NodeId) -> Result<(), DomError> {
        let parent = self.parent(old_node).ok_or(DomError::NotAttached)?;
        if old_node == new_node {
            return Ok(());
        }
        self.check_insertable(parent, new_node)?;
        // Detach first so that the index is computed after any shift caused
        // by `new_node` leaving the same parent.
        if !matches!(self.kind(new_node), NodeKind::DocumentFragment) {
            self.remove(new_node);
        }
        let index = self.index_in_parent(old_node).ok_or(DomError::NotAttached)?;
        self.insert_node(parent, index, new_node, true)
    }

    /// Detach `node` from its parent. Already-detached nodes are left alone.
    pub fn remove(&mut self, node: NodeId) {
        if self.parent(node).is_some() {
            trace!("remove {:?}", node);
            node.detach(&mut self.arena);
        }
    }

    /// Insert `new_node` immediately before `reference`, which must be a
    /// child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        reference: NodeId,
        new_node: NodeId,
    ) -> Result<(), DomError> {
        self.ensure_container(parent)?;
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild);
        }
        if reference == new_node {
            return Ok(());
        }
        self.check_insertable(parent, new_node)?;
        if !matches!(self.kind(new_node), NodeKind::DocumentFragment) {
            self.remove(new_node);
        }
        let index = self.index_in_parent(reference).ok_or(DomError::NotAChild)?;
        self.insert_node(parent, index, new_node, false)
    }

    /// Insert `new_node` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, new_node: NodeId) -> Result<(), DomError> {
        self.insert_node(parent, usize::MAX, new_node, false)
    }

    /// Replace `node` with its own children, then detach it.
    pub fn remove_node_save_children(&mut self, node: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        let children: SmallVec<[NodeId; 8]> = node.children(&self.arena).collect();
        for child in children {
            self.insert_before(parent, node, child)?;
        }
        self.remove(node);
        Ok(())
    }

    /// Deep copy of `node` with no parent.
    ///
    /// Attributes, payloads, source locations and template contents are
    /// copied; the source subtree is not touched.
    pub fn clone_node(&mut self, node: NodeId) -> NodeId {
        let mut data = self.get(node).clone();
        if let Some(elem) = data.kind.as_element_mut()
            && let Some(contents) = elem.template_contents
        {
            elem.template_contents = Some(self.clone_node(contents));
        }

        let copy = self.arena.new_node(data);
        let children: Vec<NodeId> = node.children(&self.arena).collect();
        for child in children {
            let child_copy = self.clone_node(child);
            copy.append(child_copy, &mut self.arena);
        }
        copy
    }

    /// DOM `normalize()`: merge runs of adjacent text nodes and drop empty
    /// ones, recursively.
    ///
    /// Only documents, fragments and elements are affected; calling this on
    /// a text or comment node does nothing.
    pub fn normalize(&mut self, node: NodeId) {
        if !self.get(node).is_container() {
            return;
        }

        let children: Vec<NodeId> = node.children(&self.arena).collect();
        let mut run: SmallVec<[NodeId; 4]> = SmallVec::new();
        for child in children {
            if matches!(self.kind(child), NodeKind::Text(_)) {
                run.push(child);
            } else {
                self.collapse_text_run(&mut run);
                self.normalize(child);
            }
        }
        self.collapse_text_run(&mut run);
    }

    /// Fold a run of adjacent text siblings into its first node, or remove
    /// the whole run if it holds no text.
    fn collapse_text_run(&mut self, run: &mut SmallVec<[NodeId; 4]>) {
        let Some((&first, rest)) = run.split_first() else {
            return;
        };

        let mut merged = StrTendril::new();
        for &id in run.iter() {
            if let NodeKind::Text(text) = self.kind(id) {
                merged.push_tendril(text);
            }
        }

        if merged.is_empty() {
            debug!("normalize: dropping {} empty text node(s)", run.len());
            for &id in run.iter() {
                id.detach(&mut self.arena);
            }
        } else if !rest.is_empty() {
            debug!("normalize: merging {} text nodes", run.len());
            for &id in rest {
                id.detach(&mut self.arena);
            }
            self.get_mut(first).kind = NodeKind::Text(merged);
        }
        run.clear();
    }
}
