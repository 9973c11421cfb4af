//! Errors raised by tree mutations.
//!
//! Lookups never fail: a missing attribute or an empty walk is an `Option` or
//! an empty `Vec`. A `DomError` always means the caller asked for something the
//! tree shape does not allow.

use indextree::NodeError;

/// Errors that can occur while mutating a [`Dom`](crate::Dom).
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// The target of an insertion cannot hold children.
    #[error("{kind} node cannot have children")]
    NotAContainer { kind: &'static str },

    /// An attribute write targeted something other than an element.
    #[error("{kind} node is not an element")]
    NotAnElement { kind: &'static str },

    /// The node has no parent to be replaced in.
    #[error("node is not attached to a parent")]
    NotAttached,

    /// The reference node is not a child of the given parent.
    #[error("reference node is not a child of the given parent")]
    NotAChild,

    /// The node being inserted is the parent itself or one of its ancestors.
    #[error("cannot insert a node into its own subtree")]
    WouldCycle,

    /// The arena refused the insertion, e.g. because a node was disposed.
    #[error("hierarchy error: {0}")]
    Hierarchy(#[from] NodeError),
}
