//! The tree contract: capabilities any node store must provide.
//!
//! The solver is written against these traits rather than a concrete node
//! representation. [`Forest`][crate::forest::Forest] is the bundled
//! arena-backed implementation.

use std::fmt::Debug;

use crate::types::NodeKind;

/// Read/write access to an ordered tree of boolean expression nodes.
///
/// Nodes are addressed by a copyable identity handle. Identity is distinct
/// from structural equality: two different handles may denote structurally
/// equal subtrees, and the rewrite machinery relies on being able to tell
/// them apart.
///
/// # Invariants
///
/// - Every node has at most one parent. [`add_child`][TreeLike::add_child]
///   re-parents: the child is detached from any prior parent first, so no
///   node is ever shared by two live parents and the structure stays a
///   simple tree.
pub trait TreeLike {
    /// Stable node identity.
    type Id: Copy + Eq + Debug;

    /// The kind of the node.
    fn kind(&self, node: Self::Id) -> NodeKind;

    /// The ordered children of the node.
    fn children(&self, node: Self::Id) -> Vec<Self::Id>;

    /// Appends `child` to `parent`'s children, detaching it from any prior
    /// parent first.
    fn add_child(&mut self, parent: Self::Id, child: Self::Id);

    /// Appends each child in order. See [`add_child`][TreeLike::add_child].
    fn add_children(&mut self, parent: Self::Id, children: Vec<Self::Id>) {
        for child in children {
            self.add_child(parent, child);
        }
    }

    /// Detaches `child` from `parent` and clears its parent back-reference.
    /// No-op if `child` is not currently a child of `parent`.
    fn remove_child(&mut self, parent: Self::Id, child: Self::Id);

    /// Payload-only equality, ignoring kind and children.
    fn data_equivalent(&self, a: Self::Id, b: Self::Id) -> bool;

    /// Structural equality: same kind, same payload, and children equal as
    /// an unordered multiset (duplicate subtrees count).
    fn structural_eq(&self, a: Self::Id, b: Self::Id) -> bool;

    /// The textual form of the node's payload, if it has one.
    fn data_label(&self, node: Self::Id) -> Option<String>;
}

/// Construction of fresh nodes and copies.
pub trait TreeFactory: TreeLike {
    /// A fresh childless node of the given kind, with no payload and no
    /// parent.
    fn with_kind(&mut self, kind: NodeKind) -> Self::Id;

    /// A fresh node with the prototype's kind and payload, but no children
    /// and no parent.
    fn from_prototype(&mut self, prototype: Self::Id) -> Self::Id;

    /// A deep structural copy of the subtree, with freshly owned descendants
    /// and no parent link into the original tree.
    fn from_prototype_subtree(&mut self, subtree: Self::Id) -> Self::Id;
}
