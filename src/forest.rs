//! Arena-backed boolean expression trees.
//!
//! A [`Forest`] owns every node it allocates and hands out lightweight
//! [`NodeId`] handles. The handle is the node's *identity*; structural
//! equality is a separate notion computed over kind, payload, and children.
//! Detached nodes are kept in the arena until the whole forest is dropped,
//! so handles never dangle.

use std::fmt;

use crate::tree::{TreeFactory, TreeLike};
use crate::types::NodeKind;

/// A handle to a node in a [`Forest`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct NodeData<D> {
    kind: NodeKind,
    data: Option<D>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An arena of boolean expression nodes.
///
/// `D` is the opaque predicate payload type. Only predicates carry a
/// payload; for every other kind `data` is absent.
#[derive(Debug)]
pub struct Forest<D> {
    nodes: Vec<NodeData<D>>,
}

impl<D> Default for Forest<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Forest<D> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Total number of nodes ever allocated, including detached ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> &NodeData<D> {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData<D> {
        &mut self.nodes[id.index()]
    }

    fn alloc(&mut self, kind: NodeKind, data: Option<D>) -> NodeId {
        let index = u32::try_from(self.nodes.len()).expect("forest capacity exceeded");
        self.nodes.push(NodeData {
            kind,
            data,
            parent: None,
            children: Vec::new(),
        });
        NodeId(index)
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn data(&self, id: NodeId) -> Option<&D> {
        self.node(id).data.as_ref()
    }

    /// A fresh childless node of the given kind, without payload.
    pub fn mk_node(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(kind, None)
    }

    /// A fresh predicate leaf carrying `data`.
    pub fn mk_predicate(&mut self, data: D) -> NodeId {
        self.alloc(NodeKind::Predicate, Some(data))
    }

    pub fn mk_true(&mut self) -> NodeId {
        self.alloc(NodeKind::True, None)
    }

    pub fn mk_false(&mut self) -> NodeId {
        self.alloc(NodeKind::False, None)
    }

    /// A conjunction over the given children.
    pub fn mk_and(&mut self, children: impl IntoIterator<Item = NodeId>) -> NodeId {
        let node = self.alloc(NodeKind::And, None);
        for child in children {
            self.attach(node, child);
        }
        node
    }

    /// A disjunction over the given children.
    pub fn mk_or(&mut self, children: impl IntoIterator<Item = NodeId>) -> NodeId {
        let node = self.alloc(NodeKind::Or, None);
        for child in children {
            self.attach(node, child);
        }
        node
    }

    /// A negation of the given child.
    pub fn mk_not(&mut self, child: NodeId) -> NodeId {
        let node = self.alloc(NodeKind::Not, None);
        self.attach(node, child);
        node
    }

    /// Appends `child` to `parent`'s children, detaching it from any prior
    /// parent first.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.attach(parent, child);
    }

    /// Detaches `child` from `parent` and clears its parent back-reference.
    /// No-op if `child` is not currently a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(parent, child);
    }

    /// Appends `child` to `parent`, detaching it from any prior parent.
    fn attach(&mut self, parent: NodeId, child: NodeId) {
        assert_ne!(parent, child, "a node cannot be its own child");

        if let Some(old) = self.node(child).parent {
            self.detach(old, child);
        }
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Detaches `child` from `parent`; no-op if not currently attached.
    fn detach(&mut self, parent: NodeId, child: NodeId) {
        let children = &mut self.node_mut(parent).children;
        if let Some(pos) = children.iter().position(|&c| c == child) {
            children.remove(pos);
            self.node_mut(child).parent = None;
        }
    }
}

impl<D: Eq> Forest<D> {
    /// Payload-only equality, ignoring kind and children.
    pub fn data_equivalent(&self, a: NodeId, b: NodeId) -> bool {
        self.node(a).data == self.node(b).data
    }

    /// Structural equality: kind, payload, and children as an unordered
    /// multiset. This is the identity notion used by the rewrite rules;
    /// it is not handle identity.
    pub fn structural_eq(&self, a: NodeId, b: NodeId) -> bool {
        if self.kind(a) != self.kind(b) || !self.data_equivalent(a, b) {
            return false;
        }
        let xs = self.children(a);
        let ys = self.children(b);
        if xs.len() != ys.len() {
            return false;
        }
        // Multiset comparison: each child of `a` claims one unclaimed
        // structurally-equal child of `b`.
        let mut used = vec![false; ys.len()];
        'outer: for &x in xs {
            for (i, &y) in ys.iter().enumerate() {
                if !used[i] && self.structural_eq(x, y) {
                    used[i] = true;
                    continue 'outer;
                }
            }
            return false;
        }
        true
    }
}

impl<D: Clone> Forest<D> {
    /// A fresh node with the prototype's kind and payload, no children.
    pub fn clone_node(&mut self, prototype: NodeId) -> NodeId {
        let kind = self.kind(prototype);
        let data = self.node(prototype).data.clone();
        self.alloc(kind, data)
    }

    /// A deep structural copy of the subtree with freshly owned descendants.
    pub fn clone_subtree(&mut self, subtree: NodeId) -> NodeId {
        let copy = self.clone_node(subtree);
        let children = self.node(subtree).children.clone();
        for child in children {
            let c = self.clone_subtree(child);
            self.attach(copy, c);
        }
        copy
    }
}

impl<D: Clone + Eq + fmt::Display> TreeLike for Forest<D> {
    type Id = NodeId;

    fn kind(&self, node: NodeId) -> NodeKind {
        Forest::kind(self, node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        Forest::children(self, node).to_vec()
    }

    fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.attach(parent, child);
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(parent, child);
    }

    fn data_equivalent(&self, a: NodeId, b: NodeId) -> bool {
        Forest::data_equivalent(self, a, b)
    }

    fn structural_eq(&self, a: NodeId, b: NodeId) -> bool {
        Forest::structural_eq(self, a, b)
    }

    fn data_label(&self, node: NodeId) -> Option<String> {
        self.data(node).map(|d| d.to_string())
    }
}

impl<D: Clone + Eq + fmt::Display> TreeFactory for Forest<D> {
    fn with_kind(&mut self, kind: NodeKind) -> NodeId {
        self.mk_node(kind)
    }

    fn from_prototype(&mut self, prototype: NodeId) -> NodeId {
        self.clone_node(prototype)
    }

    fn from_prototype_subtree(&mut self, subtree: NodeId) -> NodeId {
        self.clone_subtree(subtree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_child_reparents() {
        let mut forest: Forest<&str> = Forest::new();
        let p = forest.mk_predicate("p");
        let a = forest.mk_and([p]);
        assert_eq!(forest.parent(p), Some(a));

        let b = forest.mk_or([p]);
        assert_eq!(forest.parent(p), Some(b));
        assert!(forest.children(a).is_empty());
        assert_eq!(forest.children(b), &[p]);
    }

    #[test]
    fn test_remove_child_noop_when_absent() {
        let mut forest: Forest<&str> = Forest::new();
        let p = forest.mk_predicate("p");
        let q = forest.mk_predicate("q");
        let a = forest.mk_and([p]);
        forest.detach(a, q);
        assert_eq!(forest.children(a), &[p]);
        assert_eq!(forest.parent(q), None);
    }

    #[test]
    fn test_structural_eq_ignores_child_order() {
        let mut forest: Forest<&str> = Forest::new();
        let p1 = forest.mk_predicate("p");
        let q1 = forest.mk_predicate("q");
        let a = forest.mk_and([p1, q1]);

        let q2 = forest.mk_predicate("q");
        let p2 = forest.mk_predicate("p");
        let b = forest.mk_and([q2, p2]);

        assert!(forest.structural_eq(a, b));
        assert!(forest.structural_eq(b, a));
    }

    #[test]
    fn test_structural_eq_counts_duplicates() {
        let mut forest: Forest<&str> = Forest::new();
        let p1 = forest.mk_predicate("p");
        let p2 = forest.mk_predicate("p");
        let q1 = forest.mk_predicate("q");
        let a = forest.mk_and([p1, p2]);
        let b = forest.mk_and([q1]);
        assert!(!forest.structural_eq(a, b));

        let p3 = forest.mk_predicate("p");
        let q2 = forest.mk_predicate("q");
        let c = forest.mk_and([p3, q2]);
        // (p * p) vs (p * q): same length, different multiset
        assert!(!forest.structural_eq(a, c));
    }

    #[test]
    fn test_structural_eq_laws() {
        let mut forest: Forest<&str> = Forest::new();
        let make = |f: &mut Forest<&str>| {
            let p = f.mk_predicate("p");
            let q = f.mk_predicate("q");
            let nq = f.mk_not(q);
            f.mk_or([p, nq])
        };
        let a = make(&mut forest);
        let b = make(&mut forest);
        let c = make(&mut forest);

        // reflexive, symmetric, transitive
        assert!(forest.structural_eq(a, a));
        assert!(forest.structural_eq(a, b) && forest.structural_eq(b, a));
        assert!(forest.structural_eq(b, c) && forest.structural_eq(a, c));
    }

    #[test]
    fn test_data_equivalent_ignores_kind() {
        let mut forest: Forest<&str> = Forest::new();
        let p = forest.mk_predicate("p");
        let p2 = forest.mk_predicate("p");
        let q = forest.mk_predicate("q");
        let t = forest.mk_true();
        let f = forest.mk_false();

        assert!(forest.data_equivalent(p, p2));
        assert!(!forest.data_equivalent(p, q));
        // no payload on either side counts as equivalent
        assert!(forest.data_equivalent(t, f));
    }

    #[test]
    fn test_clone_subtree_is_independent() {
        let mut forest: Forest<&str> = Forest::new();
        let p = forest.mk_predicate("p");
        let q = forest.mk_predicate("q");
        let a = forest.mk_and([p, q]);

        let copy = forest.clone_subtree(a);
        assert_ne!(copy, a);
        assert!(forest.structural_eq(copy, a));
        assert_eq!(forest.parent(copy), None);

        // mutating the copy leaves the original alone
        let first = forest.children(copy)[0];
        forest.detach(copy, first);
        assert_eq!(forest.children(a).len(), 2);
        assert!(!forest.structural_eq(copy, a));
    }

    #[test]
    fn test_clone_node_drops_children() {
        let mut forest: Forest<&str> = Forest::new();
        let p = forest.mk_predicate("p");
        let a = forest.mk_and([p]);
        let copy = forest.clone_node(a);
        assert_eq!(forest.kind(copy), NodeKind::And);
        assert!(forest.children(copy).is_empty());
        assert_eq!(forest.children(a), &[p]);
    }
}
