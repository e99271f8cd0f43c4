//! Truth-table semantics for expression trees.
//!
//! Exhaustive evaluation over all predicate assignments. Exponential in the
//! number of distinct predicates, so intended for small trees: equivalence
//! checking in tests, sanity checks on rewrites, and model counting.

use std::collections::HashMap;
use std::hash::Hash;

use num_bigint::BigUint;

use crate::forest::{Forest, NodeId};
use crate::types::NodeKind;

impl<D: Clone + Eq + Hash> Forest<D> {
    /// Evaluates the subtree at `node` under the given predicate
    /// assignment. Unassigned predicates evaluate to false. An empty
    /// conjunction is true and an empty disjunction is false.
    ///
    /// # Panics
    ///
    /// Panics on a `Not` or `Null` node without exactly one child.
    pub fn evaluate(&self, node: NodeId, assignment: &HashMap<D, bool>) -> bool {
        match self.kind(node) {
            NodeKind::True => true,
            NodeKind::False => false,
            NodeKind::Predicate => {
                let data = self.data(node).expect("predicate node carries data");
                assignment.get(data).copied().unwrap_or(false)
            }
            NodeKind::Not => {
                let children = self.children(node);
                assert_eq!(children.len(), 1, "negation must have exactly one operand");
                !self.evaluate(children[0], assignment)
            }
            NodeKind::And => self
                .children(node)
                .iter()
                .all(|&child| self.evaluate(child, assignment)),
            NodeKind::Or => self
                .children(node)
                .iter()
                .any(|&child| self.evaluate(child, assignment)),
            NodeKind::Null => {
                let children = self.children(node);
                assert_eq!(children.len(), 1, "sentinel must wrap exactly one tree");
                self.evaluate(children[0], assignment)
            }
        }
    }

    /// Distinct predicate payloads of the subtree, in first-visit order.
    pub fn predicates(&self, node: NodeId) -> Vec<D> {
        let mut seen = Vec::new();
        self.collect_predicates(node, &mut seen);
        seen
    }

    fn collect_predicates(&self, node: NodeId, seen: &mut Vec<D>) {
        if self.kind(node) == NodeKind::Predicate {
            let data = self.data(node).expect("predicate node carries data");
            if !seen.contains(data) {
                seen.push(data.clone());
            }
        }
        for &child in self.children(node) {
            self.collect_predicates(child, seen);
        }
    }

    /// The number of assignments of the subtree's distinct predicates that
    /// satisfy it.
    pub fn sat_count(&self, node: NodeId) -> BigUint {
        let vars = self.predicates(node);
        let mut count = BigUint::ZERO;
        for assignment in assignments(&vars) {
            if self.evaluate(node, &assignment) {
                count += 1u32;
            }
        }
        count
    }

    /// True iff the two subtrees agree under every assignment of their
    /// combined predicates.
    pub fn equivalent(&self, a: NodeId, b: NodeId) -> bool {
        let mut vars = self.predicates(a);
        for var in self.predicates(b) {
            if !vars.contains(&var) {
                vars.push(var);
            }
        }
        let equivalent = assignments(&vars)
            .all(|assignment| self.evaluate(a, &assignment) == self.evaluate(b, &assignment));
        equivalent
    }
}

/// All truth assignments over the given predicates.
fn assignments<D: Clone + Eq + Hash>(vars: &[D]) -> impl Iterator<Item = HashMap<D, bool>> + '_ {
    let n = vars.len();
    assert!(n < 64, "too many predicates for exhaustive evaluation");
    (0u64..1 << n).map(move |bits| {
        vars.iter()
            .enumerate()
            .map(|(i, var)| (var.clone(), bits >> i & 1 == 1))
            .collect()
    })
}
