//! The bounded-lookahead simplification engine.
//!
//! [`Solver::solve`] wraps the input under a sentinel root, then repeatedly
//! runs a permutation search: every way of applying one catalogue rule to
//! one node yields a candidate tree, and candidates may be rewritten again
//! up to the configured lookahead depth. The cheapest candidate (by
//! `depth + size`) becomes the next working tree; the loop stops at a local
//! fixed point, when neither metric improves.

use log::debug;

use crate::rules::Rule;
use crate::tree::{TreeFactory, TreeLike};
use crate::types::NodeKind;

/// One rewrite on the way to a candidate: the rule name and deep copies of
/// the whole tree before and after. Diagnostics only; never consulted for
/// correctness.
#[derive(Debug, Clone)]
pub struct TransformRecord<Id> {
    pub name: &'static str,
    pub before: Id,
    pub after: Id,
}

/// A candidate tree paired with the rewrites that produced it.
#[derive(Debug, Clone)]
pub struct Candidate<Id> {
    pub root: Id,
    pub transforms: Vec<TransformRecord<Id>>,
}

/// The simplification engine.
///
/// # Examples
///
/// ```
/// use bas_rs::forest::Forest;
/// use bas_rs::pretty::pretty_print;
/// use bas_rs::solver::Solver;
///
/// let mut forest: Forest<&str> = Forest::new();
/// let p1 = forest.mk_predicate("p");
/// let p2 = forest.mk_predicate("p");
/// let input = forest.mk_or([p1, p2]);
///
/// let solver = Solver::new(2);
/// let result = solver.solve(&mut forest, input);
/// assert_eq!(pretty_print(&forest, result), "p");
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Solver {
    look_ahead: usize,
}

impl Solver {
    /// Creates a solver exploring up to `look_ahead` composed rule
    /// applications per search round.
    ///
    /// # Panics
    ///
    /// Panics if `look_ahead` is zero.
    pub fn new(look_ahead: usize) -> Self {
        assert!(look_ahead >= 1, "look-ahead depth must be at least 1");
        Self { look_ahead }
    }

    /// Simplifies the tree rooted at `input` and returns the simplified
    /// root. The input subtree is not mutated; the result is built from
    /// fresh copies (or is `input` itself when nothing improves).
    pub fn solve<T: TreeFactory>(&self, tree: &mut T, input: T::Id) -> T::Id {
        // The sentinel gives every real node a parent during the search.
        let root = tree.with_kind(NodeKind::Null);
        tree.add_child(root, input);
        let mut working = Candidate {
            root,
            transforms: Vec::new(),
        };

        let mut size = count_expressions(tree, working.root);
        let mut depth = tree_depth(tree, working.root);
        debug!("solve: start with size = {}, depth = {}", size, depth);

        let mut candidates: Vec<Candidate<T::Id>> = Vec::new();
        loop {
            self.generate_permutations(tree, &mut candidates, 1, &working);

            // Keep the first candidate attaining the minimal cost, so ties
            // go to earlier generation order (identity first).
            let mut best = 0;
            let mut best_cost = usize::MAX;
            for (i, candidate) in candidates.iter().enumerate() {
                let cost =
                    tree_depth(tree, candidate.root) + count_expressions(tree, candidate.root);
                if cost < best_cost {
                    best = i;
                    best_cost = cost;
                }
            }
            working = candidates[best].clone();

            let new_depth = tree_depth(tree, working.root);
            let new_size = count_expressions(tree, working.root);
            debug!(
                "solve: picked candidate {}/{} with size = {}, depth = {}, via {:?}",
                best,
                candidates.len(),
                new_size,
                new_depth,
                working.transforms.iter().map(|t| t.name).collect::<Vec<_>>(),
            );

            let progress = new_depth < depth || new_size < size;
            depth = new_depth;
            size = new_size;
            candidates.clear();
            if !progress {
                break;
            }
        }

        let children = tree.children(working.root);
        assert!(!children.is_empty(), "working tree collapsed to nothing");
        children[0]
    }

    /// Emits the identity candidate, then one candidate per (node, rule)
    /// match found in a post-order walk, recursing on each candidate until
    /// the lookahead depth is exhausted.
    fn generate_permutations<T: TreeFactory>(
        &self,
        tree: &mut T,
        result: &mut Vec<Candidate<T::Id>>,
        current_depth: usize,
        parent: &Candidate<T::Id>,
    ) {
        // The unmodified tree stays in contention.
        let before = tree.from_prototype_subtree(parent.root);
        let after = tree.from_prototype_subtree(parent.root);
        result.push(Candidate {
            root: parent.root,
            transforms: vec![TransformRecord {
                name: "identity",
                before,
                after,
            }],
        });

        for target in post_order(tree, parent.root) {
            for rule in Rule::ALL {
                if !rule.applies(tree, target) {
                    continue;
                }

                let before = tree.from_prototype_subtree(parent.root);
                let Some(root) = self.copy_rewritten(tree, parent.root, target, rule) else {
                    unreachable!("the sentinel root is never a rewrite target");
                };
                let after = tree.from_prototype_subtree(root);

                let mut transforms = parent.transforms.clone();
                transforms.push(TransformRecord {
                    name: rule.name(),
                    before,
                    after,
                });
                let candidate = Candidate { root, transforms };
                result.push(candidate.clone());

                if current_depth < self.look_ahead {
                    self.generate_permutations(tree, result, current_depth + 1, &candidate);
                }
            }
        }
    }

    /// Copies the subtree at `root`, applying `rule` to the copy of the one
    /// node identified by `target`. Targeting is by node identity, not
    /// structural equality, so identical siblings are left alone.
    ///
    /// Returns `None` when the transform deletes `root` itself; a deleted
    /// descendant simply leaves no slot behind in its copied parent.
    fn copy_rewritten<T: TreeFactory>(
        &self,
        tree: &mut T,
        root: T::Id,
        target: T::Id,
        rule: Rule,
    ) -> Option<T::Id> {
        let copy = tree.from_prototype(root);
        let children = tree.children(root);
        let mut copied = Vec::with_capacity(children.len());
        for child in children {
            if let Some(c) = self.copy_rewritten(tree, child, target, rule) {
                copied.push(c);
            }
        }
        tree.add_children(copy, copied);

        if root == target {
            rule.apply(tree, copy)
        } else {
            Some(copy)
        }
    }
}

/// The nodes of the subtree at `root` in post order (children before
/// parents, the traversal order of the permutation search).
pub fn post_order<T: TreeLike>(tree: &T, root: T::Id) -> Vec<T::Id> {
    let mut order = Vec::new();
    post_order_into(tree, root, &mut order);
    order
}

fn post_order_into<T: TreeLike>(tree: &T, node: T::Id, order: &mut Vec<T::Id>) {
    for child in tree.children(node) {
        post_order_into(tree, child, order);
    }
    order.push(node);
}

/// Total node count of the subtree at `root`.
pub fn count_expressions<T: TreeLike>(tree: &T, root: T::Id) -> usize {
    tree.children(root)
        .into_iter()
        .map(|child| count_expressions(tree, child))
        .sum::<usize>()
        + 1
}

/// The depth cost of the subtree at `root`: the maximum, over all predicate
/// leaves, of the number of nodes on the path from `root` to the predicate.
/// Subtrees without predicates contribute zero.
pub fn tree_depth<T: TreeLike>(tree: &T, root: T::Id) -> usize {
    depth_below(tree, root, 0)
}

fn depth_below<T: TreeLike>(tree: &T, node: T::Id, above: usize) -> usize {
    if tree.kind(node) == NodeKind::Predicate {
        above + 1
    } else {
        tree.children(node)
            .into_iter()
            .map(|child| depth_below(tree, child, above + 1))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::forest::{Forest, NodeId};
    use crate::pretty::pretty_print;

    #[test]
    fn test_metrics() {
        let mut forest: Forest<&str> = Forest::new();
        let p = forest.mk_predicate("p");
        let q = forest.mk_predicate("q");
        let nq = forest.mk_not(q);
        let input = forest.mk_and([p, nq]);

        assert_eq!(count_expressions(&forest, input), 4);
        // and -> not -> q is the longest predicate path
        assert_eq!(tree_depth(&forest, input), 3);

        let t = forest.mk_true();
        assert_eq!(count_expressions(&forest, t), 1);
        assert_eq!(tree_depth(&forest, t), 0);
    }

    #[test]
    fn test_post_order_children_first() {
        let mut forest: Forest<&str> = Forest::new();
        let p = forest.mk_predicate("p");
        let q = forest.mk_predicate("q");
        let inner = forest.mk_or([p, q]);
        let root = forest.mk_and([inner]);

        assert_eq!(post_order(&forest, root), vec![p, q, inner, root]);
    }

    #[test]
    fn test_solve_idempotent_then_degenerate() {
        let mut forest: Forest<&str> = Forest::new();
        let p1 = forest.mk_predicate("p");
        let p2 = forest.mk_predicate("p");
        let input = forest.mk_or([p1, p2]);

        let result = Solver::new(2).solve(&mut forest, input);
        assert_eq!(pretty_print(&forest, result), "p");
    }

    #[test]
    fn test_solve_double_negation() {
        let mut forest: Forest<&str> = Forest::new();
        let p = forest.mk_predicate("p");
        let inner = forest.mk_not(p);
        let input = forest.mk_not(inner);

        let result = Solver::new(1).solve(&mut forest, input);
        assert_eq!(pretty_print(&forest, result), "p");
    }

    #[test]
    fn test_solve_complement_to_true() {
        let mut forest: Forest<&str> = Forest::new();
        let p1 = forest.mk_predicate("p");
        let p2 = forest.mk_predicate("p");
        let np = forest.mk_not(p2);
        let input = forest.mk_or([p1, np]);

        let result = Solver::new(1).solve(&mut forest, input);
        assert_eq!(pretty_print(&forest, result), "T");
    }

    #[test]
    fn test_solve_negated_constant_at_top() {
        let mut forest: Forest<&str> = Forest::new();
        let f = forest.mk_false();
        let input = forest.mk_not(f);

        let result = Solver::new(1).solve(&mut forest, input);
        assert_eq!(pretty_print(&forest, result), "T");
    }

    #[test]
    fn test_solve_absorption_shrinks_equivalent() {
        let mut forest: Forest<&str> = Forest::new();
        let p1 = forest.mk_predicate("p");
        let q = forest.mk_predicate("q");
        let p2 = forest.mk_predicate("p");
        let np = forest.mk_not(p2);
        let disj = forest.mk_or([q, np]);
        let input = forest.mk_and([p1, disj]);

        let original = forest.clone_subtree(input);
        let original_size = count_expressions(&forest, original);
        let original_depth = tree_depth(&forest, original);

        let result = Solver::new(3).solve(&mut forest, input);
        println!(
            "{} => {}",
            pretty_print(&forest, original),
            pretty_print(&forest, result)
        );

        assert!(forest.equivalent(original, result));
        assert!(count_expressions(&forest, result) < original_size);
        assert!(tree_depth(&forest, result) <= original_depth);
    }

    #[test]
    fn test_solve_is_idempotent() {
        let inputs: Vec<fn(&mut Forest<&'static str>) -> NodeId> = vec![
            |f| {
                let p1 = f.mk_predicate("p");
                let p2 = f.mk_predicate("p");
                f.mk_or([p1, p2])
            },
            |f| {
                let p = f.mk_predicate("p");
                let np = f.mk_not(p);
                f.mk_not(np)
            },
            |f| {
                let p = f.mk_predicate("p");
                let q = f.mk_predicate("q");
                let r = f.mk_predicate("r");
                let disj = f.mk_or([q, r]);
                f.mk_and([p, disj])
            },
            |f| {
                let p1 = f.mk_predicate("p");
                let q = f.mk_predicate("q");
                let p2 = f.mk_predicate("p");
                let conj = f.mk_and([p2, q]);
                f.mk_or([p1, conj])
            },
        ];

        for build in inputs {
            let mut forest: Forest<&str> = Forest::new();
            let input = build(&mut forest);
            let solver = Solver::new(2);
            let once = solver.solve(&mut forest, input);
            let again = solver.solve(&mut forest, once);
            println!(
                "once = {}, again = {}",
                pretty_print(&forest, once),
                pretty_print(&forest, again)
            );
            assert!(forest.structural_eq(once, again));
        }
    }

    #[test]
    fn test_solve_preserves_meaning_and_never_grows() {
        let inputs: Vec<fn(&mut Forest<&'static str>) -> NodeId> = vec![
            |f| {
                let a = f.mk_predicate("a");
                let b = f.mk_predicate("b");
                let na = f.mk_not(a);
                let nb = f.mk_not(b);
                f.mk_or([na, nb])
            },
            |f| {
                let p = f.mk_predicate("p");
                let q = f.mk_predicate("q");
                let inner = f.mk_and([p, q]);
                let r = f.mk_predicate("r");
                f.mk_and([inner, r])
            },
            |f| {
                let p1 = f.mk_predicate("p");
                let q = f.mk_predicate("q");
                let p2 = f.mk_predicate("p");
                let r = f.mk_predicate("r");
                let left = f.mk_and([p1, q]);
                let right = f.mk_and([p2, r]);
                f.mk_or([left, right])
            },
            |f| {
                let t = f.mk_true();
                let p = f.mk_predicate("p");
                f.mk_or([p, t])
            },
        ];

        for build in inputs {
            let mut forest: Forest<&str> = Forest::new();
            let input = build(&mut forest);
            let original = forest.clone_subtree(input);
            let original_size = count_expressions(&forest, original);
            let original_depth = tree_depth(&forest, original);

            let result = Solver::new(2).solve(&mut forest, input);
            println!(
                "{} => {}",
                pretty_print(&forest, original),
                pretty_print(&forest, result)
            );

            assert!(forest.equivalent(original, result));
            assert!(count_expressions(&forest, result) <= original_size);
            assert!(tree_depth(&forest, result) <= original_depth);
        }
    }

    #[test]
    fn test_solve_leaves_fixed_point_alone() {
        let mut forest: Forest<&str> = Forest::new();
        let p = forest.mk_predicate("p");
        let q = forest.mk_predicate("q");
        let input = forest.mk_and([p, q]);

        let result = Solver::new(2).solve(&mut forest, input);
        assert_eq!(pretty_print(&forest, result), "(p * q)");
    }

    #[test]
    #[should_panic(expected = "look-ahead depth must be at least 1")]
    fn test_zero_look_ahead_panics() {
        Solver::new(0);
    }
}
