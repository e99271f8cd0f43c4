//! # bas-rs: Boolean Algebra Simplification in Rust
//!
//! **`bas-rs`** simplifies boolean expression trees --- propositional formulas built from
//! conjunction, disjunction, negation, constants, and atomic predicates --- into equivalent
//! but smaller and shallower forms.
//!
//! ## How it works
//!
//! The engine repeatedly applies a fixed catalogue of eleven algebraic rewrite rules
//! (De Morgan, double negation, idempotence, absorption, distribution, complements, ...),
//! chosen by a bounded-lookahead local search: every way of applying one rule to one node
//! yields a candidate tree, candidates may be rewritten again up to the lookahead depth,
//! and the cheapest candidate by `depth + size` becomes the next working tree. The loop
//! stops at a local fixed point. This is simplification, not SAT solving: the result is
//! logically equivalent to the input, but only locally minimal.
//!
//! ## Key Features
//!
//! - **Arena-Backed Trees**: Nodes live in a [`Forest`][crate::forest::Forest] arena and are
//!   addressed by lightweight [`NodeId`][crate::forest::NodeId] handles, giving every node a
//!   stable identity distinct from its structural value.
//! - **Pluggable Node Stores**: The engine is written against the
//!   [`TreeLike`][crate::tree::TreeLike]/[`TreeFactory`][crate::tree::TreeFactory] traits,
//!   so any store satisfying the contract can be simplified.
//! - **Closed Rule Catalogue**: The rules are a [`Rule`][crate::rules::Rule] enumeration
//!   dispatched by exhaustive `match`, so adding or removing a rule is a compile-time-checked
//!   change.
//! - **Checkable Semantics**: [`eval`] provides exhaustive truth-table evaluation,
//!   equivalence checking, and model counting for small trees.
//!
//! ## Basic Usage
//!
//! ```rust
//! use bas_rs::forest::Forest;
//! use bas_rs::pretty::pretty_print;
//! use bas_rs::solver::Solver;
//!
//! // 1. Build a tree: p + (p * q)
//! let mut forest: Forest<&str> = Forest::new();
//! let p1 = forest.mk_predicate("p");
//! let p2 = forest.mk_predicate("p");
//! let q = forest.mk_predicate("q");
//! let conj = forest.mk_and([p2, q]);
//! let input = forest.mk_or([p1, conj]);
//!
//! // 2. Simplify with a lookahead of two rule applications
//! let solver = Solver::new(2);
//! let result = solver.solve(&mut forest, input);
//!
//! // 3. Absorption: p + (p * q) == p
//! assert_eq!(pretty_print(&forest, result), "p");
//! assert!(forest.equivalent(input, result));
//! ```
//!
//! ## Core Components
//!
//! - **[`solver`]**: The heart of the library: permutation search and the solve loop.
//! - **[`rules`]**: The rewrite rule catalogue.
//! - **[`forest`]**: The arena node store.
//! - **[`pretty`]**: Parenthesized infix rendering for debugging and display.

pub mod eval;
pub mod forest;
pub mod pretty;
pub mod rules;
pub mod solver;
pub mod tree;
pub mod types;
