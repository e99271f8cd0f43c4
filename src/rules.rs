//! The rewrite rule catalogue.
//!
//! Each rule is a (condition, transform) pair over a single node. Conditions
//! are side-effect free; transforms may mutate the node they are given and
//! its descendants, may hand back a different replacement node, or may
//! signal deletion by returning `None`. The search machinery only ever
//! applies a transform to a freshly copied subtree, so the working tree is
//! never mutated in place.
//!
//! Conditions are strict enough that their paired transform never touches
//! missing structure; violating that is a defect, not a recoverable error.

use log::debug;

use crate::tree::{TreeFactory, TreeLike};
use crate::types::NodeKind;

/// The eleven algebraic rewrite rules.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Rule {
    /// `¬(a ∧ b) ≡ ¬a ∨ ¬b` and its dual, in both directions.
    DeMorgan,
    /// A composite with fewer than two children collapses to its child
    /// (or disappears entirely).
    DegenerateComposite,
    /// `¬¬a ≡ a`.
    DoubleNegation,
    /// `a ∧ a ≡ a`: duplicate children are dropped.
    IdempotentComposite,
    /// Same-kind children are flattened into their parent.
    CollapsibleComposite,
    /// `(a∧b) ∨ (a∧c) ≡ a ∧ (b∨c)`: a shared grandchild is factored out.
    CommonTermExtraction,
    /// `a ∧ (b∨c) ≡ (a∧b) ∨ (a∧c)`: a term is pushed into an opposite-kind
    /// child.
    TermDistribution,
    /// `a ∨ (a∧b) ≡ a`: an opposite-kind child implied by a sibling is
    /// dropped.
    Absorption,
    /// `a ∨ ¬a ≡ true`, `a ∧ ¬a ≡ false`.
    CompositeComplement,
    /// `¬true ≡ false`, `¬false ≡ true`.
    BasicComplement,
    /// `a ∨ true ≡ true`, `a ∧ false ≡ false`.
    CompositeWithConstant,
}

impl Rule {
    /// The catalogue in application order.
    ///
    /// The order is observable: cost ties during search are broken by
    /// generation order, which follows this table.
    pub const ALL: [Rule; 11] = [
        Rule::DeMorgan,
        Rule::DegenerateComposite,
        Rule::DoubleNegation,
        Rule::IdempotentComposite,
        Rule::CollapsibleComposite,
        Rule::CommonTermExtraction,
        Rule::TermDistribution,
        Rule::Absorption,
        Rule::CompositeComplement,
        Rule::BasicComplement,
        Rule::CompositeWithConstant,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rule::DeMorgan => "De Morgan's Law",
            Rule::DegenerateComposite => "Degenerate Composite",
            Rule::DoubleNegation => "Double Negative",
            Rule::IdempotentComposite => "Idempotent Composite",
            Rule::CollapsibleComposite => "Collapsible Composite",
            Rule::CommonTermExtraction => "Common Term Extraction",
            Rule::TermDistribution => "Term Distribution",
            Rule::Absorption => "Absorption",
            Rule::CompositeComplement => "Composite Complement",
            Rule::BasicComplement => "Basic Complement",
            Rule::CompositeWithConstant => "Composite With Constant",
        }
    }

    /// Does this rule's condition hold on `node`?
    pub fn applies<T: TreeLike>(self, tree: &T, node: T::Id) -> bool {
        match self {
            Rule::DeMorgan => de_morgan_applies(tree, node),
            Rule::DegenerateComposite => degenerate_applies(tree, node),
            Rule::DoubleNegation => double_negation_applies(tree, node),
            Rule::IdempotentComposite => idempotent_applies(tree, node),
            Rule::CollapsibleComposite => collapsible_applies(tree, node),
            Rule::CommonTermExtraction => common_term_applies(tree, node),
            Rule::TermDistribution => distribution_applies(tree, node),
            Rule::Absorption => absorption_applies(tree, node),
            Rule::CompositeComplement => complement_applies(tree, node),
            Rule::BasicComplement => basic_complement_applies(tree, node),
            Rule::CompositeWithConstant => constant_applies(tree, node),
        }
    }

    /// Applies the transform to `node`, whose condition must hold.
    ///
    /// Returns the replacement node, or `None` when the node is deleted
    /// outright. The replacement may be `node` itself (mutated), one of its
    /// descendants, or a freshly built subtree.
    pub fn apply<T: TreeFactory>(self, tree: &mut T, node: T::Id) -> Option<T::Id> {
        debug!("apply {:?} at {:?}", self, node);
        match self {
            Rule::DeMorgan => Some(de_morgan_apply(tree, node)),
            Rule::DegenerateComposite => tree.children(node).first().copied(),
            Rule::DoubleNegation => double_negation_apply(tree, node),
            Rule::IdempotentComposite => Some(idempotent_apply(tree, node)),
            Rule::CollapsibleComposite => Some(collapsible_apply(tree, node)),
            Rule::CommonTermExtraction => Some(common_term_apply(tree, node)),
            Rule::TermDistribution => Some(distribution_apply(tree, node)),
            Rule::Absorption => Some(absorption_apply(tree, node)),
            Rule::CompositeComplement => Some(complement_apply(tree, node)),
            Rule::BasicComplement => Some(basic_complement_apply(tree, node)),
            Rule::CompositeWithConstant => Some(constant_apply(tree, node)),
        }
    }
}

fn de_morgan_applies<T: TreeLike>(tree: &T, node: T::Id) -> bool {
    let children = tree.children(node);

    // ¬(a ∘ b)
    let negated_composite = tree.kind(node) == NodeKind::Not
        && !children.is_empty()
        && tree.kind(children[0]).is_composite()
        && tree.children(children[0]).len() == 2;

    // (¬a) ∘ (¬b)
    let composite_of_negations = tree.kind(node).is_composite()
        && children.len() == 2
        && children
            .iter()
            .all(|&c| tree.kind(c) == NodeKind::Not && !tree.children(c).is_empty());

    negated_composite || composite_of_negations
}

fn de_morgan_apply<T: TreeFactory>(tree: &mut T, node: T::Id) -> T::Id {
    let children = tree.children(node);
    if tree.kind(node).is_composite() {
        // (¬a) ∘ (¬b)  =>  ¬(a ∘' b)
        let a = tree.children(children[0])[0];
        let b = tree.children(children[1])[0];
        let flipped = tree.kind(node).flip();
        let inner = tree.with_kind(flipped);
        tree.add_children(inner, vec![a, b]);
        let negation = tree.with_kind(NodeKind::Not);
        tree.add_child(negation, inner);
        negation
    } else {
        // ¬(a ∘ b)  =>  (¬a) ∘' (¬b)
        let composite = children[0];
        let operands = tree.children(composite);
        let flipped = tree.kind(composite).flip();
        let not_a = tree.with_kind(NodeKind::Not);
        tree.add_child(not_a, operands[0]);
        let not_b = tree.with_kind(NodeKind::Not);
        tree.add_child(not_b, operands[1]);
        let result = tree.with_kind(flipped);
        tree.add_children(result, vec![not_a, not_b]);
        result
    }
}

fn degenerate_applies<T: TreeLike>(tree: &T, node: T::Id) -> bool {
    tree.kind(node).is_composite() && tree.children(node).len() < 2
}

fn double_negation_applies<T: TreeLike>(tree: &T, node: T::Id) -> bool {
    let children = tree.children(node);
    tree.kind(node) == NodeKind::Not
        && !children.is_empty()
        && tree.kind(children[0]) == NodeKind::Not
}

fn double_negation_apply<T: TreeFactory>(tree: &mut T, node: T::Id) -> Option<T::Id> {
    let inner = tree.children(node)[0];
    tree.children(inner).first().copied()
}

fn idempotent_applies<T: TreeLike>(tree: &T, node: T::Id) -> bool {
    if !tree.kind(node).is_composite() {
        return false;
    }
    let children = tree.children(node);
    children.iter().enumerate().any(|(i, &a)| {
        children[i + 1..]
            .iter()
            .any(|&b| tree.structural_eq(a, b))
    })
}

fn idempotent_apply<T: TreeFactory>(tree: &mut T, node: T::Id) -> T::Id {
    let children = tree.children(node);
    for &child in &children {
        tree.remove_child(node, child);
    }
    // keep the first occurrence of each distinct subtree
    let mut kept: Vec<T::Id> = Vec::new();
    for child in children {
        if !kept.iter().any(|&k| tree.structural_eq(k, child)) {
            kept.push(child);
        }
    }
    tree.add_children(node, kept);
    node
}

fn collapsible_applies<T: TreeLike>(tree: &T, node: T::Id) -> bool {
    let kind = tree.kind(node);
    kind.is_composite() && tree.children(node).iter().any(|&c| tree.kind(c) == kind)
}

fn collapsible_apply<T: TreeFactory>(tree: &mut T, node: T::Id) -> T::Id {
    let kind = tree.kind(node);
    let same_kind: Vec<T::Id> = tree
        .children(node)
        .into_iter()
        .filter(|&c| tree.kind(c) == kind)
        .collect();
    for &child in &same_kind {
        tree.remove_child(node, child);
    }
    for child in same_kind {
        let grandchildren = tree.children(child);
        tree.add_children(node, grandchildren);
    }
    node
}

/// Children of the first composite that are structurally present in every
/// other composite as well.
fn common_terms<T: TreeLike>(tree: &T, composites: &[T::Id]) -> Vec<T::Id> {
    let mut common = tree.children(composites[0]);
    for &other in &composites[1..] {
        let other_children = tree.children(other);
        common.retain(|&term| other_children.iter().any(|&c| tree.structural_eq(term, c)));
    }
    common
}

fn common_term_applies<T: TreeLike>(tree: &T, node: T::Id) -> bool {
    if !tree.kind(node).is_composite() {
        return false;
    }
    let flip = tree.kind(node).flip();
    let opposites: Vec<T::Id> = tree
        .children(node)
        .into_iter()
        .filter(|&c| tree.kind(c) == flip)
        .collect();
    opposites.len() > 1 && !common_terms(tree, &opposites).is_empty()
}

fn common_term_apply<T: TreeFactory>(tree: &mut T, node: T::Id) -> T::Id {
    let kind = tree.kind(node);
    let flip = kind.flip();
    let opposites: Vec<T::Id> = tree
        .children(node)
        .into_iter()
        .filter(|&c| tree.kind(c) == flip)
        .collect();
    for &composite in &opposites {
        tree.remove_child(node, composite);
    }

    let common = common_terms(tree, &opposites);
    let common_term = common[0];

    let new_opposite = tree.with_kind(flip);
    let new_same = tree.with_kind(kind);

    for &composite in &opposites {
        // drop this composite's structural copy of the common term
        let matched = tree
            .children(composite)
            .into_iter()
            .find(|&c| tree.structural_eq(c, common_term));
        if let Some(matched) = matched {
            tree.remove_child(composite, matched);
        }
        let rest = tree.children(composite);
        match rest.len() {
            0 => {}
            1 => tree.add_child(new_same, rest[0]),
            _ => tree.add_child(new_same, composite),
        }
    }

    tree.add_child(new_opposite, common_term);
    tree.add_child(new_opposite, new_same);
    tree.add_child(node, new_opposite);
    node
}

fn distribution_applies<T: TreeLike>(tree: &T, node: T::Id) -> bool {
    let kind = tree.kind(node);
    if !kind.is_composite() {
        return false;
    }
    let children = tree.children(node);
    children.len() > 1 && children.iter().any(|&c| tree.kind(c) == kind.flip())
}

fn distribution_apply<T: TreeFactory>(tree: &mut T, node: T::Id) -> T::Id {
    let kind = tree.kind(node);
    let flip = kind.flip();
    let children = tree.children(node);
    let opposite = children
        .iter()
        .copied()
        .find(|&c| tree.kind(c) == flip)
        .expect("distribution requires an opposite-kind child");
    let others: Vec<T::Id> = children.into_iter().filter(|&c| c != opposite).collect();

    let result = tree.with_kind(flip);
    for grandchild in tree.children(opposite) {
        let term = tree.with_kind(kind);
        tree.add_child(term, grandchild);
        for &other in &others {
            let copy = tree.from_prototype_subtree(other);
            tree.add_child(term, copy);
        }
        tree.add_child(result, term);
    }
    result
}

fn absorption_applies<T: TreeLike>(tree: &T, node: T::Id) -> bool {
    let kind = tree.kind(node);
    let children = tree.children(node);
    if !kind.is_composite() || children.len() < 2 {
        return false;
    }
    let flip = kind.flip();
    let (opposites, others): (Vec<T::Id>, Vec<T::Id>) = children
        .into_iter()
        .partition(|&c| tree.kind(c) == flip && !tree.children(c).is_empty());
    opposites.iter().any(|&composite| {
        tree.children(composite)
            .iter()
            .any(|&inner| others.iter().any(|&other| tree.structural_eq(other, inner)))
    })
}

fn absorption_apply<T: TreeFactory>(tree: &mut T, node: T::Id) -> T::Id {
    let flip = tree.kind(node).flip();
    let (opposites, others): (Vec<T::Id>, Vec<T::Id>) = tree
        .children(node)
        .into_iter()
        .partition(|&c| tree.kind(c) == flip && !tree.children(c).is_empty());
    for composite in opposites {
        let absorbed = tree
            .children(composite)
            .iter()
            .any(|&inner| others.iter().any(|&other| tree.structural_eq(other, inner)));
        if absorbed {
            tree.remove_child(node, composite);
        }
    }
    node
}

fn complement_applies<T: TreeLike>(tree: &T, node: T::Id) -> bool {
    if !tree.kind(node).is_composite() {
        return false;
    }
    let (negations, others): (Vec<T::Id>, Vec<T::Id>) = tree
        .children(node)
        .into_iter()
        .partition(|&c| tree.kind(c) == NodeKind::Not);
    negations.iter().any(|&negation| {
        tree.children(negation)
            .iter()
            .any(|&inner| others.iter().any(|&other| tree.structural_eq(other, inner)))
    })
}

fn complement_apply<T: TreeFactory>(tree: &mut T, node: T::Id) -> T::Id {
    for child in tree.children(node) {
        tree.remove_child(node, child);
    }
    let constant = if tree.kind(node) == NodeKind::Or {
        tree.with_kind(NodeKind::True)
    } else {
        tree.with_kind(NodeKind::False)
    };
    tree.add_child(node, constant);
    node
}

fn negated_constant<T: TreeLike>(tree: &T, child: T::Id) -> bool {
    if tree.kind(child) != NodeKind::Not {
        return false;
    }
    let inner = tree.children(child);
    !inner.is_empty() && tree.kind(inner[0]).is_constant()
}

fn basic_complement_applies<T: TreeLike>(tree: &T, node: T::Id) -> bool {
    // Deliberately unrestricted on the node's own kind: a negated constant
    // is rewritten wherever it appears in a child list, including directly
    // under the sentinel root.
    tree.children(node)
        .iter()
        .any(|&c| negated_constant(tree, c))
}

fn basic_complement_apply<T: TreeFactory>(tree: &mut T, node: T::Id) -> T::Id {
    let matching: Vec<T::Id> = tree
        .children(node)
        .into_iter()
        .filter(|&c| negated_constant(tree, c))
        .collect();
    for negation in matching {
        let flipped = tree.kind(tree.children(negation)[0]).flip();
        tree.remove_child(node, negation);
        let constant = tree.with_kind(flipped);
        tree.add_child(node, constant);
    }
    node
}

fn constant_applies<T: TreeLike>(tree: &T, node: T::Id) -> bool {
    let absorbing = match tree.kind(node) {
        NodeKind::Or => NodeKind::True,
        NodeKind::And => NodeKind::False,
        _ => return false,
    };
    tree.children(node).iter().any(|&c| tree.kind(c) == absorbing)
}

fn constant_apply<T: TreeFactory>(tree: &mut T, node: T::Id) -> T::Id {
    if tree.kind(node) == NodeKind::Or {
        tree.with_kind(NodeKind::True)
    } else {
        tree.with_kind(NodeKind::False)
    }
}
