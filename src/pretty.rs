//! Parenthesized infix rendering of expression trees.

use crate::tree::TreeLike;
use crate::types::NodeKind;

/// Renders the subtree at `node` as a parenthesized infix string:
/// disjunctions joined by `" + "`, conjunctions by `" * "`, negation as a
/// `¬` prefix on a parenthesized operand, constants as `T`/`F`, the
/// sentinel root as `X`, and predicates as the first character of their
/// payload's textual form (`?` if there is none).
///
/// This is a debug/display format, not a re-parseable serialization.
///
/// # Examples
///
/// ```
/// use bas_rs::forest::Forest;
/// use bas_rs::pretty::pretty_print;
///
/// let mut forest: Forest<&str> = Forest::new();
/// let a = forest.mk_predicate("a");
/// let b = forest.mk_predicate("b");
/// let conj = forest.mk_and([a, b]);
/// assert_eq!(pretty_print(&forest, conj), "(a * b)");
/// ```
pub fn pretty_print<T: TreeLike>(tree: &T, node: T::Id) -> String {
    let kind = tree.kind(node);
    let symbol = match kind {
        NodeKind::And => " * ".to_string(),
        NodeKind::Or => " + ".to_string(),
        NodeKind::Not => "¬".to_string(),
        NodeKind::True => "T".to_string(),
        NodeKind::False => "F".to_string(),
        NodeKind::Null => "X".to_string(),
        NodeKind::Predicate => tree
            .data_label(node)
            .and_then(|label| label.chars().next())
            .unwrap_or('?')
            .to_string(),
    };

    let parenthesized = matches!(kind, NodeKind::And | NodeKind::Or | NodeKind::Not);

    let mut out = String::new();
    if kind == NodeKind::Not {
        out.push_str(&symbol);
    }
    if parenthesized {
        out.push('(');
    } else {
        out.push_str(&symbol);
    }

    let rendered: Vec<String> = tree
        .children(node)
        .into_iter()
        .map(|child| pretty_print(tree, child))
        .collect();
    out.push_str(&rendered.join(&symbol));

    if parenthesized {
        out.push(')');
    }
    out
}
