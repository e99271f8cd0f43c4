//! The closed enumeration of boolean expression node kinds.

use std::fmt;

/// The kind of a node in a boolean expression tree.
///
/// `And` and `Or` are the "composite" kinds and are mutual flips of each
/// other, as are the `True`/`False` constants.
///
/// # Invariants
///
/// - `Null` is a sentinel used to give the top-level input a parent handle
///   during search; it never appears in a simplified result.
/// - `Predicate`, `True`, and `False` are leaves; only `Predicate` carries
///   a data payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// Sentinel root marker.
    Null,
    /// N-ary conjunction.
    And,
    /// N-ary disjunction.
    Or,
    /// Unary negation.
    Not,
    /// Leaf proposition carrying an opaque payload.
    Predicate,
    /// The constant true.
    True,
    /// The constant false.
    False,
}

impl NodeKind {
    /// Is this a composite (`And` or `Or`) kind?
    pub fn is_composite(self) -> bool {
        matches!(self, NodeKind::And | NodeKind::Or)
    }

    /// Is this a boolean constant (`True` or `False`) kind?
    pub fn is_constant(self) -> bool {
        matches!(self, NodeKind::True | NodeKind::False)
    }

    /// The dual kind: `And`↔`Or`, `True`↔`False`.
    ///
    /// # Panics
    ///
    /// Panics for kinds without a dual (`Null`, `Not`, `Predicate`).
    pub fn flip(self) -> Self {
        match self {
            NodeKind::And => NodeKind::Or,
            NodeKind::Or => NodeKind::And,
            NodeKind::True => NodeKind::False,
            NodeKind::False => NodeKind::True,
            _ => panic!("{:?} has no flip", self),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Null => "X",
            NodeKind::And => "*",
            NodeKind::Or => "+",
            NodeKind::Not => "¬",
            NodeKind::Predicate => "?",
            NodeKind::True => "T",
            NodeKind::False => "F",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip() {
        assert_eq!(NodeKind::And.flip(), NodeKind::Or);
        assert_eq!(NodeKind::Or.flip(), NodeKind::And);
        assert_eq!(NodeKind::True.flip(), NodeKind::False);
        assert_eq!(NodeKind::False.flip(), NodeKind::True);
    }

    #[test]
    #[should_panic(expected = "has no flip")]
    fn test_flip_not_panics() {
        NodeKind::Not.flip();
    }

    #[test]
    fn test_classification() {
        assert!(NodeKind::And.is_composite());
        assert!(NodeKind::Or.is_composite());
        assert!(!NodeKind::Not.is_composite());
        assert!(NodeKind::True.is_constant());
        assert!(NodeKind::False.is_constant());
        assert!(!NodeKind::Predicate.is_constant());
    }
}
