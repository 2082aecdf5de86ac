//! Relationship (edge) types recorded during a walk

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Which parent relation an edge was discovered through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// Public adjacency, climbed past non-recognized intermediates
    Structural,
    /// Privileged adjacency, queried directly without climbing
    Logical,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structural => write!(f, "Structural"),
            Self::Logical => write!(f, "Logical"),
        }
    }
}

/// A directed parent-child edge discovered during a walk
///
/// Identity is (parent, child, kind). `depth` records where along the walk
/// the edge was first seen and is excluded from equality and hashing, so two
/// discoveries of the same edge at different depths collapse to one registry
/// entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Relationship {
    pub parent: NodeId,
    pub child: NodeId,
    pub kind: RelationKind,
    pub depth: u32,
}

impl Relationship {
    pub fn new(parent: NodeId, child: NodeId, kind: RelationKind, depth: u32) -> Self {
        Self {
            parent,
            child,
            kind,
            depth,
        }
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.parent == other.parent && self.child == other.child && self.kind == other.kind
    }
}

impl Eq for Relationship {}

impl Hash for Relationship {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parent.hash(state);
        self.child.hash(state);
        self.kind.hash(state);
    }
}

/// A maximal run of relationships recorded between two consecutive branch
/// points. Segments exist only to bound and report traversal history.
pub type Segment = Vec<Relationship>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_ignores_depth() {
        let a = Relationship::new(NodeId(1), NodeId(2), RelationKind::Structural, 0);
        let b = Relationship::new(NodeId(1), NodeId(2), RelationKind::Structural, 7);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_identity_includes_kind() {
        let structural = Relationship::new(NodeId(1), NodeId(2), RelationKind::Structural, 0);
        let logical = Relationship::new(NodeId(1), NodeId(2), RelationKind::Logical, 0);
        assert_ne!(structural, logical);
    }
}
