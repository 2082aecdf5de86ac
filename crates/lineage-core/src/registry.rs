//! Deduplicated store of the directed typed edges discovered by a walk

use crate::node::NodeId;
use crate::relation::{RelationKind, Relationship};
use std::collections::HashSet;

/// Registry of relationships, deduplicated by (parent, child, kind)
///
/// Registration order is preserved so reporting and chain reconstruction
/// are deterministic; the first-registered edge wins on duplicates.
#[derive(Debug, Default)]
pub struct RelationshipRegistry {
    edges: Vec<Relationship>,
    seen: HashSet<Relationship>,
}

impl RelationshipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship. Idempotent: a duplicate under (parent, child,
    /// kind) is ignored even when its depth differs. Returns whether the
    /// edge was new.
    pub fn add(&mut self, relationship: Relationship) -> bool {
        if self.seen.insert(relationship) {
            self.edges.push(relationship);
            true
        } else {
            false
        }
    }

    /// All edges of the given kind whose child is `child`, in registration
    /// order
    pub fn parents_of(
        &self,
        child: NodeId,
        kind: RelationKind,
    ) -> impl Iterator<Item = &Relationship> {
        self.edges
            .iter()
            .filter(move |r| r.child == child && r.kind == kind)
    }

    /// First-registered parent of `child` under the given kind
    pub fn first_parent(&self, child: NodeId, kind: RelationKind) -> Option<NodeId> {
        self.parents_of(child, kind).next().map(|r| r.parent)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
