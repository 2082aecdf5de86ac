//! The ancestor walk: dual-parent discovery over a live object graph

use crate::error::{Error, Result};
use crate::guard::RecursionGuard;
use crate::node::NodeId;
use crate::registry::RelationshipRegistry;
use crate::relation::{RelationKind, Relationship, Segment};
use crate::traits::{NodeKindClassifier, ParentResolver};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Everything a completed (or aborted) walk produced
#[derive(Debug)]
pub struct Inspection {
    /// Node the walk started from
    pub root: NodeId,

    /// False when the recursion guard aborted the walk. Relationships
    /// gathered before the cutoff are still valid.
    pub completed: bool,

    /// Deduplicated edges of both relations
    pub registry: RelationshipRegistry,

    /// Times each node was processed by the walk
    pub visits: HashMap<NodeId, u32>,

    /// Times each node was recorded as a branch point
    pub branch_tally: HashMap<NodeId, u32>,

    /// Exploration history, partitioned at branch points
    pub segments: Vec<Segment>,

    /// Wall-clock time of the walk
    pub elapsed: Duration,
}

/// Worklist frame. `Enter` processes a node's structural side; `Branch`
/// runs after the structural subtree returned and decides the logical side.
enum Frame {
    Enter {
        node: NodeId,
        depth: u32,
    },
    Branch {
        node: NodeId,
        depth: u32,
        structural: Option<NodeId>,
        logical: Option<NodeId>,
    },
}

/// The walk engine
///
/// Composes the host's [`ParentResolver`] and [`NodeKindClassifier`] to
/// discover both parent relations for every ancestor of a root node. The
/// walk is iterative: an explicit frame stack stands in for call recursion,
/// so structural chains of arbitrary depth cannot overflow the host stack.
pub struct Inspector<'a, R: ?Sized, C: ?Sized> {
    resolver: &'a R,
    classifier: &'a C,
    guard: RecursionGuard,
}

impl<'a, R, C> Inspector<'a, R, C>
where
    R: ParentResolver + ?Sized,
    C: NodeKindClassifier + ?Sized,
{
    pub fn new(resolver: &'a R, classifier: &'a C) -> Self {
        Self {
            resolver,
            classifier,
            guard: RecursionGuard::new(),
        }
    }

    /// Replace the default guard (tests use an artificial ceiling)
    pub fn with_guard(mut self, guard: RecursionGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Walk every ancestor of `root`, recording both parent relations
    ///
    /// Returns [`Error::UnsupportedRoot`] when the host does not know the
    /// root at all; any other outcome, including a guard abort, is a
    /// well-formed [`Inspection`].
    pub fn inspect(&self, root: NodeId) -> Result<Inspection> {
        if self.classifier.classify(root).is_none() {
            return Err(Error::UnsupportedRoot(root));
        }

        tracing::debug!("inspecting ancestry of node {}", root);
        let started = Instant::now();

        let mut registry = RelationshipRegistry::new();
        let mut visits: HashMap<NodeId, u32> = HashMap::new();
        let mut branch_tally: HashMap<NodeId, u32> = HashMap::new();
        let mut segments: Vec<Segment> = vec![Segment::new()];
        let mut completed = true;

        let mut stack = vec![Frame::Enter {
            node: root,
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter { node, depth } => {
                    if !self.guard.admits(segments.len()) {
                        tracing::warn!(
                            "segment cap hit after {} segments, aborting walk",
                            segments.len()
                        );
                        completed = false;
                        break;
                    }
                    *visits.entry(node).or_insert(0) += 1;

                    let structural = self.climb(node);
                    let logical = match self.resolver.logical_parent(node) {
                        Ok(candidate) => candidate,
                        Err(err) => {
                            // Fail-soft: one unresolvable type must not
                            // abort the whole walk.
                            tracing::warn!("logical lookup failed for node {}: {}", node, err);
                            None
                        }
                    };

                    // The branch decision runs only after the structural
                    // subtree has been fully processed.
                    stack.push(Frame::Branch {
                        node,
                        depth,
                        structural,
                        logical,
                    });
                    if let Some(parent) = structural {
                        let edge =
                            Relationship::new(parent, node, RelationKind::Structural, depth);
                        registry.add(edge);
                        current_segment(&mut segments).push(edge);
                        stack.push(Frame::Enter {
                            node: parent,
                            depth: depth + 1,
                        });
                    }
                }
                Frame::Branch {
                    node,
                    depth,
                    structural,
                    logical,
                } => {
                    let Some(parent) = logical else { continue };
                    if Some(parent) == structural {
                        continue;
                    }

                    // The relations diverge here: close the current segment
                    // and follow the logical side as well.
                    segments.push(Segment::new());
                    *branch_tally.entry(node).or_insert(0) += 1;
                    let edge = Relationship::new(parent, node, RelationKind::Logical, depth);
                    registry.add(edge);
                    current_segment(&mut segments).push(edge);
                    stack.push(Frame::Enter {
                        node: parent,
                        depth: depth + 1,
                    });
                }
            }
        }

        let elapsed = started.elapsed();
        tracing::debug!(
            "walk finished: {} edges, {} branch points, {} nodes, completed={}",
            registry.len(),
            branch_tally.len(),
            visits.len(),
            completed
        );

        Ok(Inspection {
            root,
            completed,
            registry,
            visits,
            branch_tally,
            segments,
            elapsed,
        })
    }

    /// Structural-parent candidate for `node`: the raw candidate, climbed
    /// past every non-recognized intermediate
    fn climb(&self, node: NodeId) -> Option<NodeId> {
        let mut candidate = self.resolver.raw_parent(node);
        while let Some(current) = candidate {
            let recognized = self
                .classifier
                .classify(current)
                .is_some_and(|kind| kind.participates());
            if recognized {
                return Some(current);
            }
            candidate = self.resolver.raw_parent(current);
        }
        None
    }
}

fn current_segment(segments: &mut Vec<Segment>) -> &mut Segment {
    // Seeded with one segment before the walk starts and only ever grows.
    segments.last_mut().expect("segment list cannot be empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use std::collections::{HashMap, HashSet};

    /// Host graph stub: adjacency tables plus a set of node types whose
    /// privileged accessor is missing
    #[derive(Default)]
    struct FixtureGraph {
        kinds: HashMap<NodeId, NodeKind>,
        raw: HashMap<NodeId, NodeId>,
        logical: HashMap<NodeId, NodeId>,
        unresolved: HashSet<NodeId>,
    }

    impl FixtureGraph {
        fn node(mut self, id: u64, kind: NodeKind) -> Self {
            self.kinds.insert(NodeId(id), kind);
            self
        }

        fn raw_edge(mut self, child: u64, parent: u64) -> Self {
            self.raw.insert(NodeId(child), NodeId(parent));
            self
        }

        fn logical_edge(mut self, child: u64, parent: u64) -> Self {
            self.logical.insert(NodeId(child), NodeId(parent));
            self
        }

        fn without_accessor(mut self, id: u64) -> Self {
            self.unresolved.insert(NodeId(id));
            self
        }
    }

    impl NodeKindClassifier for FixtureGraph {
        fn classify(&self, node: NodeId) -> Option<NodeKind> {
            self.kinds.get(&node).copied()
        }
    }

    impl ParentResolver for FixtureGraph {
        fn raw_parent(&self, node: NodeId) -> Option<NodeId> {
            self.raw.get(&node).copied()
        }

        fn logical_parent(&self, node: NodeId) -> Result<Option<NodeId>> {
            if self.unresolved.contains(&node) {
                return Err(Error::AccessorUnresolved("fixture".to_string()));
            }
            Ok(self.logical.get(&node).copied())
        }
    }

    fn inspect(graph: &FixtureGraph, root: u64) -> Inspection {
        Inspector::new(graph, graph)
            .inspect(NodeId(root))
            .expect("fixture root is a known node")
    }

    #[test]
    fn test_linear_chain() {
        // A(1) -> B(2) -> C(3) -> D(4), structural only
        let graph = FixtureGraph::default()
            .node(1, NodeKind::Element)
            .node(2, NodeKind::Element)
            .node(3, NodeKind::Element)
            .node(4, NodeKind::Element)
            .raw_edge(1, 2)
            .raw_edge(2, 3)
            .raw_edge(3, 4);

        let inspection = inspect(&graph, 1);

        assert!(inspection.completed);
        assert_eq!(inspection.registry.len(), 3);
        assert!(inspection.branch_tally.is_empty());
        assert!(inspection
            .registry
            .iter()
            .all(|r| r.kind == RelationKind::Structural));
    }

    #[test]
    fn test_both_parents_absent_terminates_immediately() {
        let graph = FixtureGraph::default().node(1, NodeKind::Element);

        let inspection = inspect(&graph, 1);

        assert!(inspection.completed);
        assert!(inspection.registry.is_empty());
        assert_eq!(inspection.visits.get(&NodeId(1)), Some(&1));
    }

    #[test]
    fn test_divergent_logical_parent_is_branch_point() {
        // E(1): structural parent F(2), logical parent G(3)
        let graph = FixtureGraph::default()
            .node(1, NodeKind::Element)
            .node(2, NodeKind::Element)
            .node(3, NodeKind::Element)
            .raw_edge(1, 2)
            .logical_edge(1, 3);

        let inspection = inspect(&graph, 1);

        assert!(inspection.completed);
        assert_eq!(inspection.branch_tally.get(&NodeId(1)), Some(&1));
        let edges: HashSet<_> = inspection.registry.iter().copied().collect();
        assert!(edges.contains(&Relationship::new(
            NodeId(2),
            NodeId(1),
            RelationKind::Structural,
            0
        )));
        assert!(edges.contains(&Relationship::new(
            NodeId(3),
            NodeId(1),
            RelationKind::Logical,
            0
        )));
        // Branch opened a second segment
        assert_eq!(inspection.segments.len(), 2);
    }

    #[test]
    fn test_matching_logical_parent_is_not_a_branch_point() {
        let graph = FixtureGraph::default()
            .node(1, NodeKind::Element)
            .node(2, NodeKind::Element)
            .raw_edge(1, 2)
            .logical_edge(1, 2);

        let inspection = inspect(&graph, 1);

        assert!(inspection.branch_tally.is_empty());
        assert_eq!(inspection.registry.len(), 1);
    }

    #[test]
    fn test_climb_skips_non_recognized_intermediates() {
        // 1 -> surface(2, Other) -> surface(3, Other) -> 4
        let graph = FixtureGraph::default()
            .node(1, NodeKind::Element)
            .node(2, NodeKind::Other)
            .node(3, NodeKind::Other)
            .node(4, NodeKind::Element)
            .raw_edge(1, 2)
            .raw_edge(2, 3)
            .raw_edge(3, 4);

        let inspection = inspect(&graph, 1);

        assert_eq!(inspection.registry.len(), 1);
        let edge = inspection.registry.iter().next().unwrap();
        assert_eq!(edge.parent, NodeId(4));
        assert_eq!(edge.child, NodeId(1));
        // The intermediates were never processed as nodes of the walk
        assert!(!inspection.visits.contains_key(&NodeId(2)));
        assert!(!inspection.visits.contains_key(&NodeId(3)));
    }

    #[test]
    fn test_guard_trips_on_alternating_cycle() {
        // A(1) structural-> B(2); B logical-> A. Every visit of B opens a
        // new segment, so the artificial ceiling trips deterministically.
        let graph = FixtureGraph::default()
            .node(1, NodeKind::Element)
            .node(2, NodeKind::Element)
            .raw_edge(1, 2)
            .logical_edge(2, 1);

        let inspection = Inspector::new(&graph, &graph)
            .with_guard(RecursionGuard::with_limit(5))
            .inspect(NodeId(1))
            .unwrap();

        assert!(!inspection.completed);
        assert_eq!(inspection.segments.len(), 6);
        // Only the two real edges survive, deduplicated
        assert_eq!(inspection.registry.len(), 2);
        assert!(inspection.visits.get(&NodeId(1)).copied().unwrap_or(0) > 1);
    }

    #[test]
    fn test_revisits_are_counted() {
        // Two children of a branch point force the shared ancestry to be
        // walked twice.
        // 1 -structural-> 2 -structural-> 4, 2 -logical-> 3 -structural-> 4
        let graph = FixtureGraph::default()
            .node(1, NodeKind::Element)
            .node(2, NodeKind::Element)
            .node(3, NodeKind::Element)
            .node(4, NodeKind::Element)
            .raw_edge(1, 2)
            .raw_edge(2, 4)
            .raw_edge(3, 4)
            .logical_edge(2, 3);

        let inspection = inspect(&graph, 1);

        assert!(inspection.completed);
        assert_eq!(inspection.visits.get(&NodeId(4)), Some(&2));
        assert_eq!(inspection.branch_tally.get(&NodeId(2)), Some(&1));
    }

    #[test]
    fn test_visit_monotonicity() {
        let graph = FixtureGraph::default()
            .node(1, NodeKind::Element)
            .node(2, NodeKind::Element)
            .node(3, NodeKind::Element)
            .raw_edge(1, 2)
            .logical_edge(1, 3);

        let inspection = inspect(&graph, 1);

        for edge in inspection.registry.iter() {
            assert!(inspection.visits.get(&edge.parent).copied().unwrap_or(0) >= 1);
            assert!(inspection.visits.get(&edge.child).copied().unwrap_or(0) >= 1);
        }
    }

    #[test]
    fn test_runs_are_order_independent() {
        let graph = FixtureGraph::default()
            .node(1, NodeKind::Element)
            .node(2, NodeKind::Element)
            .node(3, NodeKind::Element)
            .node(4, NodeKind::Element)
            .raw_edge(1, 2)
            .raw_edge(2, 4)
            .raw_edge(3, 4)
            .logical_edge(2, 3);

        let first: HashSet<_> = inspect(&graph, 1).registry.iter().copied().collect();
        let second: HashSet<_> = inspect(&graph, 1).registry.iter().copied().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_root_is_a_named_error() {
        let graph = FixtureGraph::default();
        let result = Inspector::new(&graph, &graph).inspect(NodeId(99));
        assert!(matches!(result, Err(Error::UnsupportedRoot(NodeId(99)))));
    }

    #[test]
    fn test_unresolved_accessor_is_fail_soft() {
        // Node 2's type has no accessor; the walk continues with no
        // logical edge from it.
        let graph = FixtureGraph::default()
            .node(1, NodeKind::Element)
            .node(2, NodeKind::Element)
            .node(3, NodeKind::Element)
            .raw_edge(1, 2)
            .raw_edge(2, 3)
            .logical_edge(2, 1)
            .without_accessor(2);

        let inspection = inspect(&graph, 1);

        assert!(inspection.completed);
        assert_eq!(inspection.registry.len(), 2);
        assert!(inspection
            .registry
            .iter()
            .all(|r| r.kind == RelationKind::Structural));
        assert!(inspection.branch_tally.is_empty());
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        // Far deeper than any sane call stack would allow with recursion.
        let mut graph = FixtureGraph::default();
        for id in 0..200_000u64 {
            graph = graph.node(id, NodeKind::Element);
            if id > 0 {
                graph = graph.raw_edge(id - 1, id);
            }
        }

        let inspection = inspect(&graph, 0);

        assert!(inspection.completed);
        assert_eq!(inspection.registry.len(), 199_999);
    }
}
