//! Text rendering of a finished inspection
//!
//! Formatting is total: every node goes through the same describe rule, and
//! absent nodes render as a sentinel token instead of failing.

use crate::inspector::Inspection;
use crate::node::NodeId;
use crate::registry::RelationshipRegistry;
use crate::relation::{RelationKind, Relationship};
use crate::traits::NodeKindClassifier;
use std::collections::HashSet;

/// How many trailing segments an aborted walk dumps
pub const SEGMENT_TAIL: usize = 100;

/// Sentinel for an absent node
const NONE_TOKEN: &str = "<none>";

/// Render the full report for a walk
pub fn render<C>(inspection: &Inspection, classifier: &C) -> String
where
    C: NodeKindClassifier + ?Sized,
{
    let mut out = String::new();

    out.push_str(&format!(
        "{}: edges={}\n",
        describe(Some(inspection.root), classifier, inspection),
        inspection.registry.len()
    ));

    out.push_str("Branch points:\n");
    let mut branch_points: Vec<(NodeId, u32)> = inspection
        .branch_tally
        .iter()
        .map(|(node, tally)| (*node, *tally))
        .collect();
    // Least-frequent branch first; ties broken by identity so output is
    // deterministic.
    branch_points.sort_by_key(|(node, tally)| (*tally, node.0));
    for (node, _) in &branch_points {
        out.push_str(&describe(Some(*node), classifier, inspection));
        out.push('\n');
    }

    out.push_str(&format!("Time taken {:?}\n", inspection.elapsed));

    out.push_str("Parent chain:\n");
    for node in structural_chain(inspection.root, &inspection.registry) {
        out.push_str(&describe(Some(node), classifier, inspection));
        out.push('\n');
    }

    if !inspection.completed {
        out.push_str("Exceeded maximum recursion:\n");
        let tail_start = inspection.segments.len().saturating_sub(SEGMENT_TAIL);
        for (index, segment) in inspection.segments[tail_start..].iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&format!("Count: {}\n", segment.len()));
            for relationship in segment {
                out.push_str("    ");
                out.push_str(&describe_relationship(relationship, classifier, inspection));
                out.push('\n');
            }
        }
    }

    out.push_str("Edges of graph:\n");
    for relationship in inspection.registry.iter() {
        out.push_str(&describe_relationship(relationship, classifier, inspection));
        out.push('\n');
    }

    out
}

/// Ancestor chain from `root`, following the first-registered structural
/// edge for each node
///
/// The registry may be cyclic when a walk was aborted, so reconstruction
/// keeps a seen-set and stops at the first repeated node.
pub fn structural_chain(root: NodeId, registry: &RelationshipRegistry) -> Vec<NodeId> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(root);
    while let Some(node) = current {
        if !seen.insert(node) {
            break;
        }
        chain.push(node);
        current = registry.first_parent(node, RelationKind::Structural);
    }
    chain
}

fn describe<C>(node: Option<NodeId>, classifier: &C, inspection: &Inspection) -> String
where
    C: NodeKindClassifier + ?Sized,
{
    let Some(node) = node else {
        return NONE_TOKEN.to_string();
    };
    let kind = classifier
        .classify(node)
        .map(|k| k.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let visits = inspection.visits.get(&node).copied().unwrap_or(0);
    let mut description = format!("{}@{}[visits({})]", kind, node, visits);
    if let Some(tally) = inspection.branch_tally.get(&node) {
        description.push_str(&format!("[branch({})]", tally));
    }
    description
}

fn describe_relationship<C>(
    relationship: &Relationship,
    classifier: &C,
    inspection: &Inspection,
) -> String
where
    C: NodeKindClassifier + ?Sized,
{
    format!(
        "Parent: {}, Child: {}, Kind: {}, Depth: {}",
        describe(Some(relationship.parent), classifier, inspection),
        describe(Some(relationship.child), classifier, inspection),
        relationship.kind,
        relationship.depth
    )
}
