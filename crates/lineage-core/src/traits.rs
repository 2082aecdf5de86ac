//! Capability traits the host object graph must supply

use crate::error::Result;
use crate::node::{NodeId, NodeKind};

/// Type discrimination for nodes of the host graph
pub trait NodeKindClassifier {
    /// Classify a node, or `None` when the identity is not a node of the
    /// host graph at all.
    fn classify(&self, node: NodeId) -> Option<NodeKind>;
}

/// Dual parent lookup over the host graph
///
/// Implementations resolve the logical parent through a privileged accessor
/// looked up once per node type and cached; the lookup itself stays cheap
/// on every call after the first for a given type.
pub trait ParentResolver {
    /// Raw structural-parent candidate. May be an intermediate of a
    /// non-recognized kind that the walk climbs past.
    fn raw_parent(&self, node: NodeId) -> Option<NodeId>;

    /// Logical-parent candidate, queried directly without climbing.
    ///
    /// Returns [`Error::AccessorUnresolved`](crate::Error::AccessorUnresolved)
    /// when the node's type has no accessor for the privileged lookup.
    fn logical_parent(&self, node: NodeId) -> Result<Option<NodeId>>;
}
