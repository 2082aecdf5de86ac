//! Node identity and kind classification types

use serde::{Deserialize, Serialize};

/// Opaque identity handle for a node in the host object graph
///
/// The host assigns the value (an index, a pointer-derived hash, anything
/// stable for the lifetime of the graph); the engine only compares and
/// displays it. Nodes themselves stay owned by the host; the walk reads
/// adjacency through the capability traits and never copies node state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a node in the host hierarchy
///
/// `Element`, `Content` and `Element3d` participate in the structural
/// hierarchy. `Other` marks intermediates (render surfaces, decorators)
/// that the structural climb skips past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Element,
    Content,
    Element3d,
    Other,
}

impl NodeKind {
    /// Whether this kind participates in the structural hierarchy
    pub fn participates(self) -> bool {
        matches!(self, Self::Element | Self::Content | Self::Element3d)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Element => "element",
            Self::Content => "content",
            Self::Element3d => "element3d",
            Self::Other => "other",
        };
        write!(f, "{}", name)
    }
}
