//! Error types for the lineage engine

use crate::node::NodeId;
use thiserror::Error;

/// Result type alias using the engine's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Lineage error types
#[derive(Error, Debug)]
pub enum Error {
    /// The supplied root is not a node the host graph knows at all.
    /// The walk performs no work when this is returned.
    #[error("inspection root {0} is not a node of the host graph")]
    UnsupportedRoot(NodeId),

    /// The privileged logical-parent lookup has no accessor registered for
    /// the node's type. The inspector treats this fail-soft (no logical
    /// parent); hosts may surface it directly.
    #[error("no logical-parent accessor for node type '{0}'")]
    AccessorUnresolved(String),

    #[error("accessor cache error: {0}")]
    Cache(String),
}
