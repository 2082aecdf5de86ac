//! Lineage Core - dual parent-relation diagnostics for live object graphs
//!
//! Given a root node in a host-owned object graph, the engine walks every
//! ancestor, reconstructs two independent parent relations (structural and
//! logical), records where they diverge, and renders a textual report of
//! the result. The host supplies adjacency through two capability traits;
//! the engine never owns or mutates nodes.

pub mod error;
pub mod guard;
pub mod inspector;
pub mod node;
pub mod registry;
pub mod relation;
pub mod report;
pub mod traits;

pub use error::{Error, Result};
pub use guard::{RecursionGuard, MAX_SEGMENTS};
pub use inspector::{Inspection, Inspector};
pub use node::{NodeId, NodeKind};
pub use registry::RelationshipRegistry;
pub use relation::{RelationKind, Relationship, Segment};
pub use traits::{NodeKindClassifier, ParentResolver};
