//! In-memory object graph host
//!
//! A scene is an arena of UI-like nodes supplying both capability traits to
//! the engine. Scenes come from a declarative JSON document (the markup the
//! host would render from) or from the built-in demo.

use lineage_core::{Error, NodeId, NodeKind, NodeKindClassifier, ParentResolver};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// Privileged logical-parent accessor for one widget type
pub type LogicalAccessor = fn(&Scene, NodeId) -> Option<NodeId>;

/// One node of a declarative scene document
#[derive(Debug, Deserialize)]
pub struct NodeDoc {
    /// Unique label, used to wire adjacency and to pick the target
    pub label: String,

    /// Widget type name; keys the privileged accessor lookup
    pub widget: String,

    pub kind: NodeKind,

    /// Structural (raw) parent label
    #[serde(default)]
    pub parent: Option<String>,

    /// Logical slot label, reported through the widget type's accessor
    #[serde(default)]
    pub logical_parent: Option<String>,
}

/// Declarative scene description
#[derive(Debug, Deserialize)]
pub struct SceneDoc {
    pub nodes: Vec<NodeDoc>,

    /// Label of the node a run inspects by default
    pub target: String,
}

#[derive(Debug)]
struct SceneNode {
    label: String,
    widget: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    logical: Option<NodeId>,
}

/// Host object graph
pub struct Scene {
    nodes: Vec<SceneNode>,

    /// Registry of privileged accessors by widget type; the costly lookup
    accessors: HashMap<&'static str, LogicalAccessor>,

    /// Per-type cache over the registry, populated lazily. Entries are
    /// immutable once resolved; misses are cached too.
    resolved: RwLock<HashMap<String, Option<LogicalAccessor>>>,
}

impl Scene {
    /// Build a scene from a declarative document, resolving labels to ids
    pub fn from_doc(doc: SceneDoc) -> anyhow::Result<(Self, NodeId)> {
        let mut index: HashMap<String, NodeId> = HashMap::new();
        for (position, node) in doc.nodes.iter().enumerate() {
            let id = NodeId(position as u64);
            if index.insert(node.label.clone(), id).is_some() {
                anyhow::bail!("duplicate node label '{}'", node.label);
            }
        }

        let mut nodes = Vec::with_capacity(doc.nodes.len());
        for node in doc.nodes {
            let parent = resolve_label(&index, node.parent.as_deref())?;
            let logical = resolve_label(&index, node.logical_parent.as_deref())?;
            nodes.push(SceneNode {
                label: node.label,
                widget: node.widget,
                kind: node.kind,
                parent,
                logical,
            });
        }

        let target = *index
            .get(&doc.target)
            .ok_or_else(|| anyhow::anyhow!("unknown target label '{}'", doc.target))?;

        let scene = Self {
            nodes,
            accessors: default_accessors(),
            resolved: RwLock::new(HashMap::new()),
        };
        Ok((scene, target))
    }

    /// Load a scene document from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<(Self, NodeId)> {
        let text = std::fs::read_to_string(path)?;
        let doc: SceneDoc = serde_json::from_str(&text)?;
        Self::from_doc(doc)
    }

    /// The built-in demo scene: a window holding nested content hosts with
    /// a templated presenter around a button, plus a render surface the
    /// structural climb must skip and one widget type without a logical
    /// accessor.
    pub fn demo() -> (Self, NodeId) {
        let doc = SceneDoc {
            nodes: vec![
                doc_node("window", "window", NodeKind::Element, None, None),
                doc_node("frame", "surface", NodeKind::Other, Some("window"), None),
                doc_node("panel", "panel", NodeKind::Element, Some("frame"), Some("window")),
                doc_node("overlay", "legacy-host", NodeKind::Element, Some("panel"), None),
                doc_node(
                    "outer-host",
                    "content-host",
                    NodeKind::Element,
                    Some("overlay"),
                    Some("panel"),
                ),
                doc_node(
                    "inner-host",
                    "content-host",
                    NodeKind::Element,
                    Some("outer-host"),
                    Some("outer-host"),
                ),
                doc_node(
                    "presenter",
                    "presenter",
                    NodeKind::Element,
                    Some("inner-host"),
                    Some("inner-host"),
                ),
                doc_node(
                    "button",
                    "button",
                    NodeKind::Element,
                    Some("presenter"),
                    Some("inner-host"),
                ),
                doc_node(
                    "caption",
                    "text-run",
                    NodeKind::Content,
                    Some("button"),
                    Some("button"),
                ),
            ],
            target: "caption".to_string(),
        };
        Self::from_doc(doc).expect("demo scene is well-formed")
    }

    /// Look a node up by label
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.label == label)
            .map(|i| NodeId(i as u64))
    }

    fn node(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(node.0 as usize)
    }

    fn logical_slot(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.logical)
    }

    /// Accessor for a widget type, resolved once and cached (hit or miss)
    fn accessor_for(&self, widget: &str) -> lineage_core::Result<Option<LogicalAccessor>> {
        {
            let resolved = self
                .resolved
                .read()
                .map_err(|e| Error::Cache(format!("lock error: {}", e)))?;
            if let Some(cached) = resolved.get(widget) {
                return Ok(*cached);
            }
        }

        let found = self.accessors.get(widget).copied();
        if found.is_some() {
            tracing::debug!("resolved logical accessor for widget type '{}'", widget);
        }
        let mut resolved = self
            .resolved
            .write()
            .map_err(|e| Error::Cache(format!("lock error: {}", e)))?;
        resolved.insert(widget.to_string(), found);
        Ok(found)
    }
}

impl NodeKindClassifier for Scene {
    fn classify(&self, node: NodeId) -> Option<NodeKind> {
        self.node(node).map(|n| n.kind)
    }
}

impl ParentResolver for Scene {
    fn raw_parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn logical_parent(&self, node: NodeId) -> lineage_core::Result<Option<NodeId>> {
        let Some(entry) = self.node(node) else {
            return Ok(None);
        };
        // Only elements and content carry a logical slot; spatial and raw
        // nodes never report one.
        if !matches!(entry.kind, NodeKind::Element | NodeKind::Content) {
            return Ok(None);
        }
        match self.accessor_for(&entry.widget)? {
            Some(accessor) => Ok(accessor(self, node)),
            None => Err(Error::AccessorUnresolved(entry.widget.clone())),
        }
    }
}

fn resolve_label(
    index: &HashMap<String, NodeId>,
    label: Option<&str>,
) -> anyhow::Result<Option<NodeId>> {
    match label {
        Some(label) => match index.get(label) {
            Some(id) => Ok(Some(*id)),
            None => anyhow::bail!("unknown node label '{}'", label),
        },
        None => Ok(None),
    }
}

fn doc_node(
    label: &str,
    widget: &str,
    kind: NodeKind,
    parent: Option<&str>,
    logical: Option<&str>,
) -> NodeDoc {
    NodeDoc {
        label: label.to_string(),
        widget: widget.to_string(),
        kind,
        parent: parent.map(str::to_string),
        logical_parent: logical.map(str::to_string),
    }
}

fn slot_accessor(scene: &Scene, node: NodeId) -> Option<NodeId> {
    scene.logical_slot(node)
}

fn rootless_accessor(_scene: &Scene, _node: NodeId) -> Option<NodeId> {
    None
}

fn default_accessors() -> HashMap<&'static str, LogicalAccessor> {
    HashMap::from([
        // A top-level window never reports a logical parent
        ("window", rootless_accessor as LogicalAccessor),
        ("panel", slot_accessor as LogicalAccessor),
        ("content-host", slot_accessor as LogicalAccessor),
        ("presenter", slot_accessor as LogicalAccessor),
        ("button", slot_accessor as LogicalAccessor),
        ("text-run", slot_accessor as LogicalAccessor),
        // "legacy-host" is deliberately absent: its logical lookup is
        // unresolvable and the engine falls back to no logical parent.
    ])
}
