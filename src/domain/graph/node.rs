use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node, unique within a workflow (uniqueness is not
/// enforced; the editor generates these)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The four node variants, discriminated by the editor's `type` tag.
///
/// Labels are free text: shown to the end user on start/scenario nodes and
/// used as branch/question text on decision and action nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Start { label: String },
    Decision { label: String },
    Action { label: String },
    Scenario { label: String },
}

impl NodeKind {
    pub fn label(&self) -> &str {
        match self {
            Self::Start { label }
            | Self::Decision { label }
            | Self::Action { label }
            | Self::Scenario { label } => label,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Decision { .. } => "decision",
            Self::Action { .. } => "action",
            Self::Scenario { .. } => "scenario",
        }
    }
}

/// A graph node as persisted by the editor: `{ id, type, data: { label, … } }`
///
/// `data` fields other than `label` are opaque to the server; they are kept
/// verbatim so a save-then-load round-trip returns what the editor sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NodeWire", into = "NodeWire")]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            extra: serde_json::Map::new(),
        }
    }

    pub fn start(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Start { label: label.into() })
    }

    pub fn decision(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Decision { label: label.into() })
    }

    pub fn action(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Action { label: label.into() })
    }

    pub fn scenario(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Scenario { label: label.into() })
    }

    pub fn label(&self) -> &str {
        self.kind.label()
    }
}

/// Wire representation matching the editor's persisted shape
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeWire {
    id: NodeId,
    #[serde(rename = "type")]
    node_type: NodeType,
    data: NodeData,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NodeType {
    Start,
    Decision,
    Action,
    Scenario,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeData {
    #[serde(default)]
    label: String,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl From<NodeWire> for Node {
    fn from(wire: NodeWire) -> Self {
        let label = wire.data.label;
        let kind = match wire.node_type {
            NodeType::Start => NodeKind::Start { label },
            NodeType::Decision => NodeKind::Decision { label },
            NodeType::Action => NodeKind::Action { label },
            NodeType::Scenario => NodeKind::Scenario { label },
        };

        Self {
            id: wire.id,
            kind,
            extra: wire.data.extra,
        }
    }
}

impl From<Node> for NodeWire {
    fn from(node: Node) -> Self {
        let node_type = match node.kind {
            NodeKind::Start { .. } => NodeType::Start,
            NodeKind::Decision { .. } => NodeType::Decision,
            NodeKind::Action { .. } => NodeType::Action,
            NodeKind::Scenario { .. } => NodeType::Scenario,
        };

        Self {
            id: node.id,
            node_type,
            data: NodeData {
                label: node.kind.label().to_string(),
                extra: node.extra,
            },
        }
    }
}
