use serde::{Deserialize, Serialize};

use super::NodeId;

/// Handle labels the editor attaches to outgoing edges.
///
/// Decision nodes emit `yes`/`no` handles; scenario nodes emit a single
/// `scenario-out` handle. Anything else is preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeHandle {
    Yes,
    No,
    ScenarioOut,
    Other(String),
}

impl From<String> for EdgeHandle {
    fn from(value: String) -> Self {
        match value.as_str() {
            "yes" => Self::Yes,
            "no" => Self::No,
            "scenario-out" => Self::ScenarioOut,
            _ => Self::Other(value),
        }
    }
}

impl From<EdgeHandle> for String {
    fn from(handle: EdgeHandle) -> Self {
        match handle {
            EdgeHandle::Yes => "yes".to_string(),
            EdgeHandle::No => "no".to_string(),
            EdgeHandle::ScenarioOut => "scenario-out".to_string(),
            EdgeHandle::Other(value) => value,
        }
    }
}

/// A directed edge between two nodes.
///
/// Duplicate edges are not deduplicated; multiplicity is whatever the editor
/// saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "sourceHandle", skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<EdgeHandle>,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
        }
    }

    pub fn with_handle(mut self, handle: EdgeHandle) -> Self {
        self.source_handle = Some(handle);
        self
    }

    pub fn has_handle(&self, handle: &EdgeHandle) -> bool {
        self.source_handle.as_ref() == Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_wire_format() {
        let edge = Edge::new("d1", "a1").with_handle(EdgeHandle::Yes);
        let json = serde_json::to_string(&edge).unwrap();
        assert_eq!(json, r#"{"source":"d1","target":"a1","sourceHandle":"yes"}"#);
    }

    #[test]
    fn test_edge_without_handle_omits_field() {
        let edge = Edge::new("s1", "d1");
        let json = serde_json::to_string(&edge).unwrap();
        assert_eq!(json, r#"{"source":"s1","target":"d1"}"#);
    }

    #[test]
    fn test_unknown_handle_preserved() {
        let json = r#"{"source":"a","target":"b","sourceHandle":"maybe"}"#;
        let edge: Edge = serde_json::from_str(json).unwrap();
        assert_eq!(
            edge.source_handle,
            Some(EdgeHandle::Other("maybe".to_string()))
        );
        assert_eq!(serde_json::to_string(&edge).unwrap(), json);
    }
}
