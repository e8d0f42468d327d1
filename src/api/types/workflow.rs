//! Workflow endpoint request/response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::graph::{Edge, Node};
use crate::domain::Workflow;

#[derive(Debug, Clone, Deserialize)]
pub struct SaveWorkflowBody {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveWorkflowResponse {
    pub success: bool,
    #[serde(rename = "workflowId")]
    pub workflow_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowBody {
    pub id: String,
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Workflow> for WorkflowBody {
    fn from(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id().as_str().to_string(),
            name: workflow.name().to_string(),
            nodes: workflow.nodes().to_vec(),
            edges: workflow.edges().to_vec(),
            context: workflow.context().map(str::to_string),
            created_at: workflow.created_at(),
            updated_at: workflow.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadWorkflowResponse {
    pub success: bool,
    pub workflow: WorkflowBody,
}

/// List entry: graph omitted, the editor fetches it on open
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSummary {
    pub id: String,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&Workflow> for WorkflowSummary {
    fn from(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id().as_str().to_string(),
            name: workflow.name().to_string(),
            updated_at: workflow.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListWorkflowsResponse {
    pub success: bool,
    pub workflows: Vec<WorkflowSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// `?id=` query for load/delete
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowIdQuery {
    pub id: String,
}
