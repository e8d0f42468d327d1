//! Chat endpoint request/response types

use serde::{Deserialize, Serialize};

use crate::domain::llm::{Message, Usage};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// The widget sends camelCase; `workflow_id` is accepted too
    #[serde(rename = "workflowId", alias = "workflow_id")]
    pub workflow_id: String,
    #[serde(default)]
    pub history: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageBody>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageBody {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl From<Usage> for UsageBody {
    fn from(usage: Usage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total(),
        }
    }
}

/// `GET /api/usage` body: today's consumption for the authenticated user
#[derive(Debug, Clone, Serialize)]
pub struct UsageResponse {
    pub success: bool,
    pub tier: String,
    pub daily_tokens: u64,
    pub daily_requests: u64,
    pub minute_tokens: u64,
    pub minute_requests: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MessageRole;

    #[test]
    fn test_request_accepts_camel_case_workflow_id() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "hi", "workflowId": "wf-1"}"#).unwrap();

        assert_eq!(request.workflow_id, "wf-1");
        assert!(request.history.is_empty());
    }

    #[test]
    fn test_request_accepts_snake_case_workflow_id() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "hi", "workflow_id": "wf-1"}"#).unwrap();

        assert_eq!(request.workflow_id, "wf-1");
    }

    #[test]
    fn test_request_parses_history() {
        let request: ChatRequest = serde_json::from_str(
            r#"{
                "message": "and then?",
                "workflowId": "wf-1",
                "history": [
                    {"role": "user", "content": "hello"},
                    {"role": "assistant", "content": "hi!"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[1].role, MessageRole::Assistant);
    }
}
