//! Chat endpoint

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json as ResponseJson,
};

use crate::api::state::AppState;
use crate::api::types::chat::{ChatRequest, ChatResponse};
use crate::api::types::{ApiError, Json};
use crate::infrastructure::services::ChatTurn;

/// `POST /api/chat` - one conversation turn against a workflow
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Result<ResponseJson<ChatResponse>, ApiError> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let reply = state
        .chat_service
        .chat(ChatTurn {
            workflow_id: body.workflow_id,
            message: body.message,
            history: body.history,
            origin,
        })
        .await?;

    Ok(ResponseJson(ChatResponse {
        success: true,
        response: reply.response,
        usage: reply.usage.map(Into::into),
    }))
}
