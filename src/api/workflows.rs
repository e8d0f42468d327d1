//! Workflow CRUD endpoints

use axum::{
    extract::{Query, State},
    Json as ResponseJson,
};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::workflow::{
    DeleteResponse, ListWorkflowsResponse, LoadWorkflowResponse, SaveWorkflowBody,
    SaveWorkflowResponse, WorkflowIdQuery,
};
use crate::api::types::{ApiError, Json};
use crate::infrastructure::services::SaveWorkflowRequest;

/// `POST /api/save-workflow` - create or wholesale-replace
pub async fn save_workflow(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<SaveWorkflowBody>,
) -> Result<ResponseJson<SaveWorkflowResponse>, ApiError> {
    let workflow = state
        .workflow_service
        .save(
            &user.user_id,
            SaveWorkflowRequest {
                id: body.id,
                name: body.name,
                nodes: body.nodes,
                edges: body.edges,
                context: body.context,
            },
        )
        .await?;

    Ok(ResponseJson(SaveWorkflowResponse {
        success: true,
        workflow_id: workflow.id().as_str().to_string(),
    }))
}

/// `GET /api/load-workflow?id=`
pub async fn load_workflow(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<WorkflowIdQuery>,
) -> Result<ResponseJson<LoadWorkflowResponse>, ApiError> {
    let workflow = state.workflow_service.get(&user.user_id, &query.id).await?;

    Ok(ResponseJson(LoadWorkflowResponse {
        success: true,
        workflow: (&workflow).into(),
    }))
}

/// `GET /api/workflows` - list for the authenticated user
pub async fn list_workflows(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<ResponseJson<ListWorkflowsResponse>, ApiError> {
    let workflows = state.workflow_service.list(&user.user_id).await?;

    Ok(ResponseJson(ListWorkflowsResponse {
        success: true,
        workflows: workflows.iter().map(Into::into).collect(),
    }))
}

/// `DELETE /api/delete-workflow?id=` - cascades to FAQs and widget domains
pub async fn delete_workflow(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<WorkflowIdQuery>,
) -> Result<ResponseJson<DeleteResponse>, ApiError> {
    state
        .workflow_service
        .delete(&user.user_id, &query.id)
        .await?;

    Ok(ResponseJson(DeleteResponse { success: true }))
}
