//! FAQ CRUD endpoints

use axum::{
    extract::{Path, Query, State},
    Json as ResponseJson,
};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::faq::{
    CreateFaqBody, FaqListQuery, FaqResponse, ListFaqsResponse, UpdateFaqBody,
};
use crate::api::types::workflow::DeleteResponse;
use crate::api::types::{ApiError, Json};

/// `GET /api/faqs?workflow_id=`
pub async fn list_faqs(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<FaqListQuery>,
) -> Result<ResponseJson<ListFaqsResponse>, ApiError> {
    let faqs = state
        .faq_service
        .list(&user.user_id, &query.workflow_id)
        .await?;

    Ok(ResponseJson(ListFaqsResponse {
        success: true,
        faqs: faqs.iter().map(Into::into).collect(),
    }))
}

/// `POST /api/faqs`
pub async fn create_faq(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<CreateFaqBody>,
) -> Result<ResponseJson<FaqResponse>, ApiError> {
    let faq = state
        .faq_service
        .create(&user.user_id, &body.workflow_id, &body.question, &body.answer)
        .await?;

    Ok(ResponseJson(FaqResponse {
        success: true,
        faq: (&faq).into(),
    }))
}

/// `PUT /api/faqs/{id}`
pub async fn update_faq(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateFaqBody>,
) -> Result<ResponseJson<FaqResponse>, ApiError> {
    let faq = state
        .faq_service
        .update(&user.user_id, &id, &body.question, &body.answer)
        .await?;

    Ok(ResponseJson(FaqResponse {
        success: true,
        faq: (&faq).into(),
    }))
}

/// `DELETE /api/faqs/{id}`
pub async fn delete_faq(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<ResponseJson<DeleteResponse>, ApiError> {
    state.faq_service.delete(&user.user_id, &id).await?;
    Ok(ResponseJson(DeleteResponse { success: true }))
}
