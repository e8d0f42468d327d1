//! Widget endpoints: the embeddable script and the allow-list CRUD

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::Response,
    Json as ResponseJson,
};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::widget::{
    AddDomainBody, DomainListQuery, DomainResponse, ListDomainsResponse,
};
use crate::api::types::workflow::DeleteResponse;
use crate::api::types::{ApiError, Json};

/// `GET /api/widget/{workflow_id}` - the loader script, origin-gated
pub async fn widget_script(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());

    // 404 before the origin check so probes cannot tell the two apart.
    state.workflow_service.load_cached(&workflow_id).await?;
    state
        .widget_service
        .check_origin(&workflow_id, origin)
        .await?;

    let script = state
        .widget_service
        .widget_script(&workflow_id, &state.public_base_url);

    Response::builder()
        .header(header::CONTENT_TYPE, "application/javascript; charset=utf-8")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(header::CACHE_CONTROL, "public, max-age=300")
        .body(script.into())
        .map_err(|e| ApiError::internal(format!("Failed to build widget response: {}", e)))
}

/// `GET /api/widget-domains?workflow_id=`
pub async fn list_domains(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<DomainListQuery>,
) -> Result<ResponseJson<ListDomainsResponse>, ApiError> {
    let domains = state
        .widget_service
        .list_domains(&user.user_id, &query.workflow_id)
        .await?;

    Ok(ResponseJson(ListDomainsResponse {
        success: true,
        domains: domains.iter().map(Into::into).collect(),
    }))
}

/// `POST /api/widget-domains`
pub async fn add_domain(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<AddDomainBody>,
) -> Result<ResponseJson<DomainResponse>, ApiError> {
    let domain = state
        .widget_service
        .add_domain(&user.user_id, &body.workflow_id, &body.domain)
        .await?;

    Ok(ResponseJson(DomainResponse {
        success: true,
        domain: (&domain).into(),
    }))
}

/// `DELETE /api/widget-domains/{id}`
pub async fn remove_domain(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<ResponseJson<DeleteResponse>, ApiError> {
    state
        .widget_service
        .remove_domain(&user.user_id, &id)
        .await?;

    Ok(ResponseJson(DeleteResponse { success: true }))
}
