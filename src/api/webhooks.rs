//! Payment-provider webhook endpoint

use axum::{extract::State, Json as ResponseJson};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::webhook::{WebhookPayload, WebhookResponse};
use crate::api::types::{ApiError, Json};
use crate::domain::subscription::SubscriptionEvent;

/// `POST /api/webhooks/dodo` - subscription lifecycle events. Unknown event
/// types are acknowledged so the provider stops retrying them.
pub async fn dodo_webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> Result<ResponseJson<WebhookResponse>, ApiError> {
    match SubscriptionEvent::from_payload(&payload.event_type, &payload.data) {
        Some(event) => {
            info!(event_type = %payload.event_type, "Processing payment webhook");
            state.subscription_service.apply_event(event).await?;
        }
        None => {
            debug!(event_type = %payload.event_type, "Ignoring unhandled webhook event");
        }
    }

    Ok(ResponseJson(WebhookResponse { success: true }))
}
