//! Usage endpoint

use axum::{extract::State, Json as ResponseJson};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::chat::UsageResponse;
use crate::api::types::ApiError;

/// `GET /api/usage` - today's counters and effective tier
pub async fn usage(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<ResponseJson<UsageResponse>, ApiError> {
    let tier = state.subscription_service.tier_for(&user.user_id).await?;
    let counters = state.usage_service.usage_for(&user.user_id).await?;

    Ok(ResponseJson(UsageResponse {
        success: true,
        tier: format!("{:?}", tier).to_lowercase(),
        daily_tokens: counters.daily_tokens,
        daily_requests: counters.daily_requests,
        minute_tokens: counters.minute_tokens,
        minute_requests: counters.minute_requests,
    }))
}
