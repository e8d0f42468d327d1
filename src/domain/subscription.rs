//! Subscription state per user, driven by payment-provider webhooks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::rate_limit::Tier;
use crate::domain::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    PastDue,
    Cancelled,
    Expired,
}

/// A user's current plan. One row per user; absent row means free tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    user_id: String,
    pub tier: Tier,
    pub status: SubscriptionStatus,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(user_id: impl Into<String>, tier: Tier) -> Self {
        Self {
            user_id: user_id.into(),
            tier,
            status: SubscriptionStatus::Active,
            updated_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Effective tier for rate limiting. Cancelled/expired plans fall back
    /// to free; past-due keeps the paid tier until the provider resolves it.
    pub fn effective_tier(&self) -> Tier {
        match self.status {
            SubscriptionStatus::Active | SubscriptionStatus::PastDue => self.tier,
            SubscriptionStatus::Cancelled | SubscriptionStatus::Expired => Tier::Free,
        }
    }
}

impl Document for Subscription {
    type Key = String;

    fn key(&self) -> &Self::Key {
        &self.user_id
    }
}

/// Payment-provider webhook events this API consumes. Anything else is
/// acknowledged and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEvent {
    PaymentFailed { user_id: String },
    Activated { user_id: String, plan: String },
    Cancelled { user_id: String },
    Expired { user_id: String },
}

impl SubscriptionEvent {
    /// Maps a `{type, data}` payload to an event. Returns `None` for
    /// unhandled types or payloads missing the user reference.
    pub fn from_payload(event_type: &str, data: &serde_json::Value) -> Option<Self> {
        let user_id = data
            .get("customer_id")
            .or_else(|| data.get("user_id"))
            .and_then(|v| v.as_str())?
            .to_string();

        match event_type {
            "payment.failed" => Some(Self::PaymentFailed { user_id }),
            "subscription.active" => {
                let plan = data
                    .get("plan")
                    .or_else(|| data.get("product_name"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("free")
                    .to_string();
                Some(Self::Activated { user_id, plan })
            }
            "subscription.cancelled" => Some(Self::Cancelled { user_id }),
            "subscription.expired" => Some(Self::Expired { user_id }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_effective_tier_downgrades_on_cancel() {
        let mut sub = Subscription::new("user-1", Tier::Pro);
        assert_eq!(sub.effective_tier(), Tier::Pro);

        sub.status = SubscriptionStatus::Cancelled;
        assert_eq!(sub.effective_tier(), Tier::Free);
    }

    #[test]
    fn test_past_due_keeps_tier() {
        let mut sub = Subscription::new("user-1", Tier::Hobbyist);
        sub.status = SubscriptionStatus::PastDue;
        assert_eq!(sub.effective_tier(), Tier::Hobbyist);
    }

    #[test]
    fn test_event_parsing() {
        let event = SubscriptionEvent::from_payload(
            "subscription.active",
            &json!({ "customer_id": "user-1", "plan": "pro" }),
        );
        assert_eq!(
            event,
            Some(SubscriptionEvent::Activated {
                user_id: "user-1".to_string(),
                plan: "pro".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_event_ignored() {
        let event =
            SubscriptionEvent::from_payload("refund.created", &json!({ "customer_id": "u" }));
        assert_eq!(event, None);
    }

    #[test]
    fn test_missing_user_reference_ignored() {
        let event = SubscriptionEvent::from_payload("payment.failed", &json!({}));
        assert_eq!(event, None);
    }
}
