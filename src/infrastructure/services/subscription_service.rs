//! Subscription service - applies payment-provider events

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::rate_limit::Tier;
use crate::domain::store::DocumentStore;
use crate::domain::subscription::{Subscription, SubscriptionEvent, SubscriptionStatus};
use crate::domain::DomainError;

pub struct SubscriptionService {
    subscriptions: Arc<dyn DocumentStore<Subscription>>,
}

impl std::fmt::Debug for SubscriptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionService").finish()
    }
}

impl SubscriptionService {
    pub fn new(subscriptions: Arc<dyn DocumentStore<Subscription>>) -> Self {
        Self { subscriptions }
    }

    /// Effective tier for rate limiting. No subscription row means free.
    pub async fn tier_for(&self, user_id: &str) -> Result<Tier, DomainError> {
        Ok(self
            .subscriptions
            .get(&user_id.to_string())
            .await?
            .map(|s| s.effective_tier())
            .unwrap_or_default())
    }

    pub async fn apply_event(&self, event: SubscriptionEvent) -> Result<(), DomainError> {
        match event {
            SubscriptionEvent::Activated { user_id, plan } => {
                let tier = Tier::from_plan(&plan);
                info!(user_id = %user_id, ?tier, "Subscription activated");
                self.subscriptions
                    .save(Subscription::new(user_id, tier))
                    .await?;
            }
            SubscriptionEvent::Cancelled { user_id } => {
                self.set_status(&user_id, SubscriptionStatus::Cancelled)
                    .await?;
            }
            SubscriptionEvent::Expired { user_id } => {
                self.set_status(&user_id, SubscriptionStatus::Expired)
                    .await?;
            }
            SubscriptionEvent::PaymentFailed { user_id } => {
                self.set_status(&user_id, SubscriptionStatus::PastDue)
                    .await?;
            }
        }

        Ok(())
    }

    async fn set_status(
        &self,
        user_id: &str,
        status: SubscriptionStatus,
    ) -> Result<(), DomainError> {
        let mut subscription = self
            .subscriptions
            .get(&user_id.to_string())
            .await?
            .unwrap_or_else(|| Subscription::new(user_id, Tier::Free));

        subscription.status = status;
        subscription.updated_at = Utc::now();

        info!(user_id = %user_id, ?status, "Subscription status updated");
        self.subscriptions.save(subscription).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::InMemoryStore;

    fn service() -> SubscriptionService {
        SubscriptionService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn test_unknown_user_is_free() {
        assert_eq!(service().tier_for("nobody").await.unwrap(), Tier::Free);
    }

    #[tokio::test]
    async fn test_activation_sets_tier() {
        let service = service();

        service
            .apply_event(SubscriptionEvent::Activated {
                user_id: "user-1".to_string(),
                plan: "pro".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(service.tier_for("user-1").await.unwrap(), Tier::Pro);
    }

    #[tokio::test]
    async fn test_cancellation_downgrades_to_free() {
        let service = service();

        service
            .apply_event(SubscriptionEvent::Activated {
                user_id: "user-1".to_string(),
                plan: "hobbyist".to_string(),
            })
            .await
            .unwrap();
        service
            .apply_event(SubscriptionEvent::Cancelled {
                user_id: "user-1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(service.tier_for("user-1").await.unwrap(), Tier::Free);
    }

    #[tokio::test]
    async fn test_payment_failure_keeps_tier() {
        let service = service();

        service
            .apply_event(SubscriptionEvent::Activated {
                user_id: "user-1".to_string(),
                plan: "hobbyist".to_string(),
            })
            .await
            .unwrap();
        service
            .apply_event(SubscriptionEvent::PaymentFailed {
                user_id: "user-1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(service.tier_for("user-1").await.unwrap(), Tier::Hobbyist);
    }
}
