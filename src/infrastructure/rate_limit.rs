//! Usage accounting service
//!
//! Wraps the pure rate policy with storage and a mutex so that the check and
//! the consume happen as one step. Two concurrent requests from the same user
//! cannot both pass a check the combined usage would fail.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::rate_limit::{evaluate, RateDecision, Tier, UsageCounters};
use crate::domain::store::DocumentStore;
use crate::domain::DomainError;

#[derive(Debug)]
pub struct UsageService {
    store: Arc<dyn DocumentStore<UsageCounters>>,
    // Serializes check-and-consume across requests in this process.
    lock: Mutex<()>,
}

impl UsageService {
    pub fn new(store: Arc<dyn DocumentStore<UsageCounters>>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    async fn load_counters(&self, user_id: &str) -> Result<UsageCounters, DomainError> {
        let today = Utc::now().date_naive();
        let key = UsageCounters::key_for(user_id, today);

        match self.store.get(&key).await? {
            Some(counters) => Ok(counters),
            None => Ok(UsageCounters::new(user_id, today)),
        }
    }

    /// Checks the estimated request against the tier ceilings and, if it
    /// passes, records the estimate before releasing the lock.
    pub async fn check_and_consume(
        &self,
        user_id: &str,
        tier: Tier,
        estimated_tokens: u64,
    ) -> Result<RateDecision, DomainError> {
        let _guard = self.lock.lock().await;

        let mut counters = self.load_counters(user_id).await?;
        counters.roll_minute(UsageCounters::current_minute());

        let decision = evaluate(&tier.limits(), &counters, estimated_tokens);

        if decision.allowed {
            counters.record(estimated_tokens);
            self.store.save(counters).await?;
        } else {
            debug!(
                user_id = %user_id,
                reason = decision.reason.as_deref().unwrap_or(""),
                "Request denied by rate limit"
            );
        }

        Ok(decision)
    }

    /// Replaces the estimated token charge with the provider-reported count
    /// once the response is in.
    pub async fn settle(
        &self,
        user_id: &str,
        estimated_tokens: u64,
        actual_tokens: u64,
    ) -> Result<(), DomainError> {
        if estimated_tokens == actual_tokens {
            return Ok(());
        }

        let _guard = self.lock.lock().await;

        let mut counters = self.load_counters(user_id).await?;
        counters.daily_tokens = counters
            .daily_tokens
            .saturating_sub(estimated_tokens)
            .saturating_add(actual_tokens);
        counters.minute_tokens = counters
            .minute_tokens
            .saturating_sub(estimated_tokens)
            .saturating_add(actual_tokens);

        self.store.save(counters).await?;
        Ok(())
    }

    /// Current counters for a user, for the usage endpoint
    pub async fn usage_for(&self, user_id: &str) -> Result<UsageCounters, DomainError> {
        let mut counters = self.load_counters(user_id).await?;
        counters.roll_minute(UsageCounters::current_minute());
        Ok(counters)
    }
}
