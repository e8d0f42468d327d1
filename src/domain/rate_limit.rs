//! Per-tier rate/usage accounting policy
//!
//! One counter row per user per day, plus minute-level counters reset when
//! the wall-clock minute changes. The policy here is pure; the atomic
//! check-and-consume lives in `infrastructure::rate_limit`.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::llm::Message;
use crate::domain::store::Document;

/// Fixed token allowance added per request for the assembled system prompt
pub const SYSTEM_PROMPT_OVERHEAD_TOKENS: u64 = 500;

/// Subscription plan level governing quotas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Hobbyist,
    Pro,
    Unlimited,
}

impl Tier {
    pub fn from_plan(plan: &str) -> Self {
        match plan.to_lowercase().as_str() {
            "hobbyist" => Self::Hobbyist,
            "pro" => Self::Pro,
            "unlimited" | "enterprise" => Self::Unlimited,
            _ => Self::Free,
        }
    }

    pub fn limits(&self) -> TierLimits {
        match self {
            Self::Free => TierLimits {
                tokens_per_day: Some(20_000),
                requests_per_day: Some(100),
                tokens_per_minute: Some(4_000),
                requests_per_minute: Some(10),
            },
            Self::Hobbyist => TierLimits {
                tokens_per_day: Some(399_000),
                requests_per_day: Some(2_000),
                tokens_per_minute: Some(20_000),
                requests_per_minute: Some(30),
            },
            Self::Pro => TierLimits {
                tokens_per_day: Some(2_000_000),
                requests_per_day: Some(20_000),
                tokens_per_minute: Some(100_000),
                requests_per_minute: Some(120),
            },
            Self::Unlimited => TierLimits::unlimited(),
        }
    }
}

/// Quota ceilings for a tier. `None` means no ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub tokens_per_day: Option<u64>,
    pub requests_per_day: Option<u64>,
    pub tokens_per_minute: Option<u64>,
    pub requests_per_minute: Option<u64>,
}

impl TierLimits {
    pub fn unlimited() -> Self {
        Self {
            tokens_per_day: None,
            requests_per_day: None,
            tokens_per_minute: None,
            requests_per_minute: None,
        }
    }
}

/// Crude character-based token estimate: `ceil(chars / 4)`. Deliberately
/// does not mirror the downstream tokenizer.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

/// Estimate for a full request: new message + history + prompt overhead
pub fn estimate_request_tokens(message: &str, history: &[Message]) -> u64 {
    let history_tokens: u64 = history
        .iter()
        .map(|m| estimate_tokens(m.content()))
        .sum();

    estimate_tokens(message) + history_tokens + SYSTEM_PROMPT_OVERHEAD_TOKENS
}

/// Counter row for one user and one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageCounters {
    key: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub daily_tokens: u64,
    pub daily_requests: u64,
    pub minute_tokens: u64,
    pub minute_requests: u64,
    pub last_minute: i64,
}

impl UsageCounters {
    pub fn new(user_id: impl Into<String>, date: NaiveDate) -> Self {
        let user_id = user_id.into();
        Self {
            key: Self::key_for(&user_id, date),
            user_id,
            date,
            daily_tokens: 0,
            daily_requests: 0,
            minute_tokens: 0,
            minute_requests: 0,
            last_minute: 0,
        }
    }

    pub fn key_for(user_id: &str, date: NaiveDate) -> String {
        format!("{}:{}", user_id, date)
    }

    /// Minute bucket index for a unix-millisecond timestamp
    pub fn minute_of(now_ms: i64) -> i64 {
        now_ms / 60_000
    }

    pub fn current_minute() -> i64 {
        Self::minute_of(Utc::now().timestamp_millis())
    }

    /// Resets the minute counters when the wall-clock minute moved on
    pub fn roll_minute(&mut self, now_minute: i64) {
        if self.last_minute != now_minute {
            self.minute_tokens = 0;
            self.minute_requests = 0;
            self.last_minute = now_minute;
        }
    }

    pub fn record(&mut self, tokens: u64) {
        self.daily_tokens += tokens;
        self.daily_requests += 1;
        self.minute_tokens += tokens;
        self.minute_requests += 1;
    }
}

impl Document for UsageCounters {
    type Key = String;

    fn key(&self) -> &Self::Key {
        &self.key
    }
}

/// Outcome of a rate check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining_tokens: Option<u64>,
    pub reason: Option<String>,
}

impl RateDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            remaining_tokens: None,
            reason: None,
        }
    }

    fn denied(reason: impl Into<String>, remaining_tokens: Option<u64>) -> Self {
        Self {
            allowed: false,
            remaining_tokens,
            reason: Some(reason.into()),
        }
    }
}

/// Evaluates an estimated request against the tier ceilings. Counters must
/// already be minute-rolled for `now`.
pub fn evaluate(limits: &TierLimits, counters: &UsageCounters, estimated_tokens: u64) -> RateDecision {
    if let Some(ceiling) = limits.tokens_per_day {
        if counters.daily_tokens + estimated_tokens > ceiling {
            let remaining = ceiling.saturating_sub(counters.daily_tokens);
            return RateDecision::denied(
                format!(
                    "Daily token limit reached ({} of {} tokens used)",
                    counters.daily_tokens, ceiling
                ),
                Some(remaining),
            );
        }
    }

    if let Some(ceiling) = limits.requests_per_day {
        if counters.daily_requests + 1 > ceiling {
            return RateDecision::denied(
                format!("Daily request limit of {} reached", ceiling),
                None,
            );
        }
    }

    if let Some(ceiling) = limits.tokens_per_minute {
        if counters.minute_tokens + estimated_tokens > ceiling {
            return RateDecision::denied(
                "Per-minute token limit reached, try again shortly".to_string(),
                None,
            );
        }
    }

    if let Some(ceiling) = limits.requests_per_minute {
        if counters.minute_requests + 1 > ceiling {
            return RateDecision::denied(
                "Per-minute request limit reached, try again shortly".to_string(),
                None,
            );
        }
    }

    RateDecision::allow()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters() -> UsageCounters {
        UsageCounters::new("user-1", NaiveDate::from_ymd_opt(2026, 8, 30).unwrap())
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_estimate_request_includes_history_and_overhead() {
        let history = vec![Message::user("12345678"), Message::assistant("1234")];
        let estimate = estimate_request_tokens("abcd", &history);
        assert_eq!(estimate, 1 + 2 + 1 + SYSTEM_PROMPT_OVERHEAD_TOKENS);
    }

    #[test]
    fn test_within_limits_allowed() {
        let decision = evaluate(&Tier::Free.limits(), &counters(), 1_000);
        assert!(decision.allowed);
    }

    #[test]
    fn test_hobbyist_near_daily_ceiling_denied() {
        // 398,900 used of 399,000; a 200-token request must be denied.
        let mut c = counters();
        c.daily_tokens = 398_900;

        let decision = evaluate(&Tier::Hobbyist.limits(), &c, 200);

        assert!(!decision.allowed);
        assert_eq!(decision.remaining_tokens, Some(100));
        assert!(decision.reason.is_some());
    }

    #[test]
    fn test_exactly_at_ceiling_allowed() {
        let mut c = counters();
        c.daily_tokens = 398_800;

        let decision = evaluate(&Tier::Hobbyist.limits(), &c, 200);
        assert!(decision.allowed);
    }

    #[test]
    fn test_unlimited_tier_never_denied() {
        let mut c = counters();
        c.daily_tokens = u64::MAX / 2;
        c.daily_requests = u64::MAX / 2;

        let decision = evaluate(&TierLimits::unlimited(), &c, 1_000_000);
        assert!(decision.allowed);
    }

    #[test]
    fn test_minute_roll_resets_counters() {
        let mut c = counters();
        c.record(100);
        assert_eq!(c.minute_tokens, 100);

        let next_minute = c.last_minute + 1;
        c.roll_minute(next_minute);

        assert_eq!(c.minute_tokens, 0);
        assert_eq!(c.minute_requests, 0);
        assert_eq!(c.daily_tokens, 100);
        assert_eq!(c.last_minute, next_minute);
    }

    #[test]
    fn test_minute_request_ceiling() {
        let mut c = counters();
        c.minute_requests = 10;

        let decision = evaluate(&Tier::Free.limits(), &c, 1);
        assert!(!decision.allowed);
    }

    #[test]
    fn test_tier_from_plan() {
        assert_eq!(Tier::from_plan("Hobbyist"), Tier::Hobbyist);
        assert_eq!(Tier::from_plan("PRO"), Tier::Pro);
        assert_eq!(Tier::from_plan("enterprise"), Tier::Unlimited);
        assert_eq!(Tier::from_plan("unknown"), Tier::Free);
    }
}
