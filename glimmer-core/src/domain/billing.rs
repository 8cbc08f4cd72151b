//! Subscription and billing domain types
//!
//! Checkout itself happens on the payment processor's hosted page; these
//! types only describe what the backend reports about plans and the current
//! subscription.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire;

/// A purchasable subscription plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub plan_id: String,
    pub name: String,
    /// Price in the smallest currency unit (cents)
    pub price: u64,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl SubscriptionPlan {
    /// Price formatted with two decimals, e.g. `4999` -> `"49.99"`
    pub fn display_price(&self) -> String {
        format!("{}.{:02}", self.price / 100, self.price % 100)
    }
}

/// The authenticated user's subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub plan_id: Option<String>,
    pub status: String,
    #[serde(deserialize_with = "wire::timestamp")]
    pub current_period_end: DateTime<Utc>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

/// Display state of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Active,
    Cancelling,
    Expired,
}

impl std::fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionState::Active => write!(f, "Active"),
            SubscriptionState::Cancelling => write!(f, "Cancelling"),
            SubscriptionState::Expired => write!(f, "Expired"),
        }
    }
}

impl Subscription {
    /// Active while the status is `active` and the period has not ended
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status.eq_ignore_ascii_case("active") && now < self.current_period_end
    }

    pub fn state(&self, now: DateTime<Utc>) -> SubscriptionState {
        if !self.is_active(now) {
            SubscriptionState::Expired
        } else if self.cancel_at_period_end {
            SubscriptionState::Cancelling
        } else {
            SubscriptionState::Active
        }
    }

    /// Whole days left in the period, rounded up; negative once expired
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        const DAY_SECS: i64 = 24 * 60 * 60;
        let secs = (self.current_period_end - now).num_seconds();
        secs.div_euclid(DAY_SECS) + i64::from(secs.rem_euclid(DAY_SECS) != 0)
    }
}
