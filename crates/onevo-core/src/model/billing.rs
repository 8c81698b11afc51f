// ── Billing domain types ──
//
// The subscription status is observed, never driven: transitions happen
// server-side (Trial → Active, Trial/Active → Cancelled, Active → PastDue,
// any → Expired). "Cancel" only requests cancellation and re-reads the
// resulting status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which catalog a plan or subscription belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum SubscriptionType {
    User,
    Agency,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
#[non_exhaustive]
pub enum SubscriptionStatus {
    Trial,
    Active,
    Cancelled,
    Expired,
    PastDue,
}

/// The fixed upgrade rank order for self-serve plans.
///
/// Plan ids outside this ladder (e.g. `agency`) are unranked and never
/// upgrade-eligible by rank comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlanTier {
    Basic,
    Pro,
    Enterprise,
}

impl PlanTier {
    /// Parse a tier from a catalog `plan_id` (case-insensitive prefix,
    /// so `pro_monthly` still ranks as Pro).
    pub fn from_plan_id(plan_id: &str) -> Option<Self> {
        let lower = plan_id.to_ascii_lowercase();
        if lower.starts_with("basic") {
            Some(Self::Basic)
        } else if lower.starts_with("pro") {
            Some(Self::Pro)
        } else if lower.starts_with("enterprise") {
            Some(Self::Enterprise)
        } else {
            None
        }
    }
}

/// An entry in the immutable plan catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingPlan {
    pub id: String,
    pub plan_id: String,
    pub name: String,
    pub subscription_type: SubscriptionType,
    pub monthly_price: f64,
    pub account_limit: Option<u32>,
    pub max_posts_per_month: Option<u32>,
    pub analytics_enabled: bool,
    pub team_features_enabled: bool,
    pub is_active: bool,
}

/// The tenant's current subscription snapshot (history is not modeled
/// client-side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub tenant_id: String,
    pub plan_id: String,
    pub subscription_type: SubscriptionType,
    pub status: SubscriptionStatus,
    pub current_account_count: Option<u32>,
    pub account_limit: Option<u32>,
    pub monthly_price: f64,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

/// Hosted payment session returned by checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub checkout_url: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub tenant_id: String,
    pub invoice_number: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub tenant_id: String,
    pub provider: Option<String>,
    pub card_brand: Option<String>,
    pub card_last4: Option<String>,
    pub exp_month: Option<u8>,
    pub exp_year: Option<u16>,
    pub is_default: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn plan_tier_ranks_in_upgrade_order() {
        assert!(PlanTier::Basic < PlanTier::Pro);
        assert!(PlanTier::Pro < PlanTier::Enterprise);
    }

    #[test]
    fn plan_tier_parses_prefixed_ids() {
        assert_eq!(PlanTier::from_plan_id("basic"), Some(PlanTier::Basic));
        assert_eq!(PlanTier::from_plan_id("Pro_Monthly"), Some(PlanTier::Pro));
        assert_eq!(
            PlanTier::from_plan_id("ENTERPRISE"),
            Some(PlanTier::Enterprise)
        );
    }

    #[test]
    fn agency_plan_id_is_unranked() {
        assert_eq!(PlanTier::from_plan_id("agency"), None);
    }

    #[test]
    fn subscription_status_parses_case_insensitively() {
        let status: SubscriptionStatus = "pastdue".parse().unwrap();
        assert_eq!(status, SubscriptionStatus::PastDue);
    }
}
