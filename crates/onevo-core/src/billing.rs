//! Billing derivations.
//!
//! Pure functions over the plan catalog and subscription snapshots.
//! Nothing here mutates state or talks to the network: derived values
//! are always computed from server-confirmed snapshots, never from
//! optimistic local edits.

use std::sync::Arc;

use crate::model::{BillingPlan, PlanTier, Subscription, SubscriptionStatus};

/// The catalog entry matching the subscription's `plan_id`, if any.
pub fn current_plan(
    plans: &[Arc<BillingPlan>],
    subscription: Option<&Subscription>,
) -> Option<Arc<BillingPlan>> {
    let sub = subscription?;
    plans.iter().find(|p| p.plan_id == sub.plan_id).cloned()
}

/// Whether `plan` is the one the subscription is on.
pub fn is_current_plan(plan: &BillingPlan, subscription: Option<&Subscription>) -> bool {
    subscription.is_some_and(|sub| sub.plan_id == plan.plan_id)
}

/// Upgrade eligibility for a candidate plan.
///
/// - No subscription: any plan is an upgrade.
/// - Trial subscription: any plan is an upgrade regardless of rank.
/// - Otherwise both plan ids must rank on the `[Basic, Pro, Enterprise]`
///   ladder and the candidate must rank strictly higher. Unranked ids
///   (e.g. `agency`) never claim eligibility by rank.
pub fn can_upgrade(plan: &BillingPlan, subscription: Option<&Subscription>) -> bool {
    let Some(sub) = subscription else {
        return true;
    };
    if sub.status == SubscriptionStatus::Trial {
        return true;
    }

    match (
        PlanTier::from_plan_id(&plan.plan_id),
        PlanTier::from_plan_id(&sub.plan_id),
    ) {
        (Some(candidate), Some(current)) => candidate > current,
        _ => false,
    }
}

/// Monthly cost for the tenant.
///
/// Agency accounts pay per managed account: matching plan price times
/// `current_account_count`. Without a matching catalog entry the
/// subscription's own price stands in; without a subscription the
/// total is zero.
pub fn monthly_total(plans: &[Arc<BillingPlan>], subscription: Option<&Subscription>) -> f64 {
    let Some(sub) = subscription else {
        return 0.0;
    };
    let count = f64::from(sub.current_account_count.unwrap_or(1));
    match current_plan(plans, Some(sub)) {
        Some(plan) => plan.monthly_price * count,
        None => sub.monthly_price,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::SubscriptionType;

    fn plan(plan_id: &str, price: f64) -> Arc<BillingPlan> {
        Arc::new(BillingPlan {
            id: format!("bp-{plan_id}"),
            plan_id: plan_id.into(),
            name: plan_id.into(),
            subscription_type: SubscriptionType::User,
            monthly_price: price,
            account_limit: None,
            max_posts_per_month: None,
            analytics_enabled: false,
            team_features_enabled: false,
            is_active: true,
        })
    }

    fn subscription(plan_id: &str, status: SubscriptionStatus) -> Subscription {
        Subscription {
            id: "sub-1".into(),
            tenant_id: "t-1".into(),
            plan_id: plan_id.into(),
            subscription_type: SubscriptionType::User,
            status,
            current_account_count: None,
            account_limit: None,
            monthly_price: 15.0,
            current_period_start: None,
            current_period_end: None,
            cancel_at_period_end: false,
            trial_ends_at: None,
        }
    }

    fn catalog() -> Vec<Arc<BillingPlan>> {
        vec![
            plan("basic", 10.0),
            plan("pro", 25.0),
            plan("enterprise", 80.0),
        ]
    }

    #[test]
    fn current_plan_matches_by_plan_id() {
        let plans = catalog();
        let sub = subscription("pro", SubscriptionStatus::Active);
        let current = current_plan(&plans, Some(&sub)).unwrap();
        assert_eq!(current.plan_id, "pro");

        assert!(current_plan(&plans, None).is_none());
        let orphan = subscription("legacy", SubscriptionStatus::Active);
        assert!(current_plan(&plans, Some(&orphan)).is_none());
    }

    #[test]
    fn upgrade_from_basic_to_pro_is_allowed() {
        let sub = subscription("basic", SubscriptionStatus::Active);
        assert!(can_upgrade(&plan("pro", 25.0), Some(&sub)));
    }

    #[test]
    fn downgrade_from_enterprise_is_not_an_upgrade() {
        let sub = subscription("enterprise", SubscriptionStatus::Active);
        assert!(!can_upgrade(&plan("basic", 10.0), Some(&sub)));
        assert!(!can_upgrade(&plan("enterprise", 80.0), Some(&sub)));
    }

    #[test]
    fn trial_can_upgrade_regardless_of_rank() {
        let sub = subscription("enterprise", SubscriptionStatus::Trial);
        assert!(can_upgrade(&plan("basic", 10.0), Some(&sub)));
    }

    #[test]
    fn no_subscription_means_any_plan_upgrades() {
        assert!(can_upgrade(&plan("basic", 10.0), None));
    }

    #[test]
    fn unranked_plan_ids_never_upgrade_by_rank() {
        let sub = subscription("agency", SubscriptionStatus::Active);
        assert!(!can_upgrade(&plan("pro", 25.0), Some(&sub)));

        let sub = subscription("basic", SubscriptionStatus::Active);
        assert!(!can_upgrade(&plan("agency", 99.0), Some(&sub)));
    }

    #[test]
    fn monthly_total_scales_by_account_count() {
        let plans = catalog();
        let mut sub = subscription("basic", SubscriptionStatus::Active);
        sub.current_account_count = Some(5);
        assert!((monthly_total(&plans, Some(&sub)) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn monthly_total_falls_back_to_subscription_price() {
        let plans = catalog();
        let mut sub = subscription("legacy", SubscriptionStatus::Active);
        sub.current_account_count = Some(5);
        assert!((monthly_total(&plans, Some(&sub)) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn monthly_total_without_subscription_is_zero() {
        assert!(monthly_total(&catalog(), None).abs() < f64::EPSILON);
    }

    #[test]
    fn is_current_plan_compares_plan_ids() {
        let sub = subscription("pro", SubscriptionStatus::Active);
        assert!(is_current_plan(&plan("pro", 25.0), Some(&sub)));
        assert!(!is_current_plan(&plan("basic", 10.0), Some(&sub)));
        assert!(!is_current_plan(&plan("pro", 25.0), None));
    }
}
