//! Canonical domain types.
//!
//! Converted from the wire DTOs in `onevo-api` (see [`crate::convert`]);
//! ids are backend-assigned opaque strings.

pub mod billing;
pub mod client;
pub mod post;
pub mod webhook;

pub use billing::{
    BillingPlan, CheckoutSession, Invoice, PaymentMethod, PlanTier, Subscription,
    SubscriptionStatus, SubscriptionType,
};
pub use client::{Client, ClientStatus};
pub use post::{PublishLog, PublishedPost};
pub use webhook::{WebhookEvent, WebhookSubscription};
