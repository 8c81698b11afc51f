//! Reactive per-entity stores.

pub mod entity;
pub mod slot;

use crate::model::{
    BillingPlan, Client, Invoice, PaymentMethod, PublishedPost, Subscription, WebhookEvent,
    WebhookSubscription,
};

pub use entity::{EntityStore, Record};
pub use slot::EntitySlot;

// ── Record impls ────────────────────────────────────────────────────

impl Record for Client {
    fn id(&self) -> &str {
        &self.id
    }

    /// Clients list alphabetically, case-insensitive.
    fn sort_key(&self) -> Option<String> {
        Some(self.name.to_lowercase())
    }
}

impl Record for BillingPlan {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Invoice {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for PaymentMethod {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for WebhookSubscription {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for WebhookEvent {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for PublishedPost {
    fn id(&self) -> &str {
        &self.id
    }
}

// ── DataStore ───────────────────────────────────────────────────────

/// One reactive store per entity family, shared behind the
/// [`Workspace`](crate::Workspace) facade.
///
/// Each store is independent: a failed invoice fetch never touches the
/// client list, and per-family flags let a UI render partial data.
#[derive(Default)]
pub struct DataStore {
    pub clients: EntityStore<Client>,
    pub billing_plans: EntityStore<BillingPlan>,
    pub subscription: EntitySlot<Subscription>,
    pub invoices: EntityStore<Invoice>,
    pub payment_methods: EntityStore<PaymentMethod>,
    pub webhooks: EntityStore<WebhookSubscription>,
    pub webhook_events: EntityStore<WebhookEvent>,
    pub posts: EntityStore<PublishedPost>,
}

impl DataStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}
