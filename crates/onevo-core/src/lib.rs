//! Reactive data layer between `onevo-api` and UI consumers (CLI today,
//! other shells later).
//!
//! This crate owns the business logic, domain model, and reactive data
//! infrastructure for the Onevo workspace:
//!
//! - **[`Workspace`]** — Central facade managing the session lifecycle:
//!   owns the API client, dispatches load/create/update/delete operations
//!   against the per-entity stores, and guarantees that every in-flight
//!   request is cancelled on [`shutdown()`](Workspace::shutdown).
//!   [`Workspace::oneshot()`] provides a fire-and-forget mode for single
//!   CLI invocations.
//!
//! - **[`DataStore`]** — One reactive [`EntityStore`] per entity family
//!   (clients, billing plans, invoices, payment methods, webhook
//!   subscriptions, webhook events, published posts) plus an
//!   [`EntitySlot`] for the tenant's single subscription. Each store
//!   carries the last-fetched snapshot, a loading flag, and an error flag
//!   observable via `watch` channels; snapshots are replaced wholesale,
//!   never merged in place.
//!
//! - **[`SelectionResolver`]** — Keeps the session's "active client"
//!   consistent across three sources of truth: the persisted selection,
//!   the current route, and the freshness of the client collection.
//!   Invalid selections self-heal silently.
//!
//! - **[`billing`]** — Pure derivations over subscription + plan catalog
//!   snapshots: current plan, upgrade eligibility, monthly total.
//!
//! - **Domain model** ([`model`]) — Canonical types (`Client`,
//!   `BillingPlan`, `Subscription`, `WebhookSubscription`,
//!   `PublishedPost`, …) converted from the wire DTOs in `onevo-api`.

pub mod billing;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod requests;
pub mod selection;
pub mod store;
pub mod stream;
pub mod workspace;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::WorkspaceConfig;
pub use error::CoreError;
pub use requests::{CreateClientRequest, CreateWebhookRequest, UpdateClientRequest};
pub use selection::{MemorySelectionStore, SelectionResolver, SelectionStore, route_client_target};
pub use store::DataStore;
pub use store::entity::{EntityStore, Record};
pub use store::slot::EntitySlot;
pub use stream::EntityStream;
pub use workspace::Workspace;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    BillingPlan,
    CheckoutSession,
    Client,
    ClientStatus,
    Invoice,
    PaymentMethod,
    PlanTier,
    PublishLog,
    PublishedPost,
    Subscription,
    SubscriptionStatus,
    SubscriptionType,
    WebhookEvent,
    WebhookSubscription,
};
