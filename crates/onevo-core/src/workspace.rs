// ── Workspace facade ──
//
// Session lifecycle for one tenant: owns the API client, dispatches
// entity-store operations, keeps the active-client selection
// reconciled, and cancels every in-flight request on shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use onevo_api::types::{
    AccountCountRequest, CheckoutRequest, ClientCreateUpdate, SubscriptionCreateRequest,
    WebhookCreateRequest,
};
use onevo_api::{ApiClient, TransportConfig};

use crate::billing;
use crate::config::WorkspaceConfig;
use crate::error::CoreError;
use crate::model::{
    BillingPlan, CheckoutSession, Client, PublishLog, PublishedPost, Subscription,
    WebhookSubscription,
};
use crate::requests::{CreateClientRequest, CreateWebhookRequest, UpdateClientRequest};
use crate::selection::{
    MemorySelectionStore, SelectionResolver, SelectionStore, route_client_target,
};
use crate::store::{DataStore, EntityStore, Record};

/// Pause between a route-triggered client load and the retry
/// extraction, so dependent sub-collections can settle.
const ROUTE_SETTLE_DELAY: Duration = Duration::from_millis(150);

// ── Workspace ───────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<WorkspaceInner>`. Every operation races
/// the session's cancellation token, so [`shutdown()`](Self::shutdown)
/// reliably tears down in-flight work.
#[derive(Clone)]
pub struct Workspace {
    inner: Arc<WorkspaceInner>,
}

struct WorkspaceInner {
    config: WorkspaceConfig,
    api: ApiClient,
    store: DataStore,
    selection: SelectionResolver,
    cancel: CancellationToken,
}

impl Workspace {
    /// Open a workspace session. Does not issue any requests — call
    /// [`refresh()`](Self::refresh) or the individual loads.
    pub fn new(
        config: WorkspaceConfig,
        selection_store: Arc<dyn SelectionStore>,
    ) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let api = ApiClient::from_token(config.api_url.as_str(), &config.token, &transport)?;

        Ok(Self {
            inner: Arc::new(WorkspaceInner {
                config,
                api,
                store: DataStore::new(),
                selection: SelectionResolver::new(selection_store),
                cancel: CancellationToken::new(),
            }),
        })
    }

    /// One-shot session for single CLI invocations: selection is held
    /// in memory only.
    pub fn oneshot(config: WorkspaceConfig) -> Result<Self, CoreError> {
        Self::new(config, Arc::new(MemorySelectionStore::new()))
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &DataStore {
        &self.inner.store
    }

    pub fn selection(&self) -> &SelectionResolver {
        &self.inner.selection
    }

    /// Cancel all in-flight operations and end the session.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        debug!("workspace shut down");
    }

    /// Race an API call against session shutdown.
    async fn guarded<T>(
        &self,
        fut: impl Future<Output = Result<T, onevo_api::Error>>,
    ) -> Result<T, CoreError> {
        tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => Err(CoreError::Cancelled),
            result = fut => result.map_err(CoreError::from),
        }
    }

    // ── Clients ──────────────────────────────────────────────────────

    /// Fetch the full client collection, replacing the snapshot and
    /// reconciling the active selection.
    pub async fn load_clients(&self) -> Result<(), CoreError> {
        let store = &self.inner.store.clients;
        store.begin_load();

        match self.guarded(self.inner.api.list_clients()).await {
            Ok(wire) => {
                store.finish_load(wire.into_iter().map(Client::from).collect());
                self.inner.selection.reconcile(&store.snapshot());
                Ok(())
            }
            Err(err) => {
                note_failure(store, &err);
                Err(err)
            }
        }
    }

    /// Create a client. The new record becomes the active selection.
    pub async fn create_client(&self, req: CreateClientRequest) -> Result<Arc<Client>, CoreError> {
        let body = ClientCreateUpdate::from(req);
        let created = Client::from(self.guarded(self.inner.api.create_client(&body)).await?);
        let id = created.id.clone();

        self.inner.store.clients.insert(created);
        self.inner.selection.set_active(&id);

        self.inner
            .store
            .clients
            .get(&id)
            .ok_or_else(|| CoreError::Internal("created client missing from snapshot".into()))
    }

    /// Update a client, replacing the matching record on success.
    pub async fn update_client(
        &self,
        client_id: &str,
        req: UpdateClientRequest,
    ) -> Result<Arc<Client>, CoreError> {
        let existing = self
            .inner
            .store
            .clients
            .get(client_id)
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "client".into(),
                identifier: client_id.to_owned(),
            })?;

        let body = merge_client_update(&existing, &req);
        let updated = Client::from(
            self.guarded(self.inner.api.update_client(client_id, &body))
                .await?,
        );
        let id = updated.id.clone();

        // Defensive: only replace records we actually hold.
        if self.inner.store.clients.contains(&id) {
            self.inner.store.clients.insert(updated);
        } else {
            debug!(client_id = %id, "update response for unknown client ignored");
        }

        self.inner
            .store
            .clients
            .get(&id)
            .ok_or_else(|| CoreError::Internal("updated client missing from snapshot".into()))
    }

    /// Delete a client. If it was the active selection, the selection
    /// falls back to the first remaining client, or clears.
    pub async fn delete_client(&self, client_id: &str) -> Result<(), CoreError> {
        self.guarded(self.inner.api.delete_client(client_id))
            .await?;

        self.inner.store.clients.remove(client_id);

        if self.inner.selection.active_client_id().as_deref() == Some(client_id) {
            match self.inner.store.clients.snapshot().first() {
                Some(next) => self.inner.selection.set_active(&next.id),
                None => self.inner.selection.clear(),
            }
        }
        Ok(())
    }

    // ── Route resolution ─────────────────────────────────────────────

    /// Resolve the active client from a completed navigation.
    ///
    /// A missing identifier exits client context. An identifier not in
    /// the collection triggers exactly one load, then a single retry
    /// after a short settle delay; if it still cannot be found the
    /// selection is left unchanged and a diagnostic is logged.
    pub async fn resolve_route(&self, param: Option<&str>, path: &str) -> Result<(), CoreError> {
        let Some(target) = route_client_target(param, path) else {
            self.inner.selection.clear();
            return Ok(());
        };

        if self.inner.store.clients.contains(&target) {
            self.inner.selection.set_active(&target);
            return Ok(());
        }

        self.load_clients().await?;
        tokio::time::sleep(ROUTE_SETTLE_DELAY).await;

        if self.inner.store.clients.contains(&target) {
            self.inner.selection.set_active(&target);
        } else {
            warn!(
                client_id = %target,
                "route references a client not in the collection; selection unchanged"
            );
        }
        Ok(())
    }

    // ── Billing ──────────────────────────────────────────────────────

    /// Fetch the plan catalog for the configured subscription type.
    pub async fn load_billing_plans(&self) -> Result<(), CoreError> {
        let store = &self.inner.store.billing_plans;
        store.begin_load();

        let sub_type = self.inner.config.subscription_type.to_string();
        match self
            .guarded(self.inner.api.list_billing_plans(&sub_type))
            .await
        {
            Ok(wire) => {
                store.finish_load(wire.into_iter().map(BillingPlan::from).collect());
                Ok(())
            }
            Err(err) => {
                note_failure(store, &err);
                Err(err)
            }
        }
    }

    /// Fetch the tenant's subscription. Absence (404) is a valid empty
    /// state, not a failure.
    pub async fn load_subscription(&self) -> Result<(), CoreError> {
        let slot = &self.inner.store.subscription;
        slot.begin_load();

        match self
            .guarded(
                self.inner
                    .api
                    .get_tenant_subscription(&self.inner.config.tenant_id),
            )
            .await
        {
            Ok(wire) => {
                slot.finish_load(wire.map(Subscription::from));
                Ok(())
            }
            Err(err) => {
                match err {
                    CoreError::Cancelled => slot.abort_load(),
                    ref e => slot.fail(e.to_string()),
                }
                Err(err)
            }
        }
    }

    /// Start a subscription on `plan_id`, then re-fetch the
    /// server-confirmed state.
    pub async fn create_subscription(&self, plan_id: &str) -> Result<(), CoreError> {
        let body = SubscriptionCreateRequest {
            plan_id: plan_id.to_owned(),
            subscription_type: self.inner.config.subscription_type.to_string(),
        };
        self.guarded(self.inner.api.create_subscription(&body))
            .await?;
        self.load_subscription().await
    }

    /// Open a hosted checkout session for `plan_id`. The subscription
    /// is re-fetched afterwards so derived values reflect
    /// server-confirmed state.
    pub async fn checkout(
        &self,
        plan_id: &str,
        success_url: Option<String>,
        cancel_url: Option<String>,
    ) -> Result<CheckoutSession, CoreError> {
        let body = CheckoutRequest {
            plan_id: plan_id.to_owned(),
            subscription_type: self.inner.config.subscription_type.to_string(),
            success_url,
            cancel_url,
        };
        let session =
            CheckoutSession::from(self.guarded(self.inner.api.checkout(&body)).await?);
        self.load_subscription().await?;
        Ok(session)
    }

    /// Request cancellation of the current subscription and re-read
    /// the resulting status (the server defers the actual transition).
    pub async fn cancel_subscription(&self) -> Result<(), CoreError> {
        let sub = self
            .inner
            .store
            .subscription
            .get()
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "subscription".into(),
                identifier: self.inner.config.tenant_id.clone(),
            })?;

        self.guarded(self.inner.api.cancel_subscription(&sub.id))
            .await?;
        self.load_subscription().await
    }

    /// Change the billed account count, then re-fetch the subscription.
    pub async fn set_account_count(&self, count: u32) -> Result<(), CoreError> {
        let sub = self
            .inner
            .store
            .subscription
            .get()
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "subscription".into(),
                identifier: self.inner.config.tenant_id.clone(),
            })?;

        let body = AccountCountRequest {
            account_count: count,
        };
        self.guarded(
            self.inner
                .api
                .set_subscription_account_count(&sub.id, &body),
        )
        .await?;
        self.load_subscription().await
    }

    pub async fn load_invoices(&self) -> Result<(), CoreError> {
        let store = &self.inner.store.invoices;
        store.begin_load();

        match self
            .guarded(self.inner.api.list_invoices(&self.inner.config.tenant_id))
            .await
        {
            Ok(wire) => {
                store.finish_load(wire.into_iter().map(Into::into).collect());
                Ok(())
            }
            Err(err) => {
                note_failure(store, &err);
                Err(err)
            }
        }
    }

    /// Payment methods are optional per tenant: a 404 loads as an
    /// empty collection with no error flag.
    pub async fn load_payment_methods(&self) -> Result<(), CoreError> {
        let store = &self.inner.store.payment_methods;
        store.begin_load();

        match self
            .guarded(
                self.inner
                    .api
                    .list_payment_methods(&self.inner.config.tenant_id),
            )
            .await
        {
            Ok(wire) => {
                let methods = wire.unwrap_or_default();
                store.finish_load(methods.into_iter().map(Into::into).collect());
                Ok(())
            }
            Err(err) => {
                note_failure(store, &err);
                Err(err)
            }
        }
    }

    // ── Billing derivations (read-only) ──────────────────────────────

    /// The catalog entry the tenant is currently on, if any.
    pub fn current_plan(&self) -> Option<Arc<BillingPlan>> {
        let sub = self.inner.store.subscription.get();
        billing::current_plan(&self.inner.store.billing_plans.snapshot(), sub.as_deref())
    }

    pub fn is_current_plan(&self, plan: &BillingPlan) -> bool {
        let sub = self.inner.store.subscription.get();
        billing::is_current_plan(plan, sub.as_deref())
    }

    pub fn can_upgrade(&self, plan: &BillingPlan) -> bool {
        let sub = self.inner.store.subscription.get();
        billing::can_upgrade(plan, sub.as_deref())
    }

    /// Monthly cost derived from server-confirmed snapshots.
    pub fn monthly_total(&self) -> f64 {
        let sub = self.inner.store.subscription.get();
        billing::monthly_total(&self.inner.store.billing_plans.snapshot(), sub.as_deref())
    }

    // ── Webhooks ─────────────────────────────────────────────────────

    pub async fn load_webhooks(&self) -> Result<(), CoreError> {
        let store = &self.inner.store.webhooks;
        store.begin_load();

        match self
            .guarded(self.inner.api.list_webhook_subscriptions())
            .await
        {
            Ok(wire) => {
                store.finish_load(wire.into_iter().map(Into::into).collect());
                Ok(())
            }
            Err(err) => {
                note_failure(store, &err);
                Err(err)
            }
        }
    }

    /// Register a webhook. The callback URL is validated locally
    /// before any request is issued.
    pub async fn create_webhook(
        &self,
        req: CreateWebhookRequest,
    ) -> Result<Arc<WebhookSubscription>, CoreError> {
        if url::Url::parse(&req.callback_url).is_err() {
            return Err(CoreError::ValidationFailed {
                message: format!("'{}' is not a valid callback URL", req.callback_url),
            });
        }

        let body = WebhookCreateRequest {
            platform: req.platform,
            callback_url: req.callback_url,
        };
        let created = WebhookSubscription::from(
            self.guarded(self.inner.api.create_webhook_subscription(&body))
                .await?,
        );
        let id = created.id.clone();
        // The returned record carries the one-time webhook token.
        let created = Arc::new(created);
        self.inner.store.webhooks.insert((*created).clone());
        debug!(webhook_id = %id, "webhook subscription created");
        Ok(created)
    }

    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<(), CoreError> {
        self.guarded(self.inner.api.delete_webhook_subscription(webhook_id))
            .await?;
        self.inner.store.webhooks.remove(webhook_id);
        Ok(())
    }

    pub async fn load_webhook_events(&self) -> Result<(), CoreError> {
        let store = &self.inner.store.webhook_events;
        store.begin_load();

        match self.guarded(self.inner.api.list_webhook_events()).await {
            Ok(wire) => {
                store.finish_load(wire.into_iter().map(Into::into).collect());
                Ok(())
            }
            Err(err) => {
                note_failure(store, &err);
                Err(err)
            }
        }
    }

    // ── Published posts ──────────────────────────────────────────────

    pub async fn load_posts(&self) -> Result<(), CoreError> {
        let store = &self.inner.store.posts;
        store.begin_load();

        match self.guarded(self.inner.api.list_published_posts()).await {
            Ok(wire) => {
                store.finish_load(wire.into_iter().map(Into::into).collect());
                Ok(())
            }
            Err(err) => {
                note_failure(store, &err);
                Err(err)
            }
        }
    }

    pub async fn get_post(&self, post_id: &str) -> Result<PublishedPost, CoreError> {
        let wire = self
            .guarded(self.inner.api.get_published_post(post_id))
            .await?;
        Ok(wire.into())
    }

    /// Delivery history for one post (fetched directly, not cached).
    pub async fn publish_logs(&self, post_id: &str) -> Result<Vec<PublishLog>, CoreError> {
        let wire = self.guarded(self.inner.api.list_publish_logs(post_id)).await?;
        Ok(wire.into_iter().map(Into::into).collect())
    }

    // ── Bulk refresh ─────────────────────────────────────────────────

    /// Load the session's primary collections in parallel. Stores are
    /// independent: one failure does not block the others, but the
    /// first error is reported after all loads settle.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let (clients, plans, subscription, webhooks, posts) = tokio::join!(
            self.load_clients(),
            self.load_billing_plans(),
            self.load_subscription(),
            self.load_webhooks(),
            self.load_posts(),
        );
        clients?;
        plans?;
        subscription?;
        webhooks?;
        posts?;
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Record a load failure on a store: cancellation only clears the
/// loading flag, real failures set the error flag.
fn note_failure<T: Record>(store: &EntityStore<T>, err: &CoreError) {
    match err {
        CoreError::Cancelled => store.abort_load(),
        other => store.fail(other.to_string()),
    }
}

/// Build a full update payload by overlaying the request onto the
/// existing record (the backend expects a complete body on PUT).
fn merge_client_update(existing: &Client, req: &UpdateClientRequest) -> ClientCreateUpdate {
    ClientCreateUpdate {
        name: req.name.clone().unwrap_or_else(|| existing.name.clone()),
        description: req.description.clone().or_else(|| existing.description.clone()),
        industry: req.industry.clone().or_else(|| existing.industry.clone()),
        website: req.website.clone().or_else(|| existing.website.clone()),
        primary_contact_name: req
            .primary_contact_name
            .clone()
            .or_else(|| existing.primary_contact_name.clone()),
        primary_contact_email: req
            .primary_contact_email
            .clone()
            .or_else(|| existing.primary_contact_email.clone()),
        status: Some(req.status.unwrap_or(existing.status).to_string()),
    }
}

impl From<CreateClientRequest> for ClientCreateUpdate {
    fn from(req: CreateClientRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            industry: req.industry,
            website: req.website,
            primary_contact_name: req.primary_contact_name,
            primary_contact_email: req.primary_contact_email,
            status: None,
        }
    }
}
