// ── Active-client selection ──
//
// One globally-selected "active client" kept consistent with three
// sources that can conflict: the persisted selection, the current
// route, and the freshness of the client collection.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::model::Client;

/// Persisted selection backend (a single key-value entry).
///
/// Implementations must be cheap to call: the resolver reads on every
/// reconciliation pass and writes only on actual change.
pub trait SelectionStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, client_id: &str);
    fn clear(&self);
}

/// In-memory [`SelectionStore`] for tests and one-shot sessions.
#[derive(Default)]
pub struct MemorySelectionStore {
    selected: Mutex<Option<String>>,
}

impl MemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemorySelectionStore {
    fn get(&self) -> Option<String> {
        self.selected.lock().ok()?.clone()
    }

    fn set(&self, client_id: &str) {
        if let Ok(mut guard) = self.selected.lock() {
            *guard = Some(client_id.to_owned());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.selected.lock() {
            *guard = None;
        }
    }
}

// ── Resolver ────────────────────────────────────────────────────────

/// Maintains the session's active client id.
///
/// All transitions are idempotent: repeated invocations with unchanged
/// inputs write nothing to the persisted store and send no change
/// notification.
pub struct SelectionResolver {
    store: Arc<dyn SelectionStore>,
    active: watch::Sender<Option<String>>,
}

impl SelectionResolver {
    pub fn new(store: Arc<dyn SelectionStore>) -> Self {
        let initial = store.get();
        let (active, _) = watch::channel(initial);
        Self { store, active }
    }

    /// Currently active client id.
    pub fn active_client_id(&self) -> Option<String> {
        self.active.borrow().clone()
    }

    /// Derived UI flag: the client sidebar is visible exactly when a
    /// client context is active.
    pub fn show_client_sidebar(&self) -> bool {
        self.active.borrow().is_some()
    }

    /// Subscribe to selection changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.active.subscribe()
    }

    /// Make `client_id` the active selection, persisting it.
    pub fn set_active(&self, client_id: &str) {
        if self.active.borrow().as_deref() == Some(client_id) {
            return;
        }
        self.store.set(client_id);
        self.active
            .send_modify(|a| *a = Some(client_id.to_owned()));
    }

    /// Clear the active selection (exiting client context).
    pub fn clear(&self) {
        if self.active.borrow().is_none() {
            return;
        }
        self.store.clear();
        self.active.send_modify(|a| *a = None);
    }

    /// Reconcile the selection against the current client collection.
    ///
    /// 1. Empty collection: do nothing (wait for a future load).
    /// 2. Persisted id present in the collection: keep it.
    /// 3. Otherwise: fall back to the first client and persist that
    ///    choice. The invalid selection self-heals silently.
    pub fn reconcile(&self, clients: &[Arc<Client>]) {
        if clients.is_empty() {
            return;
        }

        let persisted = self.store.get();
        if let Some(id) = &persisted {
            if clients.iter().any(|c| c.id == *id) {
                // Valid; make sure the live value agrees without
                // re-persisting.
                if self.active.borrow().as_deref() != Some(id.as_str()) {
                    self.active.send_modify(|a| *a = Some(id.clone()));
                }
                return;
            }
        }

        let fallback = clients[0].id.clone();
        tracing::debug!(
            invalid = persisted.as_deref(),
            fallback = %fallback,
            "selection not in collection, falling back to first client"
        );
        self.set_active(&fallback);
    }
}

// ── Route extraction ────────────────────────────────────────────────

/// Extract a client identifier from a route.
///
/// An explicit route parameter wins; otherwise the path segment
/// following `client` is used (e.g. `/agency/client/42/dashboard`).
pub fn route_client_target(param: Option<&str>, path: &str) -> Option<String> {
    if let Some(id) = param {
        if !id.is_empty() {
            return Some(id.to_owned());
        }
    }

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    while let Some(segment) = segments.next() {
        if segment == "client" {
            return segments.next().map(ToOwned::to_owned);
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::ClientStatus;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client(id: &str, name: &str) -> Arc<Client> {
        Arc::new(Client {
            id: id.into(),
            tenant_id: "t-1".into(),
            name: name.into(),
            description: None,
            industry: None,
            website: None,
            primary_contact_name: None,
            primary_contact_email: None,
            status: ClientStatus::Active,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// Counts persisted writes so idempotence is observable.
    #[derive(Default)]
    struct CountingStore {
        inner: MemorySelectionStore,
        writes: AtomicUsize,
    }

    impl SelectionStore for CountingStore {
        fn get(&self) -> Option<String> {
            self.inner.get()
        }

        fn set(&self, client_id: &str) {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(client_id);
        }

        fn clear(&self) {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.clear();
        }
    }

    #[test]
    fn reconcile_keeps_valid_selection() {
        let store = Arc::new(CountingStore::default());
        store.inner.set("b");
        let resolver = SelectionResolver::new(Arc::clone(&store) as Arc<dyn SelectionStore>);

        let clients = [client("a", "Alpha"), client("b", "Beta")];
        resolver.reconcile(&clients);

        assert_eq!(resolver.active_client_id().as_deref(), Some("b"));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reconcile_self_heals_invalid_selection() {
        let store = Arc::new(CountingStore::default());
        store.inner.set("Z");
        let resolver = SelectionResolver::new(Arc::clone(&store) as Arc<dyn SelectionStore>);

        let clients = [client("a", "Alpha"), client("b", "Beta"), client("c", "Gamma")];
        resolver.reconcile(&clients);

        assert_eq!(resolver.active_client_id().as_deref(), Some("a"));
        assert_eq!(store.get().as_deref(), Some("a"));
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let store = Arc::new(CountingStore::default());
        store.inner.set("Z");
        let resolver = SelectionResolver::new(Arc::clone(&store) as Arc<dyn SelectionStore>);
        let mut rx = resolver.subscribe();

        let clients = [client("a", "Alpha"), client("b", "Beta")];
        resolver.reconcile(&clients);
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        // Second pass with unchanged inputs: no write, no notification.
        resolver.reconcile(&clients);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reconcile_waits_on_empty_collection() {
        let store = Arc::new(CountingStore::default());
        store.inner.set("a");
        let resolver = SelectionResolver::new(Arc::clone(&store) as Arc<dyn SelectionStore>);

        resolver.reconcile(&[]);
        assert_eq!(resolver.active_client_id().as_deref(), Some("a"));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clear_is_idempotent() {
        let store = Arc::new(CountingStore::default());
        let resolver = SelectionResolver::new(Arc::clone(&store) as Arc<dyn SelectionStore>);

        resolver.set_active("a");
        resolver.clear();
        resolver.clear();

        assert!(resolver.active_client_id().is_none());
        // One set + one clear; the second clear writes nothing.
        assert_eq!(store.writes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn route_param_takes_priority() {
        let target = route_client_target(Some("7"), "/agency/client/42/dashboard");
        assert_eq!(target.as_deref(), Some("7"));
    }

    #[test]
    fn route_pattern_fallback_finds_segment_after_client() {
        let target = route_client_target(None, "/agency/client/42/dashboard");
        assert_eq!(target.as_deref(), Some("42"));
    }

    #[test]
    fn route_without_client_context_yields_none() {
        assert!(route_client_target(None, "/agency/billing").is_none());
        assert!(route_client_target(None, "/agency/client").is_none());
        assert!(route_client_target(Some(""), "/settings").is_none());
    }
}
