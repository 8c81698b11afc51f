// ── Reactive slot for a single optional entity ──

use std::sync::Arc;

use tokio::sync::watch;

/// Reactive container for an entity family with at most one member
/// (the tenant's subscription).
///
/// "Present" and "absent" are both valid loaded states: an optional
/// resource the backend reports as missing loads as `None` with no
/// error flag raised.
pub struct EntitySlot<T: Clone + Send + Sync + 'static> {
    value: watch::Sender<Option<Arc<T>>>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
}

impl<T: Clone + Send + Sync + 'static> EntitySlot<T> {
    pub(crate) fn new() -> Self {
        let (value, _) = watch::channel(None);
        let (loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);

        Self {
            value,
            loading,
            error,
        }
    }

    // ── Readers ──────────────────────────────────────────────────────

    pub fn get(&self) -> Option<Arc<T>> {
        self.value.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<T>>> {
        self.value.subscribe()
    }

    // ── Mutators (workspace-internal) ────────────────────────────────

    pub(crate) fn begin_load(&self) {
        self.loading.send_modify(|l| *l = true);
    }

    /// Store the load result. `None` means "confirmed absent", not
    /// failure.
    pub(crate) fn finish_load(&self, value: Option<T>) {
        self.value.send_modify(|v| *v = value.map(Arc::new));
        self.loading.send_modify(|l| *l = false);
        self.error.send_modify(|e| *e = None);
    }

    /// Record a load failure, preserving the previous value.
    pub(crate) fn fail(&self, message: impl Into<String>) {
        self.loading.send_modify(|l| *l = false);
        self.error.send_modify(|e| *e = Some(message.into()));
    }

    pub(crate) fn abort_load(&self) {
        self.loading.send_modify(|l| *l = false);
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EntitySlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
