// ── Generic reactive entity store ──
//
// One store per entity family. Snapshots are replaced wholesale on
// load and never merged in place; single-entity mutations rebuild the
// snapshot so subscribers always observe a consistent list.

use std::sync::Arc;

use tokio::sync::watch;

/// An entity that can live in an [`EntityStore`].
pub trait Record: Clone + Send + Sync + 'static {
    /// Backend-assigned opaque identifier.
    fn id(&self) -> &str;

    /// Optional sort key. Stores order their snapshot by
    /// `(sort_key, id)`; the default keeps server order stable by id
    /// only.
    fn sort_key(&self) -> Option<String> {
        None
    }
}

/// Reactive container for one entity family.
///
/// Carries the last-fetched snapshot plus a loading flag and an error
/// flag, each observable through a `watch` channel. A failed load
/// preserves the previous snapshot; only a successful load replaces
/// it.
pub struct EntityStore<T: Record> {
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
    /// Bumped on every snapshot mutation.
    version: watch::Sender<u64>,
}

impl<T: Record> EntityStore<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);
        let (version, _) = watch::channel(0u64);

        Self {
            snapshot,
            loading,
            error,
            version,
        }
    }

    // ── Readers ──────────────────────────────────────────────────────

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Look up an entity by id in the current snapshot.
    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|e| e.id() == id)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.snapshot.borrow().iter().any(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Last load failure, cleared by the next successful load.
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    /// Subscribe to the loading flag.
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    // ── Mutators (workspace-internal) ────────────────────────────────

    /// Mark a load as started. The existing snapshot stays visible.
    pub(crate) fn begin_load(&self) {
        self.loading.send_modify(|l| *l = true);
    }

    /// Replace the snapshot with freshly fetched entities, clearing
    /// both flags.
    pub(crate) fn finish_load(&self, items: Vec<T>) {
        let mut items: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        sort_records(&mut items);

        self.snapshot.send_modify(|snap| *snap = Arc::new(items));
        self.loading.send_modify(|l| *l = false);
        self.error.send_modify(|e| *e = None);
        self.bump_version();
    }

    /// Record a load failure. The previous snapshot is preserved.
    pub(crate) fn fail(&self, message: impl Into<String>) {
        self.loading.send_modify(|l| *l = false);
        self.error.send_modify(|e| *e = Some(message.into()));
    }

    /// Clear the loading flag without touching snapshot or error
    /// (used when a load is cancelled mid-flight).
    pub(crate) fn abort_load(&self) {
        self.loading.send_modify(|l| *l = false);
    }

    /// Insert or replace a single entity, keeping the snapshot sorted.
    pub(crate) fn insert(&self, item: T) {
        let item = Arc::new(item);
        self.snapshot.send_modify(|snap| {
            let mut items: Vec<Arc<T>> =
                snap.iter().filter(|e| e.id() != item.id()).cloned().collect();
            items.push(item.clone());
            sort_records(&mut items);
            *snap = Arc::new(items);
        });
        self.bump_version();
    }

    /// Remove an entity by id. Returns the removed entity if present.
    pub(crate) fn remove(&self, id: &str) -> Option<Arc<T>> {
        let mut removed = None;
        self.snapshot.send_modify(|snap| {
            let items: Vec<Arc<T>> = snap
                .iter()
                .filter(|e| {
                    if e.id() == id {
                        removed = Some(Arc::clone(e));
                        false
                    } else {
                        true
                    }
                })
                .cloned()
                .collect();
            *snap = Arc::new(items);
        });
        if removed.is_some() {
            self.bump_version();
        }
        removed
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

impl<T: Record> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_records<T: Record>(items: &mut [Arc<T>]) {
    items.sort_by(|a, b| {
        (a.sort_key(), a.id().to_owned()).cmp(&(b.sort_key(), b.id().to_owned()))
    });
}
