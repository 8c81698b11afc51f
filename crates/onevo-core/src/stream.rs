// ── Subscription handle over a store's snapshot channel ──

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::{EntityStore, Record};

/// A consumer-side view of one store's snapshot stream.
///
/// Wraps a `watch::Receiver`: slow consumers only ever see the latest
/// snapshot, intermediate states are skipped.
pub struct EntityStream<T: Record> {
    rx: watch::Receiver<Arc<Vec<Arc<T>>>>,
}

impl<T: Record> EntityStream<T> {
    pub(crate) fn new(rx: watch::Receiver<Arc<Vec<Arc<T>>>>) -> Self {
        Self { rx }
    }

    /// The latest snapshot, without waiting.
    pub fn current(&self) -> Arc<Vec<Arc<T>>> {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot change. Returns `None` once the
    /// owning store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<T>>>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Adapt into a `Stream` of snapshots (yields the current one
    /// first).
    pub fn into_stream(self) -> WatchStream<Arc<Vec<Arc<T>>>> {
        WatchStream::new(self.rx)
    }
}

impl<T: Record> EntityStore<T> {
    /// Open a snapshot stream over this store.
    pub fn stream(&self) -> EntityStream<T> {
        EntityStream::new(self.subscribe())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Item(String);

    impl Record for Item {
        fn id(&self) -> &str {
            &self.0
        }
    }

    #[tokio::test]
    async fn changed_yields_latest_snapshot() {
        let store: EntityStore<Item> = EntityStore::new();
        let mut stream = EntityStream::new(store.subscribe());
        assert!(stream.current().is_empty());

        store.finish_load(vec![Item("a".into()), Item("b".into())]);
        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 2);
    }

    #[tokio::test]
    async fn changed_returns_none_after_store_drop() {
        let store: EntityStore<Item> = EntityStore::new();
        let mut stream = EntityStream::new(store.subscribe());
        drop(store);
        assert!(stream.changed().await.is_none());
    }
}
