// ── File-backed selection persistence ──
//
// A single key-value entry: the file holds the selected client id,
// clearing the selection removes the file. Survives reloads the way
// the resolver expects; IO failures degrade to "no selection" rather
// than surfacing errors into the reconciliation path.

use std::path::PathBuf;

use onevo_core::SelectionStore;
use tracing::warn;

/// Persists the active-client selection to a small state file.
pub struct FileSelectionStore {
    path: PathBuf,
}

impl FileSelectionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store for the named profile at the platform state path.
    pub fn for_profile(profile_name: &str) -> Self {
        Self::new(crate::selection_path(profile_name))
    }
}

impl SelectionStore for FileSelectionStore {
    fn get(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let id = raw.trim();
        if id.is_empty() {
            None
        } else {
            Some(id.to_owned())
        }
    }

    fn set(&self, client_id: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(error = %e, "could not create selection state directory");
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, client_id) {
            warn!(error = %e, "could not persist selection");
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, "could not clear persisted selection"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSelectionStore::new(dir.path().join("default.selection"));

        assert!(store.get().is_none());

        store.set("client-42");
        assert_eq!(store.get().as_deref(), Some("client-42"));

        store.set("client-7");
        assert_eq!(store.get().as_deref(), Some("client-7"));

        store.clear();
        assert!(store.get().is_none());

        // Clearing an already-clear selection is a no-op.
        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn set_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSelectionStore::new(dir.path().join("nested/state/default.selection"));

        store.set("client-1");
        assert_eq!(store.get().as_deref(), Some("client-1"));
    }
}
