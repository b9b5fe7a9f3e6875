use tracing::info;

use crate::history_store::HistoryStore;

/// Private-mode switch.
///
/// While active, ingestion and cycling are suspended, the history views are
/// hidden and the indicator is cleared. Stored history is never touched.
/// Leaving private mode puts the selected entry back on the clipboard, or
/// clears the clipboard when nothing is selected.
///
/// The flag itself lives in the store, so every gate over the same store
/// sees the same mode.
pub struct ModeGate {
    store: HistoryStore,
}

impl ModeGate {
    pub fn new(store: HistoryStore) -> Self {
        Self { store }
    }

    pub fn is_active(&self) -> bool {
        self.store.is_private_mode()
    }

    /// Idempotent. Returns whether the mode actually changed.
    #[tracing::instrument(name = "usecase.mode_gate.set_private_mode", skip(self))]
    pub async fn set_private_mode(&self, active: bool) -> bool {
        let changed = self.store.set_private_mode(active).await;
        if changed {
            info!(active, "private mode changed");
        }
        changed
    }
}
