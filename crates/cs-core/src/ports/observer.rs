use crate::history::HistoryEvent;

/// Receives history deltas. Called while the store is locked, so
/// implementations must not block or call back into the store.
pub trait HistoryObserverPort: Send + Sync {
    fn on_event(&self, event: HistoryEvent);
}
