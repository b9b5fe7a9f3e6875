use cs_core::ports::HistoryObserverPort;
use cs_core::{HistoryEvent, Notification};

/// Logs history events using `tracing`. Used when no UI is attached.
pub struct TracingObserver {
    preview_len: usize,
}

impl TracingObserver {
    pub fn new(preview_len: usize) -> Self {
        Self { preview_len }
    }
}

impl HistoryObserverPort for TracingObserver {
    fn on_event(&self, event: HistoryEvent) {
        match event {
            HistoryEvent::HistoryChanged(snapshot) => {
                tracing::debug!(
                    entries = snapshot.entries.len(),
                    favorites = snapshot.favorites().count(),
                    "history changed"
                );
            }
            HistoryEvent::SelectionChanged(selected) => {
                tracing::debug!(
                    selected = ?selected.as_ref().map(|id| id.as_str()),
                    "selection changed"
                );
            }
            HistoryEvent::IndicatorChanged(Some(entry)) => {
                tracing::info!(
                    current = %entry.preview_label(self.preview_len),
                    "clipboard indicator"
                );
            }
            HistoryEvent::IndicatorChanged(None) => {
                tracing::info!("clipboard indicator cleared");
            }
            HistoryEvent::VisibilityChanged { visible } => {
                tracing::info!(visible, "history visibility changed");
            }
            HistoryEvent::Notify(Notification::Copied { label }) => {
                tracing::info!(%label, "copied");
            }
            HistoryEvent::Notify(Notification::Cycled {
                position,
                total,
                label,
            }) => {
                tracing::info!(position, total, %label, "cycled");
            }
        }
    }
}
