use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use cs_core::ports::{ClipboardChangeHandler, ForegroundAppPort};
use tracing::debug;

use crate::clipboard_reader::ClipboardReader;
use crate::history_store::HistoryStore;

/// Reacts to "clipboard changed" signals from the platform watcher.
///
/// ```text
/// OS clipboard change
///   → platform watcher
///   → CaptureClipboardChange (this handler)
///   → ClipboardReader → HistoryStore::ingest
/// ```
///
/// Signals are ignored in private mode and while an excluded application has
/// focus. A signal that arrives while a previous capture is still reading is
/// dropped.
pub struct CaptureClipboardChange {
    store: HistoryStore,
    reader: ClipboardReader,
    foreground: Arc<dyn ForegroundAppPort>,
    in_flight: AtomicBool,
}

impl CaptureClipboardChange {
    pub fn new(
        store: HistoryStore,
        reader: ClipboardReader,
        foreground: Arc<dyn ForegroundAppPort>,
    ) -> Self {
        Self {
            store,
            reader,
            foreground,
            in_flight: AtomicBool::new(false),
        }
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[async_trait]
impl ClipboardChangeHandler for CaptureClipboardChange {
    async fn on_clipboard_changed(&self) -> Result<()> {
        if self.store.is_private_mode() {
            return Ok(());
        }

        let config = self.store.config().await;
        if let Some(app_id) = self.foreground.focused_app_id() {
            if config.is_excluded(&app_id) {
                debug!(app_id = %app_id, "focused app is excluded, change ignored");
                return Ok(());
            }
        }

        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!("capture already in flight, change dropped");
            return Ok(());
        }
        let _guard = InFlight(&self.in_flight);

        let Some(entry) = self.reader.read_clipboard_content(&config).await else {
            return Ok(());
        };
        let outcome = self.store.ingest(entry).await?;
        debug!(reused = outcome.is_reused(), "clipboard change captured");
        Ok(())
    }
}
