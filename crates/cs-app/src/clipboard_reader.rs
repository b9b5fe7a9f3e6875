use std::sync::Arc;

use cs_core::ports::ClipboardIoPort;
use cs_core::{Entry, HistoryConfig, MimeType};
use tracing::debug;

/// Reads the clipboard target by target in priority order.
///
/// The first target that yields a non-empty buffer wins and later targets
/// are not queried. Images are dropped here when `cache_images` is off, so
/// their bytes never reach the store.
pub struct ClipboardReader {
    clipboard: Arc<dyn ClipboardIoPort>,
    priority: Vec<MimeType>,
}

impl ClipboardReader {
    pub fn new(clipboard: Arc<dyn ClipboardIoPort>) -> Self {
        Self::with_priority(clipboard, MimeType::priority_list())
    }

    pub fn with_priority(clipboard: Arc<dyn ClipboardIoPort>, priority: Vec<MimeType>) -> Self {
        Self {
            clipboard,
            priority,
        }
    }

    #[tracing::instrument(name = "usecase.clipboard_reader.read", skip_all)]
    pub async fn read_clipboard_content(&self, config: &HistoryConfig) -> Option<Entry> {
        for mime in &self.priority {
            let bytes = match self.clipboard.read(mime).await {
                Ok(Some(bytes)) if !bytes.is_empty() => bytes,
                Ok(_) => continue,
                Err(err) => {
                    debug!(mime = %mime, error = %err, "clipboard target unreadable");
                    continue;
                }
            };

            let mime = mime.clone().normalized();
            if mime.is_image() && !config.cache_images {
                debug!(mime = %mime, "image on clipboard but image capture is off");
                return None;
            }
            return Entry::from_clipboard(mime, &bytes, config.text_normalization());
        }
        None
    }
}
