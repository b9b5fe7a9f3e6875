//! Clipboard change handler port
//!
//! The platform layer only signals that the clipboard changed; the handler
//! reads the content itself, in MIME priority order.

use anyhow::Result;

#[async_trait::async_trait]
pub trait ClipboardChangeHandler: Send + Sync {
    async fn on_clipboard_changed(&self) -> Result<()>;
}
