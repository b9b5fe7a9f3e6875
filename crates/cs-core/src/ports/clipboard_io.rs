use async_trait::async_trait;

use super::errors::ClipboardIoError;
use crate::clipboard::MimeType;

/// The system clipboard ("clipboard" selection only).
#[async_trait]
pub trait ClipboardIoPort: Send + Sync {
    /// Bytes currently offered for `mime`, `None` when the target is absent.
    async fn read(&self, mime: &MimeType) -> Result<Option<Vec<u8>>, ClipboardIoError>;

    fn write(&self, mime: &MimeType, bytes: &[u8]) -> Result<(), ClipboardIoError>;

    fn clear(&self) -> Result<(), ClipboardIoError>;
}
