use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use clipboard_rs::ClipboardContext;
use cs_core::ports::{ClipboardIoError, ClipboardIoPort};
use cs_core::MimeType;
use tokio::task::spawn_blocking;
use tracing::trace;

use super::common::CommonClipboardImpl;

/// System clipboard backed by `clipboard-rs`.
pub struct RsClipboard {
    inner: Arc<Mutex<ClipboardContext>>,
}

impl RsClipboard {
    pub fn new() -> Result<Self> {
        let context = ClipboardContext::new()
            .map_err(|e| anyhow!(e))
            .context("ClipboardContext::new failed")?;
        Ok(Self {
            inner: Arc::new(Mutex::new(context)),
        })
    }
}

fn lock(
    inner: &Mutex<ClipboardContext>,
) -> Result<MutexGuard<'_, ClipboardContext>, ClipboardIoError> {
    inner
        .lock()
        .map_err(|_| ClipboardIoError::Unavailable("clipboard context lock poisoned".into()))
}

#[async_trait]
impl ClipboardIoPort for RsClipboard {
    async fn read(&self, mime: &MimeType) -> Result<Option<Vec<u8>>, ClipboardIoError> {
        let inner = Arc::clone(&self.inner);
        let format = mime.as_str().to_string();

        spawn_blocking(move || {
            let ctx = lock(&inner)?;
            let bytes = CommonClipboardImpl::read_target(&ctx, &format);
            trace!(format = %format, found = bytes.is_some(), "clipboard target read");
            Ok(bytes.filter(|b| !b.is_empty()))
        })
        .await
        .map_err(|e| ClipboardIoError::Unavailable(e.to_string()))?
    }

    fn write(&self, mime: &MimeType, bytes: &[u8]) -> Result<(), ClipboardIoError> {
        let ctx = lock(&self.inner)?;
        CommonClipboardImpl::write_target(&ctx, mime, bytes)
    }

    fn clear(&self) -> Result<(), ClipboardIoError> {
        let ctx = lock(&self.inner)?;
        CommonClipboardImpl::clear(&ctx)
    }
}
