//! Boot sequence over the real filesystem registry with an in-memory clipboard.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clipshelf_lib::bootstrap::run::boot;
use clipshelf_lib::bootstrap::{wire_daemon, Daemon, TracingObserver};
use cs_core::ports::{ClipboardChangeHandler, ClipboardIoError, ClipboardIoPort};
use cs_core::{HistoryConfig, MimeType};
use cs_platform::UnknownForegroundApp;
use tempfile::TempDir;

#[derive(Default)]
struct MemoryClipboard {
    content: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryClipboard {
    fn copy_text(&self, text: &str) {
        let mut content = self.content.lock().unwrap();
        content.clear();
        content.insert(MimeType::TEXT_UTF8.to_string(), text.as_bytes().to_vec());
    }
}

#[async_trait]
impl ClipboardIoPort for MemoryClipboard {
    async fn read(&self, mime: &MimeType) -> Result<Option<Vec<u8>>, ClipboardIoError> {
        Ok(self.content.lock().unwrap().get(mime.as_str()).cloned())
    }

    fn write(&self, mime: &MimeType, bytes: &[u8]) -> Result<(), ClipboardIoError> {
        let mut content = self.content.lock().unwrap();
        content.clear();
        content.insert(mime.as_str().to_string(), bytes.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClipboardIoError> {
        self.content.lock().unwrap().clear();
        Ok(())
    }
}

fn config_in(dir: &TempDir) -> HistoryConfig {
    HistoryConfig {
        cache_dir: Some(dir.path().to_path_buf()),
        ..HistoryConfig::default()
    }
}

fn wire(config: HistoryConfig, clipboard: &Arc<MemoryClipboard>) -> Daemon {
    wire_daemon(
        config,
        clipboard.clone(),
        Arc::new(UnknownForegroundApp),
        Arc::new(TracingObserver::new(50)),
    )
    .unwrap()
}

#[tokio::test]
async fn restart_restores_history_and_selects_current_clipboard() {
    let dir = tempfile::tempdir().unwrap();
    let clipboard = Arc::new(MemoryClipboard::default());

    let daemon = wire(config_in(&dir), &clipboard);
    boot(&daemon).await.unwrap();
    for text in ["first", "second"] {
        clipboard.copy_text(text);
        daemon.capture.on_clipboard_changed().await.unwrap();
    }
    daemon.store.shutdown().await;
    drop(daemon);

    clipboard.copy_text("first");
    let restarted = wire(config_in(&dir), &clipboard);
    boot(&restarted).await.unwrap();

    let snapshot = restarted.store.snapshot().await;
    let texts: Vec<_> = snapshot
        .entries
        .iter()
        .map(|e| e.preview_label(50))
        .collect();
    assert_eq!(texts, ["second", "first"]);
    assert_eq!(
        snapshot.selected_entry().map(|e| e.preview_label(50)),
        Some("first".to_string())
    );
}

#[tokio::test]
async fn clear_on_boot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let clipboard = Arc::new(MemoryClipboard::default());

    let daemon = wire(config_in(&dir), &clipboard);
    boot(&daemon).await.unwrap();
    clipboard.copy_text("kept?");
    daemon.capture.on_clipboard_changed().await.unwrap();
    drop(daemon);

    let config = HistoryConfig {
        clear_on_boot: true,
        ..config_in(&dir)
    };
    let restarted = wire(config, &clipboard);
    boot(&restarted).await.unwrap();

    assert!(restarted.store.snapshot().await.entries.is_empty());
    assert!(restarted.store.selected().await.is_none());
}

#[tokio::test]
async fn invalid_config_is_rejected_at_wiring() {
    let dir = tempfile::tempdir().unwrap();
    let clipboard = Arc::new(MemoryClipboard::default());
    let config = HistoryConfig {
        max_history_length: 0,
        ..config_in(&dir)
    };

    let result = wire_daemon(
        config,
        clipboard,
        Arc::new(UnknownForegroundApp),
        Arc::new(TracingObserver::new(50)),
    );
    assert!(result.is_err());
}
