//! End-to-end scenarios over the real filesystem registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cs_app::{
    CaptureClipboardChange, ClipboardReader, HistoryPorts, HistoryStore, ModeGate,
};
use cs_core::ports::{
    ClipboardChangeHandler, ClipboardIoError, ClipboardIoPort, ForegroundAppPort,
    HistoryObserverPort, RegistryPort,
};
use cs_core::{HistoryConfig, HistoryEvent, MimeType};
use cs_infra::FsRegistry;
use tempfile::TempDir;

#[derive(Default)]
struct SystemClipboard {
    content: Mutex<HashMap<String, Vec<u8>>>,
}

impl SystemClipboard {
    fn copy(&self, mime: &str, bytes: &[u8]) {
        let mut content = self.content.lock().unwrap();
        content.clear();
        content.insert(mime.to_string(), bytes.to_vec());
    }

    fn current_text(&self) -> Option<String> {
        self.content
            .lock()
            .unwrap()
            .values()
            .next()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

#[async_trait]
impl ClipboardIoPort for SystemClipboard {
    async fn read(&self, mime: &MimeType) -> Result<Option<Vec<u8>>, ClipboardIoError> {
        Ok(self.content.lock().unwrap().get(mime.as_str()).cloned())
    }

    fn write(&self, mime: &MimeType, bytes: &[u8]) -> Result<(), ClipboardIoError> {
        self.copy(mime.as_str(), bytes);
        Ok(())
    }

    fn clear(&self) -> Result<(), ClipboardIoError> {
        self.content.lock().unwrap().clear();
        Ok(())
    }
}

struct NoFocus;

impl ForegroundAppPort for NoFocus {
    fn focused_app_id(&self) -> Option<String> {
        None
    }
}

#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<HistoryEvent>>,
}

impl HistoryObserverPort for EventLog {
    fn on_event(&self, event: HistoryEvent) {
        self.events.lock().unwrap().push(event);
    }
}

struct App {
    _dir: TempDir,
    registry: Arc<FsRegistry>,
    clipboard: Arc<SystemClipboard>,
    store: HistoryStore,
    capture: CaptureClipboardChange,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn app(config: HistoryConfig) -> App {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let registry = Arc::new(FsRegistry::new(dir.path().to_path_buf()));
    let clipboard = Arc::new(SystemClipboard::default());
    let store = HistoryStore::new(
        config,
        HistoryPorts {
            registry: registry.clone(),
            clipboard: clipboard.clone(),
            observer: Arc::new(EventLog::default()),
        },
    )
    .unwrap();
    let capture = CaptureClipboardChange::new(
        store.clone(),
        ClipboardReader::new(clipboard.clone()),
        Arc::new(NoFocus),
    );
    App {
        _dir: dir,
        registry,
        clipboard,
        store,
        capture,
    }
}

impl App {
    async fn copy_text(&self, text: &str) {
        self.clipboard.copy("text/plain;charset=utf-8", text.as_bytes());
        self.capture.on_clipboard_changed().await.unwrap();
    }

    async fn copy_png(&self, bytes: &[u8]) {
        self.clipboard.copy("image/png", bytes);
        self.capture.on_clipboard_changed().await.unwrap();
    }

    async fn values(&self) -> Vec<String> {
        self.store
            .snapshot()
            .await
            .entries
            .iter()
            .map(|e| e.string_value().to_string())
            .collect()
    }
}

#[tokio::test]
async fn copies_survive_a_restart() {
    let app = app(HistoryConfig::default());
    app.copy_text("first").await;
    app.copy_text("second").await;
    let first = app.store.find_by_text("first").await.unwrap();
    app.store.toggle_favorite(first.id()).await.unwrap();

    let restarted = HistoryStore::new(
        HistoryConfig::default(),
        HistoryPorts {
            registry: app.registry.clone(),
            clipboard: app.clipboard.clone(),
            observer: Arc::new(EventLog::default()),
        },
    )
    .unwrap();
    let count = restarted.load(None).await.unwrap();

    assert_eq!(count, 2);
    let snapshot = restarted.snapshot().await;
    assert_eq!(snapshot.entries[0].string_value(), "first");
    assert!(snapshot.entries[0].is_favorite());
    assert_eq!(snapshot.entries[1].string_value(), "second");
    assert!(snapshot.selected.is_none());
}

#[tokio::test]
async fn eviction_reclaims_image_blob_on_disk() {
    let app = app(HistoryConfig {
        max_history_length: 2,
        cache_images: true,
        ..HistoryConfig::default()
    });
    app.copy_png(b"\x89PNG image a").await;
    let image = app.store.selected().await.unwrap();
    let blob = app.registry.blob_path(image.content_hash().unwrap());
    assert!(blob.exists());

    app.copy_text("b").await;
    app.copy_text("c").await;

    assert_eq!(app.values().await, ["c", "b"]);
    assert!(!blob.exists());
    let persisted: Vec<_> = app
        .registry
        .read()
        .await
        .iter()
        .map(|e| e.string_value().to_string())
        .collect();
    assert_eq!(persisted, ["c", "b"]);
}

#[tokio::test]
async fn images_are_ignored_without_cache_images() {
    let app = app(HistoryConfig::default());

    app.copy_png(b"\x89PNG").await;

    assert!(app.values().await.is_empty());
    assert!(app.registry.read().await.is_empty());
}

#[tokio::test]
async fn private_session_leaves_no_trace() {
    let app = app(HistoryConfig::default());
    let gate = ModeGate::new(app.store.clone());
    app.copy_text("public").await;

    gate.set_private_mode(true).await;
    app.copy_text("secret").await;
    gate.set_private_mode(false).await;

    assert_eq!(app.values().await, ["public"]);
    assert_eq!(app.clipboard.current_text().as_deref(), Some("public"));
}

#[tokio::test]
async fn clear_on_boot_starts_from_empty_cache() {
    let app = app(HistoryConfig {
        cache_images: true,
        ..HistoryConfig::default()
    });
    app.copy_text("old").await;
    app.copy_png(b"\x89PNG old").await;

    app.registry.clear_cache_folder().await.unwrap();
    let count = app.store.load(None).await.unwrap();

    assert_eq!(count, 0);
    assert!(app.values().await.is_empty());
}

#[tokio::test]
async fn restart_reclaims_blobs_of_unpersisted_images() {
    let config = HistoryConfig {
        cache_images: true,
        cache_only_favorites: true,
        ..HistoryConfig::default()
    };
    let app = app(config.clone());
    app.copy_png(b"\x89PNG session only").await;
    let image = app.store.selected().await.unwrap();
    let blob = app.registry.blob_path(image.content_hash().unwrap());
    assert!(blob.exists());

    let restarted = HistoryStore::new(
        config,
        HistoryPorts {
            registry: app.registry.clone(),
            clipboard: app.clipboard.clone(),
            observer: Arc::new(EventLog::default()),
        },
    )
    .unwrap();
    let count = restarted.load(None).await.unwrap();

    assert_eq!(count, 0);
    assert!(!blob.exists());
}
