//! In-memory ports shared by the unit tests of this crate.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cs_core::ports::{
    ClipboardIoError, ClipboardIoPort, HistoryObserverPort, RegistryError, RegistryPort,
};
use cs_core::{
    ContentHash, Entry, HistoryConfig, HistoryEvent, ImagePreview, MimeType, Notification,
    TextNormalization,
};

use crate::history_store::{HistoryPorts, HistoryStore};

#[derive(Default)]
pub(crate) struct FakeRegistry {
    pub stored: Mutex<Vec<Entry>>,
    pub blobs: Mutex<HashSet<ContentHash>>,
    pub deleted: Mutex<Vec<ContentHash>>,
    pub index_writes: AtomicUsize,
    pub fail_writes: AtomicBool,
}

impl FakeRegistry {
    pub fn stored_values(&self) -> Vec<String> {
        self.stored
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.string_value().to_string())
            .collect()
    }
}

#[async_trait]
impl RegistryPort for FakeRegistry {
    async fn read(&self) -> Vec<Entry> {
        self.stored.lock().unwrap().clone()
    }

    async fn write(&self, entries: &[Entry]) -> Result<(), RegistryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RegistryError::io(
                "registry.json",
                std::io::Error::other("disk full"),
            ));
        }
        self.index_writes.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = entries.to_vec();
        Ok(())
    }

    async fn write_entry_file(&self, entry: &Entry) -> Result<(), RegistryError> {
        let hash = entry
            .content_hash()
            .ok_or_else(|| RegistryError::NotAnImage(entry.id().clone()))?;
        self.blobs.lock().unwrap().insert(hash.clone());
        Ok(())
    }

    async fn delete_entry_file(&self, entry: &Entry) -> Result<(), RegistryError> {
        if let Some(hash) = entry.content_hash() {
            self.blobs.lock().unwrap().remove(hash);
            self.deleted.lock().unwrap().push(hash.clone());
        }
        Ok(())
    }

    async fn get_entry_as_image(&self, entry: &Entry) -> ImagePreview {
        ImagePreview::Placeholder {
            label: entry.preview_label(50),
        }
    }

    async fn clear_cache_folder(&self) -> Result<(), RegistryError> {
        self.blobs.lock().unwrap().clear();
        self.stored.lock().unwrap().clear();
        Ok(())
    }

    async fn remove_orphan_blobs(&self, keep: &[Entry]) -> Result<usize, RegistryError> {
        let referenced: HashSet<&ContentHash> =
            keep.iter().filter_map(|e| e.content_hash()).collect();
        let mut blobs = self.blobs.lock().unwrap();
        let before = blobs.len();
        blobs.retain(|hash| referenced.contains(hash));
        Ok(before - blobs.len())
    }
}

/// Clipboard that remembers what was offered and what the store wrote.
#[derive(Default)]
pub(crate) struct FakeClipboard {
    pub offers: Mutex<HashMap<String, Vec<u8>>>,
    pub writes: Mutex<Vec<(MimeType, Vec<u8>)>>,
    pub clears: AtomicUsize,
    pub reads: Mutex<Vec<String>>,
}

impl FakeClipboard {
    pub fn offer(&self, mime: &str, bytes: &[u8]) {
        self.offers
            .lock()
            .unwrap()
            .insert(mime.to_string(), bytes.to_vec());
    }

    pub fn written_texts(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClipboardIoPort for FakeClipboard {
    async fn read(&self, mime: &MimeType) -> Result<Option<Vec<u8>>, ClipboardIoError> {
        self.reads.lock().unwrap().push(mime.to_string());
        Ok(self.offers.lock().unwrap().get(mime.as_str()).cloned())
    }

    fn write(&self, mime: &MimeType, bytes: &[u8]) -> Result<(), ClipboardIoError> {
        self.writes
            .lock()
            .unwrap()
            .push((mime.clone(), bytes.to_vec()));
        let mut offers = self.offers.lock().unwrap();
        offers.clear();
        offers.insert(mime.to_string(), bytes.to_vec());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClipboardIoError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.offers.lock().unwrap().clear();
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingObserver {
    pub events: Mutex<Vec<HistoryEvent>>,
}

impl RecordingObserver {
    pub fn notifications(&self) -> Vec<Notification> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                HistoryEvent::Notify(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn visibility(&self) -> Vec<bool> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                HistoryEvent::VisibilityChanged { visible } => Some(*visible),
                _ => None,
            })
            .collect()
    }
}

impl HistoryObserverPort for RecordingObserver {
    fn on_event(&self, event: HistoryEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub(crate) struct Harness {
    pub store: HistoryStore,
    pub registry: Arc<FakeRegistry>,
    pub clipboard: Arc<FakeClipboard>,
    pub observer: Arc<RecordingObserver>,
}

pub(crate) fn harness(config: HistoryConfig) -> Harness {
    let registry = Arc::new(FakeRegistry::default());
    let clipboard = Arc::new(FakeClipboard::default());
    let observer = Arc::new(RecordingObserver::default());
    let store = HistoryStore::new(
        config,
        HistoryPorts {
            registry: registry.clone(),
            clipboard: clipboard.clone(),
            observer: observer.clone(),
        },
    )
    .expect("valid config");
    Harness {
        store,
        registry,
        clipboard,
        observer,
    }
}

pub(crate) fn text(value: &str) -> Entry {
    Entry::text(MimeType::text_utf8(), value)
}

pub(crate) fn png(bytes: &[u8]) -> Entry {
    Entry::from_clipboard(MimeType::image_png(), bytes, TextNormalization::Verbatim)
        .expect("image entry")
}
