use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use cs_core::ports::{RegistryError, RegistryPort};
use cs_core::{ContentHash, Entry, EntryPayload, ImagePreview, MimeType};
use tokio::fs;
use tracing::{debug, debug_span, warn, Instrument};

use super::index::{IndexFile, IndexRecord, INDEX_VERSION};
use crate::fs::atomic_write;
use crate::preview::render_preview;

const INDEX_FILE_NAME: &str = "registry.json";
const BLOBS_DIR: &str = "blobs";
const DEFAULT_PREVIEW_MAX_EDGE: u32 = 256;
const PLACEHOLDER_LABEL_LEN: usize = 50;

/// Registry rooted at a cache directory:
///
/// ```text
/// <root>/registry.json
/// <root>/blobs/<blake3 hex>
/// ```
pub struct FsRegistry {
    root: PathBuf,
    preview_max_edge: u32,
}

impl FsRegistry {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            preview_max_edge: DEFAULT_PREVIEW_MAX_EDGE,
        }
    }

    pub fn with_preview_max_edge(mut self, max_edge: u32) -> Self {
        self.preview_max_edge = max_edge;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE_NAME)
    }

    pub fn blob_path(&self, hash: &ContentHash) -> PathBuf {
        self.root.join(BLOBS_DIR).join(hash.to_hex())
    }

    async fn load_blob(&self, hash: &ContentHash) -> Option<Bytes> {
        let path = self.blob_path(hash);
        match fs::read(&path).await {
            Ok(bytes) => Some(Bytes::from(bytes)),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "image blob unavailable, keeping placeholder"
                );
                None
            }
        }
    }

    async fn entry_from_record(&self, record: IndexRecord) -> Option<Entry> {
        let mime = MimeType::new(record.mime_type);
        let entry = match (record.text, record.blob) {
            (Some(text), _) => Entry::text(mime, text),
            (None, Some(blob)) => {
                let hash: ContentHash = match blob.parse() {
                    Ok(hash) => hash,
                    Err(err) => {
                        warn!(
                            blob = %blob,
                            error = %err,
                            "skipping index record with bad blob name"
                        );
                        return None;
                    }
                };
                let bytes = self.load_blob(&hash).await;
                Entry::image(mime, hash, bytes)
            }
            (None, None) => {
                warn!(mime = %mime, "skipping index record without payload");
                return None;
            }
        };
        Some(entry.with_favorite(record.favorite))
    }

    fn placeholder(entry: &Entry) -> ImagePreview {
        ImagePreview::Placeholder {
            label: entry.preview_label(PLACEHOLDER_LABEL_LEN),
        }
    }
}

#[async_trait]
impl RegistryPort for FsRegistry {
    async fn read(&self) -> Vec<Entry> {
        let path = self.index_path();
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no registry index yet");
                return Vec::new();
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read registry index");
                return Vec::new();
            }
        };

        let index: IndexFile = match serde_json::from_slice(&raw) {
            Ok(index) => index,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "registry index is corrupt, starting empty"
                );
                return Vec::new();
            }
        };
        if index.v != INDEX_VERSION {
            warn!(version = index.v, "unknown registry index version, reading anyway");
        }

        let mut entries = Vec::with_capacity(index.entries.len());
        for record in index.entries {
            if let Some(entry) = self.entry_from_record(record).await {
                entries.push(entry);
            }
        }
        debug!(count = entries.len(), "registry loaded");
        entries
    }

    async fn write(&self, entries: &[Entry]) -> Result<(), RegistryError> {
        let path = self.index_path();
        let content = serde_json::to_vec_pretty(&IndexFile::from_entries(entries))
            .map_err(|e| RegistryError::Encode(e.to_string()))?;

        atomic_write(&path, &content)
            .instrument(debug_span!("registry.write_index", count = entries.len()))
            .await
            .map_err(|e| RegistryError::io(&path, e))
    }

    async fn write_entry_file(&self, entry: &Entry) -> Result<(), RegistryError> {
        let EntryPayload::Image { hash, bytes } = entry.payload() else {
            return Err(RegistryError::NotAnImage(entry.id().clone()));
        };
        let Some(bytes) = bytes else {
            return Err(RegistryError::MissingBytes(entry.id().clone()));
        };

        let path = self.blob_path(hash);
        let exists = fs::try_exists(&path)
            .await
            .map_err(|e| RegistryError::io(&path, e))?;
        if exists {
            debug!(hash = %hash.short(), "blob already stored");
            return Ok(());
        }

        atomic_write(&path, bytes)
            .instrument(debug_span!(
                "registry.write_blob",
                hash = %hash.short(),
                size = bytes.len()
            ))
            .await
            .map_err(|e| RegistryError::io(&path, e))
    }

    async fn delete_entry_file(&self, entry: &Entry) -> Result<(), RegistryError> {
        let Some(hash) = entry.content_hash() else {
            return Ok(());
        };
        let path = self.blob_path(hash);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(hash = %hash.short(), "blob removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(RegistryError::io(&path, err)),
        }
    }

    async fn get_entry_as_image(&self, entry: &Entry) -> ImagePreview {
        let Some(hash) = entry.content_hash() else {
            return Self::placeholder(entry);
        };
        let bytes = match entry.image_bytes() {
            Some(bytes) => bytes.clone(),
            None => match self.load_blob(hash).await {
                Some(bytes) => bytes,
                None => return Self::placeholder(entry),
            },
        };

        let max_edge = self.preview_max_edge;
        match tokio::task::spawn_blocking(move || render_preview(&bytes, max_edge)).await {
            Ok(Ok(preview)) => preview,
            Ok(Err(err)) => {
                warn!(hash = %hash.short(), error = %err, "image preview failed");
                Self::placeholder(entry)
            }
            Err(err) => {
                warn!(hash = %hash.short(), error = %err, "image preview task failed");
                Self::placeholder(entry)
            }
        }
    }

    async fn clear_cache_folder(&self) -> Result<(), RegistryError> {
        let blobs = self.root.join(BLOBS_DIR);
        match fs::remove_dir_all(&blobs).await {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(RegistryError::io(&blobs, err)),
        }
        debug!(root = %self.root.display(), "cache folder cleared");
        self.write(&[]).await
    }

    async fn remove_orphan_blobs(&self, keep: &[Entry]) -> Result<usize, RegistryError> {
        let blobs = self.root.join(BLOBS_DIR);
        let referenced: HashSet<String> = keep
            .iter()
            .filter_map(|e| e.content_hash())
            .map(|hash| hash.to_hex())
            .collect();

        let mut dir = match fs::read_dir(&blobs).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(RegistryError::io(&blobs, err)),
        };

        let mut removed = 0;
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| RegistryError::io(&blobs, e))?
        {
            let name = item.file_name();
            if name.to_str().is_some_and(|n| referenced.contains(n)) {
                continue;
            }
            // Leftover `.tmp` files from an interrupted write land here too.
            let path = item.path();
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to remove orphan blob")
                }
            }
        }
        if removed > 0 {
            debug!(removed, "orphan blobs removed");
        }
        Ok(removed)
    }
}
