use async_trait::async_trait;
use std::sync::Arc;

use super::errors::RegistryError;
use crate::clipboard::{Entry, ImagePreview};

/// Persistent home of the history: an ordered index plus content-addressed
/// image blobs.
#[async_trait]
pub trait RegistryPort: Send + Sync {
    /// Never fails: a missing or corrupt index reads as an empty history.
    async fn read(&self) -> Vec<Entry>;

    /// Replaces the index atomically with `entries`, newest first.
    async fn write(&self, entries: &[Entry]) -> Result<(), RegistryError>;

    /// Stores an image entry's bytes under its content hash. Idempotent.
    async fn write_entry_file(&self, entry: &Entry) -> Result<(), RegistryError>;

    /// Removes the image blob. A missing file is not an error.
    async fn delete_entry_file(&self, entry: &Entry) -> Result<(), RegistryError>;

    async fn get_entry_as_image(&self, entry: &Entry) -> ImagePreview;

    /// Removes every blob and resets the index to empty.
    async fn clear_cache_folder(&self) -> Result<(), RegistryError>;

    /// Deletes stored blobs that none of `keep` refers to. Returns how many
    /// were removed.
    async fn remove_orphan_blobs(&self, keep: &[Entry]) -> Result<usize, RegistryError>;
}

#[async_trait]
impl<T: RegistryPort + ?Sized> RegistryPort for Arc<T> {
    async fn read(&self) -> Vec<Entry> {
        (**self).read().await
    }

    async fn write(&self, entries: &[Entry]) -> Result<(), RegistryError> {
        (**self).write(entries).await
    }

    async fn write_entry_file(&self, entry: &Entry) -> Result<(), RegistryError> {
        (**self).write_entry_file(entry).await
    }

    async fn delete_entry_file(&self, entry: &Entry) -> Result<(), RegistryError> {
        (**self).delete_entry_file(entry).await
    }

    async fn get_entry_as_image(&self, entry: &Entry) -> ImagePreview {
        (**self).get_entry_as_image(entry).await
    }

    async fn clear_cache_folder(&self) -> Result<(), RegistryError> {
        (**self).clear_cache_folder().await
    }

    async fn remove_orphan_blobs(&self, keep: &[Entry]) -> Result<usize, RegistryError> {
        (**self).remove_orphan_blobs(keep).await
    }
}
