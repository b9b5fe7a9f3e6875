//! On-disk shape of `registry.json`.

use cs_core::{Entry, EntryPayload};
use serde::{Deserialize, Serialize};

pub const INDEX_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFile {
    #[serde(default = "default_version")]
    pub v: u32,
    #[serde(default)]
    pub entries: Vec<IndexRecord>,
}

fn default_version() -> u32 {
    INDEX_VERSION
}

/// One persisted entry. Exactly one of `text` and `blob` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub mime_type: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Hex content hash naming the file under `blobs/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
}

impl IndexFile {
    pub fn from_entries(entries: &[Entry]) -> Self {
        Self {
            v: INDEX_VERSION,
            entries: entries.iter().map(IndexRecord::from_entry).collect(),
        }
    }
}

impl IndexRecord {
    pub fn from_entry(entry: &Entry) -> Self {
        let (text, blob) = match entry.payload() {
            EntryPayload::Text(text) => (Some(text.clone()), None),
            EntryPayload::Image { hash, .. } => (None, Some(hash.to_hex())),
        };
        Self {
            mime_type: entry.mime_type().to_string(),
            favorite: entry.is_favorite(),
            text,
            blob,
        }
    }
}
