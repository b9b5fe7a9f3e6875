use bytes::Bytes;

use super::{ContentHash, MimeType};
use crate::ids::EntryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Text,
    Image,
}

impl EntryKind {
    pub fn of(mime: &MimeType) -> Self {
        if mime.is_image() {
            EntryKind::Image
        } else {
            EntryKind::Text
        }
    }
}

/// How text payloads are compared and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextNormalization {
    #[default]
    Verbatim,
    /// Leading and trailing whitespace is removed.
    Trim,
}

impl TextNormalization {
    pub fn from_strip(strip_text: bool) -> Self {
        if strip_text {
            TextNormalization::Trim
        } else {
            TextNormalization::Verbatim
        }
    }

    pub fn apply<'a>(&self, text: &'a str) -> &'a str {
        match self {
            TextNormalization::Verbatim => text,
            TextNormalization::Trim => text.trim(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum EntryPayload {
    Text(String),
    /// `bytes` is `None` when the blob could not be loaded; the entry is then a
    /// metadata-only placeholder that can still be listed and removed.
    Image {
        hash: ContentHash,
        bytes: Option<Bytes>,
    },
}

/// One clipboard payload in the history.
#[derive(Debug, Clone)]
pub struct Entry {
    id: EntryId,
    mime: MimeType,
    payload: EntryPayload,
    favorite: bool,
}

impl Entry {
    /// Wraps raw clipboard bytes. Empty buffers are not an entry. Text is
    /// decoded lossily; when normalization leaves nothing, there is no entry.
    pub fn from_clipboard(
        mime: MimeType,
        bytes: &[u8],
        normalization: TextNormalization,
    ) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }

        match EntryKind::of(&mime) {
            EntryKind::Image => Some(Self::image(
                mime,
                ContentHash::of(bytes),
                Some(Bytes::copy_from_slice(bytes)),
            )),
            EntryKind::Text => {
                let decoded = String::from_utf8_lossy(bytes);
                let text = normalization.apply(&decoded);
                if text.is_empty() {
                    return None;
                }
                Some(Self::text(mime, text))
            }
        }
    }

    pub fn text(mime: MimeType, text: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            mime,
            payload: EntryPayload::Text(text.into()),
            favorite: false,
        }
    }

    pub fn image(mime: MimeType, hash: ContentHash, bytes: Option<Bytes>) -> Self {
        Self {
            id: EntryId::new(),
            mime,
            payload: EntryPayload::Image { hash, bytes },
            favorite: false,
        }
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn mime_type(&self) -> &MimeType {
        &self.mime
    }

    pub fn payload(&self) -> &EntryPayload {
        &self.payload
    }

    pub fn kind(&self) -> EntryKind {
        match self.payload {
            EntryPayload::Text(_) => EntryKind::Text,
            EntryPayload::Image { .. } => EntryKind::Image,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind() == EntryKind::Text
    }

    pub fn is_image(&self) -> bool {
        self.kind() == EntryKind::Image
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite
    }

    pub(crate) fn set_favorite(&mut self, favorite: bool) {
        self.favorite = favorite;
    }

    pub fn content_hash(&self) -> Option<&ContentHash> {
        match &self.payload {
            EntryPayload::Image { hash, .. } => Some(hash),
            EntryPayload::Text(_) => None,
        }
    }

    /// Text value; empty for images.
    pub fn string_value(&self) -> &str {
        match &self.payload {
            EntryPayload::Text(text) => text,
            EntryPayload::Image { .. } => "",
        }
    }

    /// Bytes to hand back to the clipboard. Empty for placeholder images.
    pub fn raw_bytes(&self) -> &[u8] {
        match &self.payload {
            EntryPayload::Text(text) => text.as_bytes(),
            EntryPayload::Image { bytes, .. } => bytes.as_deref().unwrap_or_default(),
        }
    }

    pub fn image_bytes(&self) -> Option<&Bytes> {
        match &self.payload {
            EntryPayload::Image { bytes, .. } => bytes.as_ref(),
            EntryPayload::Text(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(&self.payload, EntryPayload::Image { bytes: None, .. })
    }

    /// Text entries compare by (normalized) string value, images by content
    /// hash. Entries of different kinds never match.
    pub fn content_eq(&self, other: &Entry, normalization: TextNormalization) -> bool {
        match (&self.payload, &other.payload) {
            (EntryPayload::Text(a), EntryPayload::Text(b)) => {
                normalization.apply(a) == normalization.apply(b)
            }
            (EntryPayload::Image { hash: a, .. }, EntryPayload::Image { hash: b, .. }) => a == b,
            _ => false,
        }
    }

    pub fn preview_label(&self, max_len: usize) -> String {
        match &self.payload {
            EntryPayload::Text(text) => truncate_label(&collapse_whitespace(text), max_len),
            EntryPayload::Image { hash, bytes } => {
                let missing = if bytes.is_none() { " missing" } else { "" };
                format!("[{} {}{}]", self.mime, hash.short(), missing)
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

fn truncate_label(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_len.saturating_sub(1)).collect();
    out.push_str("...");
    out
}
