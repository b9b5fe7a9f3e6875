use super::MimeType;

/// Bounded-size rendering of an image entry for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePreview {
    Rendered {
        mime: MimeType,
        width: u32,
        height: u32,
        bytes: Vec<u8>,
    },
    /// Decode failed or the blob is gone.
    Placeholder { label: String },
}

impl ImagePreview {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImagePreview::Placeholder { .. })
    }
}
