mod entry;
mod hash;
mod mime;
mod preview;

pub use entry::{Entry, EntryKind, EntryPayload, TextNormalization};
pub use hash::{ContentHash, ContentHashParseError, HashAlgorithm};
pub use mime::{MimeType, MIME_PRIORITY};
pub use preview::ImagePreview;
