use std::path::PathBuf;

use thiserror::Error;

use crate::ids::EntryId;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode registry index: {0}")]
    Encode(String),

    #[error("entry {0} is not an image")]
    NotAnImage(EntryId),

    #[error("image entry {0} has no bytes to persist")]
    MissingBytes(EntryId),
}

impl RegistryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegistryError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClipboardIoError {
    #[error("clipboard backend unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard {op} failed for {mime}: {message}")]
    Operation {
        op: &'static str,
        mime: String,
        message: String,
    },
}
