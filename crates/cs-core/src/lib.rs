//! # cs-core
//!
//! Core domain models and ports for clipshelf.
//!
//! This crate holds the clipboard history model (entries, selection, eviction
//! rules, configuration) without any filesystem or OS dependencies.

pub mod clipboard;
pub mod config;
pub mod history;
pub mod ids;
pub mod ports;

pub use clipboard::{
    ContentHash, Entry, EntryKind, EntryPayload, ImagePreview, MimeType, TextNormalization,
};
pub use config::{ConfigError, HistoryConfig};
pub use history::{
    CycleDirection, CycleStep, History, HistoryEvent, HistorySnapshot, Notification, SectionOrder,
};
pub use ids::EntryId;
