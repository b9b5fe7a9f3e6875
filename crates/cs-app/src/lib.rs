//! History use cases for clipshelf: the store, private-mode gating and the
//! capture pipeline fed by the platform clipboard watcher.

pub mod capture;
pub mod clipboard_reader;
mod deferred;
pub mod errors;
pub mod history_store;
pub mod mode_gate;

#[cfg(test)]
pub(crate) mod testing;

pub use capture::CaptureClipboardChange;
pub use clipboard_reader::ClipboardReader;
pub use errors::HistoryError;
pub use history_store::{HistoryPorts, HistoryStore, IngestOutcome};
pub use mode_gate::ModeGate;
