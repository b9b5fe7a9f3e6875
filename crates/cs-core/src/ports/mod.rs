//! Port interfaces for the application layer
//!
//! Ports define the contract between the history use cases and the
//! filesystem, clipboard and UI implementations that live in other crates.

mod clipboard_change_handler;
mod clipboard_io;
pub mod errors;
mod foreground_app;
mod observer;
mod registry;

pub use clipboard_change_handler::ClipboardChangeHandler;
pub use clipboard_io::ClipboardIoPort;
pub use errors::{ClipboardIoError, RegistryError};
pub use foreground_app::ForegroundAppPort;
pub use observer::HistoryObserverPort;
pub use registry::RegistryPort;
