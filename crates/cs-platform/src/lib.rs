//! OS clipboard access for clipshelf, built on `clipboard-rs`.

pub mod clipboard;
pub mod foreground;

pub use clipboard::{run_change_loop, spawn_clipboard_watcher, ClipboardWatcherHandle, RsClipboard};
pub use foreground::UnknownForegroundApp;
