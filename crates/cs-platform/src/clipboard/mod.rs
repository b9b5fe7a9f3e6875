mod common;
mod rs_clipboard;
pub mod watcher;

pub use rs_clipboard::RsClipboard;
pub use watcher::{run_change_loop, spawn_clipboard_watcher, ClipboardWatcherHandle};
