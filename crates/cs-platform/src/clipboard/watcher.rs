//! Bridges OS clipboard notifications into the async runtime.
//!
//! ```text
//! clipboard-rs watcher thread
//!      ↓  ClipboardChangeForwarder (try_send, coalescing)
//! mpsc::Receiver<()>
//!      ↓  run_change_loop
//! ClipboardChangeHandler
//! ```
//!
//! The watcher only signals; the handler reads the clipboard itself.

use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::{anyhow, Context, Result};
use clipboard_rs::{ClipboardHandler, ClipboardWatcher, ClipboardWatcherContext, WatcherShutdown};
use cs_core::ports::ClipboardChangeHandler;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

/// Signals waiting to be handled. A full channel already holds a pending
/// signal, so extra notifications are coalesced into it.
pub const CHANGE_CHANNEL_CAPACITY: usize = 1;

pub struct ClipboardChangeForwarder {
    tx: mpsc::Sender<()>,
}

impl ClipboardChangeForwarder {
    pub fn new(tx: mpsc::Sender<()>) -> Self {
        Self { tx }
    }
}

impl ClipboardHandler for ClipboardChangeForwarder {
    fn on_clipboard_change(&mut self) {
        match self.tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => debug!("clipboard change coalesced"),
            Err(TrySendError::Closed(())) => debug!("clipboard change receiver gone"),
        }
    }
}

pub struct ClipboardWatcherHandle {
    shutdown: WatcherShutdown,
    thread: JoinHandle<()>,
}

impl ClipboardWatcherHandle {
    pub fn stop(self) {
        self.shutdown.stop();
        if self.thread.join().is_err() {
            warn!("clipboard watcher thread panicked");
        }
    }
}

/// Starts the OS watcher on a dedicated thread.
pub fn spawn_clipboard_watcher(tx: mpsc::Sender<()>) -> Result<ClipboardWatcherHandle> {
    let mut watcher_ctx = ClipboardWatcherContext::new()
        .map_err(|e| anyhow!("Failed to create watcher context: {}", e))?;
    let shutdown = watcher_ctx
        .add_handler(ClipboardChangeForwarder::new(tx))
        .get_shutdown_channel();

    let thread = std::thread::Builder::new()
        .name("clipboard-watcher".into())
        .spawn(move || {
            info!("start clipboard watch");
            watcher_ctx.start_watch();
            info!("clipboard watch stopped");
        })
        .context("spawn clipboard watcher thread")?;

    Ok(ClipboardWatcherHandle { shutdown, thread })
}

/// Feeds signals to `handler` until the sender side is dropped.
///
/// Signals raised while a capture is running are dropped, not queued: the
/// capture in progress already reads the latest clipboard content. Handler
/// errors are logged and do not stop the loop.
pub async fn run_change_loop(
    mut rx: mpsc::Receiver<()>,
    handler: Arc<dyn ClipboardChangeHandler>,
) {
    while rx.recv().await.is_some() {
        if let Err(err) = handler.on_clipboard_changed().await {
            warn!(error = %err, "failed to capture clipboard change");
        }
        while rx.try_recv().is_ok() {
            debug!("clipboard change during capture dropped");
        }
    }
    debug!("clipboard change loop finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn bursts_coalesce_into_one_pending_signal() {
        let (tx, mut rx) = mpsc::channel(CHANGE_CHANNEL_CAPACITY);
        let mut forwarder = ClipboardChangeForwarder::new(tx);

        forwarder.on_clipboard_change();
        forwarder.on_clipboard_change();
        forwarder.on_clipboard_change();

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_is_ignored() {
        let (tx, rx) = mpsc::channel(CHANGE_CHANNEL_CAPACITY);
        drop(rx);
        ClipboardChangeForwarder::new(tx).on_clipboard_change();
    }

    struct Counting {
        calls: AtomicUsize,
        delay: Duration,
    }

    impl Counting {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ClipboardChangeHandler for Counting {
        async fn on_clipboard_changed(&self) -> anyhow::Result<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if call == 0 {
                anyhow::bail!("first capture fails");
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn loop_survives_handler_errors_and_ends_with_sender() {
        let (tx, rx) = mpsc::channel(CHANGE_CHANNEL_CAPACITY);
        let handler = Counting::new(Duration::ZERO);
        let change_loop = tokio::spawn(run_change_loop(rx, handler.clone()));

        tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.send(()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(tx);
        change_loop.await.unwrap();

        assert_eq!(handler.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn change_during_capture_is_dropped() {
        let (tx, rx) = mpsc::channel(CHANGE_CHANNEL_CAPACITY);
        let mut forwarder = ClipboardChangeForwarder::new(tx);
        let handler = Counting::new(Duration::from_millis(200));
        let change_loop = tokio::spawn(run_change_loop(rx, handler.clone()));

        forwarder.on_clipboard_change();
        tokio::time::sleep(Duration::from_millis(50)).await;
        forwarder.on_clipboard_change();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(handler.calls(), 1);

        forwarder.on_clipboard_change();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(handler.calls(), 2);

        drop(forwarder);
        change_loop.await.unwrap();
    }
}
