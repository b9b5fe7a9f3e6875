use std::sync::Arc;

use anyhow::Context;
use cs_core::ports::ClipboardChangeHandler;
use cs_platform::clipboard::watcher::CHANGE_CHANNEL_CAPACITY;
use cs_platform::{run_change_loop, spawn_clipboard_watcher, RsClipboard, UnknownForegroundApp};
use tokio::sync::mpsc;

use super::config::{load_config, resolve_config_path};
use super::observer::TracingObserver;
use super::tracing::init_tracing_subscriber;
use super::wiring::{wire_daemon, Daemon};

/// Daemon entry point. Runs until Ctrl-C.
pub async fn run() -> anyhow::Result<()> {
    init_tracing_subscriber()?;

    let config_path = resolve_config_path()?;
    let config = load_config(&config_path)?;
    tracing::info!(path = %config_path.display(), "configuration loaded");

    let clipboard = Arc::new(RsClipboard::new()?);
    let observer = Arc::new(TracingObserver::new(config.max_entry_preview_length));
    let daemon = wire_daemon(config, clipboard, Arc::new(UnknownForegroundApp), observer)?;

    boot(&daemon).await?;

    let (tx, rx) = mpsc::channel(CHANGE_CHANNEL_CAPACITY);
    let watcher = spawn_clipboard_watcher(tx)?;
    let handler: Arc<dyn ClipboardChangeHandler> = daemon.capture.clone();
    let change_loop = tokio::spawn(run_change_loop(rx, handler));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("shutting down");

    daemon.store.shutdown().await;
    // Stopping the watcher drops the sender, which ends the change loop.
    watcher.stop();
    if let Err(err) = change_loop.await {
        tracing::warn!(error = %err, "clipboard change loop aborted");
    }
    Ok(())
}

/// Restores the persisted history and selects whatever is on the clipboard.
pub async fn boot(daemon: &Daemon) -> anyhow::Result<()> {
    if daemon.config.clear_on_boot {
        daemon
            .registry
            .clear_cache_folder()
            .await
            .context("Failed to clear cache on boot")?;
        tracing::info!("cache cleared on boot");
    }

    let current = daemon.reader.read_clipboard_content(&daemon.config).await;
    let loaded = daemon
        .store
        .load(current)
        .await
        .context("Failed to load history")?;
    tracing::info!(entries = loaded, "history restored");
    Ok(())
}
