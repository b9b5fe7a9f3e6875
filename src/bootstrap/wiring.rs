//! Dependency wiring.
//!
//! The only place that depends on cs-infra, cs-platform and cs-app at the
//! same time. Assembly only: no history decisions are made here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cs_app::{CaptureClipboardChange, ClipboardReader, HistoryPorts, HistoryStore, ModeGate};
use cs_core::ports::{ClipboardIoPort, ForegroundAppPort, HistoryObserverPort, RegistryPort};
use cs_core::HistoryConfig;
use cs_infra::FsRegistry;

/// Fully assembled daemon components.
pub struct Daemon {
    pub config: HistoryConfig,
    pub registry: Arc<dyn RegistryPort>,
    pub store: HistoryStore,
    pub mode_gate: ModeGate,
    pub reader: ClipboardReader,
    pub capture: Arc<CaptureClipboardChange>,
}

/// `[storage] cache_dir` when configured, otherwise the platform cache dir.
pub fn registry_root(config: &HistoryConfig) -> anyhow::Result<PathBuf> {
    match &config.cache_dir {
        Some(dir) => Ok(dir.clone()),
        None => cs_infra::fs::app_data_dir::cache_dir(),
    }
}

pub fn wire_daemon(
    config: HistoryConfig,
    clipboard: Arc<dyn ClipboardIoPort>,
    foreground: Arc<dyn ForegroundAppPort>,
    observer: Arc<dyn HistoryObserverPort>,
) -> anyhow::Result<Daemon> {
    let root = registry_root(&config)?;
    tracing::debug!(root = %root.display(), "registry root");
    let registry: Arc<dyn RegistryPort> = Arc::new(FsRegistry::new(root));

    let store = HistoryStore::new(
        config.clone(),
        HistoryPorts {
            registry: Arc::clone(&registry),
            clipboard: Arc::clone(&clipboard),
            observer,
        },
    )
    .context("Failed to create history store")?;

    let capture = Arc::new(CaptureClipboardChange::new(
        store.clone(),
        ClipboardReader::new(Arc::clone(&clipboard)),
        foreground,
    ));

    Ok(Daemon {
        config,
        registry,
        mode_gate: ModeGate::new(store.clone()),
        reader: ClipboardReader::new(clipboard),
        store,
        capture,
    })
}
