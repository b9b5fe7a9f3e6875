//! Configuration loading.
//!
//! Reads `clipshelf.toml`, maps it onto [`HistoryConfig`] and validates it.
//! A missing file is not an error: the daemon starts with defaults.

use anyhow::Context;
use cs_core::HistoryConfig;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "CLIPSHELF_CONFIG";

/// `CLIPSHELF_CONFIG` when set, otherwise the platform config file.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => cs_infra::fs::app_data_dir::config_file(),
    }
}

/// Load and validate configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file exists but cannot be read, is not valid TOML,
/// or holds values that fail [`HistoryConfig::validate`].
pub fn load_config(config_path: &Path) -> anyhow::Result<HistoryConfig> {
    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %config_path.display(), "no config file, using defaults");
            return Ok(HistoryConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })
        }
    };

    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    let config = HistoryConfig::from_toml(&toml_value)?;
    config
        .validate()
        .with_context(|| format!("Invalid config in {}", config_path.display()))?;
    Ok(config)
}
