use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "clipshelf";

/// Root of the clipshelf data directory.
///
/// - macOS: ~/Library/Application Support/clipshelf
/// - Windows: %APPDATA%\clipshelf
/// - Linux: $XDG_DATA_HOME/clipshelf or ~/.local/share/clipshelf
///
/// Directories are not created here; callers decide when to create them.
pub fn app_data_dir() -> Result<PathBuf> {
    let base_dir =
        get_platform_data_dir().context("Failed to get platform-specific data directory")?;

    Ok(base_dir.join(APP_DIR_NAME))
}

/// Registry index and image blobs.
pub fn cache_dir() -> Result<PathBuf> {
    let base_dir = dirs::cache_dir()
        .map(Ok)
        .unwrap_or_else(get_platform_data_dir)
        .context("Failed to get platform-specific cache directory")?;

    Ok(base_dir.join(APP_DIR_NAME))
}

pub fn logs_dir() -> Result<PathBuf> {
    Ok(app_data_dir()?.join("logs"))
}

/// Default location of `clipshelf.toml`.
pub fn config_file() -> Result<PathBuf> {
    let base_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Unable to get platform config directory"))?;

    Ok(base_dir.join(APP_DIR_NAME).join("clipshelf.toml"))
}

fn get_platform_data_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        if let Some(xdg_data_home) = std::env::var_os("XDG_DATA_HOME") {
            return Ok(PathBuf::from(xdg_data_home));
        }
    }

    dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Unable to get platform data directory"))
}
