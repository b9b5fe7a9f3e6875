//! History configuration DTO.
//!
//! `from_toml` is a pure data mapping: missing keys take defaults and nothing
//! is checked. Call [`HistoryConfig::validate`] before handing the value to
//! the store.

use std::path::PathBuf;
use std::time::Duration;

use crate::clipboard::TextNormalization;
use crate::history::SectionOrder;

pub const DEFAULT_MAX_HISTORY_LENGTH: usize = 15;
pub const DEFAULT_MAX_ENTRY_PREVIEW_LENGTH: usize = 50;
pub const DEFAULT_DELAYED_SELECTION_TIMEOUT_MS: u64 = 750;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Cap on non-favorite entries.
    pub max_history_length: usize,
    pub max_entry_preview_length: usize,
    /// Only favorites are written to the index.
    pub cache_only_favorites: bool,
    /// Reused and cycled entries move to the front.
    pub move_item_first: bool,
    pub strip_text: bool,
    pub cache_images: bool,
    /// Application ids whose copies are never captured.
    pub excluded_apps: Vec<String>,
    pub pinned_on_bottom: bool,
    pub clear_on_boot: bool,
    pub notify_on_copy: bool,
    pub notify_on_cycle: bool,
    pub delayed_selection_timeout_ms: u64,
    /// Overrides the platform cache directory.
    pub cache_dir: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history_length: DEFAULT_MAX_HISTORY_LENGTH,
            max_entry_preview_length: DEFAULT_MAX_ENTRY_PREVIEW_LENGTH,
            cache_only_favorites: false,
            move_item_first: false,
            strip_text: false,
            cache_images: false,
            excluded_apps: Vec::new(),
            pinned_on_bottom: false,
            clear_on_boot: false,
            notify_on_copy: false,
            notify_on_cycle: false,
            delayed_selection_timeout_ms: DEFAULT_DELAYED_SELECTION_TIMEOUT_MS,
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_history_length must be at least 1, got {0}")]
    HistoryLengthTooSmall(usize),
    #[error("max_entry_preview_length must be at least 2, got {0}")]
    PreviewLengthTooSmall(usize),
}

impl HistoryConfig {
    /// Maps the `[history]`, `[capture]`, `[notifications]` and `[storage]`
    /// tables onto the DTO.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let history = toml_value.get("history");
        let capture = toml_value.get("capture");
        let notifications = toml_value.get("notifications");
        let storage = toml_value.get("storage");

        let flag = |table: Option<&toml::Value>, key: &str, default: bool| {
            table
                .and_then(|t| t.get(key))
                .and_then(|v| v.as_bool())
                .unwrap_or(default)
        };
        let count = |table: Option<&toml::Value>, key: &str, default: usize| {
            table
                .and_then(|t| t.get(key))
                .and_then(|v| v.as_integer())
                .map(|v| usize::try_from(v).unwrap_or(0))
                .unwrap_or(default)
        };

        Ok(Self {
            max_history_length: count(history, "max_history_length", defaults.max_history_length),
            max_entry_preview_length: count(
                history,
                "max_entry_preview_length",
                defaults.max_entry_preview_length,
            ),
            move_item_first: flag(history, "move_item_first", defaults.move_item_first),
            pinned_on_bottom: flag(history, "pinned_on_bottom", defaults.pinned_on_bottom),
            delayed_selection_timeout_ms: history
                .and_then(|t| t.get("delayed_selection_timeout_ms"))
                .and_then(|v| v.as_integer())
                .map(|v| u64::try_from(v).unwrap_or(0))
                .unwrap_or(defaults.delayed_selection_timeout_ms),
            strip_text: flag(capture, "strip_text", defaults.strip_text),
            cache_images: flag(capture, "cache_images", defaults.cache_images),
            excluded_apps: capture
                .and_then(|t| t.get("excluded_apps"))
                .and_then(|v| v.as_array())
                .map(|apps| {
                    apps.iter()
                        .filter_map(|v| v.as_str())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            notify_on_copy: flag(notifications, "on_copy", defaults.notify_on_copy),
            notify_on_cycle: flag(notifications, "on_cycle", defaults.notify_on_cycle),
            cache_only_favorites: flag(
                storage,
                "cache_only_favorites",
                defaults.cache_only_favorites,
            ),
            clear_on_boot: flag(storage, "clear_on_boot", defaults.clear_on_boot),
            cache_dir: storage
                .and_then(|t| t.get("cache_dir"))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history_length < 1 {
            return Err(ConfigError::HistoryLengthTooSmall(self.max_history_length));
        }
        if self.max_entry_preview_length < 2 {
            return Err(ConfigError::PreviewLengthTooSmall(
                self.max_entry_preview_length,
            ));
        }
        Ok(())
    }

    pub fn text_normalization(&self) -> TextNormalization {
        TextNormalization::from_strip(self.strip_text)
    }

    pub fn section_order(&self) -> SectionOrder {
        SectionOrder::from_pinned_on_bottom(self.pinned_on_bottom)
    }

    pub fn delayed_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.delayed_selection_timeout_ms)
    }

    pub fn is_excluded(&self, app_id: &str) -> bool {
        self.excluded_apps.iter().any(|app| app == app_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    #[test]
    fn missing_tables_take_defaults() {
        let toml_value: Value = toml::from_str("").unwrap();
        let config = HistoryConfig::from_toml(&toml_value).unwrap();
        assert_eq!(config, HistoryConfig::default());
        assert_eq!(config.max_history_length, 15);
        assert_eq!(config.max_entry_preview_length, 50);
        assert_eq!(config.delayed_selection_timeout(), Duration::from_millis(750));
    }

    #[test]
    fn parses_every_table() {
        let toml_str = r#"
            [history]
            max_history_length = 3
            max_entry_preview_length = 20
            move_item_first = true
            pinned_on_bottom = true
            delayed_selection_timeout_ms = 100

            [capture]
            strip_text = true
            cache_images = true
            excluded_apps = ["org.keepassxc.KeePassXC", 7]

            [notifications]
            on_copy = true

            [storage]
            cache_only_favorites = true
            clear_on_boot = true
            cache_dir = "/tmp/clipshelf"
        "#;
        let toml_value: Value = toml::from_str(toml_str).unwrap();

        let config = HistoryConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config.max_history_length, 3);
        assert_eq!(config.max_entry_preview_length, 20);
        assert!(config.move_item_first);
        assert_eq!(config.section_order(), SectionOrder::HistoryFirst);
        assert_eq!(config.text_normalization(), TextNormalization::Trim);
        assert!(config.cache_images);
        assert!(config.is_excluded("org.keepassxc.KeePassXC"));
        assert_eq!(config.excluded_apps.len(), 1);
        assert!(config.notify_on_copy);
        assert!(!config.notify_on_cycle);
        assert!(config.cache_only_favorites);
        assert!(config.clear_on_boot);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/clipshelf")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_toml_does_not_validate() {
        let toml_str = r#"
            [history]
            max_history_length = -4
            max_entry_preview_length = 1
        "#;
        let toml_value: Value = toml::from_str(toml_str).unwrap();

        let config = HistoryConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config.max_history_length, 0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::HistoryLengthTooSmall(0))
        );
    }

    #[test]
    fn preview_length_lower_bound() {
        let config = HistoryConfig {
            max_entry_preview_length: 1,
            ..HistoryConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PreviewLengthTooSmall(1)));
    }
}
