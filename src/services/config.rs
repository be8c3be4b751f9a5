//! Settings file and the resolved editor configuration.
//!
//! The file lives at `<cache dir>/.tabedit/settings.json`. A missing or
//! malformed file is never an error for the caller: defaults are used.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::kernel::DEFAULT_STATUS_INTERVAL;

pub const APP_DIR: &str = ".tabedit";
const SETTINGS_FILE: &str = "settings.json";

const DEFAULT_EXPLORER_WIDTH_PERCENT: u16 = 25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub status_interval_ms: u64,
    pub show_hidden: bool,
    pub explorer_width_percent: u16,
    pub tab_size: u8,
    pub show_line_numbers: bool,
    pub keybindings: Vec<KeybindingRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            status_interval_ms: DEFAULT_STATUS_INTERVAL.as_millis() as u64,
            show_hidden: false,
            explorer_width_percent: DEFAULT_EXPLORER_WIDTH_PERCENT,
            tab_size: 4,
            show_line_numbers: true,
            keybindings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeybindingRule {
    pub key: String,
    pub command: String,
}

#[derive(Clone, Debug)]
pub struct EditorConfig {
    pub status_interval: Duration,
    pub show_hidden: bool,
    /// Clamped to 10..=60.
    pub explorer_width_percent: u16,
    /// Spaces inserted by `insertTab`.
    pub tab_size: u8,
    pub show_line_numbers: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl EditorConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            status_interval: Duration::from_millis(settings.status_interval_ms),
            show_hidden: settings.show_hidden,
            explorer_width_percent: settings.explorer_width_percent.clamp(10, 60),
            tab_size: settings.tab_size.clamp(1, 16),
            show_line_numbers: settings.show_line_numbers,
        }
    }

    pub fn tab_text(&self) -> String {
        " ".repeat(self.tab_size as usize)
    }
}

pub fn get_settings_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join(SETTINGS_FILE))
}

/// `<cache dir>/.tabedit`, shared by the settings file and the logs.
pub fn app_dir() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(APP_DIR))
}

pub fn ensure_settings_file() -> std::io::Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine settings directory",
        )
    })?;
    ensure_settings_file_at(&path)?;
    Ok(path)
}

/// Writes the default settings to `path` unless a file already exists there.
pub fn ensure_settings_file_at(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content =
            serde_json::to_string_pretty(&Settings::default()).unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, content)?;
    }
    Ok(())
}

pub fn load_settings() -> Option<Settings> {
    let path = get_settings_path()?;
    load_settings_from(&path)
}

pub fn load_settings_from(path: &Path) -> Option<Settings> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(settings) => Some(settings),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "invalid settings file ignored");
            None
        }
    }
}

fn get_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return Some(PathBuf::from(local));
        }
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/services/config.rs"]
mod tests;
