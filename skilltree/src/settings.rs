use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const MIN_WINDOW_WIDTH: u32 = 320;
pub const MAX_WINDOW_WIDTH: u32 = 7680;
pub const MIN_WINDOW_HEIGHT: u32 = 240;
pub const MAX_WINDOW_HEIGHT: u32 = 4320;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            vsync: true,
        }
    }
}

impl WindowSettings {
    pub fn clamp(mut self) -> Self {
        self.width = self.width.clamp(MIN_WINDOW_WIDTH, MAX_WINDOW_WIDTH);
        self.height = self.height.clamp(MIN_WINDOW_HEIGHT, MAX_WINDOW_HEIGHT);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessibilitySettings {
    /// Skips the entrance reveal.
    pub reduce_motion: bool,
    pub high_contrast: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewerSettings {
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub accessibility: AccessibilitySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ViewerSettings {
    pub fn sanitized(mut self) -> Self {
        self.window = self.window.clamp();
        if self.logging.filter.trim().is_empty() {
            self.logging = LoggingSettings::default();
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("SKILLTREE_SETTINGS_PATH") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));

        Self::new(base.join("skilltree").join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<ViewerSettings, SettingsError> {
        let bytes = fs::read(&self.path).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_slice::<ViewerSettings>(&bytes)
            .map(ViewerSettings::sanitized)
            .map_err(|source| SettingsError::Json {
                path: self.path.clone(),
                source,
            })
    }

    /// Missing or unreadable settings fall back to defaults.
    pub fn load(&self) -> ViewerSettings {
        match self.try_load() {
            Ok(settings) => settings,
            Err(SettingsError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                ViewerSettings::default()
            }
            Err(err) => {
                tracing::warn!(%err, "using default settings");
                ViewerSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &ViewerSettings) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let text = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, text).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_window_and_restores_blank_filter() {
        let settings = ViewerSettings {
            window: WindowSettings {
                width: 10,
                height: 100_000,
                vsync: false,
            },
            logging: LoggingSettings {
                filter: "  ".to_string(),
            },
            ..ViewerSettings::default()
        }
        .sanitized();

        assert_eq!(settings.window.width, MIN_WINDOW_WIDTH);
        assert_eq!(settings.window.height, MAX_WINDOW_HEIGHT);
        assert!(!settings.window.vsync);
        assert_eq!(settings.logging.filter, "info");
    }

    #[test]
    fn serde_defaults_fill_missing_sections() {
        let parsed: ViewerSettings =
            serde_json::from_str(r#"{"accessibility":{"reduce_motion":true,"high_contrast":false}}"#)
                .expect("settings JSON should parse");
        assert!(parsed.accessibility.reduce_motion);
        assert_eq!(parsed.window, WindowSettings::default());
        assert_eq!(parsed.logging, LoggingSettings::default());
    }

    #[test]
    fn save_then_load_through_nested_directory() {
        let dir = std::env::temp_dir().join(format!("skilltree_settings_{}", std::process::id()));
        let store = SettingsStore::new(dir.join("nested").join("settings.json"));
        let settings = ViewerSettings {
            accessibility: AccessibilitySettings {
                reduce_motion: true,
                high_contrast: true,
            },
            ..ViewerSettings::default()
        };
        store.save(&settings).expect("save should create parent dirs");
        assert_eq!(store.load(), settings);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_file_loads_defaults_but_reports_error() {
        let path = std::env::temp_dir().join(format!(
            "skilltree_settings_bad_{}.json",
            std::process::id()
        ));
        fs::write(&path, b"not json").unwrap();
        let store = SettingsStore::new(&path);
        assert!(matches!(store.try_load(), Err(SettingsError::Json { .. })));
        assert_eq!(store.load(), ViewerSettings::default());
        let _ = fs::remove_file(&path);
    }
}
