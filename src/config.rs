//! Configuration file support for signplan.
//!
//! Settings are stored as pretty JSON. Besides user preferences the file
//! carries viewport tuning and the catalog that new events start from.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{HIT_RADIUS_PX, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::model::Catalog;
use crate::viewport::ZoomLimits;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Get all log levels in order from least to most verbose.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// One step more verbose, saturating at trace.
    pub fn more_verbose(&self) -> LogLevel {
        let all = Self::all();
        let idx = all.iter().position(|l| l == self).unwrap_or(0);
        all[(idx + 1).min(all.len() - 1)]
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Canvas zoom and selection tuning
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Signage and holder types that new events start with
    #[serde(default = "Catalog::with_defaults")]
    pub catalog: Catalog,
}

fn default_app_name() -> String {
    "signplan".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Default export folder path
    #[serde(default)]
    pub export_folder: String,

    /// Format id used when none is given
    #[serde(default = "default_export_format")]
    pub default_export_format: String,

    /// Pretty-print JSON exports
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
}

fn default_export_format() -> String {
    "json".to_string()
}

fn default_pretty_json() -> bool {
    true
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            export_folder: String::new(),
            default_export_format: default_export_format(),
            pretty_json: default_pretty_json(),
        }
    }
}

impl UserPreferences {
    /// Export folder, if one is configured.
    pub fn export_dir(&self) -> Option<PathBuf> {
        let folder = self.export_folder.trim();
        (!folder.is_empty()).then(|| PathBuf::from(folder))
    }
}

/// Viewport section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportConfig {
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f32,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f32,
    /// Zoom factor per step
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,
    /// Marker selection radius in screen pixels
    #[serde(default = "default_hit_radius")]
    pub hit_radius: f32,
}

fn default_min_zoom() -> f32 {
    ZOOM_MIN
}

fn default_max_zoom() -> f32 {
    ZOOM_MAX
}

fn default_zoom_step() -> f32 {
    ZOOM_STEP
}

fn default_hit_radius() -> f32 {
    HIT_RADIUS_PX
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: ZOOM_MIN,
            max_zoom: ZOOM_MAX,
            zoom_step: ZOOM_STEP,
            hit_radius: HIT_RADIUS_PX,
        }
    }
}

impl ViewportConfig {
    /// Zoom limits for a [`crate::viewport::Viewport`].
    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.min_zoom,
            max: self.max_zoom,
            step: self.zoom_step,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.min_zoom) || !positive(self.max_zoom) || self.min_zoom > self.max_zoom
        {
            return Err(ConfigError::Invalid(format!(
                "zoom range {}..{} is not a positive range",
                self.min_zoom, self.max_zoom
            )));
        }
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "zoom step {} must be greater than 1",
                self.zoom_step
            )));
        }
        if !self.hit_radius.is_finite() || self.hit_radius < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "hit radius {} must not be negative",
                self.hit_radius
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            viewport: ViewportConfig::default(),
            catalog: Catalog::with_defaults(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        config.viewport.validate()?;

        Ok(config)
    }

    /// Read configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Write configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "signplan-config.json"
    }

    /// Get the default config file path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("signplan").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("signplan")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A setting is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
