//! Shared configuration for Doodle
//!
//! This crate provides the single source of truth for canvas dimensions,
//! input timing, view animation and the stroke tuning constants used by
//! the painting pipeline. Values can come from defaults, a TOML file or
//! environment overrides.

mod stroke;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub use stroke::*;

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 720;

/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 1280;

/// Default scale factor (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Default window between two touch-downs that counts as a double tap
pub const DEFAULT_DOUBLE_TAP_THRESHOLD_MS: u64 = 500;

/// Default duration of the draw/menu slide
pub const DEFAULT_TRANSITION_DURATION_S: f32 = 0.4;

/// Default render loop frame interval
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Environment variable pointing at a TOML config file
pub const CONFIG_PATH_ENV: &str = "DOODLE_CONFIG";

/// Environment variable overriding the canvas dump location
pub const CANVAS_FILE_ENV: &str = "DOODLE_CANVAS_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Window and canvas size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Logical width in pixels
    pub width: u32,
    /// Logical height in pixels
    pub height: u32,
    /// Density scale applied to get physical pixels
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl DisplayConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    /// Physical canvas size `(width, height)`, never smaller than 1x1
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.scale).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// Touch input timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Two touch-downs closer than this switch the next stroke to erase
    pub double_tap_threshold_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_tap_threshold_ms: DEFAULT_DOUBLE_TAP_THRESHOLD_MS,
        }
    }
}

/// Draw/menu view animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Seconds for a full slide between the draw and menu views
    pub transition_duration_s: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            transition_duration_s: DEFAULT_TRANSITION_DURATION_S,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub stroke: StrokeTuning,
    pub input: InputConfig,
    pub view: ViewConfig,
    /// Where the raw canvas pixels are dumped while the window is gone
    pub canvas_file: PathBuf,
    /// Sleep between render loop iterations
    pub frame_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            stroke: StrokeTuning::default(),
            input: InputConfig::default(),
            view: ViewConfig::default(),
            canvas_file: std::env::temp_dir().join("doodle-canvas.rgba"),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document; missing fields keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loading config from {}", path.display());
        Self::from_toml_str(&source)
    }

    /// Build the config from `DOODLE_CONFIG` and `DOODLE_CANVAS_FILE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_ENV) {
            Some(path) if !path.is_empty() => Self::load(path)?,
            _ => Self::default(),
        };

        if let Some(canvas_file) = lookup(CANVAS_FILE_ENV).filter(|p| !p.is_empty()) {
            config.canvas_file = PathBuf::from(canvas_file);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "display must be non-empty, got {}x{}",
                self.display.width, self.display.height
            )));
        }
        if !stroke::is_positive(self.display.scale) {
            return Err(ConfigError::Invalid(format!(
                "display scale must be positive, got {}",
                self.display.scale
            )));
        }
        if !stroke::is_positive(self.view.transition_duration_s) {
            return Err(ConfigError::Invalid(
                "transition_duration_s must be positive".to_string(),
            ));
        }
        self.stroke.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DisplayConfig::default();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.scale, DEFAULT_SCALE);
    }

    #[test]
    fn test_physical_size() {
        let mut config = DisplayConfig::default();
        config.scale = 2.0;
        assert_eq!(config.physical_size(), (1440, 2560));

        config.scale = 0.0001;
        assert_eq!(config.physical_size(), (1, 1));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let result = AppConfig::from_toml_str(
            r#"
            [display]
            scale = 0.0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            frame_interval_ms = 8

            [stroke]
            max_brush_size = 90.0

            [display]
            width = 320
            height = 480
            "#,
        )
        .unwrap();

        assert_eq!(config.frame_interval_ms, 8);
        assert_eq!(config.stroke.max_brush_size, 90.0);
        assert_eq!(config.stroke.min_brush_size, DEFAULT_MIN_BRUSH_SIZE);
        assert_eq!(config.display.width, 320);
        assert_eq!(config.input.double_tap_threshold_ms, DEFAULT_DOUBLE_TAP_THRESHOLD_MS);
    }

    #[test]
    fn test_invalid_toml_values() {
        let result = AppConfig::from_toml_str(
            r#"
            [display]
            width = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = AppConfig::from_toml_str("stroke = [");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_lookup_overrides_canvas_file() {
        let config = AppConfig::from_lookup(|key| match key {
            CANVAS_FILE_ENV => Some("/tmp/custom-canvas.rgba".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.canvas_file, PathBuf::from("/tmp/custom-canvas.rgba"));
    }

    #[test]
    fn test_lookup_missing_file() {
        let result = AppConfig::from_lookup(|key| match key {
            CONFIG_PATH_ENV => Some("/definitely/not/here/doodle.toml".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
