//! Configuration loading and typed config structures for the hook callers.
//!
//! The canonical configuration lives in `devhooks-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty file is a valid configuration.

use std::path::Path;

use serde::Deserialize;

/// Environment variable that overrides `logging.level`.
pub const LOG_LEVEL_ENV: &str = "DEVHOOKS_LOG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `devhooks-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HooksConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// File system activity feedback.
    #[serde(default)]
    pub activity: ActivityConfig,

    /// Robot action timing.
    #[serde(default)]
    pub robot: RobotConfig,
}

impl HooksConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `DEVHOOKS_LOG` environment variable overrides `logging.level`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let volume = self.activity.sound_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(ConfigError::Invalid {
                field: "activity.sound_volume",
                reason: format!("must be within 0.0..=1.0, got {volume}"),
            });
        }

        let ratio = self.robot.harvest_ratio;
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(ConfigError::Invalid {
                field: "robot.harvest_ratio",
                reason: format!("must be finite and non-negative, got {ratio}"),
            });
        }

        Ok(())
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), or any `EnvFilter`
    /// directive string. `RUST_LOG` still wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Override fields from environment variables.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(LOG_LEVEL_ENV) {
            self.level = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// File system activity feedback configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivityConfig {
    /// Whether the presentation side plays access sounds and blinks
    /// indicators at all. Hooks still run when disabled.
    #[serde(default = "default_true")]
    pub feedback_enabled: bool,

    /// Volume for access sounds (0.0-1.0).
    #[serde(default = "default_sound_volume")]
    pub sound_volume: f32,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            feedback_enabled: true,
            sound_volume: default_sound_volume(),
        }
    }
}

/// Robot action timing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RobotConfig {
    /// Seconds of pause per point of block hardness when breaking a block.
    ///
    /// The resulting estimate is what a break-block hook sees before any
    /// handler adjusts it.
    #[serde(default = "default_harvest_ratio")]
    pub harvest_ratio: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            harvest_ratio: default_harvest_ratio(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}

const fn default_sound_volume() -> f32 {
    1.0
}

const fn default_harvest_ratio() -> f64 {
    1.0
}
