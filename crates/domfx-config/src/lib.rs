//! domfx configuration system
//!
//! This crate provides centralized configuration management for domfx,
//! loading settings from `domfx.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, resolved against the current directory.
pub const CONFIG_FILE_NAME: &str = "domfx.toml";

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure for domfx
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DomfxConfig {
    /// Animation engine settings
    pub animation: AnimationConfig,
}

/// Animation engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Duration used when `animate` is called without one, in milliseconds
    pub default_duration_ms: f64,
    /// Easing used when `animate` is called without one
    /// (linear, ease-in, ease-out, ease-in-out)
    pub default_easing: String,
    /// Catch panics raised by update callbacks and reject only the failing task
    pub isolate_callback_panics: bool,
    /// Maximum number of undrained lifecycle events kept; 0 disables events
    pub event_capacity: usize,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 1000.0,
            default_easing: "ease-in-out".to_string(),
            isolate_callback_panics: true,
            event_capacity: 256,
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl DomfxConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from the default location (domfx.toml in the current directory)
    /// or return default configuration if the file doesn't exist or is invalid
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(CONFIG_FILE_NAME)
    }

    /// Load `path` if it exists, otherwise use defaults.
    ///
    /// A missing file is expected and falls back quietly. A file that exists
    /// but cannot be read or parsed is logged before falling back.
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(err) => {
                tracing::warn!(%err, "ignoring unusable config file, using defaults");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable values are ignored.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// `merge_with_env` is this with `std::env::var`; tests pass a map instead
    /// of mutating the process environment.
    pub fn merge_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("DOMFX_DEFAULT_DURATION_MS") {
            if let Ok(ms) = val.trim().parse::<f64>() {
                self.animation.default_duration_ms = ms;
            }
        }
        if let Some(val) = lookup("DOMFX_DEFAULT_EASING") {
            self.animation.default_easing = val.trim().to_string();
        }
        if let Some(val) = lookup("DOMFX_ISOLATE_CALLBACK_PANICS") {
            self.animation.isolate_callback_panics = parse_flag(val.trim());
        }
        if let Some(val) = lookup("DOMFX_EVENT_CAPACITY") {
            if let Ok(capacity) = val.trim().parse::<usize>() {
                self.animation.event_capacity = capacity;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from domfx.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DomfxConfig::default();
        assert_eq!(config.animation.default_duration_ms, 1000.0);
        assert_eq!(config.animation.default_easing, "ease-in-out");
        assert!(config.animation.isolate_callback_panics);
        assert_eq!(config.animation.event_capacity, 256);
    }

    #[test]
    fn test_toml_serialization() {
        let config = DomfxConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: DomfxConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: DomfxConfig = toml::from_str(
            r#"
            [animation]
            default_easing = "linear"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.animation.default_easing, "linear");
        assert_eq!(parsed.animation.default_duration_ms, 1000.0);
        assert!(parsed.animation.isolate_callback_panics);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[animation]\ndefault_duration_ms = 250.0\nisolate_callback_panics = false"
        )
        .unwrap();

        let config = DomfxConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.animation.default_duration_ms, 250.0);
        assert!(!config.animation.isolate_callback_panics);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DomfxConfig::load_from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[animation]\ndefault_duration_ms = \"slow\"").unwrap();

        let err = DomfxConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn test_load_or_default_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = DomfxConfig::load_or_default_from(dir.path().join("domfx.toml"));
        assert_eq!(config, DomfxConfig::default());
    }

    #[test]
    fn test_load_or_default_from_invalid_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[animation]\ndefault_easing = 3").unwrap();

        let config = DomfxConfig::load_or_default_from(file.path());
        assert_eq!(config, DomfxConfig::default());
    }

    #[test]
    fn test_load_or_default_from_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[animation]\nevent_capacity = 8").unwrap();

        let config = DomfxConfig::load_or_default_from(file.path());
        assert_eq!(config.animation.event_capacity, 8);
    }

    #[test]
    fn test_merge_overrides() {
        let env: HashMap<&str, &str> = [
            ("DOMFX_DEFAULT_DURATION_MS", "400"),
            ("DOMFX_DEFAULT_EASING", "ease-out"),
            ("DOMFX_ISOLATE_CALLBACK_PANICS", "0"),
            ("DOMFX_EVENT_CAPACITY", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = DomfxConfig::default();
        config.merge_with(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.animation.default_duration_ms, 400.0);
        assert_eq!(config.animation.default_easing, "ease-out");
        assert!(!config.animation.isolate_callback_panics);
        // Unparseable values leave the previous setting in place
        assert_eq!(config.animation.event_capacity, 256);
    }
}
