use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::logging::{parse_level, LogConfig};

/// File name looked up by `RuntimeConfig::discover`
pub const CONFIG_FILE_NAME: &str = "ffi-callbacks.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub heap: HeapConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapConfig {
    /// New-space budget in bytes; requests beyond it are pretenured
    #[serde(default = "default_nursery_size")]
    pub nursery_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Slots allocated when the callback registry is first used
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub show_spans: bool,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            nursery_size: default_nursery_size(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            file: None,
            show_spans: false,
        }
    }
}

fn default_nursery_size() -> usize { 4 * 1024 * 1024 }
fn default_initial_capacity() -> usize { 4 }
fn default_level() -> String { "info".to_string() }

impl RuntimeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Find and load configuration from current directory or parents
    pub fn discover() -> Self {
        let mut current = std::env::current_dir().ok();

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                if let Ok(config) = Self::load(&config_path) {
                    return config;
                }
            }

            current = dir.parent().map(|p| p.to_path_buf());
        }

        Self::default()
    }

    /// Discovered configuration with environment overrides applied
    ///
    /// `FFI_CALLBACKS_LOG_LEVEL` overrides `logging.level`.
    pub fn from_env() -> Self {
        let mut config = Self::discover();
        if let Ok(level) = std::env::var("FFI_CALLBACKS_LOG_LEVEL") {
            config.logging.level = level;
        }
        config
    }

    /// Logging settings in the form the logging module consumes
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: parse_level(&self.logging.level),
            log_path: self.logging.file.clone(),
            json_format: self.logging.json,
            show_spans: self.logging.show_spans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tracing::Level;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.registry.initial_capacity, 4);
        assert_eq!(config.heap.nursery_size, 4 * 1024 * 1024);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_partial() {
        let config = RuntimeConfig::parse(
            r#"
            [registry]
            initial_capacity = 16

            [logging]
            level = "debug"
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.registry.initial_capacity, 16);
        assert_eq!(config.heap, HeapConfig::default());

        let log = config.log_config();
        assert_eq!(log.level, Level::DEBUG);
        assert!(log.json_format);
    }

    #[test]
    fn test_parse_error() {
        let err = RuntimeConfig::parse("[registry]\ninitial_capacity = \"four\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[heap]\nnursery_size = 1024").unwrap();

        let config = RuntimeConfig::load(file.path()).unwrap();
        assert_eq!(config.heap.nursery_size, 1024);
    }

    #[test]
    fn test_load_missing() {
        let err = RuntimeConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
