//! Configuration management for statementfinder
//!
//! All configuration is loaded from `./config/statementfinder.toml`.
//! No hardcoded defaults exist in source code - all defaults are in the config
//! template, which is embedded in the binary and used when the file is absent.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/statementfinder.toml";

/// Default configuration file content - this is the ONLY place defaults exist
pub const DEFAULT_CONFIG: &str = include_str!("../config/statementfinder.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },

    #[error("Configuration field '{field}' must be greater than zero")]
    ZeroValue { field: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub files: FilesConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Identifying user-agent sent with every request
    pub user_agent: String,
    /// Bound on a single request in seconds
    pub request_timeout_secs: u64,
    /// 301/302/303 hops followed manually before a fetch is abandoned
    pub max_redirect_hops: usize,
}

/// Input/output file locations
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    pub data_dir: String,
    pub input_file: String,
    pub output_file: String,
}

impl AppConfig {
    /// Load configuration from `./config/statementfinder.toml`, falling back
    /// to the embedded template when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_PATH);
        if path.exists() {
            Self::load_from(path)
        } else {
            Self::parse(DEFAULT_CONFIG)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroValue {
                field: "http.request_timeout_secs".to_string(),
            });
        }
        if self.http.max_redirect_hops == 0 {
            return Err(ConfigError::ZeroValue {
                field: "http.max_redirect_hops".to_string(),
            });
        }
        if self.files.input_file.trim().is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "files.input_file".to_string(),
            });
        }
        if self.files.output_file.trim().is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "files.output_file".to_string(),
            });
        }
        Ok(())
    }

    /// Write the default configuration template to `CONFIG_PATH`
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = PathBuf::from(CONFIG_PATH);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, DEFAULT_CONFIG)?;
        Ok(path)
    }

    /// Full path of the input CSV export
    pub fn input_path(&self) -> PathBuf {
        Path::new(&self.files.data_dir).join(&self.files.input_file)
    }

    /// Full path of the output CSV
    pub fn output_path(&self) -> PathBuf {
        Path::new(&self.files.data_dir).join(&self.files.output_file)
    }
}
