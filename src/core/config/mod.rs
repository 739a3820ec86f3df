//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! A single configuration file, `tcr.json`, lives at the root of the working
//! directory. It is read once per invocation and never written.
//!
//! # Location
//!
//! 1. `--config <path>` if given (relative paths resolve against the
//!    working directory)
//! 2. `<working directory>/tcr.json`
//!
//! # Example
//!
//! ```no_run
//! use tcr::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Path::new("/path/to/repo"), None).unwrap();
//! println!("test command: {}", config.test_command());
//! ```

pub mod schema;

pub use schema::{TcrConfig, TestCommand};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "tcr.json";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    test_command: TestCommand,
    path: PathBuf,
}

impl Config {
    /// Build a configuration directly from a test command.
    pub fn new(test_command: TestCommand, path: impl Into<PathBuf>) -> Self {
        Self {
            test_command,
            path: path.into(),
        }
    }

    /// Load configuration for a working directory.
    ///
    /// `explicit` overrides the default `tcr.json` location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, not valid JSON of
    /// the expected shape, or names an empty test command.
    pub fn load(workdir: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = Self::resolve_path(workdir, explicit);
        let raw = Self::read_config(&path)?;
        let test_command = raw.test_command()?;

        Ok(Self { test_command, path })
    }

    /// Where the configuration for `workdir` is read from.
    pub fn resolve_path(workdir: &Path, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => workdir.join(p),
            None => workdir.join(CONFIG_FILE_NAME),
        }
    }

    fn read_config(path: &Path) -> Result<TcrConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The configured test command.
    pub fn test_command(&self) -> &TestCommand {
        &self.test_command
    }

    /// The file this configuration was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
