//! Application configuration
//!
//! Read from an optional TOML file, then overridden by command line flags:
//!
//! ```toml
//! [store]
//! backend = "file"
//! dir = "trees"
//!
//! [sync]
//! request_timeout_ms = 5000
//! refetch_on_settle = true
//!
//! [log]
//! filter = "tagtree=debug"
//! format = "json"
//! ```

use anyhow::Context;
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tagtree_store::{StoreBackend, StoreConfig};
use tagtree_sync::SyncConfig;

/// File looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "tagtree.toml";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, used when `RUST_LOG` is unset
    pub filter: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Document store
    pub store: StoreConfig,
    /// Optimistic coordinator
    pub sync: SyncConfig,
    /// Logging
    pub log: LogConfig,
}

impl AppConfig {
    /// Parse TOML text
    ///
    /// # Errors
    /// Returns an error on invalid TOML or unknown value types.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if present, or defaults
    ///
    /// # Errors
    /// Returns an error if an explicitly given file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Resolve configuration for one invocation: file, then flags
    ///
    /// # Errors
    /// See [`Self::load`].
    pub fn resolve(matches: &ArgMatches) -> anyhow::Result<Self> {
        let mut config = Self::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
        config.apply_flags(matches);
        Ok(config)
    }

    /// Apply global flag overrides
    pub fn apply_flags(&mut self, matches: &ArgMatches) {
        if let Some(dir) = matches.get_one::<PathBuf>("store-dir") {
            self.store = StoreConfig::new()
                .with_backend(StoreBackend::File)
                .with_dir(dir);
        }
        if let Some(filter) = matches.get_one::<String>("log") {
            self.log.filter.clone_from(filter);
        }
        if matches.get_flag("log-json") {
            self.log.format = LogFormat::Json;
        }
        if let Some(ms) = matches.get_one::<u64>("timeout-ms") {
            self.sync = self
                .sync
                .clone()
                .with_request_timeout(Duration::from_millis(*ms));
        }
        if matches.get_flag("no-refetch") {
            self.sync = self.sync.clone().with_refetch_on_settle(false);
        }
    }
}
