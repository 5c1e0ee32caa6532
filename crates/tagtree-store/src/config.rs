//! Store selection

use crate::document::DocumentStore;
use crate::file::JsonFileStore;
use crate::memory::MemoryStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local map, lost on exit
    Memory,
    /// One JSON file per document
    #[default]
    File,
}

/// Store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend to open
    pub backend: StoreBackend,
    /// Document directory for the file backend
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            dir: PathBuf::from("trees"),
        }
    }
}

impl StoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With backend
    #[inline]
    #[must_use]
    pub fn with_backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    /// With document directory
    #[inline]
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Open the configured backend
    #[must_use]
    pub fn open(&self) -> Arc<dyn DocumentStore> {
        match self.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::File => Arc::new(JsonFileStore::new(&self.dir)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_selected_backend() {
        assert_eq!(StoreConfig::new().open().name(), "json-file");
        let memory = StoreConfig::new().with_backend(StoreBackend::Memory);
        assert_eq!(memory.open().name(), "memory");
    }

    #[test]
    fn backend_names_are_snake_case() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"backend":"memory","dir":"/tmp/t"}"#).unwrap();
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.dir, PathBuf::from("/tmp/t"));
    }
}
