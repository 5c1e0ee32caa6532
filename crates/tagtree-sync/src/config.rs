//! Coordinator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Coordinator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Budget for one remote call in milliseconds
    pub request_timeout_ms: u64,
    /// Refetch the authoritative tree after every settled mutation
    pub refetch_on_settle: bool,
    /// Buffered cache events per subscriber
    pub event_capacity: usize,
}

impl SyncConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With refetch-on-settle toggle
    #[inline]
    #[must_use]
    pub fn with_refetch_on_settle(mut self, enabled: bool) -> Self {
        self.refetch_on_settle = enabled;
        self
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            refetch_on_settle: true,
            event_capacity: 64,
        }
    }
}
