//! Validation run configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for a batch validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum number of transporters validated at the same time
    pub max_concurrency: usize,
    /// Upper bound for one transporter's validation, lookups included
    pub lookup_timeout_ms: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            lookup_timeout_ms: 10_000,
        }
    }
}

impl ValidationConfig {
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    #[must_use]
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Parse a YAML configuration and check it.
    ///
    /// # Errors
    ///
    /// Returns an error when the YAML is malformed or a value is out of range.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or holds an invalid configuration.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read '{}': {e}", path.display())))?;
        Self::from_yaml_str(&content)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error when either limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(Error::Config(
                "max_concurrency must be greater than zero".to_string(),
            ));
        }
        if self.lookup_timeout_ms == 0 {
            return Err(Error::Config(
                "lookup_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
