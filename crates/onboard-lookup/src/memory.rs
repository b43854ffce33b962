//! In-memory lookup provider.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::geo::GeoDirectory;
use crate::{LookupError, LookupProvider, Result};

/// Snapshot of already-persisted records, as loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingRecords {
    #[serde(default)]
    pub business_names: Vec<String>,
    #[serde(default)]
    pub contact_emails: Vec<String>,
}

impl ExistingRecords {
    /// Parse a YAML snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the YAML does not describe a snapshot.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| LookupError::master_data("existing records yaml", e.to_string()))
    }

    /// Load a YAML snapshot from disk.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

/// Lookup provider holding everything in memory.
///
/// Persisted names and emails match exactly, with no case folding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLookup {
    geo: GeoDirectory,
    business_names: HashSet<String>,
    contact_emails: HashSet<String>,
}

impl InMemoryLookup {
    /// Create a provider with no persisted records.
    #[must_use]
    pub fn new(geo: GeoDirectory) -> Self {
        Self {
            geo,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_business_name(mut self, name: impl Into<String>) -> Self {
        self.business_names.insert(name.into());
        self
    }

    #[must_use]
    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_emails.insert(email.into());
        self
    }

    /// Add every record of a snapshot.
    #[must_use]
    pub fn with_existing(mut self, existing: ExistingRecords) -> Self {
        self.business_names.extend(existing.business_names);
        self.contact_emails.extend(existing.contact_emails);
        self
    }

    #[must_use]
    pub fn geo(&self) -> &GeoDirectory {
        &self.geo
    }
}

#[async_trait]
impl LookupProvider for InMemoryLookup {
    async fn country_exists(&self, iso_code: &str) -> Result<bool> {
        Ok(self.geo.country_exists(iso_code))
    }

    async fn state_exists(
        &self,
        country_iso_code: &str,
        state_name_or_code: &str,
    ) -> Result<bool> {
        Ok(self.geo.state_exists(country_iso_code, state_name_or_code))
    }

    async fn business_name_exists(&self, name: &str) -> Result<bool> {
        Ok(self.business_names.contains(name))
    }

    async fn contact_email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.contact_emails.contains(email))
    }
}
