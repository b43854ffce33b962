//! Geographic master data: ISO 3166-1 countries and ISO 3166-2 subdivisions.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{LookupError, Result};

/// A first-level subdivision (state, province, ...) of a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdivision {
    /// ISO 3166-2 code, e.g. `US-CA`
    pub code: String,
    /// Full name, e.g. `California`
    pub name: String,
}

impl Subdivision {
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Match by full name or ISO code, ignoring case.
    ///
    /// The code matches either in full (`US-CA`) or without its country
    /// prefix (`CA`).
    #[must_use]
    pub fn matches(&self, name_or_code: &str) -> bool {
        let candidate = name_or_code.trim();
        if candidate.eq_ignore_ascii_case(&self.code) {
            return true;
        }
        if let Some((_, local)) = self.code.split_once('-') {
            if candidate.eq_ignore_ascii_case(local) {
                return true;
            }
        }
        candidate.to_lowercase() == self.name.to_lowercase()
    }
}

/// A country and its subdivisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub subdivisions: Vec<Subdivision>,
}

impl Country {
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            subdivisions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_subdivision(mut self, subdivision: Subdivision) -> Self {
        self.subdivisions.push(subdivision);
        self
    }

    /// Whether any subdivision matches by name or code.
    #[must_use]
    pub fn has_subdivision(&self, name_or_code: &str) -> bool {
        self.subdivisions.iter().any(|s| s.matches(name_or_code))
    }
}

/// On-disk layout of a directory file.
#[derive(Debug, Default, Deserialize, Serialize)]
struct GeoFile {
    #[serde(default)]
    countries: Vec<Country>,
}

/// Country directory keyed by upper-cased ISO code.
#[derive(Debug, Clone, Default)]
pub struct GeoDirectory {
    countries: HashMap<String, Country>,
}

impl GeoDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a country (builder form).
    #[must_use]
    pub fn with_country(mut self, country: Country) -> Self {
        self.add(country);
        self
    }

    /// Add a country, replacing any previous entry with the same code.
    pub fn add(&mut self, country: Country) {
        self.countries
            .insert(country.code.trim().to_ascii_uppercase(), country);
    }

    /// Parse a directory from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error when the document is not a directory file.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: GeoFile = serde_yaml::from_str(yaml)
            .map_err(|e| LookupError::master_data("geo directory yaml", e.to_string()))?;
        Ok(Self::from_countries(file.countries))
    }

    /// Parse a directory from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the document is not a directory file.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: GeoFile = serde_json::from_str(json)
            .map_err(|e| LookupError::master_data("geo directory json", e.to_string()))?;
        Ok(Self::from_countries(file.countries))
    }

    /// Load a directory file; `.json` files are read as JSON, anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let directory = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        tracing::debug!(
            path = %path.display(),
            countries = directory.len(),
            "loaded geo directory"
        );
        Ok(directory)
    }

    fn from_countries(countries: Vec<Country>) -> Self {
        let mut directory = Self::new();
        for country in countries {
            directory.add(country);
        }
        directory
    }

    /// Find a country by ISO code, ignoring case.
    #[must_use]
    pub fn country(&self, iso_code: &str) -> Option<&Country> {
        self.countries.get(&iso_code.trim().to_ascii_uppercase())
    }

    #[must_use]
    pub fn country_exists(&self, iso_code: &str) -> bool {
        self.country(iso_code).is_some()
    }

    /// False when the country itself is unknown.
    #[must_use]
    pub fn state_exists(&self, country_iso_code: &str, state_name_or_code: &str) -> bool {
        self.country(country_iso_code)
            .is_some_and(|country| country.has_subdivision(state_name_or_code))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
