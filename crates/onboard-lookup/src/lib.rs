#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # onboard-lookup
//!
//! Read-only reference data consulted during onboarding validation.
//!
//! The validators never talk to a database or a master-data service
//! directly; they go through [`LookupProvider`]. This crate ships:
//!
//! - [`GeoDirectory`]: ISO countries and their subdivisions
//! - [`InMemoryLookup`]: geography plus in-memory persisted names/emails
//! - [`StoreLookup`]: geography plus a libsql-backed persisted store
//! - [`CachedLookup`]: memoizes geography answers of any provider
//!
//! ## Example Usage
//!
//! ```rust
//! use onboard_lookup::{Country, GeoDirectory, InMemoryLookup, LookupProvider, Subdivision};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let geo = GeoDirectory::new().with_country(
//!     Country::new("IN", "India").with_subdivision(Subdivision::new("IN-MH", "Maharashtra")),
//! );
//! let lookup = InMemoryLookup::new(geo).with_business_name("Acme Logistics");
//!
//! assert!(lookup.state_exists("in", "maharashtra").await.unwrap());
//! assert!(lookup.business_name_exists("Acme Logistics").await.unwrap());
//! # });
//! ```

pub mod cache;
pub mod geo;
pub mod memory;
mod sql;
pub mod store;

pub use cache::CachedLookup;
pub use geo::{Country, GeoDirectory, Subdivision};
pub use memory::{ExistingRecords, InMemoryLookup};
pub use store::{StoreConfig, StoreLookup};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while consulting reference data.
///
/// Any of these means the answer is unknown, never "not found".
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Lookup provider unavailable: {details}")]
    Unavailable { details: String },

    #[error("Configuration error: {details}")]
    Config { details: String },

    #[error("Master data error in {context}: {details}")]
    MasterData { context: String, details: String },

    #[error("Libsql error during {context}: {source}")]
    Libsql {
        context: String,
        #[source]
        source: libsql::Error,
    },

    #[error("SQL error executing `{statement}`: {source}")]
    Sql {
        statement: String,
        #[source]
        source: libsql::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LookupError {
    /// Build an unavailability error.
    #[must_use]
    pub fn unavailable(details: impl Into<String>) -> Self {
        Self::Unavailable {
            details: details.into(),
        }
    }

    /// Build a master data loading error.
    #[must_use]
    pub fn master_data(context: impl Into<String>, details: impl Into<String>) -> Self {
        Self::MasterData {
            context: context.into(),
            details: details.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;

/// Reference data consulted by the validators.
///
/// Implementations must tolerate concurrent calls; several transporter groups
/// are validated at once against the same provider.
#[async_trait]
pub trait LookupProvider: Send + Sync {
    /// Whether `iso_code` is a known ISO 3166-1 alpha-2 country code.
    async fn country_exists(&self, iso_code: &str) -> Result<bool>;

    /// Whether `state_name_or_code` names a subdivision of `country_iso_code`,
    /// either by full name or by ISO 3166-2 code.
    async fn state_exists(&self, country_iso_code: &str, state_name_or_code: &str)
    -> Result<bool>;

    /// Whether a transporter with exactly this business name is already stored.
    async fn business_name_exists(&self, name: &str) -> Result<bool>;

    /// Whether a contact with exactly this email is already stored.
    async fn contact_email_exists(&self, email: &str) -> Result<bool>;
}

#[async_trait]
impl<L: LookupProvider + ?Sized> LookupProvider for Arc<L> {
    async fn country_exists(&self, iso_code: &str) -> Result<bool> {
        (**self).country_exists(iso_code).await
    }

    async fn state_exists(
        &self,
        country_iso_code: &str,
        state_name_or_code: &str,
    ) -> Result<bool> {
        (**self)
            .state_exists(country_iso_code, state_name_or_code)
            .await
    }

    async fn business_name_exists(&self, name: &str) -> Result<bool> {
        (**self).business_name_exists(name).await
    }

    async fn contact_email_exists(&self, email: &str) -> Result<bool> {
        (**self).contact_email_exists(email).await
    }
}
