#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # onboard-pipeline
//!
//! Batch orchestration for transporter onboarding.
//!
//! A [`Validator`] takes one [`ParsedDataset`](onboard_model::ParsedDataset),
//! runs every validator over it and classifies each transporter as accepted
//! or rejected. Transporters are validated concurrently, bounded by
//! [`ValidationConfig::max_concurrency`], and reported in sheet order.
//!
//! Data problems never fail a run. Only an unavailable lookup provider, a
//! timeout or cancellation does, and then no partial result is returned.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use onboard_lookup::{GeoDirectory, InMemoryLookup};
//! use onboard_model::ParsedDataset;
//! use onboard_pipeline::Validator;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let dataset = ParsedDataset::from_json_str(r#"{"general_details": []}"#).unwrap();
//! let validator = Validator::new(Arc::new(InMemoryLookup::new(GeoDirectory::new())));
//!
//! let result = validator.validate(&dataset).await.unwrap();
//! assert_eq!(result.summary.total_transporters, 0);
//! # });
//! ```

pub mod config;
pub mod orchestrator;
pub mod report;

pub use config::ValidationConfig;
pub use orchestrator::{Validator, validate};
pub use report::TextReport;

use onboard_lookup::LookupError;
use thiserror::Error;

/// Errors that abort a batch
#[derive(Error, Debug)]
pub enum Error {
    #[error("Lookup provider unavailable: {0}")]
    LookupUnavailable(#[from] LookupError),

    #[error("Validation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Worker error: {0}")]
    Worker(String),
}

impl From<onboard_validation::Error> for Error {
    fn from(err: onboard_validation::Error) -> Self {
        match err {
            onboard_validation::Error::Lookup(source) => Self::LookupUnavailable(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
