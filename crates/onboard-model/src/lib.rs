#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # onboard-model
//!
//! Data model for transporter bulk onboarding.
//!
//! A workbook arrives as a [`ParsedDataset`] of five sheets. Validation
//! produces [`ValidationError`] findings and finally one [`ValidationResult`]
//! that classifies every transporter as accepted or rejected.

/// Parsed workbook and per-transporter record groups.
pub mod dataset;
/// Typed validation findings.
pub mod finding;
/// Accepted/rejected partition and batch summary.
pub mod outcome;
/// Row structs for each sheet.
pub mod rows;
/// Sheet names and column headers.
pub mod sheet;

pub use dataset::{ParsedDataset, TransporterRecordGroup};
pub use finding::{ErrorKind, ValidationError};
pub use outcome::{AcceptedTransporter, RejectedTransporter, Summary, ValidationResult};
pub use rows::{
    AddressRow, ContactRow, DocumentRow, GeneralDetailsRow, ServiceableAreaRow, SheetRow, present,
};
pub use sheet::{SheetName, columns};

use thiserror::Error;

/// Errors that can occur when loading model data
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a parse error with the input it came from.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, Error>;
