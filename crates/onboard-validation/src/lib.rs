#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # onboard-validation
//!
//! Validators for transporter onboarding workbooks.
//!
//! Three validators cover different scopes:
//!
//! - [`field`]: one row at a time, including geographic master data
//! - [`relational`]: the whole dataset, for orphaned rows and contact
//!   address types
//! - [`business`]: one transporter's record group, for cardinality and
//!   persisted-data uniqueness
//!
//! Rule violations are returned as [`ValidationError`] values. Only a failing
//! [`LookupProvider`] produces an [`Error`].
//!
//! ## Example Usage
//!
//! ```rust
//! use onboard_lookup::{Country, GeoDirectory, InMemoryLookup};
//! use onboard_model::{ErrorKind, GeneralDetailsRow, TransporterRecordGroup};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let lookup = InMemoryLookup::new(GeoDirectory::new().with_country(Country::new("IN", "India")));
//! let group = TransporterRecordGroup {
//!     general: GeneralDetailsRow {
//!         source_row: 2,
//!         transporter_key: "TR-1".to_string(),
//!         business_name: "Acme Logistics".to_string(),
//!         from_date: "2024-01-01".to_string(),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let errors = onboard_validation::validate_transporter(&lookup, &group).await.unwrap();
//! assert!(errors.iter().any(|e| e.kind == ErrorKind::BusinessRule));
//! # });
//! ```

pub mod business;
pub mod field;
pub mod relational;
pub mod rules;

pub use business::{BusinessRuleValidator, repeated_transporter_keys};
pub use field::{FieldValidator, validate_contact, validate_document, validate_general_details};
pub use relational::{RelationalReport, RelationalValidator};
pub use rules::{
    RuleResult, is_truthy, parse_iso_date, validate_date_order, validate_email,
    validate_iso_date, validate_min_length, validate_phone,
};

use onboard_lookup::{LookupError, LookupProvider};
use onboard_model::{TransporterRecordGroup, ValidationError};
use thiserror::Error;

/// Errors that abort validation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Run field and business rules over one record group.
///
/// Relational findings need the whole dataset and are not included.
///
/// # Errors
///
/// Returns an error when the lookup provider fails.
pub async fn validate_transporter<L>(
    lookup: &L,
    group: &TransporterRecordGroup,
) -> Result<Vec<ValidationError>>
where
    L: LookupProvider + ?Sized,
{
    let mut errors = FieldValidator::new(lookup).validate_group(group).await?;
    errors.extend(BusinessRuleValidator::new(lookup).validate_group(group).await?);
    Ok(errors)
}
