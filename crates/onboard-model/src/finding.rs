//! Typed validation findings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rows::SheetRow;
use crate::sheet::SheetName;

/// Classification of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A mandatory cell or sheet is empty
    RequiredField,
    /// A cell does not have the expected shape (date, phone, email)
    InvalidFormat,
    /// A rule spanning several cells or rows is violated
    BusinessRule,
    /// A row points at a transporter or address that does not exist
    RelationalIntegrity,
    /// A value is unknown to the geographic master data
    MasterDataMismatch,
    /// A value repeats within the batch or already exists in the store
    DuplicateData,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::RequiredField,
        ErrorKind::InvalidFormat,
        ErrorKind::BusinessRule,
        ErrorKind::RelationalIntegrity,
        ErrorKind::MasterDataMismatch,
        ErrorKind::DuplicateData,
    ];

    /// Stable report code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::RequiredField => "REQUIRED_FIELD",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::BusinessRule => "BUSINESS_RULE",
            Self::RelationalIntegrity => "RELATIONAL_INTEGRITY",
            Self::MasterDataMismatch => "MASTER_DATA_MISMATCH",
            Self::DuplicateData => "DUPLICATE_DATA",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single finding against one row (or one sheet, when `source_row` is `None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub sheet: SheetName,
    pub source_row: Option<usize>,
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    /// Create a finding with explicit location.
    pub fn new(
        kind: ErrorKind,
        sheet: SheetName,
        source_row: Option<usize>,
        field: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            sheet,
            source_row,
            field: field.map(str::to_string),
            message: message.into(),
        }
    }

    /// Create a finding located on `row`, optionally on one of its columns.
    pub fn at<R: SheetRow>(
        kind: ErrorKind,
        row: &R,
        field: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(kind, R::SHEET, Some(row.source_row()), field, message)
    }

    /// Mandatory cell `field` of `row` is blank.
    pub fn required<R: SheetRow>(row: &R, field: &str) -> Self {
        Self::at(
            ErrorKind::RequiredField,
            row,
            Some(field),
            format!("{field} is required"),
        )
    }

    /// Mandatory sheet has no rows for the transporter.
    pub fn missing_sheet(sheet: SheetName, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequiredField, sheet, None, None, message)
    }

    /// Human-readable location, e.g. `Contacts row 7, Phone_Number`.
    #[must_use]
    pub fn location(&self) -> String {
        let mut location = self.sheet.to_string();
        if let Some(row) = self.source_row {
            location.push_str(&format!(" row {row}"));
        }
        if let Some(field) = &self.field {
            location.push_str(&format!(", {field}"));
        }
        location
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location(), self.message)
    }
}
