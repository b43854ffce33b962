//! Row types, one per sheet.
//!
//! Values are kept exactly as the spreadsheet parser produced them; nothing
//! here trims or normalizes. Use [`present`] before testing a cell for
//! emptiness.

use serde::{Deserialize, Serialize};

use crate::sheet::SheetName;

/// Returns the trimmed cell value, or `None` when the cell is blank.
#[must_use]
pub fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Common accessors shared by every sheet row.
pub trait SheetRow {
    /// Sheet the row was read from.
    const SHEET: SheetName;

    /// 1-based position of the row in its sheet.
    fn source_row(&self) -> usize;

    /// Raw transporter key cell.
    fn transporter_key(&self) -> &str;

    /// Trimmed transporter key, `None` when blank.
    fn key(&self) -> Option<&str> {
        present(self.transporter_key())
    }
}

macro_rules! sheet_row {
    ($ty:ty, $sheet:expr) => {
        impl SheetRow for $ty {
            const SHEET: SheetName = $sheet;

            fn source_row(&self) -> usize {
                self.source_row
            }

            fn transporter_key(&self) -> &str {
                &self.transporter_key
            }
        }
    };
}

/// A row of the general details sheet; one per transporter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralDetailsRow {
    pub source_row: usize,
    pub transporter_key: String,
    pub business_name: String,
    pub transport_mode_road: String,
    pub transport_mode_rail: String,
    pub transport_mode_air: String,
    pub transport_mode_sea: String,
    pub from_date: String,
    pub to_date: String,
}

impl GeneralDetailsRow {
    /// Transport mode flags paired with their column headers.
    #[must_use]
    pub fn transport_modes(&self) -> [(&'static str, &str); 4] {
        use crate::sheet::columns;
        [
            (columns::TRANSPORT_MODE_ROAD, self.transport_mode_road.as_str()),
            (columns::TRANSPORT_MODE_RAIL, self.transport_mode_rail.as_str()),
            (columns::TRANSPORT_MODE_AIR, self.transport_mode_air.as_str()),
            (columns::TRANSPORT_MODE_SEA, self.transport_mode_sea.as_str()),
        ]
    }
}

/// A row of the addresses sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressRow {
    pub source_row: usize,
    pub transporter_key: String,
    pub address_type: String,
    pub street1: String,
    pub street2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub is_primary: String,
}

/// A row of the contacts sheet.
///
/// `address_type` links the contact to one of the transporter's addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRow {
    pub source_row: usize,
    pub transporter_key: String,
    pub address_type: String,
    pub contact_person_name: String,
    pub phone_number: String,
    pub email_id: String,
    pub alt_email_id: String,
}

/// A row of the serviceable areas sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceableAreaRow {
    pub source_row: usize,
    pub transporter_key: String,
    pub service_country: String,
    pub service_states: String,
}

/// A row of the documents sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentRow {
    pub source_row: usize,
    pub transporter_key: String,
    pub document_type: String,
    pub document_name: String,
    pub document_number: String,
    pub issue_date: String,
    pub expiry_date: String,
    pub issuing_country: String,
}

sheet_row!(GeneralDetailsRow, SheetName::GeneralDetails);
sheet_row!(AddressRow, SheetName::Addresses);
sheet_row!(ContactRow, SheetName::Contacts);
sheet_row!(ServiceableAreaRow, SheetName::ServiceableAreas);
sheet_row!(DocumentRow, SheetName::Documents);
