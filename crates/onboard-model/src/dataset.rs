//! Parsed workbook and per-transporter record groups.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::rows::{
    AddressRow, ContactRow, DocumentRow, GeneralDetailsRow, ServiceableAreaRow, SheetRow,
};
use crate::{Error, Result};

/// Rows of all five sheets as produced by the spreadsheet parser.
///
/// The dataset is read-only for the whole validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedDataset {
    pub general_details: Vec<GeneralDetailsRow>,
    pub addresses: Vec<AddressRow>,
    pub contacts: Vec<ContactRow>,
    pub serviceable_areas: Vec<ServiceableAreaRow>,
    pub documents: Vec<DocumentRow>,
}

impl ParsedDataset {
    /// Create an empty dataset
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dataset from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON does not describe a dataset.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse("dataset json", e.to_string()))
    }

    /// Load a dataset from a JSON reader.
    ///
    /// # Errors
    ///
    /// Returns an error when the input cannot be read or is not a dataset.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| Error::parse("dataset json", e.to_string()))
    }

    /// Number of transporters (general details rows) in the batch.
    #[must_use]
    pub fn transporter_count(&self) -> usize {
        self.general_details.len()
    }

    /// Total rows across every sheet.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.general_details.len()
            + self.addresses.len()
            + self.contacts.len()
            + self.serviceable_areas.len()
            + self.documents.len()
    }

    /// Build the record group of one general details row.
    ///
    /// Child rows are matched on their trimmed transporter key; rows with a
    /// blank key never join a group.
    #[must_use]
    pub fn group_for(&self, general: &GeneralDetailsRow) -> TransporterRecordGroup {
        let key = general.key();
        TransporterRecordGroup {
            general: general.clone(),
            addresses: rows_for(&self.addresses, key),
            contacts: rows_for(&self.contacts, key),
            serviceable_areas: rows_for(&self.serviceable_areas, key),
            documents: rows_for(&self.documents, key),
        }
    }
}

fn rows_for<R: SheetRow + Clone>(rows: &[R], key: Option<&str>) -> Vec<R> {
    let Some(key) = key else {
        return Vec::new();
    };
    rows.iter()
        .filter(|row| row.key() == Some(key))
        .cloned()
        .collect()
}

/// One transporter's general details row with all child rows sharing its key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransporterRecordGroup {
    pub general: GeneralDetailsRow,
    pub addresses: Vec<AddressRow>,
    pub contacts: Vec<ContactRow>,
    pub serviceable_areas: Vec<ServiceableAreaRow>,
    pub documents: Vec<DocumentRow>,
}

impl TransporterRecordGroup {
    /// Trimmed transporter key of the group (empty when the key cell is blank).
    #[must_use]
    pub fn transporter_key(&self) -> &str {
        self.general.key().unwrap_or_default()
    }
}
