//! Relational validator: cross-sheet key and address-type integrity.
//!
//! Runs once over the whole dataset, because orphaned child rows belong to no
//! transporter group and would be invisible to per-group checks.

use std::collections::{BTreeMap, HashMap, HashSet};

use onboard_model::{
    ErrorKind, ParsedDataset, SheetName, SheetRow, ValidationError, columns, present,
};

/// Findings of the relational pass, split by owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationalReport {
    by_transporter: BTreeMap<String, Vec<ValidationError>>,
    orphaned: Vec<ValidationError>,
}

impl RelationalReport {
    /// Findings attributed to one transporter key (trimmed).
    #[must_use]
    pub fn for_transporter(&self, transporter_key: &str) -> &[ValidationError] {
        self.by_transporter
            .get(transporter_key.trim())
            .map_or(&[], Vec::as_slice)
    }

    /// Findings on child rows whose key matches no general details row,
    /// ordered by sheet then row.
    #[must_use]
    pub fn orphaned(&self) -> &[ValidationError] {
        &self.orphaned
    }

    #[must_use]
    pub fn into_orphaned(self) -> Vec<ValidationError> {
        self.orphaned
    }

    /// Total number of findings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orphaned.len() + self.by_transporter.values().map(Vec::len).sum::<usize>()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn attribute(&mut self, transporter_key: &str, error: ValidationError) {
        self.by_transporter
            .entry(transporter_key.to_string())
            .or_default()
            .push(error);
    }
}

/// Checks that hold across sheets.
///
/// Keys are compared after trimming. Rows with a blank key are left to the
/// field validator and never reported here.
#[derive(Debug, Default, Clone, Copy)]
pub struct RelationalValidator;

impl RelationalValidator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run the relational pass over a dataset.
    #[must_use]
    pub fn validate(&self, dataset: &ParsedDataset) -> RelationalReport {
        let mut report = RelationalReport::default();

        let known: HashSet<&str> = dataset
            .general_details
            .iter()
            .filter_map(|row| row.key())
            .collect();

        orphan_rows(&mut report, &known, &dataset.addresses);
        orphan_rows(&mut report, &known, &dataset.contacts);
        orphan_rows(&mut report, &known, &dataset.serviceable_areas);
        orphan_rows(&mut report, &known, &dataset.documents);

        let mut address_types: HashMap<&str, HashSet<String>> = HashMap::new();
        for address in &dataset.addresses {
            let Some(key) = address.key() else { continue };
            let types = address_types.entry(key).or_default();
            if let Some(address_type) = present(&address.address_type) {
                types.insert(address_type.to_lowercase());
            }
        }

        for contact in &dataset.contacts {
            let Some(key) = contact.key() else { continue };
            if !known.contains(key) {
                continue;
            }
            let wanted = present(&contact.address_type);
            let message = match address_types.get(key) {
                None => format!(
                    "Contact references address type '{}' but transporter '{key}' has no addresses",
                    wanted.unwrap_or_default()
                ),
                Some(types) => match wanted {
                    Some(wanted) if types.contains(&wanted.to_lowercase()) => continue,
                    Some(wanted) => format!(
                        "Contact references address type '{wanted}' which is not defined for transporter '{key}'"
                    ),
                    None => format!(
                        "Contact has no address type to match an address of transporter '{key}'"
                    ),
                },
            };
            report.attribute(
                key,
                ValidationError::at(
                    ErrorKind::RelationalIntegrity,
                    contact,
                    Some(columns::ADDRESS_TYPE),
                    message,
                ),
            );
        }

        report
            .orphaned
            .sort_by_key(|error| (error.sheet, error.source_row));

        tracing::debug!(
            attributed = report.len() - report.orphaned.len(),
            orphaned = report.orphaned.len(),
            "relational pass complete"
        );
        report
    }
}

fn orphan_rows<R: SheetRow>(report: &mut RelationalReport, known: &HashSet<&str>, rows: &[R]) {
    for row in rows {
        let Some(key) = row.key() else { continue };
        if !known.contains(key) {
            report.orphaned.push(ValidationError::at(
                ErrorKind::RelationalIntegrity,
                row,
                Some(columns::TRANSPORTER_KEY),
                format!(
                    "Transporter_Key '{key}' does not match any row in {}",
                    SheetName::GeneralDetails
                ),
            ));
        }
    }
}
