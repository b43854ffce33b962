//! Business rule validator: cardinality and uniqueness within one transporter.

use std::collections::{HashMap, HashSet};

use onboard_lookup::LookupProvider;
use onboard_model::{
    ErrorKind, GeneralDetailsRow, SheetName, SheetRow, TransporterRecordGroup, ValidationError,
    columns, present,
};

use crate::Result;
use crate::rules::is_truthy;

/// Rules over a whole record group, including reads of persisted data.
///
/// All rules are evaluated; none short-circuits another.
pub struct BusinessRuleValidator<'a, L: ?Sized> {
    lookup: &'a L,
}

impl<'a, L: LookupProvider + ?Sized> BusinessRuleValidator<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Validate one record group.
    ///
    /// # Errors
    ///
    /// Returns an error when a persisted-data lookup fails.
    pub async fn validate_group(
        &self,
        group: &TransporterRecordGroup,
    ) -> Result<Vec<ValidationError>> {
        let mut errors = Vec::new();

        if group.addresses.is_empty() {
            errors.push(ValidationError::missing_sheet(
                SheetName::Addresses,
                format!(
                    "Transporter '{}' must have at least one address",
                    group.transporter_key()
                ),
            ));
        }
        errors.extend(primary_address_error(group));

        if group.contacts.is_empty() {
            errors.push(ValidationError::missing_sheet(
                SheetName::Contacts,
                format!(
                    "Transporter '{}' must have at least one contact",
                    group.transporter_key()
                ),
            ));
        }

        if let Some(name) = present(&group.general.business_name) {
            if self.lookup.business_name_exists(name).await? {
                errors.push(ValidationError::at(
                    ErrorKind::DuplicateData,
                    &group.general,
                    Some(columns::BUSINESS_NAME),
                    format!("Business_Name '{name}' already exists"),
                ));
            }
        }

        // Only the first contact's email is checked against persisted data.
        if let Some(contact) = group.contacts.first() {
            if let Some(email) = present(&contact.email_id) {
                if self.lookup.contact_email_exists(email).await? {
                    errors.push(ValidationError::at(
                        ErrorKind::DuplicateData,
                        contact,
                        Some(columns::EMAIL_ID),
                        format!("Email_Id '{email}' already exists"),
                    ));
                }
            }
        }

        Ok(errors)
    }
}

fn primary_address_error(group: &TransporterRecordGroup) -> Option<ValidationError> {
    let primaries = group
        .addresses
        .iter()
        .filter(|address| is_truthy(&address.is_primary))
        .count();

    let message = match primaries {
        1 => return None,
        0 => format!(
            "One address must be primary, but none of the {} address(es) is marked primary",
            group.addresses.len()
        ),
        n => format!("Only one can be primary, but {n} addresses are marked primary"),
    };
    Some(ValidationError::new(
        ErrorKind::BusinessRule,
        SheetName::Addresses,
        None,
        Some(columns::IS_PRIMARY),
        message,
    ))
}

/// Findings for general details rows whose transporter key repeats an
/// earlier row, keyed by the repeating row's position in the sheet.
///
/// Keys are compared after trimming; blank keys are never reported.
#[must_use]
pub fn repeated_transporter_keys(rows: &[GeneralDetailsRow]) -> HashMap<usize, ValidationError> {
    let mut seen: HashSet<&str> = HashSet::new();
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let key = row.key()?;
            if seen.insert(key) {
                return None;
            }
            Some((
                index,
                ValidationError::at(
                    ErrorKind::DuplicateData,
                    row,
                    Some(columns::TRANSPORTER_KEY),
                    format!(
                        "Transporter_Key '{key}' appears more than once in {}",
                        SheetName::GeneralDetails
                    ),
                ),
            ))
        })
        .collect()
}
