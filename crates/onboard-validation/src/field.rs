//! Field validator: per-row checks for each sheet.
//!
//! Every function returns one [`ValidationError`] per violation and nothing
//! for clean cells. Rows are never compared with each other here, with one
//! exception: repeated serviceable countries within a transporter.

use std::collections::HashSet;

use onboard_lookup::LookupProvider;
use onboard_model::{
    AddressRow, ContactRow, DocumentRow, ErrorKind, GeneralDetailsRow, ServiceableAreaRow,
    SheetRow, TransporterRecordGroup, ValidationError, columns, present,
};

use crate::Result;
use crate::rules::{
    RuleResult, is_truthy, parse_iso_date, validate_date_order, validate_email,
    validate_iso_date, validate_min_length, validate_phone,
};

const MIN_BUSINESS_NAME_LENGTH: usize = 2;

/// Push a finding when `rule` failed.
fn check<R: SheetRow>(
    errors: &mut Vec<ValidationError>,
    row: &R,
    kind: ErrorKind,
    field: &str,
    rule: RuleResult,
) {
    if let Some(message) = rule.into_failure() {
        errors.push(ValidationError::at(kind, row, Some(field), message));
    }
}

/// Return the trimmed value, recording a `RequiredField` finding when blank.
fn required<'a, R: SheetRow>(
    errors: &mut Vec<ValidationError>,
    row: &R,
    field: &str,
    value: &'a str,
) -> Option<&'a str> {
    let value = present(value);
    if value.is_none() {
        errors.push(ValidationError::required(row, field));
    }
    value
}

/// Validate one general details row.
#[must_use]
pub fn validate_general_details(row: &GeneralDetailsRow) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    required(&mut errors, row, columns::TRANSPORTER_KEY, &row.transporter_key);

    if let Some(name) = required(&mut errors, row, columns::BUSINESS_NAME, &row.business_name) {
        check(
            &mut errors,
            row,
            ErrorKind::InvalidFormat,
            columns::BUSINESS_NAME,
            validate_min_length(name, MIN_BUSINESS_NAME_LENGTH, columns::BUSINESS_NAME),
        );
    }

    if !row
        .transport_modes()
        .iter()
        .any(|(_, flag)| is_truthy(flag))
    {
        errors.push(ValidationError::at(
            ErrorKind::BusinessRule,
            row,
            None,
            "Transporter must operate at least one transport mode (Road, Rail, Air or Sea set to Y)",
        ));
    }

    let from_date = required(&mut errors, row, columns::FROM_DATE, &row.from_date).and_then(|v| {
        let parsed = parse_iso_date(v);
        if parsed.is_none() {
            check(
                &mut errors,
                row,
                ErrorKind::InvalidFormat,
                columns::FROM_DATE,
                validate_iso_date(v, columns::FROM_DATE),
            );
        }
        parsed
    });

    if let Some(to_value) = present(&row.to_date) {
        match parse_iso_date(to_value) {
            Some(to_date) => {
                if let Some(from_date) = from_date {
                    check(
                        &mut errors,
                        row,
                        ErrorKind::BusinessRule,
                        columns::TO_DATE,
                        validate_date_order(from_date, to_date, columns::FROM_DATE, columns::TO_DATE),
                    );
                }
            }
            None => check(
                &mut errors,
                row,
                ErrorKind::InvalidFormat,
                columns::TO_DATE,
                validate_iso_date(to_value, columns::TO_DATE),
            ),
        }
    }

    errors
}

/// Validate one contact row.
#[must_use]
pub fn validate_contact(row: &ContactRow) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    required(
        &mut errors,
        row,
        columns::CONTACT_PERSON_NAME,
        &row.contact_person_name,
    );

    if let Some(phone) = required(&mut errors, row, columns::PHONE_NUMBER, &row.phone_number) {
        check(
            &mut errors,
            row,
            ErrorKind::InvalidFormat,
            columns::PHONE_NUMBER,
            validate_phone(phone, columns::PHONE_NUMBER),
        );
    }

    if let Some(email) = required(&mut errors, row, columns::EMAIL_ID, &row.email_id) {
        check(
            &mut errors,
            row,
            ErrorKind::InvalidFormat,
            columns::EMAIL_ID,
            validate_email(email, columns::EMAIL_ID),
        );
    }

    if let Some(alt_email) = present(&row.alt_email_id) {
        check(
            &mut errors,
            row,
            ErrorKind::InvalidFormat,
            columns::ALT_EMAIL_ID,
            validate_email(alt_email, columns::ALT_EMAIL_ID),
        );
    }

    errors
}

/// Validate one document row.
#[must_use]
pub fn validate_document(row: &DocumentRow) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    required(&mut errors, row, columns::DOCUMENT_TYPE, &row.document_type);
    required(&mut errors, row, columns::DOCUMENT_NAME, &row.document_name);
    required(&mut errors, row, columns::DOCUMENT_NUMBER, &row.document_number);

    if let Some(issue_date) = required(&mut errors, row, columns::ISSUE_DATE, &row.issue_date) {
        check(
            &mut errors,
            row,
            ErrorKind::InvalidFormat,
            columns::ISSUE_DATE,
            validate_iso_date(issue_date, columns::ISSUE_DATE),
        );
    }

    required(&mut errors, row, columns::ISSUING_COUNTRY, &row.issuing_country);

    if let Some(expiry_date) = present(&row.expiry_date) {
        check(
            &mut errors,
            row,
            ErrorKind::InvalidFormat,
            columns::EXPIRY_DATE,
            validate_iso_date(expiry_date, columns::EXPIRY_DATE),
        );
    }

    errors
}

/// Field checks that consult geographic master data.
pub struct FieldValidator<'a, L: ?Sized> {
    lookup: &'a L,
}

impl<'a, L: LookupProvider + ?Sized> FieldValidator<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Validate one address row.
    ///
    /// The state is only looked up once the country is known, so an unknown
    /// country yields a single master-data finding.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup provider fails.
    pub async fn validate_address(&self, row: &AddressRow) -> Result<Vec<ValidationError>> {
        let mut errors = Vec::new();

        required(&mut errors, row, columns::ADDRESS_TYPE, &row.address_type);
        required(&mut errors, row, columns::STREET_1, &row.street1);
        required(&mut errors, row, columns::CITY, &row.city);
        let state = required(&mut errors, row, columns::STATE, &row.state);
        let country = required(&mut errors, row, columns::COUNTRY, &row.country);
        required(&mut errors, row, columns::POSTAL_CODE, &row.postal_code);

        if let Some(country) = country {
            if !self.lookup.country_exists(country).await? {
                errors.push(ValidationError::at(
                    ErrorKind::MasterDataMismatch,
                    row,
                    Some(columns::COUNTRY),
                    format!("Country '{country}' is not a known ISO country code"),
                ));
            } else if let Some(state) = state {
                if !self.lookup.state_exists(country, state).await? {
                    errors.push(ValidationError::at(
                        ErrorKind::MasterDataMismatch,
                        row,
                        Some(columns::STATE),
                        format!("State '{state}' is not a known state of country '{country}'"),
                    ));
                }
            }
        }

        Ok(errors)
    }

    /// Validate one transporter's serviceable area rows, in sheet order.
    ///
    /// The first row naming a country wins; every later row repeating it is
    /// flagged once.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup provider fails.
    pub async fn validate_serviceable_areas(
        &self,
        rows: &[ServiceableAreaRow],
    ) -> Result<Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for row in rows {
            if let Some(country) =
                required(&mut errors, row, columns::SERVICE_COUNTRY, &row.service_country)
            {
                if !self.lookup.country_exists(country).await? {
                    errors.push(ValidationError::at(
                        ErrorKind::MasterDataMismatch,
                        row,
                        Some(columns::SERVICE_COUNTRY),
                        format!("Service_Country '{country}' is not a known ISO country code"),
                    ));
                }
                if !seen.insert(country.to_ascii_uppercase()) {
                    errors.push(ValidationError::at(
                        ErrorKind::DuplicateData,
                        row,
                        Some(columns::SERVICE_COUNTRY),
                        format!("Service_Country '{country}' is listed more than once"),
                    ));
                }
            }
            required(&mut errors, row, columns::SERVICE_STATES, &row.service_states);
        }

        Ok(errors)
    }

    /// Run every field check over a record group, sheet by sheet.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup provider fails.
    pub async fn validate_group(&self, group: &TransporterRecordGroup) -> Result<Vec<ValidationError>> {
        let mut errors = validate_general_details(&group.general);

        for address in &group.addresses {
            errors.extend(self.validate_address(address).await?);
        }
        for contact in &group.contacts {
            errors.extend(validate_contact(contact));
        }
        errors.extend(
            self.validate_serviceable_areas(&group.serviceable_areas)
                .await?,
        );
        for document in &group.documents {
            errors.extend(validate_document(document));
        }

        Ok(errors)
    }
}
