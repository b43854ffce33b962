//! End-to-end batch validation tests
//!
//! These tests drive the orchestrator over whole workbooks and check the
//! accept/reject partition, ordering, and the fatal paths.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use onboard_lookup::{
    Country, GeoDirectory, InMemoryLookup, LookupError, LookupProvider, Subdivision,
};
use onboard_model::{
    AddressRow, ContactRow, DocumentRow, ErrorKind, GeneralDetailsRow, ParsedDataset,
    ServiceableAreaRow, SheetName,
};
use onboard_pipeline::{Error, ValidationConfig, Validator};
use tokio_util::sync::CancellationToken;

fn geo() -> GeoDirectory {
    GeoDirectory::new()
        .with_country(
            Country::new("IN", "India")
                .with_subdivision(Subdivision::new("IN-MH", "Maharashtra"))
                .with_subdivision(Subdivision::new("IN-KA", "Karnataka")),
        )
        .with_country(
            Country::new("US", "United States")
                .with_subdivision(Subdivision::new("US-CA", "California")),
        )
}

fn lookup() -> Arc<InMemoryLookup> {
    Arc::new(InMemoryLookup::new(geo()))
}

/// Append one complete, valid transporter to `dataset`.
fn add_transporter(dataset: &mut ParsedDataset, key: &str) {
    let row = dataset.general_details.len() + 2;
    dataset.general_details.push(GeneralDetailsRow {
        source_row: row,
        transporter_key: key.to_string(),
        business_name: format!("{key} Freight"),
        transport_mode_road: "Y".to_string(),
        transport_mode_rail: "N".to_string(),
        transport_mode_air: "Y".to_string(),
        transport_mode_sea: "N".to_string(),
        from_date: "2024-01-01".to_string(),
        to_date: String::new(),
    });
    dataset.addresses.push(AddressRow {
        source_row: dataset.addresses.len() + 2,
        transporter_key: key.to_string(),
        address_type: "Head Office".to_string(),
        street1: "12 Harbour Road".to_string(),
        street2: String::new(),
        city: "Mumbai".to_string(),
        state: "MH".to_string(),
        country: "IN".to_string(),
        postal_code: "400001".to_string(),
        is_primary: "Y".to_string(),
    });
    dataset.contacts.push(ContactRow {
        source_row: dataset.contacts.len() + 2,
        transporter_key: key.to_string(),
        address_type: "Head Office".to_string(),
        contact_person_name: "Priya Nair".to_string(),
        phone_number: "+912212345678".to_string(),
        email_id: format!("ops@{}.example", key.to_lowercase()),
        alt_email_id: String::new(),
    });
    dataset.serviceable_areas.push(ServiceableAreaRow {
        source_row: dataset.serviceable_areas.len() + 2,
        transporter_key: key.to_string(),
        service_country: "IN".to_string(),
        service_states: "All".to_string(),
    });
    dataset.documents.push(DocumentRow {
        source_row: dataset.documents.len() + 2,
        transporter_key: key.to_string(),
        document_type: "PAN".to_string(),
        document_name: "PAN Card".to_string(),
        document_number: "ABCDE1234F".to_string(),
        issue_date: "2020-06-15".to_string(),
        expiry_date: String::new(),
        issuing_country: "IN".to_string(),
    });
}

fn dataset(keys: &[&str]) -> ParsedDataset {
    let mut dataset = ParsedDataset::new();
    for key in keys {
        add_transporter(&mut dataset, key);
    }
    dataset
}

#[tokio::test]
async fn test_clean_batch_is_fully_accepted() {
    let dataset = dataset(&["TR-1", "TR-2", "TR-3"]);
    let result = Validator::new(lookup()).validate(&dataset).await.unwrap();

    assert!(result.is_clean());
    assert_eq!(result.summary.accepted_count, 3);
    assert!(result.summary.error_count_by_kind.values().all(|n| *n == 0));
    assert_eq!(result.summary.error_count_by_kind.len(), ErrorKind::ALL.len());
}

#[tokio::test]
async fn test_partition_is_total_and_ordered() {
    let keys: Vec<String> = (0..40).map(|i| format!("TR-{i:02}")).collect();
    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let mut dataset = dataset(&key_refs);
    for i in (0..40).step_by(3) {
        dataset.contacts[i].phone_number = "12345".to_string();
    }

    let config = ValidationConfig::default().with_max_concurrency(4);
    let result = Validator::with_config(lookup(), config)
        .unwrap()
        .validate(&dataset)
        .await
        .unwrap();

    assert_eq!(
        result.accepted.len() + result.rejected.len(),
        dataset.general_details.len()
    );
    assert_eq!(result.rejected.len(), 14);
    assert!(result.rejected.iter().all(|r| !r.errors.is_empty()));

    let accepted: Vec<&str> = result
        .accepted
        .iter()
        .map(|a| a.transporter_key.as_str())
        .collect();
    let mut sorted = accepted.clone();
    sorted.sort_unstable();
    assert_eq!(accepted, sorted);

    let rejected: Vec<&str> = result
        .rejected
        .iter()
        .map(|r| r.transporter_key.as_str())
        .collect();
    assert_eq!(&rejected[..3], &["TR-00", "TR-03", "TR-06"]);
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let mut dataset = dataset(&["TR-1", "TR-2", "TR-3", "TR-4"]);
    dataset.addresses[1].state = "Atlantis".to_string();
    dataset.contacts[2].email_id = "nope".to_string();
    dataset.documents.push(DocumentRow {
        source_row: 99,
        transporter_key: "TR-404".to_string(),
        ..Default::default()
    });

    let validator = Validator::new(lookup());
    let first = validator.validate(&dataset).await.unwrap();
    let second = validator.validate(&dataset).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_orphaned_rows_are_reported_once_each() {
    let mut dataset = dataset(&["TR-1"]);
    dataset.addresses.push(AddressRow {
        source_row: 7,
        transporter_key: "GHOST".to_string(),
        ..Default::default()
    });
    dataset.contacts.push(ContactRow {
        source_row: 8,
        transporter_key: "GHOST".to_string(),
        ..Default::default()
    });

    let result = Validator::new(lookup()).validate(&dataset).await.unwrap();

    assert_eq!(result.accepted.len(), 1);
    assert_eq!(result.summary.orphaned_error_count, 2);
    let located: Vec<_> = result
        .orphaned
        .iter()
        .map(|e| (e.kind, e.sheet, e.source_row))
        .collect();
    assert_eq!(
        located,
        vec![
            (ErrorKind::RelationalIntegrity, SheetName::Addresses, Some(7)),
            (ErrorKind::RelationalIntegrity, SheetName::Contacts, Some(8)),
        ]
    );
}

#[tokio::test]
async fn test_primary_address_cardinality() {
    let mut dataset = dataset(&["NONE", "MANY"]);
    dataset.addresses[0].is_primary = "N".to_string();
    dataset.addresses.push(AddressRow {
        source_row: 10,
        address_type: "Depot".to_string(),
        ..dataset.addresses[1].clone()
    });

    let result = Validator::new(lookup()).validate(&dataset).await.unwrap();
    assert_eq!(result.rejected.len(), 2);

    let none = &result.rejection("NONE").unwrap().errors;
    let many = &result.rejection("MANY").unwrap().errors;
    assert_eq!(none.len(), 1);
    assert_eq!(many.len(), 1);
    assert_eq!(none[0].kind, ErrorKind::BusinessRule);
    assert_eq!(many[0].kind, ErrorKind::BusinessRule);
    assert!(none[0].message.contains("must be primary"));
    assert!(
        many[0]
            .message
            .to_lowercase()
            .contains("only one can be primary")
    );
    assert_eq!(result.error_count(ErrorKind::BusinessRule), 2);
}

#[tokio::test]
async fn test_transporter_without_addresses() {
    let mut dataset = dataset(&["BARE", "TR-2"]);
    dataset.addresses.retain(|address| address.transporter_key != "BARE");

    let result = Validator::new(lookup()).validate(&dataset).await.unwrap();
    assert!(result.rejection("TR-2").is_none());

    let errors = &result.rejection("BARE").unwrap().errors;
    let kinds: Vec<(ErrorKind, SheetName)> = errors.iter().map(|e| (e.kind, e.sheet)).collect();
    assert_eq!(
        kinds,
        vec![
            (ErrorKind::RequiredField, SheetName::Addresses),
            (ErrorKind::BusinessRule, SheetName::Addresses),
            (ErrorKind::RelationalIntegrity, SheetName::Contacts),
        ]
    );
    assert!(errors[1].message.contains("must be primary"));
}

#[tokio::test]
async fn test_no_transport_mode() {
    let mut dataset = dataset(&["TR-1"]);
    dataset.general_details[0].transport_mode_road = "N".to_string();
    dataset.general_details[0].transport_mode_air = "N".to_string();

    let result = Validator::new(lookup()).validate(&dataset).await.unwrap();
    let errors = &result.rejection("TR-1").unwrap().errors;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::BusinessRule);
    assert!(errors[0].message.contains("at least one transport mode"));
}

#[tokio::test]
async fn test_unknown_state() {
    let mut dataset = dataset(&["TR-1"]);
    dataset.addresses[0].country = "US".to_string();
    dataset.addresses[0].state = "Timbuktu".to_string();

    let result = Validator::new(lookup()).validate(&dataset).await.unwrap();
    let errors = &result.rejection("TR-1").unwrap().errors;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::MasterDataMismatch);
    assert_eq!(errors[0].field.as_deref(), Some("State"));
}

#[tokio::test]
async fn test_phone_number_format() {
    let mut dataset = dataset(&["BAD", "GOOD"]);
    dataset.contacts[0].phone_number = "9876543210".to_string();
    dataset.contacts[1].phone_number = "+919876543210".to_string();

    let result = Validator::new(lookup()).validate(&dataset).await.unwrap();
    let errors = &result.rejection("BAD").unwrap().errors;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::InvalidFormat);
    assert_eq!(errors[0].field.as_deref(), Some("Phone_Number"));
    assert!(result.rejection("GOOD").is_none());
}

#[tokio::test]
async fn test_two_primary_addresses() {
    let mut dataset = dataset(&["TR-1"]);
    dataset.addresses.push(AddressRow {
        source_row: 3,
        address_type: "Warehouse".to_string(),
        ..dataset.addresses[0].clone()
    });

    let result = Validator::new(lookup()).validate(&dataset).await.unwrap();
    let errors = &result.rejection("TR-1").unwrap().errors;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::BusinessRule);
}

#[tokio::test]
async fn test_existing_business_name() {
    let mut dataset = dataset(&["TR-1"]);
    dataset.general_details[0].business_name = "Acme Logistics".to_string();
    let lookup = Arc::new(InMemoryLookup::new(geo()).with_business_name("Acme Logistics"));

    let result = Validator::new(lookup).validate(&dataset).await.unwrap();
    let errors = &result.rejection("TR-1").unwrap().errors;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::DuplicateData);
    assert_eq!(errors[0].sheet, SheetName::GeneralDetails);
    assert_eq!(errors[0].source_row, Some(2));
}

#[tokio::test]
async fn test_repeated_transporter_key_rejects_the_repeat() {
    let mut dataset = dataset(&["TR-1"]);
    dataset.general_details.push(GeneralDetailsRow {
        source_row: 3,
        ..dataset.general_details[0].clone()
    });

    let result = Validator::new(lookup()).validate(&dataset).await.unwrap();
    assert_eq!(result.accepted.len(), 1);
    assert_eq!(result.rejected.len(), 1);
    let errors = &result.rejected[0].errors;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::DuplicateData);
    assert_eq!(errors[0].source_row, Some(3));
}

#[tokio::test]
async fn test_errors_are_merged_field_business_relational() {
    let mut dataset = dataset(&["TR-1"]);
    dataset.contacts[0].email_id = "broken".to_string();
    dataset.contacts[0].address_type = "Warehouse".to_string();
    dataset.addresses[0].is_primary = "N".to_string();

    let result = Validator::new(lookup()).validate(&dataset).await.unwrap();
    let kinds: Vec<ErrorKind> = result
        .rejection("TR-1")
        .unwrap()
        .errors
        .iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ErrorKind::InvalidFormat,
            ErrorKind::BusinessRule,
            ErrorKind::RelationalIntegrity,
        ]
    );
}

/// Lookup provider whose store is unreachable.
struct UnreachableStore {
    geo: GeoDirectory,
}

#[async_trait]
impl LookupProvider for UnreachableStore {
    async fn country_exists(&self, iso_code: &str) -> onboard_lookup::Result<bool> {
        Ok(self.geo.country_exists(iso_code))
    }

    async fn state_exists(&self, country: &str, state: &str) -> onboard_lookup::Result<bool> {
        Ok(self.geo.state_exists(country, state))
    }

    async fn business_name_exists(&self, _name: &str) -> onboard_lookup::Result<bool> {
        Err(LookupError::unavailable("connection refused"))
    }

    async fn contact_email_exists(&self, _email: &str) -> onboard_lookup::Result<bool> {
        Err(LookupError::unavailable("connection refused"))
    }
}

#[tokio::test]
async fn test_unreachable_store_fails_the_whole_batch() {
    let dataset = dataset(&["TR-1", "TR-2", "TR-3"]);
    let lookup: Arc<dyn LookupProvider> = Arc::new(UnreachableStore { geo: geo() });

    let err = Validator::new(lookup).validate(&dataset).await.unwrap_err();
    assert!(matches!(
        err,
        Error::LookupUnavailable(LookupError::Unavailable { .. })
    ));
}

/// Lookup provider that answers slowly and records its peak concurrency.
#[derive(Default)]
struct SlowLookup {
    delay: Duration,
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
    cancel: Option<CancellationToken>,
}

impl SlowLookup {
    async fn answer(&self) -> onboard_lookup::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(false)
    }
}

#[async_trait]
impl LookupProvider for SlowLookup {
    async fn country_exists(&self, _iso_code: &str) -> onboard_lookup::Result<bool> {
        self.answer().await.map(|_| true)
    }

    async fn state_exists(&self, _country: &str, _state: &str) -> onboard_lookup::Result<bool> {
        self.answer().await.map(|_| true)
    }

    async fn business_name_exists(&self, _name: &str) -> onboard_lookup::Result<bool> {
        self.answer().await
    }

    async fn contact_email_exists(&self, _email: &str) -> onboard_lookup::Result<bool> {
        self.answer().await
    }
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let dataset = dataset(&["A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8"]);
    let lookup = Arc::new(SlowLookup {
        delay: Duration::from_millis(5),
        ..Default::default()
    });
    let config = ValidationConfig::default().with_max_concurrency(2);

    let result = Validator::with_config(Arc::clone(&lookup), config)
        .unwrap()
        .validate(&dataset)
        .await
        .unwrap();

    assert_eq!(result.accepted.len(), 8);
    assert!(lookup.peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_slow_lookup_times_out() {
    let dataset = dataset(&["TR-1"]);
    let lookup = Arc::new(SlowLookup {
        delay: Duration::from_millis(500),
        ..Default::default()
    });
    let config = ValidationConfig::default().with_lookup_timeout(Duration::from_millis(20));

    let err = Validator::with_config(lookup, config)
        .unwrap()
        .validate(&dataset)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::LookupUnavailable(_)));
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_cancel_before_start() {
    let dataset = dataset(&["TR-1", "TR-2"]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = Validator::new(lookup())
        .validate_with_cancel(&dataset, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn test_cancel_mid_batch_stops_launching() {
    let dataset = dataset(&["TR-1", "TR-2", "TR-3", "TR-4"]);
    let cancel = CancellationToken::new();
    let lookup = Arc::new(SlowLookup {
        delay: Duration::from_millis(10),
        cancel: Some(cancel.clone()),
        ..Default::default()
    });
    let config = ValidationConfig::default().with_max_concurrency(1);

    let err = Validator::with_config(Arc::clone(&lookup), config)
        .unwrap()
        .validate_with_cancel(&dataset, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));

    // Only the first transporter ran: two geography checks per address row,
    // one per serviceable country, then name and email.
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 5);
}
