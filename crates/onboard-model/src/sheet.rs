//! Workbook sheets and their column headers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five logical sheets of an onboarding workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SheetName {
    GeneralDetails,
    Addresses,
    Contacts,
    ServiceableAreas,
    Documents,
}

impl SheetName {
    /// Tab title as it appears in the uploaded workbook.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::GeneralDetails => "General Details",
            Self::Addresses => "Addresses",
            Self::Contacts => "Contacts",
            Self::ServiceableAreas => "Serviceable Areas",
            Self::Documents => "Documents",
        }
    }
}

impl fmt::Display for SheetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Column headers used in error reports.
pub mod columns {
    pub const TRANSPORTER_KEY: &str = "Transporter_Key";

    pub const BUSINESS_NAME: &str = "Business_Name";
    pub const TRANSPORT_MODE_ROAD: &str = "Transport_Mode_Road";
    pub const TRANSPORT_MODE_RAIL: &str = "Transport_Mode_Rail";
    pub const TRANSPORT_MODE_AIR: &str = "Transport_Mode_Air";
    pub const TRANSPORT_MODE_SEA: &str = "Transport_Mode_Sea";
    pub const FROM_DATE: &str = "From_Date";
    pub const TO_DATE: &str = "To_Date";

    pub const ADDRESS_TYPE: &str = "Address_Type";
    pub const STREET_1: &str = "Street_1";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const COUNTRY: &str = "Country";
    pub const POSTAL_CODE: &str = "Postal_Code";
    pub const IS_PRIMARY: &str = "Is_Primary";

    pub const CONTACT_PERSON_NAME: &str = "Contact_Person_Name";
    pub const PHONE_NUMBER: &str = "Phone_Number";
    pub const EMAIL_ID: &str = "Email_Id";
    pub const ALT_EMAIL_ID: &str = "Alt_Email_Id";

    pub const SERVICE_COUNTRY: &str = "Service_Country";
    pub const SERVICE_STATES: &str = "Service_States";

    pub const DOCUMENT_TYPE: &str = "Document_Type";
    pub const DOCUMENT_NAME: &str = "Document_Name";
    pub const DOCUMENT_NUMBER: &str = "Document_Number";
    pub const ISSUE_DATE: &str = "Issue_Date";
    pub const EXPIRY_DATE: &str = "Expiry_Date";
    pub const ISSUING_COUNTRY: &str = "Issuing_Country";
}
