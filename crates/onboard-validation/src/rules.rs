//! Validation rules
//!
//! Cell-level primitives shared by the sheet validators. Each rule looks at
//! one trimmed value and answers with a [`RuleResult`].

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// ISO calendar date as it appears in the workbook.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+[0-9]{10,15}$").unwrap_or_else(|e| unreachable!("phone pattern: {e}"))
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .unwrap_or_else(|e| unreachable!("email pattern: {e}"))
});

/// Validation rule result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    pub is_valid: bool,
    pub message: Option<String>,
}

impl RuleResult {
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }

    /// The failure message, if the rule failed.
    #[must_use]
    pub fn into_failure(self) -> Option<String> {
        if self.is_valid { None } else { self.message }
    }
}

/// `Y` or `YES`, ignoring case and surrounding whitespace.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("y") || value.eq_ignore_ascii_case("yes")
}

/// Parse a `YYYY-MM-DD` calendar date.
///
/// The shape is checked first: chrono alone would accept unpadded months
/// and days such as `2024-2-1`, and signed years such as `+202-01-01`.
#[must_use]
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits = [&bytes[0..4], &bytes[5..7], &bytes[8..10]];
    if !digits.iter().all(|part| part.iter().all(u8::is_ascii_digit)) {
        return None;
    }
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).ok()
}

/// Validate minimum length, counted in characters.
#[must_use]
pub fn validate_min_length(value: &str, min: usize, field: &str) -> RuleResult {
    let len = value.chars().count();
    if len < min {
        return RuleResult::invalid(format!(
            "{field} must be at least {min} characters long (got {len})"
        ));
    }
    RuleResult::valid()
}

/// Validate an ISO calendar date.
#[must_use]
pub fn validate_iso_date(value: &str, field: &str) -> RuleResult {
    if parse_iso_date(value).is_some() {
        RuleResult::valid()
    } else {
        RuleResult::invalid(format!(
            "{field} '{value}' is not a valid date (expected YYYY-MM-DD)"
        ))
    }
}

/// Validate that `to` falls strictly after `from`.
#[must_use]
pub fn validate_date_order(
    from: NaiveDate,
    to: NaiveDate,
    from_field: &str,
    to_field: &str,
) -> RuleResult {
    if to > from {
        RuleResult::valid()
    } else {
        RuleResult::invalid(format!(
            "{to_field} ({to}) must be after {from_field} ({from})"
        ))
    }
}

/// Validate an international phone number: `+` followed by 10 to 15 digits.
#[must_use]
pub fn validate_phone(value: &str, field: &str) -> RuleResult {
    if PHONE_PATTERN.is_match(value.trim()) {
        RuleResult::valid()
    } else {
        RuleResult::invalid(format!(
            "{field} '{value}' must start with '+' followed by 10 to 15 digits"
        ))
    }
}

/// Validate email syntax.
#[must_use]
pub fn validate_email(value: &str, field: &str) -> RuleResult {
    if EMAIL_PATTERN.is_match(value.trim()) {
        RuleResult::valid()
    } else {
        RuleResult::invalid(format!("{field} '{value}' is not a valid email address"))
    }
}
