//! Plain-text rendering of a batch result for operators.

use std::fmt::{self, Display, Formatter};

use onboard_model::{ErrorKind, ValidationResult};

/// Renders a [`ValidationResult`] as a human-readable report.
///
/// Rejected transporters are listed in sheet order with one line per finding.
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a> {
    result: &'a ValidationResult,
}

impl<'a> TextReport<'a> {
    #[must_use]
    pub fn new(result: &'a ValidationResult) -> Self {
        Self { result }
    }
}

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let summary = &self.result.summary;
        writeln!(
            f,
            "Transporters: {} total, {} accepted, {} rejected",
            summary.total_transporters, summary.accepted_count, summary.rejected_count
        )?;

        let total = self.result.total_errors();
        if total > 0 {
            writeln!(
                f,
                "Errors: {total} total, {} orphaned",
                summary.orphaned_error_count
            )?;
        }

        let counts: Vec<String> = ErrorKind::ALL
            .iter()
            .filter_map(|kind| {
                let count = summary.error_count_by_kind.get(kind).copied().unwrap_or(0);
                (count > 0).then(|| format!("{kind}={count}"))
            })
            .collect();
        if !counts.is_empty() {
            writeln!(f, "Errors by kind: {}", counts.join(", "))?;
        }

        for rejected in &self.result.rejected {
            writeln!(f)?;
            writeln!(
                f,
                "REJECTED {} ({} error(s))",
                display_key(&rejected.transporter_key),
                rejected.errors.len()
            )?;
            for error in &rejected.errors {
                writeln!(f, "  {error}")?;
            }
        }

        if !self.result.orphaned.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "ORPHANED rows ({} error(s))",
                summary.orphaned_error_count
            )?;
            for error in &self.result.orphaned {
                writeln!(f, "  {error}")?;
            }
        }

        Ok(())
    }
}

fn display_key(key: &str) -> &str {
    if key.is_empty() { "<blank key>" } else { key }
}
