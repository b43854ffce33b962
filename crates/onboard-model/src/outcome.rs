//! Batch outcome: accepted and rejected transporters with a summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::TransporterRecordGroup;
use crate::finding::{ErrorKind, ValidationError};

/// A transporter whose whole record group passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedTransporter {
    pub transporter_key: String,
    pub group: TransporterRecordGroup,
}

/// A transporter with at least one finding anywhere in its record group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedTransporter {
    pub transporter_key: String,
    pub group: TransporterRecordGroup,
    pub errors: Vec<ValidationError>,
}

/// Counters over the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_transporters: usize,
    pub accepted_count: usize,
    pub rejected_count: usize,
    /// Findings per kind across all rejected transporters.
    pub error_count_by_kind: BTreeMap<ErrorKind, usize>,
    /// Findings on child rows whose transporter key matches no general details row.
    pub orphaned_error_count: usize,
}

/// Classification of every transporter in a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub accepted: Vec<AcceptedTransporter>,
    pub rejected: Vec<RejectedTransporter>,
    /// Findings that belong to no transporter (orphaned child rows).
    pub orphaned: Vec<ValidationError>,
    pub summary: Summary,
}

impl ValidationResult {
    /// Partition per-transporter outcomes, in the order given.
    ///
    /// A group with an empty error list is accepted; anything else is rejected
    /// with its full list.
    pub fn from_outcomes<I>(outcomes: I, orphaned: Vec<ValidationError>) -> Self
    where
        I: IntoIterator<Item = (TransporterRecordGroup, Vec<ValidationError>)>,
    {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        let mut error_count_by_kind: BTreeMap<ErrorKind, usize> =
            ErrorKind::ALL.iter().map(|kind| (*kind, 0)).collect();

        for (group, errors) in outcomes {
            let transporter_key = group.transporter_key().to_string();
            if errors.is_empty() {
                accepted.push(AcceptedTransporter {
                    transporter_key,
                    group,
                });
            } else {
                for error in &errors {
                    *error_count_by_kind.entry(error.kind).or_insert(0) += 1;
                }
                rejected.push(RejectedTransporter {
                    transporter_key,
                    group,
                    errors,
                });
            }
        }

        let summary = Summary {
            total_transporters: accepted.len() + rejected.len(),
            accepted_count: accepted.len(),
            rejected_count: rejected.len(),
            error_count_by_kind,
            orphaned_error_count: orphaned.len(),
        };

        Self {
            accepted,
            rejected,
            orphaned,
            summary,
        }
    }

    /// True when every transporter was accepted and no orphaned rows exist.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.orphaned.is_empty()
    }

    /// Total findings, rejected transporters and orphaned rows combined.
    #[must_use]
    pub fn total_errors(&self) -> usize {
        self.rejected.iter().map(|r| r.errors.len()).sum::<usize>() + self.orphaned.len()
    }

    /// Findings count for one kind across rejected transporters.
    #[must_use]
    pub fn error_count(&self, kind: ErrorKind) -> usize {
        self.summary
            .error_count_by_kind
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    /// Look up the rejection of a transporter by key.
    #[must_use]
    pub fn rejection(&self, transporter_key: &str) -> Option<&RejectedTransporter> {
        self.rejected
            .iter()
            .find(|r| r.transporter_key == transporter_key)
    }
}
