//! Batch orchestration
//!
//! Runs the relational pass over the whole dataset, then validates every
//! transporter's record group concurrently and classifies it as accepted or
//! rejected. Results keep the order of the general details sheet.

use std::sync::Arc;
use std::time::Instant;

use onboard_lookup::{LookupError, LookupProvider};
use onboard_model::{ParsedDataset, TransporterRecordGroup, ValidationError, ValidationResult};
use onboard_validation::{RelationalValidator, repeated_transporter_keys, validate_transporter};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::{Error, Result, ValidationConfig};

type Outcome = (usize, TransporterRecordGroup, Vec<ValidationError>);

/// Validates parsed onboarding workbooks against a lookup provider.
pub struct Validator<L: ?Sized> {
    lookup: Arc<L>,
    config: ValidationConfig,
}

impl<L: ?Sized> Clone for Validator<L> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            config: self.config.clone(),
        }
    }
}

impl<L> Validator<L>
where
    L: LookupProvider + ?Sized + 'static,
{
    /// Create a validator with the default configuration.
    pub fn new(lookup: Arc<L>) -> Self {
        Self {
            lookup,
            config: ValidationConfig::default(),
        }
    }

    /// Create a validator with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is out of range.
    pub fn with_config(lookup: Arc<L>, config: ValidationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { lookup, config })
    }

    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a whole batch.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup provider fails or times out. No
    /// partial result is produced in that case.
    pub async fn validate(&self, dataset: &ParsedDataset) -> Result<ValidationResult> {
        self.validate_with_cancel(dataset, &CancellationToken::new())
            .await
    }

    /// Validate a whole batch, stopping early when `cancel` fires.
    ///
    /// Cancellation is observed before each transporter is launched. Groups
    /// already in flight are allowed to finish before returning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] after cancellation, or an error when the
    /// lookup provider fails or times out.
    pub async fn validate_with_cancel(
        &self,
        dataset: &ParsedDataset,
        cancel: &CancellationToken,
    ) -> Result<ValidationResult> {
        let span = tracing::info_span!(
            "validate_batch",
            transporters = dataset.transporter_count(),
            rows = dataset.row_count()
        );
        self.run(dataset, cancel).instrument(span).await
    }

    async fn run(
        &self,
        dataset: &ParsedDataset,
        cancel: &CancellationToken,
    ) -> Result<ValidationResult> {
        let started = Instant::now();

        let relational = RelationalValidator::new().validate(dataset);
        let mut repeated = repeated_transporter_keys(&dataset.general_details);

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut tasks: JoinSet<Result<Outcome>> = JoinSet::new();
        let mut outcomes: Vec<Outcome> = Vec::with_capacity(dataset.general_details.len());
        let mut failure: Option<Error> = None;

        for (index, general) in dataset.general_details.iter().enumerate() {
            while let Some(joined) = tasks.try_join_next() {
                collect(joined, &mut outcomes, &mut failure);
            }
            if failure.is_some() {
                break;
            }
            if cancel.is_cancelled() {
                failure = Some(Error::Cancelled);
                break;
            }

            let permit = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    failure = Some(Error::Cancelled);
                    break;
                }
                permit = Arc::clone(&semaphore).acquire_owned() => permit
                    .map_err(|e| Error::Worker(format!("semaphore closed: {e}")))?,
            };

            let group = dataset.group_for(general);
            let mut trailing: Vec<ValidationError> = repeated.remove(&index).into_iter().collect();
            trailing.extend_from_slice(relational.for_transporter(group.transporter_key()));

            let lookup = Arc::clone(&self.lookup);
            let timeout = self.config.lookup_timeout();
            tasks.spawn(async move {
                let _permit = permit;
                let key = group.transporter_key().to_string();
                let mut errors =
                    tokio::time::timeout(timeout, validate_transporter(lookup.as_ref(), &group))
                        .await
                        .map_err(|_| {
                            LookupError::unavailable(format!(
                                "timed out after {}ms validating transporter '{key}'",
                                timeout.as_millis()
                            ))
                        })??;
                errors.extend(trailing);
                tracing::debug!(transporter = %key, errors = errors.len(), "transporter validated");
                Ok((index, group, errors))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            collect(joined, &mut outcomes, &mut failure);
        }

        if let Some(err) = failure {
            tracing::warn!(error = %err, "batch validation aborted");
            return Err(err);
        }

        outcomes.sort_by_key(|(index, _, _)| *index);
        let result = ValidationResult::from_outcomes(
            outcomes
                .into_iter()
                .map(|(_, group, errors)| (group, errors)),
            relational.into_orphaned(),
        );

        tracing::info!(
            total = result.summary.total_transporters,
            accepted = result.summary.accepted_count,
            rejected = result.summary.rejected_count,
            orphaned = result.summary.orphaned_error_count,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "batch validated"
        );
        Ok(result)
    }
}

/// Record one finished task, keeping only the first failure.
fn collect(
    joined: std::result::Result<Result<Outcome>, JoinError>,
    outcomes: &mut Vec<Outcome>,
    failure: &mut Option<Error>,
) {
    let outcome = joined.unwrap_or_else(|e| Err(Error::Worker(e.to_string())));
    match outcome {
        Ok(outcome) => outcomes.push(outcome),
        Err(err) => {
            if failure.is_none() {
                *failure = Some(err);
            }
        }
    }
}

/// Validate a batch with the default configuration.
///
/// # Errors
///
/// Returns an error when the lookup provider fails or times out.
pub async fn validate<L>(lookup: Arc<L>, dataset: &ParsedDataset) -> Result<ValidationResult>
where
    L: LookupProvider + ?Sized + 'static,
{
    Validator::new(lookup).validate(dataset).await
}
