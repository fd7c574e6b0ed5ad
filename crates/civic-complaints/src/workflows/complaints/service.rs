use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use super::attachment::{evidence_key, AttachmentError, EvidenceGate};
use super::domain::{
    ComplaintId, ComplaintRecord, ComplaintSubmission, ComplaintTypeCatalog, EvidenceAttachment,
    ValidatedComplaint,
};
use super::store::{ComplaintStore, EvidenceStore, EvidenceStoreError, StoreError};
use super::timeline::Timeline;
use super::validation::{validate, ValidationReport};

/// Terminal failure of one intake attempt. Nothing here retries; the caller
/// must re-trigger the whole attempt explicitly.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Invalid(#[from] ValidationReport),
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
    #[error(transparent)]
    Evidence(#[from] EvidenceStoreError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Durable output of a successful intake: the store-issued id, plus the
/// in-memory submission copy the caller needs for session state and receipts.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeOutcome {
    pub complaint_id: ComplaintId,
    pub submitted_at: DateTime<Utc>,
    pub file_url: Option<String>,
    pub submission: ValidatedComplaint,
}

/// A fetched record coupled with its timeline projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedComplaint {
    pub complaint_id: ComplaintId,
    pub record: ComplaintRecord,
    pub timeline: Timeline,
}

/// Orchestrates the intake sequence (validate, optionally upload evidence,
/// persist) and the tracking lookup against pluggable stores.
pub struct ComplaintIntakeService<S, E> {
    records: Arc<S>,
    evidence: Arc<E>,
    gate: EvidenceGate,
    catalog: ComplaintTypeCatalog,
}

impl<S, E> ComplaintIntakeService<S, E>
where
    S: ComplaintStore + 'static,
    E: EvidenceStore + 'static,
{
    pub fn new(records: Arc<S>, evidence: Arc<E>, catalog: ComplaintTypeCatalog) -> Self {
        Self {
            records,
            evidence,
            gate: EvidenceGate::default(),
            catalog,
        }
    }

    pub fn catalog(&self) -> &ComplaintTypeCatalog {
        &self.catalog
    }

    /// Run one intake attempt end to end.
    ///
    /// Validation reports every offending field at once and stops the
    /// attempt. An oversized or failed upload aborts before any record is
    /// written; the reverse inconsistency (uploaded blob, no record) can
    /// occur when the store rejects the create and is accepted, not cleaned
    /// up. Upload progress fractions are forwarded verbatim to `progress`.
    pub async fn submit(
        &self,
        submission: ComplaintSubmission,
        attachment: Option<EvidenceAttachment>,
        progress: Option<watch::Sender<f32>>,
    ) -> Result<IntakeOutcome, IntakeError> {
        let validated = validate(&submission, &self.catalog, Utc::now())?;
        let submitted_at = Utc::now();

        let file_url = match attachment {
            Some(attachment) => {
                self.gate.check(&attachment)?;
                let key = evidence_key(submitted_at, &attachment.file_name);
                let size = attachment.bytes.len();
                let ticket = self.evidence.store(&key, attachment);

                if let Some(forward) = &progress {
                    // The store drops its progress sender when it finishes,
                    // so this drains every fraction before the terminal
                    // result is read, even for stores that complete
                    // synchronously.
                    let mut fractions = ticket.progress();
                    while fractions.changed().await.is_ok() {
                        let _ = forward.send(*fractions.borrow_and_update());
                    }
                }

                let url = ticket.wait().await.map_err(|err| {
                    warn!(%key, error = %err, "evidence upload failed, aborting intake");
                    err
                })?;
                info!(%key, size, "evidence stored");
                Some(url)
            }
            None => None,
        };

        let record = validated.clone().into_record(submitted_at, file_url.clone());
        let complaint_id = self.records.create(record).map_err(|err| {
            // Upload already happened; the orphaned blob is left for
            // out-of-band garbage collection.
            warn!(error = %err, orphaned_evidence = file_url.is_some(), "record create failed");
            err
        })?;

        info!(%complaint_id, "complaint recorded");

        Ok(IntakeOutcome {
            complaint_id,
            submitted_at,
            file_url,
            submission: validated,
        })
    }

    /// Fetch a complaint and project its timeline. An unknown id is a
    /// legitimate empty result, not an error.
    pub fn track(&self, id: &ComplaintId) -> Result<Option<TrackedComplaint>, StoreError> {
        let Some(record) = self.records.fetch(id)? else {
            return Ok(None);
        };
        let timeline = Timeline::project(&record);
        Ok(Some(TrackedComplaint {
            complaint_id: id.clone(),
            record,
            timeline,
        }))
    }
}
