use tokio::sync::{oneshot, watch};

use super::domain::{ComplaintId, ComplaintRecord, EvidenceAttachment};

/// Record store failures, mirrored to the user-readable messages the intake
/// form shows. No retry or backoff is attempted for either.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("record store denied the request: {0}")]
    PermissionDenied(String),
}

impl StoreError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => {
                "Database is currently unavailable. Please try again later."
            }
            StoreError::PermissionDenied(_) => {
                "Permission denied. Please ensure you have the necessary permissions."
            }
        }
    }
}

/// External record store keyed by opaque identifiers it generates. Only
/// create and read are used; complaints are never updated or deleted by this
/// system.
pub trait ComplaintStore: Send + Sync {
    fn create(&self, record: ComplaintRecord) -> Result<ComplaintId, StoreError>;
    fn fetch(&self, id: &ComplaintId) -> Result<Option<ComplaintRecord>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvidenceStoreError {
    #[error("evidence transfer failed: {0}")]
    Transfer(String),
    #[error("evidence transfer ended without a result")]
    Interrupted,
}

/// Producer half of an upload: implementations report progress fractions and
/// exactly one terminal outcome through this handle.
pub struct UploadReporter {
    progress: watch::Sender<f32>,
    result: oneshot::Sender<Result<String, EvidenceStoreError>>,
}

impl UploadReporter {
    /// Publish a progress fraction in `0.0..=1.0`. Receivers only observe the
    /// most recent value.
    pub fn report(&self, fraction: f32) {
        let _ = self.progress.send(fraction);
    }

    /// Deliver the terminal outcome: the public URL of the stored blob, or
    /// the transfer error.
    pub fn finish(self, outcome: Result<String, EvidenceStoreError>) {
        let _ = self.result.send(outcome);
    }
}

/// Consumer half of an upload: an observable progress stream plus one
/// awaitable terminal result. Dropping the ticket abandons interest in the
/// transfer; it does not cancel it.
pub struct UploadTicket {
    progress: watch::Receiver<f32>,
    result: oneshot::Receiver<Result<String, EvidenceStoreError>>,
}

impl UploadTicket {
    /// Paired reporter/ticket channel for store implementations.
    pub fn channel() -> (UploadReporter, UploadTicket) {
        let (progress_tx, progress_rx) = watch::channel(0.0);
        let (result_tx, result_rx) = oneshot::channel();
        (
            UploadReporter {
                progress: progress_tx,
                result: result_tx,
            },
            UploadTicket {
                progress: progress_rx,
                result: result_rx,
            },
        )
    }

    pub fn progress(&self) -> watch::Receiver<f32> {
        self.progress.clone()
    }

    /// Await the terminal result. A reporter dropped without finishing counts
    /// as an interrupted transfer.
    pub async fn wait(self) -> Result<String, EvidenceStoreError> {
        match self.result.await {
            Ok(outcome) => outcome,
            Err(_) => Err(EvidenceStoreError::Interrupted),
        }
    }
}

/// External blob store for evidence files.
pub trait EvidenceStore: Send + Sync {
    fn store(&self, key: &str, attachment: EvidenceAttachment) -> UploadTicket;
}

/// Convenience cache remembering the last-used complaint id across sessions.
/// Purely best-effort: implementations log and swallow their own failures.
pub trait TrackingIdCache: Send + Sync {
    fn remember(&self, id: &ComplaintId);
    fn recall(&self) -> Option<ComplaintId>;
}
