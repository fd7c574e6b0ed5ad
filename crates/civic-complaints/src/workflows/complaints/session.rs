use chrono::{DateTime, Utc};

use super::domain::{ComplaintId, ComplaintStatus, ComplaintTypeCatalog, ValidatedComplaint};
use super::receipt::Receipt;
use super::service::TrackedComplaint;

/// In-memory copy of the most recent successful intake, kept for receipt
/// generation. May drift from what the back office later changes server-side;
/// that is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeMemo {
    pub complaint_id: ComplaintId,
    pub submitted_at: DateTime<Utc>,
    pub submission: ValidatedComplaint,
}

/// Caller-owned session state for one user session. Replaces process-wide
/// globals: the workflow functions never touch shared mutable state, the
/// caller threads this context through instead. No consistency guarantee
/// against the backing store.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    last_intake: Option<IntakeMemo>,
    last_tracking: Option<TrackedComplaint>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_intake(&mut self, memo: IntakeMemo) {
        self.last_intake = Some(memo);
    }

    pub fn record_tracking(&mut self, tracked: TrackedComplaint) {
        self.last_tracking = Some(tracked);
    }

    /// A lookup that found nothing clears whatever was displayed before.
    pub fn clear_tracking(&mut self) {
        self.last_tracking = None;
    }

    pub fn last_intake(&self) -> Option<&IntakeMemo> {
        self.last_intake.as_ref()
    }

    pub fn last_tracking(&self) -> Option<&TrackedComplaint> {
        self.last_tracking.as_ref()
    }

    /// Receipt for whatever the session is currently looking at: the tracked
    /// record when one is displayed, otherwise the last submission copy.
    pub fn receipt(&self, catalog: &ComplaintTypeCatalog, now: DateTime<Utc>) -> Option<Receipt> {
        if let Some(tracked) = &self.last_tracking {
            return Some(Receipt::from_record(
                tracked.complaint_id.clone(),
                &tracked.record,
                catalog,
                now,
            ));
        }
        self.last_intake.as_ref().map(|memo| {
            Receipt::from_submission(
                memo.complaint_id.clone(),
                &memo.submission,
                ComplaintStatus::Received,
                catalog,
                now,
            )
        })
    }
}
