//! Citizen complaint intake and tracking workflows.
//!
//! The intake side validates a submission, optionally streams an evidence
//! blob to the configured store, and persists a record; the tracking side
//! looks a record up by its store-issued id and projects it onto a fixed
//! status timeline. Both sides are pure orchestration over the
//! [`store::ComplaintStore`] and [`store::EvidenceStore`] seams so tests and
//! deployments can swap backends freely.

pub mod attachment;
pub mod domain;
pub mod receipt;
pub mod router;
pub mod service;
pub mod session;
pub mod store;
pub mod timeline;
pub mod validation;

#[cfg(test)]
mod tests;

pub use attachment::{evidence_key, AttachmentError, EvidenceGate, MAX_EVIDENCE_BYTES};
pub use domain::{
    format_timestamp, ComplaintId, ComplaintRecord, ComplaintStatus, ComplaintSubmission,
    ComplaintTypeCatalog, ComplaintTypeEntry, EvidenceAttachment, ValidatedComplaint,
};
pub use receipt::Receipt;
pub use router::{complaint_router, SubmitComplaintRequest, SubmitComplaintResponse};
pub use service::{ComplaintIntakeService, IntakeError, IntakeOutcome, TrackedComplaint};
pub use session::{IntakeMemo, SessionContext};
pub use store::{
    ComplaintStore, EvidenceStore, EvidenceStoreError, StoreError, TrackingIdCache, UploadReporter,
    UploadTicket,
};
pub use timeline::{Milestone, MilestoneDate, MilestoneMark, Timeline, TimelineEntry};
pub use validation::{validate, FieldViolation, ValidationReport};
