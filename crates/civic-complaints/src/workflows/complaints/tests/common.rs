use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::complaints::domain::{
    ComplaintId, ComplaintRecord, ComplaintStatus, ComplaintSubmission, ComplaintTypeCatalog,
    EvidenceAttachment,
};
use crate::workflows::complaints::service::ComplaintIntakeService;
use crate::workflows::complaints::store::{
    ComplaintStore, EvidenceStore, EvidenceStoreError, StoreError, UploadTicket,
};

pub(super) fn catalog() -> ComplaintTypeCatalog {
    ComplaintTypeCatalog::standard()
}

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).single().expect("valid timestamp")
}

pub(super) fn submission() -> ComplaintSubmission {
    ComplaintSubmission {
        full_name: "Jordan Avery".to_string(),
        voter_id: "ABCDEFGH12".to_string(),
        complaint_type: "ballot-issue".to_string(),
        incident_date: "2024-11-05T08:30".to_string(),
        location: Some("Precinct 12, Linn County".to_string()),
        description: "Ballot scanner rejected my ballot twice before accepting it.".to_string(),
        contact_info: "jordan@example.com".to_string(),
    }
}

pub(super) fn record_with_status(status: ComplaintStatus) -> ComplaintRecord {
    ComplaintRecord {
        full_name: "Jordan Avery".to_string(),
        voter_id: "ABCDEFGH12".to_string(),
        complaint_type: "ballot-issue".to_string(),
        incident_date: Utc.with_ymd_and_hms(2024, 11, 5, 8, 30, 0).single().expect("valid"),
        location: None,
        description: "Ballot scanner rejected my ballot twice before accepting it.".to_string(),
        contact_info: "jordan@example.com".to_string(),
        status,
        submitted_at: Utc.with_ymd_and_hms(2024, 11, 5, 9, 0, 0).single().expect("valid"),
        file_url: None,
        review_date: None,
        investigate_date: None,
        resolve_date: None,
        cancel_date: None,
        resolution_note: None,
        cancellation_reason: None,
    }
}

pub(super) fn evidence_blob(len: usize) -> EvidenceAttachment {
    EvidenceAttachment {
        file_name: "evidence-photo.jpg".to_string(),
        content_type: Some(mime::IMAGE_JPEG),
        bytes: vec![0u8; len],
    }
}

#[derive(Default)]
pub(super) struct MemoryComplaintStore {
    docs: Mutex<HashMap<String, ComplaintRecord>>,
    seq: AtomicU64,
}

impl MemoryComplaintStore {
    pub(super) fn seed(&self, record: ComplaintRecord) -> ComplaintId {
        let id = self.next_id();
        self.docs
            .lock()
            .expect("store mutex poisoned")
            .insert(id.0.clone(), record);
        id
    }

    pub(super) fn get(&self, id: &ComplaintId) -> Option<ComplaintRecord> {
        self.docs
            .lock()
            .expect("store mutex poisoned")
            .get(&id.0)
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.docs.lock().expect("store mutex poisoned").len()
    }

    fn next_id(&self) -> ComplaintId {
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        ComplaintId(format!("cmp-{n:06}"))
    }
}

impl ComplaintStore for MemoryComplaintStore {
    fn create(&self, record: ComplaintRecord) -> Result<ComplaintId, StoreError> {
        Ok(self.seed(record))
    }

    fn fetch(&self, id: &ComplaintId) -> Result<Option<ComplaintRecord>, StoreError> {
        Ok(self.get(id))
    }
}

/// Record store that always refuses writes, for orphaned-upload scenarios.
pub(super) struct UnavailableComplaintStore;

impl ComplaintStore for UnavailableComplaintStore {
    fn create(&self, _record: ComplaintRecord) -> Result<ComplaintId, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &ComplaintId) -> Result<Option<ComplaintRecord>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryEvidenceStore {
    uploads: Mutex<Vec<(String, usize)>>,
    fail: bool,
}

impl MemoryEvidenceStore {
    pub(super) fn failing() -> Self {
        Self {
            uploads: Mutex::default(),
            fail: true,
        }
    }

    pub(super) fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().expect("evidence mutex poisoned").clone()
    }
}

impl EvidenceStore for MemoryEvidenceStore {
    fn store(&self, key: &str, attachment: EvidenceAttachment) -> UploadTicket {
        let (reporter, ticket) = UploadTicket::channel();

        if self.fail {
            reporter.finish(Err(EvidenceStoreError::Transfer(
                "evidence backend offline".to_string(),
            )));
            return ticket;
        }

        let total = attachment.bytes.len().max(1) as f32;
        for numerator in [1, 2, 3, 4] {
            reporter.report((total * numerator as f32 / 4.0) / total);
        }

        self.uploads
            .lock()
            .expect("evidence mutex poisoned")
            .push((key.to_string(), attachment.bytes.len()));
        reporter.finish(Ok(format!("memory://{key}")));
        ticket
    }
}

pub(super) type MemoryService = ComplaintIntakeService<MemoryComplaintStore, MemoryEvidenceStore>;

pub(super) fn build_service() -> (
    Arc<MemoryService>,
    Arc<MemoryComplaintStore>,
    Arc<MemoryEvidenceStore>,
) {
    let records = Arc::new(MemoryComplaintStore::default());
    let evidence = Arc::new(MemoryEvidenceStore::default());
    let service = Arc::new(ComplaintIntakeService::new(
        records.clone(),
        evidence.clone(),
        catalog(),
    ));
    (service, records, evidence)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}
