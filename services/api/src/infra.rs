use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use civic_complaints::workflows::complaints::{
    ComplaintId, ComplaintRecord, ComplaintStore, EvidenceAttachment, EvidenceStore, StoreError,
    TrackingIdCache, UploadTicket,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local record store. Ids are opaque to callers but deterministic
/// here so logs stay readable.
#[derive(Default, Clone)]
pub(crate) struct InMemoryComplaintStore {
    docs: Arc<Mutex<HashMap<String, ComplaintRecord>>>,
    seq: Arc<AtomicU64>,
}

impl ComplaintStore for InMemoryComplaintStore {
    fn create(&self, record: ComplaintRecord) -> Result<ComplaintId, StoreError> {
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        let id = ComplaintId(format!("cmp-{:06}-{:x}", n, record.submitted_at.timestamp()));
        let mut guard = self.docs.lock().expect("store mutex poisoned");
        guard.insert(id.0.clone(), record);
        Ok(id)
    }

    fn fetch(&self, id: &ComplaintId) -> Result<Option<ComplaintRecord>, StoreError> {
        let guard = self.docs.lock().expect("store mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }
}

/// Evidence store that keeps blobs in memory and reports quartile progress.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEvidenceStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl EvidenceStore for InMemoryEvidenceStore {
    fn store(&self, key: &str, attachment: EvidenceAttachment) -> UploadTicket {
        let (reporter, ticket) = UploadTicket::channel();

        for quarter in [0.25, 0.5, 0.75, 1.0] {
            reporter.report(quarter);
        }

        let mut guard = self.blobs.lock().expect("evidence mutex poisoned");
        guard.insert(key.to_string(), attachment.bytes);
        reporter.finish(Ok(format!("memory://{key}")));
        ticket
    }
}

/// Last-used complaint id, persisted to a small file so the `demo` command
/// and restarts can pick it up. Best-effort only.
#[derive(Debug, Clone)]
pub(crate) struct FileTrackingIdCache {
    path: PathBuf,
}

impl FileTrackingIdCache {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TrackingIdCache for FileTrackingIdCache {
    fn remember(&self, id: &ComplaintId) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!(path = %self.path.display(), error = %err, "cannot create id cache dir");
                return;
            }
        }
        if let Err(err) = std::fs::write(&self.path, &id.0) {
            warn!(path = %self.path.display(), error = %err, "cannot persist last complaint id");
        }
    }

    fn recall(&self) -> Option<ComplaintId> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let trimmed = raw.trim();
                (!trimmed.is_empty()).then(|| ComplaintId(trimmed.to_string()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "cannot read last complaint id");
                None
            }
        }
    }
}
