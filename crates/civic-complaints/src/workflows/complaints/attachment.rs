use chrono::{DateTime, Utc};

use super::domain::EvidenceAttachment;

/// Hard ceiling on evidence blobs, 5 MiB. A blob of exactly this size passes.
pub const MAX_EVIDENCE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentError {
    #[error("evidence file exceeds the {limit} byte limit (found {found} bytes)")]
    TooLarge { limit: usize, found: usize },
}

/// Size gate applied before any upload begins. No content-type restriction is
/// enforced.
#[derive(Debug, Clone, Copy)]
pub struct EvidenceGate {
    max_bytes: usize,
}

impl Default for EvidenceGate {
    fn default() -> Self {
        Self {
            max_bytes: MAX_EVIDENCE_BYTES,
        }
    }
}

impl EvidenceGate {
    pub fn with_limit(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn check(&self, attachment: &EvidenceAttachment) -> Result<(), AttachmentError> {
        let found = attachment.bytes.len();
        if found > self.max_bytes {
            return Err(AttachmentError::TooLarge {
                limit: self.max_bytes,
                found,
            });
        }
        Ok(())
    }
}

/// Destination key for an uploaded blob: `evidence/<epoch-millis>_<name>`.
/// The key is write-once and never read back, so millisecond collisions are
/// accepted.
pub fn evidence_key(submitted_at: DateTime<Utc>, file_name: &str) -> String {
    format!("evidence/{}_{}", submitted_at.timestamp_millis(), file_name)
}
