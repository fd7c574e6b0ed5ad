use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored complaints. The value is opaque and
/// generated by the record store, never by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplaintId(pub String);

impl std::fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a complaint. Transitions happen in a back-office
/// process outside this system; the tracking side renders whatever status it
/// finds, including skipped-stage combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Received,
    #[serde(rename = "Under Review")]
    UnderReview,
    Investigating,
    Resolved,
    Canceled,
}

impl ComplaintStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ComplaintStatus::Received => "Received",
            ComplaintStatus::UnderReview => "Under Review",
            ComplaintStatus::Investigating => "Investigating",
            ComplaintStatus::Resolved => "Resolved",
            ComplaintStatus::Canceled => "Canceled",
        }
    }

    /// Style hook for status badges: lower-cased label with every whitespace
    /// run collapsed to a single hyphen.
    pub fn css_class(self) -> String {
        let mut class = String::from("status-");
        let mut gap = false;
        for ch in self.label().chars() {
            if ch.is_whitespace() {
                gap = true;
                continue;
            }
            if gap && !class.ends_with('-') {
                class.push('-');
            }
            gap = false;
            class.extend(ch.to_lowercase());
        }
        class
    }
}

/// Raw complaint form data as collected from the citizen. Field values are
/// untrimmed and unchecked; `validation::validate` turns this into a
/// [`ValidatedComplaint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintSubmission {
    pub full_name: String,
    pub voter_id: String,
    pub complaint_type: String,
    /// HTML `datetime-local` shape, `YYYY-MM-DDTHH:MM` (seconds tolerated).
    pub incident_date: String,
    #[serde(default)]
    pub location: Option<String>,
    pub description: String,
    pub contact_info: String,
}

/// Optional evidence blob accompanying a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceAttachment {
    pub file_name: String,
    pub content_type: Option<mime::Mime>,
    pub bytes: Vec<u8>,
}

/// Sanitized submission produced by validation: fields trimmed, the incident
/// timestamp parsed. The orchestrator never re-validates this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedComplaint {
    pub full_name: String,
    pub voter_id: String,
    pub complaint_type: String,
    pub incident_date: DateTime<Utc>,
    pub location: Option<String>,
    pub description: String,
    pub contact_info: String,
}

impl ValidatedComplaint {
    /// Merge the validated fields into a fresh record ready for the store.
    pub fn into_record(
        self,
        submitted_at: DateTime<Utc>,
        file_url: Option<String>,
    ) -> ComplaintRecord {
        ComplaintRecord {
            full_name: self.full_name,
            voter_id: self.voter_id,
            complaint_type: self.complaint_type,
            incident_date: self.incident_date,
            location: self.location,
            description: self.description,
            contact_info: self.contact_info,
            status: ComplaintStatus::Received,
            submitted_at,
            file_url,
            review_date: None,
            investigate_date: None,
            resolve_date: None,
            cancel_date: None,
            resolution_note: None,
            cancellation_reason: None,
        }
    }
}

/// Persisted complaint document. Created once by the intake workflow; the
/// nullable milestone fields are written later by the out-of-scope
/// back-office process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintRecord {
    pub full_name: String,
    pub voter_id: String,
    pub complaint_type: String,
    pub incident_date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    pub description: String,
    pub contact_info: String,
    pub status: ComplaintStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub investigate_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolve_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolution_note: Option<String>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

/// The enumerated set of complaint types the intake form offers. Supplied by
/// the caller so deployments can adjust the catalog without touching the
/// workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintTypeCatalog {
    entries: Vec<ComplaintTypeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintTypeEntry {
    pub key: String,
    pub label: String,
}

impl ComplaintTypeCatalog {
    pub fn new(entries: Vec<ComplaintTypeEntry>) -> Self {
        Self { entries }
    }

    /// Catalog mirroring the standard intake form options.
    pub fn standard() -> Self {
        let entries = [
            ("voter-intimidation", "Voter Intimidation"),
            ("ballot-issue", "Ballot Issue"),
            ("registration-problem", "Registration Problem"),
            ("polling-station", "Polling Station Issue"),
            ("fraud-suspicion", "Suspected Fraud"),
            ("accessibility", "Accessibility Concern"),
            ("other", "Other"),
        ]
        .into_iter()
        .map(|(key, label)| ComplaintTypeEntry {
            key: key.to_string(),
            label: label.to_string(),
        })
        .collect();
        Self { entries }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    /// Human label for a type key, falling back to the raw key when the
    /// catalog does not know it (older records may carry retired types).
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.label.as_str())
            .unwrap_or(key)
    }

    pub fn entries(&self) -> &[ComplaintTypeEntry] {
        &self.entries
    }
}

/// Render a timestamp the way the tracking view displays it, e.g.
/// `Jan 5, 2026, 03:12 PM`.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y, %I:%M %p").to_string()
}
