use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use super::domain::{ComplaintSubmission, ComplaintTypeCatalog, ValidatedComplaint};

/// Per-field validation failure. Each carries the message the form surfaces
/// next to the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, thiserror::Error)]
pub enum FieldViolation {
    #[error("full name is required")]
    FullName,
    #[error("voter ID must be an email address or a 10-character uppercase code")]
    VoterId,
    #[error("complaint type must be one of the offered categories")]
    ComplaintType,
    #[error("incident date is required and cannot be in the future")]
    IncidentDate,
    #[error("description must be at least 10 characters")]
    Description,
    #[error("contact info must be an email address or a phone number")]
    ContactInfo,
}

impl FieldViolation {
    /// Form field identifier, matching the submitted JSON keys.
    pub const fn field(self) -> &'static str {
        match self {
            FieldViolation::FullName => "fullName",
            FieldViolation::VoterId => "voterId",
            FieldViolation::ComplaintType => "complaintType",
            FieldViolation::IncidentDate => "incidentDate",
            FieldViolation::Description => "description",
            FieldViolation::ContactInfo => "contactInfo",
        }
    }
}

/// Complete set of violations for one submission attempt. Every field is
/// checked independently so the caller can flag all offending fields at once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("submission failed validation on {} field(s)", .violations.len())]
pub struct ValidationReport {
    pub violations: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn contains(&self, violation: FieldViolation) -> bool {
        self.violations.contains(&violation)
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn voter_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9]{10}$").expect("valid voter code pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[\d\s-]{10,}$").expect("valid phone pattern"))
}

pub(crate) fn is_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

/// Parse the `datetime-local` form value, tolerating a seconds component.
/// Values carry no zone; they are interpreted as UTC.
fn parse_incident_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Validate a raw submission against the caller-supplied type catalog.
///
/// Pure function of its inputs; `now` anchors the no-future-incidents rule so
/// callers and tests control the clock. On success the returned
/// [`ValidatedComplaint`] carries trimmed fields and the parsed incident
/// timestamp.
pub fn validate(
    submission: &ComplaintSubmission,
    catalog: &ComplaintTypeCatalog,
    now: DateTime<Utc>,
) -> Result<ValidatedComplaint, ValidationReport> {
    let mut violations = Vec::new();

    let full_name = submission.full_name.trim();
    if full_name.is_empty() {
        violations.push(FieldViolation::FullName);
    }

    let voter_id = submission.voter_id.trim();
    if voter_id.is_empty() || !(is_email(voter_id) || voter_code_pattern().is_match(voter_id)) {
        violations.push(FieldViolation::VoterId);
    }

    let complaint_type = submission.complaint_type.trim();
    if complaint_type.is_empty() || !catalog.contains(complaint_type) {
        violations.push(FieldViolation::ComplaintType);
    }

    let incident_date = match parse_incident_date(&submission.incident_date) {
        Some(parsed) if parsed <= now => Some(parsed),
        _ => {
            violations.push(FieldViolation::IncidentDate);
            None
        }
    };

    let description = submission.description.trim();
    if description.is_empty() || description.chars().count() < 10 {
        violations.push(FieldViolation::Description);
    }

    let contact_info = submission.contact_info.trim();
    if contact_info.is_empty() || !(is_email(contact_info) || phone_pattern().is_match(contact_info))
    {
        violations.push(FieldViolation::ContactInfo);
    }

    // A missing incident date always records a violation, so this only
    // unwinds through the report.
    let Some(incident_date) = incident_date.filter(|_| violations.is_empty()) else {
        return Err(ValidationReport { violations });
    };

    Ok(ValidatedComplaint {
        full_name: full_name.to_string(),
        voter_id: voter_id.to_string(),
        complaint_type: complaint_type.to_string(),
        incident_date,
        location: submission
            .location
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        description: description.to_string(),
        contact_info: contact_info.to_string(),
    })
}
