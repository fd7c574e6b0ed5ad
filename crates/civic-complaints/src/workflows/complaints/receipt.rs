use chrono::{DateTime, Utc};

use super::domain::{
    format_timestamp, ComplaintId, ComplaintRecord, ComplaintStatus, ComplaintTypeCatalog,
    ValidatedComplaint,
};

/// Plain-text receipt data. Assembled from the locally-held submission copy
/// plus the store-issued id; the record is not re-fetched, so later
/// back-office edits are not reflected unless the caller builds the receipt
/// from a tracked record instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub complaint_id: ComplaintId,
    pub generated_at: DateTime<Utc>,
    pub status: ComplaintStatus,
    pub full_name: String,
    pub type_label: String,
    pub incident_date: DateTime<Utc>,
    pub description: String,
}

impl Receipt {
    pub fn from_submission(
        complaint_id: ComplaintId,
        submission: &ValidatedComplaint,
        status: ComplaintStatus,
        catalog: &ComplaintTypeCatalog,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            complaint_id,
            generated_at,
            status,
            full_name: submission.full_name.clone(),
            type_label: catalog.label_for(&submission.complaint_type).to_string(),
            incident_date: submission.incident_date,
            description: submission.description.clone(),
        }
    }

    pub fn from_record(
        complaint_id: ComplaintId,
        record: &ComplaintRecord,
        catalog: &ComplaintTypeCatalog,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            complaint_id,
            generated_at,
            status: record.status,
            full_name: record.full_name.clone(),
            type_label: catalog.label_for(&record.complaint_type).to_string(),
            incident_date: record.incident_date,
            description: record.description.clone(),
        }
    }

    /// Fixed human-readable template; not machine-parsed anywhere, so no
    /// round-trip guarantee.
    pub fn render(&self) -> String {
        format!(
            "VOTING COMPLAINT RECEIPT\n\
             ------------------------\n\
             Complaint ID: {id}\n\
             Date Generated: {generated}\n\
             \n\
             Status: {status}\n\
             Name: {name}\n\
             Type: {type_label}\n\
             Incident Date: {incident}\n\
             Description: {description}\n\
             \n\
             Please keep this ID safe to track your complaint status.\n",
            id = self.complaint_id,
            generated = format_timestamp(self.generated_at),
            status = self.status.label(),
            name = self.full_name,
            type_label = self.type_label,
            incident = format_timestamp(self.incident_date),
            description = self.description,
        )
    }
}
