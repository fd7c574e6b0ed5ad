use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::domain::{format_timestamp, ComplaintRecord, ComplaintStatus};

/// Fixed milestones the tracking view renders, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Received,
    UnderReview,
    Investigating,
    Resolved,
    Canceled,
}

impl Milestone {
    pub const fn label(self) -> &'static str {
        match self {
            Milestone::Received => "Received",
            Milestone::UnderReview => "Under Review",
            Milestone::Investigating => "Investigating",
            Milestone::Resolved => "Resolved",
            Milestone::Canceled => "Canceled",
        }
    }
}

/// Marker state for a milestone entry. Cancellation is a distinct terminal
/// marker, not a progress step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneMark {
    Pending,
    Reached,
    CanceledTerminal,
}

/// Date cell shown next to an active milestone. Missing back-office
/// timestamps fall back to the stage-appropriate placeholder rather than an
/// error; a skipped stage is simply "In Progress".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneDate {
    Recorded(DateTime<Utc>),
    InProgress,
    Completed,
    Canceled,
}

impl std::fmt::Display for MilestoneDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MilestoneDate::Recorded(value) => f.write_str(&format_timestamp(*value)),
            MilestoneDate::InProgress => f.write_str("In Progress"),
            MilestoneDate::Completed => f.write_str("Completed"),
            MilestoneDate::Canceled => f.write_str("Canceled"),
        }
    }
}

impl Serialize for MilestoneDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub milestone: Milestone,
    pub label: &'static str,
    pub mark: MilestoneMark,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<MilestoneDate>,
}

impl TimelineEntry {
    fn inactive(milestone: Milestone) -> Self {
        Self {
            milestone,
            label: milestone.label(),
            mark: MilestoneMark::Pending,
            date: None,
        }
    }

    fn reached(milestone: Milestone, date: MilestoneDate) -> Self {
        Self {
            milestone,
            label: milestone.label(),
            mark: MilestoneMark::Reached,
            date: Some(date),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.mark, MilestoneMark::Pending)
    }
}

/// Pure projection of a stored record onto the five-milestone tracking view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub status: ComplaintStatus,
    pub entries: Vec<TimelineEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

impl Timeline {
    pub fn project(record: &ComplaintRecord) -> Self {
        use ComplaintStatus::*;

        let status = record.status;
        let mut entries = Vec::with_capacity(5);

        entries.push(TimelineEntry::reached(
            Milestone::Received,
            MilestoneDate::Recorded(record.submitted_at),
        ));

        entries.push(if matches!(status, UnderReview | Investigating | Resolved | Canceled) {
            TimelineEntry::reached(
                Milestone::UnderReview,
                record
                    .review_date
                    .map(MilestoneDate::Recorded)
                    .unwrap_or(MilestoneDate::InProgress),
            )
        } else {
            TimelineEntry::inactive(Milestone::UnderReview)
        });

        entries.push(if matches!(status, Investigating | Resolved | Canceled) {
            TimelineEntry::reached(
                Milestone::Investigating,
                record
                    .investigate_date
                    .map(MilestoneDate::Recorded)
                    .unwrap_or(MilestoneDate::InProgress),
            )
        } else {
            TimelineEntry::inactive(Milestone::Investigating)
        });

        entries.push(if status == Resolved {
            TimelineEntry::reached(
                Milestone::Resolved,
                record
                    .resolve_date
                    .map(MilestoneDate::Recorded)
                    .unwrap_or(MilestoneDate::Completed),
            )
        } else {
            TimelineEntry::inactive(Milestone::Resolved)
        });

        entries.push(if status == Canceled {
            TimelineEntry {
                milestone: Milestone::Canceled,
                label: Milestone::Canceled.label(),
                mark: MilestoneMark::CanceledTerminal,
                date: Some(
                    record
                        .cancel_date
                        .map(MilestoneDate::Recorded)
                        .unwrap_or(MilestoneDate::Canceled),
                ),
            }
        } else {
            TimelineEntry::inactive(Milestone::Canceled)
        });

        Self {
            status,
            entries,
            resolution_note: (status == Resolved)
                .then(|| record.resolution_note.clone())
                .flatten(),
            cancellation_reason: (status == Canceled)
                .then(|| record.cancellation_reason.clone())
                .flatten(),
        }
    }

    pub fn entry(&self, milestone: Milestone) -> &TimelineEntry {
        self.entries
            .iter()
            .find(|entry| entry.milestone == milestone)
            .expect("timeline always carries all five milestones")
    }
}
