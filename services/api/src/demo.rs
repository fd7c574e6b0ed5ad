use crate::infra::{FileTrackingIdCache, InMemoryComplaintStore, InMemoryEvidenceStore};
use chrono::{Duration, Utc};
use civic_complaints::config::AppConfig;
use civic_complaints::error::AppError;
use civic_complaints::workflows::complaints::{
    ComplaintIntakeService, ComplaintSubmission, ComplaintTypeCatalog, EvidenceAttachment,
    IntakeMemo, MilestoneMark, SessionContext, TrackingIdCache,
};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Attach this file as evidence to the demo submission.
    #[arg(long)]
    pub(crate) evidence: Option<PathBuf>,
    /// Where to persist the last complaint id between runs. Falls back to
    /// the configured `APP_LAST_ID_PATH`.
    #[arg(long)]
    pub(crate) last_id_path: Option<PathBuf>,
}

fn resolve_last_id_path(flag: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match flag {
        Some(path) => Ok(path),
        None => Ok(AppConfig::load()?.tracking.last_id_path),
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        evidence,
        last_id_path,
    } = args;

    println!("Complaint intake demo");

    let records = Arc::new(InMemoryComplaintStore::default());
    let blobs = Arc::new(InMemoryEvidenceStore::default());
    let service = Arc::new(ComplaintIntakeService::new(
        records,
        blobs,
        ComplaintTypeCatalog::standard(),
    ));
    let id_cache = FileTrackingIdCache::new(resolve_last_id_path(last_id_path)?);
    let mut session = SessionContext::new();

    let attachment = match evidence {
        Some(path) => Some(load_evidence(&path)?),
        None => None,
    };
    if let Some(blob) = &attachment {
        println!(
            "- Evidence: {} ({} bytes)",
            blob.file_name,
            blob.bytes.len()
        );
    }

    let (progress_tx, mut progress_rx) = watch::channel(0.0f32);
    let reporter = tokio::spawn(async move {
        while progress_rx.changed().await.is_ok() {
            let fraction = *progress_rx.borrow_and_update();
            println!("  upload {:.0}%", fraction * 100.0);
        }
    });

    let submission = demo_submission();
    let outcome = match service.submit(submission, attachment, Some(progress_tx)).await {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Submission rejected: {}", err);
            return Ok(());
        }
    };
    let _ = reporter.await;

    println!(
        "- Filed complaint {} at {}",
        outcome.complaint_id, outcome.submitted_at
    );
    if let Some(url) = &outcome.file_url {
        println!("- Evidence stored at {}", url);
    }

    id_cache.remember(&outcome.complaint_id);
    session.record_intake(IntakeMemo {
        complaint_id: outcome.complaint_id.clone(),
        submitted_at: outcome.submitted_at,
        submission: outcome.submission.clone(),
    });

    let recalled = id_cache.recall().unwrap_or_else(|| outcome.complaint_id.clone());
    let tracked = match service.track(&recalled) {
        Ok(Some(tracked)) => tracked,
        Ok(None) => {
            println!("  No complaint found with id {}", recalled);
            return Ok(());
        }
        Err(err) => {
            println!("  Store unavailable: {}", err);
            return Ok(());
        }
    };

    println!(
        "\nTimeline for {} ({})",
        tracked.complaint_id,
        tracked.record.status.label()
    );
    for entry in &tracked.timeline.entries {
        let mark = match entry.mark {
            MilestoneMark::Pending => " ",
            MilestoneMark::Reached => "x",
            MilestoneMark::CanceledTerminal => "!",
        };
        match &entry.date {
            Some(date) => println!("  [{}] {} - {}", mark, entry.label, date),
            None => println!("  [{}] {}", mark, entry.label),
        }
    }

    session.record_tracking(tracked);
    if let Some(receipt) = session.receipt(service.catalog(), Utc::now()) {
        println!("\n{}", receipt.render());
    }

    Ok(())
}

fn demo_submission() -> ComplaintSubmission {
    let incident = Utc::now() - Duration::days(1);
    ComplaintSubmission {
        full_name: "Jordan Avery".to_string(),
        voter_id: "ABCDEFGH12".to_string(),
        complaint_type: "polling-station".to_string(),
        incident_date: incident.format("%Y-%m-%dT%H:%M").to_string(),
        location: Some("Precinct 14, Riverside Community Center".to_string()),
        description: "The accessible entrance was locked for over an hour and no staff \
                      member could say when it would open."
            .to_string(),
        contact_info: "jordan.avery@example.com".to_string(),
    }
}

fn load_evidence(path: &PathBuf) -> Result<EvidenceAttachment, AppError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "evidence.bin".to_string());
    let content_type = mime_guess::from_path(path).first();

    Ok(EvidenceAttachment {
        file_name,
        content_type,
        bytes,
    })
}
