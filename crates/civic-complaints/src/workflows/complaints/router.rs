use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use base64::prelude::{Engine, BASE64_STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ComplaintId, ComplaintStatus, ComplaintSubmission, EvidenceAttachment};
use super::receipt::Receipt;
use super::service::{ComplaintIntakeService, IntakeError};
use super::store::{ComplaintStore, EvidenceStore, StoreError};

/// Router builder exposing complaint intake and tracking over HTTP.
pub fn complaint_router<S, E>(service: Arc<ComplaintIntakeService<S, E>>) -> Router
where
    S: ComplaintStore + 'static,
    E: EvidenceStore + 'static,
{
    Router::new()
        .route("/api/v1/complaints", post(submit_handler::<S, E>))
        .route("/api/v1/complaints/:complaint_id", get(track_handler::<S, E>))
        .route(
            "/api/v1/complaints/:complaint_id/receipt",
            get(receipt_handler::<S, E>),
        )
        .with_state(service)
}

/// Inline evidence blob, base64-encoded for the JSON body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidencePayload {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitComplaintRequest {
    #[serde(flatten)]
    pub submission: ComplaintSubmission,
    #[serde(default)]
    pub attachment: Option<EvidencePayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintResponse {
    pub complaint_id: ComplaintId,
    pub status: &'static str,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

fn decode_attachment(payload: EvidencePayload) -> Result<EvidenceAttachment, Response> {
    let bytes = BASE64_STANDARD.decode(payload.data.as_bytes()).map_err(|_| {
        let body = json!({ "error": "attachment data is not valid base64" });
        (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
    })?;
    Ok(EvidenceAttachment {
        file_name: payload.file_name,
        content_type: payload.content_type.and_then(|value| value.parse().ok()),
        bytes,
    })
}

fn store_error_response(error: &StoreError) -> Response {
    let status = match error {
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::PermissionDenied(_) => StatusCode::FORBIDDEN,
    };
    let body = json!({ "error": error.user_message() });
    (status, axum::Json(body)).into_response()
}

pub(crate) async fn submit_handler<S, E>(
    State(service): State<Arc<ComplaintIntakeService<S, E>>>,
    axum::Json(request): axum::Json<SubmitComplaintRequest>,
) -> Response
where
    S: ComplaintStore + 'static,
    E: EvidenceStore + 'static,
{
    let attachment = match request.attachment.map(decode_attachment).transpose() {
        Ok(attachment) => attachment,
        Err(response) => return response,
    };

    match service.submit(request.submission, attachment, None).await {
        Ok(outcome) => {
            let body = SubmitComplaintResponse {
                complaint_id: outcome.complaint_id,
                status: ComplaintStatus::Received.label(),
                submitted_at: outcome.submitted_at,
                file_url: outcome.file_url,
            };
            (StatusCode::CREATED, axum::Json(body)).into_response()
        }
        Err(IntakeError::Invalid(report)) => {
            let violations: serde_json::Map<String, serde_json::Value> = report
                .violations
                .iter()
                .map(|violation| (violation.field().to_string(), json!(violation.to_string())))
                .collect();
            let body = json!({
                "error": report.to_string(),
                "violations": violations,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
        }
        Err(IntakeError::Attachment(error)) => {
            let body = json!({ "error": error.to_string() });
            (StatusCode::PAYLOAD_TOO_LARGE, axum::Json(body)).into_response()
        }
        Err(IntakeError::Evidence(error)) => {
            let body = json!({ "error": error.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(body)).into_response()
        }
        Err(IntakeError::Store(error)) => store_error_response(&error),
    }
}

pub(crate) async fn track_handler<S, E>(
    State(service): State<Arc<ComplaintIntakeService<S, E>>>,
    Path(complaint_id): Path<String>,
) -> Response
where
    S: ComplaintStore + 'static,
    E: EvidenceStore + 'static,
{
    let id = ComplaintId(complaint_id);
    match service.track(&id) {
        Ok(Some(tracked)) => (StatusCode::OK, axum::Json(tracked)).into_response(),
        Ok(None) => {
            let body = json!({ "error": "no complaint found with that ID" });
            (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
        }
        Err(error) => store_error_response(&error),
    }
}

pub(crate) async fn receipt_handler<S, E>(
    State(service): State<Arc<ComplaintIntakeService<S, E>>>,
    Path(complaint_id): Path<String>,
) -> Response
where
    S: ComplaintStore + 'static,
    E: EvidenceStore + 'static,
{
    let id = ComplaintId(complaint_id);
    match service.track(&id) {
        Ok(Some(tracked)) => {
            let receipt =
                Receipt::from_record(tracked.complaint_id, &tracked.record, service.catalog(), Utc::now());
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                receipt.render(),
            )
                .into_response()
        }
        Ok(None) => {
            let body = json!({ "error": "no complaint found with that ID" });
            (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
        }
        Err(error) => store_error_response(&error),
    }
}
