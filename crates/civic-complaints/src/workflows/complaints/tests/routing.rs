use super::common::*;
use std::sync::Arc;

use axum::http::{header, Request, StatusCode};
use base64::prelude::{Engine, BASE64_STANDARD};
use serde_json::json;
use tower::ServiceExt;

use crate::workflows::complaints::domain::ComplaintStatus;
use crate::workflows::complaints::router::complaint_router;
use crate::workflows::complaints::service::ComplaintIntakeService;

fn submission_body() -> serde_json::Value {
    serde_json::to_value(submission()).expect("submission serializes")
}

fn post_complaint(body: &serde_json::Value) -> Request<axum::body::Body> {
    Request::post("/api/v1/complaints")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("body serializes"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn submit_route_creates_a_complaint_and_returns_its_id() {
    let (service, _records, _evidence) = build_service();
    let router = complaint_router(service);

    let response = router
        .oneshot(post_complaint(&submission_body()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload.get("complaintId").is_some());
    assert_eq!(payload["status"], "Received");
}

#[tokio::test]
async fn submit_route_flags_every_offending_field() {
    let (service, _records, _evidence) = build_service();
    let router = complaint_router(service);

    let mut body = submission_body();
    body["voterId"] = json!("bad");
    body["description"] = json!("short");

    let response = router
        .oneshot(post_complaint(&body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    let violations = payload["violations"].as_object().expect("violation map");
    assert!(violations.contains_key("voterId"));
    assert!(violations.contains_key("description"));
    assert_eq!(violations.len(), 2);
}

#[tokio::test]
async fn submit_route_accepts_an_inline_base64_attachment() {
    let (service, records, evidence) = build_service();
    let router = complaint_router(service);

    let mut body = submission_body();
    body["attachment"] = json!({
        "fileName": "scan.png",
        "contentType": "image/png",
        "data": BASE64_STANDARD.encode([7u8; 64]),
    });

    let response = router
        .oneshot(post_complaint(&body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    let url = payload["fileUrl"].as_str().expect("file url present");
    assert!(url.starts_with("memory://evidence/"));
    assert_eq!(evidence.uploads().len(), 1);
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn submit_route_rejects_attachments_over_the_size_limit() {
    let (service, records, _evidence) = build_service();
    let router = complaint_router(service);

    let mut body = submission_body();
    body["attachment"] = json!({
        "fileName": "dump.bin",
        "data": BASE64_STANDARD.encode(vec![0u8; crate::workflows::complaints::MAX_EVIDENCE_BYTES + 1]),
    });

    let response = router
        .oneshot(post_complaint(&body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(records.len(), 0);
}

#[tokio::test]
async fn submit_route_rejects_malformed_base64() {
    let (service, _records, _evidence) = build_service();
    let router = complaint_router(service);

    let mut body = submission_body();
    body["attachment"] = json!({
        "fileName": "scan.png",
        "data": "&&& not base64 &&&",
    });

    let response = router
        .oneshot(post_complaint(&body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn track_route_returns_the_timeline_for_stored_complaints() {
    let (service, records, _evidence) = build_service();
    let id = records.seed(record_with_status(ComplaintStatus::Investigating));
    let router = complaint_router(service);

    let response = router
        .oneshot(
            Request::get(format!("/api/v1/complaints/{id}"))
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["record"]["status"], "Investigating");
    let entries = payload["timeline"]["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[2]["mark"], "reached");
    assert_eq!(entries[2]["date"], "In Progress");
}

#[tokio::test]
async fn track_route_returns_not_found_for_unknown_ids() {
    let (service, _records, _evidence) = build_service();
    let router = complaint_router(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/complaints/nonexistent")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "no complaint found with that ID");
}

#[tokio::test]
async fn track_route_surfaces_store_outages_as_service_unavailable() {
    let service = Arc::new(ComplaintIntakeService::new(
        Arc::new(UnavailableComplaintStore),
        Arc::new(MemoryEvidenceStore::default()),
        catalog(),
    ));
    let router = complaint_router(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/complaints/cmp-000001")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn receipt_route_renders_plain_text() {
    let (service, records, _evidence) = build_service();
    let id = records.seed(record_with_status(ComplaintStatus::Received));
    let router = complaint_router(service);

    let response = router
        .oneshot(
            Request::get(format!("/api/v1/complaints/{id}/receipt"))
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .expect("content type set");
    assert!(content_type.starts_with("text/plain"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let text = String::from_utf8(bytes.to_vec()).expect("utf8 body");
    assert!(text.starts_with("VOTING COMPLAINT RECEIPT"));
    assert!(text.contains(&format!("Complaint ID: {id}")));
}
