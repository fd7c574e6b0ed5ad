use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryComplaintStore, InMemoryEvidenceStore};
use crate::routes::with_complaint_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use civic_complaints::config::AppConfig;
use civic_complaints::error::AppError;
use civic_complaints::telemetry;
use civic_complaints::workflows::complaints::{ComplaintIntakeService, ComplaintTypeCatalog};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let records = Arc::new(InMemoryComplaintStore::default());
    let evidence = Arc::new(InMemoryEvidenceStore::default());
    let intake_service = Arc::new(ComplaintIntakeService::new(
        records,
        evidence,
        ComplaintTypeCatalog::standard(),
    ));

    let app = with_complaint_routes(intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "complaint intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
