use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApplicationRepository, InMemoryFormRepository};
use crate::routes::with_admissions_routes;
use admissions::config::AppConfig;
use admissions::error::AppError;
use admissions::telemetry;
use admissions::workflows::admissions::AdmissionService;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let applications = Arc::new(InMemoryApplicationRepository::default());
    let forms = Arc::new(InMemoryFormRepository::default());
    let admission_service = Arc::new(AdmissionService::new(
        applications,
        forms,
        config.admissions,
    ));

    let app = with_admissions_routes(admission_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        payment_amount = config.admissions.payment_amount,
        "admissions service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
