use crate::cli::ServeArgs;
use crate::infra::{confirmation_mailer, document_exporter, submission_store, AppState};
use crate::report::load_bank;
use crate::routes::app_routes;
use axum::http::{HeaderValue, Method};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_assessment::config::AppConfig;
use lead_assessment::error::AppError;
use lead_assessment::telemetry;
use lead_assessment::workflows::assessment::AssessmentService;
use lead_assessment::workflows::intake::IntakeService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
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

    let bank = Arc::new(load_bank(config.question_bank_path.as_deref())?);
    info!(
        version = bank.version(),
        age_groups = bank.age_groups().count(),
        "question bank loaded"
    );

    let mut assessment = AssessmentService::new(bank.clone());
    if let Some(exporter) = document_exporter(&config).await? {
        assessment = assessment.with_exporter(exporter);
    }
    let intake = IntakeService::new(
        bank,
        submission_store(&config).await?,
        confirmation_mailer(&config),
    );

    let origin = HeaderValue::from_str(&config.cors_origin)
        .map_err(|err| AppError::Usage(format!("APP_CORS_ORIGIN is not a valid origin: {err}")))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let app = app_routes(Arc::new(assessment), Arc::new(intake))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "math assessment intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
