use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCollaborators};
use crate::routes::with_account_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use pension_setup::config::AppConfig;
use pension_setup::error::AppError;
use pension_setup::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let collaborators = InMemoryCollaborators::new(&config.background_checks);
    let opening_service = Arc::new(collaborators.service());

    let app = with_account_routes(opening_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_risk_profile = %config.background_checks.risk_profile,
        "account opening service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
