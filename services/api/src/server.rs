use crate::cli::ServeArgs;
use crate::infra::{build_services, seed_demo_data, AppState, Stores};
use crate::routes::portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use seminar_portal::config::AppConfig;
use seminar_portal::error::AppError;
use seminar_portal::telemetry;
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

    let stores = Stores::new();
    let services = build_services(&stores, config.attachments.clone());
    seed_demo_data(&stores, &services)?;

    let app = portal_routes(&services)
        .layer(Extension(app_state))
        .layer(Extension(services.sessions.clone()))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "seminar registration portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
