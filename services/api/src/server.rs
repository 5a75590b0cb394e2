use crate::cli::ServeArgs;
use crate::infra::{
    sample_catalog, sample_reviewers, AppState, InMemoryAssignmentStore,
    InMemoryReviewerDirectory, InMemoryTaskSource, LoggingReviewerNotifier,
};
use crate::routes::with_assignment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use medreview_ai::config::AppConfig;
use medreview_ai::error::AppError;
use medreview_ai::telemetry;
use medreview_ai::workflows::reviews::assignments::ReviewAssignmentService;
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

    let directory = Arc::new(InMemoryReviewerDirectory::new(sample_reviewers()));
    let tasks = Arc::new(InMemoryTaskSource::new(sample_catalog()));
    let store = Arc::new(InMemoryAssignmentStore::default());
    let notifier = Arc::new(LoggingReviewerNotifier);
    let assignment_service = Arc::new(ReviewAssignmentService::new(
        directory, tasks, store, notifier,
    ));

    let app = with_assignment_routes(assignment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_strategy = config.assignments.default_strategy.as_str(),
        "review assignment engine ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
