use crate::cli::ServeArgs;
use crate::infra::{AppState, CatalogSeed, InMemoryCatalogRepository};
use crate::routes::with_catalog_routes;
use affiliate_ranker::affiliate::catalog::CatalogQueryService;
use affiliate_ranker::config::AppConfig;
use affiliate_ranker::error::AppError;
use affiliate_ranker::telemetry;
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
    if let Some(seed) = args.seed.take() {
        config.affiliate.catalog_seed_path = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let seed = match config.affiliate.catalog_seed_path.as_deref() {
        Some(path) => {
            let seed = CatalogSeed::from_path(path)?;
            info!(
                path = %path.display(),
                products = seed.products.len(),
                links = seed.links.len(),
                "catalog seed loaded"
            );
            seed
        }
        None => CatalogSeed::default(),
    };

    let repository = Arc::new(InMemoryCatalogRepository::from_seed(seed));
    let catalog_service = Arc::new(CatalogQueryService::new(
        repository,
        config.affiliate.fallback_settings.clone(),
    ));

    let app = with_catalog_routes(catalog_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        strategy = %config.affiliate.fallback_settings.strategy,
        "affiliate catalog service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
