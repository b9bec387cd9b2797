use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{
    MockDataService, PinVerifier, RsvpDataService, SubmissionSequencer,
};
use persistence::{PgDataService, RestConfig, RestDataService};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::{Config, DataBackend};
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{admin, health, pages, rsvps};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub data_service: Arc<dyn RsvpDataService>,
    pub sequencer: Arc<SubmissionSequencer>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

/// Builds the data service selected by `data_service.backend`.
///
/// The postgres backend applies pending migrations before returning.
pub async fn build_data_service(config: &Config) -> anyhow::Result<Arc<dyn RsvpDataService>> {
    let service: Arc<dyn RsvpDataService> = match config.data_service.backend {
        DataBackend::Rest => {
            let ds = &config.data_service;
            Arc::new(RestDataService::new(RestConfig {
                base_url: ds.url.clone(),
                api_key: ds.api_key.clone(),
                timeout_ms: ds.timeout_ms,
                rsvps_table: ds.rsvps_table.clone(),
                pins_table: ds.pins_table.clone(),
            })?)
        }
        DataBackend::Postgres => {
            let db_config = persistence::db::DatabaseConfig::from(&config.database);
            let pool = persistence::db::create_pool(&db_config).await?;
            info!("Running database migrations...");
            persistence::db::run_migrations(&pool).await?;
            info!("Migrations completed");
            Arc::new(PgDataService::new(pool))
        }
        DataBackend::Memory => {
            tracing::warn!("Using in-memory data service; responses are lost on restart");
            Arc::new(MockDataService::with_active_pins(
                config.pins.allowed.iter().cloned(),
            ))
        }
    };

    info!(backend = service.backend_name(), "Data service ready");
    Ok(service)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

pub fn create_app(config: Config, data_service: Arc<dyn RsvpDataService>) -> Router {
    let config = Arc::new(config);

    let pins = PinVerifier::new(config.pins.source, config.pins.allowed.iter().cloned());
    let sequencer = Arc::new(SubmissionSequencer::new(data_service.clone(), pins));

    let rate_limiter =
        RateLimiterState::new(config.security.submit_rate_limit_per_minute).map(Arc::new);

    let state = AppState {
        config: config.clone(),
        data_service,
        sequencer,
        rate_limiter,
    };

    // Guest submissions, limited per client IP
    let submit_routes = Router::new()
        .route("/api/v1/rsvps", post(rsvps::submit_rsvp))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Admin routes (require admin key)
    let admin_routes = Router::new()
        .route("/api/v1/admin/rsvps", get(admin::list_rsvps))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let page_routes = Router::new()
        .route("/", get(pages::index))
        .route("/admin", get(pages::admin_page))
        .route("/assets/*path", get(pages::asset));

    Router::new()
        .merge(page_routes)
        .merge(public_routes)
        .merge(submit_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config))
        .with_state(state)
}
