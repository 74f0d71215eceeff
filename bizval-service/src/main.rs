//! bizval-service entry point.

use anyhow::Result;
use bizval_common::config::Config;
use bizval_common::logging::init_logging_with_exclusions;
use bizval_service::{build_router, AppState};
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> Result<()> {
    let startup_start = std::time::Instant::now();

    let config = Config::load_and_validate()?;
    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    tracing::info!("Bizval Service v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(&config)?;
    tracing::info!(
        notifier = state.notifier.name(),
        default_currency = %state.default_currency,
        max_records = config.storage.max_records,
        "Application state ready"
    );

    // Build router with CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(state).layer(cors);

    let addr = config.listen_address();

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
