use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::get,
};
use configuration::{AnalysisConfig, Settings};
use dataset::Dataset;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowOrigin, Any as AnyCors, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

use error::AppError;

/// The shared application state that all handlers can access.
///
/// The dataset is built once before the router exists and is never mutated,
/// so handlers read it concurrently through the router's `Arc` without locking.
pub struct AppState {
    pub dataset: Dataset,
    pub analysis: AnalysisConfig,
}

impl AppState {
    pub fn new(dataset: Dataset, analysis: AnalysisConfig) -> Self {
        Self {
            dataset,
            analysis,
        }
    }

    /// Loads every data feed described by the settings.
    pub fn load(settings: &Settings) -> anyhow::Result<Self> {
        let dataset = Dataset::load(&settings.data)?;
        Ok(Self::new(dataset, settings.analysis.clone()))
    }
}

/// Builds the application router with CORS, request tracing and panic recovery.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(AnyCors)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/oil-prices", get(handlers::get_oil_prices))
        .route("/api/events", get(handlers::get_events))
        .route("/api/change-points", get(handlers::get_change_points))
        .route("/api/price-analysis/:event_id", get(handlers::get_price_analysis))
        .route("/api/dashboard-summary", get(handlers::get_dashboard_summary))
        .route("/api/correlation-analysis", get(handlers::get_correlation_analysis))
        .with_state(Arc::new(state))
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

/// Turns a handler panic into the same `{"error": ...}` body as any other failure.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unexpected internal failure".to_string()
    };
    AppError::Internal(message).into_response()
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);

    tracing::info!("Web server listening on http://{}", addr);
    tracing::info!(
        "Endpoints: /api/oil-prices, /api/events, /api/change-points, \
         /api/price-analysis/:event_id, /api/dashboard-summary, /api/correlation-analysis"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
        // Without a signal handler, keep serving until the process is killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
