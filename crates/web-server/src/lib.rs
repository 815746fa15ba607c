//! # Meridian Web Server
//!
//! The thin HTTP surface over the engine: simulation lifecycle, manual
//! trades, on-demand processing, and the force-sweep hook. All marshaling
//! lives in `handlers`; behavior belongs to the engine.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use engine::{SimulationProcessor, SimulationService, Sweeper};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SimulationService>,
    pub processor: Arc<SimulationProcessor>,
    pub sweeper: Arc<Sweeper>,
}

/// Builds the application router with all routes and middleware attached.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/simulations", post(handlers::create_simulation))
        .route("/api/simulations/:id", get(handlers::get_simulation))
        .route("/api/simulations/:id", patch(handlers::update_simulation))
        .route("/api/simulations/:id/pause", post(handlers::pause_simulation))
        .route("/api/simulations/:id/resume", post(handlers::resume_simulation))
        .route("/api/simulations/:id/stop", post(handlers::stop_simulation))
        .route("/api/simulations/:id/trades", get(handlers::get_simulation_trades))
        .route("/api/simulations/:id/trades", post(handlers::execute_manual_trade))
        .route("/api/simulations/:id/process", post(handlers::process_simulation))
        .route("/api/users/:user_id/simulations", get(handlers::get_user_simulations))
        .route("/api/users/:user_id/trades", get(handlers::get_user_trades))
        .route("/api/sweep", post(handlers::force_sweep))
        .with_state(Arc::new(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Binds and serves the API until the process exits.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    tracing::info!("web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
