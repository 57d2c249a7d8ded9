//! REST API over the grid store, cascade simulator and diagnostics.
//!
//! Grid endpoints:
//! - `GET /api/grid` — nodes, lines and cascade state
//! - `GET /api/grid/summary` — aggregate counts
//! - `GET /api/grid/nodes/{id}` — one node
//! - `POST /api/grid/nodes` — ingest a node draft
//! - `POST /api/grid/nodes/{id}/diagnose` — queue a node for diagnostics
//! - `POST /api/grid/cascade/{id}` — simulate a cascade from a critical node
//! - `POST /api/grid/reset` — clear the cascade
//! - `GET /api/grid/map.svg` — static map
//!
//! Other endpoints: `GET /api/diagnostics`, `GET /api/routes`, `GET /api/share`.

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::config::AppConfig;
use crate::grid::cascade::CascadeSimulator;
use crate::grid::topology::GridTopology;
use crate::handoff::Handoff;

pub use types::{ApiError, ErrorResponse};

/// Mutable grid state behind the API.
pub struct GridState {
    /// Canonical topology.
    pub topology: GridTopology,
    /// Cascade overlay.
    pub cascade: CascadeSimulator,
    /// Cross-page handoff channel.
    pub handoff: Handoff,
}

/// Application state shared across all request handlers.
///
/// Configuration is read-only; the grid is behind a mutex since ingestion
/// and cascade requests mutate it in place.
pub struct AppState {
    /// Loaded configuration.
    pub config: AppConfig,
    /// LAN address advertised by the share endpoint.
    pub lan_ip: String,
    grid: Mutex<GridState>,
}

impl AppState {
    /// Wraps grid state for sharing between handlers.
    pub fn new(config: AppConfig, lan_ip: String, grid: GridState) -> Self {
        Self {
            config,
            lan_ip,
            grid: Mutex::new(grid),
        }
    }

    /// Locks the grid, recovering from a poisoned lock.
    pub fn grid(&self) -> MutexGuard<'_, GridState> {
        self.grid.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/grid", get(handlers::get_grid))
        .route("/api/grid/summary", get(handlers::get_summary))
        .route("/api/grid/nodes", post(handlers::post_node))
        .route("/api/grid/nodes/{id}", get(handlers::get_node))
        .route("/api/grid/nodes/{id}/diagnose", post(handlers::post_diagnose))
        .route("/api/grid/cascade/{id}", post(handlers::post_cascade))
        .route("/api/grid/reset", post(handlers::post_reset))
        .route("/api/grid/map.svg", get(handlers::get_map_svg))
        .route("/api/diagnostics", get(handlers::get_diagnostics))
        .route("/api/routes", get(handlers::get_routes))
        .route("/api/share", get(handlers::get_share))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
