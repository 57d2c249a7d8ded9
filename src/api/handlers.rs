//! Request handlers for the API endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use rand::Rng;

use super::AppState;
use super::types::{
    ApiError, CascadeResponse, DiagnosticsQuery, DiagnosticsResponse, GridResponse, NodeResponse,
    ShareQuery, ShareResponse,
};
use crate::diagnostics::{
    DiagnosticRequest, DiagnosticsRun, request_diagnosis, standard_phases, take_target,
};
use crate::grid::cascade::{CascadeSnapshot, TriggerOutcome};
use crate::grid::topology::TopologySummary;
use crate::ingest::{self, NodeDraft};
use crate::map::svg::{FailureOverlay, render_svg};
use crate::qr;
use crate::routes::{Route, RouteInfo, route_table};

/// `GET /api/grid` → nodes, lines and cascade state.
pub async fn get_grid(State(state): State<Arc<AppState>>) -> Json<GridResponse> {
    let mut grid = state.grid();
    grid.cascade.tick(Instant::now());
    Json(GridResponse {
        nodes: grid.topology.nodes().to_vec(),
        lines: grid.topology.lines().to_vec(),
        cascade: grid.cascade.snapshot(),
    })
}

/// `GET /api/grid/summary` → aggregate counts.
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<TopologySummary> {
    Json(state.grid().topology.summary())
}

/// `GET /api/grid/nodes/{id}` → 200 + node, or 404.
pub async fn get_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NodeResponse>, ApiError> {
    let grid = state.grid();
    let node = grid
        .topology
        .node(&id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("unknown node id \"{id}\"")))?;
    Ok(Json(NodeResponse {
        simulated_failure: grid.cascade.is_node_failed(&id),
        node,
    }))
}

/// `POST /api/grid/nodes` → 201 + node, 409 on duplicate id, 422 on invalid fields.
pub async fn post_node(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<NodeDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let mut guard = state.grid();
    let grid = &mut *guard;
    let node = ingest::submit(
        &mut grid.topology,
        &mut grid.handoff,
        draft,
        &state.config.grid.region,
    )?;
    Ok((StatusCode::CREATED, Json(node)))
}

/// `POST /api/grid/cascade/{id}` → 200 + outcome, or 404 for an unknown node.
///
/// Non-critical nodes and requests made while a run is analyzing leave the
/// state unchanged.
pub async fn post_cascade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CascadeResponse>, ApiError> {
    let now = Instant::now();
    let mut guard = state.grid();
    let grid = &mut *guard;
    grid.cascade.tick(now);
    let outcome = match grid.cascade.trigger(&grid.topology, &id, now) {
        TriggerOutcome::Started(_) => "started",
        TriggerOutcome::NotCritical(_) => "not_critical",
        TriggerOutcome::Busy => "busy",
        TriggerOutcome::UnknownNode => {
            return Err(ApiError::NotFound(format!("unknown node id \"{id}\"")));
        }
    };
    Ok(Json(CascadeResponse {
        outcome,
        state: grid.cascade.snapshot(),
    }))
}

/// `POST /api/grid/reset` → cleared cascade state.
pub async fn post_reset(State(state): State<Arc<AppState>>) -> Json<CascadeSnapshot> {
    let mut grid = state.grid();
    grid.cascade.reset();
    Json(grid.cascade.snapshot())
}

/// `GET /api/grid/map.svg` → static map with the cascade overlay.
pub async fn get_map_svg(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let svg = {
        let grid = state.grid();
        let overlay = FailureOverlay::new(grid.cascade.failed_nodes(), grid.cascade.failed_lines());
        render_svg(
            &grid.topology,
            &overlay,
            state.config.map.width,
            state.config.map.height,
        )
    };
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

/// `POST /api/grid/nodes/{id}/diagnose` → 202, queues the node for diagnostics.
pub async fn post_diagnose(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut guard = state.grid();
    let grid = &mut *guard;
    request_diagnosis(&grid.topology, &mut grid.handoff, &id)?;
    Ok(StatusCode::ACCEPTED)
}

/// `GET /api/diagnostics?asset=&file=&seed=` → phases and verdict.
///
/// Without `asset`, a node queued from the grid view is used.
pub async fn get_diagnostics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DiagnosticsQuery>,
) -> Result<Json<DiagnosticsResponse>, ApiError> {
    let seed = query
        .seed
        .or(state.config.diagnostics.seed)
        .unwrap_or_else(|| rand::rng().random());
    let asset_id = match query.asset {
        Some(asset) => asset,
        None => take_target(&mut state.grid().handoff)?.unwrap_or_else(|| "unassigned".to_string()),
    };
    let request = DiagnosticRequest {
        asset_id,
        file_name: query.file.unwrap_or_else(|| "sensor_log.csv".to_string()),
    };
    let run = DiagnosticsRun::start(
        request,
        standard_phases(state.config.phase_duration()),
        seed,
        Instant::now(),
    );
    Ok(Json(DiagnosticsResponse {
        phases: run.phases().to_vec(),
        verdict: run.into_verdict(),
    }))
}

/// `GET /api/routes` → page route table.
pub async fn get_routes() -> Json<Vec<RouteInfo>> {
    Json(route_table())
}

/// `GET /api/share?path=/ar-camera` → LAN URL and QR image link, or 404.
pub async fn get_share(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShareQuery>,
) -> Result<Json<ShareResponse>, ApiError> {
    let route = Route::from_path(&query.path)
        .ok_or_else(|| ApiError::NotFound(format!("unknown page \"{}\"", query.path)))?;
    let url = format!(
        "{}{}",
        qr::lan_base_url(&state.lan_ip, state.config.server.port),
        route.path()
    );
    Ok(Json(ShareResponse {
        qr_image_url: qr::qr_image_url(&url, 240),
        url,
    }))
}
