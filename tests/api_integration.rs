//! End-to-end tests for the REST API routes.
#![cfg(feature = "api")]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use gridmind::api::{AppState, GridState, router};
use gridmind::config::AppConfig;
use gridmind::grid::dataset::sample_topology;
use gridmind::handoff::{Handoff, INGESTED_NODE_KEY};

fn app_state(config: AppConfig) -> Arc<AppState> {
    let grid = GridState {
        topology: sample_topology(),
        cascade: config.cascade_simulator(),
        handoff: Handoff::in_memory(),
    };
    Arc::new(AppState::new(config, "10.0.0.7".to_string(), grid))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");
    let resp = app.clone().oneshot(req).await.expect("infallible service");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn cascade_lifecycle_over_http() {
    let app = router(app_state(AppConfig::demo()));

    let (status, body) = send(&app, "POST", "/api/grid/cascade/KHD-T-002", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "started");
    assert_eq!(body["state"]["failed_nodes"], json!(["KHD-SUB-001", "KHD-T-004"]));
    assert_eq!(body["state"]["failed_lines"], json!(["L002", "L005"]));
    assert_eq!(body["state"]["analyzing"], true);

    let (_, body) = send(&app, "POST", "/api/grid/cascade/KHD-T-005", None).await;
    assert_eq!(body["outcome"], "busy");
    assert_eq!(body["state"]["origin"], "KHD-T-002");

    let (_, node) = send(&app, "GET", "/api/grid/nodes/KHD-SUB-001", None).await;
    assert_eq!(node["simulated_failure"], true);
    assert_eq!(node["node"]["status"], "healthy");

    let (status, body) = send(&app, "POST", "/api/grid/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["failed_nodes"], json!([]));
    assert_eq!(body["analyzing"], false);
}

#[tokio::test]
async fn cascade_on_healthy_or_unknown_node() {
    let app = router(app_state(AppConfig::demo()));

    let (status, body) = send(&app, "POST", "/api/grid/cascade/KHD-SUB-001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "not_critical");
    assert_eq!(body["state"]["failed_nodes"], json!([]));

    let (status, body) = send(&app, "POST", "/api/grid/cascade/NOPE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("NOPE")));
}

#[tokio::test]
async fn node_ingestion_statuses() {
    let state = app_state(AppConfig::demo());
    let app = router(Arc::clone(&state));
    let draft = json!({
        "id": "KHD-T-030",
        "name": "Tangi Transformer",
        "lat": 20.39,
        "lng": 85.45,
        "health": 61,
        "connections": ["KHD-T-004"]
    });

    let (status, body) = send(&app, "POST", "/api/grid/nodes", Some(draft.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "warning");
    assert_eq!(body["region"], "khordha");
    assert!(state.grid().handoff.contains(INGESTED_NODE_KEY));

    let (status, _) = send(&app, "POST", "/api/grid/nodes", Some(draft)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let bad = json!({ "id": "KHD-T-031", "name": "", "lat": 20.0, "lng": 85.0 });
    let (status, _) = send(&app, "POST", "/api/grid/nodes", Some(bad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, summary) = send(&app, "GET", "/api/grid/summary", None).await;
    assert_eq!(summary["node_count"], 9);
}

#[tokio::test]
async fn diagnostics_are_seed_deterministic() {
    let app = router(app_state(AppConfig::field()));
    let uri = "/api/diagnostics?asset=KHD-T-002&file=dga.csv&seed=9";

    let (status, first) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = send(&app, "GET", uri, None).await;
    assert_eq!(first["verdict"], second["verdict"]);
    assert_eq!(first["phases"].as_array().map(Vec::len), Some(5));
    assert_eq!(first["verdict"]["asset_id"], "KHD-T-002");
}

#[tokio::test]
async fn routes_and_share() {
    let app = router(app_state(AppConfig::demo()));

    let (status, routes) = send(&app, "GET", "/api/routes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(routes.as_array().map(Vec::len), Some(8));
    assert_eq!(routes[0]["path"], "/");

    let (status, _) = send(&app, "GET", "/api/share?path=/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, share) = send(&app, "GET", "/api/share?path=/grid-command", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(share["url"], "http://10.0.0.7:3000/grid-command");
}

#[tokio::test]
async fn grid_view_queues_asset_for_diagnostics() {
    let app = router(app_state(AppConfig::demo()));

    let (status, _) = send(&app, "POST", "/api/grid/nodes/KHD-T-005/diagnose", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let (status, _) = send(&app, "POST", "/api/grid/nodes/NOPE/diagnose", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, first) = send(&app, "GET", "/api/diagnostics?seed=1", None).await;
    assert_eq!(first["verdict"]["asset_id"], "KHD-T-005");
    let (_, second) = send(&app, "GET", "/api/diagnostics?seed=1", None).await;
    assert_eq!(second["verdict"]["asset_id"], "unassigned");
}
