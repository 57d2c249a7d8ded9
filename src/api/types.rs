//! API response, query and error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::{Phase, Verdict};
use crate::error::GridError;
use crate::grid::cascade::CascadeSnapshot;
use crate::grid::types::{GridNode, PowerLine};

/// Full grid view: topology plus simulator overlay.
#[derive(Debug, Serialize)]
pub struct GridResponse {
    /// All nodes.
    pub nodes: Vec<GridNode>,
    /// All lines.
    pub lines: Vec<PowerLine>,
    /// Current cascade state.
    pub cascade: CascadeSnapshot,
}

/// One node with its simulated failure flag.
#[derive(Debug, Serialize)]
pub struct NodeResponse {
    /// Node record.
    pub node: GridNode,
    /// Whether the cascade simulator marks it failed.
    pub simulated_failure: bool,
}

/// Result of a cascade trigger.
#[derive(Debug, Serialize)]
pub struct CascadeResponse {
    /// `started`, `not_critical` or `busy`.
    pub outcome: &'static str,
    /// Simulator state after the request.
    pub state: CascadeSnapshot,
}

/// Query parameters for the diagnostics endpoint.
#[derive(Debug, Deserialize)]
pub struct DiagnosticsQuery {
    /// Asset label.
    pub asset: Option<String>,
    /// Uploaded file label.
    pub file: Option<String>,
    /// Verdict seed override.
    pub seed: Option<u64>,
}

/// Phases and verdict of a diagnostics run.
#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    /// Progress phases the client animates through.
    pub phases: Vec<Phase>,
    /// Revealed verdict.
    pub verdict: Verdict,
}

/// Query parameters for the share endpoint.
#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    /// Page path to share.
    pub path: String,
}

/// LAN link and QR image for a page.
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    /// Page URL on the local network.
    pub url: String,
    /// QR-code image URL encoding `url`.
    pub qr_image_url: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Errors returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),
    /// Id already taken.
    #[error("{0}")]
    Conflict(String),
    /// Input failed validation.
    #[error("{0}")]
    Unprocessable(String),
    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GridError> for ApiError {
    fn from(e: GridError) -> Self {
        match e {
            GridError::DuplicateNode(_) => Self::Conflict(e.to_string()),
            GridError::UnknownNode(_) => Self::NotFound(e.to_string()),
            GridError::InvalidNode { .. } => Self::Unprocessable(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_errors_map_to_status_codes() {
        let dup: ApiError = GridError::DuplicateNode("A".into()).into();
        assert_eq!(dup.status_code(), StatusCode::CONFLICT);
        let unknown: ApiError = GridError::UnknownNode("A".into()).into();
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
        let invalid: ApiError = GridError::InvalidNode {
            id: "A".into(),
            field: "health",
            message: "must be in [0, 100]".into(),
        }
        .into();
        assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
