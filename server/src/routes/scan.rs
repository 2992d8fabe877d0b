//! The scan endpoint.

use crate::app::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use schemascan_audit::{ScanError, ScanReport};
use serde::{Deserialize, Serialize};

/// Request body for `POST /scan`.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Absolute URL of the page to audit
    pub url: String,
}

/// Structured error payload returned on every failure path.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Run a full scan of one URL.
pub async fn scan_handler(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanReport>, ApiError> {
    let report = state.orchestrator.scan(&request.url).await?;
    Ok(Json(report))
}

/// Scan failure mapped to an HTTP response.
///
/// Fetch failures are client errors ("bad target site"); analysis failures
/// are server errors ("analysis backend unavailable") so callers can tell
/// the two apart.
#[derive(Debug)]
pub struct ApiError(ScanError);

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            ScanError::InvalidUrl { .. } | ScanError::Fetch(_) => StatusCode::BAD_REQUEST,
            ScanError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.0.to_string();

        if status.is_server_error() {
            tracing::error!(%detail, "scan failed");
        } else {
            tracing::warn!(%detail, "scan rejected");
        }

        (status, Json(ErrorBody { detail })).into_response()
    }
}
