//! Request handlers for the three GET endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::config::{ASSET_TAB, CACHE_TTL_SECS};
use crate::error::SheetError;
use crate::grid::Grid;
use crate::parse::extract;

use super::server::AppState;

/// JSON body for non-2xx responses.
#[derive(Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Route-boundary error: upstream failures map to 502, everything else
/// (decode, unexpected) to 500. Soft parse conditions never reach here.
pub struct ApiError(SheetError);

impl From<SheetError> for ApiError {
    fn from(err: SheetError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        tracing::error!(%status, error = %self.0, "request failed");
        (
            status,
            Json(ErrorBody {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

fn cache_header() -> [(header::HeaderName, String); 1] {
    [(header::CACHE_CONTROL, format!("max-age={CACHE_TTL_SECS}"))]
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub msg: String,
}

/// GET / - capability message
pub async fn root() -> impl IntoResponse {
    Json(RootResponse {
        msg: "IVDAR Sheet API: /data (raw Sheet1 dump), /assets (parsed assets + meta)"
            .to_string(),
    })
}

/// GET /data - raw row dump of the asset tab, for debugging
pub async fn data(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let book = state.source.workbook().await?;
    let rows = book.tab(ASSET_TAB).map(Grid::to_records).unwrap_or_default();
    Ok((cache_header(), Json(rows)))
}

/// GET /assets - cleaned asset records plus the metadata block
pub async fn assets(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let book = state.source.workbook().await?;
    Ok((cache_header(), Json(extract(&book))))
}
