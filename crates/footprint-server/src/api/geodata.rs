use axum::{extract::State, response::IntoResponse, Extension, Json};
use footprint_pipeline::StoreError;

use super::{ApiError, AppState};
use crate::middleware::RequestId;

/// Serves the geodata artifact exactly as stored.
pub(super) async fn get_geodata(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<impl IntoResponse, ApiError> {
    match state.store.read().await {
        Ok(json) => Ok(Json(json)),
        Err(StoreError::Missing(path)) => {
            tracing::warn!(path = %path.display(), "geodata requested before it was built");
            Err(ApiError::new(req_id.0, "not_found", "geodata file not found"))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to read geodata");
            Err(ApiError::new(
                req_id.0,
                "internal_error",
                "geodata file could not be read",
            ))
        }
    }
}
