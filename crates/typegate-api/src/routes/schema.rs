//! Schema-bundle and type-listing endpoints.
//!
//! Routes:
//! - GET /api/v1/schema/{name} — the JSON-schema bundle for one type
//! - GET /api/v1/types — enumerate registry types for UI pickers

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use typegate_core::registry::TypeSummary;

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/schema/{name}", get(get_schema))
        .route("/api/v1/types", get(list_types))
}

async fn get_schema(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if name.is_empty() {
        return Err(AppError::BadRequest("type name is required".into()));
    }
    tracing::info!(type_name = %name, "processing schema request");

    // Path extraction already percent-decodes, so encoded dots in the
    // name arrive decoded here.
    let bytes = state.schemas.get_schema(&name).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], bytes))
}

async fn list_types(State(state): State<AppState>) -> Json<Vec<TypeSummary>> {
    let summaries = state.schemas.list_types();
    tracing::info!(count = summaries.len(), "listed registry types");
    Json(summaries)
}
