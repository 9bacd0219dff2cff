//! Validation endpoint.
//!
//! Routes:
//! - POST /api/v1/validate — validate a JSON payload against a named type

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use typegate_engine::validate::ValidationOutcome;

use crate::error::AppError;
use crate::state::AppState;

/// Request body for the validation endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    #[serde(default)]
    pub schema_name: String,
    /// The document to validate, embedded as-is.
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    /// Optional registry commit or label to resolve the descriptor at.
    #[serde(default)]
    pub commit: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/validate", post(validate))
}

async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidationOutcome>, AppError> {
    if request.schema_name.is_empty() {
        return Err(AppError::BadRequest("schemaName is required".into()));
    }
    let payload = request
        .payload
        .ok_or_else(|| AppError::BadRequest("payload is required".into()))?;
    let payload_bytes = serde_json::to_vec(&payload)
        .map_err(|e| AppError::Internal(format!("failed to re-encode payload: {e}")))?;

    tracing::info!(
        schema_name = %request.schema_name,
        commit = request.commit.as_deref().unwrap_or("main"),
        "processing validation request"
    );

    let outcome = state
        .validation
        .validate(
            &request.schema_name,
            &payload_bytes,
            request.commit.as_deref(),
        )
        .await?;
    Ok(Json(outcome))
}
