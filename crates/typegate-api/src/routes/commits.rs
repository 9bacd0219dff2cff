//! Commit-history endpoint.
//!
//! Routes:
//! - GET /api/v1/commits — one page of a label's revision history

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use typegate_registry_client::commits::CommitPage;

use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 26;

/// Query parameters for the commits endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitsQuery {
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub page_token: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/commits", get(list_commits))
}

async fn list_commits(
    State(state): State<AppState>,
    Query(query): Query<CommitsQuery>,
) -> Result<Json<CommitPage>, AppError> {
    // Page size is validated here, before the registry client is ever
    // invoked — a bad value never costs a network call.
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size <= 0 {
        return Err(AppError::InvalidPageSize);
    }
    let page_size = u32::try_from(page_size).map_err(|_| AppError::InvalidPageSize)?;

    let label = query.label.as_deref().filter(|l| !l.is_empty());
    tracing::info!(
        label = label.unwrap_or("main"),
        page_size,
        "processing commits request"
    );

    let page = state
        .commits
        .list_commits(label, page_size, query.page_token.as_deref())
        .await?;
    Ok(Json(page))
}
