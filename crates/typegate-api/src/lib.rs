//! # typegate-api — Axum API service
//!
//! The transport layer over the typegate engine.
//!
//! ## API Surface
//!
//! | Method | Path                    | Handler                      |
//! |--------|-------------------------|------------------------------|
//! | POST   | `/api/v1/validate`      | [`routes::validate`]         |
//! | GET    | `/api/v1/schema/{name}` | [`routes::schema`]           |
//! | GET    | `/api/v1/types`         | [`routes::schema`]           |
//! | GET    | `/api/v1/commits`       | [`routes::commits`]          |
//! | GET    | `/health`               | liveness probe               |
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers — they validate caller input,
//!   delegate to the engine, and map errors through [`AppError`].
//! - A failed validation is a 200 with `success: false`; only
//!   resolution/decode problems become error statuses.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full application router with all routes and middleware.
///
/// The health probe is mounted alongside the API routes; it needs no
/// state and no credentials.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::validate::router())
        .merge(routes::schema::router())
        .merge(routes::commits::router())
        .with_state(state);

    Router::new()
        .merge(api)
        .route("/health", axum::routing::get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({"status": "ok"}))
}
