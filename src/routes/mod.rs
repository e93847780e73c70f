//! Route modules for Citeline Server

pub mod citations;
pub mod health;
pub mod shares;
pub mod viewer;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Full API router, without transport layers
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1/health", health::router())
        .nest("/api/v1/citations", citations::router())
        .nest("/api/v1/shares", shares::router())
        .nest("/api/v1/viewer", viewer::router())
        .with_state(state)
}
