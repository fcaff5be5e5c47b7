//! Route definitions for the feed mill API

use axum::{
    routing::{get, patch},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Feed catalog (read-only)
        .route("/feed-items", get(handlers::list_feed_items))
        // Composition management
        .nest("/compositions", composition_routes())
}

/// Composition routes
fn composition_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_compositions).post(handlers::create_composition),
        )
        .route(
            "/:composition_id",
            get(handlers::get_composition).put(handlers::replace_composition),
        )
        .route("/:composition_id/name", patch(handlers::rename_composition))
}
