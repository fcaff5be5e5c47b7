//! HTTP handlers for the feed catalog

use axum::{extract::State, Json};

use shared::FeedItem;

use crate::error::AppResult;
use crate::services::FeedService;
use crate::AppState;

/// List catalog feed items
pub async fn list_feed_items(State(state): State<AppState>) -> AppResult<Json<Vec<FeedItem>>> {
    let service = FeedService::new(state.db);
    let items = service.list_feed_items().await?;
    Ok(Json(items))
}
