//! Feed catalog service (read-only)

use sqlx::PgPool;

use shared::FeedItem;

use crate::error::AppResult;

#[derive(Clone)]
pub struct FeedService {
    db: PgPool,
}

impl FeedService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All catalog feed items, ordered by name
    pub async fn list_feed_items(&self) -> AppResult<Vec<FeedItem>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM feed_items ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| FeedItem::new(id, name))
            .collect())
    }
}
