//! Persistence port for compositions and the feed catalog

mod http;
mod memory;

use async_trait::async_trait;

use shared::{Composition, CompositionId, CompositionMember, CompositionSummary, FeedItem};

use crate::error::ClientResult;

pub use http::HttpCompositionStore;
pub use memory::InMemoryCompositionStore;

/// Where compositions live
///
/// Ids are always assigned by the store. Writes are all-or-nothing: a failed
/// call leaves the stored composition unchanged.
#[async_trait]
pub trait CompositionStore: Send + Sync {
    /// All compositions, id and name only
    async fn list_compositions(&self) -> ClientResult<Vec<CompositionSummary>>;

    /// One composition with its members; `NotFound` if the id is unknown
    async fn get_composition(&self, id: CompositionId) -> ClientResult<Composition>;

    /// Create an empty composition
    async fn create_composition(&self, name: &str) -> ClientResult<Composition>;

    /// Replace the composition's name and whole member list
    async fn replace_composition(
        &self,
        id: CompositionId,
        name: &str,
        members: &[CompositionMember],
    ) -> ClientResult<Composition>;

    /// Change the name only, members untouched
    async fn rename_composition(&self, id: CompositionId, name: &str) -> ClientResult<Composition>;

    /// Feed catalog used to pick members
    async fn list_feed_items(&self) -> ClientResult<Vec<FeedItem>>;
}
