//! Common types used across the workspace

/// Store-assigned composition id
pub type CompositionId = i64;

/// Catalog id of a feed item
pub type FeedItemId = i64;
