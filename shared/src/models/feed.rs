//! Feed catalog models

use serde::{Deserialize, Serialize};

use crate::types::FeedItemId;

/// A feed ingredient from the mill's catalog (maize, soybean meal, ...)
///
/// Reference data: compositions point at feed items but never change them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FeedItem {
    pub id: FeedItemId,
    pub name: String,
}

impl FeedItem {
    pub fn new(id: FeedItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for FeedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}
