//! Feed composition models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CompositionId, FeedItemId};

/// One feed item and its weight inside a composition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositionMember {
    pub feed_item_id: FeedItemId,
    /// Weight in kilograms, never negative
    #[serde(with = "rust_decimal::serde::float")]
    pub weight_kg: Decimal,
}

impl CompositionMember {
    pub fn new(feed_item_id: FeedItemId, weight_kg: Decimal) -> Self {
        Self {
            feed_item_id,
            weight_kg,
        }
    }
}

/// A named feed recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub id: CompositionId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<CompositionMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Composition {
    /// Total weight of all members. Derived, never stored.
    pub fn total_weight_kg(&self) -> Decimal {
        total_weight(&self.members)
    }

    pub fn member(&self, feed_item_id: FeedItemId) -> Option<&CompositionMember> {
        self.members.iter().find(|m| m.feed_item_id == feed_item_id)
    }

    pub fn summary(&self) -> CompositionSummary {
        CompositionSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Picker entry: id and name only, members are loaded on selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompositionSummary {
    pub id: CompositionId,
    pub name: String,
}

/// Body of `POST /compositions` and `PATCH /compositions/{id}/name`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionNameInput {
    pub name: String,
}

/// Body of `PUT /compositions/{id}`: replaces the member list wholesale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceCompositionInput {
    pub name: String,
    pub members: Vec<CompositionMember>,
}

/// Sum of member weights
pub fn total_weight(members: &[CompositionMember]) -> Decimal {
    members.iter().map(|m| m.weight_kg).sum()
}
