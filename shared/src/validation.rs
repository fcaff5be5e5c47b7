//! Validation utilities for feed compositions
//!
//! The same rules run in the browser bindings, in the editor client before any
//! network call, and in the backend before anything reaches the database.

use std::collections::HashSet;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::CompositionMember;
use crate::types::FeedItemId;

/// Maximum length of a composition name
pub const MAX_COMPOSITION_NAME_LEN: usize = 120;

/// Decimal places stored for a weight (grams)
pub const MAX_WEIGHT_SCALE: u32 = 3;

/// Weights must stay below this many kilograms (`NUMERIC(12, 3)`)
pub const MAX_WEIGHT_KG: i64 = 1_000_000_000;

/// Rule violations shared by every layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Composition name cannot be empty")]
    EmptyName,

    #[error("Composition name must be at most 120 characters")]
    NameTooLong,

    #[error("Weight for feed item {0} cannot be negative")]
    NegativeWeight(FeedItemId),

    #[error("Weight for feed item {0} can have at most 3 decimal places")]
    WeightTooPrecise(FeedItemId),

    #[error("Weight for feed item {0} must be less than 1000000000 kg")]
    WeightTooLarge(FeedItemId),

    #[error("Feed item {0} appears more than once")]
    DuplicateMember(FeedItemId),
}

impl ValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyName | ValidationError::NameTooLong => "name",
            ValidationError::NegativeWeight(_)
            | ValidationError::WeightTooPrecise(_)
            | ValidationError::WeightTooLarge(_)
            | ValidationError::DuplicateMember(_) => "members",
        }
    }
}

/// Validate a composition name and return it trimmed
pub fn validate_composition_name(name: &str) -> Result<&str, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if trimmed.chars().count() > MAX_COMPOSITION_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    Ok(trimmed)
}

/// Validate a member weight (kg): non-negative, gram precision, below the column limit
pub fn validate_weight(feed_item_id: FeedItemId, weight_kg: Decimal) -> Result<(), ValidationError> {
    if weight_kg < Decimal::ZERO {
        return Err(ValidationError::NegativeWeight(feed_item_id));
    }
    // 1.500 and 1.5 are the same weight
    if weight_kg.normalize().scale() > MAX_WEIGHT_SCALE {
        return Err(ValidationError::WeightTooPrecise(feed_item_id));
    }
    if weight_kg >= Decimal::from(MAX_WEIGHT_KG) {
        return Err(ValidationError::WeightTooLarge(feed_item_id));
    }
    Ok(())
}

/// Validate a full member list: valid weights, one entry per feed item
pub fn validate_members(members: &[CompositionMember]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        validate_weight(member.feed_item_id, member.weight_kg)?;
        if !seen.insert(member.feed_item_id) {
            return Err(ValidationError::DuplicateMember(member.feed_item_id));
        }
    }
    Ok(())
}
