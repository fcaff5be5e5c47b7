//! Staging buffer for one composition's member list
//!
//! A draft is what the operator edits between opening a composition and
//! saving it. It never holds two entries for the same feed item and never
//! holds a weight the store would refuse. The total is recomputed on every read.

use rust_decimal::Decimal;

use crate::models::{total_weight, Composition, CompositionMember, FeedItem};
use crate::types::{CompositionId, FeedItemId};
use crate::validation::{validate_weight, ValidationError};

/// Uncommitted member list for a single composition
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionDraft {
    composition_id: CompositionId,
    members: Vec<CompositionMember>,
}

impl CompositionDraft {
    /// Start a draft from the composition's saved members
    ///
    /// Saved data is trusted to satisfy the invariants; a repeated feed item
    /// keeps its first entry.
    pub fn from_composition(composition: &Composition) -> Self {
        let mut draft = Self::empty(composition.id);
        for member in &composition.members {
            if !draft.contains(member.feed_item_id) {
                draft.members.push(member.clone());
            }
        }
        draft
    }

    pub fn empty(composition_id: CompositionId) -> Self {
        Self {
            composition_id,
            members: Vec::new(),
        }
    }

    pub fn composition_id(&self) -> CompositionId {
        self.composition_id
    }

    pub fn members(&self) -> &[CompositionMember] {
        &self.members
    }

    pub fn into_members(self) -> Vec<CompositionMember> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, feed_item_id: FeedItemId) -> bool {
        self.members.iter().any(|m| m.feed_item_id == feed_item_id)
    }

    pub fn weight_of(&self, feed_item_id: FeedItemId) -> Option<Decimal> {
        self.members
            .iter()
            .find(|m| m.feed_item_id == feed_item_id)
            .map(|m| m.weight_kg)
    }

    /// Append a feed item with zero weight. Returns `false` if it is already present.
    pub fn add_member(&mut self, feed_item: &FeedItem) -> bool {
        self.add_feed_item_id(feed_item.id)
    }

    /// Same as [`add_member`](Self::add_member) when only the id is at hand
    pub fn add_feed_item_id(&mut self, feed_item_id: FeedItemId) -> bool {
        if self.contains(feed_item_id) {
            return false;
        }
        self.members
            .push(CompositionMember::new(feed_item_id, Decimal::ZERO));
        true
    }

    /// Set a member's weight. Returns `Ok(false)` if the feed item is not in the draft.
    pub fn set_weight(
        &mut self,
        feed_item_id: FeedItemId,
        weight_kg: Decimal,
    ) -> Result<bool, ValidationError> {
        validate_weight(feed_item_id, weight_kg)?;
        match self
            .members
            .iter_mut()
            .find(|m| m.feed_item_id == feed_item_id)
        {
            Some(member) => {
                member.weight_kg = weight_kg;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a member. Returns `false` if it was not present.
    pub fn remove_member(&mut self, feed_item_id: FeedItemId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.feed_item_id != feed_item_id);
        self.members.len() != before
    }

    /// Sum of the buffered weights
    pub fn total_weight_kg(&self) -> Decimal {
        total_weight(&self.members)
    }

    /// Feed items from `catalog` that can still be added
    pub fn available<'a>(&self, catalog: &'a [FeedItem]) -> Vec<&'a FeedItem> {
        catalog
            .iter()
            .filter(|item| !self.contains(item.id))
            .collect()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::validation::validate_members;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Add(FeedItemId),
        Remove(FeedItemId),
        SetWeight(FeedItemId, Decimal),
    }

    /// Weights at 0.1 g resolution, some negative and some finer than a gram
    fn weight_strategy() -> impl Strategy<Value = Decimal> {
        (-10_000i64..=100_000_000i64).prop_map(|n| Decimal::new(n, 4))
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i64..=6).prop_map(Op::Add),
            (1i64..=6).prop_map(Op::Remove),
            ((1i64..=6), weight_strategy()).prop_map(|(id, w)| Op::SetWeight(id, w)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any edit sequence leaves a storable, duplicate-free list whose
        /// total is the sum of its weights
        #[test]
        fn prop_draft_stays_storable(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut draft = CompositionDraft::empty(1);
            for op in ops {
                match op {
                    Op::Add(id) => {
                        let was_present = draft.contains(id);
                        prop_assert_eq!(draft.add_feed_item_id(id), !was_present);
                    }
                    Op::Remove(id) => {
                        draft.remove_member(id);
                        prop_assert!(!draft.contains(id));
                    }
                    Op::SetWeight(id, weight) => {
                        let before = draft.weight_of(id);
                        match draft.set_weight(id, weight) {
                            Ok(true) => prop_assert_eq!(draft.weight_of(id), Some(weight)),
                            Ok(false) => prop_assert!(before.is_none()),
                            Err(_) => prop_assert_eq!(draft.weight_of(id), before),
                        }
                    }
                }
            }

            prop_assert!(validate_members(draft.members()).is_ok());
            let sum: Decimal = draft.members().iter().map(|m| m.weight_kg).sum();
            prop_assert_eq!(draft.total_weight_kg(), sum);
        }
    }
}
