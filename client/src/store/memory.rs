//! In-memory composition store
//!
//! Behaves like the REST backend (store-assigned ids, name uniqueness,
//! all-or-nothing member replacement) without a network. Used by tests and
//! by tooling that edits compositions offline before an upload.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use shared::{
    validate_composition_name, validate_members, Composition, CompositionId, CompositionMember,
    CompositionSummary, FeedItem,
};

use super::CompositionStore;
use crate::error::{ClientError, ClientResult};

/// Composition store held in process memory
pub struct InMemoryCompositionStore {
    state: Mutex<StoreState>,
}

struct StoreState {
    compositions: BTreeMap<CompositionId, Composition>,
    feed_items: Vec<FeedItem>,
    /// Last id handed out. Ids are never reused.
    last_id: CompositionId,
}

impl StoreState {
    fn find(&self, id: CompositionId) -> ClientResult<&Composition> {
        self.compositions
            .get(&id)
            .ok_or_else(|| ClientError::NotFound(format!("Composition {}", id)))
    }

    fn ensure_unique_name(&self, name: &str, except: Option<CompositionId>) -> ClientResult<()> {
        let key = name.to_lowercase();
        let taken = self
            .compositions
            .values()
            .any(|c| Some(c.id) != except && c.name.to_lowercase() == key);
        if taken {
            return Err(ClientError::Conflict(format!(
                "A composition named {} already exists",
                name
            )));
        }
        Ok(())
    }

    fn ensure_known_feed_items(&self, members: &[CompositionMember]) -> ClientResult<()> {
        for member in members {
            if !self.feed_items.iter().any(|f| f.id == member.feed_item_id) {
                return Err(ClientError::validation(
                    "members",
                    format!("Feed item {} does not exist", member.feed_item_id),
                ));
            }
        }
        Ok(())
    }
}

impl InMemoryCompositionStore {
    /// Empty store with the given feed catalog
    pub fn new(feed_items: Vec<FeedItem>) -> Self {
        Self::with_compositions(feed_items, Vec::new())
    }

    /// Store pre-loaded with compositions; the id sequence continues after the highest id
    pub fn with_compositions(feed_items: Vec<FeedItem>, compositions: Vec<Composition>) -> Self {
        let last_id = compositions.iter().map(|c| c.id).max().unwrap_or(0);
        let compositions = compositions.into_iter().map(|c| (c.id, c)).collect();
        Self {
            state: Mutex::new(StoreState {
                compositions,
                feed_items,
                last_id,
            }),
        }
    }

    /// Number of stored compositions
    pub async fn len(&self) -> usize {
        self.state.lock().await.compositions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CompositionStore for InMemoryCompositionStore {
    async fn list_compositions(&self) -> ClientResult<Vec<CompositionSummary>> {
        let state = self.state.lock().await;
        let mut summaries: Vec<CompositionSummary> =
            state.compositions.values().map(Composition::summary).collect();
        summaries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(summaries)
    }

    async fn get_composition(&self, id: CompositionId) -> ClientResult<Composition> {
        let state = self.state.lock().await;
        state.find(id).cloned()
    }

    async fn create_composition(&self, name: &str) -> ClientResult<Composition> {
        let name = validate_composition_name(name)?;
        let mut state = self.state.lock().await;
        state.ensure_unique_name(name, None)?;

        state.last_id += 1;
        let now = Utc::now();
        let composition = Composition {
            id: state.last_id,
            name: name.to_string(),
            members: Vec::new(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        state.compositions.insert(composition.id, composition.clone());
        Ok(composition)
    }

    async fn replace_composition(
        &self,
        id: CompositionId,
        name: &str,
        members: &[CompositionMember],
    ) -> ClientResult<Composition> {
        let name = validate_composition_name(name)?;
        validate_members(members)?;

        let mut state = self.state.lock().await;
        state.find(id)?;
        state.ensure_unique_name(name, Some(id))?;
        state.ensure_known_feed_items(members)?;

        let composition = state
            .compositions
            .get_mut(&id)
            .ok_or_else(|| ClientError::NotFound(format!("Composition {}", id)))?;
        composition.name = name.to_string();
        composition.members = members.to_vec();
        composition.updated_at = Some(Utc::now());
        Ok(composition.clone())
    }

    async fn rename_composition(&self, id: CompositionId, name: &str) -> ClientResult<Composition> {
        let name = validate_composition_name(name)?;

        let mut state = self.state.lock().await;
        state.find(id)?;
        state.ensure_unique_name(name, Some(id))?;

        let composition = state
            .compositions
            .get_mut(&id)
            .ok_or_else(|| ClientError::NotFound(format!("Composition {}", id)))?;
        composition.name = name.to_string();
        composition.updated_at = Some(Utc::now());
        Ok(composition.clone())
    }

    async fn list_feed_items(&self) -> ClientResult<Vec<FeedItem>> {
        Ok(self.state.lock().await.feed_items.clone())
    }
}
