//! Composition editor session
//!
//! One editor serves one operator. It keeps the selected composition, the
//! feed catalog and a single [`EditorMode`]. Member changes are staged in a
//! [`CompositionDraft`] that only exists while the mode is `Editing`, and are
//! sent to the store in one wholesale replace on [`CompositionEditor::commit`].
//!
//! State is only changed after the store answers, so dropping an in-flight
//! future (a closed form, a timeout) leaves the session as it was.

use std::sync::Arc;

use rust_decimal::Decimal;

use shared::{
    validate_composition_name, validate_members, Composition, CompositionDraft, CompositionId,
    CompositionSummary, FeedItem, FeedItemId,
};

use crate::error::{ClientError, ClientResult};
use crate::store::CompositionStore;

/// What the operator is doing right now
///
/// The staging buffer lives inside `Editing`, so it cannot outlive the edit
/// session or exist next to a rename or create form.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorMode {
    #[default]
    Viewing,
    Editing(CompositionDraft),
    Renaming,
    Creating,
}

/// Mode without its payload, for display and comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Viewing,
    Editing,
    Renaming,
    Creating,
}

impl EditorMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            EditorMode::Viewing => ModeKind::Viewing,
            EditorMode::Editing(_) => ModeKind::Editing,
            EditorMode::Renaming => ModeKind::Renaming,
            EditorMode::Creating => ModeKind::Creating,
        }
    }
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeKind::Viewing => write!(f, "viewing"),
            ModeKind::Editing => write!(f, "editing"),
            ModeKind::Renaming => write!(f, "renaming"),
            ModeKind::Creating => write!(f, "creating"),
        }
    }
}

/// Editing session over the compositions held by a [`CompositionStore`]
pub struct CompositionEditor {
    store: Arc<dyn CompositionStore>,
    selected: Option<Composition>,
    feed_items: Vec<FeedItem>,
    mode: EditorMode,
}

impl CompositionEditor {
    pub fn new(store: Arc<dyn CompositionStore>) -> Self {
        Self {
            store,
            selected: None,
            feed_items: Vec::new(),
            mode: EditorMode::Viewing,
        }
    }

    pub fn mode(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn selected(&self) -> Option<&Composition> {
        self.selected.as_ref()
    }

    /// Staged members, present only while editing
    pub fn draft(&self) -> Option<&CompositionDraft> {
        match &self.mode {
            EditorMode::Editing(draft) => Some(draft),
            _ => None,
        }
    }

    /// Feed catalog loaded by [`load_feed_items`](Self::load_feed_items)
    pub fn feed_items(&self) -> &[FeedItem] {
        &self.feed_items
    }

    // ------------------------------------------------------------------
    // Selector
    // ------------------------------------------------------------------

    /// All compositions for the picker
    pub async fn list_compositions(&self) -> ClientResult<Vec<CompositionSummary>> {
        self.store.list_compositions().await
    }

    /// Fetch and cache the feed catalog
    pub async fn load_feed_items(&mut self) -> ClientResult<&[FeedItem]> {
        let items = self.store.list_feed_items().await?;
        tracing::debug!(count = items.len(), "feed catalog loaded");
        self.feed_items = items;
        Ok(&self.feed_items)
    }

    /// Feed items that can still be added: all of them unless a draft already holds some
    pub fn available_feed_items(&self) -> Vec<&FeedItem> {
        match &self.mode {
            EditorMode::Editing(draft) => draft.available(&self.feed_items),
            _ => self.feed_items.iter().collect(),
        }
    }

    /// Load a composition with its members and show it
    ///
    /// Any open form or draft is dropped once the composition arrives. On
    /// error the session is left untouched.
    pub async fn select_composition(&mut self, id: CompositionId) -> ClientResult<&Composition> {
        let composition = self.store.get_composition(id).await?;
        if let EditorMode::Editing(draft) = &self.mode {
            tracing::debug!(
                composition_id = draft.composition_id(),
                "discarding uncommitted draft on selection change"
            );
        }
        self.mode = EditorMode::Viewing;
        Ok(self.selected.insert(composition))
    }

    // ------------------------------------------------------------------
    // Edit session
    // ------------------------------------------------------------------

    /// Open an edit session on the selected composition
    ///
    /// Replaces any earlier draft with a fresh copy of the saved members.
    pub fn begin_edit(&mut self) -> ClientResult<()> {
        let composition = self.selected.as_ref().ok_or_else(|| {
            ClientError::InvalidState("Select a composition before editing it".to_string())
        })?;
        self.mode = EditorMode::Editing(CompositionDraft::from_composition(composition));
        Ok(())
    }

    fn draft_mut(&mut self) -> ClientResult<&mut CompositionDraft> {
        match &mut self.mode {
            EditorMode::Editing(draft) => Ok(draft),
            other => Err(ClientError::InvalidState(format!(
                "No edit in progress (currently {})",
                other.kind()
            ))),
        }
    }

    /// Stage a feed item with zero weight. `Ok(false)` if it is already staged.
    pub fn add_member(&mut self, feed_item: &FeedItem) -> ClientResult<bool> {
        Ok(self.draft_mut()?.add_member(feed_item))
    }

    /// Change a staged weight. `Ok(false)` if the feed item is not staged.
    ///
    /// Weights the store would refuse are rejected and leave the draft unchanged.
    pub fn set_member_weight(
        &mut self,
        feed_item_id: FeedItemId,
        weight_kg: Decimal,
    ) -> ClientResult<bool> {
        Ok(self.draft_mut()?.set_weight(feed_item_id, weight_kg)?)
    }

    /// Unstage a feed item. `Ok(false)` if it was not staged.
    pub fn remove_member(&mut self, feed_item_id: FeedItemId) -> ClientResult<bool> {
        Ok(self.draft_mut()?.remove_member(feed_item_id))
    }

    /// Total weight to display
    ///
    /// While editing this is the sum of the staged weights, otherwise the saved
    /// total of the selected composition (zero when nothing is selected).
    pub fn compute_total(&self) -> Decimal {
        match (&self.mode, &self.selected) {
            (EditorMode::Editing(draft), _) => draft.total_weight_kg(),
            (_, Some(composition)) => composition.total_weight_kg(),
            (_, None) => Decimal::ZERO,
        }
    }

    /// Save the draft as the composition's new member list
    ///
    /// On success the session ends and the composition is reloaded from the
    /// store. On failure the draft stays in place for a retry.
    pub async fn commit(&mut self) -> ClientResult<&Composition> {
        let (id, members) = match &self.mode {
            EditorMode::Editing(draft) => (draft.composition_id(), draft.members().to_vec()),
            other => {
                return Err(ClientError::InvalidState(format!(
                    "Nothing to save (currently {})",
                    other.kind()
                )))
            }
        };
        let name = self
            .selected
            .as_ref()
            .filter(|c| c.id == id)
            .map(|c| c.name.clone())
            .ok_or_else(|| {
                ClientError::InvalidState("Draft does not match the selected composition".into())
            })?;
        validate_members(&members)?;

        let saved = self
            .store
            .replace_composition(id, &name, &members)
            .await
            .map_err(|err| {
                tracing::warn!(composition_id = id, error = %err, "commit failed, draft kept");
                err
            })?;

        let canonical = match self.store.get_composition(id).await {
            Ok(composition) => composition,
            Err(err) => {
                tracing::warn!(
                    composition_id = id,
                    error = %err,
                    "reload after commit failed, using saved response"
                );
                saved
            }
        };

        tracing::info!(
            composition_id = id,
            members = canonical.members.len(),
            total_weight_kg = %canonical.total_weight_kg(),
            "composition committed"
        );
        self.mode = EditorMode::Viewing;
        Ok(self.selected.insert(canonical))
    }

    /// Leave the current mode; a draft is discarded without saving
    pub fn cancel(&mut self) {
        if let EditorMode::Editing(draft) = &self.mode {
            tracing::debug!(
                composition_id = draft.composition_id(),
                members = draft.len(),
                "draft discarded"
            );
        }
        self.mode = EditorMode::Viewing;
    }

    // ------------------------------------------------------------------
    // Create / rename
    // ------------------------------------------------------------------

    fn ensure_not_editing(&self) -> ClientResult<()> {
        if matches!(self.mode, EditorMode::Editing(_)) {
            return Err(ClientError::InvalidState(
                "Save or cancel the current edit first".to_string(),
            ));
        }
        Ok(())
    }

    /// Open the create form
    pub fn start_create(&mut self) -> ClientResult<()> {
        self.ensure_not_editing()?;
        self.mode = EditorMode::Creating;
        Ok(())
    }

    /// Open the rename form for the selected composition
    pub fn start_rename(&mut self) -> ClientResult<()> {
        self.ensure_not_editing()?;
        if self.selected.is_none() {
            return Err(ClientError::InvalidState(
                "Select a composition before renaming it".to_string(),
            ));
        }
        self.mode = EditorMode::Renaming;
        Ok(())
    }

    /// Create an empty composition and select it
    pub async fn create_composition(&mut self, name: &str) -> ClientResult<&Composition> {
        self.ensure_not_editing()?;
        let name = validate_composition_name(name)?;

        let created = self.store.create_composition(name).await?;
        tracing::info!(composition_id = created.id, name = %created.name, "composition created");
        self.mode = EditorMode::Viewing;
        Ok(self.selected.insert(created))
    }

    /// Rename a composition, members untouched
    pub async fn rename_composition(
        &mut self,
        id: CompositionId,
        new_name: &str,
    ) -> ClientResult<Composition> {
        self.ensure_not_editing()?;
        let new_name = validate_composition_name(new_name)?;

        let renamed = self.store.rename_composition(id, new_name).await?;
        tracing::info!(composition_id = id, name = %renamed.name, "composition renamed");
        if let Some(selected) = self.selected.as_mut().filter(|c| c.id == id) {
            selected.name = renamed.name.clone();
            selected.updated_at = renamed.updated_at;
        }
        self.mode = EditorMode::Viewing;
        Ok(renamed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryCompositionStore;

    fn editor() -> CompositionEditor {
        let store = InMemoryCompositionStore::new(vec![
            FeedItem::new(5, "Maize"),
            FeedItem::new(6, "Soybean Meal"),
        ]);
        CompositionEditor::new(Arc::new(store))
    }

    #[test]
    fn test_starts_viewing_with_zero_total() {
        let editor = editor();
        assert_eq!(editor.mode(), ModeKind::Viewing);
        assert!(editor.draft().is_none());
        assert_eq!(editor.compute_total(), Decimal::ZERO);
    }

    #[test]
    fn test_begin_edit_requires_selection() {
        let mut editor = editor();
        let err = editor.begin_edit().unwrap_err();
        assert!(matches!(err, ClientError::InvalidState(_)));
    }

    #[test]
    fn test_member_ops_outside_edit_are_refused() {
        let mut editor = editor();
        let maize = FeedItem::new(5, "Maize");
        assert!(editor.add_member(&maize).is_err());
        assert!(editor.set_member_weight(5, Decimal::ONE).is_err());
        assert!(editor.remove_member(5).is_err());
    }

    #[tokio::test]
    async fn test_create_while_editing_is_refused() {
        let mut editor = editor();
        editor.create_composition("Layer Starter").await.unwrap();
        editor.begin_edit().unwrap();
        assert!(editor.start_create().is_err());
        assert!(editor.start_rename().is_err());
        assert!(editor.create_composition("Grower").await.is_err());
        assert_eq!(editor.mode(), ModeKind::Editing);
    }

    #[tokio::test]
    async fn test_available_feed_items_excludes_staged() {
        let mut editor = editor();
        editor.load_feed_items().await.unwrap();
        editor.create_composition("Layer Starter").await.unwrap();
        assert_eq!(editor.available_feed_items().len(), 2);

        editor.begin_edit().unwrap();
        let maize = editor.feed_items()[0].clone();
        editor.add_member(&maize).unwrap();
        let available: Vec<FeedItemId> =
            editor.available_feed_items().iter().map(|f| f.id).collect();
        assert_eq!(available, vec![6]);
    }

    #[test]
    fn test_mode_kind_display() {
        assert_eq!(ModeKind::Renaming.to_string(), "renaming");
        assert_eq!(EditorMode::Creating.kind(), ModeKind::Creating);
    }
}
