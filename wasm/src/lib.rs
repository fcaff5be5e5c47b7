//! WebAssembly module for the feed composition form
//!
//! Provides client-side computation for:
//! - Staging composition members (add, remove, weight changes)
//! - The running total shown next to the form
//! - Name checks before the create/rename request is sent
//!
//! Weights cross the JS boundary as `f64` and are kept as kilograms rounded
//! to grams inside the draft.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript glue code
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::CompositionDraft;

fn weight_from_js(weight_kg: f64) -> Result<Decimal, String> {
    if !weight_kg.is_finite() {
        return Err("Weight must be a number".to_string());
    }
    Decimal::try_from(weight_kg)
        .map(|w| w.round_dp(MAX_WEIGHT_SCALE))
        .map_err(|e| format!("Invalid weight: {}", e))
}

fn weight_to_js(weight_kg: Decimal) -> f64 {
    weight_kg.to_f64().unwrap_or(0.0)
}

/// Staging buffer for the composition form
#[wasm_bindgen]
pub struct DraftEditor {
    draft: CompositionDraft,
}

impl DraftEditor {
    fn from_json(composition_json: &str) -> Result<Self, String> {
        let composition: Composition = serde_json::from_str(composition_json)
            .map_err(|e| format!("Invalid composition JSON: {}", e))?;
        Ok(Self {
            draft: CompositionDraft::from_composition(&composition),
        })
    }

    fn try_set_weight(&mut self, feed_item_id: i64, weight_kg: f64) -> Result<bool, String> {
        let weight = weight_from_js(weight_kg)?;
        self.draft
            .set_weight(feed_item_id, weight)
            .map_err(|e| e.to_string())
    }

    fn try_replace_payload(&self, name: &str) -> Result<String, String> {
        let name = validate_composition_name(name).map_err(|e| e.to_string())?;
        let payload = ReplaceCompositionInput {
            name: name.to_string(),
            members: self.draft.members().to_vec(),
        };
        serde_json::to_string(&payload).map_err(|e| e.to_string())
    }
}

#[wasm_bindgen]
impl DraftEditor {
    /// Start a draft from a composition as returned by `GET /compositions/{id}`
    #[wasm_bindgen(constructor)]
    pub fn new(composition_json: &str) -> Result<DraftEditor, JsValue> {
        Self::from_json(composition_json).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(getter)]
    pub fn composition_id(&self) -> i64 {
        self.draft.composition_id()
    }

    /// Stage a feed item at zero weight; false if already staged
    pub fn add_member(&mut self, feed_item_id: i64) -> bool {
        self.draft.add_feed_item_id(feed_item_id)
    }

    /// Set a staged weight; false if the feed item is not staged
    pub fn set_weight(&mut self, feed_item_id: i64, weight_kg: f64) -> Result<bool, JsValue> {
        self.try_set_weight(feed_item_id, weight_kg)
            .map_err(|e| JsValue::from_str(&e))
    }

    pub fn remove_member(&mut self, feed_item_id: i64) -> bool {
        self.draft.remove_member(feed_item_id)
    }

    /// Whether the add control for this feed item should be disabled
    pub fn contains(&self, feed_item_id: i64) -> bool {
        self.draft.contains(feed_item_id)
    }

    pub fn member_count(&self) -> usize {
        self.draft.len()
    }

    pub fn total_weight_kg(&self) -> f64 {
        weight_to_js(self.draft.total_weight_kg())
    }

    /// Staged members as `[{feedItemId, weightKg}]`
    pub fn members_json(&self) -> String {
        serde_json::to_string(self.draft.members()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Body for `PUT /compositions/{id}`
    pub fn replace_payload_json(&self, name: &str) -> Result<String, JsValue> {
        self.try_replace_payload(name)
            .map_err(|e| JsValue::from_str(&e))
    }
}

/// Check a composition name before sending a create/rename request
#[wasm_bindgen]
pub fn is_valid_composition_name(name: &str) -> bool {
    validate_composition_name(name).is_ok()
}

/// Message to show under the name field, empty when the name is fine
#[wasm_bindgen]
pub fn composition_name_error(name: &str) -> String {
    match validate_composition_name(name) {
        Ok(_) => String::new(),
        Err(err) => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAVED: &str =
        r#"{"id":4,"name":"Test Mix","members":[{"feedItemId":5,"weightKg":10},{"feedItemId":6,"weightKg":5}]}"#;

    #[test]
    fn test_draft_from_saved_composition() {
        let editor = DraftEditor::from_json(SAVED).unwrap();
        assert_eq!(editor.composition_id(), 4);
        assert_eq!(editor.member_count(), 2);
        assert!((editor.total_weight_kg() - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = DraftEditor::from_json("{").err().unwrap();
        assert!(err.starts_with("Invalid composition JSON"));
    }

    #[test]
    fn test_remove_updates_total() {
        let mut editor = DraftEditor::from_json(SAVED).unwrap();
        assert!(editor.remove_member(5));
        assert!((editor.total_weight_kg() - 5.0).abs() < 0.001);
        assert_eq!(editor.members_json(), r#"[{"feedItemId":6,"weightKg":5.0}]"#);
    }

    #[test]
    fn test_add_and_weigh() {
        let mut editor = DraftEditor::from_json(SAVED).unwrap();
        assert!(!editor.add_member(6));
        assert!(editor.add_member(7));
        assert_eq!(editor.try_set_weight(7, 2.5), Ok(true));
        assert!(editor.contains(7));
        assert!((editor.total_weight_kg() - 17.5).abs() < 0.001);
    }

    #[test]
    fn test_weight_rounded_to_grams() {
        let mut editor = DraftEditor::from_json(SAVED).unwrap();
        editor.try_set_weight(6, 1.23456).unwrap();
        assert!((editor.total_weight_kg() - 11.235).abs() < 0.0001);
    }

    #[test]
    fn test_rejected_weights() {
        let mut editor = DraftEditor::from_json(SAVED).unwrap();
        assert!(editor.try_set_weight(6, -1.0).is_err());
        assert!(editor.try_set_weight(6, f64::NAN).is_err());
        assert!(editor.try_set_weight(6, f64::INFINITY).is_err());
        assert!(editor.try_set_weight(6, 2.0e9).is_err());
        assert!((editor.total_weight_kg() - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_replace_payload() {
        let editor = DraftEditor::from_json(SAVED).unwrap();
        let payload = editor.try_replace_payload(" Test Mix ").unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["name"], "Test Mix");
        assert_eq!(value["members"].as_array().map(|m| m.len()), Some(2));
        assert!(editor.try_replace_payload("  ").is_err());
    }

    #[test]
    fn test_name_checks() {
        assert!(is_valid_composition_name("Layer Starter"));
        assert!(!is_valid_composition_name("   "));
        assert_eq!(composition_name_error("Layer Starter"), "");
        assert_eq!(composition_name_error(""), "Composition name cannot be empty");
    }
}
