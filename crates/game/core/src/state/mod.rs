//! Authoritative game state representation.
//!
//! This module owns the aggregate describing holdings, the board, the
//! recipe catalog and progression. Runtime layers clone or query this state
//! but mutate it exclusively through the engine.
mod error;
pub mod types;

use std::collections::{BTreeMap, HashSet};

pub use error::StateError;
pub use types::{
    Card, CardId, CardKind, CardPack, Era, InventoryEntry, InventoryState, PackEntry, PackId,
    Position, ProcessingRecipe, Rarity, Recipe, RecipeId, RecipeOutput,
};

use crate::config::GameConfig;

/// Canonical snapshot of a crafting session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GameState {
    pub inventory: InventoryState,
    pub gold: u64,
    pub era: Era,
    pub turn: u32,
    pub max_cards: u32,

    /// Recipe catalog in insertion order. Matching walks it front to back.
    pub recipes: Vec<Recipe>,
    pub discovered_recipe_ids: Vec<RecipeId>,
    pub available_card_pack_ids: Vec<PackId>,

    /// Positioned card instances on the board.
    pub active_cards: Vec<Card>,
    pub selected_card_ids: Vec<CardId>,
    pub processing_recipe: Option<ProcessingRecipe>,

    /// Every card definition known to the session, including outputs minted
    /// by discoveries that are not owned yet.
    #[cfg_attr(feature = "serde", serde(default))]
    pub card_registry: BTreeMap<CardId, Card>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Empty state with default capacity. `Initialize` fills it from content.
    pub fn new() -> Self {
        Self {
            inventory: InventoryState::new(),
            gold: 0,
            era: Era::Stone,
            turn: 1,
            max_cards: GameConfig::DEFAULT_MAX_CARDS,
            recipes: Vec::new(),
            discovered_recipe_ids: Vec::new(),
            available_card_pack_ids: Vec::new(),
            active_cards: Vec::new(),
            selected_card_ids: Vec::new(),
            processing_recipe: None,
            card_registry: BTreeMap::new(),
        }
    }

    pub fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| &recipe.id == id)
    }

    /// Resolves a card definition: the registry first, then inventory records.
    pub fn lookup_card(&self, id: &CardId) -> Option<&Card> {
        self.card_registry
            .get(id)
            .or_else(|| self.inventory.card(id))
    }

    pub fn is_active(&self, id: &CardId) -> bool {
        self.active_cards.iter().any(|card| &card.id == id)
    }

    pub fn is_selected(&self, id: &CardId) -> bool {
        self.selected_card_ids.contains(id)
    }

    /// Board instances whose id is selected, in board order.
    pub fn selected_instances(&self) -> Vec<&Card> {
        self.active_cards
            .iter()
            .filter(|card| self.is_selected(&card.id))
            .collect()
    }

    pub fn is_processing(&self) -> bool {
        self.processing_recipe
            .as_ref()
            .is_some_and(|processing| processing.active)
    }

    pub fn is_discovered(&self, id: &RecipeId) -> bool {
        self.discovered_recipe_ids.contains(id)
    }

    /// Up to `limit` discovered recipes, oldest discovery first.
    pub fn discovered_sample(&self, limit: usize) -> Vec<&Recipe> {
        self.discovered_recipe_ids
            .iter()
            .filter_map(|id| self.recipe(id))
            .take(limit)
            .collect()
    }

    pub fn has_pack(&self, id: &PackId) -> bool {
        self.available_card_pack_ids.contains(id)
    }

    /// Checks every aggregate invariant.
    pub fn check_invariants(&self) -> Result<(), StateError> {
        if self.turn == 0 {
            return Err(StateError::InvalidTurn);
        }

        if self.active_cards.len() > self.max_cards as usize {
            return Err(StateError::BoardOverCapacity {
                active: self.active_cards.len(),
                max: self.max_cards,
            });
        }

        let mut seen = HashSet::new();
        for id in &self.selected_card_ids {
            if !seen.insert(id) {
                return Err(StateError::DuplicateSelection(id.clone()));
            }
            if !self.is_active(id) {
                return Err(StateError::SelectionNotActive(id.clone()));
            }
        }

        if let Some(processing) = &self.processing_recipe {
            if self.recipe(&processing.recipe_id).is_none() {
                return Err(StateError::ProcessingRecipeMissing(
                    processing.recipe_id.clone(),
                ));
            }
        }

        let mut seen = HashSet::new();
        for id in &self.discovered_recipe_ids {
            if !seen.insert(id) {
                return Err(StateError::DuplicateDiscovery(id.clone()));
            }
            if !self.recipe(id).is_some_and(|recipe| recipe.discovered) {
                return Err(StateError::DiscoveryNotFlagged(id.clone()));
            }
        }

        if let Some(entry) = self.inventory.iter().find(|entry| entry.count == 0) {
            return Err(StateError::EmptyInventoryEntry(entry.card.id.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone() -> Card {
        Card::new("stone", "Stone", CardKind::Resource { durability: Some(3) })
    }

    #[test]
    fn fresh_state_defaults() {
        let state = GameState::new();
        assert_eq!(state.gold, 0);
        assert_eq!(state.turn, 1);
        assert_eq!(state.era, Era::Stone);
        assert_eq!(state.max_cards, 20);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn selection_of_inactive_card_breaks_invariant() {
        let mut state = GameState::new();
        state.selected_card_ids.push("stone".into());
        assert_eq!(
            state.check_invariants(),
            Err(StateError::SelectionNotActive("stone".into()))
        );
    }

    #[test]
    fn lookup_prefers_registry_then_inventory() {
        let mut state = GameState::new();
        state.inventory.add(&stone(), 1);
        assert_eq!(state.lookup_card(&"stone".into()).map(|c| c.price), Some(0));

        state
            .card_registry
            .insert("stone".into(), stone().with_price(4));
        assert_eq!(state.lookup_card(&"stone".into()).map(|c| c.price), Some(4));
        assert!(state.lookup_card(&"ghost".into()).is_none());
    }

    #[test]
    fn selected_instances_counts_every_placed_copy() {
        let mut state = GameState::new();
        state.active_cards.push(stone().placed_at(Position::new(0, 0)));
        state.active_cards.push(stone().placed_at(Position::new(1, 0)));
        state.selected_card_ids.push("stone".into());
        assert_eq!(state.selected_instances().len(), 2);
    }
}
