//! Composable state primitives.
//!
//! Compound transitions (pick-up, completion, starvation) are sequenced from
//! these small reducers instead of re-entering the engine.

use std::collections::BTreeMap;

use crate::state::{
    Card, CardId, Era, GameState, InventoryState, PackId, Position, ProcessingRecipe, Recipe,
    RecipeId,
};

/// Wraps mutable access to [`GameState`] with structured sub-reducers.
pub struct StateReducer<'a> {
    state: &'a mut GameState,
}

impl<'a> StateReducer<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn inventory(&mut self) -> InventoryReducer<'_> {
        InventoryReducer {
            inventory: &mut self.state.inventory,
            registry: &self.state.card_registry,
        }
    }

    pub fn board(&mut self) -> BoardReducer<'_> {
        BoardReducer {
            active: &mut self.state.active_cards,
            selected: &mut self.state.selected_card_ids,
        }
    }

    pub fn catalog(&mut self) -> CatalogReducer<'_> {
        CatalogReducer {
            recipes: &mut self.state.recipes,
            discovered: &mut self.state.discovered_recipe_ids,
            registry: &mut self.state.card_registry,
        }
    }

    pub fn wallet(&mut self) -> WalletReducer<'_> {
        WalletReducer {
            gold: &mut self.state.gold,
        }
    }

    pub fn progression(&mut self) -> ProgressionReducer<'_> {
        ProgressionReducer {
            era: &mut self.state.era,
            turn: &mut self.state.turn,
            max_cards: &mut self.state.max_cards,
            packs: &mut self.state.available_card_pack_ids,
        }
    }

    pub fn synthesis(&mut self) -> &mut Option<ProcessingRecipe> {
        &mut self.state.processing_recipe
    }

    /// Takes the first board instance of `id` back into inventory and drops
    /// the id from the selection.
    pub fn pick_up(&mut self, id: &CardId) -> Option<Card> {
        let index = self
            .state
            .active_cards
            .iter()
            .position(|card| &card.id == id)?;
        self.pick_up_at(index)
    }

    /// Board instance at `index` goes back into inventory.
    pub fn pick_up_at(&mut self, index: usize) -> Option<Card> {
        let card = self.board().take(index)?;
        self.board().deselect(&card.id);
        self.inventory().give_back(&card);
        Some(card)
    }

    /// Removes one unit from inventory and places it on the board.
    pub fn place(&mut self, id: &CardId, position: Position) -> Option<()> {
        let card = self.state.inventory.card(id)?.placed_at(position);
        self.inventory().remove(id, 1);
        self.board().push(card);
        Some(())
    }
}

pub struct InventoryReducer<'a> {
    inventory: &'a mut InventoryState,
    registry: &'a BTreeMap<CardId, Card>,
}

impl InventoryReducer<'_> {
    pub fn add(&mut self, card: &Card, count: u32) {
        self.inventory.add(card, count);
    }

    pub fn remove(&mut self, id: &CardId, count: u32) -> u32 {
        self.inventory.remove(id, count)
    }

    /// Returns one unit of a board instance. The registry definition wins
    /// over the instance so per-instance wear (hunger, health) is reset.
    pub fn give_back(&mut self, card: &Card) {
        let definition = self
            .registry
            .get(&card.id)
            .cloned()
            .unwrap_or_else(|| card.unplaced());
        self.inventory.add(&definition, 1);
    }
}

pub struct BoardReducer<'a> {
    active: &'a mut Vec<Card>,
    selected: &'a mut Vec<CardId>,
}

impl BoardReducer<'_> {
    pub fn push(&mut self, card: Card) {
        self.active.push(card);
    }

    pub fn take(&mut self, index: usize) -> Option<Card> {
        (index < self.active.len()).then(|| self.active.remove(index))
    }

    /// Removes every instance whose id is listed. Returns how many were removed.
    pub fn consume(&mut self, ids: &[CardId]) -> usize {
        let before = self.active.len();
        self.active.retain(|card| !ids.contains(&card.id));
        before - self.active.len()
    }

    pub fn instances_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.active.iter_mut()
    }

    pub fn select(&mut self, id: CardId) -> bool {
        if self.selected.contains(&id) {
            return false;
        }
        self.selected.push(id);
        true
    }

    pub fn deselect(&mut self, id: &CardId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|selected| selected != id);
        before != self.selected.len()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }
}

pub struct CatalogReducer<'a> {
    recipes: &'a mut Vec<Recipe>,
    discovered: &'a mut Vec<RecipeId>,
    registry: &'a mut BTreeMap<CardId, Card>,
}

impl CatalogReducer<'_> {
    pub fn push_recipe(&mut self, recipe: Recipe) {
        if recipe.discovered && !self.discovered.contains(&recipe.id) {
            self.discovered.push(recipe.id.clone());
        }
        self.recipes.push(recipe);
    }

    /// Flags the recipe discovered and records it. Returns `false` when it
    /// was already recorded or is unknown.
    pub fn discover(&mut self, id: &RecipeId) -> bool {
        if self.discovered.contains(id) {
            return false;
        }
        let Some(recipe) = self.recipes.iter_mut().find(|recipe| &recipe.id == id) else {
            return false;
        };
        recipe.discovered = true;
        self.discovered.push(id.clone());
        true
    }

    /// Registers a definition unless one already exists.
    pub fn register(&mut self, card: &Card) -> bool {
        if self.registry.contains_key(&card.id) {
            return false;
        }
        self.registry.insert(card.id.clone(), card.unplaced());
        true
    }
}

pub struct WalletReducer<'a> {
    gold: &'a mut u64,
}

impl WalletReducer<'_> {
    pub fn deposit(&mut self, amount: u64) {
        *self.gold = self.gold.saturating_add(amount);
    }

    /// Spends `amount` if affordable.
    pub fn spend(&mut self, amount: u64) -> bool {
        match self.gold.checked_sub(amount) {
            Some(remaining) => {
                *self.gold = remaining;
                true
            }
            None => false,
        }
    }

    /// Removes up to `amount`, stopping at zero.
    pub fn drain(&mut self, amount: u64) {
        *self.gold = self.gold.saturating_sub(amount);
    }
}

pub struct ProgressionReducer<'a> {
    era: &'a mut Era,
    turn: &'a mut u32,
    max_cards: &'a mut u32,
    packs: &'a mut Vec<PackId>,
}

impl ProgressionReducer<'_> {
    pub fn set_era(&mut self, era: Era) {
        *self.era = era;
    }

    pub fn next_turn(&mut self) -> u32 {
        *self.turn = self.turn.saturating_add(1);
        *self.turn
    }

    pub fn grow_capacity(&mut self, amount: u32) {
        *self.max_cards = self.max_cards.saturating_add(amount);
    }

    pub fn unlock_pack(&mut self, id: PackId) -> bool {
        if self.packs.contains(&id) {
            return false;
        }
        self.packs.push(id);
        true
    }
}
