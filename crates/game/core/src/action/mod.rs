//! Action domain.
//!
//! Every state change is an [`Action`]. Actions are grouped by the part of
//! the aggregate they touch; each group implements [`ActionTransition`] and
//! is driven through the engine's three-phase pipeline.
//!
//! # Module Structure
//!
//! - `error`: [`Rejection`], the reason a transition left the state unchanged
//! - `kinds`: one transition per action group

pub mod error;
pub mod kinds;

pub use error::Rejection;
pub use kinds::{
    BoardAction, CatalogAction, EconomyAction, EventEffect, InitializeAction, InventoryAction,
    ProgressionAction, SynthesisAction,
};

use crate::env::GameEnv;
use crate::state::{Card, CardId, Era, GameState, PackId, Position, Recipe, RecipeId};

/// Defines how a concrete action variant mutates game state.
///
/// Hooks receive read-only content via [`GameEnv`] and must stay free of
/// side effects outside the state they are handed.
pub trait ActionTransition {
    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Rejection> {
        Ok(())
    }

    /// Applies the action by mutating the game state directly. Implementations
    /// may assume that `pre_validate` has already run successfully.
    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<(), Rejection>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Rejection> {
        state
            .check_invariants()
            .map_err(Rejection::InvariantViolated)
    }
}

/// Top-level action enum. Dispatching happens by group.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Initialize(InitializeAction),
    Inventory(InventoryAction),
    Board(BoardAction),
    Synthesis(SynthesisAction),
    Catalog(CatalogAction),
    Economy(EconomyAction),
    Progression(ProgressionAction),
}

impl Action {
    pub fn initialize() -> Self {
        Self::Initialize(InitializeAction)
    }

    pub fn add_card(card: Card, count: u32) -> Self {
        Self::Inventory(InventoryAction::AddCard { card, count })
    }

    pub fn remove_card(card_id: impl Into<CardId>, count: u32) -> Self {
        Self::Inventory(InventoryAction::RemoveCard {
            card_id: card_id.into(),
            count,
        })
    }

    pub fn sell_card(card_id: impl Into<CardId>) -> Self {
        Self::Inventory(InventoryAction::SellCard {
            card_id: card_id.into(),
        })
    }

    pub fn place_card(card_id: impl Into<CardId>, position: Position) -> Self {
        Self::Board(BoardAction::PlaceCard {
            card_id: card_id.into(),
            position,
        })
    }

    pub fn pick_up_card(card_id: impl Into<CardId>) -> Self {
        Self::Board(BoardAction::PickUpCard {
            card_id: card_id.into(),
        })
    }

    pub fn select_card(card_id: impl Into<CardId>) -> Self {
        Self::Board(BoardAction::SelectCard {
            card_id: card_id.into(),
        })
    }

    pub fn deselect_card(card_id: impl Into<CardId>) -> Self {
        Self::Board(BoardAction::DeselectCard {
            card_id: card_id.into(),
        })
    }

    pub fn clear_selection() -> Self {
        Self::Board(BoardAction::ClearSelection)
    }

    pub fn start_recipe(recipe_id: impl Into<RecipeId>) -> Self {
        Self::Synthesis(SynthesisAction::StartRecipeProcessing {
            recipe_id: recipe_id.into(),
        })
    }

    pub fn update_progress(progress: f64) -> Self {
        Self::Synthesis(SynthesisAction::UpdateRecipeProgress { progress })
    }

    pub fn complete_recipe() -> Self {
        Self::Synthesis(SynthesisAction::CompleteRecipe)
    }

    pub fn cancel_recipe() -> Self {
        Self::Synthesis(SynthesisAction::CancelRecipe)
    }

    pub fn add_recipe(recipe: Recipe) -> Self {
        Self::Catalog(CatalogAction::AddRecipe(recipe))
    }

    pub fn discover_recipe(recipe_id: impl Into<RecipeId>) -> Self {
        Self::Catalog(CatalogAction::DiscoverRecipe {
            recipe_id: recipe_id.into(),
        })
    }

    pub fn register_card(card: Card) -> Self {
        Self::Catalog(CatalogAction::RegisterCard(card))
    }

    pub fn add_gold(amount: u64) -> Self {
        Self::Economy(EconomyAction::AddGold { amount })
    }

    pub fn spend_gold(amount: u64) -> Self {
        Self::Economy(EconomyAction::SpendGold { amount })
    }

    pub fn open_card_pack(pack_id: impl Into<PackId>, card_id: impl Into<CardId>) -> Self {
        Self::Economy(EconomyAction::OpenCardPack {
            pack_id: pack_id.into(),
            card_id: card_id.into(),
        })
    }

    pub fn advance_turn() -> Self {
        Self::Progression(ProgressionAction::AdvanceTurn)
    }

    pub fn advance_era(era: Era) -> Self {
        Self::Progression(ProgressionAction::AdvanceEra { era })
    }

    pub fn unlock_card_pack(pack_id: impl Into<PackId>) -> Self {
        Self::Progression(ProgressionAction::UnlockCardPack {
            pack_id: pack_id.into(),
        })
    }

    pub fn increase_max_cards(amount: u32) -> Self {
        Self::Progression(ProgressionAction::IncreaseMaxCards { amount })
    }

    pub fn apply_event(effects: Vec<EventEffect>) -> Self {
        Self::Progression(ProgressionAction::ApplyEvent { effects })
    }

    /// Short snake_case name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Initialize(_) => "initialize",
            Action::Inventory(action) => match action {
                InventoryAction::AddCard { .. } => "add_card",
                InventoryAction::RemoveCard { .. } => "remove_card",
                InventoryAction::SellCard { .. } => "sell_card",
            },
            Action::Board(action) => match action {
                BoardAction::PlaceCard { .. } => "place_card",
                BoardAction::PickUpCard { .. } => "pick_up_card",
                BoardAction::SelectCard { .. } => "select_card",
                BoardAction::DeselectCard { .. } => "deselect_card",
                BoardAction::ClearSelection => "clear_selection",
            },
            Action::Synthesis(action) => match action {
                SynthesisAction::StartRecipeProcessing { .. } => "start_recipe_processing",
                SynthesisAction::UpdateRecipeProgress { .. } => "update_recipe_progress",
                SynthesisAction::CompleteRecipe => "complete_recipe",
                SynthesisAction::CancelRecipe => "cancel_recipe",
            },
            Action::Catalog(action) => match action {
                CatalogAction::AddRecipe(_) => "add_recipe",
                CatalogAction::DiscoverRecipe { .. } => "discover_recipe",
                CatalogAction::RegisterCard(_) => "register_card",
            },
            Action::Economy(action) => match action {
                EconomyAction::AddGold { .. } => "add_gold",
                EconomyAction::SpendGold { .. } => "spend_gold",
                EconomyAction::OpenCardPack { .. } => "open_card_pack",
            },
            Action::Progression(action) => match action {
                ProgressionAction::AdvanceTurn => "advance_turn",
                ProgressionAction::AdvanceEra { .. } => "advance_era",
                ProgressionAction::UnlockCardPack { .. } => "unlock_card_pack",
                ProgressionAction::IncreaseMaxCards { .. } => "increase_max_cards",
                ProgressionAction::ApplyEvent { .. } => "apply_event",
            },
        }
    }

    /// Actions driven by the synthesis ticker.
    pub fn is_progress_tick(&self) -> bool {
        matches!(
            self,
            Action::Synthesis(SynthesisAction::UpdateRecipeProgress { .. })
        )
    }
}
