use crate::action::{ActionTransition, Rejection};
use crate::config::GameConfig;
use crate::engine::StateReducer;
use crate::env::GameEnv;
use crate::state::{Card, CardId, GameState};

/// Inventory holdings changes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryAction {
    /// Merges units into inventory and registers the definition if new.
    AddCard { card: Card, count: u32 },
    /// Removes up to `count` units; the entry disappears at zero.
    RemoveCard { card_id: CardId, count: u32 },
    /// Removes one unit for a share of its price.
    SellCard { card_id: CardId },
}

impl ActionTransition for InventoryAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Rejection> {
        match self {
            InventoryAction::AddCard { count, .. } => {
                if *count == 0 {
                    return Err(Rejection::ZeroCount);
                }
            }
            InventoryAction::RemoveCard { card_id, count } => {
                if *count == 0 {
                    return Err(Rejection::ZeroCount);
                }
                if !state.inventory.contains(card_id) {
                    return Err(Rejection::CardNotOwned(card_id.clone()));
                }
            }
            InventoryAction::SellCard { card_id } => {
                if !state.inventory.contains(card_id) {
                    return Err(Rejection::CardNotOwned(card_id.clone()));
                }
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<(), Rejection> {
        match self {
            InventoryAction::AddCard { card, count } => {
                let mut reducer = StateReducer::new(state);
                reducer.catalog().register(card);
                reducer.inventory().add(card, *count);
            }
            InventoryAction::RemoveCard { card_id, count } => {
                StateReducer::new(state).inventory().remove(card_id, *count);
            }
            InventoryAction::SellCard { card_id } => {
                let price = state
                    .inventory
                    .card(card_id)
                    .map(|card| card.price)
                    .ok_or_else(|| Rejection::CardNotOwned(card_id.clone()))?;
                let mut reducer = StateReducer::new(state);
                reducer.inventory().remove(card_id, 1);
                reducer.wallet().deposit(GameConfig::sell_value(price));
            }
        }
        Ok(())
    }
}
