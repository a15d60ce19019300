use crate::action::{ActionTransition, Rejection};
use crate::engine::StateReducer;
use crate::env::GameEnv;
use crate::state::{CardId, GameState, Position};

/// Placement and selection on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardAction {
    PlaceCard { card_id: CardId, position: Position },
    PickUpCard { card_id: CardId },
    SelectCard { card_id: CardId },
    DeselectCard { card_id: CardId },
    ClearSelection,
}

impl ActionTransition for BoardAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Rejection> {
        match self {
            BoardAction::PlaceCard { card_id, .. } => {
                if !state.inventory.contains(card_id) {
                    return Err(Rejection::CardNotOwned(card_id.clone()));
                }
                if state.active_cards.len() >= state.max_cards as usize {
                    return Err(Rejection::BoardFull {
                        max: state.max_cards,
                    });
                }
            }
            BoardAction::PickUpCard { card_id } => {
                if !state.is_active(card_id) {
                    return Err(Rejection::CardNotActive(card_id.clone()));
                }
            }
            BoardAction::SelectCard { card_id } => {
                if !state.is_active(card_id) {
                    return Err(Rejection::CardNotActive(card_id.clone()));
                }
                if state.is_selected(card_id) {
                    return Err(Rejection::AlreadySelected(card_id.clone()));
                }
            }
            BoardAction::DeselectCard { card_id } => {
                if !state.is_selected(card_id) {
                    return Err(Rejection::NotSelected(card_id.clone()));
                }
            }
            BoardAction::ClearSelection => {}
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<(), Rejection> {
        let mut reducer = StateReducer::new(state);
        match self {
            BoardAction::PlaceCard { card_id, position } => {
                reducer
                    .place(card_id, *position)
                    .ok_or_else(|| Rejection::CardNotOwned(card_id.clone()))?;
            }
            BoardAction::PickUpCard { card_id } => {
                reducer
                    .pick_up(card_id)
                    .ok_or_else(|| Rejection::CardNotActive(card_id.clone()))?;
            }
            BoardAction::SelectCard { card_id } => {
                reducer.board().select(card_id.clone());
            }
            BoardAction::DeselectCard { card_id } => {
                reducer.board().deselect(card_id);
            }
            BoardAction::ClearSelection => reducer.board().clear_selection(),
        }
        Ok(())
    }
}
