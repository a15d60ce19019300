//! Known-recipe lookup for the current selection.
//!
//! The selection is the list of board instances whose id is selected, so two
//! placed copies of the same card count twice. A recipe matches when its
//! input list has as many entries as there are selected instances and every
//! input id is among them. Membership is checked per id, not per copy.
//! Catalog order breaks ties.

use crate::config::GameConfig;
use crate::state::{CardId, GameState, Recipe};

/// Returns the first catalog recipe matching `selected_ids` on the board.
pub fn find_matching_recipe<'s>(state: &'s GameState, selected_ids: &[CardId]) -> Option<&'s Recipe> {
    let instances: Vec<&CardId> = state
        .active_cards
        .iter()
        .map(|card| &card.id)
        .filter(|id| selected_ids.contains(id))
        .collect();

    if instances.len() < GameConfig::MIN_RECIPE_INPUTS {
        return None;
    }

    state.recipes.iter().find(|recipe| {
        recipe.inputs.len() == instances.len()
            && recipe.inputs.iter().all(|input| instances.contains(&input))
    })
}

/// Matches the state's own selection.
pub fn match_selection(state: &GameState) -> Option<&Recipe> {
    find_matching_recipe(state, &state.selected_card_ids)
}

/// Whether the board still holds `recipe`'s combination: every input id is
/// placed and there are at least as many input instances as inputs.
pub fn board_holds_inputs(state: &GameState, recipe: &Recipe) -> bool {
    holds_inputs(recipe, state.active_cards.iter().map(|card| &card.id))
}

/// Like [`board_holds_inputs`], counting only selected instances.
pub fn selection_holds_inputs(state: &GameState, recipe: &Recipe) -> bool {
    holds_inputs(recipe, state.selected_instances().into_iter().map(|card| &card.id))
}

fn holds_inputs<'s>(recipe: &Recipe, instances: impl Iterator<Item = &'s CardId>) -> bool {
    let instances: Vec<&CardId> = instances
        .filter(|id| recipe.inputs.contains(id))
        .collect();
    instances.len() >= recipe.inputs.len()
        && recipe.inputs.iter().all(|input| instances.contains(&input))
}
