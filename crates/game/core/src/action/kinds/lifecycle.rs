use crate::action::{ActionTransition, Rejection};
use crate::engine::StateReducer;
use crate::env::GameEnv;
use crate::state::{Era, GameState};

/// Resets the session to a fresh state built from seed content.
///
/// The result holds one unit of every starter card, the full seed recipe
/// catalog (with already-discovered seeds recorded), every seed card
/// definition in the registry, and the packs of the starting era.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitializeAction;

impl ActionTransition for InitializeAction {
    fn pre_validate(&self, _state: &GameState, env: &GameEnv<'_>) -> Result<(), Rejection> {
        env.content()?;
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<(), Rejection> {
        let content = env.content()?;
        *state = GameState::new();

        let mut reducer = StateReducer::new(state);
        for card in content.all_cards() {
            reducer.catalog().register(card);
        }
        for card in content.starter_cards() {
            reducer.inventory().add(card, 1);
        }
        for recipe in content.recipes() {
            reducer.catalog().push_recipe(recipe.clone());
        }
        for pack in content.packs_for_era(Era::Stone) {
            reducer.progression().unlock_pack(pack.id.clone());
        }
        Ok(())
    }
}
