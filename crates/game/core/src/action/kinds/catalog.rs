use crate::action::{ActionTransition, Rejection};
use crate::engine::StateReducer;
use crate::env::GameEnv;
use crate::state::{Card, GameState, Recipe, RecipeId};

/// Recipe catalog and card registry changes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CatalogAction {
    /// Appends a recipe as given unless its input set is already covered.
    AddRecipe(Recipe),
    DiscoverRecipe { recipe_id: RecipeId },
    /// Makes a card definition known so recipe outputs can be granted.
    RegisterCard(Card),
}

impl ActionTransition for CatalogAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Rejection> {
        match self {
            CatalogAction::AddRecipe(recipe) => {
                if recipe.time == 0 {
                    return Err(Rejection::InvalidRecipeTime);
                }
                if state.recipe(&recipe.id).is_some() {
                    return Err(Rejection::DuplicateRecipeId(recipe.id.clone()));
                }
                let inputs = recipe.input_set();
                if let Some(existing) = state
                    .recipes
                    .iter()
                    .find(|known| known.input_set() == inputs)
                {
                    return Err(Rejection::DuplicateCombination {
                        existing: existing.id.clone(),
                    });
                }
            }
            CatalogAction::DiscoverRecipe { recipe_id } => {
                if state.is_discovered(recipe_id) {
                    return Err(Rejection::AlreadyDiscovered(recipe_id.clone()));
                }
                if state.recipe(recipe_id).is_none() {
                    return Err(Rejection::UnknownRecipe(recipe_id.clone()));
                }
            }
            CatalogAction::RegisterCard(card) => {
                if state.card_registry.contains_key(&card.id) {
                    return Err(Rejection::CardAlreadyRegistered(card.id.clone()));
                }
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<(), Rejection> {
        let mut reducer = StateReducer::new(state);
        match self {
            CatalogAction::AddRecipe(recipe) => reducer.catalog().push_recipe(recipe.clone()),
            CatalogAction::DiscoverRecipe { recipe_id } => {
                if !reducer.catalog().discover(recipe_id) {
                    return Err(Rejection::UnknownRecipe(recipe_id.clone()));
                }
            }
            CatalogAction::RegisterCard(card) => {
                reducer.catalog().register(card);
            }
        }
        Ok(())
    }
}
