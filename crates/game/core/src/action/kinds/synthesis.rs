use crate::action::{ActionTransition, Rejection};
use crate::config::GameConfig;
use crate::engine::StateReducer;
use crate::env::GameEnv;
use crate::matcher::board_holds_inputs;
use crate::state::{Card, GameState, ProcessingRecipe, RecipeId};

/// Timed recipe execution. Only one synthesis runs at a time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SynthesisAction {
    StartRecipeProcessing { recipe_id: RecipeId },
    /// Overwrites progress, clamped to `[0, 100]`.
    UpdateRecipeProgress { progress: f64 },
    /// Consumes the inputs on the board and grants the outputs. Rejected once
    /// the board no longer holds the combination.
    CompleteRecipe,
    CancelRecipe,
}

impl ActionTransition for SynthesisAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Rejection> {
        match self {
            SynthesisAction::StartRecipeProcessing { recipe_id } => {
                if state.recipe(recipe_id).is_none() {
                    return Err(Rejection::UnknownRecipe(recipe_id.clone()));
                }
                if state.processing_recipe.is_some() {
                    return Err(Rejection::SynthesisActive);
                }
            }
            SynthesisAction::UpdateRecipeProgress { progress } => {
                if !state.is_processing() {
                    return Err(Rejection::NoActiveSynthesis);
                }
                if progress.is_nan() {
                    return Err(Rejection::InvalidProgress);
                }
            }
            SynthesisAction::CompleteRecipe => {
                let processing = state
                    .processing_recipe
                    .as_ref()
                    .ok_or(Rejection::NoActiveSynthesis)?;
                let recipe = state
                    .recipe(&processing.recipe_id)
                    .ok_or_else(|| Rejection::UnknownRecipe(processing.recipe_id.clone()))?;
                if !board_holds_inputs(state, recipe) {
                    return Err(Rejection::InputsMissing(recipe.id.clone()));
                }
            }
            SynthesisAction::CancelRecipe => {
                if state.processing_recipe.is_none() {
                    return Err(Rejection::NoActiveSynthesis);
                }
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<(), Rejection> {
        match self {
            SynthesisAction::StartRecipeProcessing { recipe_id } => {
                let time = state
                    .recipe(recipe_id)
                    .map(|recipe| recipe.time)
                    .ok_or_else(|| Rejection::UnknownRecipe(recipe_id.clone()))?;
                *StateReducer::new(state).synthesis() =
                    Some(ProcessingRecipe::start(recipe_id.clone(), time));
            }
            SynthesisAction::UpdateRecipeProgress { progress } => {
                if let Some(processing) = StateReducer::new(state).synthesis() {
                    processing.progress = progress.clamp(0.0, GameConfig::MAX_PROGRESS);
                }
            }
            SynthesisAction::CompleteRecipe => complete(state)?,
            SynthesisAction::CancelRecipe => {
                *StateReducer::new(state).synthesis() = None;
            }
        }
        Ok(())
    }
}

fn complete(state: &mut GameState) -> Result<(), Rejection> {
    let recipe_id = state
        .processing_recipe
        .as_ref()
        .map(|processing| processing.recipe_id.clone())
        .ok_or(Rejection::NoActiveSynthesis)?;
    let recipe = state
        .recipe(&recipe_id)
        .cloned()
        .ok_or_else(|| Rejection::UnknownRecipe(recipe_id.clone()))?;

    // Outputs without a known definition are skipped.
    let produced: Vec<(Card, u32)> = recipe
        .outputs
        .iter()
        .filter_map(|output| {
            state
                .lookup_card(&output.card_id)
                .map(|card| (card.clone(), output.count))
        })
        .collect();

    let mut reducer = StateReducer::new(state);
    reducer.board().consume(&recipe.inputs);
    reducer.board().clear_selection();
    for (card, count) in &produced {
        reducer.inventory().add(card, *count);
    }
    reducer.catalog().discover(&recipe.id);
    *reducer.synthesis() = None;
    Ok(())
}
