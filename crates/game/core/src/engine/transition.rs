//! Action transition dispatch and execution logic.

use crate::action::{Action, ActionTransition};
use crate::env::GameEnv;
use crate::state::GameState;

use super::errors::{TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<(), TransitionPhaseError>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|rejection| TransitionPhaseError::new(TransitionPhase::PreValidate, rejection))?;

    transition
        .apply(state, env)
        .map_err(|rejection| TransitionPhaseError::new(TransitionPhase::Apply, rejection))?;

    transition
        .post_validate(state, env)
        .map_err(|rejection| TransitionPhaseError::new(TransitionPhase::PostValidate, rejection))
}

/// Routes each action group to its transition.
pub(super) fn execute_transition(
    action: &Action,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<(), TransitionPhaseError> {
    match action {
        Action::Initialize(transition) => drive_transition(transition, state, env),
        Action::Inventory(transition) => drive_transition(transition, state, env),
        Action::Board(transition) => drive_transition(transition, state, env),
        Action::Synthesis(transition) => drive_transition(transition, state, env),
        Action::Catalog(transition) => drive_transition(transition, state, env),
        Action::Economy(transition) => drive_transition(transition, state, env),
        Action::Progression(transition) => drive_transition(transition, state, env),
    }
}
