//! Action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. Every
//! action runs pre_validate → apply → post_validate against a working copy;
//! the copy replaces the state only when all three phases pass, so a
//! rejected action never leaves partial changes behind.

mod errors;
mod reducer;
mod transition;

pub use errors::{TransitionPhase, TransitionPhaseError};
pub use reducer::{
    BoardReducer, CatalogReducer, InventoryReducer, ProgressionReducer, StateReducer,
    WalletReducer,
};

use crate::action::{Action, Rejection};
use crate::env::GameEnv;
use crate::state::GameState;

/// Result of running one action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    /// The state is unchanged.
    Rejected(TransitionPhaseError),
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            TransitionOutcome::Applied => None,
            TransitionOutcome::Rejected(error) => Some(&error.rejection),
        }
    }
}

/// Game engine that applies actions to a borrowed state.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Runs `action` and commits the result only if every phase succeeds.
    pub fn execute(&mut self, env: GameEnv<'_>, action: &Action) -> TransitionOutcome {
        let mut working = self.state.clone();
        match transition::execute_transition(action, &mut working, &env) {
            Ok(()) => {
                *self.state = working;
                TransitionOutcome::Applied
            }
            Err(error) => TransitionOutcome::Rejected(error),
        }
    }
}

/// Pure form of the transition function: `(state, action) -> state'`.
pub fn reduce(state: &GameState, env: GameEnv<'_>, action: &Action) -> GameState {
    let mut next = state.clone();
    GameEngine::new(&mut next).execute(env, action);
    next
}
