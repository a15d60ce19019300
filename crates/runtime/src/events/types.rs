//! Event payloads published on each topic.

use game_core::{Action, CardId, GameState, RandomEvent, RecipeId};

/// Transitions run by the session worker, in the order they were applied.
#[derive(Debug, Clone)]
pub enum GameStateEvent {
    /// `state` is the snapshot right after `action` was applied.
    ActionApplied {
        action: Action,
        turn: u32,
        state: Box<GameState>,
    },
    /// The state is unchanged.
    ActionRejected {
        action: Action,
        code: &'static str,
        reason: String,
    },
}

impl GameStateEvent {
    pub fn action(&self) -> &Action {
        match self {
            GameStateEvent::ActionApplied { action, .. }
            | GameStateEvent::ActionRejected { action, .. } => action,
        }
    }
}

/// Progress of selection evaluation and rules-service round trips.
#[derive(Debug, Clone)]
pub enum DiscoveryEvent {
    /// The selection matched a catalog recipe without asking the service.
    Matched { recipe_id: RecipeId },
    /// An unknown combination was sent to the rules service.
    Requested { selection: Vec<CardId> },
    /// The service proposed a recipe; it was added and started.
    RecipeDiscovered {
        recipe_id: RecipeId,
        outputs: Vec<CardId>,
    },
    Invalid { reason: String },
    /// `accepted` is true when the era side channel advanced the session.
    EraAdvance {
        new_era: String,
        description: String,
        accepted: bool,
    },
    /// A random event was applied, from a combination or the turn cadence.
    RandomEvent { event: RandomEvent },
    /// The selection changed while the service was thinking; the answer was
    /// dropped.
    Discarded {
        requested: Vec<CardId>,
        current: Vec<CardId>,
    },
    /// The service could not be reached or answered nonsense. The selection
    /// is kept.
    Failed { reason: String },
}

/// Recipe processing lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisEvent {
    Started { recipe_id: RecipeId, total_time: u32 },
    Progress { recipe_id: RecipeId, progress: f64 },
    Completed { recipe_id: RecipeId },
    Cancelled { recipe_id: RecipeId },
}
