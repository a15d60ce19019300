//! Aggregate invariant violations.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CardId, RecipeId};

/// A [`GameState`](super::GameState) invariant that no longer holds.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    #[error("{active} active cards exceed capacity {max}")]
    BoardOverCapacity { active: usize, max: u32 },

    #[error("selected card {0} is not on the board")]
    SelectionNotActive(CardId),

    #[error("card {0} is selected more than once")]
    DuplicateSelection(CardId),

    #[error("processing recipe {0} is not in the catalog")]
    ProcessingRecipeMissing(RecipeId),

    #[error("discovered recipe {0} is missing or not flagged discovered")]
    DiscoveryNotFlagged(RecipeId),

    #[error("recipe {0} is recorded as discovered more than once")]
    DuplicateDiscovery(RecipeId),

    #[error("inventory entry {0} has a zero count")]
    EmptyInventoryEntry(CardId),

    #[error("turn counter must start at 1")]
    InvalidTurn,
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            BoardOverCapacity { .. } => "STATE_BOARD_OVER_CAPACITY",
            SelectionNotActive(_) => "STATE_SELECTION_NOT_ACTIVE",
            DuplicateSelection(_) => "STATE_DUPLICATE_SELECTION",
            ProcessingRecipeMissing(_) => "STATE_PROCESSING_RECIPE_MISSING",
            DiscoveryNotFlagged(_) => "STATE_DISCOVERY_NOT_FLAGGED",
            DuplicateDiscovery(_) => "STATE_DUPLICATE_DISCOVERY",
            EmptyInventoryEntry(_) => "STATE_EMPTY_INVENTORY_ENTRY",
            InvalidTurn => "STATE_INVALID_TURN",
        }
    }
}
