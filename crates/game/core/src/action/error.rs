//! Transition rejections.
//!
//! A rejection is not a fault: the engine reports it and leaves the state
//! untouched.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{CardId, PackId, RecipeId, StateError};

/// Reason a transition left the state unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("content unavailable: {0}")]
    Oracle(#[from] OracleError),

    #[error("count must be positive")]
    ZeroCount,

    #[error("card {0} is not in the inventory")]
    CardNotOwned(CardId),

    #[error("card {0} is not on the board")]
    CardNotActive(CardId),

    #[error("card {0} is not known to the session")]
    UnknownCard(CardId),

    #[error("card {0} is already registered")]
    CardAlreadyRegistered(CardId),

    #[error("board is full ({max} cards)")]
    BoardFull { max: u32 },

    #[error("card {0} is already selected")]
    AlreadySelected(CardId),

    #[error("card {0} is not selected")]
    NotSelected(CardId),

    #[error("recipe {0} is not in the catalog")]
    UnknownRecipe(RecipeId),

    #[error("a synthesis is already running")]
    SynthesisActive,

    #[error("no synthesis is running")]
    NoActiveSynthesis,

    #[error("the board no longer holds the inputs of recipe {0}")]
    InputsMissing(RecipeId),

    #[error("progress must be a number")]
    InvalidProgress,

    #[error("recipe {existing} already covers this combination")]
    DuplicateCombination { existing: RecipeId },

    #[error("recipe id {0} is already taken")]
    DuplicateRecipeId(RecipeId),

    #[error("recipe time must be positive")]
    InvalidRecipeTime,

    #[error("recipe {0} is already discovered")]
    AlreadyDiscovered(RecipeId),

    #[error("not enough gold: need {required}, have {available}")]
    InsufficientGold { required: u64, available: u64 },

    #[error("card pack {0} is not available")]
    PackUnavailable(PackId),

    #[error("card pack {0} is not known to the content")]
    UnknownPack(PackId),

    #[error("card {card} is not part of pack {pack}")]
    CardNotInPack { pack: PackId, card: CardId },

    #[error("card pack {0} is already unlocked")]
    PackAlreadyUnlocked(PackId),

    #[error("state invariant violated: {0}")]
    InvariantViolated(StateError),
}

impl GameError for Rejection {
    fn severity(&self) -> ErrorSeverity {
        use Rejection::*;
        match self {
            Oracle(_) => ErrorSeverity::Fatal,
            InvariantViolated(_) => ErrorSeverity::Internal,
            BoardFull { .. } | SynthesisActive | NoActiveSynthesis => ErrorSeverity::Recoverable,
            InputsMissing(_) => ErrorSeverity::Recoverable,
            InsufficientGold { .. } | PackUnavailable(_) => ErrorSeverity::Recoverable,
            AlreadySelected(_) | NotSelected(_) | AlreadyDiscovered(_) => {
                ErrorSeverity::Recoverable
            }
            PackAlreadyUnlocked(_) | CardAlreadyRegistered(_) => ErrorSeverity::Recoverable,
            DuplicateCombination { .. } | DuplicateRecipeId(_) => ErrorSeverity::Recoverable,
            ZeroCount | InvalidProgress | InvalidRecipeTime => ErrorSeverity::Validation,
            CardNotOwned(_) | CardNotActive(_) | UnknownCard(_) => ErrorSeverity::Validation,
            UnknownRecipe(_) | UnknownPack(_) | CardNotInPack { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use Rejection::*;
        match self {
            Oracle(_) => "REJECT_CONTENT_UNAVAILABLE",
            ZeroCount => "REJECT_ZERO_COUNT",
            CardNotOwned(_) => "REJECT_CARD_NOT_OWNED",
            CardNotActive(_) => "REJECT_CARD_NOT_ACTIVE",
            UnknownCard(_) => "REJECT_UNKNOWN_CARD",
            CardAlreadyRegistered(_) => "REJECT_CARD_ALREADY_REGISTERED",
            BoardFull { .. } => "REJECT_CAPACITY_EXCEEDED",
            AlreadySelected(_) => "REJECT_ALREADY_SELECTED",
            NotSelected(_) => "REJECT_NOT_SELECTED",
            UnknownRecipe(_) => "REJECT_UNKNOWN_RECIPE",
            SynthesisActive => "REJECT_SYNTHESIS_ACTIVE",
            NoActiveSynthesis => "REJECT_NO_ACTIVE_SYNTHESIS",
            InputsMissing(_) => "REJECT_INPUTS_MISSING",
            InvalidProgress => "REJECT_INVALID_PROGRESS",
            DuplicateCombination { .. } => "REJECT_DUPLICATE_COMBINATION",
            DuplicateRecipeId(_) => "REJECT_DUPLICATE_RECIPE_ID",
            InvalidRecipeTime => "REJECT_INVALID_RECIPE_TIME",
            AlreadyDiscovered(_) => "REJECT_ALREADY_DISCOVERED",
            InsufficientGold { .. } => "REJECT_INSUFFICIENT_GOLD",
            PackUnavailable(_) => "REJECT_PACK_UNAVAILABLE",
            UnknownPack(_) => "REJECT_UNKNOWN_PACK",
            CardNotInPack { .. } => "REJECT_CARD_NOT_IN_PACK",
            PackAlreadyUnlocked(_) => "REJECT_PACK_ALREADY_UNLOCKED",
            InvariantViolated(_) => "REJECT_INVARIANT_VIOLATED",
        }
    }
}
