//! Deterministic crafting rules shared by the runtime and tools.
//!
//! `game-core` defines the canonical aggregate ([`GameState`]), the actions
//! that change it, the engine that applies them, and the recipe matcher.
//! All state mutation flows through [`engine::GameEngine`]; nothing in this
//! crate performs I/O.
pub mod action;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod env;
pub mod error;
pub mod matcher;
pub mod state;

pub use action::{
    Action, ActionTransition, BoardAction, CatalogAction, EconomyAction, EventEffect,
    InitializeAction, InventoryAction, ProgressionAction, Rejection, SynthesisAction,
};
pub use config::GameConfig;
pub use discovery::{
    DiscoveryOutcome, DiscoveryRequest, MaterializedRecipe, OutputProposal, RandomEvent,
    RecipeProposal, SelectionSnapshot, materialize,
};
pub use engine::{GameEngine, StateReducer, TransitionOutcome, TransitionPhase, reduce};
pub use env::{ContentOracle, ContentSnapshot, Env, GameEnv, OracleError};
pub use error::{ErrorSeverity, GameError};
pub use matcher::{
    board_holds_inputs, find_matching_recipe, match_selection, selection_holds_inputs,
};
pub use state::{
    Card, CardId, CardKind, CardPack, Era, GameState, InventoryEntry, InventoryState, PackEntry,
    PackId, Position, ProcessingRecipe, Rarity, Recipe, RecipeId, RecipeOutput, StateError,
};
