//! Pure side of recipe discovery.
//!
//! The runtime asks an external rules service about unknown combinations.
//! This module builds the request from a state, describes the possible
//! answers, and turns a proposed recipe into catalog entries and card
//! definitions. Nothing here performs I/O.

mod materialize;
mod request;

pub use materialize::{MaterializedRecipe, materialize, slugify};
pub use request::{CardSummary, DiscoveryRequest, EraContext, SampleRecipe, SelectionSnapshot};

use crate::action::EventEffect;
use crate::state::Rarity;

/// Answer of the rules service for a combination.
#[derive(Clone, Debug, PartialEq)]
pub enum DiscoveryOutcome {
    NewRecipe(RecipeProposal),
    Invalid { reason: String },
    /// `new_era` is kept as sent; it may not name a known era.
    EraAdvance { new_era: String, description: String },
    RandomEvent(RandomEvent),
}

impl DiscoveryOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            DiscoveryOutcome::NewRecipe(_) => "newRecipe",
            DiscoveryOutcome::Invalid { .. } => "invalid",
            DiscoveryOutcome::EraAdvance { .. } => "eraAdvance",
            DiscoveryOutcome::RandomEvent(_) => "randomEvent",
        }
    }
}

/// Abstract recipe returned by the rules service. Ids are minted later.
#[derive(Clone, Debug, PartialEq)]
pub struct RecipeProposal {
    /// Names the service believes were combined. Informational only.
    pub inputs: Vec<String>,
    pub time: u32,
    pub outputs: Vec<OutputProposal>,
}

/// Card the service proposes as a recipe output.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputProposal {
    pub name: String,
    /// Kind tag as sent (`resource`, `mob`, `structure`, `food`, `villager`).
    pub kind: String,
    pub description: String,
    pub rarity: Rarity,
    pub price: u32,
    pub durability: Option<u32>,
    pub hunger_points: Option<u32>,
    pub health: Option<u32>,
    pub count: u32,
}

/// Era-flavoured happening with effects on the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RandomEvent {
    pub title: String,
    pub description: String,
    pub effects: Vec<EventEffect>,
}

impl RandomEvent {
    /// Event used when the service cannot produce one.
    pub fn uneventful() -> Self {
        Self {
            title: "A quiet day".to_owned(),
            description: "Nothing out of the ordinary happened.".to_owned(),
            effects: Vec::new(),
        }
    }
}
