use std::collections::BTreeSet;

use super::{CardId, Era, PackId, RecipeId};

/// One output line of a recipe.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecipeOutput {
    pub card_id: CardId,
    pub count: u32,
}

impl RecipeOutput {
    pub fn new(card_id: impl Into<CardId>, count: u32) -> Self {
        Self {
            card_id: card_id.into(),
            count,
        }
    }
}

/// Combination rule: input card ids (ordered, may repeat) produce outputs
/// after `time` seconds of synthesis.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recipe {
    pub id: RecipeId,
    pub inputs: Vec<CardId>,
    pub time: u32,
    pub outputs: Vec<RecipeOutput>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub era: Era,
    #[cfg_attr(feature = "serde", serde(default))]
    pub discovered: bool,
}

impl Recipe {
    /// Distinct input ids. Two recipes with equal input sets describe the
    /// same combination.
    pub fn input_set(&self) -> BTreeSet<&CardId> {
        self.inputs.iter().collect()
    }
}

/// Synthesis in progress.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProcessingRecipe {
    pub recipe_id: RecipeId,
    /// Percentage in `[0, 100]`.
    pub progress: f64,
    pub total_time: u32,
    pub active: bool,
}

impl ProcessingRecipe {
    pub fn start(recipe_id: RecipeId, total_time: u32) -> Self {
        Self {
            recipe_id,
            progress: 0.0,
            total_time,
            active: true,
        }
    }
}

/// Weighted member of a card pack.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackEntry {
    pub card_id: CardId,
    pub drop_rate: f64,
}

/// Purchasable bundle of cards gated by era.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardPack {
    pub id: PackId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub price: u32,
    pub era: Era,
    pub cards: Vec<PackEntry>,
}

impl CardPack {
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.iter().any(|entry| &entry.card_id == id)
    }
}
