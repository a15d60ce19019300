//! Seed content loader.

use std::collections::HashSet;
use std::path::Path;

use game_core::{Card, CardId, CardPack, ContentOracle, ContentSnapshot, Recipe};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Seed content structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    /// Granted once each at initialization. Repeating an id grants more
    /// copies.
    pub starter_cards: Vec<Card>,
    #[serde(default)]
    pub catalog_cards: Vec<Card>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub card_packs: Vec<CardPack>,
}

impl From<SeedFile> for ContentSnapshot {
    fn from(file: SeedFile) -> Self {
        ContentSnapshot {
            starter_cards: file.starter_cards,
            catalog_cards: file.catalog_cards,
            recipes: file.recipes,
            card_packs: file.card_packs,
        }
    }
}

/// Loader for seed content from RON files.
pub struct SeedLoader;

impl SeedLoader {
    /// Load and validate seed content from a RON file.
    pub fn load(path: &Path) -> LoadResult<ContentSnapshot> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid seed content in {}: {}", path.display(), e))
    }

    /// Parse and validate seed content from RON text.
    pub fn parse(source: &str) -> LoadResult<ContentSnapshot> {
        let file: SeedFile = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse seed RON: {}", e))?;
        let content = ContentSnapshot::from(file);
        validate(&content)?;
        Ok(content)
    }
}

/// Checks that every reference resolves and every recipe and pack is usable.
pub fn validate(content: &ContentSnapshot) -> LoadResult<()> {
    let known: HashSet<&CardId> = content.all_cards().into_iter().map(|card| &card.id).collect();

    let mut catalog_ids = HashSet::new();
    for card in &content.catalog_cards {
        anyhow::ensure!(
            catalog_ids.insert(&card.id),
            "catalog card {} is defined more than once",
            card.id
        );
    }

    let mut recipe_ids = HashSet::new();
    for recipe in &content.recipes {
        anyhow::ensure!(
            recipe_ids.insert(&recipe.id),
            "recipe {} is defined more than once",
            recipe.id
        );
        anyhow::ensure!(recipe.time > 0, "recipe {} has a zero time", recipe.id);
        anyhow::ensure!(
            recipe.inputs.len() >= game_core::GameConfig::MIN_RECIPE_INPUTS,
            "recipe {} needs at least two inputs",
            recipe.id
        );
        for input in &recipe.inputs {
            anyhow::ensure!(
                known.contains(input),
                "recipe {} uses unknown input {}",
                recipe.id,
                input
            );
        }
        for output in &recipe.outputs {
            anyhow::ensure!(
                known.contains(&output.card_id),
                "recipe {} produces unknown card {}",
                recipe.id,
                output.card_id
            );
        }
    }

    let mut pack_ids = HashSet::new();
    for pack in &content.card_packs {
        anyhow::ensure!(
            pack_ids.insert(&pack.id),
            "card pack {} is defined more than once",
            pack.id
        );
        anyhow::ensure!(!pack.cards.is_empty(), "card pack {} is empty", pack.id);
        for entry in &pack.cards {
            anyhow::ensure!(
                known.contains(&entry.card_id),
                "card pack {} lists unknown card {}",
                pack.id,
                entry.card_id
            );
            anyhow::ensure!(
                entry.drop_rate.is_finite() && entry.drop_rate > 0.0,
                "card pack {} has a non-positive drop rate for {}",
                pack.id,
                entry.card_id
            );
        }
    }

    Ok(())
}
