//! Seed content shipped with the crate.

use game_core::ContentSnapshot;

use crate::loaders::{LoadResult, SeedLoader};

/// RON source of the built-in seed.
pub const BUILTIN_SEED: &str = include_str!("../data/seed.ron");

/// Parses the built-in seed.
pub fn builtin() -> LoadResult<ContentSnapshot> {
    SeedLoader::parse(BUILTIN_SEED)
}

#[cfg(test)]
mod tests {
    use game_core::{CardId, ContentOracle, Era, PackId};

    use super::*;

    #[test]
    fn builtin_seed_is_valid() {
        let content = builtin().unwrap();
        assert_eq!(content.starter_cards.len(), 5);
        assert_eq!(content.recipes.len(), 3);
        assert!(content.recipes.iter().all(|recipe| recipe.discovered));
        assert_eq!(content.card_packs.len(), 4);
    }

    #[test]
    fn starting_era_offers_two_packs() {
        let content = builtin().unwrap();
        let stone: Vec<&PackId> = content
            .packs_for_era(Era::Stone)
            .into_iter()
            .map(|pack| &pack.id)
            .collect();
        assert_eq!(
            stone,
            vec![&PackId::from("basic_resources"), &PackId::from("livestock")]
        );
    }

    #[test]
    fn every_pack_card_is_defined() {
        let content = builtin().unwrap();
        for pack in &content.card_packs {
            for entry in &pack.cards {
                assert!(content.card(&entry.card_id).is_some(), "{}", entry.card_id);
            }
        }
        assert!(content.card(&CardId::from("stone_axe")).is_some());
    }
}
