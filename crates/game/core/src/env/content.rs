use crate::state::{Card, CardId, CardPack, Era, PackId, Recipe};

/// Read-only seed content consumed by `Initialize`, era advances and pack
/// purchases.
pub trait ContentOracle: Send + Sync {
    /// Cards granted once each to a fresh session.
    fn starter_cards(&self) -> &[Card];

    /// Definitions that are not starter cards but can be obtained from packs
    /// or seed recipes.
    fn catalog_cards(&self) -> &[Card];

    /// Seed recipe catalog, in matching order.
    fn recipes(&self) -> &[Recipe];

    fn card_packs(&self) -> &[CardPack];

    fn card_pack(&self, id: &PackId) -> Option<&CardPack> {
        self.card_packs().iter().find(|pack| &pack.id == id)
    }

    fn packs_for_era(&self, era: Era) -> Vec<&CardPack> {
        self.card_packs()
            .iter()
            .filter(|pack| pack.era == era)
            .collect()
    }

    fn card(&self, id: &CardId) -> Option<&Card> {
        self.starter_cards()
            .iter()
            .chain(self.catalog_cards())
            .find(|card| &card.id == id)
    }

    /// Every card definition the content knows about.
    fn all_cards(&self) -> Vec<&Card> {
        self.starter_cards()
            .iter()
            .chain(self.catalog_cards())
            .collect()
    }
}

/// In-memory content, used by tests and by loaders that have already parsed
/// their source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentSnapshot {
    pub starter_cards: Vec<Card>,
    pub catalog_cards: Vec<Card>,
    pub recipes: Vec<Recipe>,
    pub card_packs: Vec<CardPack>,
}

impl ContentOracle for ContentSnapshot {
    fn starter_cards(&self) -> &[Card] {
        &self.starter_cards
    }

    fn catalog_cards(&self) -> &[Card] {
        &self.catalog_cards
    }

    fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    fn card_packs(&self) -> &[CardPack] {
        &self.card_packs
    }
}
