//! Weighted card-pack draws.

use game_core::{CardId, CardPack};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

/// Draws one card from `pack`, weighting entries by their drop rate.
///
/// Returns `None` for an empty pack or one whose rates are all zero.
pub fn draw_from_pack<R>(pack: &CardPack, rng: &mut R) -> Option<CardId>
where
    R: Rng + ?Sized,
{
    let weights = WeightedIndex::new(pack.cards.iter().map(|entry| entry.drop_rate)).ok()?;
    let index = weights.sample(rng);
    pack.cards.get(index).map(|entry| entry.card_id.clone())
}

#[cfg(test)]
mod tests {
    use game_core::{Era, PackEntry, PackId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn pack(entries: &[(&str, f64)]) -> CardPack {
        CardPack {
            id: PackId::from("test"),
            name: "Test".to_owned(),
            description: String::new(),
            price: 3,
            era: Era::Stone,
            cards: entries
                .iter()
                .map(|(id, rate)| PackEntry {
                    card_id: CardId::from(*id),
                    drop_rate: *rate,
                })
                .collect(),
        }
    }

    #[test]
    fn seeded_draws_are_deterministic() {
        let pack = pack(&[("stone", 0.5), ("wood", 0.3), ("flint", 0.2)]);

        let first: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(7);
            (0..16).map(|_| draw_from_pack(&pack, &mut rng)).collect()
        };
        let second: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(7);
            (0..16).map(|_| draw_from_pack(&pack, &mut rng)).collect()
        };

        assert_eq!(first, second);
        assert!(first.iter().all(Option::is_some));
    }

    #[test]
    fn zero_weight_entries_are_never_drawn() {
        let pack = pack(&[("stone", 1.0), ("gem", 0.0)]);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..64 {
            assert_eq!(draw_from_pack(&pack, &mut rng), Some(CardId::from("stone")));
        }
    }

    #[test]
    fn empty_pack_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(draw_from_pack(&pack(&[]), &mut rng), None);
        assert_eq!(draw_from_pack(&pack(&[("stone", 0.0)]), &mut rng), None);
    }
}
