use std::collections::BTreeSet;

use super::{OutputProposal, RecipeProposal};
use crate::config::GameConfig;
use crate::state::{Card, CardId, CardKind, GameState, Recipe, RecipeId, RecipeOutput};

/// Concrete catalog entry and the new card definitions it produces.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterializedRecipe {
    pub recipe: Recipe,
    /// Output definitions not yet known to the session.
    pub cards: Vec<Card>,
}

/// Lowercases `name` and joins whitespace-separated words with `_`.
pub fn slugify(name: &str) -> String {
    let slug = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() { "card".to_owned() } else { slug }
}

/// Turns a proposal into a recipe over the given selected instances.
///
/// The recipe id is `recipe_{minted_at}` and each output id is
/// `{slug}_{minted_at}`; a numeric suffix is appended when an id is already
/// taken. The recipe is added undiscovered and belongs to the current era.
pub fn materialize(
    proposal: &RecipeProposal,
    inputs: &[CardId],
    state: &GameState,
    minted_at: i64,
) -> MaterializedRecipe {
    let recipe_id = unique(format!("recipe_{minted_at}"), |candidate| {
        state.recipe(&RecipeId::from(candidate)).is_some()
    });

    let mut taken: BTreeSet<String> = BTreeSet::new();
    let mut outputs = Vec::with_capacity(proposal.outputs.len());
    let mut cards = Vec::with_capacity(proposal.outputs.len());

    for output in &proposal.outputs {
        let id = unique(format!("{}_{minted_at}", slugify(&output.name)), |candidate| {
            taken.contains(candidate) || state.lookup_card(&CardId::from(candidate)).is_some()
        });
        taken.insert(id.clone());

        let card = mint_card(output, CardId::from(id.as_str()), state);
        outputs.push(RecipeOutput::new(card.id.clone(), output.count.max(1)));
        cards.push(card);
    }

    MaterializedRecipe {
        recipe: Recipe {
            id: RecipeId::from(recipe_id),
            inputs: inputs.to_vec(),
            time: proposal.time.max(1),
            outputs,
            era: state.era,
            discovered: false,
        },
        cards,
    }
}

fn unique(base: String, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(&base) {
        return base;
    }
    (1u32..)
        .map(|suffix| format!("{base}_{suffix}"))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or(base)
}

fn mint_card(output: &OutputProposal, id: CardId, state: &GameState) -> Card {
    let kind = match output.kind.to_ascii_lowercase().as_str() {
        "mob" | "creature" => CardKind::Creature {
            health: output
                .health
                .unwrap_or(GameConfig::DEFAULT_CREATURE_HEALTH),
            capture_rate: None,
        },
        "structure" => CardKind::Structure,
        "food" => CardKind::Food {
            hunger_points: output.hunger_points.unwrap_or_default(),
        },
        "villager" => CardKind::Villager {
            health: output
                .health
                .unwrap_or(GameConfig::DEFAULT_VILLAGER_HEALTH),
            hunger: GameConfig::DEFAULT_VILLAGER_HUNGER,
        },
        _ => CardKind::Resource {
            durability: output.durability,
        },
    };

    Card::new(id, output.name.clone(), kind)
        .with_description(output.description.clone())
        .with_rarity(output.rarity)
        .with_era(state.era)
        .with_price(output.price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Era, Rarity};

    fn output(name: &str, kind: &str) -> OutputProposal {
        OutputProposal {
            name: name.to_owned(),
            kind: kind.to_owned(),
            description: format!("A {name}"),
            rarity: Rarity::Uncommon,
            price: 4,
            durability: None,
            hunger_points: Some(3),
            health: None,
            count: 2,
        }
    }

    fn proposal(outputs: Vec<OutputProposal>) -> RecipeProposal {
        RecipeProposal {
            inputs: vec!["Stone".to_owned(), "Wood".to_owned()],
            time: 4,
            outputs,
        }
    }

    #[test]
    fn slugify_joins_words() {
        assert_eq!(slugify("Stone Axe"), "stone_axe");
        assert_eq!(slugify("  Big   Clay Pot "), "big_clay_pot");
        assert_eq!(slugify(""), "card");
    }

    #[test]
    fn mints_ids_from_timestamp() {
        let mut state = GameState::new();
        state.era = Era::Bronze;
        let inputs = vec![CardId::from("stone"), CardId::from("wood")];

        let bread = proposal(vec![output("Flat Bread", "food")]);
        let minted = materialize(&bread, &inputs, &state, 1700);

        assert_eq!(minted.recipe.id.as_str(), "recipe_1700");
        assert_eq!(minted.recipe.inputs, inputs);
        assert_eq!(minted.recipe.time, 4);
        assert_eq!(minted.recipe.era, Era::Bronze);
        assert!(!minted.recipe.discovered);
        assert_eq!(
            minted.recipe.outputs,
            vec![RecipeOutput::new("flat_bread_1700", 2)]
        );

        let card = &minted.cards[0];
        assert_eq!(card.kind, CardKind::Food { hunger_points: 3 });
        assert_eq!(card.era, Era::Bronze);
        assert_eq!(card.rarity, Rarity::Uncommon);
        assert_eq!(card.price, 4);
    }

    #[test]
    fn suffixes_colliding_ids() {
        let mut state = GameState::new();
        state.recipes.push(Recipe {
            id: "recipe_5".into(),
            inputs: vec!["a".into(), "b".into()],
            time: 1,
            outputs: Vec::new(),
            era: Era::Stone,
            discovered: false,
        });

        let minted = materialize(
            &proposal(vec![output("Pot", "resource"), output("Pot", "resource")]),
            &["a".into(), "b".into()],
            &state,
            5,
        );

        assert_eq!(minted.recipe.id.as_str(), "recipe_5_1");
        assert_eq!(minted.cards[0].id.as_str(), "pot_5");
        assert_eq!(minted.cards[1].id.as_str(), "pot_5_1");
    }

    #[test]
    fn villagers_and_creatures_get_defaults() {
        let state = GameState::new();
        let mut zero_time = proposal(vec![output("Helper", "villager"), output("Wolf", "mob")]);
        zero_time.time = 0;

        let minted = materialize(&zero_time, &["a".into(), "b".into()], &state, 9);

        assert_eq!(minted.recipe.time, 1);
        assert_eq!(
            minted.cards[0].kind,
            CardKind::Villager {
                health: GameConfig::DEFAULT_VILLAGER_HEALTH,
                hunger: GameConfig::DEFAULT_VILLAGER_HUNGER,
            }
        );
        assert_eq!(
            minted.cards[1].kind,
            CardKind::Creature {
                health: GameConfig::DEFAULT_CREATURE_HEALTH,
                capture_rate: None,
            }
        );
    }
}
