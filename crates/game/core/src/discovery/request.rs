use crate::config::GameConfig;
use crate::state::{CardId, Era, GameState, Recipe};

/// Card as described to the rules service.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardSummary {
    pub name: String,
    pub kind: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EraContext {
    pub current: Era,
    /// Eras up to and including `current`.
    pub available: Vec<Era>,
}

/// Known recipe given to the service as context, by card name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleRecipe {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Everything the rules service is told about a combination.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DiscoveryRequest {
    pub cards: Vec<CardSummary>,
    pub era: EraContext,
    pub sample_recipes: Vec<SampleRecipe>,
}

impl DiscoveryRequest {
    /// Describes the selected board instances of `state`.
    pub fn from_state(state: &GameState) -> Self {
        let cards = state
            .selected_instances()
            .into_iter()
            .map(|card| CardSummary {
                name: card.name.clone(),
                kind: card.kind.tag().to_owned(),
                description: card.description.clone(),
            })
            .collect();

        let sample_recipes = state
            .discovered_sample(GameConfig::DISCOVERY_SAMPLE_SIZE)
            .into_iter()
            .map(|recipe| sample(state, recipe))
            .collect();

        Self {
            cards,
            era: EraContext {
                current: state.era,
                available: state.era.up_to(),
            },
            sample_recipes,
        }
    }
}

fn sample(state: &GameState, recipe: &Recipe) -> SampleRecipe {
    let name = |id: &CardId| {
        state
            .lookup_card(id)
            .map_or_else(|| id.to_string(), |card| card.name.clone())
    };
    SampleRecipe {
        inputs: recipe.inputs.iter().map(name).collect(),
        outputs: recipe
            .outputs
            .iter()
            .map(|output| name(&output.card_id))
            .collect(),
    }
}

/// Selected board instance ids at one point in time, in board order.
///
/// Two snapshots differ when a card was selected, deselected, placed or
/// picked up in between.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSnapshot(Vec<CardId>);

impl SelectionSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self(
            state
                .selected_instances()
                .into_iter()
                .map(|card| card.id.clone())
                .collect(),
        )
    }

    pub fn ids(&self) -> &[CardId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the selection is large enough to be a combination.
    pub fn is_combination(&self) -> bool {
        self.0.len() >= GameConfig::MIN_RECIPE_INPUTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Card, CardKind, Position, RecipeOutput};

    fn state_with_selection() -> GameState {
        let mut state = GameState::new();
        let villager = Card::new(
            "villager",
            "Villager",
            CardKind::Villager {
                health: 10,
                hunger: 10,
            },
        )
        .with_description("A hard worker");
        let land = Card::new("land", "Land", CardKind::Structure);
        state.card_registry.insert(
            "wheat".into(),
            Card::new("wheat", "Wheat", CardKind::Food { hunger_points: 2 }),
        );
        state.active_cards.push(villager.placed_at(Position::new(0, 0)));
        state.active_cards.push(land.placed_at(Position::new(1, 0)));
        state.selected_card_ids = vec!["villager".into(), "land".into()];
        state
    }

    #[test]
    fn request_describes_selected_cards_and_era() {
        let state = state_with_selection();
        let request = DiscoveryRequest::from_state(&state);
        assert_eq!(request.cards.len(), 2);
        assert_eq!(request.cards[0].name, "Villager");
        assert_eq!(request.cards[0].kind, "villager");
        assert_eq!(request.cards[1].kind, "structure");
        assert_eq!(request.era.current, Era::Stone);
        assert_eq!(request.era.available, vec![Era::Stone]);
        assert!(request.sample_recipes.is_empty());
    }

    #[test]
    fn samples_are_bounded_and_use_names() {
        let mut state = state_with_selection();
        for index in 0..7 {
            let id = format!("r{index}");
            state.recipes.push(Recipe {
                id: id.as_str().into(),
                inputs: vec!["villager".into(), "land".into()],
                time: 1,
                outputs: vec![RecipeOutput::new("wheat", 1)],
                era: Era::Stone,
                discovered: true,
            });
            state.discovered_recipe_ids.push(id.into());
        }

        let request = DiscoveryRequest::from_state(&state);
        assert_eq!(request.sample_recipes.len(), GameConfig::DISCOVERY_SAMPLE_SIZE);
        // Inventory and registry know neither input, so ids are used.
        assert_eq!(request.sample_recipes[0].inputs, vec!["villager", "land"]);
        assert_eq!(request.sample_recipes[0].outputs, vec!["Wheat"]);
    }

    #[test]
    fn snapshot_changes_with_board() {
        let mut state = state_with_selection();
        let before = SelectionSnapshot::capture(&state);
        assert!(before.is_combination());

        state.selected_card_ids.pop();
        let after = SelectionSnapshot::capture(&state);
        assert_ne!(before, after);
        assert!(!after.is_combination());
    }
}
