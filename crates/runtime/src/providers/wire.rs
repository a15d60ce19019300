//! JSON wire format of the rules service.
//!
//! Responses look like `{"result": "<kind>", "payload": {...}}`. Numbers may
//! arrive as floats or strings and the object may be wrapped in prose or a
//! code fence; parsing is lenient about all of that but strict about the
//! shape.

use std::str::FromStr;

use game_core::{
    CardId, DiscoveryOutcome, EventEffect, OutputProposal, RandomEvent, Rarity, RecipeProposal,
};
use serde::Deserialize;
use serde_json::Value;

use super::ProviderError;

#[derive(Debug, Deserialize)]
#[serde(tag = "result", content = "payload", rename_all = "camelCase")]
enum WireResponse {
    NewRecipe {
        recipe: WireRecipe,
    },
    Invalid {
        #[serde(default)]
        reason: String,
    },
    EraAdvance {
        #[serde(rename = "newEra")]
        new_era: String,
        #[serde(default)]
        description: String,
    },
    RandomEvent(WireEvent),
}

#[derive(Debug, Deserialize)]
struct WireRecipe {
    #[serde(default)]
    inputs: Vec<String>,
    time: Value,
    outputs: Vec<WireOutput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOutput {
    name: String,
    #[serde(rename = "type", alias = "kind")]
    kind: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    rarity: Option<String>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    durability: Option<Value>,
    #[serde(default)]
    hunger_points: Option<Value>,
    #[serde(default)]
    health: Option<Value>,
    #[serde(default)]
    count: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    effects: Vec<WireEffect>,
}

#[derive(Debug, Deserialize)]
struct WireEffect {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: Value,
}

/// Parses the assistant message of a combination check.
pub fn parse_outcome(content: &str) -> Result<DiscoveryOutcome, ProviderError> {
    let response: WireResponse = serde_json::from_str(json_object(content)?)?;

    match response {
        WireResponse::NewRecipe { recipe } => recipe_proposal(recipe).map(DiscoveryOutcome::NewRecipe),
        WireResponse::Invalid { reason } => Ok(DiscoveryOutcome::Invalid { reason }),
        WireResponse::EraAdvance {
            new_era,
            description,
        } => Ok(DiscoveryOutcome::EraAdvance {
            new_era,
            description,
        }),
        WireResponse::RandomEvent(event) => Ok(DiscoveryOutcome::RandomEvent(random_event(event))),
    }
}

/// Parses the assistant message of a random-event request.
///
/// Accepts either the full `{result, payload}` envelope or the bare payload.
pub fn parse_random_event(content: &str) -> Result<RandomEvent, ProviderError> {
    let object = json_object(content)?;

    if let Ok(response) = serde_json::from_str::<WireResponse>(object) {
        return match response {
            WireResponse::RandomEvent(event) => Ok(random_event(event)),
            other => Err(ProviderError::Malformed(format!(
                "expected a random event, got {other:?}"
            ))),
        };
    }

    let event: WireEvent = serde_json::from_str(object)?;
    Ok(random_event(event))
}

/// Slices the outermost JSON object out of `content`.
fn json_object(content: &str) -> Result<&str, ProviderError> {
    let start = content.find('{');
    let end = content.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&content[start..=end]),
        _ => Err(ProviderError::Malformed(
            "response contains no JSON object".to_owned(),
        )),
    }
}

fn recipe_proposal(recipe: WireRecipe) -> Result<RecipeProposal, ProviderError> {
    if recipe.outputs.is_empty() {
        return Err(ProviderError::Malformed("recipe has no outputs".to_owned()));
    }
    let time = number(&recipe.time)
        .ok_or_else(|| ProviderError::Malformed(format!("invalid recipe time {}", recipe.time)))?;

    Ok(RecipeProposal {
        inputs: recipe.inputs,
        time,
        outputs: recipe.outputs.into_iter().map(output_proposal).collect(),
    })
}

fn output_proposal(output: WireOutput) -> OutputProposal {
    let field = |value: &Option<Value>| value.as_ref().and_then(number);

    OutputProposal {
        rarity: output
            .rarity
            .as_deref()
            .and_then(|rarity| Rarity::from_str(rarity).ok())
            .unwrap_or_default(),
        price: field(&output.price).unwrap_or(0),
        durability: field(&output.durability),
        hunger_points: field(&output.hunger_points),
        health: field(&output.health),
        count: field(&output.count).unwrap_or(1),
        name: output.name,
        kind: output.kind,
        description: output.description,
    }
}

fn random_event(event: WireEvent) -> RandomEvent {
    let effects = event
        .effects
        .iter()
        .filter_map(|effect| {
            let parsed = event_effect(effect);
            if parsed.is_none() {
                tracing::debug!(kind = %effect.kind, value = %effect.value, "skipping unusable event effect");
            }
            parsed
        })
        .collect();

    RandomEvent {
        title: event.title,
        description: event.description,
        effects,
    }
}

fn event_effect(effect: &WireEffect) -> Option<EventEffect> {
    let card_id = || {
        effect
            .value
            .as_str()
            .filter(|id| !id.trim().is_empty())
            .map(|id| CardId::from(id.trim()))
    };

    match effect.kind.to_ascii_uppercase().as_str() {
        "ADD_CARD" => Some(EventEffect::AddCard {
            card_id: card_id()?,
            count: 1,
        }),
        "REMOVE_CARD" => Some(EventEffect::RemoveCard {
            card_id: card_id()?,
            count: 1,
        }),
        "DAMAGE_VILLAGER" | "DAMAGE_VILLAGERS" => Some(EventEffect::DamageVillagers {
            amount: number(&effect.value)?,
        }),
        "ADD_GOLD" => Some(EventEffect::AddGold {
            amount: u64::from(number::<u32>(&effect.value)?),
        }),
        "REMOVE_GOLD" => Some(EventEffect::RemoveGold {
            amount: u64::from(number::<u32>(&effect.value)?),
        }),
        _ => None,
    }
}

/// Reads a non-negative whole number from a JSON number or numeric string,
/// rounding fractions.
fn number<T: TryFrom<u64>>(value: &Value) -> Option<T> {
    let raw = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    T::try_from(raw.round() as u64).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_new_recipe() {
        let content = r#"
        Here you go:
        ```json
        {
          "result": "newRecipe",
          "payload": {
            "recipe": {
              "inputs": ["Villager", "Stone"],
              "time": 4.6,
              "outputs": [
                {
                  "name": "Stone Wall",
                  "type": "structure",
                  "description": "Keeps wolves out",
                  "rarity": "Uncommon",
                  "price": "6",
                  "count": 2
                }
              ],
              "era": "stone"
            }
          }
        }
        ```"#;

        let DiscoveryOutcome::NewRecipe(proposal) = parse_outcome(content).unwrap() else {
            panic!("expected a recipe");
        };
        assert_eq!(proposal.time, 5);
        assert_eq!(proposal.inputs, vec!["Villager", "Stone"]);
        let output = &proposal.outputs[0];
        assert_eq!(output.name, "Stone Wall");
        assert_eq!(output.kind, "structure");
        assert_eq!(output.rarity, Rarity::Uncommon);
        assert_eq!(output.price, 6);
        assert_eq!(output.count, 2);
        assert_eq!(output.hunger_points, None);
    }

    #[test]
    fn parses_invalid_and_era_advance() {
        assert_eq!(
            parse_outcome(r#"{"result":"invalid","payload":{"reason":"nothing happens"}}"#)
                .unwrap(),
            DiscoveryOutcome::Invalid {
                reason: "nothing happens".to_owned()
            }
        );
        assert_eq!(
            parse_outcome(
                r#"{"result":"eraAdvance","payload":{"newEra":"bronze","description":"Smelting!"}}"#
            )
            .unwrap(),
            DiscoveryOutcome::EraAdvance {
                new_era: "bronze".to_owned(),
                description: "Smelting!".to_owned()
            }
        );
    }

    #[test]
    fn event_effects_take_ids_or_amounts() {
        let event = parse_random_event(
            r#"{"result":"randomEvent","payload":{
                "title":"Flood",
                "description":"The river rises",
                "effects":[
                    {"type":"ADD_CARD","value":"wood"},
                    {"type":"DAMAGE_VILLAGER","value":3},
                    {"type":"REMOVE_GOLD","value":"4"},
                    {"type":"ADD_CARD","value":7},
                    {"type":"SUMMON_DRAGON","value":1}
                ]}}"#,
        )
        .unwrap();

        assert_eq!(event.title, "Flood");
        assert_eq!(
            event.effects,
            vec![
                EventEffect::AddCard {
                    card_id: CardId::from("wood"),
                    count: 1
                },
                EventEffect::DamageVillagers { amount: 3 },
                EventEffect::RemoveGold { amount: 4 },
            ]
        );
    }

    #[test]
    fn bare_event_payload_is_accepted() {
        let event =
            parse_random_event(r#"{"title":"Calm","description":"Nothing","effects":[]}"#).unwrap();
        assert_eq!(event.title, "Calm");
        assert!(event.effects.is_empty());
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            parse_outcome("the cards refuse to combine"),
            Err(ProviderError::Malformed(_))
        ));
        assert!(matches!(
            parse_outcome(r#"{"result":"teleport","payload":{}}"#),
            Err(ProviderError::Malformed(_))
        ));
        assert!(matches!(
            parse_outcome(r#"{"result":"newRecipe","payload":{"recipe":{"time":3,"outputs":[]}}}"#),
            Err(ProviderError::Malformed(_))
        ));
    }
}
