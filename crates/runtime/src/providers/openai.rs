//! Rules provider backed by an OpenAI-compatible chat completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use game_core::{DiscoveryOutcome, DiscoveryRequest, Era, RandomEvent};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::wire::{parse_outcome, parse_random_event};
use super::{ProviderError, RulesProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const COMBINATION_TEMPERATURE: f32 = 0.7;
const EVENT_TEMPERATURE: f32 = 0.8;

const COMBINATION_SYSTEM_PROMPT: &str = "You are the rules engine of a card crafting game. \
You decide whether a set of cards combines into something new, always staying within the \
technology of the current era. Answer with a single JSON object and nothing else.";

const EVENT_SYSTEM_PROMPT: &str = "You generate random events for a card crafting game. \
Events are natural disasters, discoveries or conflicts that fit the current era. Answer with a \
single JSON object and nothing else.";

/// Connection settings for [`OpenAiRulesProvider`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL up to and including the API version, e.g. `https://host/v1`.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Clone)]
pub struct OpenAiRulesProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiRulesProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config: OpenAiConfig {
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                ..config
            },
        })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Sends one chat completion and returns the assistant message.
    async fn complete(
        &self,
        system: &str,
        prompt: String,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_owned(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
        };

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

#[async_trait]
impl RulesProvider for OpenAiRulesProvider {
    async fn check_combination(
        &self,
        request: &DiscoveryRequest,
    ) -> Result<DiscoveryOutcome, ProviderError> {
        let prompt = combination_prompt(request)?;
        tracing::debug!(
            model = %self.config.model,
            cards = request.cards.len(),
            era = %request.era.current,
            "checking combination"
        );

        let content = self
            .complete(COMBINATION_SYSTEM_PROMPT, prompt, COMBINATION_TEMPERATURE)
            .await?;
        parse_outcome(&content)
    }

    async fn random_event(&self, era: Era) -> Result<RandomEvent, ProviderError> {
        tracing::debug!(model = %self.config.model, %era, "requesting random event");

        let content = self
            .complete(EVENT_SYSTEM_PROMPT, event_prompt(era), EVENT_TEMPERATURE)
            .await?;
        parse_random_event(&content)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

fn combination_prompt(request: &DiscoveryRequest) -> Result<String, ProviderError> {
    let cards = serde_json::to_string_pretty(&request.cards)?;
    let era = serde_json::to_string_pretty(&request.era)?;
    let recipes = serde_json::to_string_pretty(&request.sample_recipes)?;

    Ok(format!(
        r#"## Card combination check

### Cards
{cards}

### Era
{era}

### Known recipes (sample)
{recipes}

Decide whether these cards combine into a new recipe. If they do, describe it; if not, explain why.

The answer must be JSON of this shape:
{{
  "result": "newRecipe" | "invalid" | "eraAdvance" | "randomEvent",
  "payload": {{
    "recipe": {{
      "inputs": ["input card name", ...],
      "time": seconds,
      "outputs": [
        {{
          "name": "output card name",
          "type": "resource|mob|structure|food|villager",
          "description": "card description",
          "rarity": "common|uncommon|rare|epic|legendary",
          "price": number,
          "durability": number (if any),
          "hungerPoints": number (food only),
          "health": number (creatures only),
          "count": number produced
        }}
      ],
      "era": "{current}"
    }}
  }} or {{
    "reason": "why nothing happens"
  }} or {{
    "newEra": "next era name",
    "description": "what changed"
  }}
}}"#,
        current = request.era.current,
    ))
}

fn event_prompt(era: Era) -> String {
    format!(
        r#"## Random event

### Era
{era}

Create a random event that fits this era: a natural disaster, a discovery, a conflict.

The answer must be JSON of this shape:
{{
  "result": "randomEvent",
  "payload": {{
    "title": "event title",
    "description": "event description",
    "effects": [
      {{
        "type": "ADD_CARD|REMOVE_CARD|DAMAGE_VILLAGER|ADD_GOLD|REMOVE_GOLD",
        "value": card id for card effects, amount otherwise
      }}
    ]
  }}
}}"#
    )
}

#[cfg(test)]
mod tests {
    use game_core::GameState;

    use super::*;

    #[test]
    fn combination_prompt_embeds_the_request() {
        let request = DiscoveryRequest::from_state(&GameState::new());
        let prompt = combination_prompt(&request).unwrap();

        assert!(prompt.contains("\"current\": \"stone\""));
        assert!(prompt.contains("\"era\": \"stone\""));
    }

    #[test]
    fn base_url_is_normalized() {
        let provider = OpenAiRulesProvider::new(OpenAiConfig {
            base_url: "http://localhost:8080/v1/".to_owned(),
            ..OpenAiConfig::default()
        })
        .unwrap();
        assert_eq!(provider.config().base_url, "http://localhost:8080/v1");
    }
}
