//! HTTP behavior of [`OpenAiRulesProvider`] against a mock endpoint.

use std::time::Duration;

use game_core::{
    CardId, DiscoveryOutcome, DiscoveryRequest, Era, EventEffect, GameState, Rarity,
};
use runtime::{OpenAiConfig, OpenAiRulesProvider, ProviderError, RulesProvider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OpenAiRulesProvider {
    OpenAiRulesProvider::new(OpenAiConfig {
        base_url: format!("{}/v1/", server.uri()),
        model: "test-model".to_owned(),
        api_key: Some("test-key".to_owned()),
        timeout: Duration::from_secs(5),
    })
    .expect("client should build")
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-test",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    }))
}

fn request() -> DiscoveryRequest {
    DiscoveryRequest::from_state(&GameState::new())
}

#[tokio::test]
async fn combination_check_posts_chat_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "test-model" })))
        .respond_with(completion(
            r#"{"result": "invalid", "payload": {"reason": "Stones do not talk"}}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = provider(&server)
        .check_combination(&request())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DiscoveryOutcome::Invalid {
            reason: "Stones do not talk".to_owned()
        }
    );
}

#[tokio::test]
async fn new_recipe_wrapped_in_prose_is_parsed() {
    let server = MockServer::start().await;
    let content = r#"Here you go:
```json
{"result": "newRecipe", "payload": {"recipe": {
  "inputs": ["Villager", "Stone"], "time": "4",
  "outputs": [{"name": "Stone Wall", "type": "structure", "rarity": "rare", "price": 9.0}]
}}}
```"#;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion(content))
        .mount(&server)
        .await;

    let outcome = provider(&server)
        .check_combination(&request())
        .await
        .unwrap();

    let DiscoveryOutcome::NewRecipe(recipe) = outcome else {
        panic!("expected a new recipe, got {outcome:?}");
    };
    assert_eq!(recipe.time, 4);
    assert_eq!(recipe.outputs.len(), 1);
    assert_eq!(recipe.outputs[0].name, "Stone Wall");
    assert_eq!(recipe.outputs[0].kind, "structure");
    assert_eq!(recipe.outputs[0].rarity, Rarity::Rare);
    assert_eq!(recipe.outputs[0].price, 9);
    assert_eq!(recipe.outputs[0].count, 1);
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let error = provider(&server)
        .check_combination(&request())
        .await
        .unwrap_err();

    match error {
        ProviderError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_are_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let error = provider(&server)
        .check_combination(&request())
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::EmptyResponse), "{error:?}");
}

#[tokio::test]
async fn prose_without_json_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("I would rather not say."))
        .mount(&server)
        .await;

    let error = provider(&server)
        .check_combination(&request())
        .await
        .unwrap_err();
    assert!(matches!(error, ProviderError::Malformed(_)), "{error:?}");
}

#[tokio::test]
async fn random_event_keeps_usable_effects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion(
            r#"{"title": "Rockslide", "description": "The hills shift.", "effects": [
                {"type": "ADD_CARD", "value": "stone"},
                {"type": "REMOVE_GOLD", "value": 3},
                {"type": "SUMMON_DRAGON", "value": 1}
            ]}"#,
        ))
        .mount(&server)
        .await;

    let event = provider(&server).random_event(Era::Stone).await.unwrap();

    assert_eq!(event.title, "Rockslide");
    assert_eq!(
        event.effects,
        vec![
            EventEffect::AddCard {
                card_id: CardId::from("stone"),
                count: 1
            },
            EventEffect::RemoveGold { amount: 3 },
        ]
    );
}
