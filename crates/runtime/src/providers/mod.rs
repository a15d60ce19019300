//! Rules providers: adapters to the service that judges unknown card
//! combinations and invents random events.
//!
//! The orchestrator only sees [`RulesProvider`]; failures are recovered
//! there and never reach the session worker.

mod openai;
mod scripted;
mod wire;

use async_trait::async_trait;
use game_core::{DiscoveryOutcome, DiscoveryRequest, Era, RandomEvent};
use thiserror::Error;

pub use openai::{OpenAiConfig, OpenAiRulesProvider};
pub use scripted::ScriptedRulesProvider;
pub use wire::{parse_outcome, parse_random_event};

/// Errors raised while talking to a rules provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rules service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rules service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("rules service returned no message")]
    EmptyResponse,

    #[error("malformed rules response: {0}")]
    Malformed(String),

    #[error("rules provider unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(error: serde_json::Error) -> Self {
        ProviderError::Malformed(error.to_string())
    }
}

/// External judge of combinations.
#[async_trait]
pub trait RulesProvider: Send + Sync {
    /// Decide what the described selection produces.
    async fn check_combination(
        &self,
        request: &DiscoveryRequest,
    ) -> Result<DiscoveryOutcome, ProviderError>;

    /// Invent an event that fits `era`.
    async fn random_event(&self, era: Era) -> Result<RandomEvent, ProviderError>;
}
