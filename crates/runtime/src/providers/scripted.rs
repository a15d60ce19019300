//! Rules provider that replays canned answers.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use game_core::{DiscoveryOutcome, DiscoveryRequest, Era, RandomEvent};

use super::{ProviderError, RulesProvider};

/// FIFO of scripted answers for tests and offline play.
///
/// When the combination script runs dry every combination is judged
/// `invalid`; when the event script runs dry every event is uneventful.
#[derive(Default)]
pub struct ScriptedRulesProvider {
    outcomes: Mutex<VecDeque<Result<DiscoveryOutcome, ProviderError>>>,
    events: Mutex<VecDeque<Result<RandomEvent, ProviderError>>>,
    requests: Mutex<Vec<DiscoveryRequest>>,
    delay: Option<Duration>,
}

impl ScriptedRulesProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every combination check with `outcome` in order.
    pub fn with_outcomes(outcomes: impl IntoIterator<Item = DiscoveryOutcome>) -> Self {
        let provider = Self::new();
        for outcome in outcomes {
            provider.push_outcome(outcome);
        }
        provider
    }

    /// Waits `delay` before answering a combination check.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_outcome(&self, outcome: DiscoveryOutcome) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push_back(Ok(outcome));
        }
    }

    /// Makes the next combination check fail with `error`.
    pub fn push_failure(&self, error: ProviderError) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push_back(Err(error));
        }
    }

    pub fn push_event(&self, event: RandomEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push_back(Ok(event));
        }
    }

    pub fn push_event_failure(&self, error: ProviderError) {
        if let Ok(mut events) = self.events.lock() {
            events.push_back(Err(error));
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<DiscoveryRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

fn poisoned<T>(_: T) -> ProviderError {
    ProviderError::Unavailable("scripted provider lock poisoned".to_owned())
}

#[async_trait]
impl RulesProvider for ScriptedRulesProvider {
    async fn check_combination(
        &self,
        request: &DiscoveryRequest,
    ) -> Result<DiscoveryOutcome, ProviderError> {
        self.requests.lock().map_err(poisoned)?.push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.outcomes.lock().map_err(poisoned)?.pop_front();
        next.unwrap_or_else(|| {
            Ok(DiscoveryOutcome::Invalid {
                reason: "nothing happens".to_owned(),
            })
        })
    }

    async fn random_event(&self, _era: Era) -> Result<RandomEvent, ProviderError> {
        let next = self.events.lock().map_err(poisoned)?.pop_front();
        next.unwrap_or_else(|| Ok(RandomEvent::uneventful()))
    }
}
