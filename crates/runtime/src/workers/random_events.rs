//! Worker that rolls a random event on every event turn.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use game_core::{Action, Era, GameConfig, ProgressionAction, RandomEvent};

use crate::api::RuntimeHandle;
use crate::events::{DiscoveryEvent, Event, GameStateEvent};
use crate::providers::RulesProvider;

pub struct RandomEventWorker {
    handle: RuntimeHandle,
    rules: Arc<dyn RulesProvider>,
    game_config: GameConfig,
    event_rx: broadcast::Receiver<Event>,
    shutdown_rx: watch::Receiver<bool>,
}

impl RandomEventWorker {
    pub fn new(
        handle: RuntimeHandle,
        rules: Arc<dyn RulesProvider>,
        game_config: GameConfig,
        event_rx: broadcast::Receiver<Event>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            handle,
            rules,
            game_config,
            event_rx,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        info!(
            interval = self.game_config.random_event_interval,
            "random event worker started"
        );

        loop {
            tokio::select! {
                event = self.event_rx.recv() => {
                    match event {
                        Ok(Event::GameState(GameStateEvent::ActionApplied {
                            action: Action::Progression(ProgressionAction::AdvanceTurn),
                            turn,
                            state,
                        })) if self.game_config.is_event_turn(turn) => {
                            self.roll(turn, state.era).await;
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "random event worker lagged; turns may have been missed");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }

                _ = self.shutdown_rx.changed() => break,
            }
        }

        info!("random event worker stopped");
    }

    async fn roll(&self, turn: u32, era: Era) {
        let event = match self.rules.random_event(era).await {
            Ok(event) => event,
            Err(error) => {
                warn!(%error, turn, "random event unavailable, nothing happens");
                self.publish(RandomEvent::uneventful());
                return;
            }
        };

        debug!(turn, title = %event.title, effects = event.effects.len(), "random event");
        match self
            .handle
            .dispatch(Action::apply_event(event.effects.clone()))
            .await
        {
            Ok(outcome) if !outcome.is_applied() => {
                warn!(turn, title = %event.title, "random event effects were rejected");
            }
            Ok(_) => {}
            Err(error) => {
                warn!(%error, "session closed before the random event was applied");
                return;
            }
        }
        self.publish(event);
    }

    fn publish(&self, event: RandomEvent) {
        self.handle
            .event_bus()
            .publish(Event::Discovery(DiscoveryEvent::RandomEvent { event }));
    }
}
