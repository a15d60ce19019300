//! Session worker that owns the authoritative [`game_core::GameState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], runs actions through
//! [`game_core::GameEngine`], and publishes the outcome to the EventBus.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace};

use game_core::{Action, GameEngine, GameError, GameState, SynthesisAction, TransitionOutcome};

use crate::events::{Event, EventBus, GameStateEvent, SynthesisEvent};
use crate::oracle::OracleManager;

/// Commands that can be sent to the session worker
pub enum Command {
    /// Apply an action. Rejections are replied, not raised.
    Dispatch {
        action: Action,
        reply: oneshot::Sender<TransitionOutcome>,
    },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    /// Stop accepting commands and hand back the final state.
    Shutdown { reply: oneshot::Sender<GameState> },
}

/// Background task that serializes every transition of the session.
pub struct SessionWorker {
    state: GameState,
    oracles: OracleManager,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SessionWorker {
    pub fn new(
        state: GameState,
        oracles: OracleManager,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            turn = state.turn,
            era = %state.era,
            active_cards = state.active_cards.len(),
            "session worker initialized"
        );

        Self {
            state,
            oracles,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                Command::Dispatch { action, reply } => {
                    let outcome = self.execute(action);
                    if reply.send(outcome).is_err() {
                        debug!("Dispatch reply channel closed (caller dropped)");
                    }
                }
                Command::QueryState { reply } => {
                    if reply.send(self.state.clone()).is_err() {
                        debug!("QueryState reply channel closed (caller dropped)");
                    }
                }
                Command::Shutdown { reply } => {
                    if reply.send(self.state.clone()).is_err() {
                        debug!("Shutdown reply channel closed (caller dropped)");
                    }
                    break;
                }
            }
        }

        info!(turn = self.state.turn, "session worker stopped");
    }

    /// Runs one action and publishes what happened.
    ///
    /// This is the only place that calls [`GameEngine::execute`].
    fn execute(&mut self, action: Action) -> TransitionOutcome {
        let processing_before = self
            .state
            .processing_recipe
            .as_ref()
            .map(|processing| processing.recipe_id.clone());

        let outcome = GameEngine::new(&mut self.state).execute(self.oracles.as_game_env(), &action);

        match &outcome {
            TransitionOutcome::Applied => {
                if action.is_progress_tick() {
                    trace!(action = action.name(), "action applied");
                } else {
                    debug!(action = action.name(), turn = self.state.turn, "action applied");
                }

                if let Some(event) = synthesis_event(&action, &self.state, processing_before) {
                    self.event_bus.publish(Event::Synthesis(event));
                }
                self.event_bus
                    .publish(Event::GameState(GameStateEvent::ActionApplied {
                        turn: self.state.turn,
                        state: Box::new(self.state.clone()),
                        action,
                    }));
            }
            TransitionOutcome::Rejected(error) => {
                debug!(
                    action = action.name(),
                    code = error.error_code(),
                    phase = error.phase.as_str(),
                    reason = %error.rejection,
                    "action rejected"
                );
                self.event_bus
                    .publish(Event::GameState(GameStateEvent::ActionRejected {
                        code: error.error_code(),
                        reason: error.rejection.to_string(),
                        action,
                    }));
            }
        }

        outcome
    }
}

/// Synthesis lifecycle event implied by an applied action, if any.
fn synthesis_event(
    action: &Action,
    state: &GameState,
    processing_before: Option<game_core::RecipeId>,
) -> Option<SynthesisEvent> {
    let Action::Synthesis(action) = action else {
        return None;
    };

    match action {
        SynthesisAction::StartRecipeProcessing { recipe_id } => Some(SynthesisEvent::Started {
            recipe_id: recipe_id.clone(),
            total_time: state
                .processing_recipe
                .as_ref()
                .map_or(0, |processing| processing.total_time),
        }),
        SynthesisAction::UpdateRecipeProgress { .. } => {
            state
                .processing_recipe
                .as_ref()
                .map(|processing| SynthesisEvent::Progress {
                    recipe_id: processing.recipe_id.clone(),
                    progress: processing.progress,
                })
        }
        SynthesisAction::CompleteRecipe => {
            processing_before.map(|recipe_id| SynthesisEvent::Completed { recipe_id })
        }
        SynthesisAction::CancelRecipe => {
            processing_before.map(|recipe_id| SynthesisEvent::Cancelled { recipe_id })
        }
    }
}
