//! Discovery orchestrator.
//!
//! Watches applied transitions and turns a combination selection into a
//! running synthesis: a selection matching a catalog recipe starts it
//! directly, an unknown one is sent to the rules provider. While a recipe
//! is processing the worker ticks its progress and completes it.
//!
//! The rules call runs in its own task. Its answer is applied only if the
//! selection it was asked about is still the current one; otherwise it is
//! discarded and the current selection evaluated instead. A running
//! synthesis is cancelled as soon as its inputs leave the selection.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use game_core::{
    Action, DiscoveryOutcome, DiscoveryRequest, Era, GameConfig, GameState, RecipeId, Rejection,
    SelectionSnapshot, SynthesisAction, TransitionOutcome, match_selection, materialize,
    selection_holds_inputs,
};

use crate::api::RuntimeHandle;
use crate::events::{DiscoveryEvent, Event, GameStateEvent};
use crate::providers::{ProviderError, RulesProvider};

/// Where the orchestrator is in the selection → synthesis cycle.
#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    /// A rules call about `snapshot` is in flight.
    AwaitingDiscovery { snapshot: SelectionSnapshot },
    Synthesizing {
        recipe_id: RecipeId,
        ticks: u32,
        total_time: u32,
    },
}

/// Answer of a spawned rules call, tagged with the selection it was about.
struct Response {
    snapshot: SelectionSnapshot,
    result: Result<DiscoveryOutcome, ProviderError>,
}

/// Settings the orchestrator takes from the runtime configuration.
#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    pub tick_interval: Duration,
    /// Dispatch `AdvanceEra` when the rules service announces a later era.
    pub auto_advance_era: bool,
}

pub struct DiscoveryWorker {
    handle: RuntimeHandle,
    rules: Arc<dyn RulesProvider>,
    settings: DiscoverySettings,
    phase: Phase,
    last_evaluated: Option<SelectionSnapshot>,
    ticker: Option<Interval>,
    event_rx: broadcast::Receiver<Event>,
    response_tx: mpsc::Sender<Response>,
    response_rx: mpsc::Receiver<Response>,
    shutdown_rx: watch::Receiver<bool>,
}

impl DiscoveryWorker {
    pub fn new(
        handle: RuntimeHandle,
        rules: Arc<dyn RulesProvider>,
        settings: DiscoverySettings,
        event_rx: broadcast::Receiver<Event>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let (response_tx, response_rx) = mpsc::channel(4);
        Self {
            handle,
            rules,
            settings,
            phase: Phase::Idle,
            last_evaluated: None,
            ticker: None,
            event_rx,
            response_tx,
            response_rx,
            shutdown_rx,
        }
    }

    /// Main worker loop. `initial` is the state the session started from; a
    /// synthesis restored from a save resumes ticking.
    pub async fn run(mut self, initial: GameState) {
        info!(
            tick_ms = self.settings.tick_interval.as_millis() as u64,
            "discovery worker started"
        );

        if let Some(processing) = &initial.processing_recipe {
            self.resume(
                processing.recipe_id.clone(),
                processing.total_time,
                processing.progress,
            );
        } else {
            self.evaluate(&initial).await;
        }

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => break,

                event = self.event_rx.recv() => {
                    match event {
                        Ok(Event::GameState(GameStateEvent::ActionApplied { action, state, .. })) => {
                            self.on_applied(&action, &state).await;
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "discovery worker lagged, re-reading the session");
                            if let Ok(state) = self.handle.query_state().await {
                                self.resync(&state);
                                self.evaluate(&state).await;
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }

                Some(response) = self.response_rx.recv() => {
                    self.on_response(response).await;
                }

                _ = next_tick(&mut self.ticker) => {
                    self.on_tick().await;
                }
            }
        }

        info!("discovery worker stopped");
    }

    async fn on_applied(&mut self, action: &Action, state: &GameState) {
        match action {
            Action::Synthesis(SynthesisAction::StartRecipeProcessing { recipe_id }) => {
                let adopted = matches!(
                    &self.phase,
                    Phase::Synthesizing { recipe_id: current, .. } if current == recipe_id
                );
                if !adopted {
                    if let Some(processing) = &state.processing_recipe {
                        self.resume(
                            processing.recipe_id.clone(),
                            processing.total_time,
                            processing.progress,
                        );
                    }
                }
                return;
            }
            Action::Synthesis(SynthesisAction::CompleteRecipe | SynthesisAction::CancelRecipe)
            | Action::Initialize(_) => {
                if matches!(self.phase, Phase::Synthesizing { .. }) {
                    self.stop_ticker();
                }
            }
            _ => {
                if let Phase::Synthesizing { recipe_id, .. } = &self.phase {
                    let intact = state
                        .recipe(recipe_id)
                        .is_some_and(|recipe| selection_holds_inputs(state, recipe));
                    if !intact {
                        let recipe_id = recipe_id.clone();
                        self.abandon(&recipe_id).await;
                    }
                    return;
                }
            }
        }

        self.evaluate(state).await;
    }

    /// Looks at the selection of `state` and starts whatever it calls for.
    async fn evaluate(&mut self, state: &GameState) {
        if self.phase != Phase::Idle || state.is_processing() {
            return;
        }

        let snapshot = SelectionSnapshot::capture(state);
        if !snapshot.is_combination() {
            self.last_evaluated = None;
            return;
        }
        if self.last_evaluated.as_ref() == Some(&snapshot) {
            return;
        }
        self.last_evaluated = Some(snapshot.clone());

        if let Some(recipe) = match_selection(state) {
            let recipe_id = recipe.id.clone();
            let total_time = recipe.time;
            // The event copy may trail the session; later events re-evaluate.
            if !self.is_current(&snapshot).await {
                debug!(recipe_id = %recipe_id, "selection moved on before the match started");
                self.last_evaluated = None;
                return;
            }
            debug!(recipe_id = %recipe_id, "selection matches a known recipe");
            self.publish(DiscoveryEvent::Matched {
                recipe_id: recipe_id.clone(),
            });
            self.start(recipe_id, total_time).await;
            return;
        }

        let request = DiscoveryRequest::from_state(state);
        info!(cards = snapshot.len(), "asking the rules service about a new combination");
        self.publish(DiscoveryEvent::Requested {
            selection: snapshot.ids().to_vec(),
        });
        self.phase = Phase::AwaitingDiscovery {
            snapshot: snapshot.clone(),
        };

        let rules = Arc::clone(&self.rules);
        let response_tx = self.response_tx.clone();
        tokio::spawn(async move {
            let result = rules.check_combination(&request).await;
            if response_tx.send(Response { snapshot, result }).await.is_err() {
                debug!("discovery worker gone before the rules service answered");
            }
        });
    }

    async fn on_response(&mut self, response: Response) {
        if !matches!(self.phase, Phase::AwaitingDiscovery { .. }) {
            debug!("ignoring rules answer outside of a pending request");
            return;
        }
        self.phase = Phase::Idle;

        let Ok(state) = self.handle.query_state().await else {
            return;
        };

        let current = SelectionSnapshot::capture(&state);
        if current != response.snapshot || state.is_processing() {
            info!(
                requested = response.snapshot.len(),
                current = current.len(),
                "selection changed while waiting, discarding the answer"
            );
            self.publish(DiscoveryEvent::Discarded {
                requested: response.snapshot.ids().to_vec(),
                current: current.ids().to_vec(),
            });
            self.last_evaluated = None;
            self.evaluate(&state).await;
            return;
        }

        match response.result {
            Ok(outcome) => self.apply_outcome(outcome, &response.snapshot, &state).await,
            Err(error) => {
                warn!(%error, "rules service failed, keeping the selection");
                self.publish(DiscoveryEvent::Failed {
                    reason: error.to_string(),
                });
            }
        }
    }

    async fn apply_outcome(
        &mut self,
        outcome: DiscoveryOutcome,
        snapshot: &SelectionSnapshot,
        state: &GameState,
    ) {
        debug!(kind = outcome.kind(), "rules service answered");

        match outcome {
            DiscoveryOutcome::NewRecipe(proposal) => {
                let minted_at = chrono::Utc::now().timestamp_millis();
                let materialized = materialize(&proposal, snapshot.ids(), state, minted_at);
                let recipe_id = materialized.recipe.id.clone();
                let total_time = materialized.recipe.time;

                // Minted outputs are registered only for a recipe that was
                // actually added; a covered combination reuses the existing one.
                let (recipe_id, outputs) =
                    match self.dispatch(Action::add_recipe(materialized.recipe)).await {
                        Some(TransitionOutcome::Applied) => {
                            let mut outputs = Vec::with_capacity(materialized.cards.len());
                            for card in materialized.cards {
                                outputs.push(card.id.clone());
                                self.dispatch(Action::register_card(card)).await;
                            }
                            (recipe_id, outputs)
                        }
                        Some(TransitionOutcome::Rejected(error)) => match error.rejection {
                            Rejection::DuplicateCombination { existing } => {
                                debug!(existing = %existing, "combination already covered, reusing it");
                                let outputs = state
                                    .recipe(&existing)
                                    .map(|recipe| {
                                        recipe
                                            .outputs
                                            .iter()
                                            .map(|output| output.card_id.clone())
                                            .collect::<Vec<_>>()
                                    })
                                    .unwrap_or_default();
                                (existing, outputs)
                            }
                            other => {
                                warn!(recipe_id = %recipe_id, reason = %other, "proposed recipe rejected");
                                return;
                            }
                        },
                        None => return,
                    };

                info!(recipe_id = %recipe_id, outputs = outputs.len(), "new recipe discovered");
                self.publish(DiscoveryEvent::RecipeDiscovered {
                    recipe_id: recipe_id.clone(),
                    outputs,
                });

                let total_time = state
                    .recipe(&recipe_id)
                    .map_or(total_time, |recipe| recipe.time);
                self.start(recipe_id, total_time).await;
            }
            DiscoveryOutcome::Invalid { reason } => {
                debug!(%reason, "combination is invalid");
                self.dispatch(Action::clear_selection()).await;
                self.last_evaluated = None;
                self.publish(DiscoveryEvent::Invalid { reason });
            }
            DiscoveryOutcome::EraAdvance {
                new_era,
                description,
            } => {
                let accepted = match Era::from_str(new_era.trim()) {
                    Ok(era) if self.settings.auto_advance_era && era > state.era => {
                        info!(%era, "rules service advanced the era");
                        matches!(
                            self.dispatch(Action::advance_era(era)).await,
                            Some(TransitionOutcome::Applied)
                        )
                    }
                    _ => false,
                };
                self.publish(DiscoveryEvent::EraAdvance {
                    new_era,
                    description,
                    accepted,
                });
            }
            DiscoveryOutcome::RandomEvent(event) => {
                debug!(title = %event.title, "combination caused a random event");
                self.dispatch(Action::apply_event(event.effects.clone())).await;
                self.publish(DiscoveryEvent::RandomEvent { event });
            }
        }
    }

    async fn on_tick(&mut self) {
        let Some((recipe_id, progress)) = self.advance_tick() else {
            self.stop_ticker();
            return;
        };

        match self.dispatch(Action::update_progress(progress)).await {
            Some(TransitionOutcome::Applied) => {}
            _ => {
                debug!(recipe_id = %recipe_id, "synthesis vanished, stopping the ticker");
                self.stop_ticker();
                return;
            }
        }

        if progress >= GameConfig::MAX_PROGRESS {
            self.stop_ticker();
            match self.dispatch(Action::complete_recipe()).await {
                Some(TransitionOutcome::Applied) => {
                    info!(recipe_id = %recipe_id, "synthesis completed");
                }
                Some(TransitionOutcome::Rejected(error)) => {
                    warn!(recipe_id = %recipe_id, reason = %error, "synthesis could not complete");
                    self.abandon(&recipe_id).await;
                }
                None => {}
            }
        }
    }

    /// Counts one tick and returns the progress it amounts to.
    fn advance_tick(&mut self) -> Option<(RecipeId, f64)> {
        match &mut self.phase {
            Phase::Synthesizing {
                recipe_id,
                ticks,
                total_time,
            } => {
                *ticks += 1;
                let progress = (f64::from(*ticks) * GameConfig::MAX_PROGRESS
                    / f64::from((*total_time).max(1)))
                .min(GameConfig::MAX_PROGRESS);
                Some((recipe_id.clone(), progress))
            }
            _ => None,
        }
    }

    /// Dispatches `StartRecipeProcessing` and starts ticking on success.
    async fn start(&mut self, recipe_id: RecipeId, total_time: u32) {
        match self.dispatch(Action::start_recipe(recipe_id.clone())).await {
            Some(TransitionOutcome::Applied) => {
                info!(recipe_id = %recipe_id, total_time, "synthesis started");
                self.resume(recipe_id, total_time, 0.0);
            }
            Some(TransitionOutcome::Rejected(error)) => {
                debug!(recipe_id = %recipe_id, reason = %error, "synthesis did not start");
            }
            None => {}
        }
    }

    /// Enters the synthesizing phase at `progress` percent.
    fn resume(&mut self, recipe_id: RecipeId, total_time: u32, progress: f64) {
        let ticks = (progress / GameConfig::MAX_PROGRESS * f64::from(total_time)).floor() as u32;
        self.phase = Phase::Synthesizing {
            recipe_id,
            ticks,
            total_time,
        };

        let period = self.settings.tick_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }

    fn stop_ticker(&mut self) {
        self.ticker = None;
        self.phase = Phase::Idle;
    }

    /// Stops ticking and cancels the session's synthesis.
    async fn abandon(&mut self, recipe_id: &RecipeId) {
        info!(recipe_id = %recipe_id, "inputs left the selection, cancelling the synthesis");
        self.stop_ticker();
        self.last_evaluated = None;
        self.dispatch(Action::cancel_recipe()).await;
    }

    /// Whether the live session still has `snapshot` selected and is free
    /// to start a synthesis.
    async fn is_current(&self, snapshot: &SelectionSnapshot) -> bool {
        match self.handle.query_state().await {
            Ok(live) => !live.is_processing() && SelectionSnapshot::capture(&live) == *snapshot,
            Err(_) => false,
        }
    }

    /// Brings the phase in line with an authoritative state after lagging.
    fn resync(&mut self, state: &GameState) {
        match &state.processing_recipe {
            Some(processing) => {
                let tracking = matches!(
                    &self.phase,
                    Phase::Synthesizing { recipe_id, .. } if *recipe_id == processing.recipe_id
                );
                let awaiting = matches!(self.phase, Phase::AwaitingDiscovery { .. });
                if !tracking && !awaiting {
                    self.resume(
                        processing.recipe_id.clone(),
                        processing.total_time,
                        processing.progress,
                    );
                }
            }
            None => {
                if matches!(self.phase, Phase::Synthesizing { .. }) {
                    self.stop_ticker();
                }
            }
        }
    }

    /// Dispatches through the handle; `None` once the session is gone.
    async fn dispatch(&self, action: Action) -> Option<TransitionOutcome> {
        match self.handle.dispatch(action).await {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                debug!(%error, "session unavailable");
                None
            }
        }
    }

    fn publish(&self, event: DiscoveryEvent) {
        self.handle.event_bus().publish(Event::Discovery(event));
    }
}

/// Resolves on the next tick, or never when no synthesis is running.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn idle_ticker_never_fires() {
        let mut ticker = None;
        let fired = tokio::time::timeout(Duration::from_millis(20), next_tick(&mut ticker)).await;
        assert!(fired.is_err());
    }

    #[tokio::test]
    async fn first_tick_waits_a_full_period() {
        let period = Duration::from_millis(30);
        let started = Instant::now();
        let mut ticker = Some(tokio::time::interval_at(Instant::now() + period, period));

        next_tick(&mut ticker).await;
        assert!(started.elapsed() >= period);
    }
}
