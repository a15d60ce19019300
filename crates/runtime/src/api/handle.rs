//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! dispatching actions or streaming events from specific topics.
use std::sync::Arc;

use rand::Rng;
use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::engine::TransitionPhaseError;
use game_core::{Action, CardId, GameState, PackId, Rejection, TransitionOutcome, TransitionPhase};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::{OracleManager, draw_from_pack};
use crate::repository::StateRepository;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    oracles: OracleManager,
    repository: Arc<dyn StateRepository>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        oracles: OracleManager,
        repository: Arc<dyn StateRepository>,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            oracles,
            repository,
        }
    }

    /// Enqueue an action and wait for the session worker to run it.
    ///
    /// A rejected action is a successful call returning
    /// [`TransitionOutcome::Rejected`]; errors only mean the session is gone.
    pub async fn dispatch(&self, action: Action) -> Result<TransitionOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Dispatch {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Stop the running synthesis. The inputs stay on the board.
    ///
    /// The synthesis ticker notices the cleared recipe and stops.
    pub async fn cancel_synthesis(&self) -> Result<TransitionOutcome> {
        self.dispatch(Action::cancel_recipe()).await
    }

    /// Draw a card from `pack_id` by drop rate, without buying it.
    pub fn draw_card<R>(&self, pack_id: &PackId, rng: &mut R) -> Option<CardId>
    where
        R: Rng + ?Sized,
    {
        let pack = self.oracles.content().card_pack(pack_id)?;
        draw_from_pack(pack, rng)
    }

    /// Buy `pack_id` and receive one card drawn by drop rate.
    pub async fn open_card_pack(&self, pack_id: impl Into<PackId>) -> Result<TransitionOutcome> {
        let pack_id = pack_id.into();
        let drawn = {
            let mut rng = rand::thread_rng();
            self.draw_card(&pack_id, &mut rng)
        };

        match drawn {
            Some(card_id) => self.dispatch(Action::open_card_pack(pack_id, card_id)).await,
            None => Ok(TransitionOutcome::Rejected(TransitionPhaseError::new(
                TransitionPhase::PreValidate,
                Rejection::UnknownPack(pack_id),
            ))),
        }
    }

    /// Forget the saved slot and start the session over.
    pub async fn reset(&self) -> Result<TransitionOutcome> {
        self.repository.clear().await?;
        tracing::info!("session slot cleared, re-initializing");
        self.dispatch(Action::initialize()).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::GameState` - Applied and rejected actions
    /// - `Topic::Discovery` - Combination checks and their results
    /// - `Topic::Synthesis` - Recipe processing progress
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut synthesis_rx = handle.subscribe(Topic::Synthesis);
    /// while let Ok(event) = synthesis_rx.recv().await {
    ///     // Render progress
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }
}
