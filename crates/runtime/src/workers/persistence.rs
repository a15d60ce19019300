//! Persistence worker that mirrors applied snapshots into the repository.
//!
//! Snapshots are saved in the order they were published. A failed save is
//! logged and the session keeps running; the next snapshot overwrites the
//! slot anyway.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use game_core::GameState;

use crate::events::{Event, GameStateEvent};
use crate::repository::StateRepository;
use crate::workers::session::Command as SessionCommand;

/// Background worker that handles all persistence operations
pub struct PersistenceWorker {
    repository: Arc<dyn StateRepository>,
    event_rx: broadcast::Receiver<Event>,
    session_tx: mpsc::Sender<SessionCommand>,
    shutdown_rx: watch::Receiver<bool>,
}

impl PersistenceWorker {
    pub fn new(
        repository: Arc<dyn StateRepository>,
        event_rx: broadcast::Receiver<Event>,
        session_tx: mpsc::Sender<SessionCommand>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            repository,
            event_rx,
            session_tx,
            shutdown_rx,
        }
    }

    /// Main worker loop
    pub async fn run(mut self) {
        info!("persistence worker started");

        loop {
            tokio::select! {
                biased;

                event = self.event_rx.recv() => {
                    match event {
                        Ok(Event::GameState(GameStateEvent::ActionApplied { state, .. })) => {
                            self.save(&state).await;
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "persistence worker lagged, saving the current state");
                            if let Some(state) = self.query_state().await {
                                self.save(&state).await;
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            info!("event bus closed, shutting down persistence worker");
                            break;
                        }
                    }
                }

                _ = self.shutdown_rx.changed() => break,
            }
        }

        info!("persistence worker stopped");
    }

    async fn save(&self, state: &GameState) {
        match self.repository.save(state).await {
            Ok(()) => debug!(turn = state.turn, "snapshot saved"),
            Err(error) => warn!(%error, turn = state.turn, "failed to save snapshot"),
        }
    }

    async fn query_state(&self) -> Option<GameState> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.session_tx
            .send(SessionCommand::QueryState { reply: reply_tx })
            .await
            .ok()?;
        reply_rx.await.ok()
    }
}
