//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use game_core::{Action, ContentOracle, GameConfig, GameState, TransitionOutcome};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{EventBus, Topic};
use crate::oracle::OracleManager;
use crate::providers::RulesProvider;
use crate::repository::{InMemoryStateRepo, StateRepository};
use crate::workers::{
    Command, DiscoverySettings, DiscoveryWorker, PersistenceWorker, RandomEventWorker,
    SessionWorker,
};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Period of one synthesis progress tick (one second of recipe time).
    pub tick_interval: Duration,
    /// Advance the era when the rules service announces a later one.
    pub auto_advance_era: bool,
    /// Save every applied snapshot, not only the final one at shutdown.
    pub persist_every_change: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            tick_interval: Duration::from_secs(1),
            auto_advance_era: true,
            persist_every_change: true,
        }
    }
}

/// Main runtime that owns the session
///
/// Design: Runtime owns workers and coordinates shutdown.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    command_tx: mpsc::Sender<Command>,
    repository: Arc<dyn StateRepository>,
    shutdown_tx: watch::Sender<bool>,

    // Background workers
    session_worker: JoinHandle<()>,
    discovery_worker: JoinHandle<()>,
    random_event_worker: JoinHandle<()>,
    persistence_worker: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Stops the producing workers first, takes the final state from the
    /// session worker, saves it, and returns it. Handles kept by clients
    /// fail with [`RuntimeError::CommandChannelClosed`] afterwards.
    pub async fn shutdown(self) -> Result<GameState> {
        if self.shutdown_tx.send(true).is_err() {
            warn!("no worker was listening for shutdown");
        }

        self.discovery_worker
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        self.random_event_worker
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Shutdown { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        let state = reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?;

        self.session_worker
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        if let Some(persistence_worker) = self.persistence_worker {
            persistence_worker
                .await
                .map_err(RuntimeError::WorkerJoin)?;
        }

        self.repository.save(&state).await?;
        info!(turn = state.turn, gold = state.gold, "runtime shut down");

        Ok(state)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    oracles: Option<OracleManager>,
    repository: Option<Arc<dyn StateRepository>>,
    rules: Option<Arc<dyn RulesProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            oracles: None,
            repository: None,
            rules: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from this state instead of the repository slot.
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set required seed content
    pub fn content(mut self, content: impl ContentOracle + 'static) -> Self {
        self.oracles = Some(OracleManager::new(content));
        self
    }

    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Set the save slot. Defaults to an in-memory repository.
    pub fn repository(mut self, repository: impl StateRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    pub fn shared_repository(mut self, repository: Arc<dyn StateRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Set required rules provider
    pub fn rules(mut self, rules: impl RulesProvider + 'static) -> Self {
        self.rules = Some(Arc::new(rules));
        self
    }

    pub fn shared_rules(mut self, rules: Arc<dyn RulesProvider>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Build the runtime
    ///
    /// The session resumes from the repository slot when it holds a
    /// snapshot; otherwise (or when loading fails) a fresh session is
    /// initialized from the content.
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingContent)?;
        let rules = self.rules.ok_or(RuntimeError::MissingRules)?;
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryStateRepo::new()));
        let config = self.config;

        let restored = match self.state {
            Some(state) => Some(state),
            None => match repository.load().await {
                Ok(Some(state)) => {
                    info!(turn = state.turn, era = %state.era, "resuming saved session");
                    Some(state)
                }
                Ok(None) => None,
                Err(error) => {
                    warn!(%error, "failed to load saved session, starting fresh");
                    None
                }
            },
        };
        let needs_initialize = restored.is_none();
        let initial_state = restored.unwrap_or_default();

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = RuntimeHandle::new(
            command_tx.clone(),
            event_bus.clone(),
            oracles.clone(),
            Arc::clone(&repository),
        );

        // Subscribers are created before the session worker runs so no
        // transition is missed.
        let persistence_worker = config.persist_every_change.then(|| {
            let worker = PersistenceWorker::new(
                Arc::clone(&repository),
                event_bus.subscribe(Topic::GameState),
                command_tx.clone(),
                shutdown_rx.clone(),
            );
            tokio::spawn(worker.run())
        });

        let discovery = DiscoveryWorker::new(
            handle.clone(),
            Arc::clone(&rules),
            DiscoverySettings {
                tick_interval: config.tick_interval,
                auto_advance_era: config.auto_advance_era,
            },
            event_bus.subscribe(Topic::GameState),
            shutdown_rx.clone(),
        );
        let discovery_worker = tokio::spawn(discovery.run(initial_state.clone()));

        let random_events = RandomEventWorker::new(
            handle.clone(),
            rules,
            config.game_config.clone(),
            event_bus.subscribe(Topic::GameState),
            shutdown_rx,
        );
        let random_event_worker = tokio::spawn(random_events.run());

        let session = SessionWorker::new(initial_state, oracles, command_rx, event_bus);
        let session_worker = tokio::spawn(session.run());

        if needs_initialize {
            match handle.dispatch(Action::initialize()).await? {
                TransitionOutcome::Applied => info!("new session initialized"),
                TransitionOutcome::Rejected(rejection) => {
                    error!(%rejection, "failed to initialize the session");
                }
            }
        }

        Ok(Runtime {
            handle,
            command_tx,
            repository,
            shutdown_tx,
            session_worker,
            discovery_worker,
            random_event_worker,
            persistence_worker,
        })
    }
}
