//! Runtime orchestration for the crafting session.
//!
//! This crate wires together seed content, the rules provider, repositories,
//! and worker tasks into a cohesive runtime API. Consumers embed [`Runtime`]
//! to own a session, subscribe to events, and drive it through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`providers`] adapts the external rules service
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod providers;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{DiscoveryEvent, Event, EventBus, GameStateEvent, SynthesisEvent, Topic};
pub use oracle::{OracleManager, draw_from_pack};
pub use providers::{
    OpenAiConfig, OpenAiRulesProvider, ProviderError, RulesProvider, ScriptedRulesProvider,
};
pub use repository::{FileStateRepository, InMemoryStateRepo, RepositoryError, StateRepository};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
