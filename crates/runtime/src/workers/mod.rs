//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the state and applies every action. The other
//! workers only observe events and produce further actions: discovery
//! drives selections and synthesis, random events follow the turn cadence,
//! persistence saves snapshots.

mod discovery;
mod persistence;
mod random_events;
mod session;

pub use discovery::{DiscoverySettings, DiscoveryWorker};
pub use persistence::PersistenceWorker;
pub use random_events::RandomEventWorker;
pub use session::{Command, SessionWorker};
