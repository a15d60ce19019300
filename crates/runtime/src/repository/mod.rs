//! Repository layer for dynamic runtime data.
//!
//! Repositories hold the session snapshot that changes during play. Seed
//! content (starter cards, recipes, packs) is served by oracles, not
//! repositories.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileStateRepository;
pub use memory::InMemoryStateRepo;
pub use traits::StateRepository;
