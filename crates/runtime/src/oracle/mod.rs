//! Runtime access to read-only seed content.
//!
//! [`OracleManager`] shares one [`ContentOracle`] between the session worker
//! and the handle so both can build [`GameEnv`] snapshots on demand. Content
//! is immutable at runtime; dynamic state lives in [`game_core::GameState`].
mod packs;

use std::sync::Arc;

use game_core::{ContentOracle, GameEnv};

pub use packs::draw_from_pack;

/// Cloneable owner of the session's content oracle.
#[derive(Clone)]
pub struct OracleManager {
    content: Arc<dyn ContentOracle>,
}

impl OracleManager {
    pub fn new(content: impl ContentOracle + 'static) -> Self {
        Self {
            content: Arc::new(content),
        }
    }

    pub fn from_shared(content: Arc<dyn ContentOracle>) -> Self {
        Self { content }
    }

    /// Converts the manager into the environment `game-core` expects.
    pub fn as_game_env(&self) -> GameEnv<'_> {
        let content: &dyn ContentOracle = self.content.as_ref();
        GameEnv::new(Some(content))
    }

    pub fn content(&self) -> &dyn ContentOracle {
        self.content.as_ref()
    }
}

impl std::fmt::Debug for OracleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleManager")
            .field("starter_cards", &self.content.starter_cards().len())
            .field("recipes", &self.content.recipes().len())
            .field("card_packs", &self.content.card_packs().len())
            .finish()
    }
}
