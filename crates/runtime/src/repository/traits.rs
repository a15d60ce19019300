//! Repository contract for saving and loading the session snapshot.

use async_trait::async_trait;
use game_core::GameState;

use super::Result;

/// Storage for a single session slot.
///
/// The runtime saves every applied snapshot, so implementations must accept
/// frequent overwrites of the same slot.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Replace the stored snapshot.
    async fn save(&self, state: &GameState) -> Result<()>;

    /// Load the stored snapshot, `None` when the slot is empty.
    async fn load(&self) -> Result<Option<GameState>>;

    /// Empty the slot. Clearing an empty slot succeeds.
    async fn clear(&self) -> Result<()>;
}
