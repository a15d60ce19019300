//! In-memory StateRepository implementation for tests and local runs.

use std::sync::RwLock;

use async_trait::async_trait;
use game_core::GameState;

use crate::repository::{RepositoryError, Result, StateRepository};

/// In-memory implementation of [`StateRepository`].
#[derive(Default)]
pub struct InMemoryStateRepo {
    slot: RwLock<Option<GameState>>,
}

impl InMemoryStateRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a saved snapshot already in the slot.
    pub fn with_state(state: GameState) -> Self {
        Self {
            slot: RwLock::new(Some(state)),
        }
    }

    /// Snapshot currently stored, without going through the async contract.
    pub fn snapshot(&self) -> Result<Option<GameState>> {
        let slot = self.slot.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slot.clone())
    }
}

#[async_trait]
impl StateRepository for InMemoryStateRepo {
    async fn save(&self, state: &GameState) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = Some(state.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<GameState>> {
        self.snapshot()
    }

    async fn clear(&self) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_load_clear() {
        let repo = InMemoryStateRepo::new();
        assert!(repo.load().await.unwrap().is_none());

        let mut state = GameState::new();
        state.gold = 42;
        repo.save(&state).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(state));

        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }
}
