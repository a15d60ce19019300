//! File-based StateRepository implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use game_core::GameState;
use tokio::fs;

use crate::repository::{Result, StateRepository};

/// Stores one session slot as pretty-printed JSON at `{dir}/{slot}.json`.
///
/// Saves go through `{slot}.json.tmp` and an atomic rename, so a crash
/// mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileStateRepository {
    base_dir: PathBuf,
    slot: String,
}

impl FileStateRepository {
    /// Create a repository for `slot` under `base_dir`, creating the
    /// directory when missing.
    pub fn new(base_dir: impl AsRef<Path>, slot: impl Into<String>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            slot: slot.into(),
        })
    }

    /// Path of the slot file.
    pub fn path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.json", self.slot))
    }
}

#[async_trait]
impl StateRepository for FileStateRepository {
    async fn save(&self, state: &GameState) -> Result<()> {
        let path = self.path();
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(state)?;
        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!(path = %path.display(), turn = state.turn, "saved session");
        Ok(())
    }

    async fn load(&self) -> Result<Option<GameState>> {
        let path = self.path();

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        let state: GameState = serde_json::from_slice(&bytes)?;

        tracing::debug!(path = %path.display(), turn = state.turn, "loaded session");
        Ok(Some(state))
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(self.path()).await {
            Ok(()) => {
                tracing::debug!(slot = %self.slot, "cleared session slot");
                Ok(())
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use game_core::{Card, CardKind, Position};
    use tempfile::TempDir;

    use super::*;
    use crate::repository::RepositoryError;

    fn sample_state() -> GameState {
        let mut state = GameState::new();
        state.gold = 17;
        state.turn = 4;
        let stone = Card::new(
            "stone",
            "Stone",
            CardKind::Resource { durability: None },
        );
        state.inventory.add(&stone, 2);
        state
            .active_cards
            .push(stone.placed_at(Position::new(1, 2)));
        state
    }

    #[tokio::test]
    async fn round_trips_a_state() {
        let dir = TempDir::new().unwrap();
        let repo = FileStateRepository::new(dir.path(), "slot").unwrap();

        let state = sample_state();
        repo.save(&state).await.unwrap();

        assert!(repo.path().exists());
        assert!(!repo.path().with_extension("json.tmp").exists());
        assert_eq!(repo.load().await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn missing_slot_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let repo = FileStateRepository::new(dir.path().join("nested"), "empty").unwrap();

        assert!(repo.load().await.unwrap().is_none());
        repo.clear().await.unwrap();
    }

    #[tokio::test]
    async fn clear_removes_the_slot() {
        let dir = TempDir::new().unwrap();
        let repo = FileStateRepository::new(dir.path(), "slot").unwrap();
        repo.save(&sample_state()).await.unwrap();

        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_slot_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = FileStateRepository::new(dir.path(), "slot").unwrap();
        std::fs::write(repo.path(), b"{ not json").unwrap();

        assert!(matches!(
            repo.load().await,
            Err(RepositoryError::Serialization(_))
        ));
    }
}
