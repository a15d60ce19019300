//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use runtime::OpenAiConfig;

const APP_NAME: &str = "infinite-grow";

/// Everything the binary needs to assemble a session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub save_dir: PathBuf,
    pub save_slot: String,
    /// Custom RON seed; the built-in seed is used when unset.
    pub seed_file: Option<PathBuf>,
    pub tick_interval: Duration,
    pub log_dir: PathBuf,
    pub rules: OpenAiConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let dirs = directories::ProjectDirs::from("", "", APP_NAME);
        let save_dir = dirs
            .as_ref()
            .map(|dirs| dirs.data_dir().join("saves"))
            .unwrap_or_else(|| PathBuf::from("./saves"));
        let log_dir = dirs
            .as_ref()
            .map(|dirs| dirs.cache_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("./logs"));

        Self {
            save_dir,
            save_slot: "default".to_owned(),
            seed_file: None,
            tick_interval: Duration::from_secs(1),
            log_dir,
            rules: OpenAiConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GROW_SAVE_DIR` - Directory holding save slots (default: platform data dir)
    /// - `GROW_SAVE_SLOT` - Save slot name (default: `default`)
    /// - `GROW_SEED_FILE` - RON seed replacing the built-in one
    /// - `GROW_TICK_MS` - Synthesis tick in milliseconds (default: 1000)
    /// - `GROW_RULES_BASE_URL` - OpenAI-compatible base URL
    /// - `GROW_RULES_MODEL` - Model name
    /// - `OPENAI_API_KEY` - API key; without it the game runs offline
    /// - `GROW_LOG_DIR` - Log directory (default: platform cache dir)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("GROW_SAVE_DIR") {
            config.save_dir = dir;
        }
        if let Some(slot) = read_env::<String>("GROW_SAVE_SLOT").filter(|slot| !slot.is_empty()) {
            config.save_slot = slot;
        }
        config.seed_file = read_env::<PathBuf>("GROW_SEED_FILE");

        if let Some(millis) = read_env::<u64>("GROW_TICK_MS") {
            config.tick_interval = Duration::from_millis(millis.max(1));
        }
        if let Some(dir) = read_env::<PathBuf>("GROW_LOG_DIR") {
            config.log_dir = dir;
        }

        if let Some(base_url) = read_env::<String>("GROW_RULES_BASE_URL") {
            config.rules.base_url = base_url;
        }
        if let Some(model) = read_env::<String>("GROW_RULES_MODEL") {
            config.rules.model = model;
        }
        config.rules.api_key = read_env::<String>("OPENAI_API_KEY").filter(|key| !key.is_empty());

        config
    }

    /// Whether a remote rules service is configured.
    pub fn is_online(&self) -> bool {
        self.rules.api_key.is_some()
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
