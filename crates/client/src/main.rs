//! Infinite Grow client binary.
//!
//! # Examples
//!
//! ```bash
//! # Offline play with scripted rules
//! cargo run -p infinite-grow
//!
//! # Online rules, custom save slot
//! OPENAI_API_KEY=sk-... GROW_SAVE_SLOT=second cargo run -p infinite-grow
//! ```

use anyhow::{Context, Result};
use infinite_grow::{ClientConfig, console, logging};
use runtime::{
    FileStateRepository, OpenAiRulesProvider, Runtime, RuntimeConfig, ScriptedRulesProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();

    // 2. Setup logging
    let _log_guard = logging::setup_logging(&config.log_dir)?;

    tracing::info!(
        save_dir = %config.save_dir.display(),
        slot = %config.save_slot,
        online = config.is_online(),
        "starting Infinite Grow"
    );

    // 3. Content
    let content = match &config.seed_file {
        Some(path) => game_content::SeedLoader::load(path)
            .with_context(|| format!("failed to load seed {}", path.display()))?,
        None => game_content::builtin().context("built-in seed is invalid")?,
    };

    // 4. Runtime
    let repository = FileStateRepository::new(&config.save_dir, config.save_slot.clone())
        .with_context(|| format!("failed to open save directory {}", config.save_dir.display()))?;

    let builder = Runtime::builder()
        .config(RuntimeConfig {
            tick_interval: config.tick_interval,
            ..RuntimeConfig::default()
        })
        .content(content)
        .repository(repository);

    let builder = if config.is_online() {
        let provider = OpenAiRulesProvider::new(config.rules.clone())
            .context("failed to build rules client")?;
        tracing::info!(model = %config.rules.model, "using remote rules service");
        builder.rules(provider)
    } else {
        tracing::warn!("OPENAI_API_KEY not set; unknown combinations will do nothing");
        builder.rules(ScriptedRulesProvider::new())
    };

    let runtime = builder.build().await.context("failed to start runtime")?;

    // 5. Drive
    let result = console::run(runtime.handle()).await;

    let state = runtime.shutdown().await.context("shutdown failed")?;
    tracing::info!(turn = state.turn, gold = state.gold, "session saved");

    result
}
