//! End-to-end session scenarios driven through [`RuntimeHandle`].
//!
//! Every test runs the real workers against the built-in seed and a
//! scripted rules provider, with a short synthesis tick so recipes finish in
//! milliseconds.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use game_core::{
    Action, CardId, DiscoveryOutcome, Era, EventEffect, GameState, OutputProposal, PackId,
    Position, RandomEvent, Rarity, RecipeId, RecipeProposal, TransitionOutcome,
};
use runtime::{
    DiscoveryEvent, Event, FileStateRepository, GameStateEvent, InMemoryStateRepo,
    ProviderError, Runtime, RuntimeConfig, RuntimeError, RuntimeHandle, ScriptedRulesProvider,
    SynthesisEvent, Topic,
};
use tokio::sync::broadcast;

const EVENT_TIMEOUT: Duration = Duration::from_secs(3);

fn fast_config() -> RuntimeConfig {
    RuntimeConfig {
        tick_interval: Duration::from_millis(10),
        ..RuntimeConfig::default()
    }
}

async fn start(rules: ScriptedRulesProvider) -> Runtime {
    start_with(Arc::new(rules), fast_config()).await
}

async fn start_with(rules: Arc<ScriptedRulesProvider>, config: RuntimeConfig) -> Runtime {
    Runtime::builder()
        .content(game_content::builtin().expect("built-in seed should parse"))
        .shared_rules(rules)
        .config(config)
        .build()
        .await
        .expect("runtime should start")
}

/// Waits until `pick` accepts an event from `rx`.
async fn wait_for<T>(
    rx: &mut broadcast::Receiver<Event>,
    mut pick: impl FnMut(Event) -> Option<T>,
) -> T {
    tokio::time::timeout(EVENT_TIMEOUT, async {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(found) = pick(event) {
                        return found;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(error) => panic!("event bus closed: {error}"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

async fn file_runtime(dir: &Path) -> Runtime {
    Runtime::builder()
        .content(game_content::builtin().unwrap())
        .rules(ScriptedRulesProvider::new())
        .repository(FileStateRepository::new(dir, "slot").unwrap())
        .config(fast_config())
        .build()
        .await
        .unwrap()
}

async fn apply(handle: &RuntimeHandle, action: Action) -> GameState {
    let outcome = handle.dispatch(action.clone()).await.expect("session alive");
    assert_eq!(outcome, TransitionOutcome::Applied, "{action:?} was rejected");
    handle.query_state().await.expect("session alive")
}

async fn place(handle: &RuntimeHandle, id: &str, x: i32) {
    apply(handle, Action::place_card(id, Position::new(x, 0))).await;
}

fn fire_pit() -> DiscoveryOutcome {
    DiscoveryOutcome::NewRecipe(RecipeProposal {
        inputs: vec!["Villager".to_owned(), "Stone".to_owned()],
        time: 1,
        outputs: vec![OutputProposal {
            name: "Fire Pit".to_owned(),
            kind: "structure".to_owned(),
            description: "Warmth for the village".to_owned(),
            rarity: Rarity::Uncommon,
            price: 6,
            durability: None,
            hunger_points: None,
            health: None,
            count: 1,
        }],
    })
}

#[tokio::test]
async fn fresh_session_is_initialized_and_saved() {
    let repository = Arc::new(InMemoryStateRepo::new());
    let runtime = Runtime::builder()
        .content(game_content::builtin().unwrap())
        .rules(ScriptedRulesProvider::new())
        .shared_repository(repository.clone())
        .config(fast_config())
        .build()
        .await
        .unwrap();

    let state = runtime.handle().query_state().await.unwrap();
    assert_eq!(state.turn, 1);
    assert_eq!(state.inventory.count(&CardId::from("stone")), 2);
    assert_eq!(state.recipes.len(), 3);
    assert!(state.has_pack(&PackId::from("basic_resources")));

    tokio::time::timeout(EVENT_TIMEOUT, async {
        while repository.snapshot().unwrap().is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("initialized session should be persisted");

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn known_recipe_synthesizes_from_selection() {
    let runtime = start(ScriptedRulesProvider::new()).await;
    let handle = runtime.handle();
    let mut synthesis = handle.subscribe(Topic::Synthesis);

    place(&handle, "stone", 0).await;
    place(&handle, "stone", 1).await;
    apply(&handle, Action::select_card("stone")).await;

    let started = wait_for(&mut synthesis, |event| match event {
        Event::Synthesis(SynthesisEvent::Started {
            recipe_id,
            total_time,
        }) => Some((recipe_id, total_time)),
        _ => None,
    })
    .await;
    assert_eq!(started, (RecipeId::from("stone_axe"), 5));

    let completed = wait_for(&mut synthesis, |event| match event {
        Event::Synthesis(SynthesisEvent::Completed { recipe_id }) => Some(recipe_id),
        _ => None,
    })
    .await;
    assert_eq!(completed, RecipeId::from("stone_axe"));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.inventory.count(&CardId::from("stone_axe")), 1);
    assert!(state.active_cards.is_empty());
    assert!(state.selected_card_ids.is_empty());
    assert!(state.processing_recipe.is_none());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_combination_becomes_a_discovered_recipe() {
    let rules = Arc::new(ScriptedRulesProvider::with_outcomes([fire_pit()]));
    let runtime = start_with(rules.clone(), fast_config()).await;
    let handle = runtime.handle();
    let mut discovery = handle.subscribe(Topic::Discovery);
    let mut synthesis = handle.subscribe(Topic::Synthesis);

    place(&handle, "villager", 0).await;
    place(&handle, "stone", 1).await;
    apply(&handle, Action::select_card("villager")).await;
    apply(&handle, Action::select_card("stone")).await;

    let (recipe_id, outputs) = wait_for(&mut discovery, |event| match event {
        Event::Discovery(DiscoveryEvent::RecipeDiscovered { recipe_id, outputs }) => {
            Some((recipe_id, outputs))
        }
        _ => None,
    })
    .await;
    assert!(recipe_id.as_str().starts_with("recipe_"));
    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].as_str().starts_with("fire_pit_"));

    wait_for(&mut synthesis, |event| match event {
        Event::Synthesis(SynthesisEvent::Completed { recipe_id: done }) if done == recipe_id => {
            Some(())
        }
        _ => None,
    })
    .await;

    let state = handle.query_state().await.unwrap();
    assert!(state.is_discovered(&recipe_id));
    assert_eq!(state.inventory.count(&outputs[0]), 1);
    let card = state.lookup_card(&outputs[0]).expect("output registered");
    assert_eq!(card.name, "Fire Pit");
    assert_eq!(card.era, Era::Stone);

    let request = &rules.requests()[0];
    assert_eq!(request.cards.len(), 2);
    assert_eq!(request.sample_recipes.len(), 3);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn picking_up_an_input_right_after_selecting_never_pays_out() {
    let runtime = start(ScriptedRulesProvider::new()).await;
    let handle = runtime.handle();

    place(&handle, "villager", 0).await;
    place(&handle, "land", 1).await;
    apply(&handle, Action::select_card("villager")).await;
    apply(&handle, Action::select_card("land")).await;
    apply(&handle, Action::pick_up_card("land")).await;

    // plant_wheat takes 8 ticks of 10 ms.
    tokio::time::sleep(Duration::from_millis(250)).await;

    let state = handle.query_state().await.unwrap();
    assert!(state.processing_recipe.is_none());
    assert_eq!(state.inventory.count(&CardId::from("wheat")), 0);
    assert_eq!(state.inventory.count(&CardId::from("land")), 1);
    assert_eq!(state.active_cards.len(), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn input_leaving_the_board_cancels_the_synthesis() {
    let config = RuntimeConfig {
        tick_interval: Duration::from_millis(40),
        ..RuntimeConfig::default()
    };
    let runtime = start_with(Arc::new(ScriptedRulesProvider::new()), config).await;
    let handle = runtime.handle();
    let mut synthesis = handle.subscribe(Topic::Synthesis);

    place(&handle, "villager", 0).await;
    place(&handle, "land", 1).await;
    apply(&handle, Action::select_card("villager")).await;
    apply(&handle, Action::select_card("land")).await;

    wait_for(&mut synthesis, |event| match event {
        Event::Synthesis(SynthesisEvent::Started { recipe_id, .. }) => Some(recipe_id),
        _ => None,
    })
    .await;
    apply(&handle, Action::pick_up_card("land")).await;

    let cancelled = wait_for(&mut synthesis, |event| match event {
        Event::Synthesis(SynthesisEvent::Cancelled { recipe_id }) => Some(recipe_id),
        Event::Synthesis(SynthesisEvent::Completed { recipe_id }) => {
            panic!("{recipe_id} completed without its inputs")
        }
        _ => None,
    })
    .await;
    assert_eq!(cancelled, RecipeId::from("plant_wheat"));

    let state = handle.query_state().await.unwrap();
    assert!(state.processing_recipe.is_none());
    assert_eq!(state.inventory.count(&CardId::from("wheat")), 0);
    assert_eq!(state.inventory.count(&CardId::from("land")), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn proposal_for_a_covered_combination_reuses_the_recipe() {
    let runtime = start(ScriptedRulesProvider::with_outcomes([fire_pit()])).await;
    let handle = runtime.handle();
    let mut discovery = handle.subscribe(Topic::Discovery);
    let mut synthesis = handle.subscribe(Topic::Synthesis);

    let land = handle
        .query_state()
        .await
        .unwrap()
        .lookup_card(&CardId::from("land"))
        .cloned()
        .expect("land is a seed card");
    apply(&handle, Action::add_card(land, 1)).await;
    place(&handle, "villager", 0).await;
    place(&handle, "land", 1).await;
    place(&handle, "land", 2).await;
    let before = handle.query_state().await.unwrap();

    // Three instances miss the two-input seed recipe, so the rules are asked.
    apply(&handle, Action::select_card("villager")).await;
    apply(&handle, Action::select_card("land")).await;

    let (recipe_id, outputs) = wait_for(&mut discovery, |event| match event {
        Event::Discovery(DiscoveryEvent::RecipeDiscovered { recipe_id, outputs }) => {
            Some((recipe_id, outputs))
        }
        _ => None,
    })
    .await;
    assert_eq!(recipe_id, RecipeId::from("plant_wheat"));
    assert_eq!(outputs, vec![CardId::from("wheat")]);

    wait_for(&mut synthesis, |event| match event {
        Event::Synthesis(SynthesisEvent::Completed { recipe_id }) => Some(recipe_id),
        _ => None,
    })
    .await;

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.recipes.len(), 3);
    assert_eq!(state.card_registry.len(), before.card_registry.len());
    assert!(
        !state
            .card_registry
            .keys()
            .any(|id| id.as_str().starts_with("fire_pit"))
    );
    assert_eq!(state.inventory.count(&CardId::from("wheat")), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn invalid_combination_clears_the_selection() {
    let runtime = start(ScriptedRulesProvider::new()).await;
    let handle = runtime.handle();
    let mut discovery = handle.subscribe(Topic::Discovery);

    place(&handle, "villager", 0).await;
    place(&handle, "stone", 1).await;
    apply(&handle, Action::select_card("villager")).await;
    apply(&handle, Action::select_card("stone")).await;

    wait_for(&mut discovery, |event| match event {
        Event::Discovery(DiscoveryEvent::Invalid { .. }) => Some(()),
        _ => None,
    })
    .await;

    let state = handle.query_state().await.unwrap();
    assert!(state.selected_card_ids.is_empty());
    assert_eq!(state.active_cards.len(), 2);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn transport_failure_keeps_the_selection_without_retrying() {
    let rules = Arc::new(ScriptedRulesProvider::new());
    rules.push_failure(ProviderError::Unavailable("offline".to_owned()));
    let runtime = start_with(rules.clone(), fast_config()).await;
    let handle = runtime.handle();
    let mut discovery = handle.subscribe(Topic::Discovery);

    place(&handle, "villager", 0).await;
    place(&handle, "stone", 1).await;
    apply(&handle, Action::select_card("villager")).await;
    apply(&handle, Action::select_card("stone")).await;

    let reason = wait_for(&mut discovery, |event| match event {
        Event::Discovery(DiscoveryEvent::Failed { reason }) => Some(reason),
        _ => None,
    })
    .await;
    assert!(reason.contains("offline"));

    // An unrelated transition must not re-send the same selection.
    apply(&handle, Action::add_gold(1)).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.selected_card_ids.len(), 2);
    assert_eq!(rules.requests().len(), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn stale_answer_is_discarded_and_current_selection_evaluated() {
    let rules = Arc::new(
        ScriptedRulesProvider::with_outcomes([fire_pit()]).with_delay(Duration::from_millis(200)),
    );
    let runtime = start_with(rules.clone(), fast_config()).await;
    let handle = runtime.handle();
    let mut discovery = handle.subscribe(Topic::Discovery);

    place(&handle, "villager", 0).await;
    place(&handle, "stone", 1).await;
    place(&handle, "land", 2).await;
    apply(&handle, Action::select_card("villager")).await;
    apply(&handle, Action::select_card("stone")).await;

    wait_for(&mut discovery, |event| match event {
        Event::Discovery(DiscoveryEvent::Requested { .. }) => Some(()),
        _ => None,
    })
    .await;

    // Villager + land is a seed recipe; the pending answer is about
    // villager + stone.
    apply(&handle, Action::deselect_card("stone")).await;
    apply(&handle, Action::select_card("land")).await;

    let discarded = wait_for(&mut discovery, |event| match event {
        Event::Discovery(DiscoveryEvent::Discarded { requested, current }) => {
            Some((requested, current))
        }
        _ => None,
    })
    .await;
    assert_eq!(
        discarded,
        (
            vec![CardId::from("villager"), CardId::from("stone")],
            vec![CardId::from("villager"), CardId::from("land")],
        )
    );

    let matched = wait_for(&mut discovery, |event| match event {
        Event::Discovery(DiscoveryEvent::Matched { recipe_id }) => Some(recipe_id),
        _ => None,
    })
    .await;
    assert_eq!(matched, RecipeId::from("plant_wheat"));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.recipes.len(), 3, "the stale proposal must not be added");

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn era_advance_goes_through_the_side_channel() {
    let runtime = start(ScriptedRulesProvider::with_outcomes([
        DiscoveryOutcome::EraAdvance {
            new_era: "Bronze".to_owned(),
            description: "Metal at last".to_owned(),
        },
    ]))
    .await;
    let handle = runtime.handle();
    let mut discovery = handle.subscribe(Topic::Discovery);

    place(&handle, "villager", 0).await;
    place(&handle, "stone", 1).await;
    apply(&handle, Action::select_card("villager")).await;
    apply(&handle, Action::select_card("stone")).await;

    let accepted = wait_for(&mut discovery, |event| match event {
        Event::Discovery(DiscoveryEvent::EraAdvance { accepted, .. }) => Some(accepted),
        _ => None,
    })
    .await;
    assert!(accepted);

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.era, Era::Bronze);
    assert!(state.has_pack(&PackId::from("bronze_age")));
    assert_eq!(state.selected_card_ids.len(), 2, "selection untouched");

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn fifth_turn_rolls_a_random_event() {
    let rules = ScriptedRulesProvider::new();
    rules.push_event(RandomEvent {
        title: "Traders".to_owned(),
        description: "A caravan passes by".to_owned(),
        effects: vec![EventEffect::AddGold { amount: 7 }],
    });
    let runtime = start(rules).await;
    let handle = runtime.handle();
    let mut discovery = handle.subscribe(Topic::Discovery);

    for _ in 0..4 {
        apply(&handle, Action::advance_turn()).await;
    }

    let event = wait_for(&mut discovery, |event| match event {
        Event::Discovery(DiscoveryEvent::RandomEvent { event }) => Some(event),
        _ => None,
    })
    .await;
    assert_eq!(event.title, "Traders");

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turn, 5);
    assert_eq!(state.gold, 7);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn random_event_failure_is_quiet() {
    let rules = ScriptedRulesProvider::new();
    rules.push_event_failure(ProviderError::EmptyResponse);
    let runtime = start(rules).await;
    let handle = runtime.handle();
    let mut discovery = handle.subscribe(Topic::Discovery);

    for _ in 0..4 {
        apply(&handle, Action::advance_turn()).await;
    }

    let event = wait_for(&mut discovery, |event| match event {
        Event::Discovery(DiscoveryEvent::RandomEvent { event }) => Some(event),
        _ => None,
    })
    .await;
    assert!(event.effects.is_empty());
    assert_eq!(handle.query_state().await.unwrap().gold, 0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn cancelling_stops_the_ticker() {
    let config = RuntimeConfig {
        tick_interval: Duration::from_millis(40),
        ..RuntimeConfig::default()
    };
    let runtime = start_with(Arc::new(ScriptedRulesProvider::new()), config).await;
    let handle = runtime.handle();
    let mut synthesis = handle.subscribe(Topic::Synthesis);

    place(&handle, "stone", 0).await;
    place(&handle, "stone", 1).await;
    apply(&handle, Action::select_card("stone")).await;

    wait_for(&mut synthesis, |event| match event {
        Event::Synthesis(SynthesisEvent::Started { .. }) => Some(()),
        _ => None,
    })
    .await;

    assert!(handle.cancel_synthesis().await.unwrap().is_applied());
    wait_for(&mut synthesis, |event| match event {
        Event::Synthesis(SynthesisEvent::Cancelled { .. }) => Some(()),
        _ => None,
    })
    .await;

    // Well past the 5 × 40 ms the recipe would have needed.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let state = handle.query_state().await.unwrap();
    assert!(state.processing_recipe.is_none());
    assert_eq!(state.active_cards.len(), 2);
    assert_eq!(state.inventory.count(&CardId::from("stone_axe")), 0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn rejections_are_published_and_leave_state_alone() {
    let runtime = start(ScriptedRulesProvider::new()).await;
    let handle = runtime.handle();
    let mut game = handle.subscribe(Topic::GameState);
    let before = handle.query_state().await.unwrap();

    let outcome = handle
        .dispatch(Action::spend_gold(10))
        .await
        .expect("session alive");
    assert!(!outcome.is_applied());

    let code = wait_for(&mut game, |event| match event {
        Event::GameState(GameStateEvent::ActionRejected { code, .. }) => Some(code),
        _ => None,
    })
    .await;
    assert_eq!(code, "REJECT_INSUFFICIENT_GOLD");
    assert_eq!(handle.query_state().await.unwrap(), before);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn opening_a_pack_spends_gold_for_one_card() {
    let runtime = start(ScriptedRulesProvider::new()).await;
    let handle = runtime.handle();
    let before = apply(&handle, Action::add_gold(10)).await;

    let outcome = handle.open_card_pack("basic_resources").await.unwrap();
    assert!(outcome.is_applied());

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.gold, 7);
    assert_eq!(
        state.inventory.total_units(),
        before.inventory.total_units() + 1
    );

    let unknown = handle.open_card_pack("dragon_hoard").await.unwrap();
    assert!(!unknown.is_applied());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn reset_starts_over() {
    let runtime = start(ScriptedRulesProvider::new()).await;
    let handle = runtime.handle();
    apply(&handle, Action::add_gold(25)).await;
    place(&handle, "villager", 0).await;

    assert!(handle.reset().await.unwrap().is_applied());

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.gold, 0);
    assert!(state.active_cards.is_empty());
    assert_eq!(state.inventory.count(&CardId::from("villager")), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_saves_and_next_session_resumes() {
    let dir = tempfile::TempDir::new().unwrap();

    let runtime = file_runtime(dir.path()).await;
    let handle = runtime.handle();
    apply(&handle, Action::add_gold(12)).await;
    apply(&handle, Action::advance_turn()).await;

    let final_state = runtime.shutdown().await.unwrap();
    assert_eq!(final_state.gold, 12);
    assert!(matches!(
        handle.query_state().await,
        Err(RuntimeError::CommandChannelClosed)
    ));

    let resumed = file_runtime(dir.path()).await;
    let state = resumed.handle().query_state().await.unwrap();
    assert_eq!(state.gold, 12);
    assert_eq!(state.turn, 2);
    resumed.shutdown().await.unwrap();
}
