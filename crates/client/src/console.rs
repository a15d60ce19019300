//! Line-oriented driver: reads commands from stdin and echoes session events.

use anyhow::Result;
use game_core::{GameState, TransitionOutcome};
use runtime::{DiscoveryEvent, Event, RuntimeHandle, SynthesisEvent, Topic};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::commands::{Command, HELP};

/// Runs until `quit` or end of input.
pub async fn run(handle: RuntimeHandle) -> Result<()> {
    let printer = spawn_printer(&handle);

    println!("{HELP}");
    print_state(&handle.query_state().await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                println!("{error}");
                continue;
            }
        };

        match command {
            Command::Act(action) => report(handle.dispatch(action).await?),
            Command::OpenPack(pack) => report(handle.open_card_pack(pack).await?),
            Command::Cancel => report(handle.cancel_synthesis().await?),
            Command::State => print_state(&handle.query_state().await?),
            Command::Reset => {
                report(handle.reset().await?);
                print_state(&handle.query_state().await?);
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    printer.abort();
    Ok(())
}

fn report(outcome: TransitionOutcome) {
    if let Some(rejection) = outcome.rejection() {
        println!("rejected: {rejection}");
    }
}

fn spawn_printer(handle: &RuntimeHandle) -> JoinHandle<()> {
    let mut receivers = handle.subscribe_multiple(&[Topic::Discovery, Topic::Synthesis]);
    let (_, mut synthesis) = receivers.remove(1);
    let (_, mut discovery) = receivers.remove(0);

    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                event = discovery.recv() => event,
                event = synthesis.recv() => event,
            };
            match event {
                Ok(event) => print_event(&event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn print_event(event: &Event) {
    match event {
        Event::Discovery(event) => match event {
            DiscoveryEvent::Matched { recipe_id } => println!("* known recipe {recipe_id}"),
            DiscoveryEvent::Requested { selection } => {
                println!("* consulting the rules about {} cards...", selection.len())
            }
            DiscoveryEvent::RecipeDiscovered { recipe_id, outputs } => {
                let outputs: Vec<&str> = outputs.iter().map(|id| id.as_str()).collect();
                println!("* new recipe {recipe_id} -> {}", outputs.join(", "));
            }
            DiscoveryEvent::Invalid { reason } => println!("* nothing happens: {reason}"),
            DiscoveryEvent::EraAdvance {
                new_era,
                description,
                accepted,
            } => {
                if *accepted {
                    println!("* a new era dawns: {new_era}. {description}");
                } else {
                    println!("* talk of a {new_era} era fades away");
                }
            }
            DiscoveryEvent::RandomEvent { event } => {
                println!("* {}: {}", event.title, event.description)
            }
            DiscoveryEvent::Discarded { .. } => {}
            DiscoveryEvent::Failed { reason } => println!("* the rules are silent ({reason})"),
        },
        Event::Synthesis(event) => match event {
            SynthesisEvent::Started {
                recipe_id,
                total_time,
            } => println!("* crafting {recipe_id} ({total_time} ticks)"),
            SynthesisEvent::Progress { .. } => {}
            SynthesisEvent::Completed { recipe_id } => println!("* crafted {recipe_id}"),
            SynthesisEvent::Cancelled { recipe_id } => println!("* stopped crafting {recipe_id}"),
        },
        Event::GameState(_) => {}
    }
}

fn print_state(state: &GameState) {
    println!(
        "turn {} | era {} | gold {} | board {}/{}",
        state.turn,
        state.era,
        state.gold,
        state.active_cards.len(),
        state.max_cards
    );

    let inventory: Vec<String> = state
        .inventory
        .iter()
        .map(|entry| format!("{} x{}", entry.card.id, entry.count))
        .collect();
    println!("inventory: {}", inventory.join(", "));

    let board: Vec<String> = state
        .active_cards
        .iter()
        .map(|card| {
            let marker = if state.is_selected(&card.id) { "*" } else { "" };
            match card.position {
                Some(position) => format!("{marker}{}@{},{}", card.id, position.x, position.y),
                None => format!("{marker}{}", card.id),
            }
        })
        .collect();
    println!("board: {}", board.join(" "));

    if let Some(processing) = &state.processing_recipe {
        println!(
            "crafting {} {:.0}%",
            processing.recipe_id, processing.progress
        );
    }

    let packs: Vec<&str> = state
        .available_card_pack_ids
        .iter()
        .map(|id| id.as_str())
        .collect();
    println!("packs: {}", packs.join(", "));
}
