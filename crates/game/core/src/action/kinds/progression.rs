use crate::action::{ActionTransition, Rejection};
use crate::config::GameConfig;
use crate::engine::StateReducer;
use crate::env::GameEnv;
use crate::state::{CardId, CardKind, Era, GameState, PackId};

/// One consequence of a random event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventEffect {
    AddCard { card_id: CardId, count: u32 },
    RemoveCard { card_id: CardId, count: u32 },
    /// Damages every villager on the board. Villagers at zero health leave
    /// the board.
    DamageVillagers { amount: u32 },
    AddGold { amount: u64 },
    /// Removes gold, stopping at zero.
    RemoveGold { amount: u64 },
}

/// Turn, era and capacity progression.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProgressionAction {
    /// Next turn. Every villager on the board pays its hunger; a villager
    /// that is already starving is returned to inventory.
    AdvanceTurn,
    AdvanceEra { era: Era },
    UnlockCardPack { pack_id: PackId },
    IncreaseMaxCards { amount: u32 },
    ApplyEvent { effects: Vec<EventEffect> },
}

impl ActionTransition for ProgressionAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Rejection> {
        match self {
            ProgressionAction::UnlockCardPack { pack_id } => {
                if state.has_pack(pack_id) {
                    return Err(Rejection::PackAlreadyUnlocked(pack_id.clone()));
                }
            }
            ProgressionAction::IncreaseMaxCards { amount } => {
                if *amount == 0 {
                    return Err(Rejection::ZeroCount);
                }
            }
            ProgressionAction::AdvanceTurn
            | ProgressionAction::AdvanceEra { .. }
            | ProgressionAction::ApplyEvent { .. } => {}
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<(), Rejection> {
        match self {
            ProgressionAction::AdvanceTurn => advance_turn(state),
            ProgressionAction::AdvanceEra { era } => {
                let mut reducer = StateReducer::new(state);
                reducer.progression().set_era(*era);
                if let Ok(content) = env.content() {
                    for pack in content.packs_for_era(*era) {
                        reducer.progression().unlock_pack(pack.id.clone());
                    }
                }
            }
            ProgressionAction::UnlockCardPack { pack_id } => {
                StateReducer::new(state)
                    .progression()
                    .unlock_pack(pack_id.clone());
            }
            ProgressionAction::IncreaseMaxCards { amount } => {
                StateReducer::new(state).progression().grow_capacity(*amount);
            }
            ProgressionAction::ApplyEvent { effects } => {
                for effect in effects {
                    apply_effect(state, env, effect);
                }
            }
        }
        Ok(())
    }
}

fn advance_turn(state: &mut GameState) {
    let mut reducer = StateReducer::new(state);
    reducer.progression().next_turn();

    let mut starving = Vec::new();
    for (index, card) in reducer.board().instances_mut().enumerate() {
        if let CardKind::Villager { hunger, .. } = &mut card.kind {
            if *hunger == 0 {
                starving.push(index);
            } else {
                *hunger = hunger.saturating_sub(GameConfig::HUNGER_PER_TURN);
            }
        }
    }
    // Highest index first so earlier indices stay valid.
    for index in starving.into_iter().rev() {
        reducer.pick_up_at(index);
    }
}

fn apply_effect(state: &mut GameState, env: &GameEnv<'_>, effect: &EventEffect) {
    match effect {
        EventEffect::AddCard { card_id, count } => {
            let card = state
                .lookup_card(card_id)
                .or_else(|| env.content().ok().and_then(|content| content.card(card_id)))
                .cloned();
            if let Some(card) = card {
                let mut reducer = StateReducer::new(state);
                reducer.catalog().register(&card);
                reducer.inventory().add(&card, *count);
            }
        }
        EventEffect::RemoveCard { card_id, count } => {
            StateReducer::new(state).inventory().remove(card_id, *count);
        }
        EventEffect::DamageVillagers { amount } => {
            let mut reducer = StateReducer::new(state);
            let mut fallen = Vec::new();
            for (index, card) in reducer.board().instances_mut().enumerate() {
                if let CardKind::Villager { health, .. } = &mut card.kind {
                    *health = health.saturating_sub(*amount);
                    if *health == 0 {
                        fallen.push(index);
                    }
                }
            }
            for index in fallen.into_iter().rev() {
                reducer.pick_up_at(index);
            }
        }
        EventEffect::AddGold { amount } => StateReducer::new(state).wallet().deposit(*amount),
        EventEffect::RemoveGold { amount } => StateReducer::new(state).wallet().drain(*amount),
    }
}
