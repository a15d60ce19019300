use crate::action::{ActionTransition, Rejection};
use crate::engine::StateReducer;
use crate::env::GameEnv;
use crate::state::{Card, CardId, GameState, PackId};

/// Gold movements and pack purchases.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EconomyAction {
    AddGold { amount: u64 },
    /// Rejected when it would drive gold negative.
    SpendGold { amount: u64 },
    /// Buys a pack and grants the card already drawn from it. The draw
    /// happens outside the engine.
    OpenCardPack { pack_id: PackId, card_id: CardId },
}

impl ActionTransition for EconomyAction {
    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Rejection> {
        match self {
            EconomyAction::AddGold { .. } => {}
            EconomyAction::SpendGold { amount } => ensure_funds(state, *amount)?,
            EconomyAction::OpenCardPack { pack_id, card_id } => {
                if !state.has_pack(pack_id) {
                    return Err(Rejection::PackUnavailable(pack_id.clone()));
                }
                let content = env.content()?;
                let pack = content
                    .card_pack(pack_id)
                    .ok_or_else(|| Rejection::UnknownPack(pack_id.clone()))?;
                if !pack.contains(card_id) {
                    return Err(Rejection::CardNotInPack {
                        pack: pack_id.clone(),
                        card: card_id.clone(),
                    });
                }
                drawn_card(state, env, card_id)?;
                ensure_funds(state, u64::from(pack.price))?;
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<(), Rejection> {
        match self {
            EconomyAction::AddGold { amount } => {
                StateReducer::new(state).wallet().deposit(*amount);
            }
            EconomyAction::SpendGold { amount } => {
                spend(state, *amount)?;
            }
            EconomyAction::OpenCardPack { pack_id, card_id } => {
                let price = env
                    .content()?
                    .card_pack(pack_id)
                    .map(|pack| u64::from(pack.price))
                    .ok_or_else(|| Rejection::UnknownPack(pack_id.clone()))?;
                let card = drawn_card(state, env, card_id)?;
                spend(state, price)?;

                let mut reducer = StateReducer::new(state);
                reducer.catalog().register(&card);
                reducer.inventory().add(&card, 1);
            }
        }
        Ok(())
    }
}

fn ensure_funds(state: &GameState, amount: u64) -> Result<(), Rejection> {
    if amount > state.gold {
        return Err(Rejection::InsufficientGold {
            required: amount,
            available: state.gold,
        });
    }
    Ok(())
}

fn spend(state: &mut GameState, amount: u64) -> Result<(), Rejection> {
    let available = state.gold;
    if StateReducer::new(state).wallet().spend(amount) {
        Ok(())
    } else {
        Err(Rejection::InsufficientGold {
            required: amount,
            available,
        })
    }
}

fn drawn_card(state: &GameState, env: &GameEnv<'_>, id: &CardId) -> Result<Card, Rejection> {
    state
        .lookup_card(id)
        .or_else(|| env.content().ok().and_then(|content| content.card(id)))
        .cloned()
        .ok_or_else(|| Rejection::UnknownCard(id.clone()))
}
