/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Every this many turns the session rolls a random event.
    pub random_event_interval: u32,
}

impl GameConfig {
    // ===== rule constants =====
    pub const DEFAULT_MAX_CARDS: u32 = 20;
    /// Hunger every placed villager pays per turn.
    pub const HUNGER_PER_TURN: u32 = 2;
    /// Selling returns this percentage of the card price, rounded down.
    pub const SELL_RATIO_PERCENT: u64 = 70;
    /// A combination needs at least this many selected instances.
    pub const MIN_RECIPE_INPUTS: usize = 2;
    /// Discovered recipes sent to the rules service as context.
    pub const DISCOVERY_SAMPLE_SIZE: usize = 5;
    pub const MAX_PROGRESS: f64 = 100.0;

    // ===== minted card defaults =====
    pub const DEFAULT_VILLAGER_HEALTH: u32 = 10;
    pub const DEFAULT_VILLAGER_HUNGER: u32 = 10;
    pub const DEFAULT_CREATURE_HEALTH: u32 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RANDOM_EVENT_INTERVAL: u32 = 5;

    pub fn new() -> Self {
        Self {
            random_event_interval: Self::DEFAULT_RANDOM_EVENT_INTERVAL,
        }
    }

    /// Gold received for selling a card of the given price.
    pub fn sell_value(price: u32) -> u64 {
        u64::from(price) * Self::SELL_RATIO_PERCENT / 100
    }

    /// Whether `turn` should trigger a random event.
    pub fn is_event_turn(&self, turn: u32) -> bool {
        self.random_event_interval > 0 && turn % self.random_event_interval == 0
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
