use super::{CardId, Era, Rarity};

/// Grid position of a card placed on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Kind-specific card data. The tag set is closed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CardKind {
    Resource {
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        durability: Option<u32>,
    },
    #[cfg_attr(feature = "serde", serde(alias = "mob"))]
    Creature {
        health: u32,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        capture_rate: Option<f32>,
    },
    Structure,
    Food {
        hunger_points: u32,
    },
    Villager {
        health: u32,
        hunger: u32,
    },
}

impl CardKind {
    /// Lowercase tag used in logs and in requests to the rules service.
    pub fn tag(&self) -> &'static str {
        match self {
            CardKind::Resource { .. } => "resource",
            CardKind::Creature { .. } => "creature",
            CardKind::Structure => "structure",
            CardKind::Food { .. } => "food",
            CardKind::Villager { .. } => "villager",
        }
    }

    pub fn is_villager(&self) -> bool {
        matches!(self, CardKind::Villager { .. })
    }
}

/// Immutable card record. Inventory holds definitions, the board holds
/// positioned instances.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub id: CardId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub kind: CardKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rarity: Rarity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub era: Era,
    #[cfg_attr(feature = "serde", serde(default))]
    pub price: u32,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub position: Option<Position>,
}

impl Card {
    pub fn new(id: impl Into<CardId>, name: impl Into<String>, kind: CardKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind,
            rarity: Rarity::Common,
            era: Era::Stone,
            price: 0,
            position: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_era(mut self, era: Era) -> Self {
        self.era = era;
        self
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    /// Returns a positioned copy of this card.
    pub fn placed_at(&self, position: Position) -> Self {
        Self {
            position: Some(position),
            ..self.clone()
        }
    }

    /// Returns the card without its board position.
    pub fn unplaced(&self) -> Self {
        Self {
            position: None,
            ..self.clone()
        }
    }

    pub fn is_villager(&self) -> bool {
        self.kind.is_villager()
    }
}
