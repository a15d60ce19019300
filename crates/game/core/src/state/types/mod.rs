mod card;
mod era;
mod ids;
mod inventory;
mod recipe;

pub use card::{Card, CardKind, Position};
pub use era::{Era, Rarity};
pub use ids::{CardId, PackId, RecipeId};
pub use inventory::{InventoryEntry, InventoryState};
pub use recipe::{CardPack, PackEntry, ProcessingRecipe, Recipe, RecipeOutput};
