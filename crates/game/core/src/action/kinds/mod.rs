mod board;
mod catalog;
mod economy;
mod inventory;
mod lifecycle;
mod progression;
mod synthesis;

pub use board::BoardAction;
pub use catalog::CatalogAction;
pub use economy::EconomyAction;
pub use inventory::InventoryAction;
pub use lifecycle::InitializeAction;
pub use progression::{EventEffect, ProgressionAction};
pub use synthesis::SynthesisAction;
