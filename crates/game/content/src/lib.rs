//! Data-driven seed content and loaders.
//!
//! This crate provides the starter cards, card definitions, seed recipes and
//! card packs a fresh session is built from:
//! - a built-in seed embedded from `data/seed.ron`
//! - a RON loader for custom seeds, with reference validation
//!
//! Content is consumed through [`game_core::ContentOracle`] and never
//! mutated.

#[cfg(feature = "loaders")]
pub mod builtin;
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use builtin::{BUILTIN_SEED, builtin};
#[cfg(feature = "loaders")]
pub use loaders::{LoadResult, SeedFile, SeedLoader};
