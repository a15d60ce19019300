//! Headless client for the crafting engine.
//!
//! The binary is the composition root: it reads [`ClientConfig`] from the
//! environment, installs logging, assembles a [`runtime::Runtime`] with a
//! file-backed save slot and a rules provider, and hands the
//! [`runtime::RuntimeHandle`] to the console driver.

pub mod commands;
pub mod config;
pub mod console;
pub mod logging;

pub use commands::Command;
pub use config::ClientConfig;
