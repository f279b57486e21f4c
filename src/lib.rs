//! Blockfall (workspace facade crate).
//!
//! Re-exports the simulation crates under one name and adds [`Settings`],
//! the combined JSON configuration used by hosts and the headless driver.

pub mod settings;

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_types as types;

pub use settings::Settings;
