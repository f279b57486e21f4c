//! Scheduling layer for the falling-block simulation
//!
//! [`GameEngine`] owns a [`blockfall_core::GameLogic`] and drives it at a
//! fixed rate from host frame callbacks, buffering discrete input between
//! steps and coordinating pause, resume and game over.
//!
//! ```
//! use std::time::Duration;
//! use blockfall_core::LogicConfig;
//! use blockfall_engine::{EngineConfig, GameEngine, InputEvent};
//! use blockfall_types::InputAction;
//!
//! let mut engine = GameEngine::new(LogicConfig::seeded(7), EngineConfig::default());
//! engine.start();
//! engine.frame(Duration::ZERO);
//!
//! engine.push_input(InputEvent::press(InputAction::Drop));
//! assert!(engine.frame(Duration::from_millis(17)));
//! assert_eq!(engine.logic().stats().pieces_placed, 1);
//! ```

pub mod config;
pub mod engine;
pub mod input;
pub mod system;
pub mod timestep;

pub use config::EngineConfig;
pub use engine::{EngineState, GameEngine};
pub use input::{InputEvent, InputQueue};
pub use system::{ObserverSet, System};
pub use timestep::FixedTimestep;
