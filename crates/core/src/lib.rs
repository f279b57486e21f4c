//! Core simulation - pure, deterministic, and testable
//!
//! This crate contains the rules of the falling-block puzzle: the board, the
//! piece shapes, the bag randomiser, collision and wall kicks, and the state
//! machine that sequences spawn, fall, lock and line clear. It performs no
//! I/O and never reads a clock: time is handed in by the caller.
//!
//! # Module Structure
//!
//! - [`board`]: row-major grid of color cells with row compaction
//! - [`pieces`]: shape matrices, matrix rotation and wall kick tables
//! - [`generator`]: seeded 7-bag piece generator with lookahead
//! - [`collision`]: validity oracle (moves, kicks, ghost, T-spin corners)
//! - [`game_logic`]: the per-game state machine
//! - [`scoring`]: score, level and gravity collaborator
//! - [`events`]: domain events and the observer trait
//! - [`snapshot`]: read-only render view
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use blockfall_core::{GameLogic, LogicConfig, ScoreKeeper};
//! use blockfall_types::Direction;
//!
//! let mut game = GameLogic::new(LogicConfig::seeded(12345));
//! let mut scorer = ScoreKeeper::new();
//! game.start();
//!
//! game.move_piece(Direction::Right);
//! game.rotate_piece(true);
//! game.hard_drop();
//! game.update(Duration::from_millis(16), scorer.fall_interval());
//!
//! for event in game.drain_events() {
//!     scorer.apply(&event);
//! }
//! assert_eq!(game.stats().pieces_placed, 1);
//! ```

pub mod board;
pub mod collision;
pub mod config;
pub mod events;
pub mod game_logic;
pub mod generator;
pub mod pieces;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

pub use board::Board;
pub use collision::CollisionDetector;
pub use config::LogicConfig;
pub use events::{EngineEvent, EventLog, GameEvent, GameObserver, GameStats};
pub use game_logic::{GameLogic, GamePhase};
pub use generator::PieceGenerator;
pub use pieces::{Piece, PieceView, ShapeMatrix};
pub use scoring::{calculate_drop_score, calculate_score, ScoreKeeper, ScoreResult};
pub use snapshot::RenderSnapshot;
