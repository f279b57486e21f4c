//! Domain events and the observer interface
//!
//! [`crate::GameLogic`] buffers a [`GameEvent`] for every state change worth
//! telling anyone about; the driver drains them after each call and fans them
//! out to its observers. Synchronous outcomes (did the move succeed?) are
//! return values, never events.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use blockfall_types::{ClearAction, Direction, PieceKind, Rotation, TSpinKind};

/// Informational session counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub pieces_placed: u32,
    pub lines_cleared: u32,
    /// Rows descended through soft and hard drops.
    pub drop_distance: u32,
    pub t_spins: u32,
    pub holds: u32,
}

/// Event emitted by the game logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    PieceSpawned {
        kind: PieceKind,
    },
    PieceMoved {
        direction: Direction,
    },
    PieceRotated {
        clockwise: bool,
        rotation: Rotation,
        /// Kick offset that made the rotation fit, `(0, 0)` when none was needed.
        kick: (i32, i32),
    },
    SoftDropped {
        cells: u32,
    },
    #[serde(rename = "pieceHardDropped")]
    HardDropped {
        distance: u32,
    },
    PieceHeld {
        held: PieceKind,
        /// Kind swapped back into play, `None` when the hold slot was empty.
        released: Option<PieceKind>,
    },
    PieceLocked {
        kind: PieceKind,
        cells: Vec<(i32, i32)>,
        #[serde(rename = "tSpin")]
        t_spin: TSpinKind,
        /// Full rows produced by this lock.
        #[serde(rename = "linesCleared")]
        lines_cleared: usize,
    },
    LineClearing {
        lines: Vec<usize>,
        count: usize,
        action: ClearAction,
        #[serde(rename = "tSpin")]
        t_spin: TSpinKind,
    },
    LinesCleared {
        lines: Vec<usize>,
        count: usize,
    },
    GameOver {
        #[serde(rename = "finalStats")]
        stats: GameStats,
    },
}

/// Lifecycle notifications from the scheduling engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineEvent {
    Started,
    Paused,
    Resumed,
    Stopped,
    Restarted,
    MuteToggled { muted: bool },
}

/// Receiver for fire-and-forget notifications (presentation, audio hooks).
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);

    fn on_engine_event(&mut self, _event: &EngineEvent) {}

    fn on_game_over(&mut self, _stats: &GameStats) {}
}

/// Shared observers: the host keeps one handle, the engine owns the other.
impl<T: GameObserver> GameObserver for Rc<RefCell<T>> {
    fn on_event(&mut self, event: &GameEvent) {
        self.borrow_mut().on_event(event);
    }

    fn on_engine_event(&mut self, event: &EngineEvent) {
        self.borrow_mut().on_engine_event(event);
    }

    fn on_game_over(&mut self, stats: &GameStats) {
        self.borrow_mut().on_game_over(stats);
    }
}

/// Observer that records everything it sees.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
    pub engine_events: Vec<EngineEvent>,
    pub final_stats: Option<GameStats>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.engine_events.clear();
        self.final_stats = None;
    }
}

impl GameObserver for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }

    fn on_engine_event(&mut self, event: &EngineEvent) {
        self.engine_events.push(*event);
    }

    fn on_game_over(&mut self, stats: &GameStats) {
        self.final_stats = Some(*stats);
    }
}
