//! Systems driven by the engine alongside the game logic
//!
//! The set is closed: scoring, and a bag of host observers. Every variant
//! answers the same calls so the engine can route events without caring
//! which one it is talking to.

use std::fmt;
use std::time::Duration;

use blockfall_core::{EngineEvent, GameEvent, GameObserver, GameStats, ScoreKeeper};

/// Host-supplied observers (presentation, audio).
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn GameObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[derive(Debug)]
pub enum System {
    Scoring(ScoreKeeper),
    Hooks(ObserverSet),
}

impl System {
    pub fn name(&self) -> &'static str {
        match self {
            System::Scoring(_) => "scoring",
            System::Hooks(_) => "hooks",
        }
    }

    /// Advance by one logic step.
    pub fn tick(&mut self, dt: Duration) {
        match self {
            System::Scoring(keeper) => keeper.tick(dt),
            System::Hooks(_) => {}
        }
    }

    pub fn on_event(&mut self, event: &GameEvent) {
        match self {
            System::Scoring(keeper) => keeper.apply(event),
            System::Hooks(set) => {
                for observer in &mut set.observers {
                    observer.on_event(event);
                }
            }
        }
    }

    pub fn on_engine_event(&mut self, event: &EngineEvent) {
        match self {
            System::Scoring(_) => {}
            System::Hooks(set) => {
                for observer in &mut set.observers {
                    observer.on_engine_event(event);
                }
            }
        }
    }

    pub fn on_game_over(&mut self, stats: &GameStats) {
        match self {
            System::Scoring(keeper) => {
                log::info!(
                    "final score {} at level {} ({} lines)",
                    keeper.score(),
                    keeper.level(),
                    keeper.lines()
                );
            }
            System::Hooks(set) => {
                for observer in &mut set.observers {
                    observer.on_game_over(stats);
                }
            }
        }
    }

    /// Gravity interval, if this system owns one.
    pub fn fall_interval(&self) -> Option<Duration> {
        match self {
            System::Scoring(keeper) => Some(keeper.fall_interval()),
            System::Hooks(_) => None,
        }
    }

    /// Return to the state of a fresh game. Observers are kept.
    pub fn reset(&mut self) {
        match self {
            System::Scoring(keeper) => keeper.reset(),
            System::Hooks(_) => {}
        }
    }
}
