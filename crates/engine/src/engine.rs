//! Game engine - fixed-timestep scheduler around [`GameLogic`]
//!
//! The host calls [`GameEngine::frame`] from its animation callback with a
//! monotonic timestamp. The engine turns the elapsed time into fixed logic
//! steps; each step drains the input queue, advances the logic and routes
//! the resulting events to every [`System`]. The return value tells the host
//! whether to schedule another frame.
//!
//! Lifecycle:
//!
//! ```text
//! Idle --start--> Playing <--pause/resume--> Paused
//!                    |                          |
//!                 game over                   stop
//!                    v                          v
//!                 GameOver ------stop------> Stopped
//! ```
//!
//! `restart` returns to Playing from any state.

use std::time::Duration;

use serde::Serialize;

use blockfall_core::{
    EngineEvent, GameEvent, GameLogic, GameObserver, LogicConfig, RenderSnapshot, ScoreKeeper,
};
use blockfall_types::{Direction, InputAction, BASE_DROP_MS};

use crate::config::EngineConfig;
use crate::input::{InputEvent, InputQueue};
use crate::system::{ObserverSet, System};
use crate::timestep::FixedTimestep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EngineState {
    /// Constructed, waiting for `start`.
    Idle,
    Playing,
    Paused,
    GameOver,
    Stopped,
}

#[derive(Debug)]
pub struct GameEngine {
    config: EngineConfig,
    logic: GameLogic,
    timestep: FixedTimestep,
    input: InputQueue,
    systems: Vec<System>,
    state: EngineState,
    last_frame: Option<Duration>,
    visible: bool,
    muted: bool,
    steps: u64,
}

impl GameEngine {
    pub fn new(logic_config: LogicConfig, config: EngineConfig) -> Self {
        let timestep = FixedTimestep::from_hz(config.fixed_step_hz, config.max_frame_delta());
        let systems = vec![
            System::Scoring(ScoreKeeper::with_start_level(config.start_level)),
            System::Hooks(ObserverSet::new()),
        ];

        Self {
            logic: GameLogic::new(logic_config),
            timestep,
            input: InputQueue::new(),
            systems,
            state: EngineState::Idle,
            last_frame: None,
            visible: true,
            muted: false,
            steps: 0,
            config,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == EngineState::Playing
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn logic(&self) -> &GameLogic {
        &self.logic
    }

    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    /// The scoring system's keeper.
    pub fn scorer(&self) -> Option<&ScoreKeeper> {
        self.systems.iter().find_map(|system| match system {
            System::Scoring(keeper) => Some(keeper),
            System::Hooks(_) => None,
        })
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Logic steps run since construction.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Interpolation factor between the last two logic steps.
    pub fn alpha(&self) -> f64 {
        self.timestep.alpha()
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Register a presentation or audio observer.
    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        let hooks = self.systems.iter_mut().find_map(|system| match system {
            System::Hooks(set) => Some(set),
            System::Scoring(_) => None,
        });
        match hooks {
            Some(set) => set.add(observer),
            None => {
                let mut set = ObserverSet::new();
                set.add(observer);
                self.systems.push(System::Hooks(set));
            }
        }
    }

    /// Queue an input entry for the next step. Dropped unless playing.
    pub fn push_input(&mut self, event: InputEvent) {
        if self.state != EngineState::Playing {
            log::trace!("dropped {:?} while {:?}", event.action, self.state);
            return;
        }
        self.input.push(event);
    }

    pub fn start(&mut self) -> bool {
        if self.state != EngineState::Idle {
            return false;
        }
        self.logic.start();
        self.state = EngineState::Playing;
        self.last_frame = None;
        log::info!("engine started");
        self.emit(EngineEvent::Started);
        self.dispatch_events();
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != EngineState::Playing {
            return false;
        }
        self.state = EngineState::Paused;
        self.input.clear();
        self.timestep.reset();
        self.last_frame = None;
        log::info!("engine paused");
        self.emit(EngineEvent::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != EngineState::Paused {
            return false;
        }
        self.state = EngineState::Playing;
        self.last_frame = None;
        log::info!("engine resumed");
        self.emit(EngineEvent::Resumed);
        true
    }

    /// Stop scheduling for good. Only `restart` leaves this state.
    pub fn stop(&mut self) -> bool {
        if self.state == EngineState::Stopped {
            return false;
        }
        self.state = EngineState::Stopped;
        self.input.clear();
        log::info!("engine stopped");
        self.emit(EngineEvent::Stopped);
        true
    }

    pub fn restart(&mut self) {
        self.logic.restart();
        for system in &mut self.systems {
            system.reset();
        }
        self.input.clear();
        self.timestep.reset();
        self.last_frame = None;
        self.state = EngineState::Playing;
        self.emit(EngineEvent::Restarted);
        self.dispatch_events();
    }

    /// Page visibility changed. Hiding pauses; showing does not resume.
    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.pause();
        }
    }

    /// Window lost focus.
    pub fn focus_lost(&mut self) {
        self.pause();
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.emit(EngineEvent::MuteToggled { muted: self.muted });
    }

    /// Advance to host time `now`. Returns whether to schedule another frame.
    pub fn frame(&mut self, now: Duration) -> bool {
        if self.state != EngineState::Playing {
            return false;
        }

        let dt = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_frame = Some(now);

        let steps = self.timestep.accumulate(dt);
        log::trace!("frame dt {:?}: {} steps", dt, steps);
        for _ in 0..steps {
            self.step();
            if self.state != EngineState::Playing {
                break;
            }
        }

        self.state == EngineState::Playing
    }

    /// [`GameEngine::frame`] with a millisecond timestamp as browsers report it.
    pub fn frame_ms(&mut self, now_ms: f64) -> bool {
        let now = if now_ms.is_finite() && now_ms > 0.0 {
            Duration::from_secs_f64(now_ms / 1000.0)
        } else {
            Duration::ZERO
        };
        self.frame(now)
    }

    /// Run exactly one fixed logic step.
    pub fn step(&mut self) {
        let dt = self.timestep.step();

        for event in self.input.drain() {
            if self.state != EngineState::Playing {
                break;
            }
            self.handle_input(event);
        }

        if self.state == EngineState::Playing {
            let fall_interval = self.fall_interval();
            self.logic.update(dt, fall_interval);
            for system in &mut self.systems {
                system.tick(dt);
            }
        }

        self.dispatch_events();
        self.steps += 1;
    }

    fn fall_interval(&self) -> Duration {
        self.systems
            .iter()
            .find_map(System::fall_interval)
            .unwrap_or(Duration::from_millis(u64::from(BASE_DROP_MS)))
    }

    fn handle_input(&mut self, event: InputEvent) {
        if !event.phase.is_active() {
            return;
        }
        let accepted = match event.action {
            InputAction::Left => self.logic.move_piece(Direction::Left),
            InputAction::Right => self.logic.move_piece(Direction::Right),
            InputAction::Down => self.logic.move_piece(Direction::Down),
            InputAction::Rotate => self.logic.rotate_piece(true),
            InputAction::RotateCcw => self.logic.rotate_piece(false),
            InputAction::Drop => self.logic.hard_drop(),
            InputAction::Hold => self.logic.hold_piece(),
            InputAction::Pause => self.pause(),
            InputAction::Mute => {
                self.toggle_mute();
                true
            }
        };
        log::trace!("input {} -> {}", event.action.as_str(), accepted);
    }

    /// Route buffered logic events to every system.
    fn dispatch_events(&mut self) {
        for event in self.logic.drain_events() {
            for system in &mut self.systems {
                system.on_event(&event);
            }
            if let GameEvent::GameOver { stats } = event {
                self.state = EngineState::GameOver;
                self.input.clear();
                for system in &mut self.systems {
                    system.on_game_over(&stats);
                }
            }
        }
    }

    fn emit(&mut self, event: EngineEvent) {
        for system in &mut self.systems {
            system.on_engine_event(&event);
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        self.logic.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut RenderSnapshot) {
        self.logic
            .snapshot_into(out, self.logic.config().preview_count);
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(LogicConfig::default(), EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(seed: u64) -> GameEngine {
        GameEngine::new(LogicConfig::seeded(seed), EngineConfig::default())
    }

    #[test]
    fn test_starts_idle() {
        let mut engine = engine(1);
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(!engine.frame(Duration::from_millis(16)));
        assert!(engine.logic().current().is_none());
    }

    #[test]
    fn test_start_is_once() {
        let mut engine = engine(1);
        assert!(engine.start());
        assert!(!engine.start());
        assert!(engine.logic().current().is_some());
    }

    #[test]
    fn test_first_frame_runs_no_steps() {
        let mut engine = engine(1);
        engine.start();
        assert!(engine.frame(Duration::from_secs(5)));
        assert_eq!(engine.steps(), 0);

        assert!(engine.frame(Duration::from_secs(5) + Duration::from_millis(34)));
        assert_eq!(engine.steps(), 2);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut engine = engine(1);
        engine.start();
        assert!(engine.pause());
        assert!(!engine.pause());
        assert!(!engine.frame(Duration::from_millis(100)));
        assert!(engine.resume());
        assert!(engine.is_playing());
    }

    #[test]
    fn test_release_phase_ignored() {
        let mut engine = engine(1);
        engine.start();
        let x = engine.logic().current().unwrap().x;

        engine.push_input(InputEvent::new(
            InputAction::Left,
            blockfall_types::InputPhase::Release,
            0.0,
        ));
        engine.step();
        assert_eq!(engine.logic().current().unwrap().x, x);
    }

    #[test]
    fn test_pause_action_drops_rest_of_queue() {
        let mut engine = engine(1);
        engine.start();
        let x = engine.logic().current().unwrap().x;

        engine.push_input(InputEvent::press(InputAction::Pause));
        engine.push_input(InputEvent::press(InputAction::Left));
        engine.step();

        assert_eq!(engine.state(), EngineState::Paused);
        assert_eq!(engine.logic().current().unwrap().x, x);
        assert_eq!(engine.pending_input(), 0);
    }

    #[test]
    fn test_mute_toggles() {
        let mut engine = engine(1);
        engine.start();
        engine.push_input(InputEvent::press(InputAction::Mute));
        engine.step();
        assert!(engine.is_muted());
        engine.toggle_mute();
        assert!(!engine.is_muted());
    }
}
