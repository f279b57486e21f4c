//! Game logic module - the falling-piece state machine
//!
//! Owns the board and the current/next/held pieces and sequences
//! spawn -> fall -> land -> lock -> clear -> spawn on a fixed tick.
//!
//! ```text
//! Spawning -> Falling <-> Landed (lock timer) -> Locking -> LineClearing -> Spawning
//!    |                                             |
//!    +---- invalid spawn ----> GameOver <----------+ (via Spawning)
//! ```
//!
//! Timekeeping is three accumulators compared against thresholds: the fall
//! timer (level-derived interval supplied by the caller), the lock timer
//! (`LogicConfig::lock_delay_ms`) and the clear timer
//! (`LogicConfig::line_clear_ms`). While rows are clearing, gravity and
//! locking are suspended.
//!
//! Player operations return `bool`: a rejected move is a normal outcome, not
//! an error. Everything observers may care about is buffered as a
//! [`GameEvent`] and handed out by [`GameLogic::drain_events`].

use std::time::Duration;

use serde::Serialize;

use blockfall_types::{ClearAction, Direction, PieceKind, TSpinKind};

use crate::board::Board;
use crate::collision::CollisionDetector;
use crate::config::LogicConfig;
use crate::events::{GameEvent, GameStats};
use crate::generator::PieceGenerator;
use crate::pieces::{Piece, PieceView};
use crate::snapshot::RenderSnapshot;

/// Observable state of the machine between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Created but not started.
    Ready,
    /// Current piece can still descend.
    Falling,
    /// Current piece rests on something; the lock timer is running.
    Landed,
    /// Full rows are being removed; no piece in play.
    LineClearing,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LineClear {
    rows: Vec<usize>,
    action: ClearAction,
    t_spin: TSpinKind,
    elapsed: Duration,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameLogic {
    config: LogicConfig,
    board: Board,
    generator: PieceGenerator,
    collision: CollisionDetector,
    current: Option<Piece>,
    next: Option<Piece>,
    held: Option<PieceKind>,
    can_hold: bool,
    ghost: Option<Piece>,
    clearing: Option<LineClear>,
    fall_timer: Duration,
    lock_timer: Duration,
    lock_resets: u32,
    last_action_was_rotation: bool,
    started: bool,
    game_over: bool,
    stats: GameStats,
    events: Vec<GameEvent>,
}

impl GameLogic {
    /// Create a new game. Nothing falls until [`GameLogic::start`].
    pub fn new(config: LogicConfig) -> Self {
        let mut generator = match config.seed {
            Some(seed) => PieceGenerator::with_seed(seed, config.width),
            None => PieceGenerator::new(config.width),
        };
        let next = generator.get_next_piece();
        let board = Board::with_size(config.width, config.height);

        Self {
            collision: CollisionDetector::for_board(&board),
            board,
            generator,
            current: None,
            next: Some(next),
            held: None,
            can_hold: true,
            ghost: None,
            clearing: None,
            fall_timer: Duration::ZERO,
            lock_timer: Duration::ZERO,
            lock_resets: 0,
            last_action_was_rotation: false,
            started: false,
            game_over: false,
            stats: GameStats::default(),
            events: Vec::new(),
            config,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        log::info!(
            "game started on {}x{} board (seed {})",
            self.board.width(),
            self.board.height(),
            self.generator.seed()
        );
        self.spawn_piece();
    }

    /// Throw away all state and start again with the same configuration.
    ///
    /// A configured seed replays the same piece sequence.
    pub fn restart(&mut self) {
        log::info!("game restarted");
        *self = Self::new(self.config.clone());
        self.start();
    }

    pub fn config(&self) -> &LogicConfig {
        &self.config
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn ghost(&self) -> Option<&Piece> {
        self.ghost.as_ref()
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn collision(&self) -> &CollisionDetector {
        &self.collision
    }

    pub fn generator(&self) -> &PieceGenerator {
        &self.generator
    }

    pub fn fall_timer(&self) -> Duration {
        self.fall_timer
    }

    pub fn lock_timer(&self) -> Duration {
        self.lock_timer
    }

    pub fn is_clearing(&self) -> bool {
        self.clearing.is_some()
    }

    /// Rows currently in the removal animation.
    pub fn clearing_rows(&self) -> &[usize] {
        self.clearing
            .as_ref()
            .map(|c| c.rows.as_slice())
            .unwrap_or(&[])
    }

    pub fn phase(&self) -> GamePhase {
        if self.game_over {
            return GamePhase::GameOver;
        }
        if !self.started {
            return GamePhase::Ready;
        }
        if self.clearing.is_some() {
            return GamePhase::LineClearing;
        }
        match self.current {
            Some(ref piece) if self.collision.has_landed(piece, &self.board) => GamePhase::Landed,
            _ => GamePhase::Falling,
        }
    }

    /// Upcoming kinds: the pre-generated next piece, then the bag.
    pub fn preview(&self, count: usize) -> Vec<PieceKind> {
        let Some(next) = self.next else {
            return self.generator.preview_next(count);
        };
        let mut kinds = Vec::with_capacity(count);
        if count > 0 {
            kinds.push(next.kind);
            kinds.extend(self.generator.preview_next(count - 1));
        }
        kinds
    }

    /// Hand buffered events to the caller.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether player operations are accepted right now.
    fn accepts_input(&self) -> bool {
        self.started && !self.game_over && self.clearing.is_none()
    }

    /// Advance the simulation by `dt`.
    ///
    /// `fall_interval` is the level-derived gravity interval owned by the
    /// scoring collaborator. Returns true if the piece moved, locked, or a
    /// line clear finished.
    pub fn update(&mut self, dt: Duration, fall_interval: Duration) -> bool {
        if !self.started || self.game_over {
            return false;
        }

        if let Some(clear) = self.clearing.as_mut() {
            clear.elapsed += dt;
            if clear.elapsed >= self.config.line_clear_duration() {
                self.finish_line_clear();
                return true;
            }
            return false;
        }

        let Some(piece) = self.current else {
            return false;
        };

        let mut changed = false;
        self.fall_timer += dt;
        if self.fall_timer >= fall_interval {
            self.fall_timer = Duration::ZERO;
            if self.collision.can_move(&piece, &self.board, Direction::Down) {
                self.current = Some(piece.offset(0, 1));
                self.last_action_was_rotation = false;
                changed = true;
            }
        }

        if let Some(piece) = self.current {
            if self.collision.has_landed(&piece, &self.board) {
                self.lock_timer += dt;
                if self.lock_timer >= self.config.lock_delay() {
                    self.lock_piece();
                    return true;
                }
            } else {
                self.lock_timer = Duration::ZERO;
            }
        }

        self.refresh_ghost();
        changed
    }

    /// Translate the current piece one cell.
    ///
    /// A successful `Down` is a soft drop and emits [`GameEvent::SoftDropped`].
    pub fn move_piece(&mut self, direction: Direction) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };
        if !self.collision.can_move(&piece, &self.board, direction) {
            return false;
        }

        let was_landed = self.collision.has_landed(&piece, &self.board);
        let (dx, dy) = direction.offset();
        self.current = Some(piece.offset(dx, dy));
        self.last_action_was_rotation = false;

        match direction {
            Direction::Down => {
                self.fall_timer = Duration::ZERO;
                self.stats.drop_distance += 1;
                self.events.push(GameEvent::SoftDropped { cells: 1 });
            }
            Direction::Left | Direction::Right => {
                self.events.push(GameEvent::PieceMoved { direction });
            }
        }

        self.after_manipulation(was_landed);
        true
    }

    /// Rotate the current piece, trying wall kicks when blocked in place.
    pub fn rotate_piece(&mut self, clockwise: bool) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };
        // O piece doesn't rotate
        if piece.kind == PieceKind::O {
            return false;
        }

        let rotated = self.generator.rotate_piece(&piece, clockwise);
        let Some(placed) = self
            .collision
            .can_rotate(&piece, &self.board, &rotated, &self.generator)
        else {
            return false;
        };

        let was_landed = self.collision.has_landed(&piece, &self.board);
        self.current = Some(placed);
        self.last_action_was_rotation = true;
        self.events.push(GameEvent::PieceRotated {
            clockwise,
            rotation: placed.rotation,
            kick: (placed.x - rotated.x, placed.y - rotated.y),
        });

        self.after_manipulation(was_landed);
        true
    }

    /// Drop the current piece as far as it goes and lock it immediately.
    pub fn hard_drop(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };

        let distance = self.collision.hard_drop_distance(&piece, &self.board);
        if distance > 0 {
            self.current = Some(piece.offset(0, distance as i32));
            self.last_action_was_rotation = false;
        }
        self.stats.drop_distance += distance;
        self.events.push(GameEvent::HardDropped { distance });

        self.lock_piece();
        true
    }

    /// Swap the current piece with the held one (once per piece).
    ///
    /// With an empty hold slot the current kind is stored and the next piece
    /// spawns.
    pub fn hold_piece(&mut self) -> bool {
        if !self.accepts_input() || !self.can_hold {
            return false;
        }
        let Some(piece) = self.current.take() else {
            return false;
        };

        let released = self.held.replace(piece.kind);
        self.stats.holds += 1;
        self.events.push(GameEvent::PieceHeld {
            held: piece.kind,
            released,
        });

        match released {
            Some(kind) => {
                let swapped = self.generator.spawn(kind);
                self.reset_piece_timers();
                if !self.place_spawned(swapped) {
                    return true;
                }
            }
            None => {
                if !self.spawn_piece() {
                    return true;
                }
            }
        }

        self.can_hold = false;
        true
    }

    /// Bookkeeping shared by successful moves and rotations.
    fn after_manipulation(&mut self, was_landed: bool) {
        let now_landed = self
            .current
            .as_ref()
            .is_some_and(|p| self.collision.has_landed(p, &self.board));
        if was_landed || now_landed {
            self.reset_lock_timer();
        }
        self.refresh_ghost();
    }

    /// Reset a running lock timer, honouring the optional reset cap.
    fn reset_lock_timer(&mut self) {
        if self.lock_timer.is_zero() {
            return;
        }
        if let Some(limit) = self.config.lock_reset_limit {
            if self.lock_resets >= limit {
                return;
            }
        }
        self.lock_timer = Duration::ZERO;
        self.lock_resets += 1;
    }

    fn reset_piece_timers(&mut self) {
        self.fall_timer = Duration::ZERO;
        self.lock_timer = Duration::ZERO;
        self.lock_resets = 0;
        self.last_action_was_rotation = false;
    }

    fn refresh_ghost(&mut self) {
        self.ghost = match self.current {
            Some(ref piece) if self.config.ghost_enabled => {
                Some(self.collision.ghost_piece(piece, &self.board))
            }
            _ => None,
        };
    }

    /// Promote the next piece and draw a fresh one.
    ///
    /// Returns false (and ends the game) when the new piece does not fit.
    fn spawn_piece(&mut self) -> bool {
        let piece = match self.next.take() {
            Some(piece) => piece,
            None => self.generator.get_next_piece(),
        };
        self.next = Some(self.generator.get_next_piece());
        self.reset_piece_timers();
        self.can_hold = true;
        self.place_spawned(piece)
    }

    /// Put a freshly spawned piece into play, or end the game if it overlaps.
    fn place_spawned(&mut self, piece: Piece) -> bool {
        if !self.collision.is_valid_position(&piece, &self.board, 0, 0) {
            self.current = None;
            self.ghost = None;
            self.enter_game_over();
            return false;
        }

        log::debug!("spawned {:?} at ({}, {})", piece.kind, piece.x, piece.y);
        self.current = Some(piece);
        self.events.push(GameEvent::PieceSpawned { kind: piece.kind });
        self.refresh_ghost();
        true
    }

    fn enter_game_over(&mut self) {
        self.game_over = true;
        log::info!(
            "game over after {} pieces, {} lines",
            self.stats.pieces_placed,
            self.stats.lines_cleared
        );
        self.events.push(GameEvent::GameOver { stats: self.stats });
    }

    /// Write the current piece into the board and either respawn or start
    /// clearing the rows it completed.
    fn lock_piece(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };
        self.ghost = None;

        let t_spin = self
            .collision
            .t_spin_kind(&piece, &self.board, self.last_action_was_rotation);
        // A mini stays on the lock event for scoring but never retags the clear.
        let clear_spin = if self
            .collision
            .check_t_spin(&piece, &self.board, self.last_action_was_rotation)
        {
            TSpinKind::Full
        } else {
            TSpinKind::None
        };

        // Cells above the field are dropped: the board never stores them.
        let cells = piece.cells();
        for &(x, y) in &cells {
            self.board.set(x, y, Some(piece.color));
        }

        self.stats.pieces_placed += 1;
        if clear_spin.is_t_spin() {
            self.stats.t_spins += 1;
        }

        let rows = self.collision.full_lines(&self.board);
        log::debug!(
            "locked {:?} at ({}, {}), {} full rows, t-spin {:?}",
            piece.kind,
            piece.x,
            piece.y,
            rows.len(),
            t_spin
        );
        self.events.push(GameEvent::PieceLocked {
            kind: piece.kind,
            cells: cells.to_vec(),
            t_spin,
            lines_cleared: rows.len(),
        });

        self.reset_piece_timers();
        match ClearAction::from_clear(rows.len(), clear_spin) {
            None => {
                self.spawn_piece();
            }
            Some(action) => {
                self.events.push(GameEvent::LineClearing {
                    lines: rows.clone(),
                    count: rows.len(),
                    action,
                    t_spin: clear_spin,
                });
                self.clearing = Some(LineClear {
                    rows,
                    action,
                    t_spin,
                    elapsed: Duration::ZERO,
                });
            }
        }
    }

    fn finish_line_clear(&mut self) {
        let Some(clear) = self.clearing.take() else {
            return;
        };
        let removed = self.board.remove_rows(&clear.rows);
        self.stats.lines_cleared += removed as u32;
        log::debug!(
            "removed rows {:?} ({:?}, t-spin {:?})",
            clear.rows,
            clear.action,
            clear.t_spin
        );
        self.events.push(GameEvent::LinesCleared {
            count: clear.rows.len(),
            lines: clear.rows,
        });
        self.spawn_piece();
    }

    /// Fill `out` with the current render view, reusing its buffers.
    pub fn snapshot_into(&self, out: &mut RenderSnapshot, preview: usize) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.board.clear();
        out.board.extend_from_slice(self.board.cells());
        out.current = self.current.as_ref().map(PieceView::from);
        out.ghost = self.ghost.as_ref().map(|g| g.cells().to_vec());
        out.next.clear();
        out.next.extend(self.preview(preview));
        out.clearing_rows.clear();
        out.clearing_rows.extend_from_slice(self.clearing_rows());
        out.held = self.held;
        out.can_hold = self.can_hold;
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let mut s = RenderSnapshot::default();
        self.snapshot_into(&mut s, self.config.preview_count);
        s
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_current(&mut self, piece: Piece) {
        self.current = Some(piece);
        self.reset_piece_timers();
        self.refresh_ghost();
    }
}

impl Default for GameLogic {
    fn default() -> Self {
        Self::new(LogicConfig::default())
    }
}
