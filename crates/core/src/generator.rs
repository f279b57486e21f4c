//! Piece generator - 7-bag supply plus rotation geometry
//!
//! Implements the "7-bag" randomization algorithm. Each bag holds one of each
//! kind (I, O, T, S, Z, J, L) in a uniformly shuffled order; pieces are drawn
//! front to back and a fresh bag is appended before the current one runs
//! dry, so one full bag of lookahead is always available. Any 7 draws that
//! start on a bag boundary contain every kind exactly once, which bounds the
//! gap between two pieces of the same kind to 12 draws.
//!
//! The shuffle uses a seeded [`Pcg32`], so equal seeds give equal sequences.

use std::collections::VecDeque;

use rand::{seq::SliceRandom, Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use blockfall_types::{PieceKind, Rotation};

use crate::pieces::{wall_kick_offsets, Piece};

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
    seed: u64,
    /// Remaining pieces of the current bag followed by at least one full bag.
    bag: VecDeque<PieceKind>,
    board_width: usize,
}

impl PieceGenerator {
    /// Create a generator seeded from the thread RNG.
    pub fn new(board_width: usize) -> Self {
        Self::with_seed(rand::rng().random(), board_width)
    }

    /// Create a generator with a fixed seed for reproducible sequences.
    pub fn with_seed(seed: u64, board_width: usize) -> Self {
        let mut generator = Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
            board_width,
        };
        generator.fill_bag();
        generator
    }

    /// Top the bag up so more than one full bag stays queued.
    fn fill_bag(&mut self) {
        while self.bag.len() <= PieceKind::LEN {
            let mut new_bag = PieceKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    /// Draw the next kind from the bag.
    pub fn next_kind(&mut self) -> PieceKind {
        self.fill_bag();
        // `fill_bag` leaves at least eight entries queued.
        let kind = self.bag.pop_front().unwrap_or(PieceKind::I);
        self.fill_bag();
        kind
    }

    /// Draw the next piece, horizontally centered at row 0.
    pub fn get_next_piece(&mut self) -> Piece {
        let kind = self.next_kind();
        log::trace!("generator drew {:?}", kind);
        self.spawn(kind)
    }

    /// Build a spawn-positioned piece of `kind` (used for hold swaps).
    pub fn spawn(&self, kind: PieceKind) -> Piece {
        Piece::spawn(kind, self.board_width)
    }

    /// Upcoming `count` kinds in true draw order.
    ///
    /// Runs the draw on a clone of the bag and RNG state; the live generator
    /// is left untouched.
    pub fn preview_next(&self, count: usize) -> Vec<PieceKind> {
        let mut simulated = self.clone();
        (0..count).map(|_| simulated.next_kind()).collect()
    }

    /// Return a new piece with its matrix rotated 90° and its rotation index
    /// advanced (clockwise) or retreated. Validity is not checked.
    pub fn rotate_piece(&self, piece: &Piece, clockwise: bool) -> Piece {
        let (shape, rotation) = if clockwise {
            (piece.shape.rotated_cw(), piece.rotation.rotate_cw())
        } else {
            (piece.shape.rotated_ccw(), piece.rotation.rotate_ccw())
        };
        Piece {
            shape,
            rotation,
            ..*piece
        }
    }

    /// Ordered kick candidates for a `from -> to` transition of `kind`.
    pub fn wall_kick_offsets(
        &self,
        kind: PieceKind,
        from: Rotation,
        to: Rotation,
    ) -> &'static [(i32, i32)] {
        wall_kick_offsets(kind, from, to)
    }

    /// Restart the sequence from the original seed.
    pub fn reset(&mut self) {
        *self = Self::with_seed(self.seed, self.board_width);
    }

    /// Seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board_width(&self) -> usize {
        self.board_width
    }
}
