//! Collision detector - stateless validity oracle
//!
//! Answers every "may the piece be here?" question the game logic asks:
//! translation, rotation with wall kicks, landing, ghost projection,
//! hard-drop distance, T-spin corner classification and full rows.
//! The detector holds nothing but the board dimensions and never mutates
//! the board or the piece it is given.

use blockfall_types::{Direction, PieceKind, Rotation, TSpinKind};

use crate::board::Board;
use crate::generator::PieceGenerator;
use crate::pieces::Piece;

/// Corner order used by the T-spin check: top-left, top-right,
/// bottom-left, bottom-right of the 3x3 bounding box.
const T_CORNERS: [(i32, i32); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];

/// Front corners (indices into [`T_CORNERS`]) for each rotation: the two
/// corners on the side the T's nub points to.
fn front_corners(rotation: Rotation) -> [usize; 2] {
    match rotation {
        Rotation::North => [0, 1],
        Rotation::East => [1, 3],
        Rotation::South => [2, 3],
        Rotation::West => [0, 2],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionDetector {
    width: usize,
    height: usize,
}

impl CollisionDetector {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Detector sized to an existing board.
    pub fn for_board(board: &Board) -> Self {
        Self::new(board.width(), board.height())
    }

    /// Check whether `piece` translated by (dx, dy) fits.
    ///
    /// Every filled cell must have a column in `[0, width)` and a row below
    /// `height`. Rows above the field (negative) are allowed; rows inside it
    /// must be empty.
    pub fn is_valid_position(&self, piece: &Piece, board: &Board, dx: i32, dy: i32) -> bool {
        piece.cells().iter().all(|&(x, y)| {
            let (x, y) = (x + dx, y + dy);
            if x < 0 || x >= self.width as i32 || y >= self.height as i32 {
                return false;
            }
            y < 0 || !board.is_occupied(x, y)
        })
    }

    pub fn can_move(&self, piece: &Piece, board: &Board, direction: Direction) -> bool {
        let (dx, dy) = direction.offset();
        self.is_valid_position(piece, board, dx, dy)
    }

    /// Resolve a rotation with wall kicks.
    ///
    /// Tries `rotated` where it stands, then each kick offset for the
    /// transition in table order. Returns the first placement that fits.
    pub fn can_rotate(
        &self,
        piece: &Piece,
        board: &Board,
        rotated: &Piece,
        generator: &PieceGenerator,
    ) -> Option<Piece> {
        if self.is_valid_position(rotated, board, 0, 0) {
            return Some(*rotated);
        }

        generator
            .wall_kick_offsets(piece.kind, piece.rotation, rotated.rotation)
            .iter()
            .find(|&&(dx, dy)| self.is_valid_position(rotated, board, dx, dy))
            .map(|&(dx, dy)| rotated.offset(dx, dy))
    }

    pub fn has_landed(&self, piece: &Piece, board: &Board) -> bool {
        !self.can_move(piece, board, Direction::Down)
    }

    /// Number of rows the piece can fall before it collides.
    pub fn hard_drop_distance(&self, piece: &Piece, board: &Board) -> u32 {
        let mut distance: i32 = 0;
        while self.is_valid_position(piece, board, 0, distance + 1) {
            distance += 1;
        }
        distance as u32
    }

    /// The piece projected straight down to where it would land.
    pub fn ghost_piece(&self, piece: &Piece, board: &Board) -> Piece {
        piece.offset(0, self.hard_drop_distance(piece, board) as i32)
    }

    /// Whether a corner cell counts as occupied: outside the field on any
    /// side (including above it) or filled.
    fn corner_occupied(&self, board: &Board, x: i32, y: i32) -> bool {
        x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 || board.is_occupied(x, y)
    }

    /// Classify a T placement by corner occupancy.
    ///
    /// Only a T whose last successful action was a rotation can score; a
    /// translation never does, whatever the corners look like.
    pub fn t_spin_kind(&self, piece: &Piece, board: &Board, was_last_action_rotation: bool) -> TSpinKind {
        if piece.kind != PieceKind::T || !was_last_action_rotation {
            return TSpinKind::None;
        }

        let occupied = T_CORNERS.map(|(cx, cy)| self.corner_occupied(board, piece.x + cx, piece.y + cy));
        let total = occupied.iter().filter(|&&o| o).count();
        if total < 3 {
            return TSpinKind::None;
        }

        let front = front_corners(piece.rotation)
            .iter()
            .filter(|&&i| occupied[i])
            .count();
        if front >= 2 {
            TSpinKind::Full
        } else {
            TSpinKind::Mini
        }
    }

    /// T-spin check: at least three occupied corners, two of them in front.
    pub fn check_t_spin(&self, piece: &Piece, board: &Board, was_last_action_rotation: bool) -> bool {
        self.t_spin_kind(piece, board, was_last_action_rotation) == TSpinKind::Full
    }

    /// Rows whose every cell is filled, top to bottom.
    pub fn full_lines(&self, board: &Board) -> Vec<usize> {
        board.full_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall_types::ColorTag;

    const GRAY: Option<ColorTag> = Some(ColorTag(0x808080));

    fn setup() -> (CollisionDetector, Board, PieceGenerator) {
        let board = Board::new();
        (CollisionDetector::for_board(&board), board, PieceGenerator::with_seed(1, 10))
    }

    #[test]
    fn test_rows_above_field_are_valid() {
        let (detector, board, _) = setup();
        let piece = Piece::new(PieceKind::T, 3, -2);
        assert!(detector.is_valid_position(&piece, &board, 0, 0));
    }

    #[test]
    fn test_walls_and_floor() {
        let (detector, board, _) = setup();
        let piece = Piece::new(PieceKind::O, 0, 18);
        assert!(detector.is_valid_position(&piece, &board, 0, 0));
        assert!(!detector.can_move(&piece, &board, Direction::Left));
        assert!(!detector.can_move(&piece, &board, Direction::Down));
        assert!(detector.has_landed(&piece, &board));
        assert!(!detector.is_valid_position(&piece, &board, 9, 0));
    }

    #[test]
    fn test_occupied_cell_blocks() {
        let (detector, mut board, _) = setup();
        board.set(4, 5, GRAY);
        let piece = Piece::new(PieceKind::O, 4, 3);
        assert!(detector.is_valid_position(&piece, &board, 0, 0));
        assert!(!detector.can_move(&piece, &board, Direction::Down));
    }

    #[test]
    fn test_wall_kick_off_left_wall() {
        let (detector, board, generator) = setup();
        // Vertical T hugging the left wall with its stem column at x = 0.
        let piece = generator.rotate_piece(&Piece::new(PieceKind::T, -1, 5), true);
        assert!(detector.is_valid_position(&piece, &board, 0, 0));

        // Rotating on to South in place would poke column -1.
        let rotated = generator.rotate_piece(&piece, true);
        assert!(!detector.is_valid_position(&rotated, &board, 0, 0));

        let kicked = detector.can_rotate(&piece, &board, &rotated, &generator).unwrap();
        assert!(detector.is_valid_position(&kicked, &board, 0, 0));
        assert_eq!(kicked.x, rotated.x + 1);
    }

    #[test]
    fn test_rotation_fails_when_boxed_in() {
        let (detector, mut board, generator) = setup();
        for y in 0..20 {
            for x in 0..10 {
                board.set(x, y, GRAY);
            }
        }
        // A vertical I shaft.
        for y in 0..20 {
            board.set(5, y, None);
        }
        let piece = generator.rotate_piece(&Piece::new(PieceKind::I, 3, 10), true);
        assert!(detector.is_valid_position(&piece, &board, 0, 0));
        let rotated = generator.rotate_piece(&piece, true);
        assert!(detector.can_rotate(&piece, &board, &rotated, &generator).is_none());
    }

    #[test]
    fn test_hard_drop_distance_and_ghost() {
        let (detector, mut board, _) = setup();
        let piece = Piece::new(PieceKind::O, 4, 0);
        assert_eq!(detector.hard_drop_distance(&piece, &board), 18);

        board.set(4, 10, GRAY);
        assert_eq!(detector.hard_drop_distance(&piece, &board), 8);
        let ghost = detector.ghost_piece(&piece, &board);
        assert_eq!(ghost.y, 8);
        assert_eq!(detector.ghost_piece(&piece, &board), ghost);
    }

    #[test]
    fn test_t_spin_kinds() {
        let (detector, mut board, generator) = setup();
        // T pointing down (South) with origin (3, 17).
        let piece = generator.rotate_piece(&generator.rotate_piece(&Piece::new(PieceKind::T, 3, 17), true), true);
        assert_eq!(piece.rotation, Rotation::South);

        board.set(3, 19, GRAY); // bottom-left, front
        board.set(5, 19, GRAY); // bottom-right, front
        assert_eq!(detector.t_spin_kind(&piece, &board, true), TSpinKind::None);

        board.set(3, 17, GRAY); // top-left
        assert_eq!(detector.t_spin_kind(&piece, &board, true), TSpinKind::Full);
        assert!(detector.check_t_spin(&piece, &board, true));
        assert!(!detector.check_t_spin(&piece, &board, false));
    }

    #[test]
    fn test_t_spin_mini_when_front_open() {
        let (detector, mut board, generator) = setup();
        let piece = generator.rotate_piece(&generator.rotate_piece(&Piece::new(PieceKind::T, 3, 17), true), true);
        board.set(3, 17, GRAY);
        board.set(5, 17, GRAY);
        board.set(3, 19, GRAY);
        assert_eq!(detector.t_spin_kind(&piece, &board, true), TSpinKind::Mini);
        assert!(!detector.check_t_spin(&piece, &board, true));
    }

    #[test]
    fn test_t_spin_only_for_t() {
        let (detector, mut board, _) = setup();
        for &(x, y) in &[(3, 17), (5, 17), (3, 19), (5, 19)] {
            board.set(x, y, GRAY);
        }
        let piece = Piece::new(PieceKind::J, 3, 17);
        assert_eq!(detector.t_spin_kind(&piece, &board, true), TSpinKind::None);
    }
}
