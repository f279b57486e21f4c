//! Pieces module - tetromino shape matrices and SRS wall kick tables
//!
//! Every kind is described by a square 0/1 matrix (4x4 for I, 2x2 for O,
//! 3x3 for the rest). Rotating a piece rotates its matrix in place, so the
//! matrix size never changes across rotations and the rotation centre of the
//! 3x3 kinds is always the middle cell.
//!
//! Kick offsets follow the Super Rotation System with rows growing downward.
//! Reference: https://tetris.wiki/SRS

use arrayvec::ArrayVec;
use serde::Serialize;

use blockfall_types::{ColorTag, PieceKind, Rotation};

/// Largest matrix side length (the I piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Absolute (column, row) cell coordinates of a piece.
pub type PieceCells = ArrayVec<(i32, i32), { MAX_SHAPE_SIZE * MAX_SHAPE_SIZE }>;

/// Square 0/1 shape grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    size: usize,
    bits: [[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl ShapeMatrix {
    const fn new(size: usize, bits: [[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE]) -> Self {
        Self { size, bits }
    }

    /// Spawn-orientation matrix for a kind.
    pub fn for_kind(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => I_SHAPE,
            PieceKind::O => O_SHAPE,
            PieceKind::T => T_SHAPE,
            PieceKind::S => S_SHAPE,
            PieceKind::Z => Z_SHAPE,
            PieceKind::J => J_SHAPE,
            PieceKind::L => L_SHAPE,
        }
    }

    /// Side length of the matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        col < self.size && row < self.size && self.bits[row][col] != 0
    }

    /// Rotate 90° clockwise: transpose, then reverse each row.
    pub fn rotated_cw(&self) -> Self {
        let n = self.size;
        let mut bits = [[0u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in bits.iter_mut().enumerate().take(n) {
            for (c, bit) in row.iter_mut().enumerate().take(n) {
                *bit = self.bits[n - 1 - c][r];
            }
        }
        Self { size: n, bits }
    }

    /// Rotate 90° counter-clockwise: transpose, then reverse the row order.
    pub fn rotated_ccw(&self) -> Self {
        let n = self.size;
        let mut bits = [[0u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in bits.iter_mut().enumerate().take(n) {
            for (c, bit) in row.iter_mut().enumerate().take(n) {
                *bit = self.bits[c][n - 1 - r];
            }
        }
        Self { size: n, bits }
    }

    /// Filled cells as (column, row) offsets inside the matrix.
    pub fn filled(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.size).flat_map(move |row| {
            (0..self.size)
                .filter(move |&col| self.bits[row][col] != 0)
                .map(move |col| (col as i32, row as i32))
        })
    }

    /// Rows of the matrix as 0/1 values (for presentation and debugging).
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.bits[..self.size].iter().map(move |row| &row[..self.size])
    }
}

const I_SHAPE: ShapeMatrix = ShapeMatrix::new(
    4,
    [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
);
const O_SHAPE: ShapeMatrix = ShapeMatrix::new(
    2,
    [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);
const T_SHAPE: ShapeMatrix = ShapeMatrix::new(
    3,
    [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);
const S_SHAPE: ShapeMatrix = ShapeMatrix::new(
    3,
    [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);
const Z_SHAPE: ShapeMatrix = ShapeMatrix::new(
    3,
    [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);
const J_SHAPE: ShapeMatrix = ShapeMatrix::new(
    3,
    [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);
const L_SHAPE: ShapeMatrix = ShapeMatrix::new(
    3,
    [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);

/// A piece: kind, shape matrix, origin, rotation and color.
///
/// The origin is the board position of the matrix's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: ShapeMatrix,
    pub x: i32,
    pub y: i32,
    pub rotation: Rotation,
    pub color: ColorTag,
}

impl Piece {
    /// Create a piece in spawn orientation with its origin at (x, y).
    pub fn new(kind: PieceKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            shape: ShapeMatrix::for_kind(kind),
            x,
            y,
            rotation: Rotation::North,
            color: kind.color(),
        }
    }

    /// Create a piece horizontally centered on a board `board_width` wide, row 0.
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let size = ShapeMatrix::for_kind(kind).size();
        let x = (board_width.saturating_sub(size) / 2) as i32;
        Self::new(kind, x, 0)
    }

    /// Copy of this piece translated by (dx, dy).
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Absolute board coordinates of every filled cell.
    pub fn cells(&self) -> PieceCells {
        self.shape
            .filled()
            .map(|(col, row)| (self.x + col, self.y + row))
            .collect()
    }

    /// Leftmost occupied column.
    pub fn min_x(&self) -> i32 {
        self.cells().iter().map(|&(x, _)| x).min().unwrap_or(self.x)
    }

    /// Lowest (largest) occupied row.
    pub fn max_y(&self) -> i32 {
        self.cells().iter().map(|&(_, y)| y).max().unwrap_or(self.y)
    }
}

/// Read-only copy of a piece for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub kind: PieceKind,
    pub color: ColorTag,
    pub cells: Vec<(i32, i32)>,
}

impl From<&Piece> for PieceView {
    fn from(piece: &Piece) -> Self {
        Self {
            kind: piece.kind,
            color: piece.color,
            cells: piece.cells().to_vec(),
        }
    }
}

/// Kick offsets for the eight quarter-turn transitions of one table.
type KickTable = [[(i32, i32); 4]; 8];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // 0->1
    [(-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 1->0
    [(1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->2
    [(1, 0), (1, 1), (0, -2), (1, -2)],
    // 2->1
    [(-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 2->3
    [(1, 0), (1, -1), (0, 2), (1, 2)],
    // 3->2
    [(-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 3->0
    [(-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3
    [(1, 0), (1, -1), (0, 2), (1, 2)],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    // 0->1
    [(-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 1->0
    [(2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 1->2
    [(-1, 0), (2, 0), (-1, -2), (2, 1)],
    // 2->1
    [(1, 0), (-2, 0), (1, 2), (-2, -1)],
    // 2->3
    [(2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 3->2
    [(-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 3->0
    [(1, 0), (-2, 0), (1, 2), (-2, -1)],
    // 0->3
    [(-1, 0), (2, 0), (-1, -2), (2, 1)],
];

/// Offset used for transitions the tables do not list.
const NO_KICK: [(i32, i32); 1] = [(0, 0)];

/// Get the table row for a rotation transition
fn kick_index(from: Rotation, to: Rotation) -> Option<usize> {
    match (from, to) {
        (Rotation::North, Rotation::East) => Some(0),
        (Rotation::East, Rotation::North) => Some(1),
        (Rotation::East, Rotation::South) => Some(2),
        (Rotation::South, Rotation::East) => Some(3),
        (Rotation::South, Rotation::West) => Some(4),
        (Rotation::West, Rotation::South) => Some(5),
        (Rotation::West, Rotation::North) => Some(6),
        (Rotation::North, Rotation::West) => Some(7),
        _ => None,
    }
}

/// Ordered kick offsets to try after an in-place rotation from `from` to `to`
/// is blocked.
///
/// The O piece has none. Transitions that are not quarter turns fall back to
/// a single zero offset.
pub fn wall_kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> &'static [(i32, i32)] {
    let table = match kind {
        PieceKind::O => return &[],
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };
    match kick_index(from, to) {
        Some(idx) => &table[idx],
        None => &NO_KICK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_sizes() {
        assert_eq!(ShapeMatrix::for_kind(PieceKind::I).size(), 4);
        assert_eq!(ShapeMatrix::for_kind(PieceKind::O).size(), 2);
        for kind in [PieceKind::T, PieceKind::S, PieceKind::Z, PieceKind::J, PieceKind::L] {
            assert_eq!(ShapeMatrix::for_kind(kind).size(), 3);
        }
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in PieceKind::ALL {
            let mut shape = ShapeMatrix::for_kind(kind);
            for _ in 0..4 {
                assert_eq!(shape.filled().count(), 4, "{:?}", kind);
                shape = shape.rotated_cw();
            }
        }
    }

    #[test]
    fn test_t_rotation_points_right() {
        let east = ShapeMatrix::for_kind(PieceKind::T).rotated_cw();
        let rows: Vec<Vec<u8>> = east.rows().map(|r| r.to_vec()).collect();
        assert_eq!(rows, vec![vec![0, 1, 0], vec![0, 1, 1], vec![0, 1, 0]]);
    }

    #[test]
    fn test_i_rotation_matches_srs_columns() {
        let east = ShapeMatrix::for_kind(PieceKind::I).rotated_cw();
        let cells: Vec<_> = east.filled().collect();
        assert_eq!(cells, vec![(2, 0), (2, 1), (2, 2), (2, 3)]);

        let west = ShapeMatrix::for_kind(PieceKind::I).rotated_ccw();
        let cells: Vec<_> = west.filled().collect();
        assert_eq!(cells, vec![(1, 0), (1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_cw_then_ccw_is_identity() {
        for kind in PieceKind::ALL {
            let shape = ShapeMatrix::for_kind(kind);
            assert_eq!(shape.rotated_cw().rotated_ccw(), shape);
            assert_eq!(
                shape.rotated_cw().rotated_cw().rotated_cw().rotated_cw(),
                shape
            );
        }
    }

    #[test]
    fn test_o_rotation_is_noop() {
        let o = ShapeMatrix::for_kind(PieceKind::O);
        assert_eq!(o.rotated_cw(), o);
    }

    #[test]
    fn test_spawn_is_centered() {
        assert_eq!(Piece::spawn(PieceKind::I, 10).x, 3);
        assert_eq!(Piece::spawn(PieceKind::O, 10).x, 4);
        assert_eq!(Piece::spawn(PieceKind::T, 10).x, 3);
        assert_eq!(Piece::spawn(PieceKind::T, 10).y, 0);
    }

    #[test]
    fn test_kick_tables() {
        assert!(wall_kick_offsets(PieceKind::O, Rotation::North, Rotation::East).is_empty());
        assert_eq!(
            wall_kick_offsets(PieceKind::T, Rotation::North, Rotation::East)[0],
            (-1, 0)
        );
        assert_eq!(
            wall_kick_offsets(PieceKind::I, Rotation::North, Rotation::East)[0],
            (-2, 0)
        );
        assert_eq!(
            wall_kick_offsets(PieceKind::T, Rotation::North, Rotation::South),
            &[(0, 0)]
        );
    }
}
