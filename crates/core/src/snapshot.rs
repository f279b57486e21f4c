use serde::Serialize;

use blockfall_types::{Cell, PieceKind};

use crate::pieces::PieceView;

/// Read-only view handed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major board cells.
    pub board: Vec<Cell>,
    pub current: Option<PieceView>,
    pub ghost: Option<Vec<(i32, i32)>>,
    pub next: Vec<PieceKind>,
    pub clearing_rows: Vec<usize>,
    pub held: Option<PieceKind>,
    pub can_hold: bool,
    pub game_over: bool,
}

impl RenderSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.board.clear();
        self.current = None;
        self.ghost = None;
        self.next.clear();
        self.clearing_rows.clear();
        self.held = None;
        self.can_hold = true;
        self.game_over = false;
    }

    /// Cell at (x, y), `None` outside the board or when empty.
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.board[y * self.width + x]
    }
}
