//! Core types module - shared data structures and constants
//!
//! This crate defines the plain data shared by the simulation core, the
//! scheduling engine and whatever host drives them (a browser bridge, the
//! headless simulator, tests). Nothing here carries behaviour beyond small
//! conversions, so every type is `Copy` and serialisable.
//!
//! # Board Dimensions
//!
//! Canonical playfield dimensions (a session may choose others at start):
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//!
//! Rows above 0 are legal for a falling piece but are never stored.
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FIXED_STEP_HZ` | 60 | Simulation steps per second |
//! | `MAX_FRAME_DELTA_MS` | 100 | Upper bound on one frame's elapsed time |
//! | `BASE_DROP_MS` | 1000 | Gravity at level 0 |
//! | `LOCK_DELAY_MS` | 500 | Time before a landed piece locks |
//! | `LINE_CLEAR_MS` | 300 | Row-removal animation window |
//!
//! # Drop Intervals by Level
//!
//! | Level | Interval |
//! |-------|----------|
//! | 0 | 1000ms |
//! | 1 | 800ms |
//! | 2 | 650ms |
//! | 3 | 500ms |
//! | 4 | 400ms |
//! | 5 | 320ms |
//! | 6 | 250ms |
//! | 7 | 200ms |
//! | 8 | 160ms |
//! | 9+ | 120ms floor |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{InputAction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(InputAction::from_str("drop"), Some(InputAction::Drop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: usize = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: usize = 20;

/// Simulation steps per second; one step is `1000 / 60` ms.
pub const FIXED_STEP_HZ: u32 = 60;

/// Largest frame delta fed into the accumulator after a stall.
pub const MAX_FRAME_DELTA_MS: u32 = 100;

/// Base gravity interval at level 0 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Lock delay once a piece can no longer descend.
pub const LOCK_DELAY_MS: u32 = 500;

/// Duration rows stay in the clearing state before they are removed.
pub const LINE_CLEAR_MS: u32 = 300;

/// Number of upcoming pieces exposed to presentation.
pub const PREVIEW_COUNT: usize = 3;

/// Drop intervals by level (milliseconds per row)
///
/// Index 0 = Level 0, Index 8 = Level 8
pub const DROP_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Drop interval for every level past the table.
pub const DROP_INTERVAL_FLOOR_MS: u32 = 120;

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Base points for clearing N lines at level 0; multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Combo scoring base value (50 points per combo step)
pub const COMBO_BASE: u32 = 50;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;

/// The seven tetromino piece kinds
///
/// - **I**: Cyan, the long bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Number of distinct kinds.
    pub const LEN: usize = 7;

    /// Every kind, in canonical bag order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Default color tag painted into the board when this kind locks.
    pub fn color(&self) -> ColorTag {
        match self {
            PieceKind::I => ColorTag(0x00f0f0),
            PieceKind::O => ColorTag(0xf0f000),
            PieceKind::T => ColorTag(0xa000f0),
            PieceKind::S => ColorTag(0x00f000),
            PieceKind::Z => ColorTag(0xf00000),
            PieceKind::J => ColorTag(0x0000f0),
            PieceKind::L => ColorTag(0xf0a000),
        }
    }
}

/// Opaque color carried by a filled cell.
///
/// The core never interprets the value; presentation maps it to whatever it
/// draws. The default palette packs `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTag(pub u32);

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(ColorTag)`: Filled cell
pub type Cell = Option<ColorTag>;

/// Rotation states, numbered 0-3 clockwise from spawn.
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation index 0-3.
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotation for an index, taken mod 4.
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }
}

/// Translation directions a piece may be moved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// Cell offset `(dx, dy)` for one step; rows grow downward.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// Decoded player actions delivered by the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputAction {
    /// Move piece one cell left
    Left,
    /// Move piece one cell right
    Right,
    /// Soft drop one cell
    Down,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Hard drop and lock
    Drop,
    /// Hold current piece (once per piece)
    Hold,
    /// Toggle pause
    Pause,
    /// Toggle audio mute (forwarded to observers)
    Mute,
}

impl InputAction {
    /// Parse action from its wire name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::InputAction;
    ///
    /// assert_eq!(InputAction::from_str("left"), Some(InputAction::Left));
    /// assert_eq!(InputAction::from_str("rotateCcw"), Some(InputAction::RotateCcw));
    /// assert_eq!(InputAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(InputAction::Left),
            "right" => Some(InputAction::Right),
            "down" => Some(InputAction::Down),
            "rotate" => Some(InputAction::Rotate),
            "rotateccw" => Some(InputAction::RotateCcw),
            "drop" => Some(InputAction::Drop),
            "hold" => Some(InputAction::Hold),
            "pause" => Some(InputAction::Pause),
            "mute" => Some(InputAction::Mute),
            _ => None,
        }
    }

    /// Convert to camelCase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            InputAction::Left => "left",
            InputAction::Right => "right",
            InputAction::Down => "down",
            InputAction::Rotate => "rotate",
            InputAction::RotateCcw => "rotateCcw",
            InputAction::Drop => "drop",
            InputAction::Hold => "hold",
            InputAction::Pause => "pause",
            InputAction::Mute => "mute",
        }
    }
}

/// Phase of a decoded input entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputPhase {
    /// Key or touch went down
    #[serde(alias = "start")]
    Press,
    /// Auto-repeat generated by the input collaborator
    Repeat,
    /// Key or touch went up
    #[serde(alias = "end")]
    Release,
}

impl InputPhase {
    /// Whether this phase triggers the action.
    pub fn is_active(&self) -> bool {
        matches!(self, InputPhase::Press | InputPhase::Repeat)
    }
}

/// T-Spin detection result
///
/// - **None**: Not a T-spin
/// - **Mini**: 3+ corners occupied but fewer than 2 front corners
/// - **Full**: 3+ corners occupied including both front corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TSpinKind {
    #[default]
    None,
    Mini,
    Full,
}

impl TSpinKind {
    /// Convert to optional string representation
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            TSpinKind::None => None,
            TSpinKind::Mini => Some("mini"),
            TSpinKind::Full => Some("full"),
        }
    }

    pub fn is_t_spin(&self) -> bool {
        !matches!(self, TSpinKind::None)
    }
}

/// Scoring action tag attached to a line clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClearAction {
    Single,
    Double,
    Triple,
    Tetris,
    TSpinSingle,
    TSpinDouble,
    TSpinTriple,
}

impl ClearAction {
    /// Tag for `lines` cleared rows, refined by the T-spin classification.
    ///
    /// Only a full T-spin retags the clear; a mini is tagged like a plain
    /// clear. Returns `None` when no rows were cleared.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::{ClearAction, TSpinKind};
    ///
    /// assert_eq!(ClearAction::from_clear(4, TSpinKind::None), Some(ClearAction::Tetris));
    /// assert_eq!(ClearAction::from_clear(2, TSpinKind::Full), Some(ClearAction::TSpinDouble));
    /// assert_eq!(ClearAction::from_clear(1, TSpinKind::Mini), Some(ClearAction::Single));
    /// assert_eq!(ClearAction::from_clear(0, TSpinKind::Full), None);
    /// ```
    pub fn from_clear(lines: usize, tspin: TSpinKind) -> Option<Self> {
        let action = match (tspin, lines) {
            (_, 0) => return None,
            (TSpinKind::Full, 1) => ClearAction::TSpinSingle,
            (TSpinKind::Full, 2) => ClearAction::TSpinDouble,
            (TSpinKind::Full, 3) => ClearAction::TSpinTriple,
            (_, 1) => ClearAction::Single,
            (_, 2) => ClearAction::Double,
            (_, 3) => ClearAction::Triple,
            _ => ClearAction::Tetris,
        };
        Some(action)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClearAction::Single => "single",
            ClearAction::Double => "double",
            ClearAction::Triple => "triple",
            ClearAction::Tetris => "tetris",
            ClearAction::TSpinSingle => "tSpinSingle",
            ClearAction::TSpinDouble => "tSpinDouble",
            ClearAction::TSpinTriple => "tSpinTriple",
        }
    }
}
