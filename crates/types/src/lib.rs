//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the match-3 core.
//! All types are plain data with no behavior beyond parsing and classification,
//! making them usable in any context (core logic, presentation, persistence).
//!
//! # Grid Coordinates
//!
//! Positions are `(row, column)` pairs:
//!
//! - **Row**: 0 is the top row, gravity pulls pieces towards `rows - 1`
//! - **Column**: 0 is the leftmost column
//!
//! # Game Modes
//!
//! | Mode | Plain pieces |
//! |------|--------------|
//! | `test` | dragon, frog, newt |
//! | `easy` | + snake |
//! | `normal` | + spider |
//! | `hard` | + yeti |
//!
//! Every mode additionally knows the four special pieces: blast, row, column, colour.
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `PLAIN_PIECE_POINTS` | 10 | Base value of a popped plain piece |
//! | `SPECIAL_PIECE_POINTS` | 30 | Base value of a popped special piece |
//! | `AVERAGE_POINTS_PER_SECOND` | 25 | Reference pace used for grading |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of rows in a session
pub const DEFAULT_ROWS: u8 = 9;

/// Default number of columns in a session
pub const DEFAULT_COLUMNS: u8 = 7;

/// Default presentation tile size, in pixels (ignored by the core)
pub const DEFAULT_TILE_SIZE: u32 = 50;

/// Default session duration, in seconds
pub const DEFAULT_DURATION_SECS: u32 = 60;

/// Largest accepted row or column count
pub const MAX_GRID_DIM: u8 = 64;

/// Minimum run length that counts as a match
pub const MIN_MATCH_LEN: usize = 3;

/// Radius of the blast special (Chebyshev distance)
pub const BLAST_RADIUS: i16 = 1;

/// Points for each popped plain piece, before the combo multiplier
pub const PLAIN_PIECE_POINTS: u32 = 10;

/// Points for each popped special piece, before the combo multiplier
pub const SPECIAL_PIECE_POINTS: u32 = 30;

/// Reference scoring pace; a session matching it exactly sits on the A/B boundary
pub const AVERAGE_POINTS_PER_SECOND: u32 = 25;

/// Suggested host frame interval, in milliseconds
pub const TICK_MS: u32 = 16;

/// Gameplay modes, each selecting a subset of plain piece types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Test,
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Mode {
    /// All modes, easiest first
    pub const ALL: [Mode; 4] = [Mode::Test, Mode::Easy, Mode::Normal, Mode::Hard];

    /// Parse mode from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::Mode;
    ///
    /// assert_eq!(Mode::from_str("easy"), Some(Mode::Easy));
    /// assert_eq!(Mode::from_str("HARD"), Some(Mode::Hard));
    /// assert_eq!(Mode::from_str("insane"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "test" => Some(Mode::Test),
            "easy" => Some(Mode::Easy),
            "normal" => Some(Mode::Normal),
            "hard" => Some(Mode::Hard),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Test => "test",
            Mode::Easy => "easy",
            Mode::Normal => "normal",
            Mode::Hard => "hard",
        }
    }

    /// Plain piece types dealt in this mode
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::{Mode, PieceType};
    ///
    /// assert_eq!(Mode::Test.plain_types().len(), 3);
    /// assert!(Mode::Hard.plain_types().contains(&PieceType::Yeti));
    /// ```
    pub fn plain_types(&self) -> &'static [PieceType] {
        let count = match self {
            Mode::Test => 3,
            Mode::Easy => 4,
            Mode::Normal => 5,
            Mode::Hard => 6,
        };
        &PieceType::PLAIN[..count]
    }

    /// Every piece type that may appear on the board in this mode,
    /// plain types first followed by the special set
    pub fn piece_types(&self) -> Vec<PieceType> {
        let mut types = self.plain_types().to_vec();
        types.extend_from_slice(&PieceType::SPECIAL);
        types
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every kind of piece that can occupy a cell
///
/// The first six variants are plain colors; the last four are special pieces
/// with an area effect when popped:
/// - **Blast**: clears the surrounding 3x3 neighborhood
/// - **Row**: clears its whole row
/// - **Column**: clears its whole column
/// - **Colour**: clears every piece sharing the type of an adjacent plain piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Dragon,
    Frog,
    Newt,
    Snake,
    Spider,
    Yeti,
    Blast,
    Row,
    Column,
    Colour,
}

impl PieceType {
    /// Plain types, in the order modes unlock them
    pub const PLAIN: [PieceType; 6] = [
        PieceType::Dragon,
        PieceType::Frog,
        PieceType::Newt,
        PieceType::Snake,
        PieceType::Spider,
        PieceType::Yeti,
    ];

    /// Special types, available in every mode
    pub const SPECIAL: [PieceType; 4] = [
        PieceType::Blast,
        PieceType::Row,
        PieceType::Column,
        PieceType::Colour,
    ];

    /// Check whether this is one of the special (area effect) types
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::PieceType;
    ///
    /// assert!(PieceType::Blast.is_special());
    /// assert!(!PieceType::Frog.is_special());
    /// ```
    pub fn is_special(&self) -> bool {
        matches!(
            self,
            PieceType::Blast | PieceType::Row | PieceType::Column | PieceType::Colour
        )
    }

    /// Base score value of this piece when popped
    pub fn base_value(&self) -> u32 {
        if self.is_special() {
            SPECIAL_PIECE_POINTS
        } else {
            PLAIN_PIECE_POINTS
        }
    }

    /// Parse piece type from its asset-style name (`piece-frog`, `special-row`)
    /// or its short name (`frog`, `row`)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let name = lower
            .strip_prefix("piece-")
            .or_else(|| lower.strip_prefix("special-"))
            .unwrap_or(&lower);
        match name {
            "dragon" => Some(PieceType::Dragon),
            "frog" => Some(PieceType::Frog),
            "newt" => Some(PieceType::Newt),
            "snake" => Some(PieceType::Snake),
            "spider" => Some(PieceType::Spider),
            "yeti" => Some(PieceType::Yeti),
            "blast" => Some(PieceType::Blast),
            "row" => Some(PieceType::Row),
            "column" => Some(PieceType::Column),
            "colour" | "color" => Some(PieceType::Colour),
            _ => None,
        }
    }

    /// Asset-style name, as presentation layers key their textures
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceType::Dragon => "piece-dragon",
            PieceType::Frog => "piece-frog",
            PieceType::Newt => "piece-newt",
            PieceType::Snake => "piece-snake",
            PieceType::Spider => "piece-spider",
            PieceType::Yeti => "piece-yeti",
            PieceType::Blast => "special-blast",
            PieceType::Row => "special-row",
            PieceType::Column => "special-column",
            PieceType::Colour => "special-colour",
        }
    }

    /// Single-character glyph, used by board dumps in logs and tests
    pub fn glyph(&self) -> char {
        match self {
            PieceType::Dragon => 'D',
            PieceType::Frog => 'F',
            PieceType::Newt => 'N',
            PieceType::Snake => 'S',
            PieceType::Spider => 'P',
            PieceType::Yeti => 'Y',
            PieceType::Blast => '*',
            PieceType::Row => '-',
            PieceType::Column => '|',
            PieceType::Colour => '@',
        }
    }

    /// Inverse of [`PieceType::glyph`]
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            'D' => Some(PieceType::Dragon),
            'F' => Some(PieceType::Frog),
            'N' => Some(PieceType::Newt),
            'S' => Some(PieceType::Snake),
            'P' => Some(PieceType::Spider),
            'Y' => Some(PieceType::Yeti),
            '*' => Some(PieceType::Blast),
            '-' => Some(PieceType::Row),
            '|' => Some(PieceType::Column),
            '@' => Some(PieceType::Colour),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A grid coordinate
///
/// Signed so that neighbor arithmetic can step off the grid; the board
/// decides whether a position is in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i16,
    pub column: i16,
}

impl Position {
    pub const fn new(row: i16, column: i16) -> Self {
        Self { row, column }
    }

    /// Offset this position by a row/column delta
    pub const fn offset(&self, d_row: i16, d_column: i16) -> Self {
        Self {
            row: self.row + d_row,
            column: self.column + d_column,
        }
    }

    /// Check orthogonal adjacency (exactly one step along one axis)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::Position;
    ///
    /// let p = Position::new(2, 2);
    /// assert!(p.is_adjacent(Position::new(2, 3)));
    /// assert!(p.is_adjacent(Position::new(1, 2)));
    /// assert!(!p.is_adjacent(Position::new(3, 3)));
    /// assert!(!p.is_adjacent(p));
    /// ```
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.manhattan(other) == 1
    }

    /// Manhattan distance between two positions
    pub fn manhattan(&self, other: Position) -> u32 {
        (self.row - other.row).unsigned_abs() as u32
            + (self.column - other.column).unsigned_abs() as u32
    }

    /// The four orthogonal neighbors, in up/right/down/left order
    pub fn neighbors(&self) -> [Position; 4] {
        [
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(1, 0),
            self.offset(0, -1),
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A cell on the board
///
/// - `None`: Empty cell (only transiently, while a resolution cycle runs)
/// - `Some(PieceType)`: Cell occupied by a piece of that type
pub type Cell = Option<PieceType>;

/// Session grade, derived from score relative to the reference pace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Grade {
    #[default]
    D,
    C,
    B,
    A,
}

impl Grade {
    /// Numeric grade, 0 (D) to 3 (A)
    pub fn as_u8(&self) -> u8 {
        match self {
            Grade::D => 0,
            Grade::C => 1,
            Grade::B => 2,
            Grade::A => 3,
        }
    }

    /// Letter representation
    pub fn letter(&self) -> char {
        match self {
            Grade::D => 'D',
            Grade::C => 'C',
            Grade::B => 'B',
            Grade::A => 'A',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip_names() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_str(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn test_mode_piece_sets_grow_with_difficulty() {
        let sizes: Vec<usize> = Mode::ALL.iter().map(|m| m.plain_types().len()).collect();
        assert_eq!(sizes, vec![3, 4, 5, 6]);
        for mode in Mode::ALL {
            assert!(mode.plain_types().iter().all(|t| !t.is_special()));
            assert_eq!(mode.piece_types().len(), mode.plain_types().len() + 4);
        }
    }

    #[test]
    fn test_piece_type_names() {
        assert_eq!(PieceType::from_str("piece-dragon"), Some(PieceType::Dragon));
        assert_eq!(PieceType::from_str("special-colour"), Some(PieceType::Colour));
        assert_eq!(PieceType::from_str("color"), Some(PieceType::Colour));
        assert_eq!(PieceType::from_str("goblin"), None);
        for t in PieceType::PLAIN.iter().chain(PieceType::SPECIAL.iter()) {
            assert_eq!(PieceType::from_str(t.as_str()), Some(*t));
            assert_eq!(PieceType::from_glyph(t.glyph()), Some(*t));
        }
    }

    #[test]
    fn test_base_values() {
        assert_eq!(PieceType::Frog.base_value(), PLAIN_PIECE_POINTS);
        assert_eq!(PieceType::Row.base_value(), SPECIAL_PIECE_POINTS);
    }

    #[test]
    fn test_position_neighbors() {
        let p = Position::new(0, 0);
        let n = p.neighbors();
        assert_eq!(n[0], Position::new(-1, 0));
        assert_eq!(n[1], Position::new(0, 1));
        assert_eq!(n[2], Position::new(1, 0));
        assert_eq!(n[3], Position::new(0, -1));
        assert!(n.iter().all(|q| q.is_adjacent(p)));
    }

    #[test]
    fn test_grade_ordering() {
        assert!(Grade::A > Grade::B);
        assert!(Grade::C > Grade::D);
        assert_eq!(Grade::A.as_u8(), 3);
        assert_eq!(Grade::default().letter(), 'D');
    }
}
