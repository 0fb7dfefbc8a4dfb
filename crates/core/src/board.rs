//! Board module - manages the piece grid
//!
//! The board is a `rows x columns` grid where each cell holds a piece type or is
//! empty. Cells live in a flat row-major vector for cache locality.
//! Coordinates: (row, column); row 0 is the top, gravity pulls towards the
//! last row.
//!
//! The board knows nothing about scoring or special effects: it fills, swaps,
//! detects matches, removes, collapses and refills.

use std::fmt;

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::config::Config;
use crate::rng::SimpleRng;
use crate::types::{Cell, PieceType, Position, MAX_GRID_DIM, MIN_MATCH_LEN};

/// Board mutation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),
    #[error("positions {0} and {1} are not orthogonally adjacent")]
    NotAdjacent(Position, Position),
    #[error("board layout is empty")]
    EmptyLayout,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unknown piece glyph {0:?}")]
    UnknownGlyph(char),
    #[error("layout is {rows}x{columns}, at most {max}x{max} is supported")]
    TooLarge {
        rows: usize,
        columns: usize,
        max: u8,
    },
}

/// Axis of a straight run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A straight line of same-typed pieces of length >= 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    pub piece: PieceType,
    pub axis: Axis,
    pub start: Position,
    pub len: usize,
}

impl Run {
    /// Positions covered by this run, from `start` along the axis
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.len as i16).map(move |i| match self.axis {
            Axis::Horizontal => self.start.offset(0, i),
            Axis::Vertical => self.start.offset(i, 0),
        })
    }

    pub fn contains(&self, pos: Position) -> bool {
        let i = match self.axis {
            Axis::Horizontal if pos.row == self.start.row => pos.column - self.start.column,
            Axis::Vertical if pos.column == self.start.column => pos.row - self.start.row,
            _ => return false,
        };
        i >= 0 && (i as usize) < self.len
    }

    /// Cell in the middle of the run (the later one for even lengths)
    pub fn middle(&self) -> Position {
        let half = (self.len / 2) as i16;
        match self.axis {
            Axis::Horizontal => self.start.offset(0, half),
            Axis::Vertical => self.start.offset(half, 0),
        }
    }
}

/// A group of same-typed pieces cleared together
///
/// Overlapping runs (T, L, plus and longer chains of crossings) merge into a
/// single match; two matches never share a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub piece: PieceType,
    /// Member positions in row-major order, without duplicates
    pub positions: Vec<Position>,
    /// The straight runs that make up this group
    pub runs: Vec<Run>,
}

impl Match {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions.binary_search(&pos).is_ok()
    }

    /// Longest straight run in the group
    pub fn longest_run(&self) -> Option<&Run> {
        self.runs.iter().max_by_key(|r| r.len)
    }

    /// True when the group has runs on both axes (T, L or plus shapes)
    pub fn is_branching(&self) -> bool {
        let horizontal = self.runs.iter().any(|r| r.axis == Axis::Horizontal);
        let vertical = self.runs.iter().any(|r| r.axis == Axis::Vertical);
        horizontal && vertical
    }

    /// First position (row-major) shared by a horizontal and a vertical run
    pub fn intersection(&self) -> Option<Position> {
        self.positions.iter().copied().find(|&p| {
            let h = self
                .runs
                .iter()
                .any(|r| r.axis == Axis::Horizontal && r.contains(p));
            let v = self
                .runs
                .iter()
                .any(|r| r.axis == Axis::Vertical && r.contains(p));
            h && v
        })
    }
}

/// The game board, `rows x columns` cells in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: u8,
    columns: u8,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(rows: u8, columns: u8) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; rows as usize * columns as usize],
        }
    }

    /// Build a board from glyph rows (`D`, `F`, `N`, ... and `.` for empty).
    ///
    /// ```
    /// use tui_match3_core::Board;
    ///
    /// let board = Board::from_rows(&["DFN", "FDN", "DNF"]).unwrap();
    /// assert_eq!(board.rows(), 3);
    /// assert!(!board.has_any_match());
    /// ```
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let expected = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if expected == 0 {
            return Err(BoardError::EmptyLayout);
        }
        let max = usize::from(MAX_GRID_DIM);
        if rows.len() > max || expected > max {
            return Err(BoardError::TooLarge {
                rows: rows.len(),
                columns: expected,
                max: MAX_GRID_DIM,
            });
        }

        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(BoardError::RaggedRow {
                    row,
                    found,
                    expected,
                });
            }
            for c in line.chars() {
                let cell = match c {
                    '.' => None,
                    _ => Some(PieceType::from_glyph(c).ok_or(BoardError::UnknownGlyph(c))?),
                };
                cells.push(cell);
            }
        }

        Ok(Self {
            rows: rows.len() as u8,
            columns: expected as u8,
            cells,
        })
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row < 0
            || pos.column < 0
            || pos.row >= self.rows as i16
            || pos.column >= self.columns as i16
        {
            return None;
        }
        Some(pos.row as usize * self.columns as usize + pos.column as usize)
    }

    #[inline(always)]
    fn expect_index(&self, pos: Position) -> usize {
        match self.index(pos) {
            Some(idx) => idx,
            None => panic!(
                "position {} outside {}x{} board",
                pos, self.rows, self.columns
            ),
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Check if a position lies on the board
    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Get the cell at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the board.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.expect_index(pos)]
    }

    /// Get the cell at `pos`, or `None` if out of bounds
    pub fn try_get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Set the cell at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the board.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        let idx = self.expect_index(pos);
        self.cells[idx] = cell;
    }

    /// Exchange the contents of two orthogonally adjacent cells
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), BoardError> {
        let ia = self.index(a).ok_or(BoardError::OutOfBounds(a))?;
        let ib = self.index(b).ok_or(BoardError::OutOfBounds(b))?;
        if !a.is_adjacent(b) {
            return Err(BoardError::NotAdjacent(a, b));
        }
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Fill every cell for a new session without creating any match.
    ///
    /// Cells are filled row-major, so only the two cells to the left and the two
    /// above can complete a run; those types are excluded from the draw.
    pub fn setup(&mut self, config: &Config, rng: &mut SimpleRng) {
        *self = Self::new(config.rows, config.columns);
        let types = config.plain_types();

        for row in 0..self.rows as i16 {
            for column in 0..self.columns as i16 {
                let pos = Position::new(row, column);
                let mut excluded: ArrayVec<PieceType, 2> = ArrayVec::new();
                if let Some(t) = self.pair_type(pos.offset(0, -1), pos.offset(0, -2)) {
                    excluded.push(t);
                }
                if let Some(t) = self.pair_type(pos.offset(-1, 0), pos.offset(-2, 0)) {
                    excluded.push(t);
                }
                let piece = rng.pick_excluding(types, &excluded);
                self.set(pos, Some(piece));
            }
        }
    }

    /// Type shared by two in-bounds occupied cells, if they match
    fn pair_type(&self, a: Position, b: Position) -> Option<PieceType> {
        match (self.try_get(a), self.try_get(b)) {
            (Some(Some(ta)), Some(Some(tb))) if ta == tb => Some(ta),
            _ => None,
        }
    }

    /// Scan rows and columns for straight runs of 3+ same-typed plain pieces
    pub fn find_runs(&self) -> Vec<Run> {
        let mut runs = Vec::new();
        for row in 0..self.rows as i16 {
            self.scan_line(Position::new(row, 0), Axis::Horizontal, &mut runs);
        }
        for column in 0..self.columns as i16 {
            self.scan_line(Position::new(0, column), Axis::Vertical, &mut runs);
        }
        runs
    }

    fn scan_line(&self, start: Position, axis: Axis, out: &mut Vec<Run>) {
        let step = |p: Position| match axis {
            Axis::Horizontal => p.offset(0, 1),
            Axis::Vertical => p.offset(1, 0),
        };

        let mut run_start = start;
        let mut run_len = 0usize;
        let mut run_type: Cell = None;
        let mut pos = start;

        loop {
            let cell = self.try_get(pos);
            let current = match cell {
                Some(Some(t)) if !t.is_special() => Some(t),
                _ => None,
            };

            if current.is_some() && current == run_type {
                run_len += 1;
            } else {
                if let Some(piece) = run_type {
                    if run_len >= MIN_MATCH_LEN {
                        out.push(Run {
                            piece,
                            axis,
                            start: run_start,
                            len: run_len,
                        });
                    }
                }
                run_start = pos;
                run_len = 1;
                run_type = current;
            }

            if cell.is_none() {
                break;
            }
            pos = step(pos);
        }
    }

    /// Detect all matches on the current board.
    ///
    /// Runs sharing a cell merge into one group, so T, L and plus shapes come
    /// back as a single match. Groups are ordered by their first position.
    pub fn find_matches(&self) -> Vec<Match> {
        let runs = self.find_runs();
        if runs.is_empty() {
            return Vec::new();
        }

        // Union-find over runs, joined through the cells they cover.
        let mut parent: Vec<usize> = (0..runs.len()).collect();
        let mut owner: Vec<Option<usize>> = vec![None; self.cells.len()];

        fn root(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        for (i, run) in runs.iter().enumerate() {
            for pos in run.positions() {
                let idx = self.expect_index(pos);
                match owner[idx] {
                    Some(j) => {
                        let (ri, rj) = (root(&mut parent, i), root(&mut parent, j));
                        if ri != rj {
                            parent[ri.max(rj)] = ri.min(rj);
                        }
                    }
                    None => owner[idx] = Some(i),
                }
            }
        }

        let mut groups: Vec<(usize, Match)> = Vec::new();
        for (i, run) in runs.iter().enumerate() {
            let r = root(&mut parent, i);
            let slot = match groups.iter().position(|(id, _)| *id == r) {
                Some(slot) => slot,
                None => {
                    groups.push((
                        r,
                        Match {
                            piece: run.piece,
                            positions: Vec::new(),
                            runs: Vec::new(),
                        },
                    ));
                    groups.len() - 1
                }
            };
            let group = &mut groups[slot].1;
            group.positions.extend(run.positions());
            group.runs.push(*run);
        }

        let mut matches: Vec<Match> = groups
            .into_iter()
            .map(|(_, mut m)| {
                m.positions.sort();
                m.positions.dedup();
                m
            })
            .collect();
        matches.sort_by_key(|m| m.positions[0]);
        matches
    }

    /// True if the board currently holds at least one match
    pub fn has_any_match(&self) -> bool {
        !self.find_runs().is_empty()
    }

    /// Empty the given cells; returns how many held a piece
    pub fn remove(&mut self, positions: &[Position]) -> usize {
        let mut removed = 0;
        for &pos in positions {
            let idx = self.expect_index(pos);
            if self.cells[idx].take().is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Compact every column downwards, keeping relative order and leaving the
    /// empty cells at the top. Returns the number of pieces that moved.
    pub fn collapse(&mut self) -> usize {
        let rows = self.rows as i16;
        let mut moved = 0;

        for column in 0..self.columns as i16 {
            let mut write = rows - 1;
            for read in (0..rows).rev() {
                let from = Position::new(read, column);
                let Some(piece) = self.get(from) else {
                    continue;
                };
                if write != read {
                    self.set(Position::new(write, column), Some(piece));
                    self.set(from, None);
                    moved += 1;
                }
                write -= 1;
            }
        }

        moved
    }

    /// Fill every empty cell with a random plain piece. New matches are allowed;
    /// they feed the next cascade pass. Returns the filled positions.
    pub fn refill(&mut self, config: &Config, rng: &mut SimpleRng) -> Vec<Position> {
        let types = config.plain_types();
        let empty: Vec<Position> = self.positions().filter(|&p| self.get(p).is_none()).collect();
        for &pos in &empty {
            self.set(pos, Some(rng.pick(types)));
        }
        empty
    }

    /// Every position, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let columns = self.columns as i16;
        (0..self.rows as i16).flat_map(move |r| (0..columns).map(move |c| Position::new(r, c)))
    }

    /// Positions of one row, left to right
    pub fn row_positions(&self, row: i16) -> impl Iterator<Item = Position> {
        (0..self.columns as i16).map(move |c| Position::new(row, c))
    }

    /// Positions of one column, top to bottom
    pub fn column_positions(&self, column: i16) -> impl Iterator<Item = Position> {
        (0..self.rows as i16).map(move |r| Position::new(r, column))
    }

    /// In-bounds orthogonal neighbors, in up/right/down/left order
    pub fn neighbors(&self, pos: Position) -> ArrayVec<Position, 4> {
        pos.neighbors()
            .into_iter()
            .filter(|&p| self.contains(p))
            .collect()
    }

    /// True when no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Glyph rows, the inverse of [`Board::from_rows`]
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.columns.max(1) as usize)
            .map(|row| {
                row.iter()
                    .map(|c| c.map(|t| t.glyph()).unwrap_or('.'))
                    .collect()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
