//! Special module - shape classification and area effects
//!
//! Shape precedence, checked in order:
//! - any straight run of 5 or more: **colour** clear
//! - runs on both axes (T, L, plus): **blast**
//! - a straight run of exactly 4: **row** clear when horizontal, **column** clear when vertical
//! - a run of 3: no special
//!
//! A group that forms a special is merged into it: the special appears at the
//! group's anchor and the other members leave the board without popping.

use crate::board::{Axis, Board, Match};
use crate::types::{PieceType, Position, BLAST_RADIUS};

/// Decide which special piece, if any, a match produces
pub fn classify(m: &Match) -> Option<PieceType> {
    let longest = m.longest_run()?;
    if longest.len >= 5 {
        Some(PieceType::Colour)
    } else if m.is_branching() {
        Some(PieceType::Blast)
    } else if longest.len == 4 {
        match longest.axis {
            Axis::Horizontal => Some(PieceType::Row),
            Axis::Vertical => Some(PieceType::Column),
        }
    } else {
        None
    }
}

/// Choose where a newly created special lands.
///
/// With a player move, the member closest to the move's destination wins,
/// then the one closest to its origin, then row-major order. Cascade matches
/// use the first crossing of a branching group or the middle of the longest run.
pub fn anchor(m: &Match, swap: Option<(Position, Position)>) -> Position {
    if let Some((from, to)) = swap {
        if let Some(best) = m
            .positions
            .iter()
            .copied()
            .min_by_key(|&p| (p.manhattan(to), p.manhattan(from), p))
        {
            return best;
        }
    }

    if m.is_branching() {
        if let Some(cross) = m.intersection() {
            return cross;
        }
    }

    m.longest_run()
        .map(|r| r.middle())
        .unwrap_or(m.positions[0])
}

/// Positions a special piece at `pos` clears when it pops, excluding itself.
///
/// Only occupied cells are returned. `partner` is the cell the special was
/// swapped with, if it was triggered by a player move; a colour clear prefers
/// that piece's type over its other neighbors.
pub fn effect_area(
    board: &Board,
    pos: Position,
    kind: PieceType,
    partner: Option<Position>,
) -> Vec<Position> {
    let occupied = |p: &Position| *p != pos && board.get(*p).is_some();

    match kind {
        PieceType::Row => board.row_positions(pos.row).filter(occupied).collect(),
        PieceType::Column => board.column_positions(pos.column).filter(occupied).collect(),
        PieceType::Blast => {
            let mut area = Vec::new();
            for d_row in -BLAST_RADIUS..=BLAST_RADIUS {
                for d_column in -BLAST_RADIUS..=BLAST_RADIUS {
                    let p = pos.offset(d_row, d_column);
                    if board.contains(p) && occupied(&p) {
                        area.push(p);
                    }
                }
            }
            area
        }
        PieceType::Colour => match colour_target(board, pos, partner) {
            Some(target) => board
                .positions()
                .filter(|p| *p != pos && board.get(*p) == Some(target))
                .collect(),
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Plain type a colour clear at `pos` targets
fn colour_target(board: &Board, pos: Position, partner: Option<Position>) -> Option<PieceType> {
    let plain = |p: Position| {
        board
            .try_get(p)
            .flatten()
            .filter(|t| !t.is_special())
    };

    partner
        .filter(|p| p.is_adjacent(pos))
        .and_then(plain)
        .or_else(|| board.neighbors(pos).into_iter().find_map(plain))
}
