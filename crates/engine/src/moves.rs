//! Move search over a board snapshot

use arrayvec::ArrayVec;

use tui_match3_core::board::Board;
use tui_match3_core::special;
use tui_match3_core::types::Position;

/// An adjacent swap that strict rules would accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub from: Position,
    pub to: Position,
    /// Cells the swap would clear right away: matched cells plus the area of
    /// any special piece it moves
    pub gain: usize,
}

/// Every swap that creates a match or moves a special piece, in row-major
/// order of `from` (right neighbor before the one below).
pub fn possible_moves(board: &Board) -> Vec<Candidate> {
    let mut scratch = board.clone();
    let mut out = Vec::new();

    for from in board.positions() {
        for to in forward_neighbors(board, from) {
            if let Some(gain) = evaluate(&mut scratch, from, to) {
                out.push(Candidate { from, to, gain });
            }
        }
    }

    out
}

/// True if at least one strict-valid swap exists
pub fn has_possible_move(board: &Board) -> bool {
    let mut scratch = board.clone();
    board.positions().any(|from| {
        forward_neighbors(board, from)
            .into_iter()
            .any(|to| evaluate(&mut scratch, from, to).is_some())
    })
}

/// Right and down neighbors; each unordered pair is visited once
fn forward_neighbors(board: &Board, pos: Position) -> ArrayVec<Position, 2> {
    [pos.offset(0, 1), pos.offset(1, 0)]
        .into_iter()
        .filter(|&p| board.contains(p))
        .collect()
}

/// Swap on the scratch board, measure, and swap back
fn evaluate(scratch: &mut Board, from: Position, to: Position) -> Option<usize> {
    if scratch.get(from).is_none() || scratch.get(to).is_none() {
        return None;
    }
    scratch.swap(from, to).ok()?;

    let mut gain: usize = scratch.find_matches().iter().map(|m| m.len()).sum();
    let mut moved_special = false;
    for (pos, partner) in [(to, from), (from, to)] {
        if let Some(kind) = scratch.get(pos).filter(|t| t.is_special()) {
            moved_special = true;
            gain += 1 + special::effect_area(scratch, pos, kind, Some(partner)).len();
        }
    }

    let _ = scratch.swap(from, to);
    (gain > 0 || moved_special).then_some(gain)
}
