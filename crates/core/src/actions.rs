//! Actions module - gatekeeps player swaps
//!
//! A swap is committed when it produces a match, moves a special piece, or the
//! session allows free moves. Anything else is rejected and leaves the board
//! untouched; the rejection is reported through a `Move` event, never an error.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::board::Board;
use crate::events::{Event, EventSink};
use crate::types::Position;

/// A requested swap and whether it was committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub valid: bool,
}

/// Result of a swap attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub mv: Move,
    /// Special pieces moved by the swap, at their new positions; they fire in
    /// the first pass of the resolution cycle
    pub triggers: ArrayVec<Position, 2>,
}

impl SwapOutcome {
    fn rejected(from: Position, to: Position) -> Self {
        Self {
            mv: Move {
                from,
                to,
                valid: false,
            },
            triggers: ArrayVec::new(),
        }
    }
}

/// Validates and commits player swaps
#[derive(Debug, Clone, Copy, Default)]
pub struct Actions {
    free_moves: bool,
}

impl Actions {
    pub fn new(free_moves: bool) -> Self {
        Self { free_moves }
    }

    pub fn setup(&mut self, free_moves: bool) {
        self.free_moves = free_moves;
    }

    pub fn free_moves(&self) -> bool {
        self.free_moves
    }

    /// Try to swap `from` and `to`.
    ///
    /// `accepting` is false while the session is not playing, is paused, or a
    /// resolution cycle is still running; the move is then rejected outright.
    /// Emits exactly one `Move` event.
    pub fn try_swap(
        &self,
        board: &mut Board,
        sink: &mut dyn EventSink,
        from: Position,
        to: Position,
        accepting: bool,
    ) -> SwapOutcome {
        let outcome = self.evaluate(board, from, to, accepting);
        sink.emit(Event::Move {
            from,
            to,
            valid: outcome.mv.valid,
        });
        if outcome.mv.valid {
            tracing::debug!(%from, %to, triggers = outcome.triggers.len(), "swap committed");
        } else {
            tracing::trace!(%from, %to, "swap rejected");
        }
        outcome
    }

    fn evaluate(&self, board: &mut Board, from: Position, to: Position, accepting: bool) -> SwapOutcome {
        if !accepting || !from.is_adjacent(to) {
            return SwapOutcome::rejected(from, to);
        }
        let (Some(Some(_)), Some(Some(_))) = (board.try_get(from), board.try_get(to)) else {
            return SwapOutcome::rejected(from, to);
        };
        if board.swap(from, to).is_err() {
            return SwapOutcome::rejected(from, to);
        }

        // After the swap each special sits at the other cell.
        let mut triggers = ArrayVec::new();
        for pos in [to, from] {
            if board.get(pos).is_some_and(|t| t.is_special()) {
                triggers.push(pos);
            }
        }

        if !self.free_moves && triggers.is_empty() && !board.has_any_match() {
            // Revert; swap is an involution on adjacent cells.
            let _ = board.swap(from, to);
            return SwapOutcome::rejected(from, to);
        }

        SwapOutcome {
            mv: Move {
                from,
                to,
                valid: true,
            },
            triggers,
        }
    }
}
