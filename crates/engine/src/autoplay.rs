//! Autoplay module - a greedy player for headless sessions
//!
//! The autoplayer only ever plays through [`Session::try_swap`], so it obeys
//! the same rules as a human host. Refusals come back as [`AutoplayError`]
//! values with a stable `code()`.

use tui_match3_core::{Move, ProcessState, Session};

use crate::moves::{possible_moves, Candidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayError {
    NotPlaying,
    Busy,
    NoMove,
    Rejected,
}

impl AutoplayError {
    pub fn code(self) -> &'static str {
        match self {
            AutoplayError::NotPlaying | AutoplayError::Busy => "not_ready",
            AutoplayError::NoMove => "no_move",
            AutoplayError::Rejected => "rejected",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AutoplayError::NotPlaying => "session is not playing",
            AutoplayError::Busy => "resolution cycle still running",
            AutoplayError::NoMove => "no valid swap on the board",
            AutoplayError::Rejected => "session rejected the chosen swap",
        }
    }
}

/// Greedy player: always takes the swap that clears the most cells right away
#[derive(Debug, Clone, Default)]
pub struct Autoplayer {
    played: u32,
}

impl Autoplayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps committed so far
    pub fn played(&self) -> u32 {
        self.played
    }

    /// Highest-gain candidate; ties go to the first in row-major order
    pub fn best_move(session: &Session) -> Option<Candidate> {
        possible_moves(session.board())
            .into_iter()
            .fold(None, |best: Option<Candidate>, c| match best {
                Some(b) if b.gain >= c.gain => Some(b),
                _ => Some(c),
            })
    }

    /// Pick and play one swap
    pub fn play(&mut self, session: &mut Session) -> Result<Move, AutoplayError> {
        if !session.is_playing() || session.is_paused() {
            return Err(AutoplayError::NotPlaying);
        }
        if session.process_state() != ProcessState::Idle {
            return Err(AutoplayError::Busy);
        }

        let Some(candidate) = Self::best_move(session) else {
            tracing::debug!("autoplayer found no move");
            return Err(AutoplayError::NoMove);
        };

        let mv = session.try_swap(candidate.from, candidate.to);
        if !mv.valid {
            return Err(AutoplayError::Rejected);
        }
        self.played += 1;
        tracing::debug!(from = %mv.from, to = %mv.to, gain = candidate.gain, "autoplayer swap");
        Ok(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_match3_core::{Board, Config, Mode, Position};

    fn session_with(rows: &[&str]) -> Session {
        let board = Board::from_rows(rows).unwrap();
        let config = Config {
            rows: board.rows(),
            columns: board.columns(),
            mode: Mode::Test,
            ..Config::default()
        };
        let mut session = Session::new(5);
        session.setup_with_board(config, board).unwrap();
        session
    }

    #[test]
    fn test_play_rejected_when_not_started() {
        let mut session = session_with(&["DFN", "FDN", "DNF"]);
        let err = Autoplayer::new().play(&mut session).unwrap_err();
        assert_eq!(err, AutoplayError::NotPlaying);
        assert_eq!(err.code(), "not_ready");
    }

    #[test]
    fn test_play_commits_best_swap() {
        let mut session = session_with(&["DFN", "FDN", "DNF"]);
        session.start();
        let mut player = Autoplayer::new();
        let mv = player.play(&mut session).unwrap();
        assert!(mv.valid);
        assert_eq!(player.played(), 1);
        assert!(session.stats().pops >= 3);
    }

    #[test]
    fn test_best_move_prefers_larger_gain() {
        // (0,2)/(1,2) lines up four dragons; every other swap makes three.
        let session = session_with(&["DDFD", "FNDN", "NFNF"]);
        let best = Autoplayer::best_move(&session).unwrap();
        assert_eq!(best.gain, 4);
        assert_eq!((best.from, best.to), (Position::new(0, 2), Position::new(1, 2)));
    }

    #[test]
    fn test_no_move_on_dead_board() {
        let mut session = session_with(&["DF", "ND"]);
        session.start();
        assert_eq!(
            Autoplayer::new().play(&mut session),
            Err(AutoplayError::NoMove)
        );
    }
}
