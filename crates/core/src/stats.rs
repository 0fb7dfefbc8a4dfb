//! Stats module - score, counters and grade
//!
//! Scoring rules:
//! - Each pop is worth `base_value(piece) * combo`
//! - Plain pieces are worth 10, special pieces 30
//! - Grade compares the score against `AVERAGE_POINTS_PER_SECOND * duration`:
//!   above 100% is A, above 66% B, above 33% C, otherwise D

use serde::{Deserialize, Serialize};

use crate::events::{Event, PopEvent};
use crate::types::{Grade, AVERAGE_POINTS_PER_SECOND};

/// Gameplay stats of one session, as handed to persistence collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u32,
    /// Resolved match groups
    pub matches: u32,
    /// Individual pieces popped
    pub pops: u32,
    /// Special pieces popped
    pub specials: u32,
    pub grade: Grade,
}

/// Accumulates [`SessionStats`] from match and pop events
#[derive(Debug, Clone, Default)]
pub struct Stats {
    data: SessionStats,
    /// Session duration the grade is measured against
    duration_secs: u32,
}

impl Stats {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            data: SessionStats::default(),
            duration_secs,
        }
    }

    /// Change the grading reference and zero every counter
    pub fn setup(&mut self, duration_secs: u32) {
        self.duration_secs = duration_secs;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.data = SessionStats::default();
    }

    /// Update counters from a core event; other events are ignored
    pub fn observe(&mut self, event: &Event) {
        match event {
            Event::Match { matches, .. } => self.on_match(matches.len()),
            Event::Pop(pop) => self.on_pop(pop),
            _ => {}
        }
    }

    pub fn on_match(&mut self, groups: usize) {
        self.data.matches = self.data.matches.saturating_add(groups as u32);
    }

    pub fn on_pop(&mut self, pop: &PopEvent) {
        self.data.pops = self.data.pops.saturating_add(1);
        let points = pop.piece.base_value().saturating_mul(pop.combo.max(1));
        self.data.score = self.data.score.saturating_add(points);
        if pop.is_special {
            self.data.specials = self.data.specials.saturating_add(1);
        }
        self.data.grade = calculate_grade(self.data.score, self.duration_secs);
    }

    pub fn score(&self) -> u32 {
        self.data.score
    }

    pub fn grade(&self) -> Grade {
        self.data.grade
    }

    pub fn data(&self) -> SessionStats {
        self.data
    }
}

/// Grade a score against the reference pace over `duration_secs`
pub fn calculate_grade(score: u32, duration_secs: u32) -> Grade {
    let expected = u64::from(AVERAGE_POINTS_PER_SECOND) * u64::from(duration_secs.max(1));
    // Percentages, compared in integers to keep the step function exact.
    let performance = u64::from(score) * 100;
    if performance > expected * 100 {
        Grade::A
    } else if performance > expected * 66 {
        Grade::B
    } else if performance > expected * 33 {
        Grade::C
    } else {
        Grade::D
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceType, Position};

    fn pop(piece: PieceType, combo: u32) -> Event {
        Event::Pop(PopEvent {
            piece,
            position: Position::new(0, 0),
            combo,
            is_special: piece.is_special(),
            caused_by_special: false,
        })
    }

    #[test]
    fn test_pop_scoring_uses_combo() {
        let mut stats = Stats::new(60);
        stats.observe(&pop(PieceType::Frog, 1));
        stats.observe(&pop(PieceType::Frog, 3));
        assert_eq!(stats.score(), 10 + 30);
        assert_eq!(stats.data().pops, 2);
        assert_eq!(stats.data().specials, 0);
    }

    #[test]
    fn test_special_pop_counts() {
        let mut stats = Stats::new(60);
        stats.observe(&pop(PieceType::Blast, 2));
        assert_eq!(stats.score(), 60);
        assert_eq!(stats.data().specials, 1);
    }

    #[test]
    fn test_match_event_counts_groups() {
        let mut stats = Stats::new(60);
        stats.observe(&Event::Match {
            matches: vec![vec![Position::new(0, 0)], vec![Position::new(1, 1)]],
            combo: 1,
        });
        assert_eq!(stats.data().matches, 2);
        stats.observe(&Event::TimesUp);
        assert_eq!(stats.data().matches, 2);
    }

    #[test]
    fn test_grade_steps() {
        // 10 seconds at 25 points per second: 250 expected.
        assert_eq!(calculate_grade(0, 10), Grade::D);
        assert_eq!(calculate_grade(82, 10), Grade::D);
        assert_eq!(calculate_grade(83, 10), Grade::C);
        assert_eq!(calculate_grade(165, 10), Grade::C);
        assert_eq!(calculate_grade(166, 10), Grade::B);
        assert_eq!(calculate_grade(250, 10), Grade::B);
        assert_eq!(calculate_grade(251, 10), Grade::A);
    }

    #[test]
    fn test_grade_is_monotonic_in_score() {
        let mut last = Grade::D;
        for score in 0..3000 {
            let grade = calculate_grade(score, 60);
            assert!(grade >= last);
            last = grade;
        }
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let mut stats = Stats::new(1);
        stats.observe(&pop(PieceType::Colour, 5));
        assert_eq!(stats.grade(), Grade::A);
        stats.reset();
        assert_eq!(stats.data(), SessionStats::default());
    }

    #[test]
    fn test_stats_serialize() {
        let json = serde_json::to_string(&SessionStats {
            score: 120,
            matches: 3,
            pops: 9,
            specials: 1,
            grade: Grade::B,
        })
        .unwrap();
        let back: SessionStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.score, 120);
        assert_eq!(back.grade, Grade::B);
    }
}
