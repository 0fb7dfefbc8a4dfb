//! Process module - the resolution state machine
//!
//! `Idle -> Detecting -> Resolving -> Collapsing -> Refilling -> Detecting -> ... -> Idle`
//!
//! Each call to [`Process::step`] performs exactly one transition, so a host
//! can let presentation animate between steps. [`Process::run`] steps until the
//! board is stable.
//!
//! Within one resolving step every position is popped at most once: a visited
//! set guards the pop queue, so chained special effects always terminate.

use std::collections::{HashSet, VecDeque};

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::actions::Move;
use crate::board::{Board, Match};
use crate::config::Config;
use crate::events::{Event, EventSink, PopEvent};
use crate::rng::SimpleRng;
use crate::special;
use crate::types::Position;

/// Where the resolution cycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProcessState {
    #[default]
    Idle,
    Detecting,
    Resolving,
    Collapsing,
    Refilling,
}

/// Pending pop: position, whether an area effect queued it, and the swap
/// partner for specials fired by the player
#[derive(Debug, Clone, Copy)]
struct QueuedPop {
    position: Position,
    caused_by_special: bool,
    partner: Option<Position>,
}

/// Runs detect/pop/collapse/refill passes until the board is stable
#[derive(Debug, Clone, Default)]
pub struct Process {
    state: ProcessState,
    /// Combo level of the current pass; 0 before the first match of a cycle
    combo: u32,
    paused: bool,
    /// The committed swap, used to anchor specials during the first pass only
    swap: Option<(Position, Position)>,
    /// Specials moved by the player, fired in the first pass
    triggers: ArrayVec<Position, 2>,
    pending: Vec<Match>,
}

impl Process {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == ProcessState::Idle
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Drop any in-flight cycle and return to `Idle` immediately
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Start a resolution cycle after a committed swap (or with `None` to
    /// resolve whatever the board currently holds).
    ///
    /// Returns false, doing nothing, if a cycle is already running.
    pub fn begin(
        &mut self,
        mv: Option<Move>,
        triggers: &[Position],
        sink: &mut dyn EventSink,
    ) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = ProcessState::Detecting;
        self.combo = 0;
        self.swap = mv.map(|m| (m.from, m.to));
        self.triggers = triggers.iter().copied().take(2).collect();
        self.pending.clear();
        sink.emit(Event::ProcessStart);
        true
    }

    /// Perform one transition. Does nothing while paused or idle.
    pub fn step(
        &mut self,
        board: &mut Board,
        config: &Config,
        rng: &mut SimpleRng,
        sink: &mut dyn EventSink,
    ) -> ProcessState {
        if self.paused {
            return self.state;
        }

        match self.state {
            ProcessState::Idle => {}
            ProcessState::Detecting => self.detect(board, sink),
            ProcessState::Resolving => {
                self.resolve(board, sink);
                self.state = ProcessState::Collapsing;
            }
            ProcessState::Collapsing => {
                board.collapse();
                self.state = ProcessState::Refilling;
            }
            ProcessState::Refilling => {
                board.refill(config, rng);
                self.swap = None;
                self.state = ProcessState::Detecting;
            }
        }

        self.state
    }

    /// Step until the cycle ends or the process is paused
    pub fn run(
        &mut self,
        board: &mut Board,
        config: &Config,
        rng: &mut SimpleRng,
        sink: &mut dyn EventSink,
    ) -> ProcessState {
        while !self.is_idle() && !self.paused {
            self.step(board, config, rng, sink);
        }
        self.state
    }

    fn detect(&mut self, board: &Board, sink: &mut dyn EventSink) {
        let matches = board.find_matches();

        if matches.is_empty() && self.triggers.is_empty() {
            tracing::debug!(combo = self.combo, "board stable");
            self.state = ProcessState::Idle;
            self.swap = None;
            sink.emit(Event::ProcessComplete { combo: self.combo });
            return;
        }

        self.combo += 1;
        tracing::debug!(
            combo = self.combo,
            groups = matches.len(),
            triggers = self.triggers.len(),
            "matches detected"
        );

        if !matches.is_empty() {
            sink.emit(Event::Match {
                matches: matches.iter().map(|m| m.positions.clone()).collect(),
                combo: self.combo,
            });
        }

        self.pending = matches;
        self.state = ProcessState::Resolving;
    }

    fn resolve(&mut self, board: &mut Board, sink: &mut dyn EventSink) {
        let combo = self.combo;
        let mut visited: HashSet<Position> = HashSet::new();
        let mut queue: VecDeque<QueuedPop> = VecDeque::new();

        // Player-moved specials fire first.
        for &pos in &self.triggers {
            let partner = self
                .swap
                .map(|(from, to)| if pos == to { from } else { to });
            if visited.insert(pos) {
                queue.push_back(QueuedPop {
                    position: pos,
                    caused_by_special: false,
                    partner,
                });
            }
        }
        self.triggers.clear();

        for m in std::mem::take(&mut self.pending) {
            match special::classify(&m) {
                Some(kind) => {
                    let anchor = special::anchor(&m, self.swap);
                    board.remove(&m.positions);
                    board.set(anchor, Some(kind));
                    // Merged members, including the new special, are out of
                    // reach for the rest of this pass.
                    visited.extend(m.positions.iter().copied());
                    tracing::debug!(piece = %kind, %anchor, combo, "special created");
                    sink.emit(Event::SpecialCreated {
                        piece: kind,
                        position: anchor,
                        combo,
                    });
                }
                None => {
                    for &pos in &m.positions {
                        if visited.insert(pos) {
                            queue.push_back(QueuedPop {
                                position: pos,
                                caused_by_special: false,
                                partner: None,
                            });
                        }
                    }
                }
            }
        }

        let mut popped = 0u32;
        while let Some(entry) = queue.pop_front() {
            let Some(piece) = board.get(entry.position) else {
                continue;
            };

            if piece.is_special() {
                for target in special::effect_area(board, entry.position, piece, entry.partner) {
                    if visited.insert(target) {
                        queue.push_back(QueuedPop {
                            position: target,
                            caused_by_special: true,
                            partner: None,
                        });
                    }
                }
            }

            board.set(entry.position, None);
            popped += 1;
            tracing::trace!(%piece, position = %entry.position, combo, "pop");
            sink.emit(Event::Pop(PopEvent {
                piece,
                position: entry.position,
                combo,
                is_special: piece.is_special(),
                caused_by_special: entry.caused_by_special,
            }));
        }

        tracing::debug!(combo, popped, "pass resolved");
    }
}
