//! Session module - the host-facing facade
//!
//! A [`Session`] owns one board, its rng, timer, stats, swap rules and
//! resolution process, and fans every core event out to the stats first and
//! then to subscribed listeners.
//!
//! # Lifecycle
//!
//! ```text
//! new -> setup -> start -> (try_swap | update | pause/resume)* -> TimesUp / stop
//!          ^                                                        |
//!          +----------------------------- reset <--------------------+
//! ```
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{Config, Event, EventLog, Position, Session};
//!
//! let mut session = Session::new(12345);
//! session.setup(Config::default()).unwrap();
//! let log = EventLog::new();
//! session.subscribe(log.clone());
//! session.start();
//!
//! // Not adjacent: rejected, the board is untouched.
//! let mv = session.try_swap(Position::new(0, 0), Position::new(2, 2));
//! assert!(!mv.valid);
//! assert_eq!(log.events(), vec![Event::Move { from: mv.from, to: mv.to, valid: false }]);
//! ```

use crate::actions::{Actions, Move};
use crate::board::Board;
use crate::config::{Config, ConfigError};
use crate::events::{Event, EventBus, EventSink, Listener, ListenerId};
use crate::process::{Process, ProcessState};
use crate::rng::SimpleRng;
use crate::stats::{SessionStats, Stats};
use crate::timer::Timer;
use crate::types::Position;

/// Routes events to the stats, then to listeners
struct Dispatch<'a> {
    stats: &'a mut Stats,
    bus: &'a mut EventBus,
}

impl EventSink for Dispatch<'_> {
    fn emit(&mut self, event: Event) {
        self.stats.observe(&event);
        self.bus.dispatch(&event);
    }
}

/// One playable match-3 session
#[derive(Debug)]
pub struct Session {
    config: Config,
    /// False until a successful setup, and again after reset
    configured: bool,
    board: Board,
    rng: SimpleRng,
    actions: Actions,
    process: Process,
    stats: Stats,
    timer: Timer,
    bus: EventBus,
    playing: bool,
    paused: bool,
}

impl Session {
    /// Create an unconfigured session drawing pieces from `seed`
    pub fn new(seed: u32) -> Self {
        let config = Config::default();
        Self {
            actions: Actions::new(config.free_moves),
            stats: Stats::new(config.duration),
            config,
            configured: false,
            board: Board::default(),
            rng: SimpleRng::new(seed),
            process: Process::new(),
            timer: Timer::new(),
            bus: EventBus::new(),
            playing: false,
            paused: false,
        }
    }

    /// Validate `config`, then build a fresh match-free board for it.
    ///
    /// On error nothing is allocated and the session is left as it was.
    pub fn setup(&mut self, config: Config) -> Result<(), ConfigError> {
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "rejected session config");
            return Err(err);
        }
        self.apply(config);
        self.board.setup(&self.config, &mut self.rng);
        tracing::info!(
            rows = self.config.rows,
            columns = self.config.columns,
            mode = %self.config.mode,
            duration = self.config.duration,
            free_moves = self.config.free_moves,
            "session ready"
        );
        Ok(())
    }

    /// Like [`Session::setup`], but play on a caller-built board.
    ///
    /// The board must have the configured dimensions, be full and hold no match.
    pub fn setup_with_board(&mut self, config: Config, board: Board) -> Result<(), ConfigError> {
        config.validate()?;
        if board.rows() != config.rows || board.columns() != config.columns {
            return Err(ConfigError::BoardShape {
                rows: board.rows(),
                columns: board.columns(),
                expected_rows: config.rows,
                expected_columns: config.columns,
            });
        }
        if !board.is_full() {
            return Err(ConfigError::IncompleteBoard);
        }
        if board.has_any_match() {
            return Err(ConfigError::BoardHasMatches);
        }
        self.apply(config);
        self.board = board;
        tracing::info!(
            rows = self.config.rows,
            columns = self.config.columns,
            "session ready with preset board"
        );
        Ok(())
    }

    fn apply(&mut self, config: Config) {
        self.reset();
        self.actions.setup(config.free_moves);
        self.stats.setup(config.duration);
        self.timer.setup(config.duration_ms());
        self.config = config;
        self.configured = true;
    }

    /// Stop play and drop the board, stats and any running cycle.
    /// Listeners stay subscribed.
    pub fn reset(&mut self) {
        self.timer.reset();
        self.stats.reset();
        self.process.reset();
        self.board.clear();
        self.playing = false;
        self.paused = false;
        self.configured = false;
    }

    /// Begin accepting swaps and start the clock. Ignored before setup.
    ///
    /// A cycle left unfinished by an earlier `stop` is run to completion first,
    /// so play always starts on a stable board.
    pub fn start(&mut self) {
        if !self.configured {
            tracing::warn!("start ignored: session not set up");
            return;
        }
        self.paused = false;
        self.process.resume();
        if !self.process.is_idle() {
            tracing::debug!(state = ?self.process.state(), "finishing leftover cycle");
            self.run_process();
        }
        self.playing = true;
        self.timer.start();
        tracing::info!(duration_ms = self.timer.duration_ms(), "session started");
    }

    /// End play immediately without a `TimesUp` event
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.timer.stop();
        tracing::info!(score = self.stats.score(), "session stopped");
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze the clock and the resolution process
    pub fn pause(&mut self) {
        self.paused = true;
        self.timer.pause();
        self.process.pause();
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.timer.resume();
        self.process.resume();
        if !self.config.step_mode && !self.process.is_idle() {
            self.run_process();
        }
    }

    /// Advance the clock. Emits `TimesUp` and stops play when it expires.
    pub fn update(&mut self, delta_ms: u64) {
        if !self.playing || !self.timer.update(delta_ms) {
            return;
        }
        self.playing = false;
        tracing::info!(score = self.stats.score(), grade = %self.stats.grade().letter(), "time is up");
        let mut sink = Dispatch {
            stats: &mut self.stats,
            bus: &mut self.bus,
        };
        sink.emit(Event::TimesUp);
    }

    /// Request a swap between two cells.
    ///
    /// Emits one `Move` event. When committed, a resolution cycle starts; it
    /// runs to completion before returning unless the config asks for step mode.
    pub fn try_swap(&mut self, from: Position, to: Position) -> Move {
        let accepting = self.playing && !self.paused && self.process.is_idle();
        let mut sink = Dispatch {
            stats: &mut self.stats,
            bus: &mut self.bus,
        };
        let outcome = self
            .actions
            .try_swap(&mut self.board, &mut sink, from, to, accepting);

        if outcome.mv.valid {
            self.process
                .begin(Some(outcome.mv), &outcome.triggers, &mut sink);
            if !self.config.step_mode {
                self.run_process();
            }
        }
        outcome.mv
    }

    /// Advance a running cycle by one state; the host's hook for step mode
    pub fn step(&mut self) -> ProcessState {
        let mut sink = Dispatch {
            stats: &mut self.stats,
            bus: &mut self.bus,
        };
        self.process
            .step(&mut self.board, &self.config, &mut self.rng, &mut sink)
    }

    fn run_process(&mut self) -> ProcessState {
        let mut sink = Dispatch {
            stats: &mut self.stats,
            bus: &mut self.bus,
        };
        self.process
            .run(&mut self.board, &self.config, &mut self.rng, &mut sink)
    }

    pub fn subscribe<L: Listener + 'static>(&mut self, listener: L) -> ListenerId {
        self.bus.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.data()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn process_state(&self) -> ProcessState {
        self.process.state()
    }

    /// Combo level of the running (or last) cycle
    pub fn combo(&self) -> u32 {
        self.process.combo()
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }
}
