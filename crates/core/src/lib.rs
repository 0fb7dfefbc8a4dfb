//! Core match-3 logic - pure, deterministic, and testable
//!
//! This crate holds every gameplay rule of a timed match-3 session: the grid,
//! swap validation, match detection, special pieces, the cascade process,
//! scoring and the session clock. It does no rendering, audio or I/O; a host
//! drives it with swaps and frame deltas and observes it through [`Event`]s.
//!
//! - **Deterministic**: the same seed and inputs produce the same session
//! - **Synchronous**: no internal threads or timers
//!
//! # Module Structure
//!
//! - [`board`]: the grid, run detection, match grouping, collapse and refill
//! - [`special`]: special piece shapes, anchors and area effects
//! - [`actions`]: swap validation and commit
//! - [`process`]: the detect/pop/collapse/refill state machine
//! - [`stats`]: score, counters and grade
//! - [`timer`]: the session clock
//! - [`events`]: events, listeners and the event bus
//! - [`config`]: session parameters and their validation
//! - [`session`]: the facade tying everything together
//!
//! # Game Rules
//!
//! | Rule | Value |
//! |------|-------|
//! | Default grid | 9 rows x 7 columns |
//! | Minimum match | 3 in a straight line |
//! | Plain pop | 10 x combo |
//! | Special pop | 30 x combo |
//! | Default duration | 60 s |
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{Config, Session};
//!
//! let mut session = Session::new(12345);
//! session.setup(Config::default()).unwrap();
//! session.start();
//!
//! // Advance the clock by one frame.
//! session.update(16);
//! assert!(session.is_playing());
//! assert!(!session.board().has_any_match());
//! ```

pub mod actions;
pub mod board;
pub mod config;
pub mod events;
pub mod process;
pub mod rng;
pub mod session;
pub mod special;
pub mod stats;
pub mod timer;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use actions::{Actions, Move, SwapOutcome};
pub use board::{Axis, Board, BoardError, Match, Run};
pub use config::{parse_mode, Config, ConfigError};
pub use events::{Event, EventBus, EventLog, EventSink, Listener, ListenerId, PopEvent};
pub use process::{Process, ProcessState};
pub use rng::SimpleRng;
pub use session::Session;
pub use stats::{calculate_grade, SessionStats, Stats};
pub use timer::Timer;
pub use types::{Cell, Grade, Mode, PieceType, Position};
