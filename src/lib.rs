//! TUI Match-3 (workspace facade crate).
//!
//! Exposes `tui_match3::{core,engine,types}` while the implementation lives in
//! dedicated crates under `crates/`.

pub use tui_match3_core as core;
pub use tui_match3_engine as engine;
pub use tui_match3_types as types;
