//! Headless match-3 simulator (default binary).
//!
//! Reads the session config from `MATCH3_*` environment variables, lets the
//! greedy autoplayer play one seeded session on a fixed frame tick until the
//! timer runs out, then prints the final stats as JSON on stdout.
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see every event.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use tui_match3::core::{Config, Event, Listener, Session};
use tui_match3::engine::{AutoplayError, Autoplayer};
use tui_match3::types::TICK_MS;

/// Forwards core events to the log
struct TraceListener;

impl Listener for TraceListener {
    fn on_event(&mut self, event: &Event) {
        match event {
            Event::Pop(_) => tracing::trace!(?event, "event"),
            _ => tracing::debug!(?event, "event"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("invalid MATCH3_* configuration")?;
    let seed = match std::env::var("MATCH3_SEED") {
        Ok(v) => v
            .trim()
            .parse()
            .with_context(|| format!("invalid MATCH3_SEED: {v}"))?,
        Err(_) => 1,
    };

    let stats = run(config, seed)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn run(config: Config, seed: u32) -> Result<tui_match3::core::SessionStats> {
    let mut session = Session::new(seed);
    session.setup(config)?;
    session.subscribe(TraceListener);
    session.start();

    let mut player = Autoplayer::new();
    let mut stuck = false;

    while session.is_playing() {
        match player.play(&mut session) {
            Ok(_) => stuck = false,
            Err(AutoplayError::NoMove) => {
                if !stuck {
                    tracing::warn!("no valid swap left; waiting for the clock");
                }
                stuck = true;
            }
            Err(err) => {
                tracing::debug!(code = err.code(), "{}", err.message());
            }
        }
        // Step mode: advance the cycle once per frame.
        if session.config().step_mode {
            session.step();
        }
        session.update(u64::from(TICK_MS));
    }

    let stats = session.stats();
    tracing::info!(
        score = stats.score,
        pops = stats.pops,
        swaps = player.played(),
        grade = %stats.grade.letter(),
        "session finished"
    );
    Ok(stats)
}
