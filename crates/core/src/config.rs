//! Session configuration
//!
//! A [`Config`] is produced once per session setup and never mutated during
//! play. It is validated before any board is allocated, so a malformed value is
//! reported at setup instead of surfacing mid-game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    Mode, PieceType, DEFAULT_COLUMNS, DEFAULT_DURATION_SECS, DEFAULT_ROWS, DEFAULT_TILE_SIZE,
    MAX_GRID_DIM,
};

/// Reasons a configuration is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be between 1 and {max}, got {value}")]
    InvalidDimension {
        field: &'static str,
        value: u32,
        max: u8,
    },
    #[error("duration must be greater than zero")]
    ZeroDuration,
    #[error("tile size must be greater than zero")]
    ZeroTileSize,
    #[error("unknown game mode: {0}")]
    UnknownMode(String),
    #[error("invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("board is {rows}x{columns}, config expects {expected_rows}x{expected_columns}")]
    BoardShape {
        rows: u8,
        columns: u8,
        expected_rows: u8,
        expected_columns: u8,
    },
    #[error("board has empty cells")]
    IncompleteBoard,
    #[error("board already holds a match")]
    BoardHasMatches,
}

/// Immutable session parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Number of rows in the grid
    pub rows: u8,
    /// Number of columns in the grid
    pub columns: u8,
    /// Size of each cell in pixels; presentation only
    pub tile_size: u32,
    /// Accept every adjacent swap, regardless of whether it creates a match
    pub free_moves: bool,
    /// Gameplay duration, in seconds
    pub duration: u32,
    /// Selects the plain piece set
    pub mode: Mode,
    /// Advance resolution cycles one state per [`crate::Session::step`] call
    /// instead of running them to completion inside `try_swap`
    pub step_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            tile_size: DEFAULT_TILE_SIZE,
            free_moves: false,
            duration: DEFAULT_DURATION_SECS,
            mode: Mode::Normal,
            step_mode: false,
        }
    }
}

impl Config {
    /// Check every field against its documented range
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimension("rows", self.rows)?;
        check_dimension("columns", self.columns)?;
        if self.duration == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        Ok(())
    }

    /// Build a config from `MATCH3_*` environment variables layered over the defaults.
    ///
    /// Recognized variables: `MATCH3_ROWS`, `MATCH3_COLUMNS`, `MATCH3_TILE_SIZE`,
    /// `MATCH3_FREE_MOVES`, `MATCH3_DURATION`, `MATCH3_MODE`, `MATCH3_STEP_MODE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a caller-supplied variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let var = |key: &'static str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(|s| (key, s))
        };

        if let Some((key, v)) = var("MATCH3_ROWS") {
            config.rows = parse_number(key, &v)?;
        }
        if let Some((key, v)) = var("MATCH3_COLUMNS") {
            config.columns = parse_number(key, &v)?;
        }
        if let Some((key, v)) = var("MATCH3_TILE_SIZE") {
            config.tile_size = parse_number(key, &v)?;
        }
        if let Some((key, v)) = var("MATCH3_FREE_MOVES") {
            config.free_moves = parse_flag(key, &v)?;
        }
        if let Some((key, v)) = var("MATCH3_DURATION") {
            config.duration = parse_number(key, &v)?;
        }
        if let Some((_, v)) = var("MATCH3_MODE") {
            config.mode = parse_mode(&v)?;
        }
        if let Some((key, v)) = var("MATCH3_STEP_MODE") {
            config.step_mode = parse_flag(key, &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Plain piece types dealt by this config
    pub fn plain_types(&self) -> &'static [PieceType] {
        self.mode.plain_types()
    }

    /// Session duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration) * 1000
    }
}

/// Parse a mode name, reporting unknown names as a config error
pub fn parse_mode(s: &str) -> Result<Mode, ConfigError> {
    Mode::from_str(s).ok_or_else(|| ConfigError::UnknownMode(s.to_string()))
}

fn check_dimension(field: &'static str, value: u8) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_GRID_DIM {
        return Err(ConfigError::InvalidDimension {
            field,
            value: u32::from(value),
            max: MAX_GRID_DIM,
        });
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.rows, 9);
        assert_eq!(config.columns, 7);
        assert_eq!(config.duration, 60);
        assert_eq!(config.mode, Mode::Normal);
        assert!(!config.free_moves);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_rows() {
        let config = Config {
            rows: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimension { field: "rows", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_columns() {
        let config = Config {
            columns: MAX_GRID_DIM + 1,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimension { field: "columns", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let config = Config {
            duration: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDuration));
    }

    #[test]
    fn test_from_lookup_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("MATCH3_ROWS", "3"),
            ("MATCH3_COLUMNS", "4"),
            ("MATCH3_MODE", "test"),
            ("MATCH3_FREE_MOVES", "true"),
            ("MATCH3_DURATION", "5"),
        ]))
        .unwrap();
        assert_eq!(config.rows, 3);
        assert_eq!(config.columns, 4);
        assert_eq!(config.mode, Mode::Test);
        assert!(config.free_moves);
        assert_eq!(config.duration_ms(), 5000);
    }

    #[test]
    fn test_from_lookup_unknown_mode() {
        let err = Config::from_lookup(lookup(&[("MATCH3_MODE", "nightmare")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownMode("nightmare".to_string()));
    }

    #[test]
    fn test_from_lookup_bad_number() {
        let err = Config::from_lookup(lookup(&[("MATCH3_ROWS", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "MATCH3_ROWS", .. }));
    }

    #[test]
    fn test_from_lookup_validates() {
        let err = Config::from_lookup(lookup(&[("MATCH3_DURATION", "0")])).unwrap_err();
        assert_eq!(err, ConfigError::ZeroDuration);
    }

    #[test]
    fn test_config_json_uses_camel_case_and_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"rows": 5, "freeMoves": true, "mode": "hard"}"#).unwrap();
        assert_eq!(config.rows, 5);
        assert_eq!(config.columns, DEFAULT_COLUMNS);
        assert!(config.free_moves);
        assert_eq!(config.mode, Mode::Hard);
    }
}
