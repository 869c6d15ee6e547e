/// Error types for the simulation core.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected game configuration. Raised once at startup, never mid-game.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{field}` must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("`{field}` must be a non-negative finite number, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be at most {max}, got {value}")]
    ArenaTooLarge {
        field: &'static str,
        value: f32,
        max: f32,
    },

    #[error("`player.max_lives` must be at least 1")]
    NoLives,

    #[error("level template `{template}` places {what} outside the arena at ({x}, {y})")]
    OutsideArena {
        template: String,
        what: &'static str,
        x: f32,
        y: f32,
    },
}

/// Failure of the key-value store backing the max score.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store {path} is not a valid key-value file: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("no level templates configured")]
    NoTemplates,
}
