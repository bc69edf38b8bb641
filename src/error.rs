//! Errors for the fallible edges of the crate
//!
//! The engine itself never fails: illegal moves and dead boards are reported
//! through return values. Only text parsing and config loading can error.

use std::path::PathBuf;

use thiserror::Error;

/// A board layout could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("layout has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("layout row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { row: usize, col: usize, symbol: char },
}

/// A configuration file could not be read or understood
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON")]
    Json(#[from] serde_json::Error),
    #[error("invalid level layout")]
    Layout(#[from] GridError),
    #[error("blocker at row {row}, column {col} is off the board")]
    BlockerOutOfBounds { row: usize, col: usize },
    #[error("blocker at row {row}, column {col} has sand level 0")]
    ZeroSandLevel { row: usize, col: usize },
    #[error("layout cell at row {row}, column {col} is empty")]
    EmptyCell { row: usize, col: usize },
    #[error("layout cell at row {row}, column {col} is blocked but has no blocker")]
    UnbackedBlockedCell { row: usize, col: usize },
    #[error("layout already holds a match starting at row {row}, column {col}")]
    StandingMatch { row: usize, col: usize },
}
