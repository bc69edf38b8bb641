//! Match Cascade - deterministic board core for an 8x8 tile-matching puzzle
//!
//! Core modules:
//! - `board`: Deterministic engine (matching, specials, gravity, blockers, cascades)
//! - `config`: Engine tuning and level configuration
//! - `error`: Typed errors for the fallible edges (layouts, config files)

pub mod board;
pub mod config;
pub mod error;

pub use board::{Engine, Grid, TurnResult, Variant};
pub use config::{EngineConfig, LevelConfig};
pub use error::{ConfigError, GridError};

/// Engine constants
pub mod consts {
    /// Board width and height
    pub const BOARD_SIZE: usize = 8;
    /// Shortest run that counts as a match
    pub const MIN_MATCH_LEN: usize = 3;
    /// Run length that arms a rocket
    pub const ROCKET_RUN_LEN: usize = 4;
    /// Bomb explosion reach from its center (5x5 block)
    pub const BOMB_RADIUS: usize = 2;

    /// Scoring: every matched tile
    pub const POINTS_PER_TILE: u64 = 10;
    /// Scoring: every tile beyond the third in one match
    pub const BONUS_PER_EXTRA_TILE: u64 = 5;

    /// Cascade rounds allowed in one turn before the turn is truncated
    pub const MAX_CASCADE_ROUNDS: u32 = 50;
    /// Shuffles tried before falling back to a fresh deal
    pub const MAX_RESHUFFLE_ATTEMPTS: u32 = 10;
    /// Fresh deals tried before accepting whatever comes out
    pub const MAX_REDEAL_ATTEMPTS: u32 = 100;
}
