//! Deterministic board engine
//!
//! All board logic lives here. Like any simulation core it stays pure and
//! deterministic:
//! - Seeded RNG only, passed in (never a global source)
//! - Stable iteration order (row-major, `BTreeMap` for blockers)
//! - No presentation, timing or storage concerns

pub mod blockers;
pub mod generate;
pub mod gravity;
pub mod grid;
pub mod matches;
pub mod moves;
pub mod shuffle;
pub mod specials;
pub mod turn;

#[cfg(test)]
pub(crate) mod fixtures;

pub use blockers::{Blocker, BlockerDelta, Blockers, apply_pressure, tally_pressure};
pub use generate::{create_valid_board, fill_without_matches};
pub use gravity::{GravityReport, TileFall, TileSpawn, drop_tiles};
pub use grid::{Cell, Coord, Grid, Move, Tile, TileKind, Variant};
pub use matches::{Axis, Match, find_matches, match_score};
pub use moves::{get_valid_moves, is_valid_move};
pub use shuffle::{check_if_game_impossible, rearrange_board, redeal, reshuffle_until_playable};
pub use specials::{Special, Trigger, bomb_area, detect_trigger, rocket_area};
pub use turn::{Engine, TileExit, TurnResult};
