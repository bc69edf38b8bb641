//! Engine tuning and level configuration
//!
//! Both are plain serde structs, read from JSON. The engine never looks a
//! level up on its own; callers load a `LevelConfig` and hand its pieces in.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{Blocker, Blockers, Cell, Coord, Engine, Grid, TileKind, Variant, find_matches};
use crate::consts::{
    BONUS_PER_EXTRA_TILE, MAX_CASCADE_ROUNDS, MAX_RESHUFFLE_ATTEMPTS, POINTS_PER_TILE,
};
use crate::error::ConfigError;

/// Engine tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cascade rounds per turn before the turn is cut short
    pub max_cascade_rounds: u32,
    /// Shuffles tried on a dead board before dealing fresh tiles
    pub max_reshuffle_attempts: u32,
    pub points_per_tile: u64,
    pub bonus_per_extra_tile: u64,
    /// Kind counted separately as the level objective
    pub collect_kind: Option<TileKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cascade_rounds: MAX_CASCADE_ROUNDS,
            max_reshuffle_attempts: MAX_RESHUFFLE_ATTEMPTS,
            points_per_tile: POINTS_PER_TILE,
            bonus_per_extra_tile: BONUS_PER_EXTRA_TILE,
            collect_kind: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = read(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded engine config from {}", path.as_ref().display());
        Ok(config)
    }
}

/// One level: palette variant, blockers and an optional fixed layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub variant: Variant,
    /// Seed to run the level with, if it wants a fixed one
    pub seed: Option<u64>,
    /// Fixed starting board, one string per row (see `Grid::from_rows`)
    pub layout: Option<Vec<String>>,
    pub blockers: Vec<Blocker>,
}

impl LevelConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = read(path.as_ref())?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level from {} ({:?}, {} blockers)",
            path.as_ref().display(),
            level.variant,
            level.blockers.len()
        );
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for blocker in &self.blockers {
            let (row, col) = (blocker.at.row, blocker.at.col);
            if !blocker.at.in_bounds() {
                return Err(ConfigError::BlockerOutOfBounds { row, col });
            }
            if blocker.sand_level == 0 {
                return Err(ConfigError::ZeroSandLevel { row, col });
            }
        }
        if let Some(layout) = &self.layout {
            self.layout_grid(layout)?;
        }
        Ok(())
    }

    /// Parse `layout` and check it is a board at rest once blockers are
    /// marked: every `#` backed by a blocker, no bare empty cell, no match
    fn layout_grid(&self, layout: &[String]) -> Result<Grid, ConfigError> {
        let mut grid = Grid::from_rows(layout)?;
        let blockers = self.blocker_overlay();
        for at in Coord::all() {
            let (row, col) = (at.row, at.col);
            match grid.cell(at) {
                Cell::Empty if !blockers.contains(at) => {
                    return Err(ConfigError::EmptyCell { row, col });
                }
                Cell::Blocked if !blockers.contains(at) => {
                    return Err(ConfigError::UnbackedBlockedCell { row, col });
                }
                _ => {}
            }
        }

        blockers.apply_to(&mut grid);
        if let Some(first) = find_matches(&grid).first().and_then(|m| m.cells.first()) {
            return Err(ConfigError::StandingMatch {
                row: first.row,
                col: first.col,
            });
        }
        Ok(grid)
    }

    /// The blocker overlay this level starts with
    pub fn blocker_overlay(&self) -> Blockers {
        self.blockers.iter().copied().collect()
    }

    /// The fixed layout if there is one, otherwise a fresh match-free deal
    pub fn initial_grid(&self, engine: &mut Engine) -> Result<Grid, ConfigError> {
        match &self.layout {
            Some(layout) => self.layout_grid(layout),
            None => Ok(engine.create_valid_board(&self.blocker_overlay(), self.variant)),
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
