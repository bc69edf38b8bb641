//! Sand blockers: obstacles worn down by matches next to them
//!
//! Each clear (a match or an explosion) that touches a blocker lands one
//! charge on it. An umbrella soaks up the first charge; after that the
//! blocker clears once it has taken `sand_level` charges. Charges persist
//! across turns for the whole level.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::gravity::random_kind;
use super::grid::{Cell, Coord, Grid, TileKind};

fn default_sand_level() -> u32 {
    1
}

/// One blocker on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocker {
    pub at: Coord,
    /// Charges needed to clear once the umbrella is gone
    #[serde(default = "default_sand_level")]
    pub sand_level: u32,
    #[serde(default)]
    pub has_umbrella: bool,
    /// Clearing reveals a treasure tile in place
    #[serde(default)]
    pub has_treasure: bool,
    /// Charges taken since the umbrella came off
    #[serde(default)]
    pub hits: u32,
}

impl Blocker {
    pub fn new(at: Coord) -> Self {
        Self {
            at,
            sand_level: default_sand_level(),
            has_umbrella: false,
            has_treasure: false,
            hits: 0,
        }
    }

    pub fn with_sand_level(mut self, sand_level: u32) -> Self {
        self.sand_level = sand_level.max(1);
        self
    }

    pub fn with_umbrella(mut self) -> Self {
        self.has_umbrella = true;
        self
    }

    pub fn with_treasure(mut self) -> Self {
        self.has_treasure = true;
        self
    }

    /// Take `charges` (at least one) and report whether the blocker is spent
    fn absorb(&mut self, charges: u32) -> bool {
        let mut charges = charges;
        if self.has_umbrella && charges > 0 {
            self.has_umbrella = false;
            charges -= 1;
        }
        self.hits += charges;
        !self.has_umbrella && self.hits >= self.sand_level
    }
}

/// The blocker overlay, keyed by coordinate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Blocker>", into = "Vec<Blocker>")]
pub struct Blockers {
    by_coord: BTreeMap<Coord, Blocker>,
}

impl From<Vec<Blocker>> for Blockers {
    fn from(list: Vec<Blocker>) -> Self {
        list.into_iter().collect()
    }
}

impl From<Blockers> for Vec<Blocker> {
    fn from(blockers: Blockers) -> Self {
        blockers.by_coord.into_values().collect()
    }
}

impl FromIterator<Blocker> for Blockers {
    fn from_iter<I: IntoIterator<Item = Blocker>>(iter: I) -> Self {
        Self {
            by_coord: iter.into_iter().map(|b| (b.at, b)).collect(),
        }
    }
}

impl Blockers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, blocker: Blocker) {
        self.by_coord.insert(blocker.at, blocker);
    }

    pub fn get(&self, at: Coord) -> Option<&Blocker> {
        self.by_coord.get(&at)
    }

    pub fn contains(&self, at: Coord) -> bool {
        self.by_coord.contains_key(&at)
    }

    pub fn len(&self) -> usize {
        self.by_coord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_coord.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Blocker> {
        self.by_coord.values()
    }

    /// Make the grid's `Blocked` marks agree with this overlay. A tile found
    /// under a blocker is dropped; a stale mark with no blocker becomes empty.
    pub fn apply_to(&self, grid: &mut Grid) {
        for at in Coord::all() {
            let cell = grid.cell(at);
            if self.contains(at) {
                if let Some(tile) = cell.tile() {
                    log::warn!("Tile {} at {} sits under a blocker, removing it", tile.id, at);
                }
                grid.set(at, Cell::Blocked);
            } else if cell.is_blocked() {
                grid.set(at, Cell::Empty);
            }
        }
    }
}

/// What one round of matches did to one blocker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockerDelta {
    pub at: Coord,
    /// Clears that touched the blocker this round
    pub pressure: u32,
    pub umbrella_removed: bool,
    /// Charges taken since the umbrella came off, after this round
    pub hits: u32,
    pub cleared: bool,
    /// Treasure revealed by clearing
    pub treasure: Option<TileKind>,
}

/// Per blocker, how many distinct groups touched it. A group touches a
/// blocker when one of its cells is the blocker or an orthogonal neighbour.
pub fn tally_pressure(blockers: &Blockers, groups: &[Vec<Coord>]) -> BTreeMap<Coord, u32> {
    let mut pressure = BTreeMap::new();
    for group in groups {
        let touched: BTreeSet<Coord> = group
            .iter()
            .flat_map(|&cell| std::iter::once(cell).chain(cell.neighbors()))
            .filter(|&at| blockers.contains(at))
            .collect();
        for at in touched {
            *pressure.entry(at).or_insert(0) += 1;
        }
    }
    pressure
}

/// Land this round's charges. Cleared blockers leave the overlay and their
/// cell becomes empty, or holds a fresh treasure tile when one was hidden.
pub fn apply_pressure<R: Rng + ?Sized>(
    blockers: &mut Blockers,
    grid: &mut Grid,
    groups: &[Vec<Coord>],
    rng: &mut R,
) -> Vec<BlockerDelta> {
    let mut deltas = Vec::new();
    for (at, pressure) in tally_pressure(blockers, groups) {
        let Some(blocker) = blockers.by_coord.get_mut(&at) else {
            continue;
        };
        let had_umbrella = blocker.has_umbrella;
        let cleared = blocker.absorb(pressure);
        let mut delta = BlockerDelta {
            at,
            pressure,
            umbrella_removed: had_umbrella && !blocker.has_umbrella,
            hits: blocker.hits,
            cleared,
            treasure: None,
        };

        if cleared {
            let has_treasure = blocker.has_treasure;
            blockers.by_coord.remove(&at);
            if has_treasure {
                let tile = grid.spawn(at, random_kind(&TileKind::TREASURE, rng));
                delta.treasure = Some(tile.kind);
                log::debug!("Blocker at {} cleared, revealed {:?}", at, tile.kind);
            } else {
                grid.set(at, Cell::Empty);
                log::debug!("Blocker at {} cleared", at);
            }
        }
        deltas.push(delta);
    }
    deltas
}
