//! Match detection and match scoring

use serde::{Deserialize, Serialize};

use super::grid::{Coord, Grid, TileKind};
use crate::consts::{BOARD_SIZE, MIN_MATCH_LEN};

/// Direction a run lies along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Coordinate of the `index`-th cell of `line` along this axis
    fn at(self, line: usize, index: usize) -> Coord {
        match self {
            Axis::Horizontal => Coord::new(line, index),
            Axis::Vertical => Coord::new(index, line),
        }
    }
}

/// A straight run of at least three same-kind tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub kind: TileKind,
    pub axis: Axis,
    /// Cells in scan order (left to right, or top to bottom)
    pub cells: Vec<Coord>,
}

impl Match {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, at: Coord) -> bool {
        self.cells.contains(&at)
    }
}

/// Every match on the board: all rows first, then all columns.
///
/// Horizontal and vertical matches are reported independently, so a cell in
/// an L or T shape shows up in two entries.
pub fn find_matches(grid: &Grid) -> Vec<Match> {
    let mut matches = Vec::new();
    for axis in [Axis::Horizontal, Axis::Vertical] {
        for line in 0..BOARD_SIZE {
            scan_line(grid, axis, line, &mut matches);
        }
    }
    matches
}

fn scan_line(grid: &Grid, axis: Axis, line: usize, out: &mut Vec<Match>) {
    let mut start = 0;
    while start + MIN_MATCH_LEN <= BOARD_SIZE {
        let Some(kind) = grid.matchable_kind(axis.at(line, start)) else {
            start += 1;
            continue;
        };

        let mut end = start + 1;
        while end < BOARD_SIZE && grid.matchable_kind(axis.at(line, end)) == Some(kind) {
            end += 1;
        }

        if end - start >= MIN_MATCH_LEN {
            out.push(Match {
                kind,
                axis,
                cells: (start..end).map(|i| axis.at(line, i)).collect(),
            });
            // Overlap with the run just recorded is not re-examined, so a run
            // of six or more also yields its tail from start + 3
            start += MIN_MATCH_LEN;
        } else {
            start = end;
        }
    }
}

/// Points for one match: 10 per tile plus 5 per tile beyond the third
pub fn match_score(len: usize, points_per_tile: u64, bonus_per_extra_tile: u64) -> u64 {
    let len = len as u64;
    let extra = len.saturating_sub(MIN_MATCH_LEN as u64);
    len * points_per_tile + extra * bonus_per_extra_tile
}
