//! Gravity: compact each column toward the bottom and refill from the top
//!
//! Blocked cells split a column into independent sections. Tiles never pass
//! a blocker; every section is compacted and refilled on its own.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Coord, Grid, TileKind};
use crate::consts::BOARD_SIZE;

/// A tile that moved down during a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileFall {
    pub id: u32,
    pub from: Coord,
    pub to: Coord,
}

impl TileFall {
    pub fn distance(&self) -> usize {
        self.to.row - self.from.row
    }
}

/// A tile created to fill a vacated cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpawn {
    pub id: u32,
    pub kind: TileKind,
    pub at: Coord,
}

/// Everything one drop did, for animating it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GravityReport {
    pub falls: Vec<TileFall>,
    pub spawns: Vec<TileSpawn>,
}

impl GravityReport {
    pub fn append(&mut self, other: GravityReport) {
        self.falls.extend(other.falls);
        self.spawns.extend(other.spawns);
    }
}

/// Let every column settle, then fill the gaps with tiles drawn uniformly
/// from `palette`. Blocked cells are never written.
pub fn drop_tiles<R: Rng + ?Sized>(
    grid: &mut Grid,
    palette: &[TileKind],
    rng: &mut R,
) -> GravityReport {
    let mut report = GravityReport::default();
    for col in 0..BOARD_SIZE {
        for rows in sections(grid, col) {
            settle_section(grid, col, rows, palette, rng, &mut report);
        }
    }
    report
}

/// Uniform draw from `palette`, base kinds if it is empty
pub fn random_kind<R: Rng + ?Sized>(palette: &[TileKind], rng: &mut R) -> TileKind {
    let palette = if palette.is_empty() {
        &TileKind::BASE[..]
    } else {
        palette
    };
    palette[rng.random_range(0..palette.len())]
}

/// Row ranges of `col` that contain no blocked cell, top to bottom
fn sections(grid: &Grid, col: usize) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = 0;
    for row in 0..=BOARD_SIZE {
        if row == BOARD_SIZE || grid.is_blocked(Coord::new(row, col)) {
            if row > start {
                out.push(start..row);
            }
            start = row + 1;
        }
    }
    out
}

fn settle_section<R: Rng + ?Sized>(
    grid: &mut Grid,
    col: usize,
    rows: Range<usize>,
    palette: &[TileKind],
    rng: &mut R,
    report: &mut GravityReport,
) {
    // Walk bottom-up; `floor` is one past the lowest free row
    let mut floor = rows.end;
    for row in rows.clone().rev() {
        let from = Coord::new(row, col);
        if let Some(tile) = grid.take(from) {
            floor -= 1;
            let to = Coord::new(floor, col);
            grid.set(to, Cell::Tile(tile));
            if to != from {
                report.falls.push(TileFall {
                    id: tile.id,
                    from,
                    to,
                });
            }
        }
    }

    for row in rows.start..floor {
        let at = Coord::new(row, col);
        let tile = grid.spawn(at, random_kind(palette, rng));
        report.spawns.push(TileSpawn {
            id: tile.id,
            kind: tile.kind,
            at,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixtures::{QUIET, grid};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_full_board_does_not_move() {
        let mut board = grid(&QUIET);
        let before = board.clone();
        let report = drop_tiles(&mut board, &TileKind::BASE, &mut Pcg32::seed_from_u64(1));
        assert_eq!(board, before);
        assert!(report.falls.is_empty());
        assert!(report.spawns.is_empty());
    }

    #[test]
    fn test_blocker_splits_column_into_sections() {
        // Column 0 top to bottom: G . # Y . Y . Y
        let mut rows = QUIET;
        rows[1] = ".PGBYPGB";
        rows[2] = "#BYPGBYP";
        rows[4] = ".BYPGBYP";
        rows[6] = ".BYPGBYP";
        let mut board = grid(&rows);

        let ids: Vec<u32> = [0, 3, 5, 7]
            .iter()
            .map(|&r| board.tile(Coord::new(r, 0)).unwrap().id)
            .collect();

        let report = drop_tiles(&mut board, &TileKind::BASE, &mut Pcg32::seed_from_u64(7));

        // Upper section (rows 0..2): the lone tile lands on row 1
        assert_eq!(board.tile(Coord::new(1, 0)).unwrap().id, ids[0]);
        // Blocker untouched
        assert!(board.is_blocked(Coord::new(2, 0)));
        // Lower section (rows 3..8): order kept, packed to the bottom
        assert_eq!(board.tile(Coord::new(5, 0)).unwrap().id, ids[1]);
        assert_eq!(board.tile(Coord::new(6, 0)).unwrap().id, ids[2]);
        assert_eq!(board.tile(Coord::new(7, 0)).unwrap().id, ids[3]);

        // Refilled: row 0 above the blocker, rows 3..5 below it
        assert_eq!(board.empty_count(), 0);
        let spawned: Vec<Coord> = report.spawns.iter().map(|s| s.at).collect();
        assert_eq!(
            spawned,
            vec![Coord::new(0, 0), Coord::new(3, 0), Coord::new(4, 0)]
        );
        assert!(report.spawns.iter().all(|s| TileKind::BASE.contains(&s.kind)));

        let fall = report.falls.iter().find(|f| f.id == ids[1]).unwrap();
        assert_eq!(fall.distance(), 2);
    }

    #[test]
    fn test_section_below_blocker_refills_in_place() {
        // Column 3: blocker at row 6, empty bottom cell under it
        let mut rows = QUIET;
        rows[6] = "GBY#GBYP";
        rows[7] = "YPG.YPGB";
        let mut board = grid(&rows);
        let above = board.tile(Coord::new(5, 3)).unwrap();

        drop_tiles(&mut board, &TileKind::BASE, &mut Pcg32::seed_from_u64(3));

        assert_eq!(board.tile(Coord::new(5, 3)), Some(above));
        assert!(board.tile(Coord::new(7, 3)).is_some());
        assert!(board.tile(Coord::new(7, 3)).unwrap().id > above.id);
    }

    #[test]
    fn test_drop_is_deterministic_per_seed() {
        let mut rows = QUIET;
        rows[3] = "...BYPGB";
        let mut a = grid(&rows);
        let mut b = grid(&rows);
        drop_tiles(&mut a, &TileKind::BASE, &mut Pcg32::seed_from_u64(42));
        drop_tiles(&mut b, &TileKind::BASE, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
