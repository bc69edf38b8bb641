//! Special triggers: bombs and rockets formed by the player's swap
//!
//! Only the swap itself can arm a special. Cascades never do, since there is
//! no destination cell to anchor them to.

use serde::{Deserialize, Serialize};

use super::grid::{Coord, Grid};
use super::matches::Axis;
use crate::consts::{BOARD_SIZE, BOMB_RADIUS, MIN_MATCH_LEN, ROCKET_RUN_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Special {
    /// Horizontal and vertical runs cross at the destination
    Bomb,
    /// A run of four or more through the destination
    Rocket { horizontal: bool },
}

/// A special armed by a swap, with the cells it clears
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub special: Special,
    pub center: Coord,
    pub area: Vec<Coord>,
}

impl Trigger {
    pub fn is_bomb(&self) -> bool {
        self.special == Special::Bomb
    }

    pub fn is_rocket(&self) -> bool {
        matches!(self.special, Special::Rocket { .. })
    }
}

/// Classify a swap already applied to `grid`, looking only at runs through
/// the destination cell `to`. Bomb wins over rocket.
pub fn detect_trigger(grid: &Grid, to: Coord) -> Option<Trigger> {
    let horizontal = run_length(grid, to, Axis::Horizontal);
    let vertical = run_length(grid, to, Axis::Vertical);

    let special = if horizontal >= MIN_MATCH_LEN && vertical >= MIN_MATCH_LEN {
        Special::Bomb
    } else if horizontal >= ROCKET_RUN_LEN {
        Special::Rocket { horizontal: true }
    } else if vertical >= ROCKET_RUN_LEN {
        Special::Rocket { horizontal: false }
    } else {
        return None;
    };

    let area = match special {
        Special::Bomb => bomb_area(to),
        Special::Rocket { horizontal } => rocket_area(to, horizontal),
    };
    log::debug!("{:?} armed at {}", special, to);

    Some(Trigger {
        special,
        center: to,
        area,
    })
}

/// The 5x5 block around `center`, clipped to the board (row-major)
pub fn bomb_area(center: Coord) -> Vec<Coord> {
    let reach = BOMB_RADIUS as isize;
    (-reach..=reach)
        .flat_map(|dr| (-reach..=reach).map(move |dc| (dr, dc)))
        .filter_map(|(dr, dc)| center.offset(dr, dc))
        .collect()
}

/// The whole row (`horizontal`) or whole column through `center`
pub fn rocket_area(center: Coord, horizontal: bool) -> Vec<Coord> {
    (0..BOARD_SIZE)
        .map(|i| {
            if horizontal {
                Coord::new(center.row, i)
            } else {
                Coord::new(i, center.col)
            }
        })
        .collect()
}

/// Length of the same-kind run along `axis` that passes through `at`
fn run_length(grid: &Grid, at: Coord, axis: Axis) -> usize {
    let Some(kind) = grid.matchable_kind(at) else {
        return 0;
    };
    let (dr, dc) = match axis {
        Axis::Horizontal => (0, 1),
        Axis::Vertical => (1, 0),
    };

    let mut len = 1;
    for sign in [-1, 1] {
        let mut cursor = at;
        while let Some(next) = cursor.offset(dr * sign, dc * sign) {
            if grid.matchable_kind(next) != Some(kind) {
                break;
            }
            len += 1;
            cursor = next;
        }
    }
    len
}
