//! Dead-board detection and recovery

use rand::Rng;
use rand::seq::SliceRandom;

use super::generate::fill_without_matches;
use super::grid::{Cell, Coord, Grid, Tile, TileKind};
use super::matches::find_matches;
use super::moves::get_valid_moves;
use crate::consts::MAX_REDEAL_ATTEMPTS;

/// True when no swap on the board produces a match
pub fn check_if_game_impossible(grid: &Grid) -> bool {
    get_valid_moves(grid).is_empty()
}

/// Shuffle every tile and deal them back row-major into the non-blocked
/// cells. Tiles keep their ids. The result is not checked in any way.
pub fn rearrange_board<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Grid {
    let mut tiles: Vec<Tile> = grid.tiles().map(|(_, tile)| tile).collect();
    tiles.shuffle(rng);

    let mut out = grid.clone();
    let mut deal = tiles.into_iter();
    for at in Coord::all() {
        if out.is_blocked(at) {
            continue;
        }
        out.set(at, deal.next().map_or(Cell::Empty, Cell::Tile));
    }
    out
}

/// Shuffle until the board has a legal move and no standing match. After
/// `max_attempts` failed shuffles, deal fresh tiles instead.
pub fn reshuffle_until_playable<R: Rng + ?Sized>(
    grid: &Grid,
    palette: &[TileKind],
    max_attempts: u32,
    rng: &mut R,
) -> Grid {
    for attempt in 1..=max_attempts {
        let candidate = rearrange_board(grid, rng);
        if find_matches(&candidate).is_empty() && !check_if_game_impossible(&candidate) {
            log::info!("Board reshuffled (attempt {})", attempt);
            return candidate;
        }
    }
    log::warn!(
        "No playable shuffle in {} attempts, dealing fresh tiles",
        max_attempts
    );
    redeal(grid, palette, rng)
}

/// Replace every tile with a freshly dealt, match-free one. Blocked cells
/// stay as they are.
pub fn redeal<R: Rng + ?Sized>(grid: &Grid, palette: &[TileKind], rng: &mut R) -> Grid {
    let mut candidate = grid.clone();
    for attempt in 1..=MAX_REDEAL_ATTEMPTS {
        candidate = grid.clone();
        for at in Coord::all() {
            if candidate.tile(at).is_some() {
                candidate.set(at, Cell::Empty);
            }
        }
        fill_without_matches(&mut candidate, palette, rng);
        if !check_if_game_impossible(&candidate) {
            log::info!("Fresh deal found (attempt {})", attempt);
            return candidate;
        }
    }
    log::warn!("Every fresh deal was dead, keeping the last one");
    candidate
}
