//! Fresh boards with no runs of three

use rand::Rng;

use super::blockers::Blockers;
use super::gravity::random_kind;
use super::grid::{Coord, Grid, TileKind, Variant};
use crate::consts::MIN_MATCH_LEN;

/// A starting board for `variant`: blocker cells marked, every other cell
/// dealt so that no match exists.
pub fn create_valid_board<R: Rng + ?Sized>(
    blockers: &Blockers,
    variant: Variant,
    rng: &mut R,
) -> Grid {
    let mut grid = Grid::new();
    blockers.apply_to(&mut grid);
    fill_without_matches(&mut grid, variant.palette(), rng);
    grid
}

/// Deal a tile into every empty cell, row-major, never picking a kind that
/// would complete a run with the tiles already around it.
pub fn fill_without_matches<R: Rng + ?Sized>(grid: &mut Grid, palette: &[TileKind], rng: &mut R) {
    for at in Coord::all() {
        if !grid.cell(at).is_empty() {
            continue;
        }
        let allowed: Vec<TileKind> = palette
            .iter()
            .copied()
            .filter(|&kind| !completes_run(grid, at, kind))
            .collect();
        // Five base kinds against at most four neighbouring runs, so only a
        // custom palette can leave this empty
        let kind = if allowed.is_empty() {
            random_kind(palette, rng)
        } else {
            random_kind(&allowed, rng)
        };
        grid.spawn(at, kind);
    }
}

fn completes_run(grid: &Grid, at: Coord, kind: TileKind) -> bool {
    if !kind.is_matchable() {
        return false;
    }
    let same = |d_row: isize, d_col: isize| {
        let mut len = 0;
        let mut cursor = at;
        while let Some(next) = cursor.offset(d_row, d_col) {
            if grid.matchable_kind(next) != Some(kind) {
                break;
            }
            len += 1;
            cursor = next;
        }
        len
    };
    1 + same(0, -1) + same(0, 1) >= MIN_MATCH_LEN || 1 + same(-1, 0) + same(1, 0) >= MIN_MATCH_LEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::blockers::Blocker;
    use crate::board::matches::find_matches;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_board_is_full_and_quiet() {
        let mut rng = Pcg32::seed_from_u64(12345);
        let grid = create_valid_board(&Blockers::new(), Variant::Classic, &mut rng);
        assert_eq!(grid.empty_count(), 0);
        assert!(find_matches(&grid).is_empty());
        assert!(grid.tiles().all(|(_, t)| TileKind::BASE.contains(&t.kind)));
    }

    #[test]
    fn test_blocker_cells_left_blocked() {
        let blockers: Blockers = [Blocker::new(Coord::new(3, 3)), Blocker::new(Coord::new(0, 7))]
            .into_iter()
            .collect();
        let grid = create_valid_board(&blockers, Variant::Treasure, &mut Pcg32::seed_from_u64(8));
        assert!(grid.is_blocked(Coord::new(3, 3)));
        assert!(grid.is_blocked(Coord::new(0, 7)));
        assert_eq!(grid.tiles().count(), 62);
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = create_valid_board(&Blockers::new(), Variant::Drop, &mut Pcg32::seed_from_u64(77));
        let b = create_valid_board(&Blockers::new(), Variant::Drop, &mut Pcg32::seed_from_u64(77));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_generated_boards_have_no_matches(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let grid = create_valid_board(&Blockers::new(), Variant::Classic, &mut rng);
            prop_assert!(find_matches(&grid).is_empty());
            prop_assert_eq!(grid.empty_count(), 0);
        }
    }
}
