//! Move validation and legal-move enumeration

use super::grid::{Coord, Grid, Move};
use super::matches::find_matches;
use crate::consts::BOARD_SIZE;

/// True if swapping `a` and `b` is a legal move: both on the board, sharing
/// an edge, both holding tiles, and the swapped board has at least one match.
pub fn is_valid_move(grid: &Grid, a: Coord, b: Coord) -> bool {
    if !Move::new(a, b).is_adjacent() {
        return false;
    }
    if grid.tile(a).is_none() || grid.tile(b).is_none() {
        return false;
    }

    let mut trial = grid.clone();
    trial.swap(a, b);
    !find_matches(&trial).is_empty()
}

/// Every legal move. Each unordered adjacent pair is tried exactly once, as
/// (cell, right neighbour) then (cell, down neighbour), in row-major order.
pub fn get_valid_moves(grid: &Grid) -> Vec<Move> {
    let mut moves = Vec::new();
    for at in Coord::all() {
        if at.col + 1 < BOARD_SIZE {
            let right = Coord::new(at.row, at.col + 1);
            if is_valid_move(grid, at, right) {
                moves.push(Move::new(at, right));
            }
        }
        if at.row + 1 < BOARD_SIZE {
            let down = Coord::new(at.row + 1, at.col);
            if is_valid_move(grid, at, down) {
                moves.push(Move::new(at, down));
            }
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixtures::{BOMB, DEADLOCK, QUIET, ROCKET_ROW, grid};
    use proptest::prelude::*;

    #[test]
    fn test_valid_swap_both_directions() {
        let board = grid(&ROCKET_ROW);
        let a = Coord::new(2, 2);
        let b = Coord::new(3, 2);
        assert!(is_valid_move(&board, a, b));
        assert!(is_valid_move(&board, b, a));
    }

    #[test]
    fn test_swap_without_match_is_invalid() {
        let board = grid(&QUIET);
        assert!(!is_valid_move(&board, Coord::new(0, 0), Coord::new(0, 1)));
    }

    #[test]
    fn test_off_board_and_equal_coordinates_rejected() {
        let board = grid(&BOMB);
        assert!(!is_valid_move(&board, Coord::new(7, 7), Coord::new(7, 8)));
        assert!(!is_valid_move(&board, Coord::new(8, 0), Coord::new(7, 0)));
        assert!(!is_valid_move(&board, Coord::new(2, 2), Coord::new(2, 2)));
    }

    #[test]
    fn test_blocked_cell_cannot_be_swapped() {
        let mut rows = ROCKET_ROW;
        rows[2] = "GB#PGBYP";
        let board = grid(&rows);
        assert!(!is_valid_move(&board, Coord::new(2, 2), Coord::new(3, 2)));
    }

    #[test]
    fn test_valid_moves_enumeration() {
        let board = grid(&ROCKET_ROW);
        let moves = get_valid_moves(&board);
        assert!(moves.contains(&Move::new(Coord::new(2, 2), Coord::new(3, 2))));
        // Every pair appears once, in canonical (right/down) orientation
        for mv in &moves {
            assert!(mv.to.row > mv.from.row || mv.to.col > mv.from.col);
            assert_eq!(moves.iter().filter(|m| *m == mv).count(), 1);
        }
        assert!(get_valid_moves(&grid(&DEADLOCK)).is_empty());
    }

    proptest! {
        #[test]
        fn prop_non_adjacent_pairs_are_invalid(
            r1 in 0usize..8, c1 in 0usize..8,
            r2 in 0usize..8, c2 in 0usize..8,
        ) {
            let a = Coord::new(r1, c1);
            let b = Coord::new(r2, c2);
            prop_assume!(r1.abs_diff(r2) + c1.abs_diff(c2) != 1);
            let board = grid(&BOMB);
            prop_assert!(!is_valid_move(&board, a, b));
        }
    }
}
