//! Hand-built boards shared by the unit tests

use super::grid::Grid;

/// No runs anywhere: rows cycle four kinds, columns alternate two
pub const QUIET: [&str; 8] = [
    "GBYPGBYP",
    "YPGBYPGB",
    "GBYPGBYP",
    "YPGBYPGB",
    "GBYPGBYP",
    "YPGBYPGB",
    "GBYPGBYP",
    "YPGBYPGB",
];

/// Swapping (2,3) into (2,2) completes row 2 cols 0..=2 and column 2 rows 0..=2
pub const BOMB: [&str; 8] = [
    "GBRYPGBY",
    "YPRGBYPG",
    "RRBRRPYB",
    "GBYPGBYP",
    "YPGBYPGB",
    "GBYPGBYP",
    "YPGBYPGB",
    "GBYPGBYP",
];

/// Swapping (2,2) down into (3,2) completes row 3 cols 0..=3
pub const ROCKET_ROW: [&str; 8] = [
    "GBYPGBYP",
    "YPGBYPGB",
    "GBRPGBYP",
    "RRBRYPGB",
    "GBYPGBYP",
    "YPGBYPGB",
    "GBYPGBYP",
    "YPGBYPGB",
];

/// Swapping (2,4) right into (2,5) completes column 5 rows 0..=3
pub const ROCKET_COLUMN: [&str; 8] = [
    "GBYPGRYP",
    "YPGBYRGB",
    "GBYPRBYP",
    "YPGBYRGB",
    "GBYPGBYP",
    "YPGBYPGB",
    "GBYPGBYP",
    "YPGBYPGB",
];

/// kind(r, c) = BASE[(c + 2r) % 5]: any two cells within distance two along a
/// line differ, so no swap can ever line up three
pub const DEADLOCK: [&str; 8] = [
    "RGBYPRGB",
    "BYPRGBYP",
    "PRGBYPRG",
    "GBYPRGBY",
    "YPRGBYPR",
    "RGBYPRGB",
    "BYPRGBYP",
    "PRGBYPRG",
];

pub fn grid(rows: &[&str]) -> Grid {
    Grid::from_rows(rows).unwrap()
}
