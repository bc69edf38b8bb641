//! Board model: coordinates, tiles, cells and the 8x8 grid
//!
//! The grid is the only board state the engine mutates. Blocker durability
//! lives in the blocker overlay; the grid just marks those cells `Blocked`
//! so gravity and matching see them as walls.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::BOARD_SIZE;
use crate::error::GridError;

/// A board position, row 0 at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Build from signed values, `None` when off the board
    pub fn checked(row: isize, col: isize) -> Option<Self> {
        let size = BOARD_SIZE as isize;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Self::new(row as usize, col as usize))
        } else {
            None
        }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Self> {
        Self::checked(self.row as isize + d_row, self.col as isize + d_col)
    }

    /// The up to four orthogonal neighbours that lie on the board
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }

    /// True when the two coordinates share an edge (Manhattan distance 1)
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// Every board coordinate in row-major order
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Coord::new(row, col)))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Tile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    // Treasures, revealed from under blockers
    Coin,
    Ruby,
    Pearl,
    Crown,
    /// Drop-objective piece, leaves the board from the bottom row
    Exiting,
}

impl TileKind {
    pub const BASE: [Self; 5] = [Self::Red, Self::Green, Self::Blue, Self::Yellow, Self::Purple];
    pub const TREASURE: [Self; 4] = [Self::Coin, Self::Ruby, Self::Pearl, Self::Crown];

    pub fn is_treasure(&self) -> bool {
        Self::TREASURE.contains(self)
    }

    /// Exiting pieces never form matches
    pub fn is_matchable(&self) -> bool {
        *self != Self::Exiting
    }

    /// Layout symbol
    pub fn symbol(&self) -> char {
        match self {
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Blue => 'B',
            Self::Yellow => 'Y',
            Self::Purple => 'P',
            Self::Coin => 'c',
            Self::Ruby => 'r',
            Self::Pearl => 'p',
            Self::Crown => 'k',
            Self::Exiting => 'X',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        let kind = match symbol {
            'R' => Self::Red,
            'G' => Self::Green,
            'B' => Self::Blue,
            'Y' => Self::Yellow,
            'P' => Self::Purple,
            'c' => Self::Coin,
            'r' => Self::Ruby,
            'p' => Self::Pearl,
            'k' => Self::Crown,
            'X' => Self::Exiting,
            _ => return None,
        };
        Some(kind)
    }
}

/// Level variant, selects the palette refills draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Classic,
    /// Treasures only appear from under cleared blockers
    Treasure,
    /// Exiting pieces drop in alongside the base kinds
    Drop,
}

impl Variant {
    pub fn palette(&self) -> &'static [TileKind] {
        const DROP: [TileKind; 6] = [
            TileKind::Red,
            TileKind::Green,
            TileKind::Blue,
            TileKind::Yellow,
            TileKind::Purple,
            TileKind::Exiting,
        ];
        match self {
            Variant::Classic | Variant::Treasure => &TileKind::BASE,
            Variant::Drop => &DROP,
        }
    }
}

/// A tile instance. The id survives falls and swaps so the presentation
/// layer can follow a tile; matching only ever compares `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    pub kind: TileKind,
}

/// What sits at one coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Vacated mid-resolution; never present at rest
    #[default]
    Empty,
    /// Covered by a blocker, holds no tile until the blocker clears
    Blocked,
    Tile(Tile),
}

impl Cell {
    pub fn tile(&self) -> Option<Tile> {
        match self {
            Cell::Tile(tile) => Some(*tile),
            _ => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Cell::Blocked)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    fn symbol(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Blocked => '#',
            Cell::Tile(tile) => tile.kind.symbol(),
        }
    }
}

/// A requested swap of two cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
}

impl Move {
    pub const fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }

    /// Both ends on the board and sharing an edge
    pub fn is_adjacent(&self) -> bool {
        self.from.in_bounds() && self.to.in_bounds() && self.from.is_adjacent(&self.to)
    }
}

/// The fixed 8x8 board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    /// Next tile id
    next_id: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// An all-empty grid (only useful as a starting point for generators)
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
            next_id: 1,
        }
    }

    /// Parse a layout, one string per row. See `TileKind::symbol` for tiles,
    /// `#` marks a blocked cell and `.` an empty one.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        if rows.len() != BOARD_SIZE {
            return Err(GridError::RowCount {
                expected: BOARD_SIZE,
                found: rows.len(),
            });
        }

        let mut grid = Self::new();
        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.as_ref().chars().collect();
            if symbols.len() != BOARD_SIZE {
                return Err(GridError::RowWidth {
                    row,
                    expected: BOARD_SIZE,
                    found: symbols.len(),
                });
            }
            for (col, &symbol) in symbols.iter().enumerate() {
                let at = Coord::new(row, col);
                match symbol {
                    '.' => grid.set(at, Cell::Empty),
                    '#' => grid.set(at, Cell::Blocked),
                    _ => {
                        let kind = TileKind::from_symbol(symbol)
                            .ok_or(GridError::UnknownSymbol { row, col, symbol })?;
                        grid.spawn(at, kind);
                    }
                }
            }
        }
        Ok(grid)
    }

    /// Inverse of `from_rows`
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(Cell::symbol).collect())
            .collect()
    }

    /// Cell at an on-board coordinate
    #[inline]
    pub fn cell(&self, at: Coord) -> Cell {
        self.cells[at.row][at.col]
    }

    /// Cell lookup that tolerates off-board coordinates
    pub fn get(&self, at: Coord) -> Option<Cell> {
        at.in_bounds().then(|| self.cell(at))
    }

    #[inline]
    pub fn set(&mut self, at: Coord, cell: Cell) {
        self.cells[at.row][at.col] = cell;
    }

    pub fn tile(&self, at: Coord) -> Option<Tile> {
        self.cell(at).tile()
    }

    /// Kind of the tile at `at`, if that tile can take part in a match
    pub fn matchable_kind(&self, at: Coord) -> Option<TileKind> {
        self.tile(at).map(|t| t.kind).filter(TileKind::is_matchable)
    }

    pub fn is_blocked(&self, at: Coord) -> bool {
        self.cell(at).is_blocked()
    }

    /// Place a brand new tile (fresh id) at `at`
    pub fn spawn(&mut self, at: Coord, kind: TileKind) -> Tile {
        let tile = Tile {
            id: self.next_tile_id(),
            kind,
        };
        self.set(at, Cell::Tile(tile));
        tile
    }

    /// Remove and return the tile at `at`, leaving the cell empty
    pub fn take(&mut self, at: Coord) -> Option<Tile> {
        let tile = self.tile(at)?;
        self.set(at, Cell::Empty);
        Some(tile)
    }

    pub fn swap(&mut self, a: Coord, b: Coord) {
        let cell_a = self.cell(a);
        self.set(a, self.cell(b));
        self.set(b, cell_a);
    }

    /// Every tile with its coordinate, row-major
    pub fn tiles(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        Coord::all().filter_map(|at| self.tile(at).map(|tile| (at, tile)))
    }

    /// How many tiles of each kind are on the board
    pub fn kind_counts(&self) -> BTreeMap<TileKind, usize> {
        let mut counts = BTreeMap::new();
        for (_, tile) in self.tiles() {
            *counts.entry(tile.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn empty_count(&self) -> usize {
        Coord::all().filter(|&at| self.cell(at).is_empty()).count()
    }

    fn next_tile_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: [&str; 8] = [
        "RGBYPRGB",
        "YP#BYPGB",
        "GBYPGBYP",
        "crpkXBYP",
        "GBYPGBYP",
        "YPGB.PGB",
        "GBYPGBYP",
        "YPGBYPGB",
    ];

    #[test]
    fn test_layout_round_trip() {
        let grid = Grid::from_rows(&LAYOUT).unwrap();
        assert_eq!(grid.to_rows(), LAYOUT);
        assert!(grid.is_blocked(Coord::new(1, 2)));
        assert!(grid.cell(Coord::new(5, 4)).is_empty());
        assert_eq!(grid.tile(Coord::new(3, 4)).unwrap().kind, TileKind::Exiting);
        assert!(grid.tile(Coord::new(3, 1)).unwrap().kind.is_treasure());
    }

    #[test]
    fn test_layout_errors() {
        let short = &LAYOUT[..7];
        assert_eq!(
            Grid::from_rows(short),
            Err(GridError::RowCount {
                expected: 8,
                found: 7
            })
        );

        let mut wide = LAYOUT.map(String::from);
        wide[2].push('R');
        assert_eq!(
            Grid::from_rows(&wide),
            Err(GridError::RowWidth {
                row: 2,
                expected: 8,
                found: 9
            })
        );

        let mut bad = LAYOUT.map(String::from);
        bad[4].replace_range(3..4, "?");
        assert_eq!(
            Grid::from_rows(&bad),
            Err(GridError::UnknownSymbol {
                row: 4,
                col: 3,
                symbol: '?'
            })
        );
    }

    #[test]
    fn test_tile_ids_unique_and_preserved_by_swap() {
        let mut grid = Grid::from_rows(&LAYOUT).unwrap();
        let mut ids: Vec<u32> = grid.tiles().map(|(_, t)| t.id).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);

        let a = Coord::new(0, 0);
        let b = Coord::new(0, 1);
        let (ta, tb) = (grid.tile(a).unwrap(), grid.tile(b).unwrap());
        grid.swap(a, b);
        assert_eq!(grid.tile(a), Some(tb));
        assert_eq!(grid.tile(b), Some(ta));
    }

    #[test]
    fn test_neighbors_clip_at_edges() {
        assert_eq!(Coord::new(0, 0).neighbors().count(), 2);
        assert_eq!(Coord::new(0, 4).neighbors().count(), 3);
        assert_eq!(Coord::new(4, 4).neighbors().count(), 4);
        assert_eq!(Coord::new(7, 7).neighbors().count(), 2);
    }

    #[test]
    fn test_exiting_is_not_matchable() {
        let grid = Grid::from_rows(&LAYOUT).unwrap();
        assert_eq!(grid.matchable_kind(Coord::new(3, 4)), None);
        assert_eq!(grid.matchable_kind(Coord::new(0, 0)), Some(TileKind::Red));
        assert_eq!(grid.matchable_kind(Coord::new(1, 2)), None);
    }
}
