//! Board model: a fixed-shape grid of cells.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Layout symbol for a cell holding a peg.
pub const PEG_SYMBOL: char = '*';
/// Layout symbol for an empty playable cell.
pub const HOLE_SYMBOL: char = 'o';
/// Layout symbol for a cell outside the playable shape. Whitespace is accepted too.
pub const OUT_OF_SHAPE_SYMBOL: char = '-';

/// State of a single grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Not part of the playable region.
    OutOfShape,
    /// Playable and empty.
    Hole,
    /// Playable and occupied.
    Peg,
}

impl Cell {
    /// Map a layout character to a cell state.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            PEG_SYMBOL => Some(Self::Peg),
            HOLE_SYMBOL => Some(Self::Hole),
            OUT_OF_SHAPE_SYMBOL => Some(Self::OutOfShape),
            ch if ch.is_whitespace() => Some(Self::OutOfShape),
            _ => None,
        }
    }

    /// Layout character for this state.
    pub fn symbol(self) -> char {
        match self {
            Self::OutOfShape => OUT_OF_SHAPE_SYMBOL,
            Self::Hole => HOLE_SYMBOL,
            Self::Peg => PEG_SYMBOL,
        }
    }

    /// Whether the cell belongs to the playable shape.
    pub fn is_playable(self) -> bool {
        !matches!(self, Self::OutOfShape)
    }
}

/// Grid position; `x` is the column and `y` the row.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    /// Column, counted from the left edge.
    pub x: usize,
    /// Row, counted from the top edge.
    pub y: usize,
}

impl Coord {
    /// Build a coordinate from column and row.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Cell halfway between `self` and `other`.
    pub fn midpoint(self, other: Coord) -> Coord {
        Coord::new((self.x + other.x) / 2, (self.y + other.y) / 2)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four axis directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions, in the order destinations are reported.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step `(dx, dy)` for this direction.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    /// Whether the direction runs along a row.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Rectangular grid of cells whose playable shape is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard", into = "RawBoard")]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Parse a board from layout text, one row per line.
    ///
    /// Shorter rows are right-padded with out-of-shape cells. Blank lines before the
    /// first row and after the last row are ignored.
    pub fn from_layout(text: &str) -> Result<Self, BoardError> {
        let lines: Vec<&str> = text.lines().collect();
        let first = lines.iter().position(|line| !line.trim().is_empty());
        let last = lines.iter().rposition(|line| !line.trim().is_empty());
        let rows = match (first, last) {
            (Some(first), Some(last)) => &lines[first..=last],
            _ => return Err(BoardError::EmptyLayout),
        };

        let width = rows
            .iter()
            .map(|line| line.trim_end().chars().count())
            .max()
            .unwrap_or(0);
        if width == 0 {
            return Err(BoardError::EmptyLayout);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.trim_end();
            for (column, symbol) in line.chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or(BoardError::UnknownSymbol {
                    row,
                    column,
                    symbol,
                })?;
                cells.push(cell);
            }
            let padding = width - line.chars().count();
            cells.extend(std::iter::repeat(Cell::OutOfShape).take(padding));
        }

        if !cells.iter().any(|cell| cell.is_playable()) {
            return Err(BoardError::EmptyLayout);
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the coordinate lies inside the grid bounds.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Cell at `coord`, or `None` outside the grid.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|index| self.cells[index])
    }

    /// Cell at `coord`, failing with [`BoardError::OutOfBounds`] outside the grid.
    pub fn cell_at(&self, coord: Coord) -> Result<Cell, BoardError> {
        self.get(coord).ok_or_else(|| self.out_of_bounds(coord))
    }

    /// Overwrite the cell at `coord`.
    ///
    /// Callers never write [`Cell::OutOfShape`] after construction; the shape of a
    /// board is fixed.
    pub fn set_cell_at(&mut self, coord: Coord, cell: Cell) -> Result<(), BoardError> {
        let index = self.index(coord).ok_or_else(|| self.out_of_bounds(coord))?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Whether `coord` is inside the grid and part of the playable shape.
    pub fn is_playable(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(Cell::is_playable)
    }

    /// Number of cells holding a peg.
    pub fn peg_count(&self) -> usize {
        self.count(Cell::Peg)
    }

    /// Number of empty playable cells.
    pub fn hole_count(&self) -> usize {
        self.count(Cell::Hole)
    }

    /// Number of cells inside the playable shape.
    pub fn playable_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_playable()).count()
    }

    /// Whether both boards have the same dimensions and the same playable footprint.
    pub fn same_shape(&self, other: &Board) -> bool {
        self.width == other.width
            && self.height == other.height
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(a, b)| a.is_playable() == b.is_playable())
    }

    /// All coordinates in reading order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }

    /// Coordinates of every peg in reading order.
    pub fn pegs(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords()
            .filter(move |coord| self.get(*coord) == Some(Cell::Peg))
    }

    /// Step `steps` cells in `direction`, or `None` if that leaves the grid.
    pub fn offset(&self, coord: Coord, direction: Direction, steps: usize) -> Option<Coord> {
        let (dx, dy) = direction.delta();
        let x = coord.x.checked_add_signed(dx * steps as isize)?;
        let y = coord.y.checked_add_signed(dy * steps as isize)?;
        let next = Coord::new(x, y);
        self.contains(next).then_some(next)
    }

    /// Step `steps` cells in `direction`, wrapping around the grid edges.
    pub fn wrapping_offset(&self, coord: Coord, direction: Direction, steps: usize) -> Coord {
        let (dx, dy) = direction.delta();
        let step = steps as isize;
        let x = (coord.x as isize + dx * step).rem_euclid(self.width as isize);
        let y = (coord.y as isize + dy * step).rem_euclid(self.height as isize);
        Coord::new(x as usize, y as usize)
    }

    /// Serialize width, height and every cell state.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    /// Inverse of [`Board::to_bytes`]; rejects malformed or inconsistent input.
    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    fn count(&self, wanted: Cell) -> usize {
        self.cells.iter().filter(|cell| **cell == wanted).count()
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.y * self.width + coord.x)
    }

    fn out_of_bounds(&self, coord: Coord) -> BoardError {
        BoardError::OutOfBounds {
            x: coord.x,
            y: coord.y,
            width: self.width,
            height: self.height,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.width).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RawBoard {
    width: usize,
    height: usize,
    rows: Vec<String>,
}

impl From<Board> for RawBoard {
    fn from(board: Board) -> Self {
        let rows = board
            .cells
            .chunks(board.width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect();
        Self {
            width: board.width,
            height: board.height,
            rows,
        }
    }
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        let mismatch = BoardError::DimensionMismatch {
            width: raw.width,
            height: raw.height,
        };
        if raw.width == 0 || raw.height == 0 {
            return Err(BoardError::EmptyLayout);
        }
        if raw.rows.len() != raw.height {
            return Err(mismatch);
        }

        if raw.rows.iter().any(|line| line.chars().count() != raw.width) {
            return Err(mismatch);
        }
        let capacity = raw.width.checked_mul(raw.height).ok_or(mismatch)?;

        let mut cells = Vec::with_capacity(capacity);
        for (row, line) in raw.rows.iter().enumerate() {
            for (column, symbol) in line.chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or(BoardError::UnknownSymbol {
                    row,
                    column,
                    symbol,
                })?;
                cells.push(cell);
            }
        }
        if !cells.iter().any(|cell| cell.is_playable()) {
            return Err(BoardError::EmptyLayout);
        }

        Ok(Self {
            width: raw.width,
            height: raw.height,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSS: &str = "
  ***
  ***
*******
***o***
*******
  ***
  ***
";

    #[test]
    fn layout_pads_rows_to_rectangle() {
        let board = Board::from_layout(CROSS).expect("layout parses");
        assert_eq!(board.width(), 7);
        assert_eq!(board.height(), 7);
        assert_eq!(board.get(Coord::new(6, 0)), Some(Cell::OutOfShape));
        assert_eq!(board.get(Coord::new(3, 3)), Some(Cell::Hole));
        assert_eq!(board.peg_count(), 32);
        assert_eq!(board.playable_count(), 33);
    }

    #[test]
    fn unknown_symbol_reports_position() {
        let err = Board::from_layout("**\n*x").unwrap_err();
        assert_eq!(
            err,
            BoardError::UnknownSymbol {
                row: 1,
                column: 1,
                symbol: 'x'
            }
        );
    }

    #[test]
    fn blank_layout_is_rejected() {
        assert_eq!(Board::from_layout("\n   \n").unwrap_err(), BoardError::EmptyLayout);
        assert_eq!(Board::from_layout("---\n--").unwrap_err(), BoardError::EmptyLayout);
    }

    #[test]
    fn cell_access_is_bounds_checked() {
        let mut board = Board::from_layout(CROSS).expect("layout parses");
        assert!(matches!(
            board.cell_at(Coord::new(7, 0)),
            Err(BoardError::OutOfBounds { x: 7, y: 0, .. })
        ));
        assert!(board.set_cell_at(Coord::new(0, 9), Cell::Hole).is_err());
        board
            .set_cell_at(Coord::new(3, 3), Cell::Peg)
            .expect("in bounds");
        assert_eq!(board.peg_count(), 33);
    }

    #[test]
    fn bytes_round_trip_preserves_every_cell() {
        let mut board = Board::from_layout(CROSS).expect("layout parses");
        board
            .set_cell_at(Coord::new(2, 4), Cell::Hole)
            .expect("in bounds");
        let bytes = board.to_bytes().expect("serializes");
        let restored = Board::from_bytes(&bytes).expect("deserializes");
        assert_eq!(restored, board);
    }

    #[test]
    fn inconsistent_rows_fail_to_deserialize() {
        let json = br#"{"width":3,"height":2,"rows":["***","**"]}"#;
        assert!(Board::from_bytes(json).is_err());
        let json = br#"{"width":2,"height":1,"rows":["*?"]}"#;
        assert!(Board::from_bytes(json).is_err());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let json = br#"{"width":9223372036854775808,"height":2,"rows":["*","*"]}"#;
        assert!(Board::from_bytes(json).is_err());
        let json = br#"{"width":4611686018427387904,"height":1,"rows":["*"]}"#;
        assert!(Board::from_bytes(json).is_err());
        let json = br#"{"width":1,"height":18446744073709551615,"rows":["*"]}"#;
        assert!(Board::from_bytes(json).is_err());
    }

    #[test]
    fn wrapping_offset_stays_on_grid() {
        let board = Board::from_layout(CROSS).expect("layout parses");
        assert_eq!(
            board.wrapping_offset(Coord::new(0, 3), Direction::Left, 2),
            Coord::new(5, 3)
        );
        assert_eq!(
            board.wrapping_offset(Coord::new(3, 6), Direction::Down, 1),
            Coord::new(3, 0)
        );
        assert_eq!(board.offset(Coord::new(1, 3), Direction::Left, 2), None);
    }

    #[test]
    fn display_uses_layout_symbols() {
        let board = Board::from_layout("*o\n *").expect("layout parses");
        assert_eq!(board.to_string(), "*o\n-*");
    }
}
