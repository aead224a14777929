use std::fmt;
use thiserror::Error;

/// Number of playable columns.
pub const WIDTH: u8 = 11;
/// Number of playable rows.
pub const HEIGHT: u8 = 9;
/// Row stride of the padded grid. The two extra columns per row are never
/// open, so a two-column knight jump off either edge lands on a sentinel.
pub const PADDED_WIDTH: u8 = WIDTH + 2;
/// Number of bits needed to address every playable cell.
pub const SIZE: u8 = PADDED_WIDTH * HEIGHT - 2;
/// Number of playable cells.
pub const CELL_COUNT: usize = WIDTH as usize * HEIGHT as usize;

/// Errors raised when building cells from raw input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("cell index {index} is outside the board (must be below 115)")]
    OutOfRange { index: usize },

    #[error("cell index {index} falls on padding column {col}")]
    Padding { index: usize, col: u8 },

    #[error("coordinates ({col}, {row}) are outside the 11x9 board")]
    OutOfBounds { col: u8, row: u8 },
}

/// Represents one of the two players.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// Returns the other side.
    pub const fn opponent(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Returns the player index (0 for the first mover, 1 for the second).
    pub const fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    /// Returns the side that moves at the given ply.
    pub const fn from_ply(ply: usize) -> Self {
        if ply % 2 == 0 {
            Side::First
        } else {
            Side::Second
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::First => write!(f, "player 1"),
            Side::Second => write!(f, "player 2"),
        }
    }
}

/// A playable cell on the padded grid.
/// Using a newtype ensures the index never points at padding.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Cell(u8);

impl Cell {
    /// Creates a cell from a padded-grid index.
    pub const fn new(index: u8) -> Option<Self> {
        if index < SIZE && index % PADDED_WIDTH < WIDTH {
            Some(Cell(index))
        } else {
            None
        }
    }

    /// Creates a cell from column and row, where (0, 0) is the bottom-right
    /// corner and values grow to the west and north.
    pub const fn from_coords(col: u8, row: u8) -> Option<Self> {
        if col < WIDTH && row < HEIGHT {
            Some(Cell(row * PADDED_WIDTH + col))
        } else {
            None
        }
    }

    /// Creates a cell from an untrusted index, reporting why it is invalid.
    pub fn try_from_index(index: usize) -> Result<Self, CellError> {
        if index >= SIZE as usize {
            return Err(CellError::OutOfRange { index });
        }
        let col = (index % PADDED_WIDTH as usize) as u8;
        if col >= WIDTH {
            return Err(CellError::Padding { index, col });
        }
        Ok(Cell(index as u8))
    }

    /// Creates a cell from untrusted coordinates.
    pub fn try_from_coords(col: u8, row: u8) -> Result<Self, CellError> {
        Cell::from_coords(col, row).ok_or(CellError::OutOfBounds { col, row })
    }

    /// Returns the padded-grid index.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the column (0 is the east edge).
    pub const fn col(self) -> u8 {
        self.0 % PADDED_WIDTH
    }

    /// Returns the row (0 is the south edge).
    pub const fn row(self) -> u8 {
        self.0 / PADDED_WIDTH
    }

    /// Returns the bitboard mask of this cell.
    pub const fn bit(self) -> u128 {
        1u128 << self.0
    }

    /// Returns the cell a knight reaches in the given direction, if it is on
    /// the board.
    pub const fn offset(self, dir: Direction) -> Option<Self> {
        let target = self.0 as i16 + dir.delta() as i16;
        if target < 0 || target > u8::MAX as i16 {
            return None;
        }
        Cell::new(target as u8)
    }

    /// Iterates over every playable cell in index order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..SIZE).filter_map(Cell::new)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the eight knight jumps.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    NNE,
    ENE,
    ESE,
    SSE,
    SSW,
    WSW,
    WNW,
    NNW,
}

impl Direction {
    /// All directions in move-generation order.
    pub const ALL: [Direction; 8] = [
        Direction::NNE,
        Direction::ENE,
        Direction::ESE,
        Direction::SSE,
        Direction::SSW,
        Direction::WSW,
        Direction::WNW,
        Direction::NNW,
    ];

    /// Returns the index delta on the padded grid.
    /// North is `+PADDED_WIDTH`, west is `+1`.
    pub const fn delta(self) -> i8 {
        const N: i8 = PADDED_WIDTH as i8;
        const S: i8 = -N;
        const W: i8 = 1;
        const E: i8 = -1;
        match self {
            Direction::NNE => N + N + E,
            Direction::ENE => E + N + E,
            Direction::ESE => E + S + E,
            Direction::SSE => S + S + E,
            Direction::SSW => S + S + W,
            Direction::WSW => W + S + W,
            Direction::WNW => W + N + W,
            Direction::NNW => N + N + W,
        }
    }
}

/// A move in knight's Isolation.
///
/// A player's first move places it anywhere open; every later move is a knight
/// jump relative to the player's current cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    Place(Cell),
    Jump(Direction),
}

impl Action {
    /// Returns the cell the mover lands on, given its cell before the move.
    ///
    /// `None` when a jump is applied to an unplaced player or leaves the board.
    pub fn landing(self, from: Option<Cell>) -> Option<Cell> {
        match (self, from) {
            (Action::Place(cell), _) => Some(cell),
            (Action::Jump(dir), Some(cell)) => cell.offset(dir),
            (Action::Jump(_), None) => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Place(cell) => write!(f, "@{}", cell),
            Action::Jump(dir) => write!(f, "{:?}", dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count() {
        assert_eq!(Cell::all().count(), CELL_COUNT);
        assert_eq!(SIZE, 115);
    }

    #[test]
    fn test_padding_rejected() {
        assert!(Cell::new(11).is_none());
        assert!(Cell::new(12).is_none());
        assert!(Cell::new(13).is_some());
        assert_eq!(
            Cell::try_from_index(24),
            Err(CellError::Padding { index: 24, col: 11 })
        );
        assert_eq!(
            Cell::try_from_index(115),
            Err(CellError::OutOfRange { index: 115 })
        );
    }

    #[test]
    fn test_coords_round_trip() {
        let cell = Cell::from_coords(4, 2).unwrap();
        assert_eq!(cell.index(), 30);
        assert_eq!((cell.col(), cell.row()), (4, 2));
        assert!(Cell::from_coords(11, 0).is_none());
        assert!(Cell::from_coords(0, 9).is_none());
    }

    #[test]
    fn test_offsets_never_wrap_rows() {
        for cell in Cell::all() {
            for dir in Direction::ALL {
                if let Some(target) = cell.offset(dir) {
                    let dc = (target.col() as i8 - cell.col() as i8).abs();
                    let dr = (target.row() as i8 - cell.row() as i8).abs();
                    assert!(
                        (dc, dr) == (1, 2) || (dc, dr) == (2, 1),
                        "{:?} from {} reached {}",
                        dir,
                        cell,
                        target
                    );
                }
            }
        }
    }

    #[test]
    fn test_corner_has_two_jumps() {
        let corner = Cell::from_coords(0, 0).unwrap();
        let jumps = Direction::ALL
            .iter()
            .filter(|&&d| corner.offset(d).is_some())
            .count();
        assert_eq!(jumps, 2);
    }

    #[test]
    fn test_landing() {
        let cell = Cell::from_coords(5, 4).unwrap();
        assert_eq!(Action::Place(cell).landing(None), Some(cell));
        assert_eq!(
            Action::Jump(Direction::NNE).landing(Some(cell)),
            Cell::from_coords(4, 6)
        );
        assert_eq!(Action::Jump(Direction::NNE).landing(None), None);
    }

    #[test]
    fn test_side_from_ply() {
        assert_eq!(Side::from_ply(0), Side::First);
        assert_eq!(Side::from_ply(7), Side::Second);
        assert_eq!(Side::First.opponent().index(), 1);
    }
}
