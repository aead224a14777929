//! Board symmetries used to fold opening paths onto one quadrant
//!
//! The 11x9 board has a Klein four-group of symmetries (identity, both flips and
//! the half turn). Each path is mapped by the symmetry that brings its first
//! cell into the canonical region: the bottom-right quadrant, both centerlines
//! included.

use std::borrow::Cow;

use isolation_core::{Cell, HEIGHT, WIDTH};

/// First column outside the canonical region.
pub const HORZ_MIDPOINT: u8 = WIDTH / 2 + 1;
/// First row outside the canonical region.
pub const VERT_MIDPOINT: u8 = HEIGHT / 2 + 1;

/// A symmetry of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    Identity,
    Rotate180,
    FlipHorizontal,
    FlipVertical,
}

impl Symmetry {
    /// All four symmetries.
    pub const ALL: [Symmetry; 4] = [
        Symmetry::Identity,
        Symmetry::Rotate180,
        Symmetry::FlipHorizontal,
        Symmetry::FlipVertical,
    ];

    /// Picks the symmetry that maps `cell` into the canonical region.
    ///
    /// Lower/right halves use `<`, upper/left halves use `>=`, so the four
    /// regions partition the board.
    pub fn for_cell(cell: Cell) -> Self {
        let upper = cell.row() >= VERT_MIDPOINT;
        let left = cell.col() >= HORZ_MIDPOINT;
        match (upper, left) {
            (false, false) => Symmetry::Identity,
            (true, true) => Symmetry::Rotate180,
            (false, true) => Symmetry::FlipHorizontal,
            (true, false) => Symmetry::FlipVertical,
        }
    }

    /// Applies the symmetry to a single cell.
    pub fn apply(self, cell: Cell) -> Cell {
        let (col, row) = (cell.col(), cell.row());
        let (col, row) = match self {
            Symmetry::Identity => return cell,
            Symmetry::Rotate180 => (WIDTH - 1 - col, HEIGHT - 1 - row),
            Symmetry::FlipHorizontal => (WIDTH - 1 - col, row),
            Symmetry::FlipVertical => (col, HEIGHT - 1 - row),
        };
        // Both mirrored coordinates stay within 0..WIDTH and 0..HEIGHT.
        Cell::from_coords(col, row).unwrap_or(cell)
    }

    /// Applies the symmetry to every cell of a path.
    pub fn apply_path(self, path: &[Cell]) -> Vec<Cell> {
        path.iter().map(|&cell| self.apply(cell)).collect()
    }
}

/// Returns true if `cell` lies in the canonical region.
pub fn is_canonical(cell: Cell) -> bool {
    Symmetry::for_cell(cell) == Symmetry::Identity
}

/// Maps a path onto the canonical orientation chosen by its first cell.
///
/// Paths that already start in the canonical region are borrowed unchanged.
pub fn canonicalize(path: &[Cell]) -> Cow<'_, [Cell]> {
    match path.first().map(|&start| Symmetry::for_cell(start)) {
        None | Some(Symmetry::Identity) => Cow::Borrowed(path),
        Some(symmetry) => Cow::Owned(symmetry.apply_path(path)),
    }
}
