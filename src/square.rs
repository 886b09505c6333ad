use std::fmt;

use crate::errors::{ChessError, Result};

/// An immutable board coordinate. Both axes are bounded to [0, 7]; a `Square`
/// that exists is always on the board. Row 0 is Black's back rank, row 7 is
/// White's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    pub fn new(row: i8, col: i8) -> Result<Self> {
        if Self::in_bounds(row, col) {
            Ok(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(ChessError::OutOfBounds { row, col })
        }
    }

    /// Constructor for coordinates already known to be on the board
    /// (fixed layouts, castling geometry).
    pub(crate) const fn from_coords(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8);
        Square { row, col }
    }

    pub const fn in_bounds(row: i8, col: i8) -> bool {
        row >= 0 && row < 8 && col >= 0 && col < 8
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn col(&self) -> usize {
        self.col as usize
    }

    /// The square `d_row`/`d_col` away, or `None` if that leaves the board.
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if Self::in_bounds(row, col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
