use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Index for per-color array lookups: White = 0, Black = 1.
    pub const fn index(&self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Pawn advance direction along the row axis. White advances toward
    /// lower row indices, Black toward higher.
    pub const fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The rank this color's back-row pieces start on.
    pub const fn back_rank(&self) -> usize {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The far rank where this color's pawns promote.
    pub const fn promotion_row(&self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Color::White => "White",
            Color::Black => "Black",
        };
        write!(f, "{}", s)
    }
}
