use std::fmt;

use crate::color::Color;
use crate::errors::{ChessError, Result};
use crate::history::{History, HistoryEntry};
use crate::pieces::{Piece, PieceType};
use crate::square::Square;

pub const BOARD_SIDE: usize = 8;

const BACK_RANK: [PieceType; BOARD_SIDE] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// The 8x8 grid, the per-color king cache, and the committed-move history.
///
/// `Board` is the sole owner of square occupancy and enforces only structural
/// invariants: one piece per square, at most one king per color. Chess
/// legality lives in the piece and move layers.
#[derive(Clone, Debug)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIDE * BOARD_SIDE],
    kings: [Option<Square>; 2],
    history: History,
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [None; BOARD_SIDE * BOARD_SIDE],
            kings: [None, None],
            history: History::new(),
        }
    }

    /// The standard starting layout. Row 0 is Black's back rank, row 7 is
    /// White's; pawns fill the adjacent ranks.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        board
            .populate_standard()
            .expect("standard layout is structurally valid");
        board
    }

    fn populate_standard(&mut self) -> Result<()> {
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            for color in [Color::Black, Color::White] {
                let back = Square::from_coords(color.back_rank() as u8, col);
                self.add_piece(back, Piece::new(kind, color, back))?;

                let pawn_row = (color.back_rank() as i8 + color.forward()) as u8;
                let front = Square::from_coords(pawn_row, col);
                self.add_piece(front, Piece::new(PieceType::Pawn, color, front))?;
            }
        }
        Ok(())
    }

    fn index(sq: Square) -> usize {
        sq.row() * BOARD_SIDE + sq.col()
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[Self::index(sq)]
    }

    pub fn is_occupied_by(&self, sq: Square, color: Color) -> bool {
        self.piece_at(sq).is_some_and(|p| p.color == color)
    }

    /// Every piece of the given color with its current square.
    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        let mut result = Vec::new();
        for row in 0..BOARD_SIDE {
            for col in 0..BOARD_SIDE {
                let sq = Square::from_coords(row as u8, col as u8);
                if let Some(piece) = self.piece_at(sq) {
                    if piece.color == color {
                        result.push((sq, piece));
                    }
                }
            }
        }
        result
    }

    pub fn king_square(&self, color: Color) -> Result<Square> {
        self.kings[color.index()].ok_or(ChessError::MissingKing(color))
    }

    /// Whether any piece of `by` targets this square.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        self.pieces(by)
            .iter()
            .any(|(at, piece)| piece.targeted_squares(self, *at).contains(&sq))
    }

    /// Whether this color's king is targeted by an enemy piece. Fails if the
    /// color has no king, which only constructed test boards can reach.
    pub fn is_in_check(&self, color: Color) -> Result<bool> {
        let king = self.king_square(color)?;
        Ok(self.is_attacked(king, color.opposite()))
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub(crate) fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// Grid and king-cache equality, ignoring history. This is the agreement
    /// check two lockstep engines run against each other, and what the
    /// apply/undo round-trip property asserts.
    pub fn same_position(&self, other: &Board) -> bool {
        self.squares == other.squares && self.kings == other.kings
    }

    // ---------------------------------------------------------------------
    // Mutation primitives
    // ---------------------------------------------------------------------

    /// Registers a piece on an empty square. Fails if the square is occupied
    /// or the piece is a second king for its color; on failure nothing
    /// changes.
    pub fn add_piece(&mut self, sq: Square, piece: Piece) -> Result<()> {
        if self.piece_at(sq).is_some() {
            return Err(ChessError::SquareOccupied(sq));
        }
        if piece.kind == PieceType::King {
            if self.kings[piece.color.index()].is_some() {
                return Err(ChessError::DuplicateKing(piece.color));
            }
            self.kings[piece.color.index()] = Some(sq);
        }
        self.squares[Self::index(sq)] = Some(piece);
        Ok(())
    }

    /// Detaches and returns the piece on this square, if any. Clears the
    /// king cache when removing a king.
    pub fn remove_at(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.squares[Self::index(sq)].take()?;
        if piece.kind == PieceType::King {
            self.kings[piece.color.index()] = None;
        }
        Some(piece)
    }

    /// Relocates the piece on `from` to the empty square `to`. Does not
    /// capture: callers relocating onto an occupied square must `remove_at`
    /// the occupant first, or the move is rejected.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<()> {
        let piece = self.piece_at(from).ok_or(ChessError::EmptySquare(from))?;
        if self.piece_at(to).is_some() {
            return Err(ChessError::SquareOccupied(to));
        }

        self.squares[Self::index(from)] = None;
        self.squares[Self::index(to)] = Some(piece);
        if piece.kind == PieceType::King {
            self.kings[piece.color.index()] = Some(to);
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..BOARD_SIDE {
            write!(f, "{} ", row)?;
            for col in 0..BOARD_SIDE {
                match self.piece_at(Square::from_coords(row as u8, col as u8)) {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for col in 0..BOARD_SIDE {
            write!(f, "{} ", col)?;
        }
        Ok(())
    }
}
