use crate::board::Board;
use crate::errors::{ChessError, Result};
use crate::history::HistoryEntry;
use crate::pieces::{PROMOTION_KINDS, Piece, PieceType};
use crate::square::Square;

/// The four move kinds. A move is a value: constructed once by legal-move
/// generation (or decoded off the wire) and never mutated.
///
/// For `Castle`, `from`/`to` are the king's squares. For `EnPassant`,
/// `captured` is the victim pawn's square: same row as `from`, same column
/// as `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Standard {
        from: Square,
        to: Square,
    },
    Castle {
        from: Square,
        to: Square,
        rook_from: Square,
        rook_to: Square,
    },
    EnPassant {
        from: Square,
        to: Square,
        captured: Square,
    },
    Promotion {
        from: Square,
        to: Square,
        promote_to: PieceType,
    },
}

impl Move {
    pub fn from_square(&self) -> Square {
        match self {
            Move::Standard { from, .. }
            | Move::Castle { from, .. }
            | Move::EnPassant { from, .. }
            | Move::Promotion { from, .. } => *from,
        }
    }

    pub fn to_square(&self) -> Square {
        match self {
            Move::Standard { to, .. }
            | Move::Castle { to, .. }
            | Move::EnPassant { to, .. }
            | Move::Promotion { to, .. } => *to,
        }
    }

    /// Whether applying this move vacates `sq` of its original occupant.
    /// Castling vacates both the king's and the rook's squares.
    pub fn moves_square(&self, sq: Square) -> bool {
        match self {
            Move::Castle {
                from, rook_from, ..
            } => *from == sq || *rook_from == sq,
            _ => self.from_square() == sq,
        }
    }

    /// Structural equality restricted to variant and variant-specific fields.
    /// This is the authority check a server runs to validate a move received
    /// over the wire against its own independently generated legal set.
    pub fn is_equivalent_to(&self, other: &Move) -> bool {
        self == other
    }

    // ---------------------------------------------------------------------
    // Apply / undo
    // ---------------------------------------------------------------------

    /// Commits this move: mutates the board and appends a history entry
    /// recording the move and whatever piece it captured. Preconditions are
    /// checked before any state changes.
    pub fn apply(&self, board: &mut Board) -> Result<Option<Piece>> {
        let captured = self.apply_to_board(board)?;
        board.record(HistoryEntry {
            mv: *self,
            captured,
        });
        Ok(captured)
    }

    /// Exactly reverses this move's board mutation, given the capture the
    /// apply reported. History is untouched: committed entries are never
    /// pruned, and the speculative path never wrote one.
    pub fn undo(&self, board: &mut Board, captured: Option<Piece>) -> Result<()> {
        self.undo_on_board(board, captured)
    }

    /// Speculatively applies this move, asks whether the mover's own king is
    /// then targeted, and reverses the mutation before returning — on every
    /// exit path. Fails if `from` is empty or the mover has no king, both
    /// checked before mutating.
    ///
    /// Castling reports `false` unconditionally: its check constraints are
    /// the rook's `can_castle` path-safety rule, enforced before a castle
    /// move is ever constructed.
    pub fn leaves_player_in_check(&self, board: &mut Board) -> Result<bool> {
        if let Move::Castle { .. } = self {
            return Ok(false);
        }

        let from = self.from_square();
        let piece = board.piece_at(from).ok_or(ChessError::EmptySquare(from))?;
        let color = piece.color;
        board.king_square(color)?;

        let captured = self.apply_to_board(board)?;
        let verdict = board.is_in_check(color);
        self.undo_on_board(board, captured)?;
        verdict
    }

    // Every precondition, including destination occupancy and square
    // distinctness, is checked before the first board mutation: an error
    // return always leaves the board exactly as it was.
    fn apply_to_board(&self, board: &mut Board) -> Result<Option<Piece>> {
        match *self {
            Move::Standard { from, to } => {
                board.piece_at(from).ok_or(ChessError::EmptySquare(from))?;
                if from == to {
                    return Err(ChessError::SquareOccupied(to));
                }
                let captured = board.remove_at(to);
                board.move_piece(from, to)?;
                Ok(captured)
            }
            Move::EnPassant { from, to, captured } => {
                board.piece_at(from).ok_or(ChessError::EmptySquare(from))?;
                if board.piece_at(to).is_some() {
                    return Err(ChessError::SquareOccupied(to));
                }
                // The victim square holds the victim, never the mover.
                if captured == from {
                    return Err(ChessError::EmptySquare(captured));
                }
                let victim = board.remove_at(captured);
                board.move_piece(from, to)?;
                Ok(victim)
            }
            Move::Promotion {
                from,
                to,
                promote_to,
            } => {
                if !PROMOTION_KINDS.contains(&promote_to) {
                    return Err(ChessError::InvalidPromotion(promote_to));
                }
                let pawn = board.piece_at(from).ok_or(ChessError::EmptySquare(from))?;
                if from == to {
                    return Err(ChessError::SquareOccupied(to));
                }
                let captured = board.remove_at(to);
                board.remove_at(from);
                board.add_piece(to, Piece::new(promote_to, pawn.color, pawn.home()))?;
                Ok(captured)
            }
            Move::Castle {
                from,
                to,
                rook_from,
                rook_to,
            } => {
                board.piece_at(from).ok_or(ChessError::EmptySquare(from))?;
                board
                    .piece_at(rook_from)
                    .ok_or(ChessError::EmptySquare(rook_from))?;
                // Once the king departs, the rook square must still hold the
                // rook and both destinations must be free.
                if rook_from == from {
                    return Err(ChessError::EmptySquare(rook_from));
                }
                if board.piece_at(to).is_some() {
                    return Err(ChessError::SquareOccupied(to));
                }
                if rook_to == to || board.piece_at(rook_to).is_some() {
                    return Err(ChessError::SquareOccupied(rook_to));
                }
                board.move_piece(from, to)?;
                board.move_piece(rook_from, rook_to)?;
                Ok(None)
            }
        }
    }

    fn undo_on_board(&self, board: &mut Board, captured: Option<Piece>) -> Result<()> {
        match *self {
            Move::Standard { from, to } => {
                board.move_piece(to, from)?;
                if let Some(piece) = captured {
                    board.add_piece(to, piece)?;
                }
                Ok(())
            }
            Move::EnPassant {
                from,
                to,
                captured: victim_square,
            } => {
                board.move_piece(to, from)?;
                if let Some(pawn) = captured {
                    board.add_piece(victim_square, pawn)?;
                }
                Ok(())
            }
            Move::Promotion { from, to, .. } => {
                let promoted = board.remove_at(to).ok_or(ChessError::EmptySquare(to))?;
                board.add_piece(
                    from,
                    Piece::new(PieceType::Pawn, promoted.color, promoted.home()),
                )?;
                if let Some(piece) = captured {
                    board.add_piece(to, piece)?;
                }
                Ok(())
            }
            Move::Castle {
                from,
                to,
                rook_from,
                rook_to,
            } => {
                if captured.is_some() {
                    return Err(ChessError::CastleCapture);
                }
                board.move_piece(to, from)?;
                board.move_piece(rook_to, rook_from)?;
                Ok(())
            }
        }
    }
}
