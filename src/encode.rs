//! Fixed-layout wire format for moves.
//!
//! A move is one tag byte, four coordinate bytes (from row, from col,
//! to row, to col), then a variant-specific tail:
//!
//! | Tag | Variant   | Tail                                  | Total |
//! |-----|-----------|---------------------------------------|-------|
//! | 0   | Standard  | none                                  | 5     |
//! | 1   | Castle    | rook-from row/col, rook-to row/col    | 9     |
//! | 2   | EnPassant | captured-square row/col               | 7     |
//! | 3   | Promotion | piece code                            | 6     |
//!
//! Decoding is strict: short input, extra bytes, unknown tags, coordinates
//! outside the board, and non-promotable piece codes are all rejected.

use arrayvec::ArrayVec;

use crate::errors::{ChessError, Result};
use crate::pieces::PieceType;
use crate::r#move::Move;
use crate::square::Square;

/// Longest encoded form (a castle).
pub const MAX_ENCODED_LEN: usize = 9;

const TAG_STANDARD: u8 = 0;
const TAG_CASTLE: u8 = 1;
const TAG_EN_PASSANT: u8 = 2;
const TAG_PROMOTION: u8 = 3;

fn piece_code(kind: PieceType) -> u8 {
    match kind {
        PieceType::Pawn => 0,
        PieceType::Knight => 1,
        PieceType::Bishop => 2,
        PieceType::Rook => 3,
        PieceType::Queen => 4,
        PieceType::King => 5,
    }
}

fn code_piece(code: u8) -> Result<PieceType> {
    let kind = match code {
        0 => PieceType::Pawn,
        1 => PieceType::Knight,
        2 => PieceType::Bishop,
        3 => PieceType::Rook,
        4 => PieceType::Queen,
        5 => PieceType::King,
        _ => return Err(ChessError::UnknownPieceCode(code)),
    };
    match kind {
        PieceType::Pawn | PieceType::King => Err(ChessError::InvalidPromotion(kind)),
        _ => Ok(kind),
    }
}

fn push_square(out: &mut ArrayVec<u8, MAX_ENCODED_LEN>, sq: Square) {
    out.push(sq.row() as u8);
    out.push(sq.col() as u8);
}

pub fn encode_move(mv: &Move) -> ArrayVec<u8, MAX_ENCODED_LEN> {
    let mut out = ArrayVec::new();

    match *mv {
        Move::Standard { from, to } => {
            out.push(TAG_STANDARD);
            push_square(&mut out, from);
            push_square(&mut out, to);
        }
        Move::Castle {
            from,
            to,
            rook_from,
            rook_to,
        } => {
            out.push(TAG_CASTLE);
            push_square(&mut out, from);
            push_square(&mut out, to);
            push_square(&mut out, rook_from);
            push_square(&mut out, rook_to);
        }
        Move::EnPassant { from, to, captured } => {
            out.push(TAG_EN_PASSANT);
            push_square(&mut out, from);
            push_square(&mut out, to);
            push_square(&mut out, captured);
        }
        Move::Promotion {
            from,
            to,
            promote_to,
        } => {
            out.push(TAG_PROMOTION);
            push_square(&mut out, from);
            push_square(&mut out, to);
            out.push(piece_code(promote_to));
        }
    }

    out
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn byte(&mut self) -> Result<u8> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or(ChessError::TruncatedMove)?;
        self.pos += 1;
        Ok(b)
    }

    fn square(&mut self) -> Result<Square> {
        let row = self.byte()? as i8;
        let col = self.byte()? as i8;
        Square::new(row, col)
    }

    fn finish(self) -> Result<()> {
        let rest = self.bytes.len() - self.pos;
        if rest > 0 {
            return Err(ChessError::TrailingBytes(rest));
        }
        Ok(())
    }
}

pub fn decode_move(bytes: &[u8]) -> Result<Move> {
    let mut r = Reader::new(bytes);

    let tag = r.byte()?;
    let from = r.square()?;
    let to = r.square()?;

    let mv = match tag {
        TAG_STANDARD => Move::Standard { from, to },
        TAG_CASTLE => Move::Castle {
            from,
            to,
            rook_from: r.square()?,
            rook_to: r.square()?,
        },
        TAG_EN_PASSANT => Move::EnPassant {
            from,
            to,
            captured: r.square()?,
        },
        TAG_PROMOTION => Move::Promotion {
            from,
            to,
            promote_to: code_piece(r.byte()?)?,
        },
        _ => return Err(ChessError::UnknownMoveTag(tag)),
    };

    r.finish()?;
    Ok(mv)
}
