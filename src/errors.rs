use crate::color::Color;
use crate::pieces::PieceType;
use crate::square::Square;

pub type Result<T> = std::result::Result<T, ChessError>;

/// Failure taxonomy for the engine.
///
/// Structural-invariant violations and missing-piece preconditions are caller
/// errors: every mutating operation either fully succeeds or is rejected
/// before any state change. A move that fails server-side validation is *not*
/// an error — `Game::is_valid_move` reports that as a plain `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("square {0} is already occupied")]
    SquareOccupied(Square),

    #[error("{0} already has a king on the board")]
    DuplicateKing(Color),

    #[error("no piece on square {0}")]
    EmptySquare(Square),

    #[error("coordinates ({row}, {col}) are outside the board")]
    OutOfBounds { row: i8, col: i8 },

    #[error("{0} has no king on the board")]
    MissingKing(Color),

    #[error("castling never captures")]
    CastleCapture,

    #[error("cannot promote a pawn to a {0}")]
    InvalidPromotion(PieceType),

    #[error("game is not over")]
    GameNotOver,

    #[error("move record is truncated")]
    TruncatedMove,

    #[error("move record has {0} trailing byte(s)")]
    TrailingBytes(usize),

    #[error("unknown move tag {0:#04x}")]
    UnknownMoveTag(u8),

    #[error("unknown piece code {0:#04x}")]
    UnknownPieceCode(u8),
}
