use crate::board::Board;
use crate::color::Color;
use crate::errors::Result;
use crate::r#move::Move;
use crate::square::Square;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl std::fmt::Display for PieceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PieceType::Pawn => "pawn",
            PieceType::Knight => "knight",
            PieceType::Bishop => "bishop",
            PieceType::Rook => "rook",
            PieceType::Queen => "queen",
            PieceType::King => "king",
        };
        write!(f, "{}", s)
    }
}

/// The four piece types a pawn may promote to.
pub const PROMOTION_KINDS: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROYAL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_START_COL: u8 = 4;

/// A piece on the board. The grid is the source of truth for its current
/// square; `home` is the square it was created on and never changes. A piece
/// created by promotion inherits the pawn's `home`, so history-based
/// "has moved" queries stay meaningful for castling-relevant pieces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
    home: Square,
}

impl Piece {
    pub fn new(kind: PieceType, color: Color, home: Square) -> Self {
        Piece { kind, color, home }
    }

    pub fn home(&self) -> Square {
        self.home
    }

    /// Conventional point value. The king scores zero.
    pub fn value(&self) -> u32 {
        match self.kind {
            PieceType::Pawn => 1,
            PieceType::Knight => 3,
            PieceType::Bishop => 3,
            PieceType::Rook => 5,
            PieceType::Queen => 9,
            PieceType::King => 0,
        }
    }

    /// Single-letter rendering, uppercase for White.
    pub fn to_char(&self) -> char {
        let c = match self.kind {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };

        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    // ---------------------------------------------------------------------
    // Movement
    // ---------------------------------------------------------------------

    /// Squares this piece threatens to capture on, ignoring whether the
    /// occupant is friend or foe and ignoring check. This is what attack
    /// detection (is a king's square threatened) runs on.
    pub fn targeted_squares(&self, board: &Board, at: Square) -> Vec<Square> {
        match self.kind {
            PieceType::Pawn => {
                let dir = self.color.forward();
                [(dir, -1), (dir, 1)]
                    .iter()
                    .filter_map(|&(dr, dc)| at.offset(dr, dc))
                    .collect()
            }
            PieceType::Knight => KNIGHT_OFFSETS
                .iter()
                .filter_map(|&(dr, dc)| at.offset(dr, dc))
                .collect(),
            PieceType::King => ROYAL_DIRECTIONS
                .iter()
                .filter_map(|&(dr, dc)| at.offset(dr, dc))
                .collect(),
            PieceType::Bishop => slide(board, at, &BISHOP_DIRECTIONS),
            PieceType::Rook => slide(board, at, &ROOK_DIRECTIONS),
            PieceType::Queen => slide(board, at, &ROYAL_DIRECTIONS),
        }
    }

    /// Squares this piece could physically move to in one ply, excluding
    /// same-color occupancy. For pawns this is not a subset of the targeted
    /// set: forward pushes are reachable but never targeted.
    pub fn reachable_squares(&self, board: &Board, at: Square) -> Vec<Square> {
        match self.kind {
            PieceType::Pawn => self.pawn_reachable(board, at),
            _ => self
                .targeted_squares(board, at)
                .into_iter()
                .filter(|&sq| !board.is_occupied_by(sq, self.color))
                .collect(),
        }
    }

    fn pawn_reachable(&self, board: &Board, at: Square) -> Vec<Square> {
        let dir = self.color.forward();
        let mut out = Vec::new();

        if let Some(one) = at.offset(dir, 0) {
            if board.piece_at(one).is_none() {
                out.push(one);

                // Double push only while the pawn has never moved.
                if !board.history().has_moved(self) {
                    if let Some(two) = at.offset(2 * dir, 0) {
                        if board.piece_at(two).is_none() {
                            out.push(two);
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            if let Some(diag) = at.offset(dir, dc) {
                if board.is_occupied_by(diag, self.color.opposite()) {
                    out.push(diag);
                }
            }
        }

        out
    }

    /// Fully legal moves for this piece: reachable squares wrapped in the
    /// right move variant, filtered through the speculative check test, plus
    /// en passant and castling where eligible. Castling is emitted from the
    /// rook's square; its path safety was already established by
    /// [`Piece::can_castle`], so the speculative test waves it through.
    pub fn valid_moves(&self, board: &mut Board, at: Square) -> Result<Vec<Move>> {
        let mut candidates = Vec::new();

        for to in self.reachable_squares(board, at) {
            if self.kind == PieceType::Pawn && to.row() == self.color.promotion_row() {
                for kind in PROMOTION_KINDS {
                    candidates.push(Move::Promotion {
                        from: at,
                        to,
                        promote_to: kind,
                    });
                }
            } else {
                candidates.push(Move::Standard { from: at, to });
            }
        }

        if self.kind == PieceType::Pawn {
            if let Some((to, captured)) = self.en_passant_target(board, at) {
                candidates.push(Move::EnPassant {
                    from: at,
                    to,
                    captured,
                });
            }
        }

        if self.kind == PieceType::Rook && self.can_castle(board, at) {
            let king_square = board.king_square(self.color)?;
            if let Some(king) = board.piece_at(king_square) {
                if let Some((king_to, rook_to)) = king.castle_squares(king_square, at) {
                    candidates.push(Move::Castle {
                        from: king_square,
                        to: king_to,
                        rook_from: at,
                        rook_to,
                    });
                }
            }
        }

        let mut legal = Vec::new();
        for mv in candidates {
            if !mv.leaves_player_in_check(board)? {
                legal.push(mv);
            }
        }
        Ok(legal)
    }

    // ---------------------------------------------------------------------
    // Pawn: en passant
    // ---------------------------------------------------------------------

    /// The en passant destination for this pawn, if the immediately preceding
    /// committed move made one available.
    pub fn en_passant_square(&self, board: &Board, at: Square) -> Option<Square> {
        self.en_passant_target(board, at).map(|(to, _)| to)
    }

    /// (destination, captured pawn's square), or `None` if ineligible.
    /// Eligibility: the most recent history entry is a standard move of an
    /// enemy pawn that advanced exactly two rows, landing on this pawn's row
    /// in an adjacent column.
    fn en_passant_target(&self, board: &Board, at: Square) -> Option<(Square, Square)> {
        if self.kind != PieceType::Pawn {
            return None;
        }

        let entry = board.history().last()?;
        let Move::Standard { from, to } = entry.mv else {
            return None;
        };
        let moved = board.piece_at(to)?;

        if moved.kind != PieceType::Pawn || moved.color == self.color {
            return None;
        }
        if (to.row() as i8 - from.row() as i8).abs() != 2 {
            return None;
        }
        if to.row() != at.row() {
            return None;
        }

        let d_col = to.col() as i8 - at.col() as i8;
        if d_col.abs() != 1 {
            return None;
        }

        let dest = at.offset(self.color.forward(), d_col)?;
        Some((dest, to))
    }

    // ---------------------------------------------------------------------
    // Castling
    // ---------------------------------------------------------------------

    /// Whether this rook may castle with its king right now: rook on a back
    /// rank corner, king on its start column of that rank, neither ever
    /// moved, the squares between them empty, and no square the *king*
    /// starts on or passes through attacked by the enemy. Squares only the
    /// rook traverses are exempt from the attack check.
    pub fn can_castle(&self, board: &Board, at: Square) -> bool {
        if self.kind != PieceType::Rook {
            return false;
        }

        let rank = self.color.back_rank();
        if at.row() != rank || (at.col() != 0 && at.col() != 7) {
            return false;
        }

        let king_square = Square::from_coords(rank as u8, KING_START_COL);
        let Some(king) = board.piece_at(king_square) else {
            return false;
        };
        if king.kind != PieceType::King || king.color != self.color {
            return false;
        }

        if board.history().has_moved(self) || board.history().has_moved(&king) {
            return false;
        }

        let (low, high) = if at.col() < king_square.col() {
            (at.col(), king_square.col())
        } else {
            (king_square.col(), at.col())
        };
        for col in (low + 1)..high {
            if board.piece_at(Square::from_coords(rank as u8, col as u8)).is_some() {
                return false;
            }
        }

        let king_path: [usize; 3] = if at.col() == 7 {
            [4, 5, 6]
        } else {
            [4, 3, 2]
        };
        let enemy = self.color.opposite();
        for col in king_path {
            if board.is_attacked(Square::from_coords(rank as u8, col as u8), enemy) {
                return false;
            }
        }

        true
    }

    /// Castling destinations for this king with the given rook: (king's
    /// destination, rook's destination). Purely geometric — `None` unless the
    /// rook sits on the king's row at a corner column.
    pub fn castle_squares(&self, at: Square, rook_at: Square) -> Option<(Square, Square)> {
        if self.kind != PieceType::King || rook_at.row() != at.row() {
            return None;
        }

        let rank = at.row() as u8;
        match rook_at.col() {
            7 => Some((Square::from_coords(rank, 6), Square::from_coords(rank, 5))),
            0 => Some((Square::from_coords(rank, 2), Square::from_coords(rank, 3))),
            _ => None,
        }
    }
}

fn slide(board: &Board, at: Square, directions: &[(i8, i8)]) -> Vec<Square> {
    let mut out = Vec::new();

    for &(dr, dc) in directions {
        let mut current = at;
        while let Some(next) = current.offset(dr, dc) {
            out.push(next);
            // The first occupied square ends the ray; it stays targeted
            // regardless of occupant color.
            if board.piece_at(next).is_some() {
                break;
            }
            current = next;
        }
    }

    out
}
