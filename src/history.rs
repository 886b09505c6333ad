use crate::pieces::Piece;
use crate::r#move::Move;

/// One committed move and whatever piece it captured. `captured` is `None`
/// for quiet moves and always `None` for castling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mv: Move,
    pub captured: Option<Piece>,
}

/// Append-only log of committed moves. Speculative apply/undo during check
/// testing never touches it; it grows monotonically for the life of a game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        History {
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any committed move ever vacated this piece's start square.
    /// This is the sole "has this piece moved" mechanism, so it drives both
    /// pawn double-push and castling eligibility.
    pub fn has_moved(&self, piece: &Piece) -> bool {
        self.entries.iter().any(|e| e.mv.moves_square(piece.home()))
    }
}
