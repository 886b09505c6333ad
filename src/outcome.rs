use std::fmt;

use crate::color::Color;

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameOverReason {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameOverReason::Checkmate => "checkmate",
            GameOverReason::Stalemate => "stalemate",
            GameOverReason::InsufficientMaterial => "insufficient material",
        };
        write!(f, "{}", s)
    }
}

/// Terminal verdict for a finished game. `winner` is `None` for draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameResult {
    winner: Option<Color>,
    reason: GameOverReason,
}

impl GameResult {
    pub fn win(winner: Color) -> Self {
        GameResult {
            winner: Some(winner),
            reason: GameOverReason::Checkmate,
        }
    }

    pub fn draw(reason: GameOverReason) -> Self {
        GameResult {
            winner: None,
            reason,
        }
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn reason(&self) -> GameOverReason {
        self.reason
    }

    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Some(color) => write!(f, "{} wins by {}", color, self.reason),
            None => write!(f, "draw by {}", self.reason),
        }
    }
}
