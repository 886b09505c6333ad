use std::fmt;

use crate::board::{BOARD_SIDE, Board};
use crate::color::Color;
use crate::errors::{ChessError, Result};
use crate::r#move::Move;
use crate::outcome::{GameOverReason, GameResult};
use crate::pieces::Piece;

/// Per-square legal-move lists, indexed `[row][col]`. Cells for empty or
/// enemy-occupied squares hold empty lists. A castle move lives in the
/// *rook's* cell, since the rook's eligibility test emits it.
pub type MoveGrid = [[Vec<Move>; BOARD_SIDE]; BOARD_SIDE];

/// Turn state machine over a [`Board`].
///
/// `Game` owns the board and the active color, and memoizes the most
/// recently generated move grid. It never switches turns on its own:
/// a lockstep client/server pair commits the move on both sides first,
/// then each calls [`Game::switch_turn`].
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    turn: Color,
    cached_moves: Option<(Color, MoveGrid)>,
}

impl Game {
    /// A fresh game: standard layout, White to move.
    pub fn new() -> Self {
        Game::with_board(Board::standard(), Color::White)
    }

    /// A game resumed from an arbitrary position.
    pub fn with_board(board: Board, turn: Color) -> Self {
        Game {
            board,
            turn,
            cached_moves: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access invalidates the memoized move grid.
    pub fn board_mut(&mut self) -> &mut Board {
        self.cached_moves = None;
        &mut self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn switch_turn(&mut self) {
        self.turn = self.turn.opposite();
    }

    // ---------------------------------------------------------------------
    // Move generation and validation
    // ---------------------------------------------------------------------

    /// Every legal move for the given color, grouped by the square of the
    /// piece that generates it.
    pub fn player_moves(&mut self, color: Color) -> Result<&MoveGrid> {
        let stale = match &self.cached_moves {
            Some((cached_for, _)) => *cached_for != color,
            None => true,
        };
        if stale {
            let grid = self.compute_moves(color)?;
            self.cached_moves = Some((color, grid));
        }

        match &self.cached_moves {
            Some((_, grid)) => Ok(grid),
            None => unreachable!("move grid was just populated"),
        }
    }

    fn compute_moves(&mut self, color: Color) -> Result<MoveGrid> {
        let mut grid = MoveGrid::default();
        for (at, piece) in self.board.pieces(color) {
            grid[at.row()][at.col()] = piece.valid_moves(&mut self.board, at)?;
        }
        Ok(grid)
    }

    /// Whether the received move is equivalent to one of the active color's
    /// legal moves. A `false` is a protocol violation for the hosting server
    /// to act on, not an engine error.
    pub fn is_valid_move(&mut self, mv: &Move) -> Result<bool> {
        let grid = self.player_moves(self.turn)?;
        Ok(grid
            .iter()
            .flatten()
            .flatten()
            .any(|legal| legal.is_equivalent_to(mv)))
    }

    /// Commits the move on the board. Does not switch turns and does not
    /// re-validate: callers gate on [`Game::is_valid_move`] first.
    pub fn handle_move(&mut self, mv: &Move) -> Result<Option<Piece>> {
        self.cached_moves = None;
        mv.apply(&mut self.board)
    }

    // ---------------------------------------------------------------------
    // Terminal states
    // ---------------------------------------------------------------------

    /// Both sides reduced to a single piece. The only insufficient-material
    /// shape the engine recognizes.
    pub fn bare_kings(&self) -> bool {
        self.board.pieces(Color::White).len() == 1 && self.board.pieces(Color::Black).len() == 1
    }

    /// True when the active color has no legal move anywhere, or the
    /// bare-kings condition holds.
    pub fn game_is_over(&mut self) -> Result<bool> {
        if self.bare_kings() {
            return Ok(true);
        }
        let grid = self.player_moves(self.turn)?;
        Ok(grid.iter().flatten().all(|cell| cell.is_empty()))
    }

    /// The terminal verdict. Fails with [`ChessError::GameNotOver`] while the
    /// active color still has a legal move.
    pub fn game_result(&mut self) -> Result<GameResult> {
        if self.bare_kings() {
            return Ok(GameResult::draw(GameOverReason::InsufficientMaterial));
        }

        let grid = self.player_moves(self.turn)?;
        if grid.iter().flatten().any(|cell| !cell.is_empty()) {
            return Err(ChessError::GameNotOver);
        }

        if self.board.is_in_check(self.turn)? {
            Ok(GameResult::win(self.turn.opposite()))
        } else {
            Ok(GameResult::draw(GameOverReason::Stalemate))
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "{} to move", self.turn)
    }
}
