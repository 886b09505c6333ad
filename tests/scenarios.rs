//! End-to-end scenarios exercised through the public API, the way a lockstep
//! client/server pair would drive the engine.

use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rstest::rstest;

use relay_chess::board::Board;
use relay_chess::color::Color;
use relay_chess::encode::{decode_move, encode_move};
use relay_chess::game::Game;
use relay_chess::r#move::Move;
use relay_chess::outcome::GameOverReason;
use relay_chess::pieces::{Piece, PieceType};
use relay_chess::square::Square;

fn sq(row: i8, col: i8) -> Square {
    Square::new(row, col).expect("in-bounds square")
}

fn place(board: &mut Board, kind: PieceType, color: Color, row: i8, col: i8) -> Piece {
    let at = sq(row, col);
    let piece = Piece::new(kind, color, at);
    board.add_piece(at, piece).expect("empty square");
    piece
}

fn legal_moves(game: &mut Game) -> Vec<Move> {
    game.player_moves(game.turn())
        .expect("kings on board")
        .iter()
        .flatten()
        .flatten()
        .copied()
        .collect()
}

// ---------------------------------------------------------------------------
// Terminal states
// ---------------------------------------------------------------------------

#[test]
fn test_bare_kings_draw_by_insufficient_material() {
    let mut board = Board::empty();
    place(&mut board, PieceType::King, Color::White, 7, 4);
    place(&mut board, PieceType::King, Color::Black, 0, 4);
    let mut game = Game::with_board(board, Color::White);

    assert_eq!(game.game_is_over(), Ok(true));
    let result = game.game_result().expect("game over");
    assert_eq!(result.winner(), None);
    assert_eq!(result.reason(), GameOverReason::InsufficientMaterial);
}

#[test]
fn test_two_rook_checkmate() {
    let mut board = Board::empty();
    place(&mut board, PieceType::King, Color::White, 0, 0);
    place(&mut board, PieceType::King, Color::Black, 7, 7);
    place(&mut board, PieceType::Rook, Color::Black, 0, 7);
    place(&mut board, PieceType::Rook, Color::Black, 1, 7);
    let mut game = Game::with_board(board, Color::White);

    let result = game.game_result().expect("game over");
    assert_eq!(result.winner(), Some(Color::Black));
    assert_eq!(result.reason(), GameOverReason::Checkmate);
}

#[test]
fn test_two_rook_stalemate() {
    let mut board = Board::empty();
    place(&mut board, PieceType::King, Color::White, 0, 0);
    place(&mut board, PieceType::King, Color::Black, 7, 7);
    place(&mut board, PieceType::Rook, Color::Black, 1, 7);
    place(&mut board, PieceType::Rook, Color::Black, 7, 1);
    let mut game = Game::with_board(board, Color::White);

    let result = game.game_result().expect("game over");
    assert_eq!(result.winner(), None);
    assert_eq!(result.reason(), GameOverReason::Stalemate);
}

// ---------------------------------------------------------------------------
// En passant
// ---------------------------------------------------------------------------

#[test]
fn test_en_passant_after_double_push() {
    let mut board = Board::empty();
    place(&mut board, PieceType::King, Color::White, 7, 4);
    place(&mut board, PieceType::King, Color::Black, 0, 4);
    let white_pawn = place(&mut board, PieceType::Pawn, Color::White, 3, 4);
    place(&mut board, PieceType::Pawn, Color::Black, 1, 3);
    let mut game = Game::with_board(board, Color::Black);

    // Black's double push lands beside the white pawn.
    let double_push = Move::Standard {
        from: sq(1, 3),
        to: sq(3, 3),
    };
    assert_eq!(game.is_valid_move(&double_push), Ok(true));
    game.handle_move(&double_push).expect("legal move");
    game.switch_turn();

    assert_eq!(
        white_pawn.en_passant_square(game.board(), sq(3, 4)),
        Some(sq(2, 3))
    );

    let expected = Move::EnPassant {
        from: sq(3, 4),
        to: sq(2, 3),
        captured: sq(3, 3),
    };
    assert_eq!(game.is_valid_move(&expected), Ok(true));

    game.handle_move(&expected).expect("legal move");
    assert_eq!(game.board().piece_at(sq(3, 3)), None);
    assert_eq!(
        game.board().piece_at(sq(2, 3)).map(|p| (p.kind, p.color)),
        Some((PieceType::Pawn, Color::White))
    );
}

#[test]
fn test_en_passant_window_closes_after_another_move() {
    let mut board = Board::empty();
    place(&mut board, PieceType::King, Color::White, 7, 4);
    place(&mut board, PieceType::King, Color::Black, 0, 4);
    let white_pawn = place(&mut board, PieceType::Pawn, Color::White, 3, 4);
    place(&mut board, PieceType::Pawn, Color::Black, 1, 3);
    let mut game = Game::with_board(board, Color::Black);

    let double_push = Move::Standard {
        from: sq(1, 3),
        to: sq(3, 3),
    };
    game.handle_move(&double_push).expect("legal move");
    game.switch_turn();

    // White plays something else; the opportunity lapses.
    let king_step = Move::Standard {
        from: sq(7, 4),
        to: sq(7, 5),
    };
    game.handle_move(&king_step).expect("legal move");
    game.switch_turn();
    let black_reply = Move::Standard {
        from: sq(0, 4),
        to: sq(0, 5),
    };
    game.handle_move(&black_reply).expect("legal move");
    game.switch_turn();

    assert_eq!(white_pawn.en_passant_square(game.board(), sq(3, 4)), None);
    let stale = Move::EnPassant {
        from: sq(3, 4),
        to: sq(2, 3),
        captured: sq(3, 3),
    };
    assert_eq!(game.is_valid_move(&stale), Ok(false));
}

// ---------------------------------------------------------------------------
// Castling
// ---------------------------------------------------------------------------

#[test]
fn test_castling_available_then_spent_by_king_move() {
    let mut board = Board::empty();
    place(&mut board, PieceType::King, Color::White, 7, 4);
    let rook = place(&mut board, PieceType::Rook, Color::White, 7, 7);
    place(&mut board, PieceType::King, Color::Black, 0, 0);

    assert!(rook.can_castle(&board, sq(7, 7)));
    let king = board.piece_at(sq(7, 4)).expect("king placed");
    assert_eq!(
        king.castle_squares(sq(7, 4), sq(7, 7)),
        Some((sq(7, 6), sq(7, 5)))
    );

    // Stepping the king away and back burns the right for good.
    let away = Move::Standard {
        from: sq(7, 4),
        to: sq(6, 4),
    };
    let back = Move::Standard {
        from: sq(6, 4),
        to: sq(7, 4),
    };
    away.apply(&mut board).expect("legal move");
    back.apply(&mut board).expect("legal move");

    assert!(!rook.can_castle(&board, sq(7, 7)));
}

#[test]
fn test_castling_spent_by_rook_move() {
    let mut board = Board::empty();
    place(&mut board, PieceType::King, Color::White, 7, 4);
    let rook = place(&mut board, PieceType::Rook, Color::White, 7, 7);
    place(&mut board, PieceType::King, Color::Black, 0, 0);

    let away = Move::Standard {
        from: sq(7, 7),
        to: sq(5, 7),
    };
    let back = Move::Standard {
        from: sq(5, 7),
        to: sq(7, 7),
    };
    away.apply(&mut board).expect("legal move");
    back.apply(&mut board).expect("legal move");

    assert!(!rook.can_castle(&board, sq(7, 7)));
}

#[test]
fn test_kingside_castle_through_game() {
    let mut board = Board::empty();
    place(&mut board, PieceType::King, Color::White, 7, 4);
    place(&mut board, PieceType::Rook, Color::White, 7, 7);
    place(&mut board, PieceType::King, Color::Black, 0, 0);
    let mut game = Game::with_board(board, Color::White);

    let castle = Move::Castle {
        from: sq(7, 4),
        to: sq(7, 6),
        rook_from: sq(7, 7),
        rook_to: sq(7, 5),
    };
    assert_eq!(game.is_valid_move(&castle), Ok(true));
    game.handle_move(&castle).expect("legal move");

    assert_eq!(game.board().king_square(Color::White), Ok(sq(7, 6)));
    assert_eq!(
        game.board().piece_at(sq(7, 5)).map(|p| p.kind),
        Some(PieceType::Rook)
    );
    assert_eq!(game.board().piece_at(sq(7, 4)), None);
    assert_eq!(game.board().piece_at(sq(7, 7)), None);
}

// ---------------------------------------------------------------------------
// Promotion
// ---------------------------------------------------------------------------

#[rstest]
#[case(PieceType::Queen)]
#[case(PieceType::Rook)]
#[case(PieceType::Knight)]
#[case(PieceType::Bishop)]
fn test_every_promotion_choice_is_offered(#[case] kind: PieceType) {
    let mut board = Board::empty();
    place(&mut board, PieceType::King, Color::White, 7, 4);
    place(&mut board, PieceType::King, Color::Black, 0, 0);
    place(&mut board, PieceType::Pawn, Color::White, 1, 4);
    let mut game = Game::with_board(board, Color::White);

    let mv = Move::Promotion {
        from: sq(1, 4),
        to: sq(0, 4),
        promote_to: kind,
    };
    assert_eq!(game.is_valid_move(&mv), Ok(true));

    game.handle_move(&mv).expect("legal move");
    assert_eq!(
        game.board().piece_at(sq(0, 4)).map(|p| (p.kind, p.color)),
        Some((kind, Color::White))
    );
    assert_eq!(game.board().piece_at(sq(1, 4)), None);
}

// ---------------------------------------------------------------------------
// Playout properties
// ---------------------------------------------------------------------------

#[test]
fn test_random_playout_preserves_structural_invariants() {
    let mut game = Game::new();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..120 {
        if game.game_is_over().expect("kings on board") {
            break;
        }
        let moves = legal_moves(&mut game);
        let mv = *moves.choose(&mut rng).expect("game not over");

        // Every generated move passes its own validation and round-trips
        // through the wire format.
        assert_eq!(game.is_valid_move(&mv), Ok(true));
        let decoded = decode_move(&encode_move(&mv)).expect("well-formed record");
        assert!(decoded.is_equivalent_to(&mv));

        // Apply then undo restores the position exactly.
        let mut scratch = game.board().clone();
        let captured = mv.apply(&mut scratch).expect("legal move");
        mv.undo(&mut scratch, captured).expect("reversible");
        assert!(scratch.same_position(game.board()));

        game.handle_move(&mv).expect("legal move");
        // A committed legal move never leaves the mover in check.
        assert_eq!(game.board().is_in_check(game.turn()), Ok(false));
        game.switch_turn();

        // One king per color survives every committed move.
        game.board().king_square(Color::White).expect("white king");
        game.board().king_square(Color::Black).expect("black king");
        assert!(game.board().pieces(Color::White).len() <= 16);
        assert!(game.board().pieces(Color::Black).len() <= 16);
    }
}

#[test]
fn test_lockstep_pair_stays_in_agreement() {
    let mut server = Game::new();
    let mut client = Game::new();
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..60 {
        if client.game_is_over().expect("kings on board") {
            break;
        }
        let moves = legal_moves(&mut client);
        let mv = *moves.choose(&mut rng).expect("game not over");

        // The client ships bytes; the server decodes and validates against
        // its own independently generated legal set.
        let received = decode_move(&encode_move(&mv)).expect("well-formed record");
        assert_eq!(server.is_valid_move(&received), Ok(true));

        client.handle_move(&mv).expect("legal move");
        server.handle_move(&received).expect("legal move");
        client.switch_turn();
        server.switch_turn();

        assert!(server.board().same_position(client.board()));
        assert_eq!(server.turn(), client.turn());
    }

    assert_eq!(
        server.game_is_over().expect("kings on board"),
        client.game_is_over().expect("kings on board")
    );
}
