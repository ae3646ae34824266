use std::collections::HashSet;

use chess_rules::{new_board, Board, BoardBuilder, ChessError, Color, MoveReport, Piece, PieceType, Square};

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

fn piece_count(board: &Board) -> usize {
    Square::all().filter(|&s| board.piece_at(s).is_some()).count()
}

fn play_all(board: &mut Board, moves: &[(&str, &str)]) -> MoveReport {
    let mut last = MoveReport::not_moved();
    for (from, to) in moves {
        last = board.play(from, to).unwrap();
        assert!(last.moved, "{} to {} was rejected", from, to);
    }
    last
}

#[test]
fn fools_mate_ends_the_game() {
    let mut board = new_board();
    let report = play_all(&mut board, &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")]);
    assert_eq!(report, MoveReport { moved: true, promotion_pending: false, in_check: true, checkmate: true, captured: None });
    assert!(board.is_checkmate());
    assert_eq!(board.play("e2", "e3"), Err(ChessError::GameOver));
}

#[test]
fn scholars_mate_ends_the_game() {
    let mut board = new_board();
    let report = play_all(&mut board, &[
        ("e2", "e4"), ("e7", "e5"),
        ("f1", "c4"), ("b8", "c6"),
        ("d1", "h5"), ("g8", "f6"),
        ("h5", "f7"),
    ]);
    assert!(report.checkmate);
    assert_eq!(board.checking_squares(), vec![sq("f7")]);
}

#[test]
fn rejected_moves_never_change_the_board() {
    let mut board = new_board();
    play_all(&mut board, &[("e2", "e4"), ("d7", "d5")]);
    let before = board.clone();

    let attempts = [("e1", "e3"), ("f1", "f3"), ("g1", "g3"), ("a1", "a3"), ("e4", "e6"), ("e4", "d3"), ("e1", "g1")];
    for (from, to) in attempts {
        assert_eq!(board.play(from, to), Ok(MoveReport::not_moved()), "{} to {}", from, to);
        assert_eq!(board, before);
    }
    for (from, to) in [("d5", "d4"), ("e4", "e4"), ("e5", "e6"), ("e9", "e4")] {
        assert!(board.play(from, to).is_err());
        assert_eq!(board, before);
    }
}

#[test]
fn piece_count_never_grows() {
    let mut board = new_board();
    let mut count = piece_count(&board);
    let game = [
        ("e2", "e4"), ("d7", "d5"), ("e4", "d5"), ("d8", "d5"),
        ("b1", "c3"), ("d5", "a5"), ("d2", "d4"), ("c7", "c6"),
        ("g1", "f3"), ("c8", "g4"), ("f1", "e2"), ("e7", "e6"),
    ];
    for (from, to) in game {
        let side = board.color_to_play();
        assert!(board.play(from, to).unwrap().moved, "{} to {}", from, to);
        assert_eq!(board.color_to_play(), side.opposite());
        let now = piece_count(&board);
        assert!(now <= count);
        count = now;
    }
    assert_eq!(count, 30);
}

#[test]
fn en_passant_only_on_the_next_move() {
    let mut board = new_board();
    play_all(&mut board, &[("a2", "a3"), ("d7", "d5"), ("a3", "a4"), ("d5", "d4"), ("e2", "e4")]);
    assert_eq!(board.en_passant_target(), Some(sq("e3")));

    let mut taken = board.clone();
    let report = taken.play("d4", "e3").unwrap();
    assert!(report.moved);
    assert_eq!(report.captured, Some(Piece::new(Color::White, PieceType::Pawn)));
    assert_eq!(taken.piece_at(sq("e4")), None);
    assert_eq!(taken.piece_at(sq("e3")), Some(Piece::new(Color::Black, PieceType::Pawn)));

    play_all(&mut board, &[("h7", "h6"), ("h2", "h3")]);
    assert_eq!(board.play("d4", "e3"), Ok(MoveReport::not_moved()));
}

#[test]
fn castling_moves_king_and_rook_together() {
    let mut board = new_board();
    play_all(&mut board, &[("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6"), ("f1", "c4"), ("g8", "f6")]);
    assert!(board.legal_destinations(sq("e1")).contains(&sq("g1")));

    let report = board.play("e1", "g1").unwrap();
    assert!(report.moved);
    assert_eq!(board.piece_at(sq("g1")), Some(Piece::new(Color::White, PieceType::King)));
    assert_eq!(board.piece_at(sq("f1")), Some(Piece::new(Color::White, PieceType::Rook)));
    assert_eq!(board.piece_at(sq("h1")), None);
    assert_eq!(board.piece_at(sq("e1")), None);
}

#[test]
fn castling_rejected_when_path_is_attacked() {
    let mut builder = BoardBuilder::new();
    builder
        .piece(sq("e1"), Color::White, PieceType::King)
        .piece(sq("h1"), Color::White, PieceType::Rook)
        .piece(sq("a8"), Color::Black, PieceType::King)
        .piece(sq("c4"), Color::Black, PieceType::Bishop);
    let mut board = builder.build().unwrap();
    // the bishop covers f1
    assert_eq!(board.play("e1", "g1"), Ok(MoveReport::not_moved()));

    builder.clear(sq("c4"));
    let mut board = builder.build().unwrap();
    assert!(board.play("e1", "g1").unwrap().moved);
}

#[test]
fn castling_rejected_out_of_check() {
    let mut builder = BoardBuilder::new();
    builder
        .piece(sq("e1"), Color::White, PieceType::King)
        .piece(sq("a1"), Color::White, PieceType::Rook)
        .piece(sq("h8"), Color::Black, PieceType::King)
        .piece(sq("e7"), Color::Black, PieceType::Rook);
    let mut board = builder.build().unwrap();
    assert!(board.is_in_check());
    assert_eq!(board.play("e1", "c1"), Ok(MoveReport::not_moved()));
}

#[test]
fn self_check_is_rejected() {
    let mut builder = BoardBuilder::new();
    builder
        .piece(sq("e1"), Color::White, PieceType::King)
        .piece(sq("e2"), Color::White, PieceType::Rook)
        .piece(sq("e8"), Color::Black, PieceType::Rook)
        .piece(sq("h8"), Color::Black, PieceType::King);
    let mut board = builder.build().unwrap();
    let before = board.clone();
    assert_eq!(board.play("e2", "f2"), Ok(MoveReport::not_moved()));
    assert_eq!(board, before);
    assert_eq!(
        board.legal_destinations(sq("e2")),
        ["e3", "e4", "e5", "e6", "e7", "e8"].iter().map(|name| sq(name)).collect::<HashSet<Square>>()
    );
}

#[test]
fn promotion_round_trip() {
    let mut builder = BoardBuilder::new();
    builder
        .piece(sq("a1"), Color::White, PieceType::King)
        .piece(sq("g7"), Color::White, PieceType::Pawn)
        .piece(sq("e8"), Color::Black, PieceType::King)
        .piece(sq("h7"), Color::Black, PieceType::Pawn)
        .piece(sq("d7"), Color::Black, PieceType::Pawn)
        .piece(sq("f7"), Color::Black, PieceType::Pawn)
        .piece(sq("d6"), Color::White, PieceType::Queen);
    builder.castling_rights(chess_rules::CastlingRights::none());
    let mut board = builder.build().unwrap();

    let report = board.play("g7", "g8").unwrap();
    assert!(report.moved);
    assert!(report.promotion_pending);
    assert!(!report.checkmate);
    assert!(matches!(board.play("e8", "f8"), Err(ChessError::PromotionPending(_))));
    assert!(matches!(board.promote_letter("X"), Err(ChessError::InvalidPromotionPiece(_))));

    let report = board.promote_letter("Q").unwrap();
    assert!(report.in_check);
    assert!(report.checkmate);
    assert_eq!(board.piece_at(sq("g8")), Some(Piece::new(Color::White, PieceType::Queen)));
    assert_eq!(board.promote_letter("Q"), Err(ChessError::GameOver));
}

#[test]
fn underpromotion_to_knight() {
    let mut builder = BoardBuilder::new();
    builder
        .piece(sq("a1"), Color::White, PieceType::King)
        .piece(sq("f7"), Color::White, PieceType::Pawn)
        .piece(sq("h8"), Color::Black, PieceType::King)
        .piece(sq("h7"), Color::Black, PieceType::Pawn)
        .piece(sq("g7"), Color::Black, PieceType::Pawn);
    let mut board = builder.build().unwrap();
    assert!(board.play("f7", "f8").unwrap().promotion_pending);
    let report = board.promote(PieceType::Knight).unwrap();
    assert!(!report.in_check);
    assert_eq!(board.piece_at(sq("f8")), Some(Piece::new(Color::White, PieceType::Knight)));
    assert_eq!(board.color_to_play(), Color::Black);
}
