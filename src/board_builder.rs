use crate::board::{Board, CastlingRights, Color, Piece, PieceType, Square, Squares, HEIGHT, WIDTH};
use crate::error::ChessError;
use crate::moves::{self, CastleSide};

/// A position that has not been checked yet.
///
/// Useful for setting up puzzles or tests without replaying a whole game.
/// Castling rights start intact, castling still needs the king and rook on
/// their home squares.
///
/// ```
/// use chess_rules::{BoardBuilder, Color, PieceType};
///
/// let board = BoardBuilder::new()
///     .piece("e1".parse().unwrap(), Color::White, PieceType::King)
///     .piece("e8".parse().unwrap(), Color::Black, PieceType::King)
///     .build()
///     .unwrap();
/// assert_eq!(board.color_to_play(), Color::White);
/// ```
#[derive(Debug, Clone)]
pub struct BoardBuilder {
    squares: Squares,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        BoardBuilder::new()
    }
}

impl BoardBuilder {
    pub fn new() -> BoardBuilder {
        BoardBuilder {
            squares: [[None; WIDTH]; HEIGHT],
            side_to_move: Color::White,
            castling: CastlingRights::default(),
            en_passant: None,
        }
    }

    pub fn piece(&mut self, square: Square, color: Color, kind: PieceType) -> &mut Self {
        self.squares[square.row()][square.col()] = Some(Piece::new(color, kind));
        self
    }

    pub fn clear(&mut self, square: Square) -> &mut Self {
        self.squares[square.row()][square.col()] = None;
        self
    }

    pub fn side_to_move(&mut self, color: Color) -> &mut Self {
        self.side_to_move = color;
        self
    }

    pub fn castling_rights(&mut self, rights: CastlingRights) -> &mut Self {
        self.castling = rights;
        self
    }

    pub fn king_moved(&mut self, color: Color) -> &mut Self {
        self.castling.set_king_moved(color);
        self
    }

    pub fn rook_moved(&mut self, color: Color, side: CastleSide) -> &mut Self {
        self.castling.set_rook_moved(color, side);
        self
    }

    /// The square skipped by the opponent's pawn on the previous move.
    pub fn en_passant(&mut self, square: Option<Square>) -> &mut Self {
        self.en_passant = square;
        self
    }

    pub fn build(&self) -> Result<Board, ChessError> {
        for color in [Color::White, Color::Black] {
            let kings = self.count(Piece::new(color, PieceType::King));
            if kings != 1 {
                return Err(ChessError::InvalidBoard("each side needs exactly one king"));
            }
        }
        let pawn_on_back_rank = (0..WIDTH).any(|col| {
            [0, HEIGHT - 1].iter().any(|&row| self.squares[row][col].is_some_and(|p| p.kind == PieceType::Pawn))
        });
        if pawn_on_back_rank {
            return Err(ChessError::InvalidBoard("pawns cannot stand on the first or last rank"));
        }
        if let Some(target) = self.en_passant {
            self.check_en_passant(target)?;
        }

        let mut board = Board {
            squares: self.squares,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            promotion: None,
            checkmate: false,
        };
        if moves::in_check(&board, self.side_to_move.opposite()) {
            return Err(ChessError::InvalidBoard("the side not to move is in check"));
        }
        board.checkmate = moves::is_checkmate(&board, self.side_to_move);
        log::debug!("Built board, {:?} to move", self.side_to_move);
        Ok(board)
    }

    fn count(&self, piece: Piece) -> usize {
        self.squares.iter().flatten().filter(|&&p| p == Some(piece)).count()
    }

    /// The target must sit right behind an opponent pawn that could have just
    /// made a double step.
    fn check_en_passant(&self, target: Square) -> Result<(), ChessError> {
        let opponent = self.side_to_move.opposite();
        let skipped_row = (opponent.pawn_start_rank() as i8 + opponent.pawn_direction()) as usize;
        let pawn = target.offset(opponent.pawn_direction(), 0);
        let pawn_in_place = pawn.is_some_and(|square| {
            self.squares[square.row()][square.col()] == Some(Piece::new(opponent, PieceType::Pawn))
        });
        if target.row() != skipped_row || !pawn_in_place || self.squares[target.row()][target.col()].is_some() {
            return Err(ChessError::InvalidBoard("en passant target does not follow a pawn double step"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::board::{CastlingRights, Color, PieceType, Square};
    use crate::board::Color::{Black, White};
    use crate::board_builder::BoardBuilder;
    use crate::error::ChessError;
    use crate::moves::CastleSide;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn kings() -> BoardBuilder {
        let mut builder = BoardBuilder::new();
        builder.piece(sq("e1"), White, PieceType::King).piece(sq("e8"), Black, PieceType::King);
        builder
    }

    #[test]
    fn test_build_valid_position() {
        let board = kings().side_to_move(Black).build().unwrap();
        assert_eq!(board.color_to_play(), Black);
        assert_eq!(board.castling_rights(), CastlingRights::default());
        assert!(!board.is_checkmate());
    }

    #[test]
    fn test_kings_required() {
        let mut builder = BoardBuilder::new();
        builder.piece(sq("e1"), White, PieceType::King);
        assert!(matches!(builder.build(), Err(ChessError::InvalidBoard(_))));

        let mut builder = kings();
        builder.piece(sq("a1"), White, PieceType::King);
        assert!(matches!(builder.build(), Err(ChessError::InvalidBoard(_))));

        builder.clear(sq("a1"));
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_side_not_to_move_in_check() {
        let mut builder = kings();
        builder.piece(sq("e4"), White, PieceType::Rook);
        assert!(matches!(builder.build(), Err(ChessError::InvalidBoard(_))));

        builder.side_to_move(Black);
        let board = builder.build().unwrap();
        assert!(board.is_in_check());
        assert!(!board.is_checkmate());
    }

    #[test]
    fn test_pawn_on_back_rank() {
        let mut builder = kings();
        builder.piece(sq("a8"), White, PieceType::Pawn);
        assert!(matches!(builder.build(), Err(ChessError::InvalidBoard(_))));
    }

    #[test]
    fn test_en_passant_target() {
        let mut builder = kings();
        builder.piece(sq("d5"), Black, PieceType::Pawn).piece(sq("e5"), White, PieceType::Pawn);
        builder.en_passant(Some(sq("d6")));
        let mut board = builder.build().unwrap();
        assert_eq!(board.en_passant_target(), Some(sq("d6")));
        assert!(board.play("e5", "d6").unwrap().moved);
        assert_eq!(board.piece_at(sq("d5")), None);

        builder.en_passant(Some(sq("e6")));
        assert!(matches!(builder.build(), Err(ChessError::InvalidBoard(_))));
    }

    #[test]
    fn test_detects_checkmate_on_build() {
        let mut builder = BoardBuilder::new();
        builder
            .piece(sq("h8"), Black, PieceType::King)
            .piece(sq("g7"), White, PieceType::Queen)
            .piece(sq("f6"), White, PieceType::King)
            .side_to_move(Black);
        let mut board = builder.build().unwrap();
        assert!(board.is_checkmate());
        assert_eq!(board.play("h8", "g8"), Err(ChessError::GameOver));
    }

    #[test]
    fn test_castling_flags() {
        let mut builder = kings();
        builder.piece(sq("h1"), White, PieceType::Rook).rook_moved(White, CastleSide::Small);
        let mut board = builder.build().unwrap();
        assert!(board.castling_rights().white_right_rook_moved);
        assert!(!board.play("e1", "g1").unwrap().moved);

        builder.castling_rights(CastlingRights::default()).king_moved(Color::Black);
        let mut board = builder.build().unwrap();
        assert!(board.castling_rights().black_king_moved);
        assert!(board.play("e1", "g1").unwrap().moved);
    }
}
