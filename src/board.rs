use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Color::{Black, White};
use crate::communication_protocol::{MoveReport, PromotionReport};
use crate::error::ChessError;
use crate::moves::{self, CastleSide, MoveOutcome, KING_HOME_COL};

pub const WIDTH: usize = 8;
pub const HEIGHT: usize = 8;

pub type Squares = [[Option<Piece>; WIDTH]; HEIGHT];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// Parses the letter a player types when promoting a pawn.
    /// `H` (horse) is accepted as an alias for the knight.
    pub fn from_promotion_letter(letter: &str) -> Result<PieceType, ChessError> {
        match letter.trim() {
            "Q" | "q" => Ok(PieceType::Queen),
            "R" | "r" => Ok(PieceType::Rook),
            "N" | "n" | "H" | "h" => Ok(PieceType::Knight),
            "B" | "b" => Ok(PieceType::Bishop),
            other => Err(ChessError::InvalidPromotionPiece(other.to_string())),
        }
    }

    pub fn is_promotion_target(&self) -> bool {
        matches!(self, PieceType::Queen | PieceType::Rook | PieceType::Knight | PieceType::Bishop)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White, Black
}

impl Color {
    pub fn opposite(&self) -> Color {
        if self == &Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Row holding this color's king and rooks at the start of the game.
    pub fn back_rank(&self) -> usize {
        match self {
            White => HEIGHT - 1,
            Black => 0,
        }
    }

    pub fn pawn_start_rank(&self) -> usize {
        match self {
            White => HEIGHT - 2,
            Black => 1,
        }
    }

    /// Row step of a pawn advance. White climbs towards row 0.
    pub fn pawn_direction(&self) -> i8 {
        match self {
            White => -1,
            Black => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self {
        Piece { color, kind }
    }

    /// Upper case for White, lower case for Black.
    pub fn letter(&self) -> char {
        let letter = match self.kind {
            PieceType::King => 'K',
            PieceType::Queen => 'Q',
            PieceType::Rook => 'R',
            PieceType::Bishop => 'B',
            PieceType::Knight => 'N',
            PieceType::Pawn => 'P',
        };
        if self.color == White { letter } else { letter.to_ascii_lowercase() }
    }
}

/// One of the 64 cells. Row 0 is rank 8, column 0 is file a.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SquareIndex")]
pub struct Square {
    row: usize,
    col: usize,
}

#[derive(Deserialize)]
struct SquareIndex {
    row: usize,
    col: usize,
}

impl TryFrom<SquareIndex> for Square {
    type Error = ChessError;

    fn try_from(index: SquareIndex) -> Result<Self, Self::Error> {
        Square::new(index.row, index.col).ok_or_else(|| ChessError::InvalidSquare {
            text: format!("({}, {})", index.row, index.col),
            reason: "row and column must be below 8",
        })
    }
}

impl Square {
    pub fn new(row: usize, col: usize) -> Option<Square> {
        (row < HEIGHT && col < WIDTH).then_some(Square { row, col })
    }

    pub(crate) const fn at(row: usize, col: usize) -> Square {
        Square { row, col }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if row >= 0 && row < HEIGHT as i8 && col >= 0 && col < WIDTH as i8 {
            Some(Square { row: row as usize, col: col as usize })
        }
        else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..HEIGHT).flat_map(|row| (0..WIDTH).map(move |col| Square { row, col }))
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &'static str| ChessError::InvalidSquare { text: text.to_string(), reason };
        let mut chars = text.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(invalid("a square has two characters, e.g. a2")),
        };
        if !('a'..='h').contains(&file) {
            return Err(invalid("column must be in [a, h]"));
        }
        if !('1'..='8').contains(&rank) {
            return Err(invalid("rank must be in [1, 8]"));
        }
        Ok(Square {
            row: ('8' as u8 - rank as u8) as usize,
            col: (file as u8 - b'a') as usize,
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col as u8) as char, HEIGHT - self.row)
    }
}

/// Whether each king and rook has ever left its starting square.
/// Flags only ever go from `false` to `true`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_king_moved: bool,
    pub white_left_rook_moved: bool,
    pub white_right_rook_moved: bool,
    pub black_king_moved: bool,
    pub black_left_rook_moved: bool,
    pub black_right_rook_moved: bool,
}

impl CastlingRights {
    /// Every king and rook has already moved.
    pub fn none() -> Self {
        CastlingRights {
            white_king_moved: true,
            white_left_rook_moved: true,
            white_right_rook_moved: true,
            black_king_moved: true,
            black_left_rook_moved: true,
            black_right_rook_moved: true,
        }
    }

    pub fn king_moved(&self, color: Color) -> bool {
        match color {
            White => self.white_king_moved,
            Black => self.black_king_moved,
        }
    }

    /// The rook starting on file a.
    pub fn left_rook_moved(&self, color: Color) -> bool {
        match color {
            White => self.white_left_rook_moved,
            Black => self.black_left_rook_moved,
        }
    }

    /// The rook starting on file h.
    pub fn right_rook_moved(&self, color: Color) -> bool {
        match color {
            White => self.white_right_rook_moved,
            Black => self.black_right_rook_moved,
        }
    }

    pub fn rook_moved(&self, color: Color, side: CastleSide) -> bool {
        match side {
            CastleSide::Small => self.right_rook_moved(color),
            CastleSide::Big => self.left_rook_moved(color),
        }
    }

    pub(crate) fn set_king_moved(&mut self, color: Color) {
        match color {
            White => self.white_king_moved = true,
            Black => self.black_king_moved = true,
        }
    }

    pub(crate) fn set_rook_moved(&mut self, color: Color, side: CastleSide) {
        match (color, side) {
            (White, CastleSide::Big) => self.white_left_rook_moved = true,
            (White, CastleSide::Small) => self.white_right_rook_moved = true,
            (Black, CastleSide::Big) => self.black_left_rook_moved = true,
            (Black, CastleSide::Small) => self.black_right_rook_moved = true,
        }
    }

    /// Marks the king or rook whose home square `from` is as moved.
    fn record_departure(&mut self, color: Color, from: Square) {
        if from.row() != color.back_rank() {
            return;
        }
        match from.col() {
            KING_HOME_COL => self.set_king_moved(color),
            col if col == CastleSide::Big.rook_col() => self.set_rook_moved(color, CastleSide::Big),
            col if col == CastleSide::Small.rook_col() => self.set_rook_moved(color, CastleSide::Small),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) squares: Squares,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) promotion: Option<Square>,
    pub(crate) checkmate: bool,
}

impl Default for Board {
    fn default() -> Self {
        new_board()
    }
}

impl Board {
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.row][square.col]
    }

    pub fn color_to_play(&self) -> Color {
        self.side_to_move
    }

    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Square skipped by the pawn double step played on the previous move.
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    /// Square of a pawn waiting for [`Board::promote`].
    pub fn pending_promotion(&self) -> Option<Square> {
        self.promotion
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&square| self.piece_at(square) == Some(Piece::new(color, PieceType::King)))
    }

    pub fn is_in_check(&self) -> bool {
        moves::in_check(self, self.side_to_move)
    }

    /// Squares of the enemy pieces currently attacking the king of the side to move.
    pub fn checking_squares(&self) -> Vec<Square> {
        match self.king_square(self.side_to_move) {
            None => Vec::new(),
            Some(king) => moves::attackers(self, king, self.side_to_move.opposite()),
        }
    }

    /// Every square the piece on `from` may legally move to right now.
    pub fn legal_destinations(&self, from: Square) -> HashSet<Square> {
        if self.checkmate || self.promotion.is_some() {
            return HashSet::new();
        }
        match self.piece_at(from) {
            Some(piece) if piece.color == self.side_to_move => Square::all()
                .filter(|&to| to != from && self.can_move(from, to))
                .collect(),
            _ => HashSet::new(),
        }
    }

    /// Parses both square names and plays the move.
    pub fn play(&mut self, from: &str, to: &str) -> Result<MoveReport, ChessError> {
        let move_from: Square = from.parse()?;
        let move_to: Square = to.parse()?;
        self.make_move(move_from, move_to)
    }

    pub fn make_move(&mut self, move_from: Square, move_to: Square) -> Result<MoveReport, ChessError> {
        if self.checkmate {
            return Err(ChessError::GameOver);
        }
        if let Some(square) = self.promotion {
            return Err(ChessError::PromotionPending(square));
        }
        if move_from == move_to {
            return Err(ChessError::SameSquare);
        }
        let piece = self.piece_at(move_from).ok_or(ChessError::EmptySquare(move_from))?;
        if piece.color != self.side_to_move {
            return Err(ChessError::NotYourPiece(move_from));
        }

        let mover = self.side_to_move;
        let outcome = moves::move_outcome(self, move_from, move_to, mover);
        if !outcome.legal {
            log::debug!("{:?} {:?} cannot move from {} to {}", mover, piece.kind, move_from, move_to);
            return Ok(MoveReport::not_moved());
        }

        let captured = if outcome.captures_en_passant {
            self.piece_at(Square::at(move_from.row, move_to.col))
        }
        else {
            self.piece_at(move_to)
        };
        let snapshot = self.squares;
        let previous_en_passant = self.en_passant;
        self.en_passant = None;
        if outcome.creates_en_passant {
            self.en_passant = Some(Square::at((move_from.row + move_to.row) / 2, move_from.col));
        }
        self.apply(move_from, move_to, &outcome, mover);

        if moves::in_check(self, mover) {
            self.squares = snapshot;
            self.en_passant = previous_en_passant;
            log::debug!("{:?} {} to {} would leave the king in check", mover, move_from, move_to);
            return Ok(MoveReport::not_moved());
        }

        if outcome.promotion {
            self.promotion = Some(move_to);
        }
        self.castling.record_departure(mover, move_from);
        self.side_to_move = mover.opposite();
        log::debug!("{:?} moved {:?} from {} to {}", mover, piece.kind, move_from, move_to);
        if let Some(taken) = captured {
            log::debug!("{:?} {:?} captured", taken.color, taken.kind);
        }

        let in_check = moves::in_check(self, self.side_to_move);
        if in_check && self.promotion.is_none() {
            self.checkmate = !moves::has_legal_move(self, self.side_to_move);
        }
        self.log_status(in_check);

        Ok(MoveReport {
            moved: true,
            promotion_pending: self.promotion.is_some(),
            in_check,
            checkmate: self.checkmate,
            captured,
        })
    }

    pub fn promote_letter(&mut self, letter: &str) -> Result<PromotionReport, ChessError> {
        let kind = PieceType::from_promotion_letter(letter)?;
        self.promote(kind)
    }

    /// Replaces the pending pawn with `kind`. The side to move already changed
    /// when the pawn arrived, so check is evaluated for the opponent of the
    /// promoting player.
    pub fn promote(&mut self, kind: PieceType) -> Result<PromotionReport, ChessError> {
        if self.checkmate {
            return Err(ChessError::GameOver);
        }
        if !kind.is_promotion_target() {
            return Err(ChessError::InvalidPromotionPiece(format!("{:?}", kind)));
        }
        let square = self.promotion.ok_or(ChessError::NoPromotionPending)?;
        if let Some(piece) = self.squares[square.row][square.col].as_mut() {
            piece.kind = kind;
        }
        self.promotion = None;
        log::debug!("Pawn on {} promoted to {:?}", square, kind);

        let in_check = moves::in_check(self, self.side_to_move);
        if in_check {
            self.checkmate = !moves::has_legal_move(self, self.side_to_move);
        }
        self.log_status(in_check);

        Ok(PromotionReport { in_check, checkmate: self.checkmate })
    }

    /// Whether the piece on `from` could legally move to `to`, judged on a
    /// scratch copy. Turn order and pending promotions are not consulted.
    pub fn can_move(&self, from: Square, to: Square) -> bool {
        let mover = match self.piece_at(from) {
            None => return false,
            Some(piece) => piece.color,
        };
        if from == to {
            return false;
        }
        let outcome = moves::move_outcome(self, from, to, mover);
        if !outcome.legal {
            return false;
        }
        let mut scratch = self.clone();
        scratch.apply(from, to, &outcome, mover);
        !moves::in_check(&scratch, mover)
    }

    fn apply(&mut self, move_from: Square, move_to: Square, outcome: &MoveOutcome, mover: Color) {
        if outcome.small_castle {
            self.castle(mover, CastleSide::Small);
        }
        else if outcome.big_castle {
            self.castle(mover, CastleSide::Big);
        }
        else {
            if outcome.captures_en_passant {
                self.squares[move_from.row][move_to.col] = None;
            }
            let piece = self.squares[move_from.row][move_from.col].take();
            self.squares[move_to.row][move_to.col] = piece;
        }
    }

    fn castle(&mut self, color: Color, side: CastleSide) {
        let rank = &mut self.squares[color.back_rank()];
        rank[side.king_destination()] = rank[KING_HOME_COL].take();
        rank[side.rook_destination()] = rank[side.rook_col()].take();
    }

    fn log_status(&self, in_check: bool) {
        if self.checkmate {
            log::info!("Checkmate, {:?} won", self.side_to_move.opposite());
        }
        else if in_check {
            log::info!("{:?} is in check", self.side_to_move);
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..HEIGHT {
            let line: String = self.squares[row].iter()
                .map(|square| square.map_or('.', |p| p.letter()))
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

fn new_pieces(color: Color) -> [Option<Piece>; WIDTH] {
    [
        Some(Piece::new(color, PieceType::Rook)),
        Some(Piece::new(color, PieceType::Knight)),
        Some(Piece::new(color, PieceType::Bishop)),
        Some(Piece::new(color, PieceType::Queen)),
        Some(Piece::new(color, PieceType::King)),
        Some(Piece::new(color, PieceType::Bishop)),
        Some(Piece::new(color, PieceType::Knight)),
        Some(Piece::new(color, PieceType::Rook))
    ]
}

fn new_pawns(color: Color) -> [Option<Piece>; WIDTH] {
    [Some(Piece::new(color, PieceType::Pawn)); WIDTH]
}

fn new_empty() -> [Option<Piece>; WIDTH] {
    [None; WIDTH]
}

pub fn new_board() -> Board {
    Board {
        squares: [
            new_pieces(Black),
            new_pawns(Black),
            new_empty(),
            new_empty(),
            new_empty(),
            new_empty(),
            new_pawns(White),
            new_pieces(White)
        ],
        side_to_move: White,
        castling: CastlingRights::default(),
        en_passant: None,
        promotion: None,
        checkmate: false,
    }
}
