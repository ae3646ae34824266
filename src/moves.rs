use std::ops::RangeInclusive;

use crate::board::{Board, Color, Piece, PieceType, Square};

pub const KING_HOME_COL: usize = 4;

const STRAIGHT: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1), (1, 2), (-1, 2), (-2, 1),
    (-2, -1), (-1, -2), (1, -2), (2, -1)
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// King side, the king lands on file g.
    Small,
    /// Queen side, the king lands on file c.
    Big,
}

impl CastleSide {
    pub fn rook_col(&self) -> usize {
        match self {
            CastleSide::Small => 7,
            CastleSide::Big => 0,
        }
    }

    pub fn king_destination(&self) -> usize {
        match self {
            CastleSide::Small => 6,
            CastleSide::Big => 2,
        }
    }

    pub fn rook_destination(&self) -> usize {
        match self {
            CastleSide::Small => 5,
            CastleSide::Big => 3,
        }
    }

    /// Columns that must be empty between king and rook.
    fn between(&self) -> RangeInclusive<usize> {
        match self {
            CastleSide::Small => 5..=6,
            CastleSide::Big => 1..=3,
        }
    }

    /// Columns the king stands on, crosses or lands on. None may be attacked.
    fn king_path(&self) -> RangeInclusive<usize> {
        match self {
            CastleSide::Small => 4..=6,
            CastleSide::Big => 2..=4,
        }
    }
}

/// Verdict of a piece rule for one candidate move, plus what the board has
/// to do besides relocating the piece.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub legal: bool,
    pub promotion: bool,
    pub creates_en_passant: bool,
    pub captures_en_passant: bool,
    pub small_castle: bool,
    pub big_castle: bool,
}

impl MoveOutcome {
    pub fn illegal() -> Self {
        MoveOutcome::default()
    }

    fn ordinary() -> Self {
        MoveOutcome { legal: true, ..MoveOutcome::default() }
    }

    fn promoting(self, promotion: bool) -> Self {
        MoveOutcome { promotion, ..self }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Castling {
    Considered,
    Ignored,
}

/// Geometric legality of moving the piece on `from` to `to` for `mover`.
/// Whether the move exposes the mover's own king is not considered.
pub fn move_outcome(board: &Board, from: Square, to: Square, mover: Color) -> MoveOutcome {
    outcome(board, from, to, mover, Castling::Considered)
}

fn outcome(board: &Board, from: Square, to: Square, mover: Color, castling: Castling) -> MoveOutcome {
    let kind = match board.piece_at(from) {
        None => return MoveOutcome::illegal(),
        Some(piece) => piece.kind,
    };
    if from == to {
        return MoveOutcome::illegal();
    }
    match kind {
        PieceType::King => king_outcome(board, from, to, mover, castling),
        PieceType::Queen => queen_outcome(board, from, to, mover),
        PieceType::Rook => rook_outcome(board, from, to, mover),
        PieceType::Bishop => bishop_outcome(board, from, to, mover),
        PieceType::Knight => knight_outcome(board, from, to, mover),
        PieceType::Pawn => pawn_outcome(board, from, to, mover),
    }
}

fn enterable(board: &Board, to: Square, mover: Color) -> bool {
    board.piece_at(to).map_or(true, |p| p.color != mover)
}

fn slide_reaches(board: &Board, from: Square, to: Square, directions: &[(i8, i8)]) -> bool {
    directions.iter().any(|&(d_row, d_col)| {
        let mut next = from.offset(d_row, d_col);
        while let Some(square) = next {
            if square == to {
                return true;
            }
            if board.piece_at(square).is_some() {
                return false;
            }
            next = square.offset(d_row, d_col);
        }
        false
    })
}

fn sliding_outcome(board: &Board, from: Square, to: Square, mover: Color, directions: &[(i8, i8)]) -> MoveOutcome {
    if slide_reaches(board, from, to, directions) && enterable(board, to, mover) {
        MoveOutcome::ordinary()
    }
    else {
        MoveOutcome::illegal()
    }
}

fn rook_outcome(board: &Board, from: Square, to: Square, mover: Color) -> MoveOutcome {
    sliding_outcome(board, from, to, mover, &STRAIGHT)
}

fn bishop_outcome(board: &Board, from: Square, to: Square, mover: Color) -> MoveOutcome {
    sliding_outcome(board, from, to, mover, &DIAGONAL)
}

fn queen_outcome(board: &Board, from: Square, to: Square, mover: Color) -> MoveOutcome {
    let diagonal = bishop_outcome(board, from, to, mover);
    if diagonal.legal {
        diagonal
    }
    else {
        rook_outcome(board, from, to, mover)
    }
}

fn knight_outcome(board: &Board, from: Square, to: Square, mover: Color) -> MoveOutcome {
    let jump = KNIGHT_JUMPS.iter().any(|&(d_row, d_col)| from.offset(d_row, d_col) == Some(to));
    if jump && enterable(board, to, mover) {
        MoveOutcome::ordinary()
    }
    else {
        MoveOutcome::illegal()
    }
}

fn king_outcome(board: &Board, from: Square, to: Square, mover: Color, castling: Castling) -> MoveOutcome {
    if from.row().abs_diff(to.row()) <= 1 && from.col().abs_diff(to.col()) <= 1 {
        return if enterable(board, to, mover) { MoveOutcome::ordinary() } else { MoveOutcome::illegal() };
    }
    let home = Square::at(mover.back_rank(), KING_HOME_COL);
    if castling == Castling::Ignored || from != home || to.row() != home.row() {
        return MoveOutcome::illegal();
    }
    for side in [CastleSide::Small, CastleSide::Big] {
        if to.col() == side.king_destination() && can_castle(board, mover, side) {
            return MoveOutcome {
                legal: true,
                small_castle: side == CastleSide::Small,
                big_castle: side == CastleSide::Big,
                ..MoveOutcome::default()
            };
        }
    }
    MoveOutcome::illegal()
}

fn pawn_outcome(board: &Board, from: Square, to: Square, mover: Color) -> MoveOutcome {
    let direction = mover.pawn_direction();
    let one = match from.offset(direction, 0) {
        None => return MoveOutcome::illegal(),
        Some(square) => square,
    };
    let reaches_last_rank = to.row() == mover.opposite().back_rank();

    if to == one {
        return if board.piece_at(one).is_none() {
            MoveOutcome::ordinary().promoting(reaches_last_rank)
        }
        else {
            MoveOutcome::illegal()
        };
    }

    if from.row() == mover.pawn_start_rank() && from.offset(2 * direction, 0) == Some(to) {
        return if board.piece_at(one).is_none() && board.piece_at(to).is_none() {
            MoveOutcome { creates_en_passant: true, ..MoveOutcome::ordinary() }
        }
        else {
            MoveOutcome::illegal()
        };
    }

    if to.row() == one.row() && from.col().abs_diff(to.col()) == 1 {
        return match board.piece_at(to) {
            Some(target) if target.color != mover => MoveOutcome::ordinary().promoting(reaches_last_rank),
            Some(_) => MoveOutcome::illegal(),
            None if board.en_passant_target() == Some(to) && en_passant_victim(board, from, to, mover) => {
                MoveOutcome { captures_en_passant: true, ..MoveOutcome::ordinary() }
            }
            None => MoveOutcome::illegal(),
        };
    }

    MoveOutcome::illegal()
}

fn en_passant_victim(board: &Board, from: Square, to: Square, mover: Color) -> bool {
    let behind = Square::at(from.row(), to.col());
    board.piece_at(behind) == Some(Piece::new(mover.opposite(), PieceType::Pawn))
}

/// Castling eligibility for `mover` on `side`: rights intact, king and rook
/// at home, nothing between them and no attacked square on the king's path.
pub fn can_castle(board: &Board, mover: Color, side: CastleSide) -> bool {
    let rights = board.castling_rights();
    if rights.king_moved(mover) || rights.rook_moved(mover, side) {
        return false;
    }
    let rank = mover.back_rank();
    if board.piece_at(Square::at(rank, KING_HOME_COL)) != Some(Piece::new(mover, PieceType::King)) {
        return false;
    }
    if board.piece_at(Square::at(rank, side.rook_col())) != Some(Piece::new(mover, PieceType::Rook)) {
        return false;
    }
    if side.between().any(|col| board.piece_at(Square::at(rank, col)).is_some()) {
        return false;
    }
    !side.king_path().any(|col| is_attacked(board, Square::at(rank, col), mover.opposite()))
}

/// Whether the `attacker` piece on `from` strikes `target`. Pawns strike
/// diagonally forward whether or not the target is occupied; kings never
/// castle onto a target.
pub fn attacks(board: &Board, from: Square, target: Square, attacker: Color) -> bool {
    match board.piece_at(from) {
        Some(piece) if piece.color == attacker => match piece.kind {
            PieceType::Pawn => {
                let direction = attacker.pawn_direction();
                from.offset(direction, -1) == Some(target) || from.offset(direction, 1) == Some(target)
            }
            _ => outcome(board, from, target, attacker, Castling::Ignored).legal,
        },
        _ => false,
    }
}

pub fn is_attacked(board: &Board, target: Square, attacker: Color) -> bool {
    Square::all().any(|from| attacks(board, from, target, attacker))
}

pub fn attackers(board: &Board, target: Square, attacker: Color) -> Vec<Square> {
    Square::all()
        .filter(|&from| attacks(board, from, target, attacker))
        .collect()
}

pub fn in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        None => false,
        Some(king) => is_attacked(board, king, color.opposite()),
    }
}

/// Brute force over every from/to pair of `color`.
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    Square::all()
        .filter(|&from| board.piece_at(from).is_some_and(|p| p.color == color))
        .any(|from| {
            Square::all()
                .filter(|&to| board.piece_at(to).map_or(true, |p| p.color != color))
                .any(|to| board.can_move(from, to))
        })
}

pub fn is_checkmate(board: &Board, color: Color) -> bool {
    in_check(board, color) && !has_legal_move(board, color)
}
