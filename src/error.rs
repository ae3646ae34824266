use crate::board::Square;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("invalid square {text:?}: {reason}")]
    InvalidSquare { text: String, reason: &'static str },

    #[error("cannot promote to {0:?}, expected Q, R, N (or H) or B")]
    InvalidPromotionPiece(String),

    #[error("checkmate, the game is over and no more moves are allowed")]
    GameOver,

    #[error("the pawn on {0} needs to be promoted first")]
    PromotionPending(Square),

    #[error("there is no pawn to be promoted")]
    NoPromotionPending,

    #[error("from and to must be different squares")]
    SameSquare,

    #[error("there is no piece on {0}")]
    EmptySquare(Square),

    #[error("the piece on {0} does not belong to the player to move")]
    NotYourPiece(Square),

    #[error("invalid board: {0}")]
    InvalidBoard(&'static str),
}
