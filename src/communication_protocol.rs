use crate::board::{Piece, PieceType};

/// Answer to a move request. `moved` is false when the move broke a piece
/// rule or would have left the mover's king in check.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MoveReport {
    pub moved: bool,
    pub promotion_pending: bool,
    pub in_check: bool,
    pub checkmate: bool,
    /// Piece taken by the move, the pawn removed en passant included.
    pub captured: Option<Piece>,
}

impl MoveReport {
    pub fn not_moved() -> Self {
        MoveReport::default()
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PromotionReport {
    pub in_check: bool,
    pub checkmate: bool,
}

#[derive(Debug, PartialEq, serde::Serialize)]
#[serde(tag = "msg_type")]
pub enum ShellMsg<'a> {
    Move { from: &'a str, to: &'a str, report: MoveReport },
    Promotion { piece: PieceType, report: PromotionReport },
    Error { reason: String },
}
