pub mod board;
pub mod board_builder;
pub mod communication_protocol;
pub mod config;
pub mod error;
pub mod moves;

pub use crate::board::{new_board, Board, CastlingRights, Color, Piece, PieceType, Square, HEIGHT, WIDTH};
pub use crate::board_builder::BoardBuilder;
pub use crate::communication_protocol::{MoveReport, PromotionReport, ShellMsg};
pub use crate::config::{GlyphStyle, OutputMode, ShellConfig};
pub use crate::error::ChessError;
pub use crate::moves::{CastleSide, MoveOutcome};
