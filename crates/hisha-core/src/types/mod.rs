//! 基本型
//!
//! - `Color`: 手番
//! - `Square`: 升目（筋×9+段）
//! - `PieceType` / `Piece`: 駒種と先後付きの駒
//! - `Hand`: 手駒
//! - `Move` / `MoveList`: 指し手
//! - `Value`: 評価値

mod color;
mod hand;
mod moves;
mod piece;
mod square;
mod value;

pub use color::Color;
pub use hand::Hand;
pub use moves::{Move, MoveList};
pub use piece::{Piece, PieceType};
pub use square::Square;
pub use value::Value;
