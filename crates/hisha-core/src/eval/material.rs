//! 駒割り評価

use crate::position::Position;
use crate::types::{Color, PieceType, Square, Value};

/// 盤上の駒の価値
#[inline]
pub const fn piece_value(pt: PieceType) -> Value {
    Value::new(match pt {
        PieceType::Pawn => 100,
        PieceType::Lance => 200,
        PieceType::Knight => 300,
        PieceType::Silver => 400,
        PieceType::Gold => 500,
        PieceType::Bishop => 800,
        PieceType::Rook => 1000,
        PieceType::King => 0,
        PieceType::ProPawn | PieceType::ProLance | PieceType::ProKnight | PieceType::ProSilver => {
            500
        }
        PieceType::Horse => 1300,
        PieceType::Dragon => 1500,
    })
}

/// 手駒1枚の価値（生駒の価値と同じ）
#[inline]
pub const fn hand_piece_value(pt: PieceType) -> Value {
    piece_value(pt.unpromote())
}

/// 局面全体から駒割りを計算し直す（先手から見た値）
///
/// 探索中は `Position` の差分更新値を使う。こちらは局面設定時と検証用。
pub fn evaluate(pos: &Position) -> Value {
    let mut v = Value::ZERO;
    for sq in Square::all() {
        let pc = pos.piece_on(sq);
        if let Some(pt) = pc.piece_type() {
            match pc.color() {
                Color::Black => v += piece_value(pt),
                Color::White => v -= piece_value(pt),
            }
        }
    }
    for pt in PieceType::HAND_PIECES {
        let diff = pos.hand(Color::Black).count(pt) as i32 - pos.hand(Color::White).count(pt) as i32;
        v += Value::new(hand_piece_value(pt).raw() * diff);
    }
    v
}
