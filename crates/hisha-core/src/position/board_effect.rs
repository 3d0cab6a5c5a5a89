//! 駒の利き
//!
//! 先手から見た (筋の増分, 段の増分) で各駒の動きを表し、後手は段の符号を反転して使う。
//! 盤面配列を直接たどるので Bitboard は持たない。

use crate::types::{Color, Piece, PieceType, Square};

use super::Position;

/// 一歩ずつの動き・飛び利きの方向（先手視点）
pub(crate) type Delta = (i8, i8);

const PAWN_STEPS: &[Delta] = &[(0, -1)];
const KNIGHT_STEPS: &[Delta] = &[(-1, -2), (1, -2)];
const SILVER_STEPS: &[Delta] = &[(-1, -1), (0, -1), (1, -1), (-1, 1), (1, 1)];
const GOLD_STEPS: &[Delta] = &[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (0, 1)];
const KING_STEPS: &[Delta] =
    &[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];
const DIAGONALS: &[Delta] = &[(-1, -1), (1, -1), (-1, 1), (1, 1)];
const ORTHOGONALS: &[Delta] = &[(0, -1), (-1, 0), (1, 0), (0, 1)];
const LANCE_SLIDE: &[Delta] = &[(0, -1)];

/// 一歩で動ける方向
#[inline]
pub(crate) const fn steps(pt: PieceType) -> &'static [Delta] {
    match pt {
        PieceType::Pawn => PAWN_STEPS,
        PieceType::Knight => KNIGHT_STEPS,
        PieceType::Silver => SILVER_STEPS,
        PieceType::Gold
        | PieceType::ProPawn
        | PieceType::ProLance
        | PieceType::ProKnight
        | PieceType::ProSilver => GOLD_STEPS,
        PieceType::King => KING_STEPS,
        PieceType::Horse => ORTHOGONALS,
        PieceType::Dragon => DIAGONALS,
        PieceType::Lance | PieceType::Bishop | PieceType::Rook => &[],
    }
}

/// 飛び利きの方向
#[inline]
pub(crate) const fn slides(pt: PieceType) -> &'static [Delta] {
    match pt {
        PieceType::Lance => LANCE_SLIDE,
        PieceType::Bishop | PieceType::Horse => DIAGONALS,
        PieceType::Rook | PieceType::Dragon => ORTHOGONALS,
        _ => &[],
    }
}

/// 手番に合わせて向きを直した方向
#[inline]
pub(crate) const fn oriented(d: Delta, c: Color) -> Delta {
    (d.0, d.1 * -c.forward())
}

impl Position {
    /// `sq` に手番 `by` の駒が利いているか
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        // 一歩の利き: 隣接8方向と桂の2方向から逆向きにたどる
        for &d in KING_STEPS.iter().chain(KNIGHT_STEPS) {
            let (df, dr) = oriented(d, by);
            let Some(from) = sq.offset(-df, -dr) else {
                continue;
            };
            let pc = self.piece_on(from);
            if pc.is_color(by) && pc.piece_type().is_some_and(|pt| steps(pt).contains(&d)) {
                return true;
            }
        }
        // 飛び利き: 最初に当たる駒だけを見る
        for &d in DIAGONALS.iter().chain(ORTHOGONALS) {
            let (df, dr) = oriented(d, by);
            let mut cur = sq;
            while let Some(from) = cur.offset(-df, -dr) {
                let pc = self.piece_on(from);
                if pc.is_some() {
                    if pc.is_color(by) && pc.piece_type().is_some_and(|pt| slides(pt).contains(&d))
                    {
                        return true;
                    }
                    break;
                }
                cur = from;
            }
        }
        false
    }

    /// 手番側の玉に王手がかかっているか（玉がなければfalse）
    #[inline]
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move();
        self.king_square(us).is_some_and(|ksq| self.is_attacked(ksq, !us))
    }

    /// `from` にある駒が `to` に利いているか
    pub(crate) fn piece_attacks(&self, pc: Piece, from: Square, to: Square) -> bool {
        let Some(pt) = pc.piece_type() else {
            return false;
        };
        let c = pc.color();
        for &d in steps(pt) {
            let (df, dr) = oriented(d, c);
            if from.offset(df, dr) == Some(to) {
                return true;
            }
        }
        for &d in slides(pt) {
            let (df, dr) = oriented(d, c);
            let mut cur = from;
            while let Some(next) = cur.offset(df, dr) {
                if next == to {
                    return true;
                }
                if self.piece_on(next).is_some() {
                    break;
                }
                cur = next;
            }
        }
        false
    }
}
