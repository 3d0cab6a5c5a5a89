//! 手駒（Hand）

use super::PieceType;

/// 片方の手番の手駒
///
/// 生駒の駒種（歩〜金）ごとの枚数を持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hand([u8; 7]);

impl Hand {
    /// 空の手駒
    pub const EMPTY: Hand = Hand([0; 7]);

    #[inline]
    fn slot(pt: PieceType) -> usize {
        debug_assert!(matches!(
            pt,
            PieceType::Pawn
                | PieceType::Lance
                | PieceType::Knight
                | PieceType::Silver
                | PieceType::Bishop
                | PieceType::Rook
                | PieceType::Gold
        ));
        pt as usize - 1
    }

    /// 枚数
    #[inline]
    pub fn count(&self, pt: PieceType) -> u8 {
        self.0[Self::slot(pt)]
    }

    /// 1枚加える
    #[inline]
    pub fn add(&mut self, pt: PieceType) {
        self.0[Self::slot(pt)] += 1;
    }

    /// n枚加える
    #[inline]
    pub fn add_n(&mut self, pt: PieceType, n: u8) {
        self.0[Self::slot(pt)] += n;
    }

    /// 1枚減らす
    #[inline]
    pub fn sub(&mut self, pt: PieceType) {
        let slot = Self::slot(pt);
        debug_assert!(self.0[slot] > 0);
        self.0[slot] -= 1;
    }

    /// 持っているかどうか
    #[inline]
    pub fn has(&self, pt: PieceType) -> bool {
        self.count(pt) > 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }
}
