//! 升目（Square）

use super::Color;

/// 升目（0-80）
///
/// 配置: 筋×9+段
/// SQ_11(1一)=0, SQ_12(1二)=1, ..., SQ_19(1九)=8, SQ_21(2一)=9, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// 升目の数
    pub const NUM: usize = 81;

    /// 1一
    pub const SQ_11: Square = Square(0);
    /// 5五（中央）
    pub const SQ_55: Square = Square(40);
    /// 9九
    pub const SQ_99: Square = Square(80);

    /// 筋(0-8)と段(0-8)から生成
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Square {
        debug_assert!(file < 9 && rank < 9);
        Square(file * 9 + rank)
    }

    /// u8から生成（範囲チェックあり）
    #[inline]
    pub const fn from_u8(n: u8) -> Option<Square> {
        if n < 81 { Some(Square(n)) } else { None }
    }

    /// 全升目
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM as u8).map(Square)
    }

    /// 筋（0=1筋）
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 / 9
    }

    /// 段（0=一段）
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 % 9
    }

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 内部値
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// (筋, 段) 方向にずらした升目（盤外ならNone）
    #[inline]
    pub const fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let f = self.file() as i8 + df;
        let r = self.rank() as i8 + dr;
        if f < 0 || f >= 9 || r < 0 || r >= 9 {
            None
        } else {
            Some(Square(f as u8 * 9 + r as u8))
        }
    }

    /// 手番から見た段（先手なら一段=0、後手なら九段=0）
    #[inline]
    pub const fn relative_rank(self, us: Color) -> u8 {
        match us {
            Color::Black => self.rank(),
            Color::White => 8 - self.rank(),
        }
    }

    /// 敵陣（成れる領域）かどうか
    #[inline]
    pub const fn in_promotion_zone(self, us: Color) -> bool {
        self.relative_rank(us) <= 2
    }

    /// USI形式の文字列（"7g"等）
    pub fn to_usi(self) -> String {
        let file = (b'1' + self.file()) as char;
        let rank = (b'a' + self.rank()) as char;
        format!("{file}{rank}")
    }

    /// USI形式の2文字から変換
    pub fn from_usi(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].checked_sub(b'1')?;
        let rank = bytes[1].checked_sub(b'a')?;
        (file < 9 && rank < 9).then(|| Square::new(file, rank))
    }

    /// CSA形式の2桁（"76"等）
    pub fn to_csa(self) -> String {
        format!("{}{}", self.file() + 1, self.rank() + 1)
    }

    /// CSA形式の2桁から変換（"00" は駒台なのでNone）
    pub fn from_csa(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].checked_sub(b'1')?;
        let rank = bytes[1].checked_sub(b'1')?;
        (file < 9 && rank < 9).then(|| Square::new(file, rank))
    }
}
