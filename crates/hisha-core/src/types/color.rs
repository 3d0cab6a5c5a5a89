//! 手番（Color）

use std::fmt;

/// 手番（先手/後手）
///
/// 探索では先手を最大化側、後手を最小化側として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    /// 手番の数
    pub const NUM: usize = 2;

    /// 全ての手番
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    /// 相手番を返す
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// インデックスとして使用（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 前進方向の段の増分（先手は段が減る方向に進む）
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Black => -1,
            Color::White => 1,
        }
    }

    /// CSA形式の手番記号
    #[inline]
    pub const fn to_csa_char(self) -> char {
        match self {
            Color::Black => '+',
            Color::White => '-',
        }
    }

    /// CSA形式の手番記号から変換
    #[inline]
    pub const fn from_csa_char(c: char) -> Option<Color> {
        match c {
            '+' => Some(Color::Black),
            '-' => Some(Color::White),
            _ => None,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opponent()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => f.write_str("black"),
            Color::White => f.write_str("white"),
        }
    }
}
