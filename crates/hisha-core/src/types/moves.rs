//! 指し手（Move）

use std::fmt;

use smallvec::SmallVec;

use super::{PieceType, Square};

/// 指し手のリスト
///
/// 合法手は通常128手以内に収まるため、それを超えるときだけヒープに移る。
pub type MoveList = SmallVec<[Move; 128]>;

/// 指し手（32bit）
///
/// - bit 0-6: 移動先
/// - bit 7-13: 移動元（駒打ちのときは打つ駒種）
/// - bit 14: 駒打ちフラグ
/// - bit 15: 成りフラグ
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Move(u32);

impl Move {
    /// 無効な指し手
    pub const NONE: Move = Move(0);

    const DROP_FLAG: u32 = 1 << 14;
    const PROMOTE_FLAG: u32 = 1 << 15;

    /// 盤上の駒を動かす手
    #[inline]
    pub const fn normal(from: Square, to: Square, promote: bool) -> Move {
        let mut m = to.raw() as u32 | ((from.raw() as u32) << 7);
        if promote {
            m |= Self::PROMOTE_FLAG;
        }
        Move(m)
    }

    /// 駒打ち
    #[inline]
    pub const fn drop(pt: PieceType, to: Square) -> Move {
        Move(to.raw() as u32 | ((pt as u32) << 7) | Self::DROP_FLAG)
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    /// 移動先
    #[inline]
    pub fn to(self) -> Square {
        // 7bitに収まる値しか格納しない
        Square::from_u8((self.0 & 0x7f) as u8).unwrap_or(Square::SQ_11)
    }

    /// 移動元（駒打ちのときは呼ばない）
    #[inline]
    pub fn from(self) -> Square {
        debug_assert!(!self.is_drop());
        Square::from_u8(((self.0 >> 7) & 0x7f) as u8).unwrap_or(Square::SQ_11)
    }

    /// 打つ駒種（駒打ちでなければNone）
    #[inline]
    pub fn drop_piece(self) -> Option<PieceType> {
        if self.is_drop() {
            PieceType::from_u8(((self.0 >> 7) & 0x7f) as u8)
        } else {
            None
        }
    }

    #[inline]
    pub const fn is_drop(self) -> bool {
        self.0 & Self::DROP_FLAG != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.0 & Self::PROMOTE_FLAG != 0
    }

    /// 内部値
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// USI形式（"7g7f", "P*5e", "8h2b+"）
    pub fn to_usi(self) -> String {
        if self.is_none() {
            return "none".to_string();
        }
        if let Some(pt) = self.drop_piece() {
            return format!("{}*{}", pt.sfen_char(), self.to().to_usi());
        }
        let promote = if self.is_promotion() { "+" } else { "" };
        format!("{}{}{}", self.from().to_usi(), self.to().to_usi(), promote)
    }

    /// USI形式から変換（盤面を見ないので成り・打ちの妥当性は検査しない）
    pub fn from_usi(s: &str) -> Option<Move> {
        // 以降はバイト位置で切り出す
        if !s.is_ascii() || s.len() < 4 {
            return None;
        }
        let bytes = s.as_bytes();
        if bytes[1] == b'*' {
            let pt = PieceType::from_sfen_char(bytes[0] as char)?;
            if pt == PieceType::King || s.len() != 4 {
                return None;
            }
            return Some(Move::drop(pt, Square::from_usi(&s[2..4])?));
        }
        let from = Square::from_usi(&s[0..2])?;
        let to = Square::from_usi(&s[2..4])?;
        let promote = match &s[4..] {
            "" => false,
            "+" => true,
            _ => return None,
        };
        (from != to).then(|| Move::normal(from, to, promote))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_usi())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_usi())
    }
}
