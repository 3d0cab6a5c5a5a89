//! 証明数・反証数（CN）
//!
//! 有限値は `IMMENSE` 未満に限り、それ以上になった和は無限大に飽和する。
//! 無限大は全ての有限値より大きく、無限大とだけ等しい。

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// 有限値の上限（これ以上は無限大）
pub const IMMENSE: u32 = 0x80000;

/// 証明数・反証数
///
/// 列挙子の順序で `Finite(_) < Infinite` になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cn {
    Finite(u32),
    Infinite,
}

impl Cn {
    pub const ZERO: Cn = Cn::Finite(0);
    pub const ONE: Cn = Cn::Finite(1);
    pub const INFINITE: Cn = Cn::Infinite;

    /// 値から生成（`IMMENSE` 以上は無限大）
    #[inline]
    pub const fn new(v: u32) -> Cn {
        if v >= IMMENSE { Cn::Infinite } else { Cn::Finite(v) }
    }

    #[inline]
    pub const fn is_infinite(self) -> bool {
        matches!(self, Cn::Infinite)
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        matches!(self, Cn::Finite(0))
    }

    /// 有限値ならその値
    #[inline]
    pub const fn value(self) -> Option<u32> {
        match self {
            Cn::Finite(v) => Some(v),
            Cn::Infinite => None,
        }
    }
}

impl Add for Cn {
    type Output = Cn;

    #[inline]
    fn add(self, rhs: Cn) -> Cn {
        match (self, rhs) {
            (Cn::Finite(a), Cn::Finite(b)) => Cn::new(a.saturating_add(b)),
            _ => Cn::Infinite,
        }
    }
}

impl Sub for Cn {
    type Output = Cn;

    /// 閾値の計算にだけ使う。無限大から引くと `IMMENSE` 基準の有限値に戻る
    #[inline]
    fn sub(self, rhs: Cn) -> Cn {
        match (self, rhs) {
            (_, Cn::Finite(0)) => self,
            (Cn::Infinite, Cn::Finite(b)) => Cn::new((IMMENSE - b.min(IMMENSE)).saturating_add(1)),
            (Cn::Finite(a), Cn::Finite(b)) => Cn::Finite(a.saturating_sub(b)),
            (_, Cn::Infinite) => {
                debug_assert!(false, "subtracting an infinite proof number");
                Cn::ZERO
            }
        }
    }
}

impl AddAssign for Cn {
    #[inline]
    fn add_assign(&mut self, rhs: Cn) {
        *self = *self + rhs;
    }
}

impl SubAssign for Cn {
    #[inline]
    fn sub_assign(&mut self, rhs: Cn) {
        *self = *self - rhs;
    }
}

impl Sum for Cn {
    fn sum<I: Iterator<Item = Cn>>(iter: I) -> Cn {
        iter.fold(Cn::ZERO, Add::add)
    }
}

impl fmt::Display for Cn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cn::Finite(v) => write!(f, "{v}"),
            Cn::Infinite => f.write_str("Inf"),
        }
    }
}
