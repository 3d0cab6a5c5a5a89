//! 評価値（Value）
//!
//! 先手から見た駒得の値。`Value::INFINITE` は探索窓の端と
//! 王を取った局面（玉取り）・指し手のない局面（詰み）の番兵を兼ねる。

use std::fmt;

/// 評価値
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Value(i32);

impl Value {
    /// ゼロ
    pub const ZERO: Value = Value(0);
    /// 無限大
    pub const INFINITE: Value = Value(32001);

    /// 値から生成
    #[inline]
    pub const fn new(v: i32) -> Value {
        Value(v)
    }

    /// 生の値を取得
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// 番兵（±無限大以上）かどうか
    #[inline]
    pub const fn is_infinite(self) -> bool {
        self.0 >= Self::INFINITE.0 || self.0 <= -Self::INFINITE.0
    }
}

impl std::ops::Neg for Value {
    type Output = Value;

    #[inline]
    fn neg(self) -> Value {
        Value(-self.0)
    }
}

impl std::ops::Add for Value {
    type Output = Value;

    #[inline]
    fn add(self, rhs: Value) -> Value {
        Value(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Value {
    type Output = Value;

    #[inline]
    fn sub(self, rhs: Value) -> Value {
        Value(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Value {
    #[inline]
    fn add_assign(&mut self, rhs: Value) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Value {
    #[inline]
    fn sub_assign(&mut self, rhs: Value) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_ops() {
        let a = Value::new(300);
        let b = Value::new(100);
        assert_eq!(a + b, Value::new(400));
        assert_eq!(a - b, Value::new(200));
        assert_eq!(-a, Value::new(-300));
        let mut c = a;
        c -= b;
        assert_eq!(c, Value::new(200));
    }

    #[test]
    fn test_value_infinite() {
        assert!(Value::INFINITE.is_infinite());
        assert!((-Value::INFINITE).is_infinite());
        assert!((-Value::INFINITE - Value::new(1)).is_infinite());
        assert!(!Value::new(9999).is_infinite());
        assert!(Value::new(-1) < Value::ZERO);
    }
}
