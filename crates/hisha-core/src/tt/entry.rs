//! 置換表エントリ

use crate::types::Value;

/// 探索窓に対する結果の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// 先手番: 真の値は [value, +∞)
    FailHigh,
    /// 後手番: 真の値は (-∞, value]
    FailLow,
    /// 先手番なら (-∞, value]、後手番なら [value, +∞)
    Unknown,
    /// 正確な値
    Determined,
}

/// 読み出したエントリの中身
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTData {
    /// 探索した残り深さ
    pub depth: i32,
    pub value: Value,
    pub bound: Bound,
}

/// 置換表エントリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    key: u64,
    data: TTData,
}

impl TTEntry {
    /// 空のエントリ（どの深さの要求にも使えない）
    pub const EMPTY: TTEntry = TTEntry {
        key: 0,
        data: TTData {
            depth: i32::MIN,
            value: Value::ZERO,
            bound: Bound::Unknown,
        },
    };

    #[inline]
    pub const fn new(key: u64, data: TTData) -> Self {
        TTEntry { key, data }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.depth == i32::MIN
    }

    /// キーが一致し、要求以上の深さで探索済みならその中身
    #[inline]
    pub fn read(&self, key: u64, depth: i32) -> Option<TTData> {
        (!self.is_empty() && self.key == key && self.data.depth >= depth).then_some(self.data)
    }
}
