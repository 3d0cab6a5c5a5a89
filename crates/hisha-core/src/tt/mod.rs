//! 置換表モジュール
//!
//! 探索窓に対する結果をキャッシュする置換表（Transposition Table）。
//!
//! - `Bound`: 窓に対する結果の分類（FailHigh / FailLow / Unknown / Determined）
//! - `TTEntry`: エントリ（キー、残り深さ、値、分類）
//! - `TranspositionTable`: 先手番用・後手番用の2面のテーブル
//!
//! # 手番ごとに分ける理由
//!
//! 先手番の局面は最大化、後手番の局面は最小化で探索するため、同じ「窓を超えた」でも
//! 比較の向きが逆になる。先手番の表は {FailHigh, Unknown, Determined}、
//! 後手番の表は {FailLow, Unknown, Determined} だけを使う。
//!
//! インデックスはキーの bit16 以上の固定幅から取り、チェインはしない
//! （同じインデックスへの書き込みは常に後勝ち）。各升は個別のロックで守る。

mod entry;
mod table;

pub use entry::{Bound, TTData, TTEntry};
pub use table::TranspositionTable;

/// インデックスに使うキーの下位シフト量
pub const KEY_SHIFT: u32 = 16;
