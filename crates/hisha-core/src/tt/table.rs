//! TranspositionTable本体
//!
//! - 手番ごとの升配列（各升は `parking_lot::Mutex`）
//! - record: 窓に対する分類をつけて書き込む
//! - probe: 使えるエントリなら窓を狭め、確定できれば値を返す

use parking_lot::Mutex;

use super::entry::{Bound, TTData, TTEntry};
use super::KEY_SHIFT;
use crate::types::{Color, Value};

/// 置換表
///
/// セッションの間はサイズ固定。ロックは1升の読み書きの間だけ持ち、
/// 再帰呼び出しをまたいで持つことはない。
pub struct TranspositionTable {
    /// [先手番, 後手番]
    tables: [Box<[Mutex<TTEntry>]>; Color::NUM],
    mask: usize,
    /// これより浅い残り深さの結果は記録しない
    min_depth: i32,
}

impl TranspositionTable {
    /// 手番ごとに 2^bits 升の置換表を作る
    pub fn new(bits: u32, min_depth: i32) -> Self {
        let len = 1usize << bits;
        let alloc = || {
            (0..len)
                .map(|_| Mutex::new(TTEntry::EMPTY))
                .collect::<Vec<_>>()
                .into_boxed_slice()
        };
        Self {
            tables: [alloc(), alloc()],
            mask: len - 1,
            min_depth,
        }
    }

    /// 手番ごとの升数
    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// 記録する最小の残り深さ
    pub fn min_depth(&self) -> i32 {
        self.min_depth
    }

    /// 全升を空にする（新しい対局の開始時）
    pub fn clear(&self) {
        for table in &self.tables {
            for slot in table.iter() {
                *slot.lock() = TTEntry::EMPTY;
            }
        }
    }

    #[inline]
    fn slot(&self, us: Color, key: u64) -> &Mutex<TTEntry> {
        let index = (key >> KEY_SHIFT) as usize & self.mask;
        &self.tables[us.index()][index]
    }

    /// 探索結果を記録する
    ///
    /// `depth` は残り深さ。`alpha` / `beta` はそのノードを呼んだときの窓。
    pub fn record(&self, us: Color, key: u64, depth: i32, alpha: Value, beta: Value, value: Value) {
        if depth < self.min_depth {
            return;
        }
        // fail-hard の子は失敗した窓の端をそのまま返すので、端と等しい値は片側の限界として扱う
        let bound = match us {
            Color::Black if value >= beta => Bound::FailHigh,
            Color::Black if value <= alpha => Bound::Unknown,
            Color::White if value <= alpha => Bound::FailLow,
            Color::White if value >= beta => Bound::Unknown,
            _ => Bound::Determined,
        };
        *self.slot(us, key).lock() = TTEntry::new(key, TTData { depth, value, bound });
    }

    /// 置換表を引く
    ///
    /// 使えるエントリがなければ `None`。確定した値（または窓を超えたことを示す窓の端）が
    /// わかれば `Some`。それ以外は `alpha` / `beta` を狭めて `None` を返し、探索を続けさせる。
    pub fn probe(
        &self,
        us: Color,
        key: u64,
        depth: i32,
        alpha: &mut Value,
        beta: &mut Value,
    ) -> Option<Value> {
        let data = self.slot(us, key).lock().read(key, depth)?;
        match us {
            Color::Black => probe_black(data, alpha, beta),
            Color::White => probe_white(data, alpha, beta),
        }
    }

    /// エントリの中身を覗く（窓は変えない）
    pub fn peek(&self, us: Color, key: u64) -> Option<TTData> {
        self.slot(us, key).lock().read(key, i32::MIN + 1)
    }
}

fn probe_black(data: TTData, alpha: &mut Value, beta: &mut Value) -> Option<Value> {
    if data.bound == Bound::Unknown {
        *beta = data.value.min(*beta);
        // 上限が alpha 以下まで下がったら窓が空になる
        return (*beta <= *alpha).then_some(*beta);
    }
    if data.value >= *beta {
        return Some(*beta);
    }
    if data.bound == Bound::FailHigh {
        *alpha = data.value.max(*alpha);
        return None;
    }
    Some(data.value)
}

fn probe_white(data: TTData, alpha: &mut Value, beta: &mut Value) -> Option<Value> {
    if data.bound == Bound::Unknown {
        *alpha = data.value.max(*alpha);
        return (*alpha >= *beta).then_some(*alpha);
    }
    if data.value <= *alpha {
        return Some(*alpha);
    }
    if data.bound == Bound::FailLow {
        *beta = data.value.min(*beta);
        return None;
    }
    Some(data.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: u64 = 0x1234_5678_9abc_def0;

    fn v(n: i32) -> Value {
        Value::new(n)
    }

    #[test]
    fn test_record_classification_black() {
        let tt = TranspositionTable::new(10, 0);
        tt.record(Color::Black, KEY, 3, v(-10), v(10), v(10));
        assert_eq!(tt.peek(Color::Black, KEY).map(|d| d.bound), Some(Bound::FailHigh));
        tt.record(Color::Black, KEY, 3, v(-10), v(10), v(-20));
        assert_eq!(tt.peek(Color::Black, KEY).map(|d| d.bound), Some(Bound::Unknown));
        tt.record(Color::Black, KEY, 3, v(-10), v(10), v(-10));
        assert_eq!(tt.peek(Color::Black, KEY).map(|d| d.bound), Some(Bound::Unknown));
        tt.record(Color::Black, KEY, 3, v(-10), v(10), v(5));
        assert_eq!(tt.peek(Color::Black, KEY).map(|d| d.bound), Some(Bound::Determined));
    }

    #[test]
    fn test_record_classification_white() {
        let tt = TranspositionTable::new(10, 0);
        tt.record(Color::White, KEY, 3, v(-10), v(10), v(-10));
        assert_eq!(tt.peek(Color::White, KEY).map(|d| d.bound), Some(Bound::FailLow));
        tt.record(Color::White, KEY, 3, v(-10), v(10), v(30));
        assert_eq!(tt.peek(Color::White, KEY).map(|d| d.bound), Some(Bound::Unknown));
        tt.record(Color::White, KEY, 3, v(-10), v(10), v(0));
        assert_eq!(tt.peek(Color::White, KEY).map(|d| d.bound), Some(Bound::Determined));
        // 手番の違う表には入らない
        assert_eq!(tt.peek(Color::Black, KEY), None);
    }

    #[test]
    fn test_shallow_results_not_recorded() {
        let tt = TranspositionTable::new(10, 3);
        tt.record(Color::Black, KEY, 2, v(-10), v(10), v(0));
        assert_eq!(tt.peek(Color::Black, KEY), None);
        tt.record(Color::Black, KEY, 3, v(-10), v(10), v(0));
        assert!(tt.peek(Color::Black, KEY).is_some());
    }

    #[test]
    fn test_probe_depth_and_key() {
        let tt = TranspositionTable::new(10, 0);
        tt.record(Color::Black, KEY, 3, v(-10), v(10), v(5));
        let (mut a, mut b) = (v(-100), v(100));
        assert_eq!(tt.probe(Color::Black, KEY, 4, &mut a, &mut b), None);
        assert_eq!(tt.probe(Color::Black, KEY ^ 1, 3, &mut a, &mut b), None);
        assert_eq!(tt.probe(Color::Black, KEY, 3, &mut a, &mut b), Some(v(5)));
        assert_eq!((a, b), (v(-100), v(100)));
    }

    #[test]
    fn test_probe_black_tightens() {
        let tt = TranspositionTable::new(10, 0);
        // FailHigh(20): alpha が 20 に上がる
        tt.record(Color::Black, KEY, 3, v(-10), v(20), v(20));
        let (mut a, mut b) = (v(-100), v(100));
        assert_eq!(tt.probe(Color::Black, KEY, 3, &mut a, &mut b), None);
        assert_eq!((a, b), (v(20), v(100)));
        // 現在の beta 以下なら beta を返す
        let (mut a, mut b) = (v(-100), v(15));
        assert_eq!(tt.probe(Color::Black, KEY, 3, &mut a, &mut b), Some(v(15)));

        // Unknown(-30): beta が -30 に下がる
        tt.record(Color::Black, KEY, 3, v(-10), v(20), v(-30));
        let (mut a, mut b) = (v(-100), v(100));
        assert_eq!(tt.probe(Color::Black, KEY, 3, &mut a, &mut b), None);
        assert_eq!((a, b), (v(-100), v(-30)));
        // 窓が空になるならその上限で打ち切る
        let (mut a, mut b) = (v(-20), v(100));
        assert_eq!(tt.probe(Color::Black, KEY, 3, &mut a, &mut b), Some(v(-30)));
    }

    #[test]
    fn test_probe_white_tightens() {
        let tt = TranspositionTable::new(10, 0);
        // FailLow(-20): beta が -20 に下がる
        tt.record(Color::White, KEY, 3, v(-20), v(10), v(-20));
        let (mut a, mut b) = (v(-100), v(100));
        assert_eq!(tt.probe(Color::White, KEY, 3, &mut a, &mut b), None);
        assert_eq!((a, b), (v(-100), v(-20)));
        let (mut a, mut b) = (v(-15), v(100));
        assert_eq!(tt.probe(Color::White, KEY, 3, &mut a, &mut b), Some(v(-15)));

        // Unknown(30): alpha が 30 に上がる
        tt.record(Color::White, KEY, 3, v(-20), v(10), v(30));
        let (mut a, mut b) = (v(-100), v(100));
        assert_eq!(tt.probe(Color::White, KEY, 3, &mut a, &mut b), None);
        assert_eq!((a, b), (v(30), v(100)));
    }

    #[test]
    fn test_last_writer_wins_on_index_collision() {
        let tt = TranspositionTable::new(4, 0);
        let other = KEY ^ (1 << 40); // 同じインデックス、違うキー
        tt.record(Color::Black, KEY, 3, v(-10), v(10), v(1));
        tt.record(Color::Black, other, 3, v(-10), v(10), v(2));
        assert_eq!(tt.peek(Color::Black, KEY), None);
        assert_eq!(tt.peek(Color::Black, other).map(|d| d.value), Some(v(2)));
    }

    #[test]
    fn test_clear() {
        let tt = TranspositionTable::new(8, 0);
        tt.record(Color::White, KEY, 5, v(-10), v(10), v(0));
        tt.clear();
        assert_eq!(tt.peek(Color::White, KEY), None);
        assert_eq!(tt.capacity(), 256);
    }

    #[test]
    fn test_concurrent_writers() {
        let tt = std::sync::Arc::new(TranspositionTable::new(12, 0));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let tt = std::sync::Arc::clone(&tt);
                std::thread::spawn(move || {
                    for i in 0..1000u64 {
                        let key = (i << KEY_SHIFT) | t;
                        tt.record(Color::Black, key, 3, v(-10), v(10), v(0));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        // どの升も最後に書いたスレッドのキーを持つ
        for i in 0..1000u64 {
            let found = (0..4).filter(|&t| tt.peek(Color::Black, (i << KEY_SHIFT) | t).is_some()).count();
            assert_eq!(found, 1);
        }
    }
}
