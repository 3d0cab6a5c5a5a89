//! 根の並列探索（ルートスプリット）
//!
//! 根の各手を1つのワーカーに割り当て、固定数のワーカーで並列に探索する。
//!
//! - 手は乱数で選んだ順に配る（未配布の手だけを、乱数の位置から線形に探す）
//! - 各ワーカーには配布時点の最善値で作った窓を渡す
//! - 配れる手がない・空きワーカーがないときは終了通知を待ち、1回の通知で1つ回収する
//! - 窓を超える手が見つかったら停止フラグを立て、残りのワーカーを全て回収してから返す
//!
//! 配布時の窓は最善値を1だけ緩めてあるので、最善値と同点の手も正確な値が返る。
//! 同点なら指し手リストで前の手を選ぶため、ワーカー数や回収順によらず
//! 逐次探索（`root::search_root`）と同じ手になる。

use std::sync::Arc;

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::position::Position;
use crate::types::{Color, Move, Value};

use super::session::{RootOutcome, SearchError, SearchSession};
use super::worker::{CompletionSignal, Worker};

/// 根の手の配布状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    Pending,
    /// 配布済み。渡した窓を覚えておく
    Running { alpha: Value, beta: Value },
    Done,
}

/// ワーカーの升
#[derive(Default)]
struct WorkerSlot {
    worker: Option<Worker>,
    move_index: Option<usize>,
}

/// 根の並列探索器
///
/// ワーカーの升は呼び出しをまたいで使い回す。探索から返るときは
/// 全ての升が空き（`busy_count() == 0`）になっている。
pub struct RootScheduler {
    slots: Vec<WorkerSlot>,
    idle: Vec<usize>,
    busy: Vec<usize>,
    signal: Arc<CompletionSignal>,
}

impl RootScheduler {
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        Self {
            slots: (0..threads).map(|_| WorkerSlot::default()).collect(),
            // 小さい番号の升から使う
            idle: (0..threads).rev().collect(),
            busy: Vec::with_capacity(threads),
            signal: Arc::new(CompletionSignal::default()),
        }
    }

    pub fn threads(&self) -> usize {
        self.slots.len()
    }

    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    pub fn busy_count(&self) -> usize {
        self.busy.len()
    }

    /// 根の手 `moves` を並列に探索し、最善の手を返す
    pub(crate) fn search(
        &mut self,
        session: &Arc<SearchSession>,
        pos: &Position,
        moves: &[Move],
    ) -> Result<RootOutcome, SearchError> {
        let us = pos.side_to_move();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(session.config().seed);
        let mut states = vec![Dispatch::Pending; moves.len()];
        let mut pending = moves.len();
        let mut best = RootOutcome {
            index: 0,
            value: match us {
                Color::Black => -Value::INFINITE,
                Color::White => Value::INFINITE,
            },
            cutoff: false,
        };

        loop {
            // 停止要求が出たら新しい手は配らない
            while pending > 0 && !session.stop_requested() {
                let Some(slot) = self.idle.pop() else {
                    break;
                };
                let index = pick_pending(&mut rng, &states);
                let (alpha, beta) = dispatch_window(us, best.value);
                states[index] = Dispatch::Running { alpha, beta };
                pending -= 1;

                let mut child = pos.clone();
                let _ = child.do_move(moves[index]);
                debug!("dispatch {} to slot {slot} window ({alpha}, {beta})", moves[index]);
                match Worker::spawn(slot, Arc::clone(session), child, alpha, beta, Arc::clone(&self.signal)) {
                    Ok(worker) => {
                        debug_assert!(self.slots[slot].worker.is_none(), "slot {slot} dispatched twice");
                        self.slots[slot] = WorkerSlot {
                            worker: Some(worker),
                            move_index: Some(index),
                        };
                        self.busy.push(slot);
                    }
                    Err(e) => {
                        self.idle.push(slot);
                        self.abort(session);
                        return Err(SearchError::Spawn(e));
                    }
                }
            }

            if self.busy.is_empty() {
                break;
            }

            self.signal.wait();
            let Some((slot, index, joined)) = self.harvest_one() else {
                continue;
            };
            let Some(value) = joined else {
                self.abort(session);
                return Err(SearchError::WorkerPanicked { slot });
            };
            let Dispatch::Running { alpha, beta } = states[index] else {
                debug_assert!(false, "move {index} finished without being dispatched");
                continue;
            };
            states[index] = Dispatch::Done;
            debug!("slot {slot} finished {}: {value}", moves[index]);

            // 停止要求の後に返った値は窓の端なので使わない
            if session.stop_requested() {
                continue;
            }
            if is_cutoff(us, value) {
                info!("root cutoff by {} ({value})", moves[index]);
                self.abort(session);
                return Ok(RootOutcome { index, value, cutoff: true });
            }
            if improves(us, value, index, alpha, beta, &best) {
                best = RootOutcome { index, value, cutoff: false };
            }
        }

        Ok(best)
    }

    /// 終わったワーカーを1つ回収する
    fn harvest_one(&mut self) -> Option<(usize, usize, Option<Value>)> {
        let pos = self
            .busy
            .iter()
            .position(|&slot| self.slots[slot].worker.as_ref().is_some_and(Worker::is_finished))?;
        let slot = self.busy.remove(pos);
        let entry = std::mem::take(&mut self.slots[slot]);
        self.idle.push(slot);
        let worker = entry.worker?;
        let index = entry.move_index?;
        Some((slot, index, worker.join()))
    }

    /// 停止フラグを立て、実行中のワーカーを全て回収する
    fn abort(&mut self, session: &SearchSession) {
        session.request_stop();
        for slot in std::mem::take(&mut self.busy) {
            let joined = self.slots[slot].worker.take().map(Worker::join);
            if joined == Some(None) {
                warn!("worker in slot {slot} panicked while draining");
            }
            self.slots[slot].move_index = None;
            self.idle.push(slot);
        }
        self.signal.reset();
    }
}

impl Drop for RootScheduler {
    fn drop(&mut self) {
        for slot in std::mem::take(&mut self.busy) {
            if let Some(worker) = self.slots[slot].worker.take() {
                let _ = worker.join();
            }
        }
    }
}

/// 未配布の手を1つ選ぶ
fn pick_pending(rng: &mut Xoshiro256PlusPlus, states: &[Dispatch]) -> usize {
    let n = states.len();
    let mut index = rng.random_range(0..n);
    while states[index] != Dispatch::Pending {
        index = (index + 1) % n;
    }
    index
}

/// 配布時の最善値から子に渡す窓を作る
fn dispatch_window(us: Color, best: Value) -> (Value, Value) {
    let one = Value::new(1);
    match us {
        Color::Black => (best - one, Value::INFINITE),
        Color::White => (-Value::INFINITE, best + one),
    }
}

/// 根の窓 (-INFINITE, INFINITE) を超えたか
fn is_cutoff(us: Color, value: Value) -> bool {
    match us {
        Color::Black => value >= Value::INFINITE,
        Color::White => value <= -Value::INFINITE,
    }
}

/// 最善手を更新するか
///
/// 同点のときは、値が窓の内側（正確な値）で、リストで前の手のときだけ更新する。
fn improves(us: Color, value: Value, index: usize, alpha: Value, beta: Value, best: &RootOutcome) -> bool {
    match us {
        Color::Black => value > best.value || (value == best.value && value > alpha && index < best.index),
        Color::White => value < best.value || (value == best.value && value < beta && index < best.index),
    }
}
