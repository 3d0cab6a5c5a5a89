//! 根の手を1つ探索するワーカースレッド

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

use crate::position::Position;
use crate::types::Value;

use super::alpha_beta::Searcher;
use super::session::SearchSession;

/// 終了通知（数を数えるセマフォ）
///
/// ワーカーは終了フラグを立ててから `post` する。スケジューラは `wait` 1回につき
/// 終わったワーカーを1つ回収する。
#[derive(Default)]
pub(crate) struct CompletionSignal {
    count: Mutex<usize>,
    cond: Condvar,
}

impl CompletionSignal {
    pub(crate) fn post(&self) {
        let mut count = self.count.lock();
        *count += 1;
        self.cond.notify_one();
    }

    pub(crate) fn wait(&self) {
        let mut count = self.count.lock();
        while *count == 0 {
            self.cond.wait(&mut count);
        }
        *count -= 1;
    }

    /// 回収済みのワーカーの分の通知を捨てる
    pub(crate) fn reset(&self) {
        *self.count.lock() = 0;
    }
}

/// スレッドを抜けるとき（panic を含む）に終了を知らせる
struct FinishNotice {
    finished: Arc<AtomicBool>,
    signal: Arc<CompletionSignal>,
}

impl Drop for FinishNotice {
    fn drop(&mut self) {
        self.finished.store(true, Ordering::Release);
        self.signal.post();
    }
}

/// 実行中のワーカー
pub(crate) struct Worker {
    finished: Arc<AtomicBool>,
    handle: JoinHandle<Value>,
}

impl Worker {
    /// `pos`（根の手を指した後の局面）を窓 (alpha, beta) で探索するスレッドを起こす
    pub(crate) fn spawn(
        slot: usize,
        session: Arc<SearchSession>,
        mut pos: Position,
        alpha: Value,
        beta: Value,
        signal: Arc<CompletionSignal>,
    ) -> std::io::Result<Self> {
        let finished = Arc::new(AtomicBool::new(false));
        let notify = FinishNotice {
            finished: Arc::clone(&finished),
            signal,
        };
        #[cfg(test)]
        {
            if slot >= session.faults().fail_spawn_from_slot.load(Ordering::Relaxed) {
                return Err(std::io::Error::other(format!("slot {slot} refused to spawn")));
            }
        }
        let handle = thread::Builder::new()
            .name(format!("hisha-worker-{slot}"))
            .spawn(move || {
                let _notify = notify;
                #[cfg(test)]
                {
                    if session.faults().panic_worker.load(Ordering::Relaxed) {
                        panic!("worker in slot {slot} failed");
                    }
                }
                let mut searcher = Searcher::new(&session);
                searcher.search(&mut pos, alpha, beta, 1)
            })?;
        Ok(Self { finished, handle })
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// スレッドの終了を待って値を受け取る。panic していれば `None`
    pub(crate) fn join(self) -> Option<Value> {
        self.handle.join().ok()
    }
}
