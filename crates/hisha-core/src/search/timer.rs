//! 思考時間の監視
//!
//! 別スレッドで一定間隔ごとに経過時間を見て、持ち時間を使い切ったら
//! 探索の停止フラグを立てる。探索が先に終わったら `stop` で止める。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::info;

/// 時間切れ監視スレッド
pub struct Timer {
    done: Arc<AtomicBool>,
    fired: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Timer {
    /// 監視を始める
    pub fn start(stop: Arc<AtomicBool>, budget: Duration, interval: Duration) -> std::io::Result<Self> {
        let done = Arc::new(AtomicBool::new(false));
        let fired = Arc::new(AtomicBool::new(false));
        let handle = {
            let done = Arc::clone(&done);
            let fired = Arc::clone(&fired);
            thread::Builder::new().name("hisha-timer".to_string()).spawn(move || {
                let start = Instant::now();
                loop {
                    if done.load(Ordering::Acquire) || stop.load(Ordering::Relaxed) {
                        return;
                    }
                    let elapsed = start.elapsed();
                    if elapsed >= budget {
                        info!("time up after {elapsed:?}");
                        fired.store(true, Ordering::Release);
                        stop.store(true, Ordering::Relaxed);
                        return;
                    }
                    thread::sleep(interval.min(budget - elapsed));
                }
            })?
        };
        Ok(Self {
            done,
            fired,
            handle: Some(handle),
        })
    }

    /// 監視を止めてスレッドを回収する。時間切れで停止フラグを立てていれば true
    pub fn stop(mut self) -> bool {
        self.shutdown();
        self.fired.load(Ordering::Acquire)
    }

    fn shutdown(&mut self) {
        self.done.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            // 監視スレッドは panic しない
            let _ = handle.join();
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
