//! 探索セッション
//!
//! 置換表・停止フラグ・ノード数・設定をまとめて持つ。1局を通して使い回し、
//! 新しい対局の開始時に `clear` する。各スレッドの探索器はセッションを共有参照で持つ。

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use thiserror::Error;

use crate::movegen::generate_legal;
use crate::position::Position;
use crate::tt::TranspositionTable;
use crate::types::{Move, MoveList, Value};

use super::config::{ConfigError, SearchConfig};
use super::root::search_root;
use super::split::RootScheduler;
use super::timer::Timer;

/// 探索のエラー
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search config: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("failed to spawn search thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("search worker in slot {slot} panicked")]
    WorkerPanicked { slot: usize },
    #[error("no legal moves in the root position")]
    NoLegalMoves,
}

/// 1手分の探索結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    /// 根の指し手リスト内での位置
    pub best_index: usize,
    /// 先手から見た評価値
    pub value: Value,
    /// 根で窓を超える手が見つかり、残りを打ち切った
    pub cutoff: bool,
    /// 思考時間切れで止まった
    pub timed_out: bool,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// 根の探索の中間結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RootOutcome {
    pub index: usize,
    pub value: Value,
    pub cutoff: bool,
}

/// ワーカーに故障を起こさせる設定（テスト用）
#[cfg(test)]
pub(crate) struct FaultInjection {
    /// 立っていればワーカーは探索せずに panic する
    pub(crate) panic_worker: AtomicBool,
    /// この番号以上の升ではスレッドを起こせない
    pub(crate) fail_spawn_from_slot: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl Default for FaultInjection {
    fn default() -> Self {
        Self {
            panic_worker: AtomicBool::new(false),
            fail_spawn_from_slot: std::sync::atomic::AtomicUsize::new(usize::MAX),
        }
    }
}

/// 探索セッション
pub struct SearchSession {
    config: SearchConfig,
    tt: TranspositionTable,
    stop: Arc<AtomicBool>,
    nodes: AtomicU64,
    #[cfg(test)]
    faults: FaultInjection,
}

impl SearchSession {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let tt = TranspositionTable::new(config.tt_bits, config.tt_min_depth);
        Ok(Self {
            config,
            tt,
            stop: Arc::new(AtomicBool::new(false)),
            nodes: AtomicU64::new(0),
            #[cfg(test)]
            faults: FaultInjection::default(),
        })
    }

    #[cfg(test)]
    pub(crate) fn faults(&self) -> &FaultInjection {
        &self.faults
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// 置換表を空にする
    pub fn clear(&self) {
        self.tt.clear();
        self.nodes.store(0, Ordering::Relaxed);
    }

    /// 探索の停止を要求する
    ///
    /// 立てたフラグは次の探索の開始まで下ろさない。
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub(crate) fn stop_flag(&self) -> &AtomicBool {
        &self.stop
    }

    /// 直近の探索で数えたノード数
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    pub(crate) fn add_nodes(&self, n: u64) {
        self.nodes.fetch_add(n, Ordering::Relaxed);
    }

    fn begin(&self) {
        self.stop.store(false, Ordering::Relaxed);
        self.nodes.store(0, Ordering::Relaxed);
    }

    fn start_timer(&self) -> Result<Option<Timer>, SearchError> {
        match self.config.thinking_time {
            Some(budget) => {
                Ok(Some(Timer::start(Arc::clone(&self.stop), budget, self.config.timer_interval)?))
            }
            None => Ok(None),
        }
    }

    /// 根の手をワーカーに配って並列に探索する
    pub fn run(self: &Arc<Self>, pos: &Position) -> Result<SearchResult, SearchError> {
        let mut moves = MoveList::new();
        generate_legal(pos, &mut moves);
        self.run_moves(pos, &moves)
    }

    /// 与えた指し手リストを根の候補として並列に探索する
    pub fn run_moves(
        self: &Arc<Self>,
        pos: &Position,
        moves: &[Move],
    ) -> Result<SearchResult, SearchError> {
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }
        self.begin();
        let start = Instant::now();
        info!(
            "search start: {} root moves, depth {}, {} threads",
            moves.len(),
            self.config.max_depth,
            self.config.threads
        );

        let timer = self.start_timer()?;
        let mut scheduler = RootScheduler::new(self.config.threads);
        let outcome = scheduler.search(self, pos, moves);
        let timed_out = timer.is_some_and(Timer::stop);
        let outcome = outcome?;

        Ok(self.finish(moves, outcome, timed_out, start))
    }

    /// 1スレッドで根の手を順に探索する
    pub fn run_sequential(&self, pos: &Position) -> Result<SearchResult, SearchError> {
        let mut moves = MoveList::new();
        generate_legal(pos, &mut moves);
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }
        self.begin();
        let start = Instant::now();

        let timer = self.start_timer()?;
        let mut root = pos.clone();
        let outcome = search_root(self, &mut root, &moves);
        let timed_out = timer.is_some_and(Timer::stop);

        Ok(self.finish(&moves, outcome, timed_out, start))
    }

    fn finish(
        &self,
        moves: &[Move],
        outcome: RootOutcome,
        timed_out: bool,
        start: Instant,
    ) -> SearchResult {
        let result = SearchResult {
            best_move: moves[outcome.index],
            best_index: outcome.index,
            value: outcome.value,
            cutoff: outcome.cutoff,
            timed_out,
            nodes: self.nodes(),
            elapsed: start.elapsed(),
        };
        debug!(
            "search done: {} value {} nodes {} in {:?}",
            result.best_move, result.value, result.nodes, result.elapsed
        );
        result
    }
}
