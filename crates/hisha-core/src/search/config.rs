//! 探索設定

use std::time::Duration;

use thiserror::Error;

/// 全幅探索の最大深さ（この深さを超えると静的評価を返す）
pub const DEFAULT_MAX_DEPTH: i32 = 4;
/// 全幅探索をやめて静止探索に入る深さ
pub const DEFAULT_QUIESCENCE_DEPTH: i32 = 2;
/// 置換表の升数（手番ごと、2の冪の指数）
pub const DEFAULT_TT_BITS: u32 = 20;
/// 置換表に記録する最小の残り深さ
pub const DEFAULT_TT_MIN_DEPTH: i32 = 3;
/// 時間切れ監視の間隔
pub const DEFAULT_TIMER_INTERVAL: Duration = Duration::from_millis(50);

/// 探索設定の誤り
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_depth must be at least 1 (got {0})")]
    MaxDepth(i32),
    #[error("quiescence_depth must be within 0..={max_depth} (got {quiescence_depth})")]
    QuiescenceDepth { quiescence_depth: i32, max_depth: i32 },
    #[error("threads must be at least 1")]
    NoThreads,
    #[error("tt_bits must be within 1..=32 (got {0})")]
    TtBits(u32),
    #[error("timer_interval must be positive")]
    TimerInterval,
}

/// 探索設定
///
/// 深さは根からの手数で数える。根の子が深さ1。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// 静止探索を含めた最大の深さ
    pub max_depth: i32,
    /// この深さを超えたら静止探索（駒取り・王手回避のみ）
    pub quiescence_depth: i32,
    /// 根で並列に探索するワーカー数
    pub threads: usize,
    /// 1手の思考時間（Noneなら無制限）
    pub thinking_time: Option<Duration>,
    pub tt_bits: u32,
    pub tt_min_depth: i32,
    /// 根の手を配る順序の乱数シード
    pub seed: u64,
    pub timer_interval: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            quiescence_depth: DEFAULT_QUIESCENCE_DEPTH,
            threads: 1,
            thinking_time: None,
            tt_bits: DEFAULT_TT_BITS,
            tt_min_depth: DEFAULT_TT_MIN_DEPTH,
            seed: 0x5eed,
            timer_interval: DEFAULT_TIMER_INTERVAL,
        }
    }
}

impl SearchConfig {
    /// 設定の整合性を確認する
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth < 1 {
            return Err(ConfigError::MaxDepth(self.max_depth));
        }
        if self.quiescence_depth < 0 || self.quiescence_depth > self.max_depth {
            return Err(ConfigError::QuiescenceDepth {
                quiescence_depth: self.quiescence_depth,
                max_depth: self.max_depth,
            });
        }
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        if !(1..=32).contains(&self.tt_bits) {
            return Err(ConfigError::TtBits(self.tt_bits));
        }
        if self.timer_interval.is_zero() {
            return Err(ConfigError::TimerInterval);
        }
        Ok(())
    }
}
