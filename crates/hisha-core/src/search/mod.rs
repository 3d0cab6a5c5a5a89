//! 探索エンジン
//!
//! 置換表つきの min-max 型 alpha-beta 探索と、根の手をワーカーに配る並列探索。
//!
//! - `alpha_beta`: 全幅探索（`search_max` / `search_min`）
//! - `qsearch`: 静止探索（`quies_max` / `quies_min`）
//! - `root`: 根の逐次探索
//! - `split`: 根の並列探索（`RootScheduler`）
//! - `worker`: ワーカースレッドと終了通知
//! - `timer`: 思考時間の監視
//! - `session`: 置換表・停止フラグ・設定をまとめた `SearchSession`

mod alpha_beta;
mod config;
mod qsearch;
mod root;
mod session;
mod split;
mod timer;
mod worker;

#[cfg(test)]
mod tests;

pub use config::{
    ConfigError, SearchConfig, DEFAULT_MAX_DEPTH, DEFAULT_QUIESCENCE_DEPTH, DEFAULT_TIMER_INTERVAL,
    DEFAULT_TT_BITS, DEFAULT_TT_MIN_DEPTH,
};
pub use session::{SearchError, SearchResult, SearchSession};
pub use split::RootScheduler;
pub use timer::Timer;
