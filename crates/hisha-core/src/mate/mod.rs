//! 詰み探索
//!
//! - `cn`: 飽和する証明数・反証数
//! - `table`: 線形探索の範囲とリセットを持つ証明数テーブル
//! - `dfpn`: df-pn 探索器（`MateSolver`）

mod cn;
mod dfpn;
mod table;

pub use cn::{Cn, IMMENSE};
pub use dfpn::{MateConfig, MateResult, MateSolver, MateStatus, MAX_PLY};
pub use table::{PnEntry, PnTable, WINDOW};
