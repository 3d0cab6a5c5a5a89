//! 指し手生成
//!
//! 探索が使う4種類の生成器。いずれも手番側の手を生成する。
//!
//! - `generate_fast`: 疑似合法手（自玉を取られる手を含む）。王手されているときは回避手
//! - `generate_captures`: 駒を取る疑似合法手。王手されているときは回避手
//! - `generate_checks`: 王手になる合法手（成り・不成の両方）
//! - `generate_legal`: 全合法手（打ち歩詰めを除く）

mod generator;

pub use generator::{
    generate_captures, generate_checks, generate_fast, generate_legal, has_legal_move,
    legal_moves,
};
