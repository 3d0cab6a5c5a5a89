//! # hisha-core
//!
//! 駒割り評価の将棋探索コアライブラリ。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Color, Square, Piece, Move, Value）
//! - `position`: 局面表現とdo_move/undo_move、SFEN・CSAの読み込み
//! - `movegen`: 指し手生成
//! - `eval`: 駒割り評価
//! - `tt`: 置換表（手番ごと）
//! - `search`: alpha-beta探索と根の並列探索
//! - `mate`: df-pnによる詰み探索
//!

// 基本型
pub mod types;

// 盤面表現
pub mod position;

// 指し手生成
pub mod movegen;

// 評価
pub mod eval;

// 置換表
pub mod tt;

// 探索
pub mod search;

// 詰み探索
pub mod mate;
