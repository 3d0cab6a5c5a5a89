//! 評価関数
//!
//! 駒割りのみの評価。値は `Position` が差分更新で保持し、
//! 探索からは `Position::material()` で参照する。

pub mod material;

pub use material::{evaluate, hand_piece_value, piece_value};
