//! hisha のコマンドラインツール共通部
//!
//! - `common::io`: gzip 対応の読み書き
//! - `position`: `--sfen` / `--csa` / `--moves` からの局面の読み込み
//! - `report`: 結果の表示とJSON出力

pub mod common;
pub mod position;
pub mod report;
