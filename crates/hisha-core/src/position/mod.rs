//! 局面表現モジュール
//!
//! 将棋の局面を表現し、手の実行・巻き戻しを行う。探索からは外部のルールライブラリとして
//! 使われ、次の操作だけを提供する。
//!
//! - `Position`: 局面本体（盤面配列・手駒・手番・手数）
//! - `UndoInfo`: `do_move` が返す巻き戻し情報
//! - `key` / `side_to_move` / `material`: ハッシュキー・手番・駒割り
//! - SFEN形式・CSA形式の解析
//!
//! 盤面配列・手駒・Zobristキー・駒割りは `Position` のメソッドを通じて更新され、
//! 常に互いに整合しているように保つ。

mod board_effect;
mod csa;
mod pos;
mod sfen;
mod zobrist;

use thiserror::Error;

pub use csa::CsaError;
pub use pos::{Position, UndoInfo};
pub use sfen::{SfenError, SFEN_HIRATE};

pub(crate) use board_effect::{oriented, slides, steps};

/// USI形式の指し手の解析エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("malformed move: {0}")]
    Syntax(String),
    #[error("illegal move in this position: {0}")]
    Illegal(String),
}
