//! 全幅探索（min-max 型の alpha-beta）
//!
//! 先手番の局面は `search_max`、後手番の局面は `search_min` が受け持つ。
//! 値は常に先手から見た駒割りで、先手が最大化・後手が最小化する。
//!
//! 各ノードの処理順は固定:
//! 1. 置換表を引く（窓を狭める／確定値で返る）
//! 2. 停止フラグを見る
//! 3. 静止探索に入る深さなら `quies_*` に渡す
//! 4. 子を順に探索し、窓を超えたら打ち切る
//! 5. 置換表に記録する
//!
//! 停止フラグが立っていたら、その時点の値は信用せず窓の端を返す
//! （先手番は beta、後手番は alpha）。このとき置換表には記録しない。

use std::sync::atomic::Ordering;

use crate::movegen::generate_fast;
use crate::position::Position;
use crate::types::{Color, Move, MoveList, PieceType, Value};

use super::session::SearchSession;

/// 1スレッド分の探索器
///
/// セッション（置換表・停止フラグ・設定）を共有参照で持つ。
/// 数えたノード数は破棄時にセッションへ加算する。
pub(crate) struct Searcher<'a> {
    pub(super) session: &'a SearchSession,
    pub(super) nodes: u64,
}

impl<'a> Searcher<'a> {
    pub(crate) fn new(session: &'a SearchSession) -> Self {
        Self { session, nodes: 0 }
    }

    #[inline]
    pub(super) fn stopped(&self) -> bool {
        self.session.stop_flag().load(Ordering::Relaxed)
    }

    /// 置換表に渡す残り深さ
    #[inline]
    pub(super) fn remaining(&self, depth: i32) -> i32 {
        self.session.config().max_depth - depth
    }

    /// 手番側の局面を、手番に応じた探索で評価する
    pub(crate) fn search(&mut self, pos: &mut Position, alpha: Value, beta: Value, depth: i32) -> Value {
        match pos.side_to_move() {
            Color::Black => self.search_max(pos, alpha, beta, depth),
            Color::White => self.search_min(pos, alpha, beta, depth),
        }
    }

    /// 先手番のノード
    pub(crate) fn search_max(
        &mut self,
        pos: &mut Position,
        mut alpha: Value,
        mut beta: Value,
        depth: i32,
    ) -> Value {
        self.nodes += 1;
        let tt = self.session.tt();
        let key = pos.key();
        let remaining = self.remaining(depth);

        if let Some(value) = tt.probe(Color::Black, key, remaining, &mut alpha, &mut beta) {
            return value;
        }
        if self.stopped() {
            return beta;
        }
        if depth > self.session.config().quiescence_depth {
            return self.quies_max(pos, alpha, beta, depth);
        }
        debug_assert!(alpha < beta, "empty window at depth {depth}: ({alpha}, {beta})");

        let mut moves = MoveList::new();
        generate_fast(pos, &mut moves);

        let mut vmax = -Value::INFINITE;
        for m in moves {
            if captures_king(pos, m) {
                vmax = Value::INFINITE;
                break;
            }
            let undo = pos.do_move(m);
            let value = self.search_min(pos, alpha.max(vmax), beta, depth + 1);
            pos.undo_move(undo);

            if self.stopped() {
                return beta;
            }
            if value >= beta {
                tt.record(Color::Black, key, remaining, alpha, beta, value);
                return beta;
            }
            vmax = vmax.max(value);
        }

        tt.record(Color::Black, key, remaining, alpha, beta, vmax);
        vmax
    }

    /// 後手番のノード
    pub(crate) fn search_min(
        &mut self,
        pos: &mut Position,
        mut alpha: Value,
        mut beta: Value,
        depth: i32,
    ) -> Value {
        self.nodes += 1;
        let tt = self.session.tt();
        let key = pos.key();
        let remaining = self.remaining(depth);

        if let Some(value) = tt.probe(Color::White, key, remaining, &mut alpha, &mut beta) {
            return value;
        }
        if self.stopped() {
            return alpha;
        }
        if depth > self.session.config().quiescence_depth {
            return self.quies_min(pos, alpha, beta, depth);
        }
        debug_assert!(alpha < beta, "empty window at depth {depth}: ({alpha}, {beta})");

        let mut moves = MoveList::new();
        generate_fast(pos, &mut moves);

        let mut vmin = Value::INFINITE;
        for m in moves {
            if captures_king(pos, m) {
                vmin = -Value::INFINITE;
                break;
            }
            let undo = pos.do_move(m);
            let value = self.search_max(pos, alpha, beta.min(vmin), depth + 1);
            pos.undo_move(undo);

            if self.stopped() {
                return alpha;
            }
            if value <= alpha {
                tt.record(Color::White, key, remaining, alpha, beta, value);
                return alpha;
            }
            vmin = vmin.min(value);
        }

        tt.record(Color::White, key, remaining, alpha, beta, vmin);
        vmin
    }
}

impl Drop for Searcher<'_> {
    fn drop(&mut self) {
        self.session.add_nodes(self.nodes);
    }
}

/// 相手玉を取る手か
///
/// 相手が王手を放置した局面でだけ生成される。
#[inline]
pub(super) fn captures_king(pos: &Position, m: Move) -> bool {
    !m.is_drop() && pos.piece_on(m.to()).piece_type() == Some(PieceType::King)
}
