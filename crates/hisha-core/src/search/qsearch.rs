//! 静止探索
//!
//! 駒を取る手（王手されていれば回避手）だけを読む。最初に静的評価で
//! 立ち止まり（stand pat）を判定し、その後は全幅探索と同じ順で置換表・停止フラグを見る。
//! `max_depth` を超えたら静的評価をそのまま返す。

use crate::movegen::generate_captures;
use crate::position::Position;
use crate::types::{Color, MoveList, Value};

use super::alpha_beta::{captures_king, Searcher};

impl Searcher<'_> {
    /// 先手番の静止探索
    pub(super) fn quies_max(
        &mut self,
        pos: &mut Position,
        mut alpha: Value,
        mut beta: Value,
        depth: i32,
    ) -> Value {
        let mut vmax = pos.material();
        if vmax >= beta {
            return beta;
        }

        let tt = self.session.tt();
        let key = pos.key();
        let remaining = self.remaining(depth);
        if let Some(value) = tt.probe(Color::Black, key, remaining, &mut alpha, &mut beta) {
            return value;
        }
        if self.stopped() {
            return beta;
        }
        if depth > self.session.config().max_depth {
            return vmax;
        }
        // 置換表で beta が下がっていることがある
        if vmax >= beta {
            return beta;
        }

        let mut moves = MoveList::new();
        generate_captures(pos, &mut moves);

        for m in moves {
            if captures_king(pos, m) {
                vmax = Value::INFINITE;
                break;
            }
            let undo = pos.do_move(m);
            self.nodes += 1;
            let value = self.quies_min(pos, alpha.max(vmax), beta, depth + 1);
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

    /// 後手番の静止探索
    pub(super) fn quies_min(
        &mut self,
        pos: &mut Position,
        mut alpha: Value,
        mut beta: Value,
        depth: i32,
    ) -> Value {
        let mut vmin = pos.material();
        if vmin <= alpha {
            return alpha;
        }

        let tt = self.session.tt();
        let key = pos.key();
        let remaining = self.remaining(depth);
        if let Some(value) = tt.probe(Color::White, key, remaining, &mut alpha, &mut beta) {
            return value;
        }
        if self.stopped() {
            return alpha;
        }
        if depth > self.session.config().max_depth {
            return vmin;
        }
        if vmin <= alpha {
            return alpha;
        }

        let mut moves = MoveList::new();
        generate_captures(pos, &mut moves);

        for m in moves {
            if captures_king(pos, m) {
                vmin = -Value::INFINITE;
                break;
            }
            let undo = pos.do_move(m);
            self.nodes += 1;
            let value = self.quies_max(pos, alpha, beta.min(vmin), depth + 1);
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
