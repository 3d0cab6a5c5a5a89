//! df-pn による詰み探索
//!
//! 手番側を攻め方とし、攻め方の局面を OR ノード（王手のどれか1つで詰めばよい）、
//! 玉方の局面を AND ノード（全ての応手が詰まされる）として証明数・反証数を求める。
//!
//! 各ノードは次の順で処理する:
//! 1. テーブルを引き、呼び出し側の閾値を既に超えていればその値を返す
//! 2. 子を生成する（OR は王手、AND は全合法手）。子がなければ終端
//! 3. 展開中の印を書き込む（循環した局面は反証済みに見える）
//! 4. 閾値を超えるまで、最善の子に閾値を付けて潜り直す（多重反復深化）

use std::collections::HashSet;

use log::{debug, info};

use crate::movegen::{generate_checks, generate_legal};
use crate::position::Position;
use crate::types::{Move, MoveList};

use super::cn::Cn;
use super::table::PnTable;

/// 手順を記録する最大の深さ。これより深いノードは展開中扱いにして戻る
pub const MAX_PLY: usize = 1024;

/// 詰み探索の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MateConfig {
    /// テーブルの升数（2の冪の指数）
    pub table_bits: u32,
    /// 展開するノード数の上限（0 なら無制限）
    pub max_nodes: u64,
}

impl Default for MateConfig {
    fn default() -> Self {
        Self {
            table_bits: 20,
            max_nodes: 0,
        }
    }
}

/// 詰み探索の結論
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MateStatus {
    /// 詰み
    Proven,
    /// 不詰み
    Disproven,
    /// ノード数の上限などで結論が出なかった
    Unknown,
}

/// 詰み探索の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MateResult {
    pub proof: Cn,
    pub disproof: Cn,
    pub status: MateStatus,
    /// 詰みなら詰み手順、それ以外は最後に読んでいた手順
    pub line: Vec<Move>,
    pub nodes: u64,
}

/// df-pn 探索器
///
/// テーブルは探索器が持ち、`solve` をまたいで使い回す。
pub struct MateSolver {
    config: MateConfig,
    table: PnTable,
    /// 深さごとに記録した手順
    line: Vec<Move>,
    nodes: u64,
    aborted: bool,
}

impl MateSolver {
    pub fn new(config: MateConfig) -> Self {
        let table = PnTable::new(config.table_bits);
        Self {
            config,
            table,
            line: Vec::new(),
            nodes: 0,
            aborted: false,
        }
    }

    pub fn table(&self) -> &PnTable {
        &self.table
    }

    /// テーブルを空にする
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// 手番側から見て詰むかどうかを調べる
    pub fn solve(&mut self, pos: &mut Position) -> MateResult {
        self.line.clear();
        self.nodes = 0;
        self.aborted = false;
        // 前回の探索が打ち切り・深さ上限で残した印
        let stale = self.table.drop_provisional();
        if stale > 0 {
            debug!("dropped {stale} provisional entries left by the previous solve");
        }

        let (proof, disproof) = self.mid_or(pos, Cn::INFINITE, Cn::INFINITE, 0);
        let status = if self.aborted {
            MateStatus::Unknown
        } else if proof.is_zero() {
            MateStatus::Proven
        } else if disproof.is_zero() {
            MateStatus::Disproven
        } else {
            MateStatus::Unknown
        };

        let line = match status {
            MateStatus::Proven => self.mating_line(pos).unwrap_or_else(|| self.line.clone()),
            _ => self.line.clone(),
        };
        info!(
            "df-pn finished: {status:?} pn={proof} dn={disproof} nodes={} resets={}",
            self.nodes,
            self.table.resets()
        );
        MateResult {
            proof,
            disproof,
            status,
            line,
            nodes: self.nodes,
        }
    }

    fn record_move(&mut self, ply: usize, m: Move) {
        self.line.truncate(ply);
        self.line.push(m);
    }

    /// ノード数の上限を超えたら以後は何も書かずに戻る
    fn count_node(&mut self) -> bool {
        self.nodes += 1;
        if self.config.max_nodes > 0 && self.nodes > self.config.max_nodes && !self.aborted {
            debug!("df-pn node budget {} exhausted", self.config.max_nodes);
            self.aborted = true;
        }
        self.aborted
    }

    /// 子局面のテーブルの値
    fn child_numbers(&self, pos: &mut Position, moves: &[Move]) -> Vec<(Cn, Cn)> {
        moves
            .iter()
            .map(|&m| {
                let undo = pos.do_move(m);
                let numbers = self.table.lookup(pos.key());
                pos.undo_move(undo);
                numbers
            })
            .collect()
    }

    /// 攻め方の局面（子は AND ノード）
    fn mid_or(&mut self, pos: &mut Position, pn: Cn, dn: Cn, ply: usize) -> (Cn, Cn) {
        let key = pos.key();
        let (stored_pn, stored_dn) = self.table.lookup(key);
        if pn <= stored_pn || dn <= stored_dn {
            return (stored_pn, stored_dn);
        }
        if self.count_node() {
            return (stored_pn, stored_dn);
        }
        if ply >= MAX_PLY {
            self.table.insert_provisional(key);
            return (Cn::INFINITE, Cn::ZERO);
        }

        let moves = checks(pos);
        if moves.is_empty() {
            self.table.insert(key, Cn::INFINITE, Cn::ZERO);
            return (Cn::INFINITE, Cn::ZERO);
        }

        self.table.insert_provisional(key);

        loop {
            let children = self.child_numbers(pos, &moves);
            let dmin = children.iter().map(|&(p, _)| p).min().unwrap_or(Cn::INFINITE);
            let psum: Cn = children.iter().map(|&(_, d)| d).sum();
            if pn <= dmin || dn <= psum {
                self.table.insert(key, dmin, psum);
                return (dmin, psum);
            }

            let (best, pn2) = select_child(children.iter().map(|&(p, _)| p));
            let child_dn = (dn - psum) + children[best].1;
            let child_pn = pn.min(pn2 + Cn::ONE);

            let m = moves[best];
            self.record_move(ply, m);
            let undo = pos.do_move(m);
            self.mid_and(pos, child_pn, child_dn, ply + 1);
            pos.undo_move(undo);

            if self.aborted {
                // 展開中の印を残すと反証済みに見える
                self.table.insert(key, dmin, psum);
                return (dmin, psum);
            }
        }
    }

    /// 玉方の局面（子は OR ノード）
    fn mid_and(&mut self, pos: &mut Position, pn: Cn, dn: Cn, ply: usize) -> (Cn, Cn) {
        let key = pos.key();
        let (stored_pn, stored_dn) = self.table.lookup(key);
        if pn <= stored_pn || dn <= stored_dn {
            return (stored_pn, stored_dn);
        }
        if self.count_node() {
            return (stored_pn, stored_dn);
        }
        if ply >= MAX_PLY {
            self.table.insert_provisional(key);
            return (Cn::INFINITE, Cn::ZERO);
        }

        let moves = replies(pos);
        if moves.is_empty() {
            // 打ち歩詰めは攻め方の反則
            let numbers = if pos.is_pawn_drop_mate_pending() {
                (Cn::INFINITE, Cn::ZERO)
            } else {
                (Cn::ZERO, Cn::INFINITE)
            };
            self.table.insert(key, numbers.0, numbers.1);
            return numbers;
        }

        self.table.insert_provisional(key);

        loop {
            let children = self.child_numbers(pos, &moves);
            let dmin = children.iter().map(|&(_, d)| d).min().unwrap_or(Cn::INFINITE);
            let psum: Cn = children.iter().map(|&(p, _)| p).sum();
            if dn <= dmin || pn <= psum {
                self.table.insert(key, psum, dmin);
                return (psum, dmin);
            }

            let (best, dn2) = select_child(children.iter().map(|&(_, d)| d));
            let child_pn = (pn - psum) + children[best].0;
            let child_dn = dn.min(dn2 + Cn::ONE);

            let m = moves[best];
            self.record_move(ply, m);
            let undo = pos.do_move(m);
            self.mid_or(pos, child_pn, child_dn, ply + 1);
            pos.undo_move(undo);

            if self.aborted {
                self.table.insert(key, psum, dmin);
                return (psum, dmin);
            }
        }
    }

    /// 証明済みの子をたどって詰み手順を取り出す
    ///
    /// 途中でテーブルから消えた局面があれば `None`。
    fn mating_line(&self, root: &Position) -> Option<Vec<Move>> {
        let mut pos = root.clone();
        let mut line = Vec::new();
        let mut seen = HashSet::new();
        loop {
            if !seen.insert(pos.key()) || line.len() >= MAX_PLY {
                return None;
            }
            let attacking = line.len() % 2 == 0;
            let moves = if attacking { checks(&pos) } else { replies(&pos) };
            if !attacking && moves.is_empty() {
                return (!pos.is_pawn_drop_mate_pending()).then_some(line);
            }
            let next = moves.into_iter().find(|&m| {
                let mut child = pos.clone();
                let _ = child.do_move(m);
                self.table.get(child.key()).is_some_and(|e| !e.provisional && e.pn.is_zero())
            })?;
            line.push(next);
            let _ = pos.do_move(next);
        }
    }
}

/// 王手（再帰の各フレームに大きなバッファを置かないようヒープに移す）
fn checks(pos: &Position) -> Vec<Move> {
    let mut list = MoveList::new();
    generate_checks(pos, &mut list);
    list.into_vec()
}

fn replies(pos: &Position) -> Vec<Move> {
    let mut list = MoveList::new();
    generate_legal(pos, &mut list);
    list.into_vec()
}

/// 最小の子（同じなら先の子）の位置と、2番目に小さい値
fn select_child(numbers: impl Iterator<Item = Cn>) -> (usize, Cn) {
    let mut best = 0;
    let mut first = Cn::INFINITE;
    let mut second = Cn::INFINITE;
    for (i, n) in numbers.enumerate() {
        if n < first {
            best = i;
            second = first;
            first = n;
        } else if n < second {
            second = n;
        }
    }
    (best, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::legal_moves;

    fn pos(sfen: &str) -> Position {
        let mut p = Position::new();
        p.set_sfen(sfen).unwrap();
        p
    }

    fn solver() -> MateSolver {
        MateSolver::new(MateConfig {
            table_bits: 16,
            max_nodes: 0,
        })
    }

    #[test]
    fn test_select_child() {
        let n = |v| Cn::Finite(v);
        assert_eq!(select_child([n(3), n(1), n(2), n(1)].into_iter()), (1, n(1)));
        assert_eq!(select_child([n(5)].into_iter()), (0, Cn::INFINITE));
        assert_eq!(select_child([Cn::INFINITE, n(4)].into_iter()), (1, Cn::INFINITE));
    }

    #[test]
    fn test_mate_in_one() {
        let mut p = pos("4k4/9/4P4/9/9/9/9/9/9 b G 1");
        let before = p.clone();
        let result = solver().solve(&mut p);
        assert_eq!(result.status, MateStatus::Proven);
        assert_eq!((result.proof, result.disproof), (Cn::ZERO, Cn::INFINITE));
        assert_eq!(result.line.len() % 2, 1);
        assert_eq!(p, before);
    }

    #[test]
    fn test_lone_gold_cannot_mate() {
        let mut p = pos("4k4/9/9/9/9/9/9/9/9 b G 1");
        let result = solver().solve(&mut p);
        assert_eq!(result.status, MateStatus::Disproven);
        assert_eq!((result.proof, result.disproof), (Cn::INFINITE, Cn::ZERO));
    }

    #[test]
    fn test_no_checks_is_disproven() {
        let mut p = pos("4k4/9/9/9/9/9/9/9/4K4 b - 1");
        let result = solver().solve(&mut p);
        assert_eq!(result.status, MateStatus::Disproven);
        assert_eq!(result.nodes, 1);
        assert!(result.line.is_empty());
    }

    #[test]
    fn test_pawn_drop_mate_is_not_mate() {
        let mut p = pos("7nk/7p1/9/7N1/9/9/9/9/9 b P 1");
        let result = solver().solve(&mut p);
        assert_eq!(result.status, MateStatus::Disproven);
    }

    #[test]
    fn test_node_budget() {
        let mut p = pos("4k4/9/9/9/9/9/9/9/9 b G 1");
        let mut s = MateSolver::new(MateConfig {
            table_bits: 16,
            max_nodes: 2,
        });
        let result = s.solve(&mut p);
        assert_eq!(result.status, MateStatus::Unknown);
        assert!(result.nodes <= 3);
    }

    #[test]
    fn test_mating_line_is_legal() {
        let mut p = pos("4k4/9/4P4/9/9/9/9/9/9 b G 1");
        let result = solver().solve(&mut p);
        let mut q = p.clone();
        for &m in &result.line {
            assert!(legal_moves(&q).contains(&m), "{m} in {q:?}");
            let _ = q.do_move(m);
        }
        assert!(legal_moves(&q).is_empty());
    }

    #[test]
    fn test_solver_reuses_table() {
        let mut s = solver();
        let mut p = pos("4k4/9/4P4/9/9/9/9/9/9 b G 1");
        let first = s.solve(&mut p);
        let second = s.solve(&mut p);
        assert_eq!(first.status, second.status);
        // 2回目はルートのエントリで即座に返る
        assert_eq!(second.nodes, 0);
        s.clear();
        assert_eq!(s.table().used(), 0);
    }

    const MATE_IN_THREE: &str = "8k/9/9/7N1/9/9/9/9/9 b RS 1";

    fn budgeted(max_nodes: u64) -> MateSolver {
        MateSolver::new(MateConfig {
            table_bits: 16,
            max_nodes,
        })
    }

    #[test]
    fn test_budget_abort_leaves_no_provisional_entries() {
        let mut s = budgeted(3);
        let mut p = pos(MATE_IN_THREE);
        let first = s.solve(&mut p);
        assert_eq!(first.status, MateStatus::Unknown);
        assert_eq!(s.table.drop_provisional(), 0);

        // 同じ上限で解き直しても反証済みにはならない
        let second = s.solve(&mut p);
        assert_ne!(second.status, MateStatus::Disproven);
        assert!(second.nodes > 0);

        s.config.max_nodes = 0;
        let third = s.solve(&mut p);
        assert_eq!(third.status, MateStatus::Proven);
    }

    #[test]
    fn test_positions_below_an_aborted_solve_still_prove() {
        let mut root = pos(MATE_IN_THREE);
        let line = solver().solve(&mut root).line;
        assert!(line.len() >= 3);
        // 詰み手順の途中の局面（攻め方の手番）
        let mut below = root.clone();
        let _ = below.do_move(line[0]);
        let _ = below.do_move(line[1]);

        for budget in [1, 2, 3, 5, 8, 13, 21, 34] {
            let mut s = budgeted(budget);
            let _ = s.solve(&mut root);
            s.config.max_nodes = 0;
            assert_eq!(s.solve(&mut below).status, MateStatus::Proven, "budget {budget}");
            assert_eq!(s.solve(&mut root).status, MateStatus::Proven, "budget {budget}");
        }
    }

    #[test]
    fn test_other_position_after_aborted_solve() {
        let mut s = budgeted(5);
        let _ = s.solve(&mut pos(MATE_IN_THREE));
        s.config.max_nodes = 0;
        assert_eq!(s.solve(&mut pos("4k4/9/4P4/9/9/9/9/9/9 b G 1")).status, MateStatus::Proven);
        assert_eq!(s.solve(&mut pos("4k4/9/9/9/9/9/9/9/9 b G 1")).status, MateStatus::Disproven);
    }

    #[test]
    fn test_leftover_provisional_root_is_dropped() {
        // 深さ上限で戻ったノードは展開中の印のまま残る
        let mut s = solver();
        let mut p = pos(MATE_IN_THREE);
        s.table.insert_provisional(p.key());
        let result = s.solve(&mut p);
        assert_eq!(result.status, MateStatus::Proven);
        assert!(result.nodes > 0);
    }
}
