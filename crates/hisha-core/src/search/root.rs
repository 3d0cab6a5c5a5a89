//! 根の逐次探索
//!
//! 根の手を指し手リストの順に1つずつ探索する。並列探索と同じ結果になる基準でもある。
//! 同点なら先に調べた（リストで前の）手を残す。

use crate::position::Position;
use crate::types::{Color, Move, Value};

use super::alpha_beta::Searcher;
use super::session::{RootOutcome, SearchSession};

pub(crate) fn search_root(session: &SearchSession, pos: &mut Position, moves: &[Move]) -> RootOutcome {
    let us = pos.side_to_move();
    let mut searcher = Searcher::new(session);
    let mut alpha = -Value::INFINITE;
    let mut beta = Value::INFINITE;
    let mut best = RootOutcome {
        index: 0,
        value: match us {
            Color::Black => alpha,
            Color::White => beta,
        },
        cutoff: false,
    };

    for (index, &m) in moves.iter().enumerate() {
        let undo = pos.do_move(m);
        let value = searcher.search(pos, alpha, beta, 1);
        pos.undo_move(undo);

        if searcher.stopped() {
            break;
        }
        match us {
            Color::Black => {
                if value >= beta {
                    return RootOutcome { index, value, cutoff: true };
                }
                if value > alpha {
                    alpha = value;
                    best = RootOutcome { index, value, cutoff: false };
                }
            }
            Color::White => {
                if value <= alpha {
                    return RootOutcome { index, value, cutoff: true };
                }
                if value < beta {
                    beta = value;
                    best = RootOutcome { index, value, cutoff: false };
                }
            }
        }
    }
    best
}
