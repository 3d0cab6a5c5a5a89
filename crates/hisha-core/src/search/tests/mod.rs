//! search モジュールのテスト

mod split;

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::movegen::legal_moves;
use crate::position::Position;

use super::{SearchConfig, SearchSession};

pub(super) fn pos(sfen: &str) -> Position {
    let mut p = Position::new();
    p.set_sfen(sfen).unwrap();
    p
}

pub(super) fn hirate() -> Position {
    let mut p = Position::new();
    p.set_hirate();
    p
}

/// 浅めの探索設定（テスト用に小さい置換表）
pub(super) fn shallow(max_depth: i32, quiescence_depth: i32) -> SearchConfig {
    SearchConfig {
        max_depth,
        quiescence_depth,
        tt_bits: 16,
        ..SearchConfig::default()
    }
}

pub(super) fn session(config: SearchConfig) -> Arc<SearchSession> {
    Arc::new(SearchSession::new(config).unwrap())
}

/// 平手から乱数で合法手を指し進めた局面（手番側に合法手があるものだけ）
pub(super) fn random_positions(count: usize, seed: u64) -> Vec<Position> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let mut p = hirate();
        let plies = rng.random_range(2..24);
        for _ in 0..plies {
            let moves = legal_moves(&p);
            if moves.is_empty() {
                break;
            }
            let m = moves[rng.random_range(0..moves.len())];
            let _ = p.do_move(m);
        }
        if !legal_moves(&p).is_empty() {
            out.push(p);
        }
    }
    out
}
