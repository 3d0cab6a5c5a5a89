//! 詰将棋の小問集で df-pn を確かめる

use hisha_core::mate::{MateConfig, MateSolver, MateStatus};
use hisha_core::movegen::{has_legal_move, legal_moves};
use hisha_core::position::Position;
use hisha_core::types::Move;

/// 詰みのある局面と、その最短手数
const PROVEN: &[(&str, usize)] = &[
    ("4k4/9/4P4/9/9/9/9/9/9 b G 1", 1),
    ("3k5/9/3P5/9/9/9/9/9/9 b GS 1", 1),
    ("7kl/9/7P1/9/9/9/9/9/9 b GS 1", 1),
    ("8k/9/9/7N1/9/9/9/9/9 b RS 1", 3),
    ("8k/9/9/8N/9/9/9/9/9 b RB 1", 3),
    ("8k/9/9/7+P1/9/9/9/9/9 b RG 1", 3),
];

/// 詰みのない局面
const DISPROVEN: &[&str] = &[
    // 王手がない
    "4k4/9/9/9/9/9/9/9/4K4 b - 1",
    // 打った歩を取られて持ち駒がなくなる
    "4k4/9/9/9/9/9/9/9/9 b P 1",
    // 金1枚では追い切れない
    "4k4/9/9/9/9/9/9/9/9 b G 1",
    // 打ち歩詰めしかない
    "7nk/7p1/9/7N1/9/9/9/9/9 b P 1",
];

fn pos(sfen: &str) -> Position {
    let mut p = Position::new();
    p.set_sfen(sfen).unwrap();
    p
}

fn solver() -> MateSolver {
    MateSolver::new(MateConfig {
        table_bits: 18,
        max_nodes: 2_000_000,
    })
}

/// 手順を1手ずつ合法手として指し、最後に玉方が詰んでいることを確かめる
fn assert_mating_line(sfen: &str, line: &[Move]) {
    let mut p = pos(sfen);
    for (ply, &m) in line.iter().enumerate() {
        assert!(
            legal_moves(&p).iter().any(|&l| l == m),
            "{sfen}: {m} at ply {ply} is not legal"
        );
        if ply % 2 == 0 {
            assert!(p.gives_check(m), "{sfen}: {m} at ply {ply} is not a check");
        }
        p.do_move(m);
    }
    assert!(p.in_check(), "{sfen}: line does not end in check");
    assert!(!has_legal_move(&p), "{sfen}: defender still has a move");
}

#[test]
fn test_proven_problems() {
    for &(sfen, shortest) in PROVEN {
        let mut p = pos(sfen);
        let result = solver().solve(&mut p);
        assert_eq!(result.status, MateStatus::Proven, "{sfen}");
        assert!(result.proof.is_zero(), "{sfen}");
        assert!(result.disproof.is_infinite(), "{sfen}");
        assert_eq!(result.line.len() % 2, 1, "{sfen}");
        assert!(result.line.len() >= shortest, "{sfen}");
        assert_mating_line(sfen, &result.line);
        // 局面は元に戻っている
        assert_eq!(p.key(), pos(sfen).key());
    }
}

#[test]
fn test_disproven_problems() {
    for &sfen in DISPROVEN {
        let mut p = pos(sfen);
        let result = solver().solve(&mut p);
        assert_eq!(result.status, MateStatus::Disproven, "{sfen}");
        assert!(result.proof.is_infinite(), "{sfen}");
        assert!(result.disproof.is_zero(), "{sfen}");
    }
}

#[test]
fn test_resolving_after_budget_abort() {
    let sfen = "8k/9/9/7N1/9/9/9/9/9 b RS 1";
    let mut budgeted = MateSolver::new(MateConfig {
        table_bits: 16,
        max_nodes: 3,
    });
    let mut p = pos(sfen);
    let first = budgeted.solve(&mut p);
    assert_eq!(first.status, MateStatus::Unknown);
    let second = budgeted.solve(&mut p);
    assert_ne!(second.status, MateStatus::Disproven);
    assert!(second.nodes > 0);
}

#[test]
fn test_budgeted_solver_reused_across_problems() {
    // 上限つきの探索を続けても、解けた問題の答えは上限なしと同じ
    let mut budgeted = MateSolver::new(MateConfig {
        table_bits: 18,
        max_nodes: 50_000,
    });
    let mut starved = MateSolver::new(MateConfig {
        table_bits: 18,
        max_nodes: 4,
    });
    for &(sfen, _) in PROVEN {
        let _ = starved.solve(&mut pos(sfen));
    }
    for &(sfen, _) in PROVEN {
        let result = budgeted.solve(&mut pos(sfen));
        assert_eq!(result.status, MateStatus::Proven, "{sfen}");
        let result = starved.solve(&mut pos(sfen));
        assert_ne!(result.status, MateStatus::Disproven, "{sfen}");
    }
    for &sfen in DISPROVEN {
        let result = starved.solve(&mut pos(sfen));
        assert_ne!(result.status, MateStatus::Proven, "{sfen}");
    }
}
