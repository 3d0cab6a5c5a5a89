//! 根の並列探索のテスト

use std::sync::atomic::Ordering;
use std::time::Duration;

use super::{hirate, pos, random_positions, session, shallow};
use crate::movegen::legal_moves;
use crate::search::{RootScheduler, SearchConfig, SearchError, SearchResult};
use crate::types::Value;

fn assert_same_choice(a: &SearchResult, b: &SearchResult, what: &str) {
    assert_eq!(a.value, b.value, "{what}");
    // 根で打ち切った場合は、同じ値の手のどれが先に返るかで変わる
    if !a.cutoff && !b.cutoff {
        assert_eq!(a.best_index, b.best_index, "{what}");
        assert_eq!(a.best_move, b.best_move, "{what}");
    }
}

#[test]
fn test_single_worker_matches_sequential() {
    for (i, p) in random_positions(20, 2024).iter().enumerate() {
        let parallel = session(shallow(3, 1)).run(p).unwrap();
        let sequential = session(shallow(3, 1)).run_sequential(p).unwrap();
        assert_same_choice(&parallel, &sequential, &format!("position {i}: {p:?}"));
    }
}

#[test]
fn test_pool_size_does_not_change_choice() {
    for (i, p) in random_positions(8, 99).iter().enumerate() {
        let one = session(shallow(3, 1)).run(p).unwrap();
        for threads in [2, 4] {
            let many = session(SearchConfig { threads, ..shallow(3, 1) }).run(p).unwrap();
            assert_same_choice(&one, &many, &format!("position {i} with {threads} threads"));
        }
    }
}

#[test]
fn test_dispatch_seed_does_not_change_choice() {
    let p = hirate();
    let a = session(SearchConfig { seed: 1, threads: 3, ..shallow(3, 1) }).run(&p).unwrap();
    let b = session(SearchConfig { seed: 2, threads: 3, ..shallow(3, 1) }).run(&p).unwrap();
    assert_same_choice(&a, &b, "hirate");
    assert!(legal_moves(&p).contains(&a.best_move));
}

#[test]
fn test_cutoff_drains_all_workers() {
    // G*5b で詰み
    let mate = pos("4k4/9/4P4/9/9/9/9/9/9 b G 1");
    let s = session(SearchConfig { threads: 2, ..shallow(3, 2) });
    let moves = legal_moves(&mate);
    let mut scheduler = RootScheduler::new(2);
    let outcome = scheduler.search(&s, &mate, &moves).unwrap();
    assert!(outcome.cutoff);
    assert_eq!(outcome.value, Value::INFINITE);
    assert!(s.stop_requested());
    assert_eq!(scheduler.busy_count(), 0);
    assert_eq!(scheduler.idle_count(), 2);

    // 同じ升を次の探索で使い回せる
    let next = session(SearchConfig { threads: 2, ..shallow(2, 1) });
    let p = hirate();
    let moves = legal_moves(&p);
    let outcome = scheduler.search(&next, &p, &moves).unwrap();
    assert!(!outcome.cutoff);
    assert!(outcome.index < moves.len());
    assert_eq!(scheduler.busy_count(), 0);
    assert_eq!(scheduler.idle_count(), 2);
}

#[test]
fn test_mate_in_one_found_by_run() {
    let mate = pos("4k4/9/4P4/9/9/9/9/9/9 b G 1");
    let result = session(SearchConfig { threads: 2, ..shallow(3, 2) }).run(&mate).unwrap();
    assert!(result.cutoff);
    assert_eq!(result.value, Value::INFINITE);
    let sequential = session(shallow(3, 2)).run_sequential(&mate).unwrap();
    assert_eq!(sequential.value, Value::INFINITE);
}

#[test]
fn test_timer_stops_parallel_search() {
    let config = SearchConfig {
        max_depth: 9,
        quiescence_depth: 8,
        threads: 2,
        thinking_time: Some(Duration::from_millis(100)),
        ..shallow(9, 8)
    };
    let p = hirate();
    let result = session(config).run(&p).unwrap();
    assert!(result.timed_out);
    assert!(result.elapsed < Duration::from_secs(30));
    assert!(legal_moves(&p).contains(&result.best_move));
}

#[test]
fn test_timer_stops_sequential_search() {
    let config = SearchConfig {
        thinking_time: Some(Duration::from_millis(100)),
        ..shallow(9, 8)
    };
    let p = hirate();
    let result = session(config).run_sequential(&p).unwrap();
    assert!(result.timed_out);
    assert!(result.elapsed < Duration::from_secs(30));
}

#[test]
fn test_search_without_time_limit_is_not_timed_out() {
    let result = session(shallow(2, 1)).run(&hirate()).unwrap();
    assert!(!result.timed_out);
    assert!(!result.cutoff);
    assert!(result.nodes > 0);
}

#[test]
fn test_worker_panic_drains_all_workers() {
    let p = hirate();
    let moves = legal_moves(&p);
    let s = session(SearchConfig { threads: 3, ..shallow(2, 1) });
    s.faults().panic_worker.store(true, Ordering::Relaxed);
    let mut scheduler = RootScheduler::new(3);
    let err = scheduler.search(&s, &p, &moves).unwrap_err();
    assert!(matches!(err, SearchError::WorkerPanicked { slot } if slot < 3), "{err:?}");
    assert!(s.stop_requested());
    assert_eq!(scheduler.busy_count(), 0);
    assert_eq!(scheduler.idle_count(), scheduler.threads());

    // 故障を止めれば同じ升で探索し直せる
    s.faults().panic_worker.store(false, Ordering::Relaxed);
    let next = session(SearchConfig { threads: 3, ..shallow(2, 1) });
    let outcome = scheduler.search(&next, &p, &moves).unwrap();
    assert!(outcome.index < moves.len());
    assert_eq!(scheduler.busy_count(), 0);
    assert_eq!(scheduler.idle_count(), 3);
}

#[test]
fn test_worker_panic_is_reported_by_run() {
    let s = session(SearchConfig { threads: 2, ..shallow(2, 1) });
    s.faults().panic_worker.store(true, Ordering::Relaxed);
    assert!(matches!(s.run(&hirate()), Err(SearchError::WorkerPanicked { .. })));

    // 次の探索の開始で停止フラグは下りる
    s.faults().panic_worker.store(false, Ordering::Relaxed);
    let result = s.run(&hirate()).unwrap();
    assert!(!result.timed_out);
    assert!(result.nodes > 0);
}

#[test]
fn test_spawn_failure_drains_started_workers() {
    let p = hirate();
    let moves = legal_moves(&p);
    // 升0は起動し、升1で失敗する
    let s = session(SearchConfig { threads: 3, ..shallow(2, 1) });
    s.faults().fail_spawn_from_slot.store(1, Ordering::Relaxed);
    let mut scheduler = RootScheduler::new(3);
    let err = scheduler.search(&s, &p, &moves).unwrap_err();
    assert!(matches!(err, SearchError::Spawn(_)), "{err:?}");
    assert!(s.stop_requested());
    assert_eq!(scheduler.busy_count(), 0);
    assert_eq!(scheduler.idle_count(), scheduler.threads());

    // 最初の升から失敗しても升は全て空きに戻る
    let s = session(SearchConfig { threads: 3, ..shallow(2, 1) });
    s.faults().fail_spawn_from_slot.store(0, Ordering::Relaxed);
    assert!(matches!(scheduler.search(&s, &p, &moves), Err(SearchError::Spawn(_))));
    assert_eq!(scheduler.busy_count(), 0);
    assert_eq!(scheduler.idle_count(), 3);
}
