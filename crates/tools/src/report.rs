//! 結果の出力（人間向けの表示とJSON）

use serde::Serialize;

use hisha_core::mate::{MateResult, MateStatus};
use hisha_core::position::Position;
use hisha_core::search::SearchResult;

/// `hisha-think` の結果
#[derive(Debug, Serialize)]
pub struct ThinkReport {
    pub sfen: String,
    pub best_move: String,
    pub best_move_csa: String,
    pub value: i32,
    pub cutoff: bool,
    pub timed_out: bool,
    pub nodes: u64,
    pub elapsed_ms: u64,
}

impl ThinkReport {
    pub fn new(pos: &Position, result: &SearchResult) -> Self {
        Self {
            sfen: pos.to_sfen(),
            best_move: result.best_move.to_usi(),
            best_move_csa: pos.move_to_csa(result.best_move),
            value: result.value.raw(),
            cutoff: result.cutoff,
            timed_out: result.timed_out,
            nodes: result.nodes,
            elapsed_ms: result.elapsed.as_millis() as u64,
        }
    }

    pub fn summary(&self) -> String {
        let mut s = format!(
            "bestmove {} ({}) value {} nodes {} time {}ms",
            self.best_move, self.best_move_csa, self.value, self.nodes, self.elapsed_ms
        );
        if self.timed_out {
            s.push_str(" [time up]");
        }
        s
    }
}

/// `hisha-mate` の結果
#[derive(Debug, Serialize)]
pub struct MateReport {
    pub sfen: String,
    pub status: &'static str,
    pub proof: String,
    pub disproof: String,
    pub line: Vec<String>,
    pub line_csa: Vec<String>,
    pub nodes: u64,
}

impl MateReport {
    pub fn new(pos: &Position, result: &MateResult) -> Self {
        let mut line_csa = Vec::with_capacity(result.line.len());
        let mut replay = pos.clone();
        for &m in &result.line {
            line_csa.push(replay.move_to_csa(m));
            let _ = replay.do_move(m);
        }
        Self {
            sfen: pos.to_sfen(),
            status: match result.status {
                MateStatus::Proven => "mate",
                MateStatus::Disproven => "no mate",
                MateStatus::Unknown => "unknown",
            },
            proof: result.proof.to_string(),
            disproof: result.disproof.to_string(),
            line: result.line.iter().map(|m| m.to_usi()).collect(),
            line_csa,
            nodes: result.nodes,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} pn={} dn={} nodes {}\n{}",
            self.status,
            self.proof,
            self.disproof,
            self.nodes,
            self.line_csa.join(" ")
        )
    }
}
