//! 局面の読み込み
//!
//! `--sfen`（生のSFENまたはUSIの `position` 行）、`--csa`（.gz も可）、
//! どちらもなければ平手。最後に `--moves` のUSI形式の手を順に進める。

use std::path::Path;

use anyhow::{Context, Result, bail};
use hisha_core::position::Position;

use crate::common::io::read_text;

/// USI position 行を分解した結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPosition {
    pub startpos: bool,
    pub sfen: Option<String>,
    pub moves: Vec<String>,
}

/// コマンドラインの指定から局面を作る
pub fn load_position(sfen: Option<&str>, csa: Option<&Path>, moves: &[String]) -> Result<Position> {
    let mut pos = match (sfen, csa) {
        (Some(_), Some(_)) => bail!("--sfen and --csa cannot be used together"),
        (Some(line), None) => {
            let parsed = parse_position_line(line).or_else(|_| parse_sfen_only(line))?;
            build_position(&parsed)?
        }
        (None, Some(path)) => {
            let text = read_text(path).with_context(|| format!("failed to read {}", path.display()))?;
            let mut pos = Position::new();
            let played = pos
                .set_csa(&text)
                .with_context(|| format!("invalid CSA record {}", path.display()))?;
            log::info!("loaded {} ({} moves)", path.display(), played.len());
            pos
        }
        (None, None) => {
            let mut pos = Position::new();
            pos.set_hirate();
            pos
        }
    };
    apply_moves(&mut pos, moves)?;
    Ok(pos)
}

/// `position ...` 形式の行をパースする。
pub fn parse_position_line(line: &str) -> Result<ParsedPosition> {
    let mut tokens = line.split_whitespace().peekable();
    if tokens.peek().is_some_and(|tok| *tok == "position") {
        tokens.next();
    }
    match tokens.next() {
        Some("startpos") => {
            let moves = parse_moves(tokens)?;
            Ok(ParsedPosition {
                startpos: true,
                sfen: None,
                moves,
            })
        }
        Some("sfen") => {
            let mut sfen_tokens = Vec::new();
            while let Some(token) = tokens.next_if(|tok| *tok != "moves") {
                sfen_tokens.push(token);
            }
            if sfen_tokens.is_empty() {
                bail!("missing SFEN payload");
            }
            let moves = parse_moves(tokens)?;
            Ok(ParsedPosition {
                startpos: false,
                sfen: Some(sfen_tokens.join(" ")),
                moves,
            })
        }
        other => bail!("expected 'startpos' or 'sfen' after 'position', got {:?}", other),
    }
}

/// sfen 文字列だけが渡されたときの簡易パーサ。
pub fn parse_sfen_only(line: &str) -> Result<ParsedPosition> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        bail!("empty SFEN");
    }
    Ok(ParsedPosition {
        startpos: false,
        sfen: Some(trimmed.to_string()),
        moves: Vec::new(),
    })
}

/// moves トークン以降を USI 形式の指し手列として回収する。
pub fn parse_moves<'a, I>(iter: I) -> Result<Vec<String>>
where
    I: Iterator<Item = &'a str>,
{
    let mut iter = iter.peekable();
    match iter.peek() {
        Some(&"moves") => {
            iter.next();
            Ok(iter.map(|mv| mv.to_string()).collect())
        }
        Some(other) => bail!("expected 'moves' before move list, got '{other}'"),
        None => Ok(Vec::new()),
    }
}

pub fn build_position(parsed: &ParsedPosition) -> Result<Position> {
    let mut pos = Position::new();
    if parsed.startpos {
        pos.set_hirate();
    } else if let Some(sfen) = &parsed.sfen {
        pos.set_sfen(sfen).with_context(|| format!("invalid SFEN: {sfen}"))?;
    } else {
        bail!("missing sfen payload");
    }
    apply_moves(&mut pos, &parsed.moves)?;
    Ok(pos)
}

/// USI形式の手を順に進める（合法手でなければエラー）
pub fn apply_moves(pos: &mut Position, moves: &[String]) -> Result<()> {
    for mv_str in moves {
        let mv = pos
            .parse_usi_move(mv_str)
            .with_context(|| format!("cannot play '{mv_str}' in {}", pos.to_sfen()))?;
        let _ = pos.do_move(mv);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hisha_core::position::SFEN_HIRATE;

    #[test]
    fn parse_position_line_covers_startpos_and_sfen() {
        let parsed = parse_position_line("position startpos moves 7g7f 3c3d").unwrap();
        assert!(parsed.startpos);
        assert_eq!(parsed.moves, vec!["7g7f", "3c3d"]);

        let sfen_line = format!("position sfen {SFEN_HIRATE} moves 7g7f");
        let parsed = parse_position_line(&sfen_line).unwrap();
        assert!(!parsed.startpos);
        assert_eq!(parsed.sfen.as_deref(), Some(SFEN_HIRATE));
        assert_eq!(parsed.moves, vec!["7g7f"]);
    }

    #[test]
    fn load_position_defaults_to_hirate() {
        let pos = load_position(None, None, &[]).unwrap();
        assert_eq!(pos.to_sfen(), SFEN_HIRATE);
    }

    #[test]
    fn load_position_applies_moves() {
        let moves = vec!["7g7f".to_string(), "3c3d".to_string()];
        let pos = load_position(Some("startpos"), None, &moves).unwrap();
        let expected = load_position(Some("position startpos moves 7g7f 3c3d"), None, &[]).unwrap();
        assert_eq!(pos, expected);
    }

    #[test]
    fn load_position_rejects_illegal_moves() {
        let moves = vec!["7g7e".to_string()];
        assert!(load_position(None, None, &moves).is_err());
        assert!(load_position(Some("position startpos moves 5a5b"), None, &[]).is_err());
    }

    #[test]
    fn load_position_from_csa_gz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.csa.gz");
        crate::common::io::write_output(&path, b"V2.2\nPI\n+\n+7776FU\n-3334FU\n%TORYO\n").unwrap();
        let pos = load_position(None, Some(&path), &[]).unwrap();
        let expected = load_position(Some("position startpos moves 7g7f 3c3d"), None, &[]).unwrap();
        assert_eq!(pos.to_sfen(), expected.to_sfen());
    }

    #[test]
    fn load_position_rejects_both_sources() {
        let path = Path::new("unused.csa");
        assert!(load_position(Some("startpos"), Some(path), &[]).is_err());
    }
}
