//! CSA形式の棋譜・局面ファイルの読み込み
//!
//! 対応する行:
//! - `PI`（平手。`PI82HI22KA` のような駒落ち指定も可）
//! - `P1`〜`P9`（一段ずつの盤面）
//! - `P+` / `P-`（駒の配置。`00` は持ち駒）
//! - `+` / `-`（手番）、`+7776FU` 形式の指し手
//! - `'` コメント、`V` `N` `$` `T` 行は読み飛ばす。`%` 行で終わる

use thiserror::Error;

use crate::movegen::legal_moves;
use crate::types::{Color, Move, Piece, PieceType, Square};

use super::pos::Position;
use super::sfen::SFEN_HIRATE;
use super::zobrist::zobrist_side;

/// CSAパースエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsaError {
    #[error("line {line}: invalid board row: {text}")]
    Row { line: usize, text: String },
    #[error("line {line}: invalid piece placement: {text}")]
    Placement { line: usize, text: String },
    #[error("line {line}: invalid move: {text}")]
    Move { line: usize, text: String },
    #[error("line {line}: illegal move: {text}")]
    IllegalMove { line: usize, text: String },
}

impl Position {
    /// CSA形式のテキストから局面を設定し、棋譜の手を最後まで進める
    ///
    /// 戻り値は進めた手の列。
    pub fn set_csa(&mut self, text: &str) -> Result<Vec<Move>, CsaError> {
        *self = Position::new();
        let mut moves = Vec::new();
        let mut side_seen = false;

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            for stmt in raw.split(',') {
                let stmt = stmt.trim_end();
                if stmt.is_empty() {
                    continue;
                }
                match stmt.as_bytes()[0] {
                    b'\'' | b'V' | b'N' | b'$' | b'T' => {}
                    b'%' => return Ok(moves),
                    b'P' => self.parse_csa_placement(stmt, line)?,
                    b'+' | b'-' if stmt.len() == 1 => {
                        if let Some(c) = stmt.chars().next().and_then(Color::from_csa_char) {
                            self.set_side(c);
                        }
                        side_seen = true;
                    }
                    b'+' | b'-' => {
                        if !side_seen {
                            // 手番行のない棋譜は先手から
                            self.set_side(Color::Black);
                            side_seen = true;
                        }
                        let m = self.parse_csa_move(stmt, line)?;
                        let _ = self.do_move(m);
                        moves.push(m);
                    }
                    _ => {
                        return Err(CsaError::Placement { line, text: stmt.to_string() });
                    }
                }
            }
        }
        Ok(moves)
    }

    fn set_side(&mut self, c: Color) {
        if self.side_to_move != c {
            self.side_to_move = c;
            self.key ^= zobrist_side();
        }
    }

    fn parse_csa_placement(&mut self, stmt: &str, line: usize) -> Result<(), CsaError> {
        let bad = || CsaError::Placement { line, text: stmt.to_string() };
        if !stmt.is_ascii() {
            return Err(bad());
        }
        let body = &stmt[1..];
        if let Some(rest) = body.strip_prefix('I') {
            self.set_sfen(SFEN_HIRATE).map_err(|_| bad())?;
            // 駒落ち: 4文字ずつ (升, 駒)
            for chunk in rest.as_bytes().chunks(4) {
                let chunk = std::str::from_utf8(chunk).map_err(|_| bad())?;
                let sq = Square::from_csa(chunk.get(0..2).ok_or_else(bad)?).ok_or_else(bad)?;
                self.remove_csa_piece(sq).ok_or_else(bad)?;
            }
            return Ok(());
        }
        if let Some(c) = body.chars().next().and_then(Color::from_csa_char) {
            let rest = &body[1..];
            if rest.len() % 4 != 0 {
                return Err(bad());
            }
            for chunk in rest.as_bytes().chunks(4) {
                let chunk = std::str::from_utf8(chunk).map_err(|_| bad())?;
                let pt = PieceType::from_csa_name(&chunk[2..4]).ok_or_else(bad)?;
                if &chunk[0..2] == "00" {
                    if pt == PieceType::King || pt.is_promoted() {
                        return Err(bad());
                    }
                    self.add_hand(c, pt);
                    self.material = crate::eval::evaluate(self);
                } else {
                    let sq = Square::from_csa(&chunk[0..2]).ok_or_else(bad)?;
                    if self.piece_on(sq).is_some() {
                        return Err(bad());
                    }
                    self.put_piece(Piece::new(c, pt), sq);
                    self.material = crate::eval::evaluate(self);
                }
            }
            return Ok(());
        }
        self.parse_csa_row(stmt, line)
    }

    fn parse_csa_row(&mut self, stmt: &str, line: usize) -> Result<(), CsaError> {
        let bad = || CsaError::Row { line, text: stmt.to_string() };
        let rank = stmt[1..2].parse::<u8>().ok().filter(|r| (1..=9).contains(r)).ok_or_else(bad)? - 1;
        let cells = &stmt[2..];
        if cells.len() < 27 {
            return Err(bad());
        }
        for (i, cell) in cells.as_bytes().chunks(3).take(9).enumerate() {
            let file = 8 - i as u8;
            let sq = Square::new(file, rank);
            let cell = std::str::from_utf8(cell).map_err(|_| bad())?;
            if cell.trim() == "*" {
                continue;
            }
            let color = cell.chars().next().and_then(Color::from_csa_char).ok_or_else(bad)?;
            let pt = PieceType::from_csa_name(&cell[1..]).ok_or_else(bad)?;
            if self.piece_on(sq).is_some() {
                return Err(bad());
            }
            self.put_piece(Piece::new(color, pt), sq);
        }
        self.material = crate::eval::evaluate(self);
        Ok(())
    }

    fn remove_csa_piece(&mut self, sq: Square) -> Option<()> {
        let pc = self.piece_on(sq);
        pc.piece_type()?;
        self.board[sq.index()] = Piece::NONE;
        self.key ^= super::zobrist::zobrist_psq(pc, sq);
        self.material = crate::eval::evaluate(self);
        Some(())
    }

    fn parse_csa_move(&self, stmt: &str, line: usize) -> Result<Move, CsaError> {
        let bad = || CsaError::Move { line, text: stmt.to_string() };
        if !stmt.is_ascii() || stmt.len() < 7 {
            return Err(bad());
        }
        let color = stmt.chars().next().and_then(Color::from_csa_char).ok_or_else(bad)?;
        if color != self.side_to_move() {
            return Err(CsaError::IllegalMove { line, text: stmt.to_string() });
        }
        let to = Square::from_csa(&stmt[3..5]).ok_or_else(bad)?;
        let after = PieceType::from_csa_name(&stmt[5..7]).ok_or_else(bad)?;
        let m = if &stmt[1..3] == "00" {
            Move::drop(after, to)
        } else {
            let from = Square::from_csa(&stmt[1..3]).ok_or_else(bad)?;
            let before = self.piece_on(from).piece_type().ok_or_else(bad)?;
            Move::normal(from, to, before != after && before.promote() == after)
        };
        if legal_moves(self).contains(&m) {
            Ok(m)
        } else {
            Err(CsaError::IllegalMove { line, text: stmt.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csa_hirate_with_moves() {
        let text = "V2.2\nN+sente\nN-gote\nPI\n+\n+7776FU\nT3\n-3334FU\n+8822UM\n%TORYO\n";
        let mut pos = Position::new();
        let moves = pos.set_csa(text).unwrap();
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[2].to_usi(), "8h2b+");
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.hand(Color::Black).count(PieceType::Bishop), 1);
        assert_eq!(pos.material(), crate::eval::evaluate(&pos));
    }

    #[test]
    fn test_csa_rows_and_hands() {
        let text = "\
P1 *  *  *  * -OU *  *  *  * \n\
P2 *  *  *  *  *  *  *  *  * \n\
P3 *  *  *  * +FU *  *  *  * \n\
P4 *  *  *  *  *  *  *  *  * \n\
P5 *  *  *  *  *  *  *  *  * \n\
P6 *  *  *  *  *  *  *  *  * \n\
P7 *  *  *  *  *  *  *  *  * \n\
P8 *  *  *  *  *  *  *  *  * \n\
P9 *  *  *  *  *  *  *  *  * \n\
P+00KI\n\
+\n";
        let mut pos = Position::new();
        pos.set_csa(text).unwrap();
        let mut expected = Position::new();
        expected.set_sfen("4k4/9/4P4/9/9/9/9/9/9 b G 1").unwrap();
        assert_eq!(pos.to_sfen(), expected.to_sfen());
        assert_eq!(pos.key(), expected.key());
    }

    #[test]
    fn test_csa_illegal_move() {
        let text = "PI\n+\n+7775FU\n";
        let mut pos = Position::new();
        assert!(matches!(pos.set_csa(text), Err(CsaError::IllegalMove { line: 3, .. })));
    }

    #[test]
    fn test_csa_handicap() {
        // 角落ち
        let mut pos = Position::new();
        pos.set_csa("PI22KA\n-\n").unwrap();
        assert_eq!(pos.piece_on(Square::new(1, 1)), Piece::NONE);
        assert_eq!(pos.side_to_move(), Color::White);
    }

    #[test]
    fn test_csa_multibyte_is_an_error() {
        let mut pos = Position::new();
        assert!(matches!(pos.set_csa("Pあ\n+\n"), Err(CsaError::Placement { line: 1, .. })));
        assert!(matches!(pos.set_csa("P1あ\n"), Err(CsaError::Placement { line: 1, .. })));
        assert!(matches!(pos.set_csa("PI\n+\n+77７6FU\n"), Err(CsaError::Move { line: 3, .. })));
        assert!(matches!(pos.set_csa("あ\n"), Err(CsaError::Placement { line: 1, .. })));
    }

    #[test]
    fn test_csa_multibyte_comments_and_names_are_skipped() {
        let mut pos = Position::new();
        let moves = pos.set_csa("N+先手\nN-後手\nPI\n'初手\n+\n+7776FU\n").unwrap();
        assert_eq!(moves.len(), 1);
    }
}
