//! SFEN形式の解析・出力

use thiserror::Error;

use crate::eval::evaluate;
use crate::types::{Color, Piece, PieceType, Square};

use super::pos::Position;
use super::zobrist::zobrist_side;

/// 平手初期局面のSFEN
pub const SFEN_HIRATE: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// SFENパースエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SfenError {
    /// 欄が足りない
    #[error("SFEN must have at least 3 fields: {0:?}")]
    MissingField(String),
    /// 盤面の形式が不正
    #[error("invalid board: {0}")]
    Board(String),
    /// 手番の形式が不正
    #[error("invalid side to move: {0}")]
    SideToMove(String),
    /// 手駒の形式が不正
    #[error("invalid hand: {0}")]
    Hand(String),
    /// 手数の形式が不正
    #[error("invalid ply: {0}")]
    Ply(String),
}

impl Position {
    /// 平手初期局面を設定
    pub fn set_hirate(&mut self) {
        // 定数文字列なので失敗しない
        if let Err(e) = self.set_sfen(SFEN_HIRATE) {
            debug_assert!(false, "{e}");
        }
    }

    /// SFEN文字列から局面を設定
    ///
    /// 玉のない局面（詰将棋の攻め方など）も受け付ける。
    pub fn set_sfen(&mut self, sfen: &str) -> Result<(), SfenError> {
        *self = Position::new();

        let parts: Vec<&str> = sfen.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(SfenError::MissingField(sfen.to_string()));
        }

        self.parse_board(parts[0])?;

        self.side_to_move = match parts[1] {
            "b" => Color::Black,
            "w" => Color::White,
            other => return Err(SfenError::SideToMove(other.to_string())),
        };
        if self.side_to_move == Color::White {
            self.key ^= zobrist_side();
        }

        self.parse_hand(parts[2])?;

        self.game_ply = match parts.get(3) {
            Some(ply) => ply.parse().map_err(|_| SfenError::Ply(ply.to_string()))?,
            None => 1,
        };

        self.material = evaluate(self);
        Ok(())
    }

    fn parse_board(&mut self, board: &str) -> Result<(), SfenError> {
        let rows: Vec<&str> = board.split('/').collect();
        if rows.len() != 9 {
            return Err(SfenError::Board(format!("expected 9 ranks, got {}", rows.len())));
        }
        for (rank, row) in rows.iter().enumerate() {
            // 左端が9筋
            let mut file: i32 = 8;
            let mut promoted = false;
            for c in row.chars() {
                if let Some(n) = c.to_digit(10) {
                    if promoted || n == 0 {
                        return Err(SfenError::Board(row.to_string()));
                    }
                    file -= n as i32;
                    continue;
                }
                if c == '+' {
                    promoted = true;
                    continue;
                }
                let pt = PieceType::from_sfen_char(c.to_ascii_uppercase())
                    .ok_or_else(|| SfenError::Board(format!("unknown piece '{c}'")))?;
                let pt = if promoted {
                    if !pt.can_promote() {
                        return Err(SfenError::Board(format!("'{c}' cannot be promoted")));
                    }
                    pt.promote()
                } else {
                    pt
                };
                promoted = false;
                if file < 0 {
                    return Err(SfenError::Board(row.to_string()));
                }
                let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };
                let sq = Square::new(file as u8, rank as u8);
                if pt == PieceType::King && self.king_square(color).is_some() {
                    return Err(SfenError::Board(format!("two kings for {color}")));
                }
                self.put_piece(Piece::new(color, pt), sq);
                file -= 1;
            }
            if file != -1 || promoted {
                return Err(SfenError::Board(row.to_string()));
            }
        }
        Ok(())
    }

    fn parse_hand(&mut self, hand: &str) -> Result<(), SfenError> {
        if hand == "-" {
            return Ok(());
        }
        let mut count: u32 = 0;
        for c in hand.chars() {
            if let Some(d) = c.to_digit(10) {
                count = count * 10 + d;
                continue;
            }
            let pt = PieceType::from_sfen_char(c.to_ascii_uppercase())
                .filter(|&pt| pt != PieceType::King)
                .ok_or_else(|| SfenError::Hand(hand.to_string()))?;
            let color = if c.is_ascii_uppercase() { Color::Black } else { Color::White };
            let n = if count == 0 { 1 } else { count };
            if n > 18 {
                return Err(SfenError::Hand(hand.to_string()));
            }
            for _ in 0..n {
                self.add_hand(color, pt);
            }
            count = 0;
        }
        if count != 0 {
            return Err(SfenError::Hand(hand.to_string()));
        }
        Ok(())
    }

    /// SFEN文字列を出力
    pub fn to_sfen(&self) -> String {
        let mut board = String::new();
        for rank in 0..9u8 {
            if rank > 0 {
                board.push('/');
            }
            let mut empty = 0;
            for file in (0..9u8).rev() {
                let pc = self.piece_on(Square::new(file, rank));
                if pc.is_none() {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    board.push_str(&empty.to_string());
                    empty = 0;
                }
                board.push_str(&pc.to_sfen());
            }
            if empty > 0 {
                board.push_str(&empty.to_string());
            }
        }

        let side = match self.side_to_move {
            Color::Black => "b",
            Color::White => "w",
        };

        let mut hand = String::new();
        for c in Color::ALL {
            for pt in PieceType::HAND_PIECES {
                let n = self.hand(c).count(pt);
                if n == 0 {
                    continue;
                }
                if n > 1 {
                    hand.push_str(&n.to_string());
                }
                let ch = pt.sfen_char();
                hand.push(if c == Color::Black { ch } else { ch.to_ascii_lowercase() });
            }
        }
        if hand.is_empty() {
            hand.push('-');
        }

        format!("{board} {side} {hand} {}", self.game_ply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn test_hirate_roundtrip() {
        let mut pos = Position::new();
        pos.set_sfen(SFEN_HIRATE).unwrap();
        assert_eq!(pos.to_sfen(), SFEN_HIRATE);
        assert_eq!(pos.king_square(Color::Black), Some(Square::new(4, 8)));
        assert_eq!(pos.king_square(Color::White), Some(Square::new(4, 0)));
        assert_eq!(pos.material(), Value::ZERO);
    }

    #[test]
    fn test_hands_and_promoted() {
        let sfen = "8l/1l+R2P3/p2pBG1pp/kps1p4/Nn1P2G2/P1P1P2PP/1PS6/1KSG3+r1/LN2+p3L w Sbgn3p 124";
        let mut pos = Position::new();
        pos.set_sfen(sfen).unwrap();
        assert_eq!(pos.to_sfen(), sfen);
        assert_eq!(pos.hand(Color::White).count(PieceType::Pawn), 3);
        assert_eq!(pos.side_to_move(), Color::White);
    }

    #[test]
    fn test_side_affects_key() {
        let mut b = Position::new();
        b.set_sfen("4k4/9/9/9/9/9/9/9/4K4 b - 1").unwrap();
        let mut w = Position::new();
        w.set_sfen("4k4/9/9/9/9/9/9/9/4K4 w - 1").unwrap();
        assert_ne!(b.key(), w.key());
    }

    #[test]
    fn test_invalid_sfen() {
        let mut pos = Position::new();
        assert!(matches!(pos.set_sfen("9/9 b -"), Err(SfenError::Board(_))));
        assert!(matches!(pos.set_sfen("4k4/9/9/9/9/9/9/9/4K4 x - 1"), Err(SfenError::SideToMove(_))));
        assert!(matches!(pos.set_sfen("4k4/9/9/9/9/9/9/9/4K4 b 2 1"), Err(SfenError::Hand(_))));
        assert!(matches!(pos.set_sfen("4k4/9/9/9/9/9/9/9/4K5 b - 1"), Err(SfenError::Board(_))));
        assert!(matches!(pos.set_sfen("4k4"), Err(SfenError::MissingField(_))));
    }
}
