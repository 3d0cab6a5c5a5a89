//! 局面本体

use crate::eval::{hand_piece_value, piece_value};
use crate::types::{Color, Hand, Move, Piece, PieceType, Square, Value};

use super::zobrist::{zobrist_hand, zobrist_psq, zobrist_side};

/// 1手分の巻き戻し情報
///
/// `do_move` が返し、`undo_move` に渡す。探索の各フレームが自分のものを持つので
/// 局面側にスタックは置かない。
#[derive(Debug, Clone, Copy)]
#[must_use = "the move must be undone with undo_move"]
pub struct UndoInfo {
    mv: Move,
    captured: Piece,
    key: u64,
    material: Value,
    last_move: Move,
}

impl UndoInfo {
    /// 指した手
    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// 取った駒（なければ `Piece::NONE`）
    #[inline]
    pub fn captured(&self) -> Piece {
        self.captured
    }
}

/// 局面
///
/// 盤面配列・手駒・手番に加え、Zobristキーと駒割りを差分更新で保持する。
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    pub(super) board: [Piece; Square::NUM],
    pub(super) hands: [Hand; Color::NUM],
    pub(super) side_to_move: Color,
    pub(super) king_square: [Option<Square>; Color::NUM],
    pub(super) key: u64,
    pub(super) material: Value,
    pub(super) last_move: Move,
    pub(super) game_ply: i32,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// 空の局面
    pub fn new() -> Self {
        Position {
            board: [Piece::NONE; Square::NUM],
            hands: [Hand::EMPTY; Color::NUM],
            side_to_move: Color::Black,
            king_square: [None; Color::NUM],
            key: 0,
            material: Value::ZERO,
            last_move: Move::NONE,
            game_ply: 1,
        }
    }

    // =========================================================================
    // アクセサ
    // =========================================================================

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Piece {
        self.board[sq.index()]
    }

    #[inline]
    pub fn hand(&self, c: Color) -> &Hand {
        &self.hands[c.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// 玉の位置（詰将棋の攻め方のように玉がない場合はNone）
    #[inline]
    pub fn king_square(&self, c: Color) -> Option<Square> {
        self.king_square[c.index()]
    }

    /// 局面のハッシュキー
    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// 駒割り（先手から見た値）
    #[inline]
    pub fn material(&self) -> Value {
        self.material
    }

    /// 直前の指し手（初期局面ではNONE）
    #[inline]
    pub fn last_move(&self) -> Move {
        self.last_move
    }

    #[inline]
    pub fn game_ply(&self) -> i32 {
        self.game_ply
    }

    // =========================================================================
    // 盤面操作（キー・駒割りの整合はここで保つ）
    // =========================================================================

    pub(super) fn put_piece(&mut self, pc: Piece, sq: Square) {
        debug_assert!(self.board[sq.index()].is_none());
        self.board[sq.index()] = pc;
        self.key ^= zobrist_psq(pc, sq);
        if pc.piece_type() == Some(PieceType::King) {
            self.king_square[pc.color().index()] = Some(sq);
        }
    }

    fn remove_piece(&mut self, sq: Square) -> Piece {
        let pc = self.board[sq.index()];
        debug_assert!(pc.is_some());
        self.board[sq.index()] = Piece::NONE;
        self.key ^= zobrist_psq(pc, sq);
        if pc.piece_type() == Some(PieceType::King) {
            self.king_square[pc.color().index()] = None;
        }
        pc
    }

    pub(super) fn add_hand(&mut self, c: Color, pt: PieceType) {
        self.hands[c.index()].add(pt);
        self.key = self.key.wrapping_add(zobrist_hand(c, pt));
    }

    fn sub_hand(&mut self, c: Color, pt: PieceType) {
        self.hands[c.index()].sub(pt);
        self.key = self.key.wrapping_sub(zobrist_hand(c, pt));
    }

    /// 先手から見た符号をつける
    #[inline]
    fn signed(c: Color, v: Value) -> Value {
        match c {
            Color::Black => v,
            Color::White => -v,
        }
    }

    // =========================================================================
    // 手の実行・巻き戻し
    // =========================================================================

    /// 手を指す
    ///
    /// 疑似合法手を前提とし、自玉を取られる形も許す（玉を取る手だけは指さない前提）。
    pub fn do_move(&mut self, m: Move) -> UndoInfo {
        let us = self.side_to_move;
        let mut undo = UndoInfo {
            mv: m,
            captured: Piece::NONE,
            key: self.key,
            material: self.material,
            last_move: self.last_move,
        };

        if let Some(pt) = m.drop_piece() {
            // 手駒と盤上の駒の価値は同じなので駒割りは変わらない
            self.sub_hand(us, pt);
            self.put_piece(Piece::new(us, pt), m.to());
        } else {
            let from = m.from();
            let to = m.to();
            let pc = self.remove_piece(from);
            let Some(pt) = pc.piece_type() else {
                debug_assert!(false, "no piece on {}", from.to_usi());
                return undo;
            };

            let captured = self.piece_on(to);
            if let Some(cap) = captured.piece_type() {
                self.remove_piece(to);
                if cap != PieceType::King {
                    self.add_hand(us, cap.unpromote());
                }
                let gain = piece_value(cap) + hand_piece_value(cap);
                self.material += Self::signed(us, gain);
                undo.captured = captured;
            }

            let moved = if m.is_promotion() {
                let promoted = pt.promote();
                self.material += Self::signed(us, piece_value(promoted) - piece_value(pt));
                promoted
            } else {
                pt
            };
            self.put_piece(Piece::new(us, moved), to);
        }

        self.side_to_move = !us;
        self.key ^= zobrist_side();
        self.last_move = m;
        self.game_ply += 1;
        undo
    }

    /// 手を戻す
    pub fn undo_move(&mut self, undo: UndoInfo) {
        let us = !self.side_to_move;
        let m = undo.mv;

        if let Some(pt) = m.drop_piece() {
            self.remove_piece(m.to());
            self.add_hand(us, pt);
        } else {
            let moved = self.remove_piece(m.to());
            let original = match moved.piece_type() {
                Some(pt) if m.is_promotion() => Piece::new(us, pt.unpromote()),
                _ => moved,
            };
            self.put_piece(original, m.from());
            if let Some(cap) = undo.captured.piece_type() {
                if cap != PieceType::King {
                    self.sub_hand(us, cap.unpromote());
                }
                self.put_piece(undo.captured, m.to());
            }
        }

        self.side_to_move = us;
        self.key = undo.key;
        self.material = undo.material;
        self.last_move = undo.last_move;
        self.game_ply -= 1;
    }

    // =========================================================================
    // 合法性
    // =========================================================================

    /// 疑似合法手が自玉を取られる形にならないか
    pub fn is_legal(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let mut next = self.clone();
        let _ = next.do_move(m);
        next.king_square(us).is_none_or(|ksq| !next.is_attacked(ksq, !us))
    }

    /// 手が相手玉に王手をかけるか
    pub fn gives_check(&self, m: Move) -> bool {
        let mut next = self.clone();
        let _ = next.do_move(m);
        next.in_check()
    }

    /// 直前の手が歩打ちで、手番側に合法手がない（打ち歩詰め）
    pub fn is_pawn_drop_mate_pending(&self) -> bool {
        self.last_move.drop_piece() == Some(PieceType::Pawn)
            && self.in_check()
            && !crate::movegen::has_legal_move(self)
    }

    /// USI形式の手を解析し、この局面で合法かどうかも確かめる
    pub fn parse_usi_move(&self, s: &str) -> Result<Move, super::MoveParseError> {
        let m = Move::from_usi(s).ok_or_else(|| super::MoveParseError::Syntax(s.to_string()))?;
        if crate::movegen::legal_moves(self).contains(&m) {
            Ok(m)
        } else {
            Err(super::MoveParseError::Illegal(s.to_string()))
        }
    }

    /// CSA形式の手（"+7776FU"）
    pub fn move_to_csa(&self, m: Move) -> String {
        let us = self.side_to_move.to_csa_char();
        if let Some(pt) = m.drop_piece() {
            return format!("{us}00{}{}", m.to().to_csa(), pt.csa_name());
        }
        let pt = self.piece_on(m.from()).piece_type().unwrap_or(PieceType::King);
        let after = if m.is_promotion() { pt.promote() } else { pt };
        format!("{us}{}{}{}", m.from().to_csa(), m.to().to_csa(), after.csa_name())
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Position({})", self.to_sfen())
    }
}
