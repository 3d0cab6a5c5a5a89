//! 指し手生成器

use crate::position::{oriented, slides, steps, Position};
use crate::types::{Color, Move, MoveList, PieceType, Square};

/// 移動先の種類
#[derive(Clone, Copy, PartialEq, Eq)]
enum Targets {
    /// 空き升と相手の駒
    All,
    /// 相手の駒のみ
    Captures,
}

/// 成り・不成の生成方針
#[derive(Clone, Copy, PartialEq, Eq)]
enum Promotions {
    /// 歩・角・飛の成れる不成は生成しない
    Major,
    /// 全て生成する
    All,
}

/// 盤上の駒の移動を1つ追加する（成り・不成の展開込み）
#[inline]
fn push_moves(
    list: &mut MoveList,
    us: Color,
    pt: PieceType,
    from: Square,
    to: Square,
    promos: Promotions,
) {
    let can_promote =
        pt.can_promote() && (from.in_promotion_zone(us) || to.in_promotion_zone(us));
    let rank = to.relative_rank(us);
    let must_promote = match pt {
        PieceType::Pawn | PieceType::Lance => rank == 0,
        PieceType::Knight => rank <= 1,
        _ => false,
    };

    if can_promote {
        list.push(Move::normal(from, to, true));
    }
    if must_promote {
        return;
    }
    if can_promote
        && promos == Promotions::Major
        && matches!(pt, PieceType::Pawn | PieceType::Bishop | PieceType::Rook)
    {
        return;
    }
    list.push(Move::normal(from, to, false));
}

/// 疑似合法手の生成
fn generate_pseudo(pos: &Position, list: &mut MoveList, targets: Targets, promos: Promotions) {
    let us = pos.side_to_move();

    for from in Square::all() {
        let pc = pos.piece_on(from);
        if !pc.is_color(us) {
            continue;
        }
        let Some(pt) = pc.piece_type() else {
            continue;
        };

        for &d in steps(pt) {
            let (df, dr) = oriented(d, us);
            let Some(to) = from.offset(df, dr) else {
                continue;
            };
            let target = pos.piece_on(to);
            if target.is_color(us) || (targets == Targets::Captures && target.is_none()) {
                continue;
            }
            push_moves(list, us, pt, from, to, promos);
        }

        for &d in slides(pt) {
            let (df, dr) = oriented(d, us);
            let mut cur = from;
            while let Some(to) = cur.offset(df, dr) {
                let target = pos.piece_on(to);
                if target.is_color(us) {
                    break;
                }
                if target.is_some() || targets == Targets::All {
                    push_moves(list, us, pt, from, to, promos);
                }
                if target.is_some() {
                    break;
                }
                cur = to;
            }
        }
    }

    if targets == Targets::All {
        generate_drops(pos, list);
    }
}

/// 駒打ち（二歩・行き所のない駒は除く。打ち歩詰めはここでは見ない）
fn generate_drops(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    let hand = pos.hand(us);
    if hand.is_empty() {
        return;
    }

    let mut pawn_files = [false; 9];
    for sq in Square::all() {
        let pc = pos.piece_on(sq);
        if pc.is_color(us) && pc.piece_type() == Some(PieceType::Pawn) {
            pawn_files[sq.file() as usize] = true;
        }
    }

    for pt in PieceType::HAND_PIECES {
        if !hand.has(pt) {
            continue;
        }
        for to in Square::all() {
            if pos.piece_on(to).is_some() {
                continue;
            }
            let rank = to.relative_rank(us);
            let dead = match pt {
                PieceType::Pawn => rank == 0 || pawn_files[to.file() as usize],
                PieceType::Lance => rank == 0,
                PieceType::Knight => rank <= 1,
                _ => false,
            };
            if !dead {
                list.push(Move::drop(pt, to));
            }
        }
    }
}

/// 王手回避手（合法手のみ）
fn generate_evasions(pos: &Position, list: &mut MoveList, promos: Promotions) {
    let mut pseudo = MoveList::new();
    generate_pseudo(pos, &mut pseudo, Targets::All, promos);
    list.extend(pseudo.into_iter().filter(|&m| pos.is_legal(m)));
}

/// 打ち歩詰めになる歩打ちかどうか
fn is_pawn_drop_mate(pos: &Position, m: Move) -> bool {
    if m.drop_piece() != Some(PieceType::Pawn) {
        return false;
    }
    let us = pos.side_to_move();
    let Some(ksq) = pos.king_square(!us) else {
        return false;
    };
    if m.to().offset(0, us.forward()) != Some(ksq) {
        return false;
    }
    let mut next = pos.clone();
    let _ = next.do_move(m);
    !has_legal_move(&next)
}

/// 疑似合法手。自玉を取られる手も含む（王手されているときだけ回避手に絞る）
pub fn generate_fast(pos: &Position, list: &mut MoveList) {
    if pos.in_check() {
        generate_evasions(pos, list, Promotions::Major);
    } else {
        generate_pseudo(pos, list, Targets::All, Promotions::Major);
    }
}

/// 駒を取る疑似合法手（王手されているときは回避手）
pub fn generate_captures(pos: &Position, list: &mut MoveList) {
    if pos.in_check() {
        generate_evasions(pos, list, Promotions::Major);
    } else {
        generate_pseudo(pos, list, Targets::Captures, Promotions::Major);
    }
}

/// 王手になる合法手
///
/// 打ち歩詰めの歩打ちも含む。受け側の局面で合法手がないことから判定する。
pub fn generate_checks(pos: &Position, list: &mut MoveList) {
    let mut pseudo = MoveList::new();
    generate_pseudo(pos, &mut pseudo, Targets::All, Promotions::All);
    list.extend(pseudo.into_iter().filter(|&m| pos.is_legal(m) && pos.gives_check(m)));
}

/// 全合法手
pub fn generate_legal(pos: &Position, list: &mut MoveList) {
    let mut pseudo = MoveList::new();
    generate_pseudo(pos, &mut pseudo, Targets::All, Promotions::All);
    list.extend(pseudo.into_iter().filter(|&m| pos.is_legal(m) && !is_pawn_drop_mate(pos, m)));
}

/// 全合法手をリストで返す
pub fn legal_moves(pos: &Position) -> MoveList {
    let mut list = MoveList::new();
    generate_legal(pos, &mut list);
    list
}

/// 合法手が1つでもあるか
pub fn has_legal_move(pos: &Position) -> bool {
    let mut pseudo = MoveList::new();
    generate_pseudo(pos, &mut pseudo, Targets::All, Promotions::Major);
    pseudo.into_iter().any(|m| pos.is_legal(m))
}
