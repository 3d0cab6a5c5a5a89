//! Zobristハッシュ

use crate::types::{Color, Piece, PieceType, Square};

/// Zobristハッシュ用乱数テーブル
pub struct Zobrist {
    /// 手番用（後手番のときにxorされる）
    pub side: u64,
    /// 駒×升 [Piece.index()][Square.index()]
    pub psq: [[u64; Square::NUM]; 32],
    /// 手駒（加算型）[Color][PieceType.index()]
    pub hand: [[u64; 8]; Color::NUM],
}

impl Zobrist {
    /// テーブル初期化
    pub const fn init() -> Self {
        let mut zobrist = Zobrist {
            side: 0,
            psq: [[0; Square::NUM]; 32],
            hand: [[0; 8]; Color::NUM],
        };

        // XorShift64で疑似乱数生成
        let mut seed = 0x9E37_79B9_7F4A_7C15u64;

        seed = xorshift64(seed);
        zobrist.side = seed;

        // pc == 0 (Piece::NONE) は常に0を保つためスキップ
        let mut pc = 1;
        while pc < 32 {
            let mut sq = 0;
            while sq < Square::NUM {
                seed = xorshift64(seed);
                zobrist.psq[pc][sq] = seed;
                sq += 1;
            }
            pc += 1;
        }

        // 手駒は歩(1)〜金(7)のみ
        let mut c = 0;
        while c < Color::NUM {
            let mut pt = 1;
            while pt < 8 {
                seed = xorshift64(seed);
                zobrist.hand[c][pt] = seed;
                pt += 1;
            }
            c += 1;
        }

        zobrist
    }
}

/// XorShift64疑似乱数生成（const fn対応）
const fn xorshift64(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

/// グローバルZobristテーブル
pub static ZOBRIST: Zobrist = Zobrist::init();

/// 駒と升のハッシュ
#[inline]
pub fn zobrist_psq(pc: Piece, sq: Square) -> u64 {
    ZOBRIST.psq[pc.index()][sq.index()]
}

/// 手番のハッシュ
#[inline]
pub fn zobrist_side() -> u64 {
    ZOBRIST.side
}

/// 手駒1枚分のハッシュ（加算で使う）
#[inline]
pub fn zobrist_hand(c: Color, pt: PieceType) -> u64 {
    ZOBRIST.hand[c.index()][pt.index()]
}
