//! 駒種（PieceType）と駒（Piece）

use super::Color;

/// 駒種（先後の区別なし）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceType {
    // 生駒
    Pawn = 1,
    Lance = 2,
    Knight = 3,
    Silver = 4,
    Bishop = 5,
    Rook = 6,
    Gold = 7,
    King = 8,
    // 成駒
    ProPawn = 9,
    ProLance = 10,
    ProKnight = 11,
    ProSilver = 12,
    Horse = 13,  // 成角
    Dragon = 14, // 成飛
}

impl PieceType {
    /// 有効な駒種の数（1-14）
    pub const NUM: usize = 14;

    /// 手駒になる駒種一覧（SFENの手駒出力順）
    pub const HAND_PIECES: [PieceType; 7] = [
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Gold,
        PieceType::Silver,
        PieceType::Knight,
        PieceType::Lance,
        PieceType::Pawn,
    ];

    /// 成れるかどうか
    #[inline]
    pub const fn can_promote(self) -> bool {
        matches!(
            self,
            PieceType::Pawn
                | PieceType::Lance
                | PieceType::Knight
                | PieceType::Silver
                | PieceType::Bishop
                | PieceType::Rook
        )
    }

    /// 成り駒を返す（成れない場合はそのまま）
    #[inline]
    pub const fn promote(self) -> PieceType {
        match self {
            PieceType::Pawn => PieceType::ProPawn,
            PieceType::Lance => PieceType::ProLance,
            PieceType::Knight => PieceType::ProKnight,
            PieceType::Silver => PieceType::ProSilver,
            PieceType::Bishop => PieceType::Horse,
            PieceType::Rook => PieceType::Dragon,
            _ => self,
        }
    }

    /// 生駒を返す（既に生駒の場合はそのまま）
    #[inline]
    pub const fn unpromote(self) -> PieceType {
        match self {
            PieceType::ProPawn => PieceType::Pawn,
            PieceType::ProLance => PieceType::Lance,
            PieceType::ProKnight => PieceType::Knight,
            PieceType::ProSilver => PieceType::Silver,
            PieceType::Horse => PieceType::Bishop,
            PieceType::Dragon => PieceType::Rook,
            _ => self,
        }
    }

    /// 成駒かどうか
    #[inline]
    pub const fn is_promoted(self) -> bool {
        self as u8 >= 9
    }

    /// インデックス（1-14）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// u8から変換（範囲チェックあり）
    #[inline]
    pub const fn from_u8(n: u8) -> Option<PieceType> {
        Some(match n {
            1 => PieceType::Pawn,
            2 => PieceType::Lance,
            3 => PieceType::Knight,
            4 => PieceType::Silver,
            5 => PieceType::Bishop,
            6 => PieceType::Rook,
            7 => PieceType::Gold,
            8 => PieceType::King,
            9 => PieceType::ProPawn,
            10 => PieceType::ProLance,
            11 => PieceType::ProKnight,
            12 => PieceType::ProSilver,
            13 => PieceType::Horse,
            14 => PieceType::Dragon,
            _ => return None,
        })
    }

    /// SFENの駒文字（先手＝大文字、成駒は生駒の文字）
    pub const fn sfen_char(self) -> char {
        match self.unpromote() {
            PieceType::Pawn => 'P',
            PieceType::Lance => 'L',
            PieceType::Knight => 'N',
            PieceType::Silver => 'S',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Gold => 'G',
            _ => 'K',
        }
    }

    /// SFENの駒文字（大文字）から生駒へ
    pub const fn from_sfen_char(c: char) -> Option<PieceType> {
        Some(match c {
            'P' => PieceType::Pawn,
            'L' => PieceType::Lance,
            'N' => PieceType::Knight,
            'S' => PieceType::Silver,
            'B' => PieceType::Bishop,
            'R' => PieceType::Rook,
            'G' => PieceType::Gold,
            'K' => PieceType::King,
            _ => return None,
        })
    }

    /// CSA形式の駒名
    pub const fn csa_name(self) -> &'static str {
        match self {
            PieceType::Pawn => "FU",
            PieceType::Lance => "KY",
            PieceType::Knight => "KE",
            PieceType::Silver => "GI",
            PieceType::Bishop => "KA",
            PieceType::Rook => "HI",
            PieceType::Gold => "KI",
            PieceType::King => "OU",
            PieceType::ProPawn => "TO",
            PieceType::ProLance => "NY",
            PieceType::ProKnight => "NK",
            PieceType::ProSilver => "NG",
            PieceType::Horse => "UM",
            PieceType::Dragon => "RY",
        }
    }

    /// CSA形式の駒名から変換
    pub fn from_csa_name(s: &str) -> Option<PieceType> {
        (1..=Self::NUM as u8)
            .filter_map(PieceType::from_u8)
            .find(|pt| pt.csa_name() == s)
    }
}

/// 先後付きの駒
///
/// 下位4bitが駒種、bit4が後手フラグ。0は駒なし。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Piece(u8);

impl Piece {
    /// 駒なし
    pub const NONE: Piece = Piece(0);

    const WHITE_BIT: u8 = 16;

    /// 手番と駒種から生成
    #[inline]
    pub const fn new(color: Color, pt: PieceType) -> Piece {
        match color {
            Color::Black => Piece(pt as u8),
            Color::White => Piece(pt as u8 | Self::WHITE_BIT),
        }
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    /// 駒の手番（駒なしのときは呼ばない）
    #[inline]
    pub const fn color(self) -> Color {
        debug_assert!(self.0 != 0);
        if self.0 & Self::WHITE_BIT != 0 { Color::White } else { Color::Black }
    }

    /// 駒種（駒なしのときはNone）
    #[inline]
    pub const fn piece_type(self) -> Option<PieceType> {
        PieceType::from_u8(self.0 & 0x0f)
    }

    /// 指定手番の駒かどうか
    #[inline]
    pub const fn is_color(self, c: Color) -> bool {
        self.0 != 0 && self.color() as u8 == c as u8
    }

    /// インデックス（Zobrist表用、0-31）
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// SFEN形式の文字列（"+p" 等）
    pub fn to_sfen(self) -> String {
        let Some(pt) = self.piece_type() else {
            return String::new();
        };
        let c = match self.color() {
            Color::Black => pt.sfen_char(),
            Color::White => pt.sfen_char().to_ascii_lowercase(),
        };
        if pt.is_promoted() { format!("+{c}") } else { c.to_string() }
    }
}
