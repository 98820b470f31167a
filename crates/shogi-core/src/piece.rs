//! Shogi piece representation.

use crate::Color;
use std::fmt;

/// The fourteen kinds of shogi pieces.
///
/// Promoted kinds are their base kind plus 8, so `Pawn | 8 == ProPawn`.
/// Gold and King never promote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 1,
    Lance = 2,
    Knight = 3,
    Silver = 4,
    Bishop = 5,
    Rook = 6,
    Gold = 7,
    King = 8,
    ProPawn = 9,
    ProLance = 10,
    ProKnight = 11,
    ProSilver = 12,
    Horse = 13,
    Dragon = 14,
}

impl PieceType {
    /// Size of tables indexed by piece type (index 0 is unused).
    pub const NB: usize = 15;

    /// Bit that marks a promoted kind.
    pub const PROMOTED_BIT: u8 = 8;

    /// All piece types in order.
    pub const ALL: [PieceType; 14] = [
        PieceType::Pawn,
        PieceType::Lance,
        PieceType::Knight,
        PieceType::Silver,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Gold,
        PieceType::King,
        PieceType::ProPawn,
        PieceType::ProLance,
        PieceType::ProKnight,
        PieceType::ProSilver,
        PieceType::Horse,
        PieceType::Dragon,
    ];

    /// Piece types that can be held in hand, in index order.
    pub const HAND: [PieceType; 7] = [
        PieceType::Pawn,
        PieceType::Lance,
        PieceType::Knight,
        PieceType::Silver,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Gold,
    ];

    /// Creates a piece type from its raw value (1-14).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index >= 1 && index <= 14 {
            Some(Self::ALL[index as usize - 1])
        } else {
            None
        }
    }

    /// Returns the raw value (1-14).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true for the six kinds that have a promoted form.
    #[inline]
    pub const fn can_promote(self) -> bool {
        (self as u8) < PieceType::Gold as u8
    }

    /// Returns true for promoted kinds.
    #[inline]
    pub const fn is_promoted(self) -> bool {
        (self as u8) > PieceType::King as u8
    }

    /// Returns the promoted kind, or `self` if it cannot promote.
    #[inline]
    pub const fn promoted(self) -> Self {
        if self.can_promote() {
            Self::ALL[(self as u8 | Self::PROMOTED_BIT) as usize - 1]
        } else {
            self
        }
    }

    /// Returns the unpromoted kind. Captured pieces go to hand in this form.
    #[inline]
    pub const fn unpromoted(self) -> Self {
        if self.is_promoted() {
            Self::ALL[(self as u8 & !Self::PROMOTED_BIT) as usize - 1]
        } else {
            self
        }
    }

    /// Returns true for kinds whose attacks depend on occupancy.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(
            self,
            PieceType::Lance
                | PieceType::Bishop
                | PieceType::Rook
                | PieceType::Horse
                | PieceType::Dragon
        )
    }

    /// Returns true for the major pieces (bishop, rook and their promotions).
    #[inline]
    pub const fn is_major(self) -> bool {
        matches!(
            self,
            PieceType::Bishop | PieceType::Rook | PieceType::Horse | PieceType::Dragon
        )
    }

    /// Returns the uppercase USI letter of the unpromoted kind.
    pub const fn usi_char(self) -> char {
        match self.unpromoted() {
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

    /// Parses an uppercase USI letter into an unpromoted kind.
    pub const fn from_usi_char(c: char) -> Option<Self> {
        match c {
            'P' => Some(PieceType::Pawn),
            'L' => Some(PieceType::Lance),
            'N' => Some(PieceType::Knight),
            'S' => Some(PieceType::Silver),
            'B' => Some(PieceType::Bishop),
            'R' => Some(PieceType::Rook),
            'G' => Some(PieceType::Gold),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::Pawn => "Pawn",
            PieceType::Lance => "Lance",
            PieceType::Knight => "Knight",
            PieceType::Silver => "Silver",
            PieceType::Bishop => "Bishop",
            PieceType::Rook => "Rook",
            PieceType::Gold => "Gold",
            PieceType::King => "King",
            PieceType::ProPawn => "Tokin",
            PieceType::ProLance => "Promoted Lance",
            PieceType::ProKnight => "Promoted Knight",
            PieceType::ProSilver => "Promoted Silver",
            PieceType::Horse => "Horse",
            PieceType::Dragon => "Dragon",
        };
        write!(f, "{name}")
    }
}

/// A colored piece packed into one byte: `piece_type | color << 4`.
///
/// `Piece::NONE` (0) marks an empty square.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    /// The empty square.
    pub const NONE: Piece = Piece(0);

    /// Size of tables indexed by raw piece value.
    pub const NB: usize = 32;

    /// Creates a piece of the given type and color.
    #[inline]
    pub const fn new(color: Color, pt: PieceType) -> Self {
        Piece(pt as u8 | (color as u8) << 4)
    }

    /// Returns the raw byte.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns true for the empty square value.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns the piece type, or `None` for the empty value.
    #[inline]
    pub const fn piece_type(self) -> Option<PieceType> {
        PieceType::from_index(self.0 & 0x0F)
    }

    /// Returns the owner. Only meaningful for non-empty pieces.
    #[inline]
    pub const fn color(self) -> Color {
        if self.0 & 0x10 != 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Returns the promoted piece of the same color, or `self`.
    #[inline]
    pub const fn promote(self) -> Self {
        match self.piece_type() {
            Some(pt) if pt.can_promote() => Piece(self.0 | PieceType::PROMOTED_BIT),
            _ => self,
        }
    }

    /// Returns the unpromoted piece of the same color, or `self`.
    #[inline]
    pub const fn unpromoted(self) -> Self {
        match self.piece_type() {
            Some(pt) if pt.is_promoted() => Piece(self.0 & !PieceType::PROMOTED_BIT),
            _ => self,
        }
    }

    /// Returns the SFEN board token (`P`, `+r`, ...), or `None` when empty.
    pub fn to_usi(self) -> Option<String> {
        let pt = self.piece_type()?;
        let c = match self.color() {
            Color::Black => pt.usi_char(),
            Color::White => pt.usi_char().to_ascii_lowercase(),
        };
        Some(if pt.is_promoted() {
            format!("+{c}")
        } else {
            c.to_string()
        })
    }

    /// Parses an SFEN board token such as `"p"` or `"+B"`.
    ///
    /// Promotion prefixes on kinds that cannot promote are rejected.
    pub fn from_usi(s: &str) -> Option<Self> {
        let (promoted, letter) = match s.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let mut chars = letter.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let color = if c.is_ascii_uppercase() {
            Color::Black
        } else {
            Color::White
        };
        let pt = PieceType::from_usi_char(c.to_ascii_uppercase())?;
        if promoted && !pt.can_promote() {
            return None;
        }
        let pt = if promoted { pt.promoted() } else { pt };
        Some(Piece::new(color, pt))
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_usi() {
            Some(s) => write!(f, "Piece({s})"),
            None => write!(f, "Piece(-)"),
        }
    }
}

/// Stable identity of one of the 40 physical pieces.
///
/// Kings are numbered 0 (Black) and 1 (White); the remaining ids are handed
/// out in board then hand order when a position is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceNo(u8);

impl PieceNo {
    /// Number of physical pieces.
    pub const NB: usize = 40;

    /// Marks an unused slot.
    pub const NONE: PieceNo = PieceNo(40);

    pub const BLACK_KING: PieceNo = PieceNo(0);
    pub const WHITE_KING: PieceNo = PieceNo(1);

    /// Creates an id from index (0-39).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 40 {
            Some(PieceNo(index))
        } else {
            None
        }
    }

    /// Returns the king id of `color`.
    #[inline]
    pub const fn king(color: Color) -> Self {
        PieceNo(color as u8)
    }

    /// Returns the index (40 for `NONE`).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 >= 40
    }
}
