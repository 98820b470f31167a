//! Move representation.

use crate::{PieceType, Square};
use std::fmt;

/// Outcomes and pseudo-moves that are never applied to a position.
///
/// They share the [`Move`] value space but live at `1 << 16` and above, so no
/// packed board move or drop can collide with one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SpecialMove {
    Null = 0,
    Resign = 1,
    Win = 2,
    Try = 3,
    Draw = 4,
    Mated = 5,
    RepetitionDraw = 6,
    RepetitionWin = 7,
    RepetitionLose = 8,
    TimeUp = 9,
    Interrupt = 10,
    MaxMovesDraw = 11,
    IllegalActionWin = 12,
    IllegalActionLose = 13,
    IllegalMove = 14,
    MateEngineNoMate = 15,
    MateEngineNotSupported = 16,
    MateEngineTimeout = 17,
}

impl SpecialMove {
    pub const ALL: [SpecialMove; 18] = [
        SpecialMove::Null,
        SpecialMove::Resign,
        SpecialMove::Win,
        SpecialMove::Try,
        SpecialMove::Draw,
        SpecialMove::Mated,
        SpecialMove::RepetitionDraw,
        SpecialMove::RepetitionWin,
        SpecialMove::RepetitionLose,
        SpecialMove::TimeUp,
        SpecialMove::Interrupt,
        SpecialMove::MaxMovesDraw,
        SpecialMove::IllegalActionWin,
        SpecialMove::IllegalActionLose,
        SpecialMove::IllegalMove,
        SpecialMove::MateEngineNoMate,
        SpecialMove::MateEngineNotSupported,
        SpecialMove::MateEngineTimeout,
    ];

    /// Returns the USI token, for the three outcomes that have one.
    pub const fn usi(self) -> Option<&'static str> {
        match self {
            SpecialMove::Null => Some("null"),
            SpecialMove::Resign => Some("resign"),
            SpecialMove::Win => Some("win"),
            _ => None,
        }
    }

    /// Human-readable description.
    pub const fn description(self) -> &'static str {
        match self {
            SpecialMove::Null => "null move",
            SpecialMove::Resign => "resign",
            SpecialMove::Win => "entering king declaration",
            SpecialMove::Try => "try",
            SpecialMove::Draw => "draw",
            SpecialMove::Mated => "checkmate",
            SpecialMove::RepetitionDraw => "repetition draw",
            SpecialMove::RepetitionWin => "repetition win (perpetual check by opponent)",
            SpecialMove::RepetitionLose => "repetition loss (perpetual check)",
            SpecialMove::TimeUp => "time up",
            SpecialMove::Interrupt => "interrupted",
            SpecialMove::MaxMovesDraw => "draw by move limit",
            SpecialMove::IllegalActionWin => "win by opponent's illegal action",
            SpecialMove::IllegalActionLose => "loss by illegal action",
            SpecialMove::IllegalMove => "illegal move",
            SpecialMove::MateEngineNoMate => "no mate found",
            SpecialMove::MateEngineNotSupported => "mate search not supported",
            SpecialMove::MateEngineTimeout => "mate search timed out",
        }
    }
}

impl fmt::Display for SpecialMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A move packed into 32 bits.
///
/// The low 16 bits hold an ordinary move:
/// - bits 0-6: destination square
/// - bits 7-13: source square, or the dropped piece type for drops
/// - bit 14: drop flag
/// - bit 15: promotion flag
///
/// Values from `1 << 16` upward encode a [`SpecialMove`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    const DROP_FLAG: u32 = 1 << 14;
    const PROMOTE_FLAG: u32 = 1 << 15;
    const SPECIAL_BASE: u32 = 1 << 16;

    /// No move. Also returned when no declaration is possible.
    pub const NONE: Move = Move(0);
    pub const NULL: Move = Move::special(SpecialMove::Null);
    pub const RESIGN: Move = Move::special(SpecialMove::Resign);
    pub const WIN: Move = Move::special(SpecialMove::Win);

    /// A board move without promotion.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Move(to.index() as u32 | (from.index() as u32) << 7)
    }

    /// A board move that promotes the moving piece.
    #[inline]
    pub const fn promote(from: Square, to: Square) -> Self {
        Move(Self::normal(from, to).0 | Self::PROMOTE_FLAG)
    }

    /// Drops a piece of type `pt` from hand onto `to`.
    #[inline]
    pub const fn drop(pt: PieceType, to: Square) -> Self {
        Move(to.index() as u32 | (pt as u32) << 7 | Self::DROP_FLAG)
    }

    /// Wraps a special outcome.
    #[inline]
    pub const fn special(sm: SpecialMove) -> Self {
        Move(Self::SPECIAL_BASE + sm as u32)
    }

    /// Rebuilds a move from its raw value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Move(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        // SAFETY: reduced modulo 81, always a valid index
        unsafe { Square::from_index_unchecked((self.0 & 0x7F) as u8 % 81) }
    }

    /// Returns the source square of a board move.
    #[inline]
    pub const fn from(self) -> Square {
        // SAFETY: reduced modulo 81, always a valid index
        unsafe { Square::from_index_unchecked(((self.0 >> 7) & 0x7F) as u8 % 81) }
    }

    /// Returns the dropped piece type, or `None` if this is not a drop.
    #[inline]
    pub const fn dropped_piece(self) -> Option<PieceType> {
        if self.is_drop() {
            PieceType::from_index(((self.0 >> 7) & 0x7F) as u8)
        } else {
            None
        }
    }

    #[inline]
    pub const fn is_drop(self) -> bool {
        !self.is_special() && self.0 & Self::DROP_FLAG != 0
    }

    #[inline]
    pub const fn is_promote(self) -> bool {
        !self.is_special() && self.0 & Self::PROMOTE_FLAG != 0
    }

    #[inline]
    pub const fn is_special(self) -> bool {
        self.0 >= Self::SPECIAL_BASE
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns the special outcome, if this is one.
    #[inline]
    pub const fn special_kind(self) -> Option<SpecialMove> {
        if !self.is_special() {
            return None;
        }
        let idx = self.0 - Self::SPECIAL_BASE;
        if idx < SpecialMove::ALL.len() as u32 {
            Some(SpecialMove::ALL[idx as usize])
        } else {
            None
        }
    }

    /// Returns true for a structurally valid board move or drop.
    ///
    /// Says nothing about legality in a position.
    pub const fn is_ok(self) -> bool {
        if self.is_special() || self.is_none() {
            return false;
        }
        let to = self.0 & 0x7F;
        let from = (self.0 >> 7) & 0x7F;
        if to >= 81 {
            return false;
        }
        if self.0 & Self::DROP_FLAG != 0 {
            self.0 & Self::PROMOTE_FLAG == 0
                && from >= PieceType::Pawn as u32
                && from <= PieceType::Gold as u32
        } else {
            from < 81 && from != to
        }
    }

    /// Returns the USI token (`7g7f`, `2d2c+`, `P*5e`, `resign`, ...).
    ///
    /// Special outcomes without a wire form yield their description.
    pub fn to_usi(self) -> String {
        if let Some(sm) = self.special_kind() {
            return sm.usi().unwrap_or(sm.description()).to_string();
        }
        if let Some(pt) = self.dropped_piece() {
            return format!("{}*{}", pt.usi_char(), self.to());
        }
        if self.is_promote() {
            format!("{}{}+", self.from(), self.to())
        } else {
            format!("{}{}", self.from(), self.to())
        }
    }

    /// Parses a USI move token.
    ///
    /// Only checks the grammar; whether the move is legal is up to the
    /// position.
    pub fn from_usi(s: &str) -> Option<Self> {
        match s {
            "resign" => return Some(Move::RESIGN),
            "win" => return Some(Move::WIN),
            "null" => return Some(Move::NULL),
            _ => {}
        }
        if !s.is_ascii() {
            return None;
        }
        if let Some((piece, to)) = s.split_once('*') {
            let mut chars = piece.chars();
            let pt = PieceType::from_usi_char(chars.next()?)?;
            if chars.next().is_some() || pt == PieceType::King {
                return None;
            }
            return Some(Move::drop(pt, Square::from_usi(to)?));
        }
        let (body, promote) = match s.strip_suffix('+') {
            Some(body) => (body, true),
            None => (s, false),
        };
        if body.len() != 4 {
            return None;
        }
        let from = Square::from_usi(&body[0..2])?;
        let to = Square::from_usi(&body[2..4])?;
        if from == to {
            return None;
        }
        Some(if promote {
            Move::promote(from, to)
        } else {
            Move::normal(from, to)
        })
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Move(none)")
        } else {
            write!(f, "Move({})", self.to_usi())
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_usi())
    }
}

impl From<SpecialMove> for Move {
    fn from(sm: SpecialMove) -> Self {
        Move::special(sm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_usi(s).unwrap()
    }

    #[test]
    fn move_encoding() {
        let m = Move::normal(sq("7g"), sq("7f"));
        assert_eq!(m.from(), sq("7g"));
        assert_eq!(m.to(), sq("7f"));
        assert!(!m.is_drop());
        assert!(!m.is_promote());
        assert!(m.is_ok());
        assert!(m.raw() < 1 << 16);

        let p = Move::promote(sq("2d"), sq("2c"));
        assert!(p.is_promote());
        assert_eq!(p.to(), sq("2c"));

        let d = Move::drop(PieceType::Gold, sq("5e"));
        assert!(d.is_drop());
        assert_eq!(d.dropped_piece(), Some(PieceType::Gold));
        assert_eq!(d.to(), sq("5e"));
        assert!(d.is_ok());
    }

    #[test]
    fn move_usi() {
        assert_eq!(Move::normal(sq("7g"), sq("7f")).to_usi(), "7g7f");
        assert_eq!(Move::promote(sq("2d"), sq("2c")).to_usi(), "2d2c+");
        assert_eq!(Move::drop(PieceType::Pawn, sq("5e")).to_usi(), "P*5e");
        assert_eq!(Move::RESIGN.to_usi(), "resign");
        assert_eq!(Move::WIN.to_usi(), "win");
        assert_eq!(Move::NULL.to_usi(), "null");
    }

    #[test]
    fn move_from_usi() {
        assert_eq!(Move::from_usi("7g7f"), Some(Move::normal(sq("7g"), sq("7f"))));
        assert_eq!(Move::from_usi("2d2c+"), Some(Move::promote(sq("2d"), sq("2c"))));
        assert_eq!(Move::from_usi("S*3c"), Some(Move::drop(PieceType::Silver, sq("3c"))));
        assert_eq!(Move::from_usi("resign"), Some(Move::RESIGN));
        assert_eq!(Move::from_usi("K*5e"), None);
        assert_eq!(Move::from_usi("p*5e"), None);
        assert_eq!(Move::from_usi("7g7g"), None);
        assert_eq!(Move::from_usi("7g7"), None);
        assert_eq!(Move::from_usi("0a1a"), None);
        assert_eq!(Move::from_usi("timeup"), None);
    }

    #[test]
    fn specials_are_disjoint() {
        for sm in SpecialMove::ALL {
            let m = Move::special(sm);
            assert!(m.is_special());
            assert!(!m.is_ok());
            assert!(!m.is_drop());
            assert!(!m.is_promote());
            assert_eq!(m.special_kind(), Some(sm));
        }
        // Every packed ordinary move stays below the special range.
        let max = Move::promote(Square::SQ_99, Square::SQ_99).raw() | 1 << 14;
        assert!(max < Move::NULL.raw());
    }

    #[test]
    fn special_display() {
        assert_eq!(SpecialMove::TimeUp.usi(), None);
        assert_eq!(format!("{}", Move::special(SpecialMove::RepetitionDraw)), "repetition draw");
        assert_eq!(format!("{:?}", Move::NONE), "Move(none)");
        assert!(!Move::NONE.is_ok());
    }

    proptest::proptest! {
        #[test]
        fn parsed_tokens_print_back(token in "[1-9PLNSGBR*][1-9a-i*][1-9a-i][a-i+]?\\+?") {
            if let Some(m) = Move::from_usi(&token) {
                proptest::prop_assert!(m.is_ok());
                proptest::prop_assert_eq!(Move::from_usi(&m.to_usi()), Some(m));
            }
        }

        #[test]
        fn arbitrary_text_never_panics(token in "\\PC{0,8}") {
            let _ = Move::from_usi(&token);
        }
    }
}
