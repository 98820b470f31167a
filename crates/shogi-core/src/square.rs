//! Board square representation.

use crate::Color;
use std::fmt;

/// A file (column) on the shogi board, from 1 to 9.
///
/// File 1 is on Black's right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum File {
    F1 = 0,
    F2 = 1,
    F3 = 2,
    F4 = 3,
    F5 = 4,
    F6 = 5,
    F7 = 6,
    F8 = 7,
    F9 = 8,
}

impl File {
    /// All files in order.
    pub const ALL: [File; 9] = [
        File::F1,
        File::F2,
        File::F3,
        File::F4,
        File::F5,
        File::F6,
        File::F7,
        File::F8,
        File::F9,
    ];

    /// Creates a file from index (0-8).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 9 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Creates a file from a USI character ('1'-'9').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='9' => File::from_index(c as u8 - b'1'),
            _ => None,
        }
    }

    /// Returns the index (0-8).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the USI character.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A rank (row) on the shogi board, from 1 ('a') to 9 ('i').
///
/// Rank 1 is White's back rank, rank 9 is Black's back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
    R9 = 8,
}

impl Rank {
    /// All ranks in order.
    pub const ALL: [Rank; 9] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
        Rank::R9,
    ];

    /// Creates a rank from index (0-8).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 9 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Creates a rank from a USI character ('a'-'i').
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='i' => Rank::from_index(c as u8 - b'a'),
            _ => None,
        }
    }

    /// Returns the index (0-8).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the USI character.
    #[inline]
    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }

    /// Returns this rank as seen from `color`'s side of the board.
    ///
    /// `R1` is the furthest rank from the player: for Black that is rank 'a',
    /// for White rank 'i'.
    #[inline]
    pub const fn relative(self, color: Color) -> Rank {
        match color {
            Color::Black => self,
            Color::White => Self::ALL[8 - self as usize],
        }
    }

    /// Returns true if this rank lies in `color`'s promotion zone.
    #[inline]
    pub const fn is_promotion_zone(self, color: Color) -> bool {
        (self.relative(color) as u8) < 3
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A square on the shogi board, indexed 0-80.
///
/// Squares are indexed file-major: `file * 9 + rank`, so 1a = 0, 1b = 1, ...,
/// 1i = 8, 2a = 9, ..., 9i = 80.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Number of board squares.
    pub const NB: usize = 81;

    /// Creates a square from file and rank.
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(file.index() * 9 + rank.index())
    }

    /// Creates a square from index (0-80).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 81 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Creates a square from index without bounds checking.
    ///
    /// # Safety
    /// The index must be in the range 0-80.
    #[inline]
    pub const unsafe fn from_index_unchecked(index: u8) -> Self {
        debug_assert!(index < 81);
        Square(index)
    }

    /// Parses a square from USI notation (e.g., "7g").
    pub const fn from_usi(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = match File::from_char(bytes[0] as char) {
            Some(f) => f,
            None => return None,
        };
        let rank = match Rank::from_char(bytes[1] as char) {
            Some(r) => r,
            None => return None,
        };
        Some(Square::new(file, rank))
    }

    /// Returns the index (0-80).
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the file of this square.
    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 / 9) as usize]
    }

    /// Returns the rank of this square.
    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 % 9) as usize]
    }

    /// Returns the square rotated by 180 degrees.
    #[inline]
    pub const fn flip(self) -> Self {
        Square(80 - self.0)
    }

    /// Returns true if the square lies in `color`'s promotion zone.
    #[inline]
    pub const fn is_promotion_zone(self, color: Color) -> bool {
        self.rank().is_promotion_zone(color)
    }

    /// Returns the USI notation for this square.
    pub fn to_usi(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    /// Iterates over all 81 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..81u8).map(Square)
    }

    // Corner squares and the king starting squares.
    pub const SQ_11: Square = Square(0);
    pub const SQ_19: Square = Square(8);
    pub const SQ_91: Square = Square(72);
    pub const SQ_99: Square = Square(80);
    pub const SQ_51: Square = Square(36);
    pub const SQ_59: Square = Square(44);
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_usi())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_usi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_new() {
        let sq = Square::new(File::F7, Rank::R7);
        assert_eq!(sq.file(), File::F7);
        assert_eq!(sq.rank(), Rank::R7);
        assert_eq!(sq.index(), 60);
    }

    #[test]
    fn square_from_usi() {
        assert_eq!(Square::from_usi("1a"), Some(Square::SQ_11));
        assert_eq!(Square::from_usi("9i"), Some(Square::SQ_99));
        assert_eq!(Square::from_usi("5a"), Some(Square::SQ_51));
        assert_eq!(Square::from_usi("5i"), Some(Square::SQ_59));
        assert_eq!(Square::from_usi("0a"), None);
        assert_eq!(Square::from_usi("1j"), None);
        assert_eq!(Square::from_usi(""), None);
        assert_eq!(Square::from_usi("7g7f"), None);
    }

    #[test]
    fn square_to_usi() {
        assert_eq!(Square::SQ_11.to_usi(), "1a");
        assert_eq!(Square::new(File::F2, Rank::R4).to_usi(), "2d");
        assert_eq!(format!("{:?}", Square::SQ_59), "Square(5i)");
    }

    #[test]
    fn square_flip() {
        assert_eq!(Square::SQ_11.flip(), Square::SQ_99);
        assert_eq!(Square::SQ_51.flip(), Square::SQ_59);
        assert_eq!(Square::from_usi("5e").map(Square::flip), Square::from_usi("5e"));
    }

    #[test]
    fn promotion_zone() {
        assert!(Square::from_usi("3c").unwrap().is_promotion_zone(Color::Black));
        assert!(!Square::from_usi("3d").unwrap().is_promotion_zone(Color::Black));
        assert!(Square::from_usi("3g").unwrap().is_promotion_zone(Color::White));
        assert!(!Square::from_usi("3f").unwrap().is_promotion_zone(Color::White));
    }

    #[test]
    fn relative_rank() {
        assert_eq!(Rank::R1.relative(Color::Black), Rank::R1);
        assert_eq!(Rank::R1.relative(Color::White), Rank::R9);
        assert_eq!(Rank::R8.relative(Color::White), Rank::R2);
    }

    #[test]
    fn all_squares_round_trip() {
        for sq in Square::all() {
            assert_eq!(Square::new(sq.file(), sq.rank()), sq);
            assert_eq!(Square::from_usi(&sq.to_usi()), Some(sq));
        }
        assert_eq!(Square::all().count(), Square::NB);
    }
}
