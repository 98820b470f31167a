//! Bitboard representation and operations.
//!
//! A bitboard is a 128-bit integer where the low 81 bits each represent a
//! square on the shogi board. This allows efficient parallel operations on
//! multiple squares.

use shogi_core::{Color, File, Rank, Square};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// An 81-square board set.
///
/// Bit `file * 9 + rank` is set for each member square, so one file occupies
/// nine consecutive bits. Bits 81 and above are always zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u128);

const fn file_mask(file: u8) -> u128 {
    0x1FF << (file as u32 * 9)
}

const fn rank_mask(rank: u8) -> u128 {
    let mut bits = 0u128;
    let mut file = 0;
    while file < 9 {
        bits |= 1 << (file * 9 + rank as u32);
        file += 1;
    }
    bits
}

impl Bitboard {
    /// Empty bitboard (no squares set).
    pub const EMPTY: Bitboard = Bitboard(0);

    /// All 81 squares.
    pub const ALL: Bitboard = Bitboard((1u128 << 81) - 1);

    /// File masks, indexed by [`File::index`].
    pub const FILES: [Bitboard; 9] = {
        let mut masks = [Bitboard::EMPTY; 9];
        let mut f = 0;
        while f < 9 {
            masks[f] = Bitboard(file_mask(f as u8));
            f += 1;
        }
        masks
    };

    /// Rank masks, indexed by [`Rank::index`].
    pub const RANKS: [Bitboard; 9] = {
        let mut masks = [Bitboard::EMPTY; 9];
        let mut r = 0;
        while r < 9 {
            masks[r] = Bitboard(rank_mask(r as u8));
            r += 1;
        }
        masks
    };

    /// Creates a bitboard from raw bits, dropping anything above square 80.
    #[inline]
    pub const fn new(bits: u128) -> Self {
        Bitboard(bits & Self::ALL.0)
    }

    /// Creates a bitboard with a single square set.
    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(1u128 << sq.index())
    }

    #[inline]
    pub const fn file(file: File) -> Self {
        Self::FILES[file.index() as usize]
    }

    #[inline]
    pub const fn rank(rank: Rank) -> Self {
        Self::RANKS[rank.index() as usize]
    }

    /// The `n` ranks furthest from `color`, e.g. `n = 3` is its promotion zone.
    pub const fn far_ranks(color: Color, n: u8) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < n {
            let rank = match color {
                Color::Black => i,
                Color::White => 8 - i,
            };
            bits |= rank_mask(rank);
            i += 1;
        }
        Bitboard(bits)
    }

    /// The promotion zone of `color`.
    #[inline]
    pub const fn promotion_zone(color: Color) -> Self {
        Self::far_ranks(color, 3)
    }

    /// Returns true if the bitboard is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the bitboard is not empty.
    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Returns true if more than one square is set.
    #[inline]
    pub const fn more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    /// Returns the number of set bits (population count).
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if the given square is set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1u128 << sq.index())) != 0
    }

    /// Sets the given square.
    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= 1u128 << sq.index();
    }

    /// Clears the given square.
    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !(1u128 << sq.index());
    }

    /// Toggles the given square.
    #[inline]
    pub fn toggle(&mut self, sq: Square) {
        self.0 ^= 1u128 << sq.index();
    }

    /// Returns the lowest-indexed square, or `None` if empty.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        Square::from_index(self.0.trailing_zeros() as u8)
    }

    /// Pops and returns the least significant bit.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            let sq = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1;
            // SAFETY: only bits below 81 are ever set
            Some(unsafe { Square::from_index_unchecked(sq) })
        }
    }

    /// Shifts every square one rank towards rank 'a'.
    #[inline]
    pub const fn north(self) -> Bitboard {
        Bitboard((self.0 >> 1) & !rank_mask(8))
    }

    /// Shifts every square one rank towards rank 'i'.
    #[inline]
    pub const fn south(self) -> Bitboard {
        Bitboard((self.0 << 1) & !rank_mask(0) & Self::ALL.0)
    }

    /// Shifts one rank forward from `color`'s point of view.
    #[inline]
    pub const fn forward(self, color: Color) -> Bitboard {
        match color {
            Color::Black => self.north(),
            Color::White => self.south(),
        }
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline]
    fn not(self) -> Self::Output {
        // Re-mask so the unused high bits stay clear.
        Bitboard(!self.0 & Self::ALL.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#023x})", self.0)?;
        writeln!(f, "  9 8 7 6 5 4 3 2 1")?;
        for rank in 0..9u128 {
            write!(f, "{} ", (b'a' + rank as u8) as char)?;
            for file in (0..9u128).rev() {
                if (self.0 >> (file * 9 + rank)) & 1 == 1 {
                    write!(f, "X ")?;
                } else {
                    write!(f, ". ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over set squares in a bitboard.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut bb = Bitboard::EMPTY;
        for sq in iter {
            bb.set(sq);
        }
        bb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_usi(s).unwrap()
    }

    #[test]
    fn bitboard_from_square() {
        let bb = Bitboard::from_square(Square::SQ_11);
        assert_eq!(bb.0, 1);
        assert!(bb.contains(Square::SQ_11));
        assert!(!bb.contains(sq("1b")));
    }

    #[test]
    fn bitboard_count() {
        assert_eq!(Bitboard::EMPTY.count(), 0);
        assert_eq!(Bitboard::ALL.count(), 81);
        assert_eq!(Bitboard::file(File::F1).count(), 9);
        assert_eq!(Bitboard::rank(Rank::R9).count(), 9);
        assert_eq!(Bitboard::promotion_zone(Color::White).count(), 27);
    }

    #[test]
    fn not_keeps_high_bits_clear() {
        assert_eq!(!Bitboard::EMPTY, Bitboard::ALL);
        assert_eq!(!Bitboard::ALL, Bitboard::EMPTY);
        let bb = !Bitboard::from_square(Square::SQ_99);
        assert_eq!(bb.0 >> 81, 0);
        assert_eq!(bb.count(), 80);
        assert_eq!(Bitboard::new(u128::MAX), Bitboard::ALL);
    }

    #[test]
    fn masks_match_squares() {
        for s in Square::all() {
            assert!(Bitboard::file(s.file()).contains(s));
            assert!(Bitboard::rank(s.rank()).contains(s));
            assert_eq!(
                Bitboard::promotion_zone(Color::Black).contains(s),
                s.is_promotion_zone(Color::Black)
            );
            assert_eq!(
                Bitboard::promotion_zone(Color::White).contains(s),
                s.is_promotion_zone(Color::White)
            );
        }
    }

    #[test]
    fn bitboard_shifts() {
        let bb = Bitboard::from_square(sq("5e"));
        assert_eq!(bb.north(), Bitboard::from_square(sq("5d")));
        assert_eq!(bb.south(), Bitboard::from_square(sq("5f")));
        assert_eq!(bb.forward(Color::White), Bitboard::from_square(sq("5f")));
        // Shifting off the board does not wrap into the neighbouring file.
        assert!(Bitboard::from_square(sq("4a")).north().is_empty());
        assert!(Bitboard::from_square(sq("6i")).south().is_empty());
        assert!(Bitboard::from_square(Square::SQ_99).south().is_empty());
    }

    #[test]
    fn bitboard_iterator() {
        let bb = Bitboard::file(File::F2);
        let squares: Vec<Square> = bb.into_iter().collect();
        assert_eq!(squares.len(), 9);
        assert_eq!(squares[0], sq("2a"));
        assert_eq!(squares.iter().copied().collect::<Bitboard>(), bb);
    }

    #[test]
    fn bitboard_pop_lsb() {
        let mut bb = Bitboard::new(0b1010);
        assert_eq!(bb.lsb(), Some(sq("1b")));
        assert_eq!(bb.pop_lsb().map(|s| s.index()), Some(1));
        assert_eq!(bb.pop_lsb().map(|s| s.index()), Some(3));
        assert_eq!(bb.pop_lsb(), None);
        assert_eq!(bb.lsb(), None);
    }

    #[test]
    fn more_than_one() {
        assert!(!Bitboard::EMPTY.more_than_one());
        assert!(!Bitboard::from_square(sq("3c")).more_than_one());
        assert!(Bitboard::new(0b11).more_than_one());
    }
}
