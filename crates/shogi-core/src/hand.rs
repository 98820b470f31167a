//! Pieces in hand and the unified board/hand location id.

use crate::{Color, PieceType, Square};
use std::fmt;

/// Counts of pieces held off the board.
///
/// Slots are indexed by `piece_type - 1` for Pawn through King. The king slot
/// is only ever used by the piece box of handicap games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hand([u8; 8]);

impl Hand {
    /// Number of slots.
    pub const NB: usize = 8;

    /// Empty hand.
    pub const EMPTY: Hand = Hand([0; 8]);

    /// The complete 40-piece set, by unpromoted kind.
    pub const FULL_SET: Hand = Hand([18, 4, 4, 4, 2, 2, 4, 2]);

    #[inline]
    const fn slot(pt: PieceType) -> usize {
        debug_assert!((pt as u8) <= PieceType::King as u8);
        pt as usize - 1
    }

    /// Returns how many pieces of `pt` are held.
    #[inline]
    pub const fn count(&self, pt: PieceType) -> u8 {
        self.0[Self::slot(pt)]
    }

    /// Returns true if at least one `pt` is held.
    #[inline]
    pub const fn has(&self, pt: PieceType) -> bool {
        self.count(pt) > 0
    }

    /// Sets the count of `pt`.
    #[inline]
    pub fn set(&mut self, pt: PieceType, n: u8) {
        self.0[Self::slot(pt)] = n;
    }

    /// Adds one `pt`.
    #[inline]
    pub fn add(&mut self, pt: PieceType) {
        self.0[Self::slot(pt)] += 1;
    }

    /// Removes one `pt`.
    ///
    /// # Panics
    /// Panics if no `pt` is held.
    #[inline]
    pub fn remove(&mut self, pt: PieceType) {
        let slot = Self::slot(pt);
        assert!(self.0[slot] > 0, "no {pt} in hand");
        self.0[slot] -= 1;
    }

    /// Returns true if nothing is held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// Total number of held pieces.
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&n| u32::from(n)).sum()
    }

    /// Iterates over `(piece_type, count)` for every non-empty slot.
    pub fn iter(&self) -> impl Iterator<Item = (PieceType, u8)> + '_ {
        self.0.iter().enumerate().filter_map(|(i, &n)| {
            let pt = PieceType::from_index(i as u8 + 1)?;
            (n > 0).then_some((pt, n))
        })
    }
}

/// Location of a piece on the board, in a hand, or in the piece box.
///
/// Ids 0-80 are board squares, 81-87 Black's hand (Pawn..Gold), 88-94
/// White's hand, 95-102 the piece box (Pawn..King).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SquareHand(u8);

impl SquareHand {
    pub const NB: usize = 103;

    const HAND_BASE: u8 = 81;
    const BOX_BASE: u8 = 95;

    /// A board square.
    #[inline]
    pub const fn board(sq: Square) -> Self {
        SquareHand(sq.index())
    }

    /// The hand slot of `color` for a droppable kind.
    ///
    /// Returns `None` for kinds that cannot be held.
    #[inline]
    pub const fn hand(color: Color, pt: PieceType) -> Option<Self> {
        if (pt as u8) > PieceType::Gold as u8 {
            return None;
        }
        Some(SquareHand(Self::HAND_BASE + color as u8 * 7 + pt as u8 - 1))
    }

    /// The piece box slot for an unpromoted kind.
    #[inline]
    pub const fn piece_box(pt: PieceType) -> Option<Self> {
        if (pt as u8) > PieceType::King as u8 {
            return None;
        }
        Some(SquareHand(Self::BOX_BASE + pt as u8 - 1))
    }

    /// Creates an id from its raw index.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::NB {
            Some(SquareHand(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the board square, if this is one.
    #[inline]
    pub const fn square(self) -> Option<Square> {
        Square::from_index(self.0)
    }

    #[inline]
    pub const fn is_hand(self) -> bool {
        self.0 >= Self::HAND_BASE && self.0 < Self::BOX_BASE
    }

    #[inline]
    pub const fn is_piece_box(self) -> bool {
        self.0 >= Self::BOX_BASE
    }

    /// Returns the hand owner for hand slots.
    #[inline]
    pub const fn hand_color(self) -> Option<Color> {
        if !self.is_hand() {
            None
        } else if self.0 < Self::HAND_BASE + 7 {
            Some(Color::Black)
        } else {
            Some(Color::White)
        }
    }

    /// Returns the piece kind stored in a hand or piece box slot.
    #[inline]
    pub const fn piece_type(self) -> Option<PieceType> {
        if self.is_piece_box() {
            PieceType::from_index(self.0 - Self::BOX_BASE + 1)
        } else if self.is_hand() {
            PieceType::from_index((self.0 - Self::HAND_BASE) % 7 + 1)
        } else {
            None
        }
    }
}

impl fmt::Debug for SquareHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sq) = self.square() {
            return write!(f, "SquareHand({sq})");
        }
        let pt = self.piece_type().map_or('?', PieceType::usi_char);
        match self.hand_color() {
            Some(color) => write!(f, "SquareHand({color} hand {pt})"),
            None => write!(f, "SquareHand(box {pt})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_counts() {
        let mut hand = Hand::EMPTY;
        assert!(hand.is_empty());
        hand.add(PieceType::Pawn);
        hand.add(PieceType::Pawn);
        hand.add(PieceType::Rook);
        assert_eq!(hand.count(PieceType::Pawn), 2);
        assert!(hand.has(PieceType::Rook));
        assert!(!hand.has(PieceType::Gold));
        hand.remove(PieceType::Pawn);
        assert_eq!(hand.count(PieceType::Pawn), 1);
        assert_eq!(hand.total(), 2);
        assert_eq!(
            hand.iter().collect::<Vec<_>>(),
            vec![(PieceType::Pawn, 1), (PieceType::Rook, 1)]
        );
    }

    #[test]
    #[should_panic(expected = "no Gold in hand")]
    fn remove_missing_panics() {
        let mut hand = Hand::EMPTY;
        hand.remove(PieceType::Gold);
    }

    #[test]
    fn full_set_has_forty_pieces() {
        assert_eq!(Hand::FULL_SET.total(), 40);
    }

    #[test]
    fn square_hand_layout() {
        assert_eq!(SquareHand::board(Square::SQ_99).index(), 80);
        let bp = SquareHand::hand(Color::Black, PieceType::Pawn).unwrap();
        assert_eq!(bp.index(), 81);
        assert_eq!(bp.hand_color(), Some(Color::Black));
        let wg = SquareHand::hand(Color::White, PieceType::Gold).unwrap();
        assert_eq!(wg.index(), 94);
        assert_eq!(wg.piece_type(), Some(PieceType::Gold));
        assert_eq!(wg.hand_color(), Some(Color::White));
        let bk = SquareHand::piece_box(PieceType::King).unwrap();
        assert_eq!(bk.index(), 102);
        assert!(bk.is_piece_box());
        assert_eq!(bk.piece_type(), Some(PieceType::King));
        assert_eq!(SquareHand::hand(Color::Black, PieceType::King), None);
        assert_eq!(SquareHand::from_index(103), None);
    }
}
