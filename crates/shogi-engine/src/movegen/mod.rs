//! Move generation.
//!
//! Pseudo-legal moves are generated straight from the attack tables and then
//! filtered in place with [`Position::is_legal`]. Slider attacks come from
//! pext-indexed tables over the four line directions of the 9x9 board.

mod attacks;
pub mod perft;
mod tables;

pub use tables::AttackTables;

use crate::legal::dead_ranks;
use crate::{Bitboard, Position};
use shogi_core::{Move, PieceType};

/// Upper bound on the number of legal moves in any shogi position.
pub const MAX_LEGAL_MOVES: usize = 593;

/// A list of moves with a fixed maximum capacity.
///
/// Generation writes pseudo-legal moves before filtering them, so the
/// capacity leaves room above [`MAX_LEGAL_MOVES`].
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::CAPACITY],
    len: usize,
}

impl MoveList {
    pub const CAPACITY: usize = 1024;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NONE; Self::CAPACITY],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::CAPACITY);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Writes the pseudo-legal moves of `pos` into `buf` starting at `start` and
/// returns the end index.
///
/// Board moves may still leave the king attacked or capture the enemy king;
/// drops already respect occupancy, dead ranks and the two-pawn rule.
///
/// # Panics
/// Panics if `buf` is too short; a buffer of [`MoveList::CAPACITY`] always
/// suffices.
pub fn generate_pseudo_legal(pos: &Position, buf: &mut [Move], start: usize) -> usize {
    let us = pos.side_to_move();
    let t = pos.tables();
    let occupied = pos.occupied();
    let targets = !pos.pieces(us);
    let mut end = start;
    let mut emit = |m: Move| {
        buf[end] = m;
        end += 1;
    };

    for from in pos.pieces(us) {
        let piece = pos.piece_on(from);
        let Some(pt) = piece.piece_type() else {
            continue;
        };
        let dead = dead_ranks(us, pt);
        for to in t.attacks_from(piece, from, occupied) & targets {
            if pt.can_promote() && (from.is_promotion_zone(us) || to.is_promotion_zone(us)) {
                emit(Move::promote(from, to));
            }
            if !dead.contains(to) {
                emit(Move::normal(from, to));
            }
        }
    }

    let hand = pos.hand(us);
    let empty = pos.empty_squares();
    for pt in PieceType::HAND {
        if !hand.has(pt) {
            continue;
        }
        let mut drops = empty & !dead_ranks(us, pt);
        if pt == PieceType::Pawn {
            for pawn in pos.pieces_of(us, PieceType::Pawn) {
                drops &= !Bitboard::file(pawn.file());
            }
        }
        for to in drops {
            emit(Move::drop(pt, to));
        }
    }

    end
}

/// Writes the legal moves of `pos` into `buf` starting at `start` and returns
/// the end index. Order within the range is unspecified.
pub fn generate_legal(pos: &Position, buf: &mut [Move], start: usize) -> usize {
    let mut end = generate_pseudo_legal(pos, buf, start);
    let mut i = start;
    while i < end {
        if pos.is_legal(buf[i]) {
            i += 1;
        } else {
            end -= 1;
            buf.swap(i, end);
        }
    }
    end
}

/// All legal moves of `pos`.
pub fn legal_all(pos: &Position) -> MoveList {
    let mut list = MoveList::new();
    list.len = generate_legal(pos, &mut list.moves, 0);
    list
}
