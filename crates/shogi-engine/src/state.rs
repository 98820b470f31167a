//! Per-ply position state.

use crate::zobrist::Key;
use crate::Bitboard;
use shogi_core::{Color, Move, Piece, PieceType};

/// Information that is recomputed (or carried over) when a move is made and
/// simply dropped when it is taken back.
///
/// A position keeps one `StateInfo` per ply from its root; only the last
/// entry is ever modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInfo {
    /// Zobrist key of the position.
    pub key: Key,
    /// Opponent pieces giving check to the side to move.
    pub checkers: Bitboard,
    /// Pieces of either color that alone stand between a slider and the
    /// king of the indexed color.
    pub blockers_for_king: [Bitboard; 2],
    /// Sliders of the indexed color pinning a piece to the enemy king.
    pub pinners: [Bitboard; 2],
    /// Squares from which a piece of the side to move would give check,
    /// indexed by piece type.
    pub check_squares: [Bitboard; PieceType::NB],
    /// Piece captured by the move that led here.
    pub captured: Piece,
    /// Move that led here; `Move::NONE` at the root.
    pub last_move: Move,
    /// Plies of uninterrupted checking by each color, counted in half
    /// moves (a checking move adds 2).
    pub continuous_check: [u32; 2],
}

impl StateInfo {
    /// Continuous check counter of `color`.
    #[inline]
    pub fn continuous_check(&self, color: Color) -> u32 {
        self.continuous_check[color.index()]
    }
}

impl Default for StateInfo {
    fn default() -> Self {
        StateInfo {
            key: 0,
            checkers: Bitboard::EMPTY,
            blockers_for_king: [Bitboard::EMPTY; 2],
            pinners: [Bitboard::EMPTY; 2],
            check_squares: [Bitboard::EMPTY; PieceType::NB],
            captured: Piece::NONE,
            last_move: Move::NONE,
            continuous_check: [0; 2],
        }
    }
}
