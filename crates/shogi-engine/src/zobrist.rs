//! Zobrist hashing for position identification.
//!
//! A position key is the XOR of:
//! - one key per piece on each square (by raw piece value and square)
//! - one key per piece held in hand, indexed by how many of that kind were
//!   already held, so holding `n` pawns XORs the first `n` pawn keys
//! - a side key when White is to move
//!
//! Every term is XORed in and out, so moves update the key incrementally.

use shogi_core::{Color, Piece, PieceType, Square};

/// 128-bit position key.
pub type Key = u128;

/// Zobrist hash keys.
///
/// Generated at compile time from a fixed seed for reproducibility.
pub struct ZobristKeys {
    /// Keys for pieces: [raw piece][square]
    pub pieces: [[Key; 81]; Piece::NB],
    /// Keys for hand pieces: [color][hand slot][pieces already held]
    pub hands: [[[Key; 18]; 7]; 2],
    /// XORed in when White is to move.
    pub white_to_move: Key,
}

impl ZobristKeys {
    /// Initializes Zobrist keys using a simple PRNG.
    pub const fn new() -> Self {
        // xorshift64, two outputs per key
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        const fn next_key(state: u64) -> (u64, Key) {
            let hi = next_random(state);
            let lo = next_random(hi);
            (lo, (hi as u128) << 64 | lo as u128)
        }

        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[0; 81]; Piece::NB];
        let mut hands = [[[0; 18]; 7]; 2];

        // Raw value 0 (empty) and unused codes keep zero keys.
        let mut piece = 1;
        while piece < Piece::NB {
            let mut sq = 0;
            while sq < 81 {
                let (s, key) = next_key(state);
                state = s;
                pieces[piece][sq] = key;
                sq += 1;
            }
            piece += 1;
        }

        let mut color = 0;
        while color < 2 {
            let mut slot = 0;
            while slot < 7 {
                let mut n = 0;
                while n < 18 {
                    let (s, key) = next_key(state);
                    state = s;
                    hands[color][slot][n] = key;
                    n += 1;
                }
                slot += 1;
            }
            color += 1;
        }

        let (_, white_to_move) = next_key(state);

        ZobristKeys {
            pieces,
            hands,
            white_to_move,
        }
    }

    /// Returns the key for `piece` on `sq`.
    #[inline]
    pub const fn piece_key(&self, piece: Piece, sq: Square) -> Key {
        self.pieces[piece.raw() as usize][sq.index() as usize]
    }

    /// Returns the key toggled when `color`'s count of `pt` moves between
    /// `held` and `held + 1`.
    #[inline]
    pub const fn hand_key(&self, color: Color, pt: PieceType, held: u8) -> Key {
        self.hands[color.index()][pt as usize - 1][held as usize]
    }

    /// Returns the side-to-move term for `color`.
    #[inline]
    pub const fn side_key(&self, color: Color) -> Key {
        match color {
            Color::Black => 0,
            Color::White => self.white_to_move,
        }
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
