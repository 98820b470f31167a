//! Shogi position and legal move engine with 81-square bitboards.
//!
//! This crate provides:
//! - [`Bitboard`] - 81-bit board sets on a native `u128`
//! - [`AttackTables`] - precomputed attacks for every piece, shared via `Arc`
//! - [`Position`] - board, hands, piece ids and per-ply state with
//!   incremental hashing, `do_move` / `undo_move` and full legality checks
//! - Legal move generation and perft
//! - Repetition, mate and king-entering declaration rules
//!
//! # Architecture
//!
//! Slider attacks are looked up in pext-indexed tables over the file, rank
//! and both diagonals; step attacks are derived from one-step slider
//! lookups. A position keeps a stack of [`StateInfo`] entries (hash key,
//! checkers, pins, check squares) so that moves can be taken back and
//! repetitions detected.
//!
//! # Example
//!
//! ```
//! use shogi_engine::{legal_all, Position};
//!
//! let mut position = Position::startpos();
//! assert_eq!(legal_all(&position).len(), 30);
//!
//! position
//!     .set_usi_position("position startpos moves 7g7f 3c3d 8h2b+")
//!     .unwrap();
//! println!("{}", position.to_sfen());
//! ```

mod bitboard;
mod legal;
pub mod movegen;
mod position;
pub mod rules;
mod state;
mod zobrist;

pub use bitboard::Bitboard;
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{generate_legal, generate_pseudo_legal, legal_all, AttackTables, MoveList};
pub use position::{Position, PositionError};
pub use rules::{EnteringKingRule, RepetitionState};
pub use state::StateInfo;
pub use zobrist::{Key, ZobristKeys, ZOBRIST};
