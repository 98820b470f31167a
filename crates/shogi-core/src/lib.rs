//! Core types for shogi.
//!
//! This crate provides the fundamental types used across the shogi engine:
//! - [`Piece`], [`PieceType`], [`PieceNo`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Hand`] and [`SquareHand`] for pieces off the board
//! - [`Move`] and [`SpecialMove`] for move representation
//! - SFEN parsing and serialization, and USI `position` commands

mod color;
mod hand;
mod mov;
mod piece;
mod sfen;
mod square;
mod usi;

pub use color::Color;
pub use hand::{Hand, SquareHand};
pub use mov::{Move, SpecialMove};
pub use piece::{Piece, PieceNo, PieceType};
pub use sfen::{Sfen, SfenError};
pub use square::{File, Rank, Square};
pub use usi::{PositionCommand, UsiError};
