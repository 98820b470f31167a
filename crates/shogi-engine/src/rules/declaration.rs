//! King-entering (nyugyoku) declarations.

use std::fmt;
use std::str::FromStr;

use crate::{Bitboard, Position};
use shogi_core::{Color, Move, PieceType, Square};
use thiserror::Error;

/// Rule used to decide a game once a king has entered the enemy camp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnteringKingRule {
    /// Declarations are never accepted.
    #[default]
    None,
    /// 24-point rule, with a declaration needing 31 points.
    Point24,
    /// 27-point rule: 28 points for Black, 27 for White.
    Point27,
    /// The king wins by reaching the enemy king's starting square.
    TryRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entering king rule '{0}' (expected none, point24, point27 or try)")]
pub struct ParseRuleError(String);

impl EnteringKingRule {
    /// Points `color` needs for a declaration, before any handicap reduction.
    const fn threshold(self, color: Color) -> u32 {
        match (self, color) {
            (EnteringKingRule::Point27, Color::Black) => 28,
            (EnteringKingRule::Point27, Color::White) => 27,
            (EnteringKingRule::Point24, _) => 31,
            _ => u32::MAX,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EnteringKingRule::None => "none",
            EnteringKingRule::Point24 => "point24",
            EnteringKingRule::Point27 => "point27",
            EnteringKingRule::TryRule => "try",
        }
    }
}

impl fmt::Display for EnteringKingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnteringKingRule {
    type Err = ParseRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(EnteringKingRule::None),
            "point24" | "24" => Ok(EnteringKingRule::Point24),
            "point27" | "27" => Ok(EnteringKingRule::Point27),
            "try" | "tryrule" => Ok(EnteringKingRule::TryRule),
            _ => Err(ParseRuleError(s.to_string())),
        }
    }
}

/// Declaration points of one piece: 5 for majors, 1 for the rest.
const fn points(pt: PieceType) -> u32 {
    match pt {
        PieceType::King => 0,
        _ if pt.is_major() => 5,
        _ => 1,
    }
}

impl Position {
    /// Checks whether the side to move can win by declaration under `rule`.
    ///
    /// Point rules return `Move::WIN` when the king stands in the enemy camp
    /// out of check with at least ten other own pieces there and enough
    /// points (pieces in camp plus pieces in hand). In handicap games White's
    /// requirement drops by the points of the pieces left out. The try rule
    /// returns the king move onto the enemy king's starting square when it is
    /// legal. Otherwise `Move::NONE`.
    pub fn declaration_win(&self, rule: EnteringKingRule) -> Move {
        let us = self.side_to_move();
        let Some(ksq) = self.king_square(us) else {
            return Move::NONE;
        };

        match rule {
            EnteringKingRule::None => Move::NONE,
            EnteringKingRule::TryRule => {
                let goal = match us {
                    Color::Black => Square::SQ_51,
                    Color::White => Square::SQ_59,
                };
                let m = Move::normal(ksq, goal);
                if self.is_legal(m) {
                    m
                } else {
                    Move::NONE
                }
            }
            EnteringKingRule::Point24 | EnteringKingRule::Point27 => {
                if !ksq.is_promotion_zone(us) || self.in_check() {
                    return Move::NONE;
                }
                let in_camp =
                    self.pieces(us) & Bitboard::promotion_zone(us) & !Bitboard::from_square(ksq);
                if in_camp.count() < 10 {
                    return Move::NONE;
                }

                let board_points: u32 = in_camp
                    .into_iter()
                    .filter_map(|sq| self.piece_on(sq).piece_type())
                    .map(points)
                    .sum();
                let hand_points: u32 = self
                    .hand(us)
                    .iter()
                    .map(|(pt, n)| points(pt) * u32::from(n))
                    .sum();

                let mut needed = rule.threshold(us);
                if us == Color::White && self.is_handicapped() {
                    let missing: u32 = self
                        .piece_box()
                        .iter()
                        .map(|(pt, n)| points(pt) * u32::from(n))
                        .sum();
                    needed = needed.saturating_sub(missing);
                }

                if board_points + hand_points >= needed {
                    Move::WIN
                } else {
                    Move::NONE
                }
            }
        }
    }
}
