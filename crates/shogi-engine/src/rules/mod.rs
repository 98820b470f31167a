//! Game-ending rules: repetition (sennichite), mate and king-entering
//! declarations.
//!
//! These are queries on a [`Position`]; none of them change it.

mod declaration;

pub use declaration::{EnteringKingRule, ParseRuleError};

use crate::movegen::legal_all;
use crate::Position;
use shogi_core::{Move, SpecialMove};

/// Outcome of a repetition check from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepetitionState {
    /// The position has not occurred four times.
    None,
    /// Fourfold repetition without perpetual check.
    Draw,
    /// The opponent has been checking throughout the repetition.
    Win,
    /// The side to move has been checking throughout the repetition.
    Lose,
}

impl RepetitionState {
    /// The special move that records this outcome, if any.
    pub const fn to_special_move(self) -> Option<SpecialMove> {
        match self {
            RepetitionState::None => None,
            RepetitionState::Draw => Some(SpecialMove::RepetitionDraw),
            RepetitionState::Win => Some(SpecialMove::RepetitionWin),
            RepetitionState::Lose => Some(SpecialMove::RepetitionLose),
        }
    }
}

impl Position {
    /// Classifies repetition of the current position.
    ///
    /// Looks back 4, 6, 8 … plies (same side to move) for equal keys. At the
    /// third earlier occurrence the position has been seen four times; a side
    /// that gave check on every one of its moves over that span loses.
    pub fn repetition_state(&self) -> RepetitionState {
        let key = self.key();
        let st = self.state();
        let us = self.side_to_move();
        let mut found = 0;
        let mut distance = 4;

        while distance <= self.plies_from_root() {
            let Some(earlier) = self.state_at(distance) else {
                break;
            };
            if earlier.key == key {
                found += 1;
                if found == 3 {
                    let span = distance as u32;
                    return if st.continuous_check(us) >= span {
                        RepetitionState::Lose
                    } else if st.continuous_check(!us) >= span {
                        RepetitionState::Win
                    } else {
                        RepetitionState::Draw
                    };
                }
            }
            distance += 2;
        }
        RepetitionState::None
    }

    /// Returns true if the side to move has no legal move. Shogi has no
    /// stalemate, so this is a loss whether or not it is in check.
    pub fn is_mated(&self) -> bool {
        legal_all(self).is_empty()
    }

    /// The move that ends the game here, if any: a repetition result,
    /// resignation when mated, or a winning declaration under `rule` (for the
    /// try rule, the winning king move).
    pub fn game_end(&self, rule: EnteringKingRule) -> Option<Move> {
        if let Some(sm) = self.repetition_state().to_special_move() {
            return Some(Move::special(sm));
        }
        if self.is_mated() {
            return Some(Move::RESIGN);
        }
        let declaration = self.declaration_win(rule);
        (!declaration.is_none()).then_some(declaration)
    }
}
