//! Move legality and check detection.

use crate::{Bitboard, Position};
use shogi_core::{Color, Move, PieceType, Square};

impl Position {
    /// Returns true if `m` is legal in this position.
    ///
    /// Accepts any value, including special moves and moves that make no
    /// sense here, and never mutates the position.
    pub fn is_legal(&self, m: Move) -> bool {
        if !m.is_ok() {
            return false;
        }
        match m.dropped_piece() {
            Some(pt) => self.is_legal_drop(pt, m.to()),
            None => self.is_legal_board_move(m),
        }
    }

    fn is_legal_drop(&self, pt: PieceType, to: Square) -> bool {
        let us = self.side_to_move();
        if !self.piece_on(to).is_none() || !self.hand(us).has(pt) {
            return false;
        }
        if dead_ranks(us, pt).contains(to) {
            return false;
        }
        if pt == PieceType::Pawn
            && (self.pieces_of(us, PieceType::Pawn) & Bitboard::file(to.file())).is_not_empty()
        {
            return false;
        }

        let checkers = self.checkers();
        if checkers.is_not_empty() {
            // A drop can only answer a single slider check by interposing.
            if checkers.more_than_one() {
                return false;
            }
            let (Some(ksq), Some(checker)) = (self.king_square(us), checkers.lsb()) else {
                return false;
            };
            if !self.tables().between(ksq, checker).contains(to) {
                return false;
            }
        }

        !(pt == PieceType::Pawn
            && self.check_squares(PieceType::Pawn).contains(to)
            && self.is_pawn_drop_mate(to))
    }

    fn is_legal_board_move(&self, m: Move) -> bool {
        let us = self.side_to_move();
        let them = !us;
        let (from, to) = (m.from(), m.to());
        let piece = self.piece_on(from);
        let Some(pt) = piece.piece_type() else {
            return false;
        };
        if piece.color() != us || self.pieces(us).contains(to) {
            return false;
        }
        if self.pieces_of(them, PieceType::King).contains(to) {
            return false;
        }

        let occupied = self.occupied();
        let t = self.tables();
        if !t.attacks_from(piece, from, occupied).contains(to) {
            return false;
        }

        if m.is_promote() {
            if !pt.can_promote() || !(from.is_promotion_zone(us) || to.is_promotion_zone(us)) {
                return false;
            }
        } else if dead_ranks(us, pt).contains(to) {
            return false;
        }

        if pt == PieceType::King {
            let without_king = occupied ^ Bitboard::from_square(from);
            return self.attackers_to(them, to, without_king).is_empty();
        }

        let Some(ksq) = self.king_square(us) else {
            return true;
        };

        let checkers = self.checkers();
        if checkers.is_not_empty() {
            if checkers.more_than_one() {
                return false;
            }
            let Some(checker) = checkers.lsb() else {
                return false;
            };
            // Capture the checker or interpose.
            if !(t.between(ksq, checker) | checkers).contains(to) {
                return false;
            }
        }

        !self.pinned_pieces(us).contains(from) || t.aligned(ksq, from, to)
    }

    /// Returns true if dropping a pawn on `to` (which checks the enemy king)
    /// would be checkmate. Such drops are forbidden.
    ///
    /// A pawn gives contact check, so the only answers are capturing it or
    /// moving the king away.
    fn is_pawn_drop_mate(&self, to: Square) -> bool {
        let us = self.side_to_move();
        let them = !us;
        let Some(ksq) = self.king_square(them) else {
            return false;
        };
        let t = self.tables();
        let occupied = self.occupied() | Bitboard::from_square(to);

        // Capture by something other than the king. A pinned piece may only
        // capture along its pin line.
        let pinned = self.pinned_pieces(them);
        let capturers = self.attackers_to(them, to, occupied) & !self.pieces_of(them, PieceType::King);
        for from in capturers {
            if !pinned.contains(from) || t.aligned(ksq, from, to) {
                return false;
            }
        }

        // King escapes, including taking the pawn if it is undefended.
        let without_king = occupied ^ Bitboard::from_square(ksq);
        let escapes = t.king(ksq) & !self.pieces(them);
        for sq in escapes {
            if self.attackers_to(us, sq, without_king).is_empty() {
                return false;
            }
        }
        true
    }

    /// Returns true if the legal move `m` checks the opponent, either
    /// directly or by uncovering a slider.
    pub fn gives_check(&self, m: Move) -> bool {
        let us = self.side_to_move();
        let Some(ksq) = self.king_square(!us) else {
            return false;
        };
        let to = m.to();

        if let Some(pt) = m.dropped_piece() {
            return self.check_squares(pt).contains(to);
        }

        let from = m.from();
        let piece = self.piece_on(from);
        let placed = if m.is_promote() { piece.promote() } else { piece };
        let Some(pt) = placed.piece_type() else {
            return false;
        };
        if self.check_squares(pt).contains(to) {
            return true;
        }
        self.blockers_for_king(!us).contains(from) && !self.tables().aligned(ksq, from, to)
    }
}

/// Squares where a piece of type `pt` could never move again.
#[inline]
pub(crate) fn dead_ranks(color: Color, pt: PieceType) -> Bitboard {
    match pt {
        PieceType::Pawn | PieceType::Lance => Bitboard::far_ranks(color, 1),
        PieceType::Knight => Bitboard::far_ranks(color, 2),
        _ => Bitboard::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(sfen: &str) -> Position {
        Position::from_sfen(sfen).unwrap()
    }

    fn mv(s: &str) -> Move {
        Move::from_usi(s).unwrap()
    }

    #[test]
    fn basic_legality_from_startpos() {
        let p = Position::startpos();
        assert!(p.is_legal(mv("7g7f")));
        assert!(p.is_legal(mv("2h1h")));
        assert!(!p.is_legal(mv("7g7e")));
        assert!(!p.is_legal(mv("7c7d")));
        assert!(!p.is_legal(mv("2h2g")));
        assert!(!p.is_legal(mv("P*5e")));
        assert!(!p.is_legal(Move::RESIGN));
        assert!(!p.is_legal(Move::NONE));
    }

    #[test]
    fn promotion_rules() {
        let p = pos("4k4/9/9/4P4/9/9/9/9/4K4 b - 1");
        assert!(p.is_legal(mv("5d5c")));
        assert!(p.is_legal(mv("5d5c+")));
        let p = pos("k8/4P4/9/9/9/9/9/9/4K4 b - 1");
        // Pawn to the last rank must promote.
        assert!(!p.is_legal(mv("5b5a")));
        assert!(p.is_legal(mv("5b5a+")));
        let p = pos("9/4k4/4P4/9/9/9/9/9/4K4 b - 1");
        assert!(!p.is_legal(mv("5i5h+")));
        let p = pos("4k4/9/9/9/9/9/9/9/G3K4 b - 1");
        assert!(!p.is_legal(mv("9i9h+")));
        // Moving out of the zone still allows promotion.
        let p = pos("4k4/9/S8/9/9/9/9/9/4K4 b - 1");
        assert!(p.is_legal(mv("9c8d+")));
        // Knight may not stop on the last two ranks unpromoted.
        let p = pos("4k4/9/9/N8/9/9/9/9/4K4 b - 1");
        assert!(!p.is_legal(mv("9d8b")));
        assert!(p.is_legal(mv("9d8b+")));
    }

    #[test]
    fn drop_rules() {
        let p = pos("4k4/9/9/9/9/9/4P4/9/4K4 b PLNG 1");
        assert!(!p.is_legal(mv("P*5e")), "two pawns on a file");
        assert!(p.is_legal(mv("P*4e")));
        assert!(!p.is_legal(mv("P*4a")));
        assert!(!p.is_legal(mv("L*4a")));
        assert!(!p.is_legal(mv("N*4b")));
        assert!(p.is_legal(mv("N*4c")));
        assert!(p.is_legal(mv("G*4a")));
        assert!(!p.is_legal(mv("G*5g")), "occupied");
        assert!(!p.is_legal(mv("S*4e")), "not in hand");
        // A promoted pawn does not count for the two-pawn rule.
        let p = pos("4k4/9/9/9/9/9/4+P4/9/4K4 b P 1");
        assert!(p.is_legal(mv("P*5e")));
    }

    #[test]
    fn white_dead_ranks() {
        let p = pos("4k4/9/9/9/9/9/9/9/4K4 w pln 1");
        assert!(!p.is_legal(mv("P*1i")));
        assert!(!p.is_legal(mv("L*1i")));
        assert!(!p.is_legal(mv("N*1h")));
        assert!(p.is_legal(mv("N*1g")));
        assert!(p.is_legal(mv("P*1h")));
    }

    #[test]
    fn pawn_drop_mate_is_illegal() {
        // The gold on 1c guards 1b, so the pawn cannot be taken.
        let p = pos("7nk/7l1/8G/9/9/9/9/9/4K4 b P 1");
        assert!(!p.is_legal(mv("P*1b")));
        // Without the gold the king takes the pawn.
        let p = pos("7nk/7l1/9/9/9/9/9/9/4K4 b P 1");
        assert!(p.is_legal(mv("P*1b")));
    }

    #[test]
    fn pawn_drop_check_with_escape_is_legal() {
        // The king can step to 2a.
        let p = pos("8k/7l1/8G/9/9/9/9/9/4K4 b P 1");
        assert!(p.is_legal(mv("P*1b")));
    }

    #[test]
    fn pawn_drop_capturable_by_piece() {
        // The silver on 2a can take the pawn.
        let p = pos("7sk/7l1/8G/9/9/9/9/9/4K4 b P 1");
        assert!(p.is_legal(mv("P*1b")));
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let p = pos("4k4/9/9/9/9/9/9/3r5/4K4 b - 1");
        assert!(!p.is_legal(mv("5i6i")));
        assert!(!p.is_legal(mv("5i5h")));
        assert!(p.is_legal(mv("5i4i")));
        // Moving along the checking line away from the rook is still attacked.
        let p = pos("4k4/9/9/4r4/9/9/9/9/4K4 b - 1");
        assert!(p.in_check());
        assert!(!p.is_legal(mv("5i5h")));
        assert!(p.is_legal(mv("5i4h")));
    }

    #[test]
    fn check_evasion() {
        let p = pos("4k4/9/9/4r4/9/9/9/2B6/4K4 b G 1");
        assert!(p.in_check());
        assert!(p.is_legal(mv("G*5g")), "interpose drop");
        assert!(!p.is_legal(mv("G*4g")), "drop off the line");
        assert!(p.is_legal(mv("7h5f")), "interpose by moving");
        assert!(!p.is_legal(mv("7h6g")));
    }

    #[test]
    fn double_check_only_king_moves() {
        let p = pos("4k4/9/9/4r4/9/9/3n5/9/4K4 b GB 1");
        assert_eq!(p.checkers().count(), 2);
        assert!(!p.is_legal(mv("G*5h")));
        assert!(p.is_legal(mv("5i4i")));
    }

    #[test]
    fn pinned_piece_moves_along_pin() {
        let p = pos("4k4/9/9/4r4/9/9/4L4/9/4K4 b - 1");
        assert!(p.pinned_pieces(Color::Black).contains(Square::from_usi("5g").unwrap()));
        assert!(p.is_legal(mv("5g5d")));
        let p = pos("4k4/9/9/4r4/9/9/4G4/9/4K4 b - 1");
        assert!(!p.is_legal(mv("5g4g")));
        assert!(p.is_legal(mv("5g5f")));
    }

    #[test]
    fn gives_check_direct_and_discovered() {
        let p = pos("4k4/9/9/9/9/9/9/9/4K4 b G 1");
        assert!(p.gives_check(mv("G*5b")));
        assert!(!p.gives_check(mv("G*5c")));

        let p = pos("4k4/9/9/9/4N4/9/9/4R4/4K4 b - 1");
        assert!(p.gives_check(mv("5e4c")), "discovered");
        let p = pos("4k4/9/9/9/9/9/2B6/9/4K4 b - 1");
        assert!(p.gives_check(mv("7g3c+")));
        assert!(!p.gives_check(mv("7g6f")));
        let mut after = p.clone();
        after.do_move(mv("7g3c+"));
        assert!(after.in_check());
    }
}
