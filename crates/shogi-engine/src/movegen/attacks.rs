//! Attack lookup for all piece types.
//!
//! Step tables are derived from one-step slider lookups (a slider on a full
//! board reaches only its neighbours), so no per-piece offset lists exist.

use super::tables::{segment_index, AttackTables};
use crate::Bitboard;
use shogi_core::{Color, Piece, PieceType, Square};

impl AttackTables {
    pub(super) fn init_steps(&mut self) {
        for sq in Square::all() {
            let idx = sq.index() as usize;
            let rook_step = self.rook(sq, Bitboard::ALL);
            let bishop_step = self.bishop(sq, Bitboard::ALL);
            self.king[idx] = rook_step | bishop_step;
            for color in Color::ALL {
                self.pawn[color.index()][idx] = self.lance(color, sq, Bitboard::ALL);
            }
        }

        for sq in Square::all() {
            let idx = sq.index() as usize;
            let rook_step = self.rook(sq, Bitboard::ALL);
            let bishop_step = self.bishop(sq, Bitboard::ALL);
            for color in Color::ALL {
                let c = color.index();
                let pawn = self.pawn[c][idx];

                // Gold: no backward diagonals, i.e. none on the rank an
                // opposing pawn here would step to.
                let backward = match self.pawn[(!color).index()][idx].lsb() {
                    Some(back) => Bitboard::rank(back.rank()),
                    None => Bitboard::EMPTY,
                };
                self.gold[c][idx] = rook_step | (bishop_step & !backward);
                self.silver[c][idx] = bishop_step | pawn;

                // Knight: the forward diagonals of the square one step ahead.
                self.knight[c][idx] = match pawn.lsb() {
                    Some(ahead) => {
                        let two_ahead = self.pawn[c][ahead.index() as usize];
                        match two_ahead.lsb() {
                            Some(t) => self.bishop(ahead, Bitboard::ALL) & Bitboard::rank(t.rank()),
                            None => Bitboard::EMPTY,
                        }
                    }
                    None => Bitboard::EMPTY,
                };
            }
        }
    }

    #[inline]
    pub fn pawn(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn[color.index()][sq.index() as usize]
    }

    #[inline]
    pub fn knight(&self, color: Color, sq: Square) -> Bitboard {
        self.knight[color.index()][sq.index() as usize]
    }

    #[inline]
    pub fn silver(&self, color: Color, sq: Square) -> Bitboard {
        self.silver[color.index()][sq.index() as usize]
    }

    /// Gold attacks, shared by all promoted minor pieces.
    #[inline]
    pub fn gold(&self, color: Color, sq: Square) -> Bitboard {
        self.gold[color.index()][sq.index() as usize]
    }

    #[inline]
    pub fn king(&self, sq: Square) -> Bitboard {
        self.king[sq.index() as usize]
    }

    /// Lance attacks: the file ray ahead of the lance, up to the first blocker.
    #[inline]
    pub fn lance(&self, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
        self.file_attacks(sq, occupied) & self.forward[color.index()][sq.index() as usize]
    }

    #[inline]
    pub fn bishop(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.diagonal_attacks(sq, occupied) | self.anti_diagonal_attacks(sq, occupied)
    }

    #[inline]
    pub fn rook(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.file_attacks(sq, occupied) | self.rank_attacks(sq, occupied)
    }

    #[inline]
    pub fn horse(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.bishop(sq, occupied) | self.king(sq)
    }

    #[inline]
    pub fn dragon(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook(sq, occupied) | self.king(sq)
    }

    /// Squares attacked by `piece` standing on `sq`.
    pub fn attacks_from(&self, piece: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
        let color = piece.color();
        match piece.piece_type() {
            None => Bitboard::EMPTY,
            Some(PieceType::Pawn) => self.pawn(color, sq),
            Some(PieceType::Lance) => self.lance(color, sq, occupied),
            Some(PieceType::Knight) => self.knight(color, sq),
            Some(PieceType::Silver) => self.silver(color, sq),
            Some(
                PieceType::Gold
                | PieceType::ProPawn
                | PieceType::ProLance
                | PieceType::ProKnight
                | PieceType::ProSilver,
            ) => self.gold(color, sq),
            Some(PieceType::Bishop) => self.bishop(sq, occupied),
            Some(PieceType::Rook) => self.rook(sq, occupied),
            Some(PieceType::King) => self.king(sq),
            Some(PieceType::Horse) => self.horse(sq, occupied),
            Some(PieceType::Dragon) => self.dragon(sq, occupied),
        }
    }

    /// Squares strictly between `a` and `b` when they share a line, else empty.
    #[inline]
    pub fn between(&self, a: Square, b: Square) -> Bitboard {
        self.segments[segment_index(a, b)].0
    }

    /// The whole board line through `a` and `b`, or empty if not aligned.
    #[inline]
    pub fn line(&self, a: Square, b: Square) -> Bitboard {
        self.segments[segment_index(a, b)].1
    }

    /// Returns true if `c` lies on the line through `a` and `b`.
    #[inline]
    pub fn aligned(&self, a: Square, b: Square, c: Square) -> bool {
        self.line(a, b).contains(c)
    }
}
