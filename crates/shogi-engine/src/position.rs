//! Shogi position representation.

use std::fmt;
use std::sync::Arc;

use shogi_core::{
    Color, Hand, Move, Piece, PieceNo, PieceType, PositionCommand, Sfen, SfenError, Square,
    SquareHand, UsiError,
};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::movegen::AttackTables;
use crate::state::StateInfo;
use crate::zobrist::{Key, ZOBRIST};
use crate::Bitboard;

/// Errors from setting up a position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Sfen(#[from] SfenError),

    #[error(transparent)]
    Usi(#[from] UsiError),

    #[error("ply {ply}: cannot parse move '{token}'")]
    InvalidMoveToken { ply: usize, token: String },

    #[error("ply {ply}: illegal move '{token}'")]
    IllegalMove { ply: usize, token: String },
}

/// Owner index of the piece box in hand tables.
const BOX: usize = 2;

/// Complete shogi position state with its move history.
///
/// Board, bitboards, hands and piece ids are only ever changed together by
/// the private put/remove primitives, so they cannot drift apart.
#[derive(Clone)]
pub struct Position {
    tables: Arc<AttackTables>,
    board: [Piece; 81],
    board_pn: [PieceNo; 81],
    /// Black, White, piece box.
    hands: [Hand; 3],
    /// Ids of held pieces: [owner][hand slot][i], live for `i < count`.
    hand_pn: [[[PieceNo; 18]; Hand::NB]; 3],
    by_color: [Bitboard; 2],
    by_type: [Bitboard; PieceType::NB],
    king_square: [Option<Square>; 2],
    side_to_move: Color,
    game_ply: u32,
    handicapped: bool,
    states: Vec<StateInfo>,
}

impl Position {
    /// Creates the initial position using the given tables.
    pub fn new(tables: Arc<AttackTables>) -> Self {
        let mut position = Position::empty(tables);
        let sfen = Sfen::parse(Sfen::STARTPOS).expect("STARTPOS is valid");
        position.load(&sfen);
        position
    }

    fn empty(tables: Arc<AttackTables>) -> Self {
        Position {
            tables,
            board: [Piece::NONE; 81],
            board_pn: [PieceNo::NONE; 81],
            hands: [Hand::EMPTY; 3],
            hand_pn: [[[PieceNo::NONE; 18]; Hand::NB]; 3],
            by_color: [Bitboard::EMPTY; 2],
            by_type: [Bitboard::EMPTY; PieceType::NB],
            king_square: [None; 2],
            side_to_move: Color::Black,
            game_ply: 0,
            handicapped: false,
            states: vec![StateInfo::default()],
        }
    }

    /// Creates the standard starting position with the shared tables.
    pub fn startpos() -> Self {
        Self::new(AttackTables::shared())
    }

    /// Creates a position from an SFEN string with the shared tables.
    pub fn from_sfen(sfen: &str) -> Result<Self, PositionError> {
        let mut position = Position::empty(AttackTables::shared());
        position.set_sfen(sfen)?;
        Ok(position)
    }

    /// Replaces this position with the one described by `sfen`, clearing the
    /// move history. On error the position is left untouched.
    pub fn set_sfen(&mut self, sfen: &str) -> Result<(), PositionError> {
        let parsed = Sfen::parse(sfen)?;
        self.load(&parsed);
        debug!(
            handicapped = self.handicapped,
            ply = self.game_ply,
            "position set from SFEN"
        );
        Ok(())
    }

    fn load(&mut self, sfen: &Sfen) {
        let tables = Arc::clone(&self.tables);
        *self = Position::empty(tables);

        // Kings take ids 0 and 1, everything else is numbered in board,
        // hand, piece box order.
        let mut next_id = 2u8;
        let mut take_id = |pt: PieceType, color: Color| {
            if pt == PieceType::King {
                PieceNo::king(color)
            } else {
                let id = PieceNo::from_index(next_id).unwrap_or(PieceNo::NONE);
                next_id += 1;
                id
            }
        };

        let mut in_play = Hand::EMPTY;
        for sq in Square::all() {
            let piece = sfen.piece_on(sq);
            if let Some(pt) = piece.piece_type() {
                let pn = take_id(pt, piece.color());
                self.put_piece(sq, piece, pn);
                in_play.add(pt.unpromoted());
            }
        }
        for color in Color::ALL {
            for (pt, n) in sfen.hands[color.index()].iter() {
                for _ in 0..n {
                    let pn = take_id(pt, color);
                    self.add_hand(color.index(), pt, pn);
                    in_play.add(pt);
                }
            }
        }

        // Everything not in play goes to the piece box.
        for pt in PieceType::HAND {
            let missing = Hand::FULL_SET.count(pt).saturating_sub(in_play.count(pt));
            if missing > 0 {
                self.handicapped = true;
            }
            for _ in 0..missing {
                let pn = take_id(pt, Color::Black);
                self.add_hand(BOX, pt, pn);
            }
        }
        for color in Color::ALL {
            if self.king_square[color.index()].is_none() {
                self.add_hand(BOX, PieceType::King, PieceNo::king(color));
            }
        }

        self.side_to_move = sfen.side_to_move;
        self.game_ply = sfen.ply;
        self.states[0].key = self.compute_key();
        self.set_check_info();
    }

    /// Converts the position to an SFEN string.
    pub fn to_sfen(&self) -> String {
        Sfen {
            board: self.board,
            side_to_move: self.side_to_move,
            hands: [self.hands[0], self.hands[1]],
            ply: self.game_ply,
        }
        .to_sfen()
    }

    /// Sets the position from a USI `position` command and replays its moves.
    ///
    /// Fails on the first move token that does not parse or is not legal; the
    /// position is then left as it was before the call.
    pub fn set_usi_position(&mut self, command: &str) -> Result<(), PositionError> {
        let command = PositionCommand::parse(command)?;
        self.apply_position_command(&command)
    }

    /// Applies an already parsed `position` command.
    pub fn apply_position_command(
        &mut self,
        command: &PositionCommand,
    ) -> Result<(), PositionError> {
        let mut next = Position::empty(Arc::clone(&self.tables));
        match &command.sfen {
            Some(sfen) => next.set_sfen(sfen)?,
            None => next.load(&Sfen::parse(Sfen::STARTPOS)?),
        }

        for (i, token) in command.moves.iter().enumerate() {
            let ply = i + 1;
            let m = Move::from_usi(token).ok_or_else(|| PositionError::InvalidMoveToken {
                ply,
                token: token.clone(),
            })?;
            if !next.is_legal(m) {
                warn!(ply, token = %token, sfen = %next.to_sfen(), "illegal move in position command");
                return Err(PositionError::IllegalMove {
                    ply,
                    token: token.clone(),
                });
            }
            trace!(ply, token = %token, "replaying move");
            next.do_move(m);
        }

        *self = next;
        Ok(())
    }

    // --- Board primitives ---

    fn put_piece(&mut self, sq: Square, piece: Piece, pn: PieceNo) {
        let Some(pt) = piece.piece_type() else {
            return;
        };
        let idx = sq.index() as usize;
        debug_assert!(self.board[idx].is_none());
        self.board[idx] = piece;
        self.board_pn[idx] = pn;
        self.by_color[piece.color().index()].set(sq);
        self.by_type[pt.index()].set(sq);
        if pt == PieceType::King {
            self.king_square[piece.color().index()] = Some(sq);
        }
    }

    fn remove_piece(&mut self, sq: Square) -> (Piece, PieceNo) {
        let idx = sq.index() as usize;
        let piece = self.board[idx];
        let pn = self.board_pn[idx];
        if let Some(pt) = piece.piece_type() {
            self.by_color[piece.color().index()].clear(sq);
            self.by_type[pt.index()].clear(sq);
            if pt == PieceType::King {
                self.king_square[piece.color().index()] = None;
            }
        }
        self.board[idx] = Piece::NONE;
        self.board_pn[idx] = PieceNo::NONE;
        (piece, pn)
    }

    fn add_hand(&mut self, owner: usize, pt: PieceType, pn: PieceNo) {
        let held = self.hands[owner].count(pt) as usize;
        self.hand_pn[owner][pt as usize - 1][held] = pn;
        self.hands[owner].add(pt);
    }

    fn remove_hand(&mut self, owner: usize, pt: PieceType) -> PieceNo {
        self.hands[owner].remove(pt);
        let held = self.hands[owner].count(pt) as usize;
        std::mem::replace(&mut self.hand_pn[owner][pt as usize - 1][held], PieceNo::NONE)
    }

    fn compute_key(&self) -> Key {
        let mut key = ZOBRIST.side_key(self.side_to_move);
        for sq in self.occupied() {
            key ^= ZOBRIST.piece_key(self.piece_on(sq), sq);
        }
        for color in Color::ALL {
            for (pt, n) in self.hands[color.index()].iter() {
                for held in 0..n {
                    key ^= ZOBRIST.hand_key(color, pt, held);
                }
            }
        }
        key
    }

    // --- Move application ---

    /// Applies a move. The move must be legal (see [`Position::is_legal`]).
    ///
    /// # Panics
    /// Panics on special moves, drops of pieces not in hand or onto occupied
    /// squares, moves of pieces the side to move does not own, and king
    /// captures.
    pub fn do_move(&mut self, m: Move) {
        assert!(
            !m.is_special() && !m.is_none(),
            "do_move called with non-board move {m:?}"
        );
        let us = self.side_to_move;
        let them = !us;
        let prev = self.state();
        let mut key = prev.key ^ ZOBRIST.white_to_move;
        let mut continuous_check = prev.continuous_check;
        let mut captured = Piece::NONE;
        let to = m.to();

        if let Some(pt) = m.dropped_piece() {
            assert!(self.hands[us.index()].has(pt), "{us} has no {pt} to drop");
            assert!(self.piece_on(to).is_none(), "drop onto occupied square {to}");
            let pn = self.remove_hand(us.index(), pt);
            key ^= ZOBRIST.hand_key(us, pt, self.hands[us.index()].count(pt));
            let piece = Piece::new(us, pt);
            self.put_piece(to, piece, pn);
            key ^= ZOBRIST.piece_key(piece, to);
        } else {
            let from = m.from();
            let mover = self.piece_on(from);
            assert!(
                !mover.is_none() && mover.color() == us,
                "{us} has no piece on {from}"
            );

            let target = self.piece_on(to);
            if let Some(target_pt) = target.piece_type() {
                assert!(target.color() == them, "capture of own piece on {to}");
                assert!(target_pt != PieceType::King, "king capture on {to}");
                let (piece, pn) = self.remove_piece(to);
                key ^= ZOBRIST.piece_key(piece, to);
                let hand_pt = target_pt.unpromoted();
                key ^= ZOBRIST.hand_key(us, hand_pt, self.hands[us.index()].count(hand_pt));
                self.add_hand(us.index(), hand_pt, pn);
                captured = piece;
            }

            let (piece, pn) = self.remove_piece(from);
            key ^= ZOBRIST.piece_key(piece, from);
            let placed = if m.is_promote() { piece.promote() } else { piece };
            self.put_piece(to, placed, pn);
            key ^= ZOBRIST.piece_key(placed, to);
        }

        self.side_to_move = them;
        self.game_ply += 1;
        self.states.push(StateInfo {
            key,
            captured,
            last_move: m,
            ..StateInfo::default()
        });
        self.set_check_info();

        continuous_check[us.index()] = if self.checkers().is_not_empty() {
            continuous_check[us.index()] + 2
        } else {
            0
        };
        if let Some(st) = self.states.last_mut() {
            st.continuous_check = continuous_check;
        }
    }

    /// Takes back the last move made with [`Position::do_move`].
    ///
    /// # Panics
    /// Panics if no move has been made since the position was set up.
    pub fn undo_move(&mut self) {
        assert!(self.states.len() > 1, "undo_move called at the root position");
        let Some(st) = self.states.pop() else {
            return;
        };
        let m = st.last_move;
        let us = !self.side_to_move;
        self.side_to_move = us;
        self.game_ply -= 1;
        let to = m.to();

        if let Some(pt) = m.dropped_piece() {
            let (_, pn) = self.remove_piece(to);
            self.add_hand(us.index(), pt, pn);
        } else {
            let (piece, pn) = self.remove_piece(to);
            let original = if m.is_promote() { piece.unpromoted() } else { piece };
            self.put_piece(m.from(), original, pn);
            if let Some(pt) = st.captured.piece_type() {
                let cpn = self.remove_hand(us.index(), pt.unpromoted());
                self.put_piece(to, st.captured, cpn);
            }
        }
    }

    /// Recomputes checkers, pins and check squares for the current state.
    fn set_check_info(&mut self) {
        let us = self.side_to_move;
        let them = !us;
        let occupied = self.occupied();

        let mut blockers_for_king = [Bitboard::EMPTY; 2];
        let mut pinners = [Bitboard::EMPTY; 2];
        for color in Color::ALL {
            if let Some(ksq) = self.king_square(color) {
                let (blockers, pinning) = self.slider_blockers(!color, ksq);
                blockers_for_king[color.index()] = blockers;
                pinners[(!color).index()] = pinning;
            }
        }

        let checkers = match self.king_square(us) {
            Some(ksq) => self.attackers_to(them, ksq, occupied),
            None => Bitboard::EMPTY,
        };

        let mut check_squares = [Bitboard::EMPTY; PieceType::NB];
        if let Some(ksq) = self.king_square(them) {
            let t = &self.tables;
            let gold = t.gold(them, ksq);
            for pt in PieceType::ALL {
                check_squares[pt.index()] = match pt {
                    PieceType::Pawn => t.pawn(them, ksq),
                    PieceType::Lance => t.lance(them, ksq, occupied),
                    PieceType::Knight => t.knight(them, ksq),
                    PieceType::Silver => t.silver(them, ksq),
                    PieceType::Bishop => t.bishop(ksq, occupied),
                    PieceType::Rook => t.rook(ksq, occupied),
                    PieceType::King => Bitboard::EMPTY,
                    PieceType::Horse => t.horse(ksq, occupied),
                    PieceType::Dragon => t.dragon(ksq, occupied),
                    _ => gold,
                };
            }
        }

        if let Some(st) = self.states.last_mut() {
            st.checkers = checkers;
            st.blockers_for_king = blockers_for_king;
            st.pinners = pinners;
            st.check_squares = check_squares;
        }
    }

    /// Pieces (of either color) that alone block an attack by `attacker`'s
    /// sliders on `ksq`, and the sliders pinning a piece of the king's color.
    fn slider_blockers(&self, attacker: Color, ksq: Square) -> (Bitboard, Bitboard) {
        let t = &self.tables;
        let defender = !attacker;
        let snipers = ((t.rook(ksq, Bitboard::EMPTY)
            & self.pieces_by_types(&[PieceType::Rook, PieceType::Dragon]))
            | (t.bishop(ksq, Bitboard::EMPTY)
                & self.pieces_by_types(&[PieceType::Bishop, PieceType::Horse]))
            | (t.lance(defender, ksq, Bitboard::EMPTY) & self.pieces_by_type(PieceType::Lance)))
            & self.pieces(attacker);
        let occupied = self.occupied() ^ snipers;

        let mut blockers = Bitboard::EMPTY;
        let mut pinners = Bitboard::EMPTY;
        for sniper in snipers {
            let between = t.between(ksq, sniper) & occupied;
            if between.is_not_empty() && !between.more_than_one() {
                blockers |= between;
                if (between & self.pieces(defender)).is_not_empty() {
                    pinners.set(sniper);
                }
            }
        }
        (blockers, pinners)
    }

    // --- Queries ---

    /// The attack tables this position uses.
    #[inline]
    pub fn tables(&self) -> &AttackTables {
        &self.tables
    }

    /// Returns the piece on `sq`, or `Piece::NONE`.
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Piece {
        self.board[sq.index() as usize]
    }

    /// Returns `color`'s pieces in hand.
    #[inline]
    pub fn hand(&self, color: Color) -> Hand {
        self.hands[color.index()]
    }

    /// Returns the pieces not in play (handicap games and tsume positions).
    #[inline]
    pub fn piece_box(&self) -> Hand {
        self.hands[BOX]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Move number as written in SFEN, advanced by one per move.
    #[inline]
    pub fn game_ply(&self) -> u32 {
        self.game_ply
    }

    /// Number of moves made since the position was set up.
    #[inline]
    pub fn plies_from_root(&self) -> usize {
        self.states.len() - 1
    }

    /// True when pieces other than kings are missing from play.
    #[inline]
    pub fn is_handicapped(&self) -> bool {
        self.handicapped
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.king_square[color.index()]
    }

    /// All pieces of `color`.
    #[inline]
    pub fn pieces(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    /// All pieces of type `pt`, both colors.
    #[inline]
    pub fn pieces_by_type(&self, pt: PieceType) -> Bitboard {
        self.by_type[pt.index()]
    }

    fn pieces_by_types(&self, types: &[PieceType]) -> Bitboard {
        types
            .iter()
            .fold(Bitboard::EMPTY, |bb, &pt| bb | self.by_type[pt.index()])
    }

    /// Pieces of `color` and type `pt`.
    #[inline]
    pub fn pieces_of(&self, color: Color, pt: PieceType) -> Bitboard {
        self.by_color[color.index()] & self.by_type[pt.index()]
    }

    /// Pieces that move like a gold: golds and promoted minor pieces.
    #[inline]
    pub fn golds(&self) -> Bitboard {
        self.pieces_by_types(&[
            PieceType::Gold,
            PieceType::ProPawn,
            PieceType::ProLance,
            PieceType::ProKnight,
            PieceType::ProSilver,
        ])
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied()
    }

    /// Pieces of `color` attacking `sq`, with `occupied` as the blocker set.
    pub fn attackers_to(&self, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
        let t = &self.tables;
        // Step attacks are symmetric: a piece of `color` on X attacks `sq`
        // iff an opposing piece of the same kind on `sq` attacks X.
        let them = !color;
        ((t.pawn(them, sq) & self.by_type[PieceType::Pawn.index()])
            | (t.lance(them, sq, occupied) & self.by_type[PieceType::Lance.index()])
            | (t.knight(them, sq) & self.by_type[PieceType::Knight.index()])
            | (t.silver(them, sq) & self.by_type[PieceType::Silver.index()])
            | (t.gold(them, sq) & self.golds())
            | (t.bishop(sq, occupied)
                & self.pieces_by_types(&[PieceType::Bishop, PieceType::Horse]))
            | (t.rook(sq, occupied) & self.pieces_by_types(&[PieceType::Rook, PieceType::Dragon]))
            | (t.king(sq)
                & self.pieces_by_types(&[PieceType::King, PieceType::Horse, PieceType::Dragon])))
            & self.by_color[color.index()]
    }

    /// The current state.
    #[inline]
    pub fn state(&self) -> &StateInfo {
        // The stack always holds the root state.
        &self.states[self.states.len() - 1]
    }

    /// The state `plies_ago` moves back, if the history reaches that far.
    #[inline]
    pub fn state_at(&self, plies_ago: usize) -> Option<&StateInfo> {
        self.states
            .len()
            .checked_sub(plies_ago + 1)
            .map(|i| &self.states[i])
    }

    #[inline]
    pub fn key(&self) -> Key {
        self.state().key
    }

    /// Opponent pieces giving check to the side to move.
    #[inline]
    pub fn checkers(&self) -> Bitboard {
        self.state().checkers
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.checkers().is_not_empty()
    }

    /// Pieces of either color shielding `color`'s king from a slider.
    #[inline]
    pub fn blockers_for_king(&self, color: Color) -> Bitboard {
        self.state().blockers_for_king[color.index()]
    }

    /// Sliders of `color` pinning an enemy piece to the enemy king.
    #[inline]
    pub fn pinners(&self, color: Color) -> Bitboard {
        self.state().pinners[color.index()]
    }

    /// Pieces of `color` pinned to their own king.
    #[inline]
    pub fn pinned_pieces(&self, color: Color) -> Bitboard {
        self.blockers_for_king(color) & self.pieces(color)
    }

    /// Squares from which a piece of type `pt` of the side to move would
    /// check the enemy king.
    #[inline]
    pub fn check_squares(&self, pt: PieceType) -> Bitboard {
        self.state().check_squares[pt.index()]
    }

    /// Piece captured by the last move, or `Piece::NONE`.
    #[inline]
    pub fn captured_piece(&self) -> Piece {
        self.state().captured
    }

    /// The last move made, or `Move::NONE` at the root.
    #[inline]
    pub fn last_move(&self) -> Move {
        self.state().last_move
    }

    /// Plies `color` has been checking without interruption.
    #[inline]
    pub fn continuous_check(&self, color: Color) -> u32 {
        self.state().continuous_check(color)
    }

    // --- Piece ids ---

    /// Id of the piece on `sq`, or `PieceNo::NONE` when empty.
    #[inline]
    pub fn piece_no_on(&self, sq: Square) -> PieceNo {
        self.board_pn[sq.index() as usize]
    }

    /// Id of the `i`-th held piece of type `pt`. `owner` is a hand color,
    /// or `None` for the piece box.
    pub fn hand_piece_no(&self, owner: Option<Color>, pt: PieceType, i: usize) -> PieceNo {
        let owner = owner.map_or(BOX, Color::index);
        if pt.is_promoted() || i >= self.hands[owner].count(pt) as usize {
            return PieceNo::NONE;
        }
        self.hand_pn[owner][pt as usize - 1][i]
    }

    /// Where the piece with id `pn` currently is.
    pub fn piece_location(&self, pn: PieceNo) -> Option<SquareHand> {
        if pn.is_none() {
            return None;
        }
        if let Some(sq) = Square::all().find(|&sq| self.piece_no_on(sq) == pn) {
            return Some(SquareHand::board(sq));
        }
        for (owner, slots) in self.hand_pn.iter().enumerate() {
            for (slot, ids) in slots.iter().enumerate() {
                if !ids.contains(&pn) {
                    continue;
                }
                let pt = PieceType::from_index(slot as u8 + 1)?;
                return match owner {
                    0 => SquareHand::hand(Color::Black, pt),
                    1 => SquareHand::hand(Color::White, pt),
                    _ => SquareHand::piece_box(pt),
                };
            }
        }
        None
    }

    /// Checks internal consistency: board against bitboards, king cache,
    /// hash key, hand counts against ids, and that ids form a permutation.
    pub fn pos_is_ok(&self) -> bool {
        let mut by_color = [Bitboard::EMPTY; 2];
        let mut by_type = [Bitboard::EMPTY; PieceType::NB];
        let mut kings = [None; 2];
        let mut seen = [false; PieceNo::NB];
        let mut mark = |pn: PieceNo| -> bool {
            if pn.is_none() || seen[pn.index()] {
                return false;
            }
            seen[pn.index()] = true;
            true
        };

        for sq in Square::all() {
            let piece = self.piece_on(sq);
            match piece.piece_type() {
                Some(pt) => {
                    by_color[piece.color().index()].set(sq);
                    by_type[pt.index()].set(sq);
                    if pt == PieceType::King {
                        kings[piece.color().index()] = Some(sq);
                    }
                    if !mark(self.piece_no_on(sq)) {
                        return false;
                    }
                }
                None => {
                    if !self.piece_no_on(sq).is_none() {
                        return false;
                    }
                }
            }
        }

        for (owner, hand) in self.hands.iter().enumerate() {
            for slot in 0..Hand::NB {
                let Some(pt) = PieceType::from_index(slot as u8 + 1) else {
                    return false;
                };
                let count = hand.count(pt) as usize;
                for (i, &pn) in self.hand_pn[owner][slot].iter().enumerate() {
                    if i < count {
                        if !mark(pn) {
                            return false;
                        }
                    } else if !pn.is_none() {
                        return false;
                    }
                }
            }
        }

        by_color == self.by_color
            && by_type == self.by_type
            && kings == self.king_square
            && seen.iter().all(|&s| s)
            && self.key() == self.compute_key()
            && (self.pieces(Color::Black) & self.pieces(Color::White)).is_empty()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.board_pn == other.board_pn
            && self.hands == other.hands
            && self.hand_pn == other.hand_pn
            && self.side_to_move == other.side_to_move
            && self.game_ply == other.game_ply
            && self.handicapped == other.handicapped
            && self.states == other.states
    }
}

impl Eq for Position {}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("sfen", &self.to_sfen())
            .field("key", &format_args!("{:#034x}", self.key()))
            .field("plies_from_root", &self.plies_from_root())
            .finish()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_usi(s).unwrap()
    }

    fn mv(s: &str) -> Move {
        Move::from_usi(s).unwrap()
    }

    #[test]
    fn startpos_sfen_roundtrip() {
        let pos = Position::startpos();
        assert_eq!(pos.to_sfen(), Sfen::STARTPOS);
        assert_eq!(pos.occupied().count(), 40);
        assert!(pos.piece_box().is_empty());
        assert!(!pos.is_handicapped());
        assert!(pos.pos_is_ok());
    }

    #[test]
    fn custom_sfen_roundtrip() {
        let sfen = "8l/1l+R2P3/p2pBG1pp/kps1p4/Nn1P2G2/P1P1P2PP/1PS6/1KSG3+r1/LN2+p3L w Sbgn3p 124";
        let pos = Position::from_sfen(sfen).unwrap();
        assert_eq!(pos.to_sfen(), sfen);
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.game_ply(), 124);
        assert_eq!(pos.hand(Color::White).count(PieceType::Pawn), 3);
        assert!(pos.pos_is_ok());
    }

    #[test]
    fn piece_queries() {
        let pos = Position::startpos();
        assert_eq!(pos.piece_on(sq("5i")), Piece::new(Color::Black, PieceType::King));
        assert_eq!(pos.king_square(Color::White), Some(Square::SQ_51));
        assert_eq!(pos.pieces_of(Color::Black, PieceType::Pawn).count(), 9);
        assert_eq!(pos.golds().count(), 4);
        assert_eq!(pos.piece_on(sq("5e")), Piece::NONE);
    }

    #[test]
    fn do_move_updates_sfen() {
        let mut pos = Position::startpos();
        pos.do_move(mv("7g7f"));
        assert_eq!(
            pos.to_sfen(),
            "lnsgkgsnl/1r5b1/ppppppppp/9/9/2P6/PP1PPPPPP/1B5R1/LNSGKGSNL w - 2"
        );
        assert_eq!(pos.last_move(), mv("7g7f"));
        pos.undo_move();
        assert_eq!(pos.to_sfen(), Sfen::STARTPOS);
        assert_eq!(pos, Position::startpos());
    }

    #[test]
    fn capture_goes_to_hand_unpromoted() {
        let mut pos = Position::from_sfen("4k4/9/4p4/9/9/9/9/4R4/4K4 b - 1").unwrap();
        let before = pos.clone();
        pos.do_move(mv("5h5c+"));
        assert_eq!(pos.piece_on(sq("5c")), Piece::new(Color::Black, PieceType::Dragon));
        assert_eq!(pos.hand(Color::Black).count(PieceType::Pawn), 1);
        assert_eq!(pos.captured_piece(), Piece::new(Color::White, PieceType::Pawn));
        assert!(pos.in_check());
        assert!(pos.pos_is_ok());
        pos.undo_move();
        assert_eq!(pos, before);
        assert!(pos.pos_is_ok());
    }

    #[test]
    fn promoted_capture_returns_base_kind() {
        let mut pos = Position::from_sfen("4k4/9/9/9/4+b4/9/9/4R4/4K4 b - 1").unwrap();
        pos.do_move(mv("5h5e"));
        assert_eq!(pos.hand(Color::Black).count(PieceType::Bishop), 1);
        assert_eq!(pos.to_sfen(), "4k4/9/9/9/4R4/9/9/9/4K4 w B 2");
    }

    #[test]
    fn incremental_key_matches_full_computation() {
        let mut pos = Position::startpos();
        for token in ["7g7f", "3c3d", "8h2b+", "3a2b", "B*4e"] {
            pos.do_move(mv(token));
            assert_eq!(pos.key(), pos.compute_key(), "after {token}");
        }
        let from_scratch = Position::from_sfen(&pos.to_sfen()).unwrap();
        assert_eq!(pos.key(), from_scratch.key());
    }

    #[test]
    fn drop_changes_key_by_hand_board_and_side_terms() {
        let mut pos = Position::from_sfen("4k4/9/9/9/9/9/9/9/4K4 b 2G 1").unwrap();
        let before = pos.key();
        pos.do_move(mv("G*5e"));
        let gold = Piece::new(Color::Black, PieceType::Gold);
        let expected = before
            ^ ZOBRIST.hand_key(Color::Black, PieceType::Gold, 1)
            ^ ZOBRIST.piece_key(gold, sq("5e"))
            ^ ZOBRIST.white_to_move;
        assert_eq!(pos.key(), expected);
    }

    #[test]
    fn handicap_fills_piece_box() {
        // Two-piece handicap: White lacks rook and bishop.
        let pos =
            Position::from_sfen("lnsgkgsnl/9/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL w - 1")
                .unwrap();
        assert!(pos.is_handicapped());
        assert_eq!(pos.piece_box().count(PieceType::Rook), 1);
        assert_eq!(pos.piece_box().count(PieceType::Bishop), 1);
        assert_eq!(pos.piece_box().total(), 2);
        assert!(pos.pos_is_ok());
    }

    #[test]
    fn missing_king_goes_to_box() {
        let pos = Position::from_sfen("4k4/9/9/9/9/9/9/9/9 b 2r2b4g4s4n4l18p 1").unwrap();
        assert_eq!(pos.king_square(Color::Black), None);
        assert!(!pos.is_handicapped());
        assert_eq!(pos.piece_box().count(PieceType::King), 1);
        assert_eq!(
            pos.piece_location(PieceNo::BLACK_KING),
            SquareHand::piece_box(PieceType::King)
        );
        assert!(!pos.in_check());
        assert!(pos.pos_is_ok());
    }

    #[test]
    fn piece_ids_follow_pieces() {
        let mut pos = Position::startpos();
        assert_eq!(pos.piece_no_on(sq("5i")), PieceNo::BLACK_KING);
        assert_eq!(pos.piece_no_on(Square::SQ_51), PieceNo::WHITE_KING);
        let bishop = pos.piece_no_on(sq("2b"));
        for token in ["7g7f", "3c3d", "8h2b+"] {
            pos.do_move(mv(token));
        }
        assert_eq!(pos.hand_piece_no(Some(Color::Black), PieceType::Bishop, 0), bishop);
        assert_eq!(
            pos.piece_location(bishop),
            SquareHand::hand(Color::Black, PieceType::Bishop)
        );
        assert_eq!(pos.hand_piece_no(Some(Color::Black), PieceType::Bishop, 1), PieceNo::NONE);
        assert!(pos.pos_is_ok());
        pos.undo_move();
        assert_eq!(pos.piece_location(bishop), Some(SquareHand::board(sq("2b"))));
    }

    #[test]
    fn usi_position_replay() {
        let mut pos = Position::startpos();
        pos.set_usi_position("position startpos moves 7g7f 3c3d 8h2b+")
            .unwrap();
        assert_eq!(pos.plies_from_root(), 3);
        assert_eq!(pos.hand(Color::Black).count(PieceType::Bishop), 1);

        let mut other = Position::startpos();
        let err = other
            .set_usi_position("position startpos moves 7g7f 7f7e")
            .unwrap_err();
        assert_eq!(
            err,
            PositionError::IllegalMove {
                ply: 2,
                token: "7f7e".to_string()
            }
        );
        // Failed replays leave the position untouched.
        assert_eq!(other, Position::startpos());

        assert!(matches!(
            other.set_usi_position("position startpos moves 7g7x"),
            Err(PositionError::InvalidMoveToken { ply: 1, .. })
        ));
        assert!(matches!(
            other.set_usi_position("position sfen 9/9 b - 1"),
            Err(PositionError::Sfen(_))
        ));
        assert!(matches!(
            other.set_usi_position("position nowhere"),
            Err(PositionError::Usi(_))
        ));
        assert!(matches!(
            other.set_usi_position("position startpos moves resign"),
            Err(PositionError::IllegalMove { ply: 1, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "undo_move called at the root")]
    fn undo_at_root_panics() {
        Position::startpos().undo_move();
    }

    #[test]
    #[should_panic(expected = "non-board move")]
    fn do_move_special_panics() {
        Position::startpos().do_move(Move::RESIGN);
    }

    #[test]
    #[should_panic(expected = "has no Gold to drop")]
    fn do_move_unheld_drop_panics() {
        Position::startpos().do_move(mv("G*5e"));
    }
}
