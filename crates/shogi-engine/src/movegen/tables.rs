//! Precomputed attack tables.
//!
//! Sliding attacks are split into four line groups (file, rank, diagonal and
//! anti-diagonal). For each square and group, every subset of the relevant
//! blocker mask is enumerated and the reachable set stored at
//! `offset[sq] + pext(occupied, mask[sq])`, so a lookup is a bit extraction
//! and one array read.

use crate::Bitboard;
use shogi_core::{Color, Square};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// One line group's lookup table.
pub(crate) struct SliderTable {
    /// Relevant blocker squares per origin (the last square of each ray is
    /// excluded because it never blocks anything).
    masks: [Bitboard; 81],
    offsets: [usize; 81],
    attacks: Vec<Bitboard>,
}

impl SliderTable {
    /// Builds the table for a pair of opposite directions, given as
    /// `(file_delta, rank_delta)`.
    fn build(dirs: [(i8, i8); 2]) -> Self {
        let mut masks = [Bitboard::EMPTY; 81];
        let mut offsets = [0usize; 81];
        let mut attacks = Vec::new();

        for sq in Square::all() {
            let idx = sq.index() as usize;
            let mask = relevant_mask(sq, &dirs);
            let offset = attacks.len();
            masks[idx] = mask;
            offsets[idx] = offset;
            attacks.resize(offset + (1 << mask.count()), Bitboard::EMPTY);

            // Carry-rippler enumeration of every subset of the mask.
            let mut blockers = Bitboard::EMPTY;
            loop {
                attacks[offset + pext(blockers.0, mask.0)] = ray_attacks(sq, &dirs, blockers);
                blockers = Bitboard(blockers.0.wrapping_sub(mask.0) & mask.0);
                if blockers.is_empty() {
                    break;
                }
            }
        }

        SliderTable {
            masks,
            offsets,
            attacks,
        }
    }

    #[inline]
    fn lookup(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let idx = sq.index() as usize;
        self.attacks[self.offsets[idx] + pext(occupied.0, self.masks[idx].0)]
    }

    fn len(&self) -> usize {
        self.attacks.len()
    }
}

/// Stores all precomputed attack tables.
///
/// Built once by [`AttackTables::new`] and never mutated; positions hold it
/// through an [`Arc`].
pub struct AttackTables {
    file: SliderTable,
    rank: SliderTable,
    diag: SliderTable,
    anti: SliderTable,
    /// Squares strictly ahead on the same file, per color.
    pub(crate) forward: [[Bitboard; 81]; 2],
    pub(crate) king: [Bitboard; 81],
    pub(crate) gold: [[Bitboard; 81]; 2],
    pub(crate) silver: [[Bitboard; 81]; 2],
    pub(crate) knight: [[Bitboard; 81]; 2],
    pub(crate) pawn: [[Bitboard; 81]; 2],
    /// `(between, line)` per unordered square pair, triangular layout.
    pub(crate) segments: Vec<(Bitboard, Bitboard)>,
}

static SHARED: OnceLock<Arc<AttackTables>> = OnceLock::new();

impl AttackTables {
    /// Builds every table: sliders first, then the step tables derived from
    /// them, then between/line segments.
    pub fn new() -> Self {
        let file = SliderTable::build([(0, -1), (0, 1)]);
        let rank = SliderTable::build([(-1, 0), (1, 0)]);
        let diag = SliderTable::build([(-1, -1), (1, 1)]);
        let anti = SliderTable::build([(1, -1), (-1, 1)]);

        let mut forward = [[Bitboard::EMPTY; 81]; 2];
        for sq in Square::all() {
            let idx = sq.index();
            let file_bb = Bitboard::file(sq.file());
            let below = Bitboard::new((1u128 << idx) - 1);
            forward[Color::Black.index()][idx as usize] = file_bb & below;
            forward[Color::White.index()][idx as usize] =
                file_bb & !below & !Bitboard::from_square(sq);
        }

        let mut tables = AttackTables {
            file,
            rank,
            diag,
            anti,
            forward,
            king: [Bitboard::EMPTY; 81],
            gold: [[Bitboard::EMPTY; 81]; 2],
            silver: [[Bitboard::EMPTY; 81]; 2],
            knight: [[Bitboard::EMPTY; 81]; 2],
            pawn: [[Bitboard::EMPTY; 81]; 2],
            segments: Vec::new(),
        };
        tables.init_steps();
        tables.init_segments();

        debug!(
            slider_entries = tables.file.len()
                + tables.rank.len()
                + tables.diag.len()
                + tables.anti.len(),
            segment_entries = tables.segments.len(),
            "attack tables built"
        );
        tables
    }

    /// Returns the process-wide tables, building them on first use.
    pub fn shared() -> Arc<AttackTables> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(AttackTables::new())))
    }

    /// Attacks along the file through `sq` (both directions).
    #[inline]
    pub fn file_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.file.lookup(sq, occupied)
    }

    /// Attacks along the rank through `sq` (both directions).
    #[inline]
    pub fn rank_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rank.lookup(sq, occupied)
    }

    #[inline]
    pub fn diagonal_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.diag.lookup(sq, occupied)
    }

    #[inline]
    pub fn anti_diagonal_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.anti.lookup(sq, occupied)
    }

    fn init_segments(&mut self) {
        let groups: [&SliderTable; 4] = [&self.file, &self.rank, &self.diag, &self.anti];
        let mut segments = vec![(Bitboard::EMPTY, Bitboard::EMPTY); 81 * 82 / 2];
        for a in Square::all() {
            for b in Square::all().filter(|b| b.index() > a.index()) {
                let (a_bb, b_bb) = (Bitboard::from_square(a), Bitboard::from_square(b));
                let Some(group) = groups
                    .iter()
                    .find(|g| g.lookup(a, Bitboard::EMPTY).contains(b))
                else {
                    continue;
                };
                let between = group.lookup(a, b_bb) & group.lookup(b, a_bb);
                let line = (group.lookup(a, Bitboard::EMPTY) & group.lookup(b, Bitboard::EMPTY))
                    | a_bb
                    | b_bb;
                segments[segment_index(a, b)] = (between, line);
            }
        }
        self.segments = segments;
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of an unordered pair in the triangular segment table.
#[inline]
pub(crate) fn segment_index(a: Square, b: Square) -> usize {
    let (lo, hi) = if a.index() <= b.index() {
        (a.index() as usize, b.index() as usize)
    } else {
        (b.index() as usize, a.index() as usize)
    };
    hi * (hi + 1) / 2 + lo
}

/// Software parallel bit extract: packs the bits of `occupied` selected by
/// `mask` into the low bits of the result.
#[inline]
fn pext(occupied: u128, mut mask: u128) -> usize {
    let mut result = 0usize;
    let mut bit = 1usize;
    while mask != 0 {
        let lowest = mask & mask.wrapping_neg();
        if occupied & lowest != 0 {
            result |= bit;
        }
        mask ^= lowest;
        bit <<= 1;
    }
    result
}

#[inline]
fn offset(file: i8, rank: i8, dir: (i8, i8)) -> Option<(i8, i8)> {
    let (f, r) = (file + dir.0, rank + dir.1);
    ((0..9).contains(&f) && (0..9).contains(&r)).then_some((f, r))
}

#[inline]
fn bit(file: i8, rank: i8) -> u128 {
    1u128 << (file as u32 * 9 + rank as u32)
}

/// Blocker mask: every ray square except the last one before the edge.
fn relevant_mask(sq: Square, dirs: &[(i8, i8); 2]) -> Bitboard {
    let mut mask = 0u128;
    for &dir in dirs {
        let mut cur = (sq.file().index() as i8, sq.rank().index() as i8);
        while let Some(next) = offset(cur.0, cur.1, dir) {
            if offset(next.0, next.1, dir).is_none() {
                break;
            }
            mask |= bit(next.0, next.1);
            cur = next;
        }
    }
    Bitboard(mask)
}

/// Slow ray walk (used to build tables).
fn ray_attacks(sq: Square, dirs: &[(i8, i8); 2], blockers: Bitboard) -> Bitboard {
    let mut attacks = 0u128;
    for &dir in dirs {
        let mut cur = (sq.file().index() as i8, sq.rank().index() as i8);
        while let Some(next) = offset(cur.0, cur.1, dir) {
            let b = bit(next.0, next.1);
            attacks |= b;
            if blockers.0 & b != 0 {
                break;
            }
            cur = next;
        }
    }
    Bitboard(attacks)
}
