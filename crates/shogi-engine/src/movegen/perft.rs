//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::legal_all;
use crate::Position;

/// Counts the number of leaf nodes at the given depth.
///
/// Moves are made and taken back on `position`, which is unchanged on return.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_all(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        position.do_move(m);
        nodes += perft(position, depth - 1);
        position.undo_move();
    }
    nodes
}

/// Perft with divide: node count below each root move, sorted by USI token.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let moves = legal_all(position);
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        position.do_move(m);
        let nodes = if depth > 1 {
            perft(position, depth - 1)
        } else {
            1
        };
        position.undo_move();
        results.push((m.to_usi(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perft_startpos_depth_1() {
        let mut position = Position::startpos();
        assert_eq!(perft(&mut position, 1), 30);
    }

    #[test]
    fn perft_startpos_depth_2() {
        let mut position = Position::startpos();
        assert_eq!(perft(&mut position, 2), 900);
    }

    #[test]
    fn perft_startpos_depth_3() {
        let mut position = Position::startpos();
        assert_eq!(perft(&mut position, 3), 25470);
        assert_eq!(position, Position::startpos());
    }

    // Slow in debug builds.
    #[test]
    #[ignore]
    fn perft_startpos_depth_4() {
        let mut position = Position::startpos();
        assert_eq!(perft(&mut position, 4), 719731);
    }

    #[test]
    fn perft_divide_works() {
        let mut position = Position::startpos();
        let results = perft_divide(&mut position, 2);
        assert_eq!(results.len(), 30);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 900);
        assert!(results.windows(2).all(|w| w[0].0 <= w[1].0));
    }
}
