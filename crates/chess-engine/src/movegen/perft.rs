//! Perft: leaf-node counting used to validate the move generator against
//! published reference counts.

use super::{apply_unchecked, generate_moves};
use crate::Position;

/// Counts leaf nodes `depth` plies below `position`.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|m| perft(&apply_unchecked(position, *m), depth - 1))
        .sum()
}

/// Per-move node counts at `depth`, sorted by UCI text.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = generate_moves(position)
        .into_iter()
        .map(|m| {
            let nodes = perft(&apply_unchecked(position, m), depth.saturating_sub(1));
            (m.to_uci(), nodes)
        })
        .collect();
    results.sort();
    results
}
