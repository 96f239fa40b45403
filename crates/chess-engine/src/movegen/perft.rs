//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal-move tree to a given depth, which
//! can be compared against published values. Promotions only ever produce a
//! queen here, so reference positions are picked to have none within the
//! tested depth.

use crate::GameState;

/// Counts the leaf nodes at the given depth.
pub fn perft(game: &GameState, depth: u32) -> u64 {
    let mut game = game.snapshot();
    perft_inner(&mut game, depth)
}

fn perft_inner(game: &mut GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = game.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        game.make_move(*m);
        nodes += perft_inner(game, depth - 1);
        game.undo_move();
    }
    nodes
}

/// Perft with divide: the node count below each root move, sorted by notation.
///
/// Useful for narrowing down which move a wrong total comes from.
pub fn perft_divide(game: &GameState, depth: u32) -> Vec<(String, u64)> {
    let mut game = game.snapshot();
    let moves = game.legal_moves();
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        game.make_move(*m);
        let nodes = if depth > 1 {
            perft_inner(&mut game, depth - 1)
        } else {
            1
        };
        game.undo_move();
        results.push((m.notation(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
