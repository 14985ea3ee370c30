/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, Move};

/// Perform a perft at the specified depth, with `side` to move, returning the number of positions reachable.
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
///
/// The board is returned to its original state.
///
/// # Example
/// ```
/// # use rookery::{perft, Board, Color};
/// let mut board = Board::default();
/// assert_eq!(perft(&mut board, Color::White, 2), 400);
/// ```
pub fn perft(board: &mut Board, side: Color, depth: usize) -> u64 {
    // Recursion limit; return 1, since we're fathoming this node.
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves(side);

    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mv| nodes_after(board, mv, depth - 1))
        .sum()
}

/// Perform a splitperft at the specified depth, returning the number of positions reachable
/// after each move available at the root, in the order the moves were generated.
pub fn splitperft(board: &mut Board, side: Color, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    board
        .legal_moves(side)
        .into_iter()
        .map(|mv| (mv, nodes_after(board, mv, depth - 1)))
        .collect()
}

/// Number of positions `depth` plies after making `mv`.
fn nodes_after(board: &mut Board, mv: Move, depth: usize) -> u64 {
    board.make_move(mv);
    let nodes = perft(board, mv.color().opponent(), depth);
    board.unmake_move(mv);
    nodes
}
