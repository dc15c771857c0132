/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{GameState, Move};

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
///
/// # Example
/// ```
/// # use arbiter::{perft, GameState};
/// assert_eq!(perft(&GameState::new(), 2), 400);
/// ```
#[inline(always)]
pub fn perft(state: &GameState, depth: usize) -> u64 {
    perft_generic::<true>(state, depth)
}

/// Perform a splitperft at the specified depth, returning the number of nodes reachable
/// after each move available at the root, along with the total.
pub fn splitperft(state: &GameState, depth: usize) -> (Vec<(Move, u64)>, u64) {
    if depth == 0 {
        return (Vec::new(), 1);
    }

    let split = state
        .generate_legal_moves()
        .into_iter()
        .map(|mv| {
            let nodes = perft_generic::<true>(&state.with_move_made(mv), depth - 1);
            (mv, nodes)
        })
        .collect::<Vec<_>>();

    let total = split.iter().map(|(_, nodes)| nodes).sum();
    (split, total)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting.
///
/// If `BULK` is set to `true`, leaves are counted from the move list instead of being played.
pub fn perft_generic<const BULK: bool>(state: &GameState, depth: usize) -> u64 {
    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && depth == 1 {
        return state.generate_legal_moves().len() as u64;
    }
    // Recursion limit; return 1, since we're fathoming this node.
    else if depth == 0 {
        return 1;
    }

    state
        .generate_legal_moves()
        .into_iter()
        .fold(0, |nodes, mv| {
            nodes + perft_generic::<BULK>(&state.with_move_made(mv), depth - 1)
        })
}
