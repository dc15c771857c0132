/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Per-piece movement rules, expressed as attack sets.
mod attacks;

/// A 64-bit set of squares.
mod bitboard;

/// The 8x8 grid of pieces and its text diagram.
mod mailbox;

/// Moves, their kinds, and coordinate notation.
mod moves;

/// Node counting over the legal move tree.
mod perft;

/// Colors, piece kinds, and pieces.
mod piece;

/// Files, ranks, and squares.
mod square;

/// The full game state: legality, application, and outcome.
mod state;

pub use attacks::*;
pub use bitboard::*;
pub use mailbox::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use square::*;
pub use state::*;
