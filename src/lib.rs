/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Chess move validation and game state tracking.
//!
//! A [`GameState`] holds the board, the side to move, castling rights, the en passant target,
//! both move clocks, and the moves played so far. Moves are parsed from coordinate notation,
//! checked against the rules of chess, and applied to produce a new state:
//!
//! ```
//! # use arbiter::{Color, GameState, IllegalReason, MoveError};
//! let state = GameState::new().play(["e2e4", "e7e5"]).unwrap();
//! assert_eq!(state.side_to_move(), Color::White);
//!
//! // The Queen cannot step onto its own Pawn
//! match state.play_move("d1d2") {
//!     Err(MoveError::Illegal(err)) => assert_eq!(err.reason, IllegalReason::CapturesOwnPiece),
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```

/// Everything related to the board and the rules of chess.
mod board;

/// Command-line arguments and session commands.
mod cli;

/// Typed errors for parsing and move validation.
mod error;

/// An interactive command loop around a [`GameState`].
mod session;

pub use board::*;
pub use cli::*;
pub use error::*;
pub use session::*;
