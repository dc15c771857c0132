/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

use crate::Move;

/// Malformed input: move text, square coordinates, piece letters, or board diagrams.
///
/// Parsing never consults the rules of chess, so a [`ParseError`] says nothing about legality.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected <file><rank><file><rank>[promotion], got {0:?}")]
    BadLength(String),

    #[error("invalid file {0:?}; expected a letter in a..h")]
    InvalidFile(char),

    #[error("invalid rank {0:?}; expected a digit in 1..8")]
    InvalidRank(char),

    #[error("invalid promotion {0:?}; expected one of n, b, r, q")]
    InvalidPromotion(char),

    #[error("invalid piece character {0:?}")]
    InvalidPiece(char),

    #[error("invalid board diagram: {0}")]
    InvalidDiagram(String),
}

/// Why a well-formed [`Move`] was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IllegalReason {
    #[error("there is no piece on the source square")]
    NoPiece,

    #[error("the piece on the source square belongs to the side not on move")]
    NotYourTurn,

    #[error("the destination is occupied by a piece of the same color")]
    CapturesOwnPiece,

    #[error("kings cannot be captured")]
    CapturesKing,

    #[error("the piece cannot reach the destination")]
    Unreachable,

    #[error("the move's kind does not match the board")]
    WrongKind,

    #[error("a pawn reaching the last rank must promote")]
    MissingPromotion,

    #[error("only a pawn reaching the last rank may promote")]
    UnexpectedPromotion,

    #[error("pawns may only promote to a knight, bishop, rook, or queen")]
    InvalidPromotion,

    #[error("the castling right for that side has been lost")]
    NoCastlingRights,

    #[error("the squares between king and rook are not empty")]
    CastlingPathBlocked,

    #[error("cannot castle out of check")]
    CastlingOutOfCheck,

    #[error("the king would pass through or land on an attacked square")]
    CastlingThroughCheck,

    #[error("the move would leave the king in check")]
    LeavesKingInCheck,
}

/// A well-formed move that the rules of chess do not allow in the given state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("illegal move {mv}: {reason}")]
pub struct IllegalMoveError {
    pub mv: Move,
    pub reason: IllegalReason,
}

impl IllegalMoveError {
    #[inline(always)]
    pub const fn new(mv: Move, reason: IllegalReason) -> Self {
        Self { mv, reason }
    }
}

/// Either failure that can occur when playing a move from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Illegal(#[from] IllegalMoveError),
}
