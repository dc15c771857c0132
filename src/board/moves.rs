/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Board, File, GameState, PieceKind, Rank, Square};
use crate::ParseError;

/// Maximum possible number of moves in a given chess position.
///
/// Found [here](<https://www.chessprogramming.org/Chess_Position#cite_note-4>)
pub const MAX_NUM_MOVES: usize = 218;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// Represents the different kinds of moves that can be made during a chess game.
///
/// Promotion is carried separately on the [`Move`], so a capture that promotes is still a [`MoveKind::Capture`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum MoveKind {
    /// A single piece moves onto an empty square.
    Quiet,

    /// A piece moves onto a square occupied by an opponent's piece, removing it from the board.
    Capture,

    /// The King moves two squares towards its kingside Rook, which jumps over it.
    ShortCastle,

    /// The King moves two squares towards its queenside Rook, which jumps over it.
    LongCastle,

    /// A Pawn captures an enemy Pawn that has just advanced two squares past it.
    EnPassant,
}

impl MoveKind {
    /// Determines the appropriate [`MoveKind`] for moving whatever is at `from` onto `to`,
    /// given the pieces on `board` and the current en passant target.
    ///
    /// This does not check legality. A King on its home square moving two files sideways
    /// is a castle, and a Pawn moving diagonally onto the en passant target is en passant.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, MoveKind, Square};
    /// let board = Board::standard();
    /// assert_eq!(MoveKind::new(&board, None, Square::E2, Square::E4), MoveKind::Quiet);
    /// assert_eq!(MoveKind::new(&board, None, Square::E1, Square::G1), MoveKind::ShortCastle);
    /// assert_eq!(MoveKind::new(&board, None, Square::D1, Square::D2), MoveKind::Capture);
    /// ```
    pub fn new(board: &Board, ep_square: Option<Square>, from: Square, to: Square) -> Self {
        let victim = board.piece_at(to);
        let default = if victim.is_some() {
            Self::Capture
        } else {
            Self::Quiet
        };

        let Some(piece) = board.piece_at(from) else {
            return default;
        };

        match piece.kind() {
            PieceKind::Pawn
                if victim.is_none() && Some(to) == ep_square && from.file() != to.file() =>
            {
                Self::EnPassant
            }

            PieceKind::King
                if from == Square::new(File::E, Rank::first(piece.color()))
                    && to.rank() == from.rank()
                    && from.file().abs_diff(to.file()) == 2 =>
            {
                if to.file() > from.file() {
                    Self::ShortCastle
                } else {
                    Self::LongCastle
                }
            }

            _ => default,
        }
    }

    /// Fetches a human-readable name for this [`MoveKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Quiet => "Quiet",
            Self::Capture => "Capture",
            Self::ShortCastle => "Short Castle",
            Self::LongCastle => "Long Castle",
            Self::EnPassant => "En Passant Capture",
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents a move made on a chess board, including whether a piece is to be promoted.
///
/// The source square is always explicit. Castling is encoded as the King's own move,
/// such as `e1g1`; the Rook's relocation is implied by the [`MoveKind`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
    kind: MoveKind,
}

impl Move {
    /// Creates a new [`Move`] from the given [`Square`]s and a [`MoveKind`], without a promotion.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Move, MoveKind, Square};
    /// let e2e4 = Move::new(Square::E2, Square::E4, MoveKind::Quiet);
    /// assert_eq!(e2e4.to_string(), "e2e4");
    /// ```
    #[inline(always)]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Self {
            from,
            to,
            promotion: None,
            kind,
        }
    }

    /// Returns a copy of this [`Move`] that promotes the moving Pawn to `promotion`.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Move, MoveKind, PieceKind, Square};
    /// let e7e8n = Move::new(Square::E7, Square::E8, MoveKind::Quiet).with_promotion(PieceKind::Knight);
    /// assert_eq!(e7e8n.to_string(), "e7e8n");
    /// ```
    #[inline(always)]
    pub const fn with_promotion(mut self, promotion: PieceKind) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// Fetches the source (or "from") part of this [`Move`], as a [`Square`].
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Fetches the destination (or "to") part of this [`Move`], as a [`Square`].
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Fetches the [`MoveKind`] part of this [`Move`].
    #[inline(always)]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Fetches the [`PieceKind`] the moving Pawn promotes to, if any.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Returns `true` if this [`Move`] removes an enemy piece, including en passant.
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        matches!(self.kind, MoveKind::Capture | MoveKind::EnPassant)
    }

    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    #[inline(always)]
    pub const fn is_short_castle(&self) -> bool {
        matches!(self.kind, MoveKind::ShortCastle)
    }

    #[inline(always)]
    pub const fn is_long_castle(&self) -> bool {
        matches!(self.kind, MoveKind::LongCastle)
    }

    #[inline(always)]
    pub const fn is_castle(&self) -> bool {
        self.is_short_castle() || self.is_long_castle()
    }

    /// If this [`Move`] is a castle, returns the Rook's source and destination squares, respectively.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Move, MoveKind, Square};
    /// let e1g1 = Move::new(Square::E1, Square::G1, MoveKind::ShortCastle);
    /// assert_eq!(e1g1.castling_rook_squares(), Some((Square::H1, Square::F1)));
    /// ```
    #[inline(always)]
    pub const fn castling_rook_squares(&self) -> Option<(Square, Square)> {
        let rank = self.from.rank();
        match self.kind {
            MoveKind::ShortCastle => Some((Square::new(File::H, rank), Square::new(File::F, rank))),
            MoveKind::LongCastle => Some((Square::new(File::A, rank), Square::new(File::D, rank))),
            _ => None,
        }
    }

    /// Creates a [`Move`] from a string in coordinate notation, such as `e2e4` or `e7e8q`,
    /// using `state` only to tag the move's [`MoveKind`].
    ///
    /// The text must be exactly two squares, optionally followed by a promotion letter
    /// (`n`, `b`, `r`, or `q` in either case). This never checks legality.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, Move, MoveKind, ParseError};
    /// let state = GameState::new();
    /// let e2e4 = Move::from_uci(&state, "e2e4").unwrap();
    /// assert_eq!(e2e4.kind(), MoveKind::Quiet);
    ///
    /// // A lone square is never a move
    /// assert_eq!(Move::from_uci(&state, "e4"), Err(ParseError::BadLength("e4".into())));
    /// assert_eq!(Move::from_uci(&state, "e2e9"), Err(ParseError::InvalidRank('9')));
    /// ```
    pub fn from_uci(state: &GameState, uci: &str) -> Result<Self, ParseError> {
        let chars = uci.chars().collect::<Vec<_>>();
        if !(4..=5).contains(&chars.len()) {
            return Err(ParseError::BadLength(uci.to_string()));
        }

        let from = Square::new(File::from_char(chars[0])?, Rank::from_char(chars[1])?);
        let to = Square::new(File::from_char(chars[2])?, Rank::from_char(chars[3])?);
        let promotion = chars
            .get(4)
            .copied()
            .map(PieceKind::from_promotion_char)
            .transpose()?;

        let kind = MoveKind::new(state.board(), state.ep_square(), from, to);

        Ok(Self {
            from,
            to,
            promotion,
            kind,
        })
    }

    /// Converts this [`Move`] to coordinate notation, with a lowercase promotion letter.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Move, MoveKind, PieceKind, Square};
    /// let e7e8q = Move::new(Square::E7, Square::E8, MoveKind::Quiet).with_promotion(PieceKind::Queen);
    /// assert_eq!(e7e8q.to_uci(), "e7e8q");
    /// ```
    pub fn to_uci(&self) -> String {
        if let Some(promote) = self.promotion {
            format!("{}{}{}", self.from, self.to, promote)
        } else {
            format!("{}{}", self.from, self.to)
        }
    }
}

impl fmt::Display for Move {
    /// A [`Move`] is displayed in coordinate notation.
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Move {
    /// Debug formatting also displays the [`MoveKind`] in a human-readable format.
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.kind)
    }
}

impl<T: AsRef<str>> PartialEq<T> for Move {
    #[inline(always)]
    fn eq(&self, other: &T) -> bool {
        self.to_uci().eq(other.as_ref())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::*;

    #[test]
    fn test_move_predicates() {
        let (from, to) = (Square::A1, Square::H8);
        assert!(!Move::new(from, to, MoveKind::Quiet).is_capture());
        assert!(Move::new(from, to, MoveKind::Capture).is_capture());
        assert!(Move::new(from, to, MoveKind::EnPassant).is_capture());
        assert!(!Move::new(from, to, MoveKind::ShortCastle).is_capture());

        assert!(Move::new(from, to, MoveKind::ShortCastle).is_castle());
        assert!(Move::new(from, to, MoveKind::LongCastle).is_castle());
        assert!(!Move::new(from, to, MoveKind::EnPassant).is_castle());
        assert!(Move::new(from, to, MoveKind::LongCastle).is_long_castle());
        assert!(!Move::new(from, to, MoveKind::LongCastle).is_short_castle());
    }

    #[test]
    fn test_parse_tags_kind_from_board() {
        let state = GameState::from_diagram(
            "\
r...k..r
........
........
...pP...
........
........
........
R...K..R",
            Color::White,
        )
        .unwrap()
        .with_ep_square(Some("d6".parse().unwrap()));

        assert_eq!(
            Move::from_uci(&state, "e5d6").unwrap().kind(),
            MoveKind::EnPassant
        );
        assert_eq!(
            Move::from_uci(&state, "e1c1").unwrap().kind(),
            MoveKind::LongCastle
        );
        assert_eq!(
            Move::from_uci(&state, "a1a8").unwrap().kind(),
            MoveKind::Capture
        );
        assert_eq!(
            Move::from_uci(&state, "e1f1").unwrap().kind(),
            MoveKind::Quiet
        );
    }

    #[test]
    fn test_parse_errors() {
        let state = GameState::new();
        assert!(matches!(
            Move::from_uci(&state, ""),
            Err(ParseError::BadLength(_))
        ));
        assert!(matches!(
            Move::from_uci(&state, "e2e4qq"),
            Err(ParseError::BadLength(_))
        ));
        assert_eq!(
            Move::from_uci(&state, "i2e4"),
            Err(ParseError::InvalidFile('i'))
        );
        assert_eq!(
            Move::from_uci(&state, "E2E4"),
            Err(ParseError::InvalidFile('E'))
        );
        assert_eq!(
            Move::from_uci(&state, "e7e8k"),
            Err(ParseError::InvalidPromotion('k'))
        );
        assert_eq!(
            Move::from_uci(&state, "e2é4"),
            Err(ParseError::InvalidFile('é'))
        );
    }

    #[test]
    fn test_promotion_letters_any_case() {
        let state = GameState::new();
        let upper = Move::from_uci(&state, "a7a8Q").unwrap();
        assert_eq!(upper.promotion(), Some(PieceKind::Queen));
        assert_eq!(upper, "a7a8q");
    }

    #[test]
    fn test_castling_rook_squares() {
        let e8c8 = Move::new(Square::E8, Square::C8, MoveKind::LongCastle);
        assert_eq!(
            e8c8.castling_rook_squares(),
            Some((Square::A8, Square::C8.offset(1, 0).unwrap()))
        );
        assert_eq!(
            Move::new(Square::E2, Square::E4, MoveKind::Quiet).castling_rook_squares(),
            None
        );
    }
}
