/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use super::{Bitboard, Color, File, Move, Piece, PieceKind, Rank, Square};
use crate::ParseError;

/// Text diagram of the standard starting position.
///
/// Rows run from rank 8 down to rank 1, files from `a` to `h`.
/// Uppercase letters are White, lowercase are Black, and `.` is an empty square.
pub const DIAGRAM_STARTPOS: &str = "\
rnbqkbnr
pppppppp
........
........
........
........
PPPPPPPP
RNBQKBNR";

/// The placement of pieces on an `8x8` board, stored as a grid of optional [`Piece`]s.
///
/// A [`Board`] knows nothing about whose turn it is or which moves are legal.
/// See [`crate::GameState`] for that.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; File::COUNT]; Rank::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`].
    ///
    /// # Example
    /// ```
    /// # use arbiter::Board;
    /// let board = Board::new();
    /// assert!(board.occupied().is_empty());
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            squares: [[None; File::COUNT]; Rank::COUNT],
        }
    }

    /// Creates a [`Board`] with the standard starting arrangement of pieces.
    pub fn standard() -> Self {
        let mut board = Self::new();

        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for color in Color::all() {
            for (file, kind) in File::iter().zip(back_rank) {
                board.place(
                    Piece::new(color, kind),
                    Square::new(file, Rank::first(color)),
                );
                board.place(
                    Piece::new(color, PieceKind::Pawn),
                    Square::new(file, Rank::second(color)),
                );
            }
        }

        board
    }

    /// Parses a [`Board`] from a text diagram like [`DIAGRAM_STARTPOS`].
    ///
    /// The diagram must have 8 rows of 8 characters, from rank 8 down to rank 1.
    /// Both `.` and a space mark an empty square. Blank lines are ignored.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, Piece, Square, DIAGRAM_STARTPOS};
    /// let board = Board::from_diagram(DIAGRAM_STARTPOS).unwrap();
    /// assert_eq!(board, Board::standard());
    /// assert_eq!(board.piece_at(Square::E1), Some(Piece::WHITE_KING));
    ///
    /// assert!(Board::from_diagram("8/8/8/8/8/8/8/8").is_err());
    /// ```
    pub fn from_diagram(diagram: &str) -> Result<Self, ParseError> {
        let rows = diagram
            .lines()
            .filter(|row| !row.is_empty())
            .collect::<Vec<_>>();

        if rows.len() != Rank::COUNT {
            return Err(ParseError::InvalidDiagram(format!(
                "expected {} rows, found {}",
                Rank::COUNT,
                rows.len()
            )));
        }

        let mut board = Self::new();

        for (row, rank) in rows.into_iter().zip(Rank::iter().rev()) {
            let width = row.chars().count();
            if width != File::COUNT {
                return Err(ParseError::InvalidDiagram(format!(
                    "rank {rank} has {width} squares, expected {}",
                    File::COUNT
                )));
            }

            for (c, file) in row.chars().zip(File::iter()) {
                if c == '.' || c == ' ' {
                    continue;
                }
                board.place(Piece::from_char(c)?, Square::new(file, rank));
            }
        }

        Ok(board)
    }

    /// Renders this [`Board`] as a text diagram that [`Board::from_diagram`] accepts.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, DIAGRAM_STARTPOS};
    /// assert_eq!(Board::standard().to_diagram(), DIAGRAM_STARTPOS);
    /// ```
    pub fn to_diagram(&self) -> String {
        Rank::iter()
            .rev()
            .map(|rank| {
                File::iter()
                    .map(|file| match self.piece_at(Square::new(file, rank)) {
                        Some(piece) => piece.char(),
                        None => '.',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Fetches the [`Piece`] on `square`, if there is one.
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square]
    }

    /// Places `piece` on `square`, replacing whatever was there.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.squares[square] = Some(piece);
    }

    /// Removes and returns the [`Piece`] on `square`, if there is one.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square].take()
    }

    /// Returns `true` if nothing occupies `square`.
    #[inline(always)]
    pub fn is_empty_at(&self, square: Square) -> bool {
        self.squares[square].is_none()
    }

    /// Iterates over every occupied square and its [`Piece`], from `a1` to `h8`.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Iterates over the pieces belonging to `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color() == color)
    }

    /// Finds the square of `color`'s King.
    ///
    /// If there are several (which is never the case in a [`crate::GameState`]), the lowest is returned.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, Color, Square};
    /// assert_eq!(Board::standard().king(Color::Black), Some(Square::E8));
    /// assert_eq!(Board::new().king(Color::White), None);
    /// ```
    pub fn king(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.is_king())
            .map(|(square, _)| square)
    }

    /// Counts how many pieces of `piece`'s color and kind are on the board.
    pub fn count(&self, piece: Piece) -> usize {
        self.pieces().filter(|(_, p)| *p == piece).count()
    }

    /// Every square occupied by any piece.
    pub fn occupied(&self) -> Bitboard {
        self.pieces().map(|(square, _)| square).collect()
    }

    /// Every square occupied by a piece of `color`.
    pub fn color(&self, color: Color) -> Bitboard {
        self.pieces_of(color).map(|(square, _)| square).collect()
    }

    /// Moves pieces on the board as `mv` describes, without checking whether it is legal.
    ///
    /// Handles the side effects encoded in the move's kind: the captured pawn of an en passant
    /// capture is removed, castling also relocates the Rook, and promotions replace the Pawn.
    ///
    /// Returns the captured [`Piece`], if any.
    /// If the source square is empty, the board is left untouched.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Board, Move, MoveKind, Piece, Square};
    /// let mut board = Board::standard();
    /// board.take(Square::F1);
    /// board.take(Square::G1);
    ///
    /// let captured = board.make_move(Move::new(Square::E1, Square::G1, MoveKind::ShortCastle));
    /// assert_eq!(captured, None);
    /// assert_eq!(board.piece_at(Square::G1), Some(Piece::WHITE_KING));
    /// assert_eq!(board.piece_at(Square::F1), Some(Piece::WHITE_ROOK));
    /// assert_eq!(board.piece_at(Square::H1), None);
    /// ```
    pub fn make_move(&mut self, mv: Move) -> Option<Piece> {
        let mut piece = self.take(mv.from())?;

        let mut captured = self.take(mv.to());
        if mv.is_en_passant() {
            captured = mv
                .to()
                .backward_by(piece.color(), 1)
                .and_then(|victim| self.take(victim));
        }

        if let Some(promotion) = mv.promotion() {
            piece = piece.promoted(promotion);
        }
        self.place(piece, mv.to());

        if let Some((rook_from, rook_to)) = mv.castling_rook_squares() {
            if let Some(rook) = self.take(rook_from) {
                self.place(rook, rook_to);
            }
        }

        captured
    }
}

impl Default for Board {
    /// The default [`Board`] is the standard starting arrangement.
    #[inline(always)]
    fn default() -> Self {
        Self::standard()
    }
}

impl FromStr for Board {
    type Err = ParseError;
    /// Wrapper for [`Board::from_diagram`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_diagram(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}| ")?;

            for file in File::iter() {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece} ")?,
                    None => write!(f, ". ")?,
                }
            }

            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in File::iter() {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for file in File::iter() {
            write!(f, "{file} ")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_diagram())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MoveKind;

    #[test]
    fn test_standard_board() {
        let board = Board::standard();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.color(Color::White).population(), 16);
        assert_eq!(board.color(Color::Black).population(), 16);
        assert_eq!(board.count(Piece::WHITE_PAWN), 8);
        assert_eq!(board.king(Color::White), Some(Square::E1));
        assert_eq!(board.piece_at(Square::H8), Some(Piece::BLACK_ROOK));
        assert!(board.is_empty_at(Square::E4));
    }

    #[test]
    fn test_diagram_round_trip() {
        let diagram = "\
r...k..r
........
........
...pP...
........
........
........
R...K..R";
        let board = Board::from_diagram(diagram).unwrap();
        assert_eq!(board.piece_at(Square::D5), Some(Piece::BLACK_PAWN));
        assert_eq!(board.piece_at(Square::E5), Some(Piece::WHITE_PAWN));
        assert_eq!(board.to_diagram(), diagram);
    }

    #[test]
    fn test_diagram_accepts_spaces_as_empty() {
        let dotted = Board::from_diagram(DIAGRAM_STARTPOS).unwrap();
        let spaced = Board::from_diagram(&DIAGRAM_STARTPOS.replace('.', " ")).unwrap();
        assert_eq!(dotted, spaced);
    }

    #[test]
    fn test_diagram_errors() {
        // Seven rows
        let short = DIAGRAM_STARTPOS.lines().skip(1).collect::<Vec<_>>().join("\n");
        assert!(matches!(
            Board::from_diagram(&short),
            Err(ParseError::InvalidDiagram(_))
        ));

        // A row with nine squares
        let wide = DIAGRAM_STARTPOS.replacen("rnbqkbnr", "rnbqkbnrr", 1);
        assert!(matches!(
            Board::from_diagram(&wide),
            Err(ParseError::InvalidDiagram(_))
        ));

        // An unknown piece letter
        let unknown = DIAGRAM_STARTPOS.replacen("rnbqkbnr", "rnbqkbnx", 1);
        assert_eq!(
            Board::from_diagram(&unknown),
            Err(ParseError::InvalidPiece('x'))
        );
    }

    #[test]
    fn test_make_move_en_passant_removes_victim() {
        let mut board = Board::new();
        board.place(Piece::WHITE_PAWN, Square::E5);
        board.place(Piece::BLACK_PAWN, Square::D5);

        let d6 = Square::D5.forward_by(Color::White, 1).unwrap();
        let captured = board.make_move(Move::new(Square::E5, d6, MoveKind::EnPassant));
        assert_eq!(captured, Some(Piece::BLACK_PAWN));
        assert!(board.is_empty_at(Square::D5));
        assert_eq!(board.piece_at(d6), Some(Piece::WHITE_PAWN));
    }

    #[test]
    fn test_make_move_promotion_and_long_castle() {
        let mut board = Board::new();
        board.place(Piece::BLACK_KING, Square::E8);
        board.place(Piece::BLACK_ROOK, Square::A8);

        board.make_move(Move::new(Square::E8, Square::C8, MoveKind::LongCastle));
        assert_eq!(board.piece_at(Square::C8), Some(Piece::BLACK_KING));
        assert_eq!(
            board.piece_at(Square::C8.offset(1, 0).unwrap()),
            Some(Piece::BLACK_ROOK)
        );

        let mut board = Board::new();
        board.place(Piece::WHITE_PAWN, Square::E7);
        let mv = Move::new(Square::E7, Square::E8, MoveKind::Quiet).with_promotion(PieceKind::Knight);
        board.make_move(mv);
        assert_eq!(
            board.piece_at(Square::E8),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
    }

    #[test]
    fn test_make_move_from_empty_square_is_noop() {
        let mut board = Board::standard();
        let before = board;
        assert_eq!(
            board.make_move(Move::new(Square::E4, Square::E5, MoveKind::Quiet)),
            None
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_display_labels() {
        let rendered = Board::standard().to_string();
        let rows = rendered.lines().collect::<Vec<_>>();
        assert_eq!(rows[0], "8| r n b q k b n r ");
        assert_eq!(rows[7], "1| R N B Q K B N R ");
        assert_eq!(rows[9], "   a b c d e f g h ");
    }
}
