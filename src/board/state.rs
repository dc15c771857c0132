/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use log::{debug, trace};

use super::{
    attacks_by, attacks_for, is_attacked, pawn_attacks, Bitboard, Board, Color, File, Move,
    MoveKind, MoveList, Piece, PieceKind, Rank, Square,
};
use crate::{IllegalMoveError, IllegalReason, MoveError, ParseError};

/// Which castling moves each player may still make.
///
/// A right is lost for good once the King or the corresponding Rook moves, or that Rook is captured.
/// Having a right does not mean castling is currently legal: see [`GameState::is_legal`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct CastlingRights {
    white_kingside: bool,
    white_queenside: bool,
    black_kingside: bool,
    black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: Self = Self::new(true, true, true, true);
    pub const NONE: Self = Self::new(false, false, false, false);

    #[inline(always)]
    pub const fn new(
        white_kingside: bool,
        white_queenside: bool,
        black_kingside: bool,
        black_queenside: bool,
    ) -> Self {
        Self {
            white_kingside,
            white_queenside,
            black_kingside,
            black_queenside,
        }
    }

    /// Whether `color` may still castle with its `h`-file Rook.
    #[inline(always)]
    pub const fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    /// Whether `color` may still castle with its `a`-file Rook.
    #[inline(always)]
    pub const fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    #[inline(always)]
    pub fn revoke_kingside(&mut self, color: Color) {
        match color {
            Color::White => self.white_kingside = false,
            Color::Black => self.black_kingside = false,
        }
    }

    #[inline(always)]
    pub fn revoke_queenside(&mut self, color: Color) {
        match color {
            Color::White => self.white_queenside = false,
            Color::Black => self.black_queenside = false,
        }
    }

    #[inline(always)]
    pub fn revoke_all(&mut self, color: Color) {
        self.revoke_kingside(color);
        self.revoke_queenside(color);
    }

    /// Revokes whichever right depends on a Rook of `color` standing on `square`.
    ///
    /// Does nothing unless `square` is one of `color`'s Rook home squares.
    fn revoke_for_rook_square(&mut self, color: Color, square: Square) {
        let home = Rank::first(color);
        if square == Square::new(File::H, home) {
            self.revoke_kingside(color);
        } else if square == Square::new(File::A, home) {
            self.revoke_queenside(color);
        }
    }

    /// Formats these rights like the castling field of a FEN string: `KQkq`, or `-` if none remain.
    ///
    /// # Example
    /// ```
    /// # use arbiter::CastlingRights;
    /// assert_eq!(CastlingRights::ALL.to_uci(), "KQkq");
    /// assert_eq!(CastlingRights::new(false, true, true, false).to_uci(), "Qk");
    /// assert_eq!(CastlingRights::NONE.to_uci(), "-");
    /// ```
    pub fn to_uci(&self) -> String {
        let flags = [
            (self.white_kingside, 'K'),
            (self.white_queenside, 'Q'),
            (self.black_kingside, 'k'),
            (self.black_queenside, 'q'),
        ];

        let rights = flags
            .into_iter()
            .filter_map(|(set, c)| set.then_some(c))
            .collect::<String>();

        if rights.is_empty() {
            String::from("-")
        } else {
            rights
        }
    }
}

impl Default for CastlingRights {
    /// Both players start with all of their rights.
    #[inline(always)]
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// How a finished game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Outcome {
    /// The side to move is in check and has no legal moves.
    Checkmate { winner: Color },

    /// The side to move is not in check but has no legal moves.
    Stalemate,

    /// One hundred plies have passed without a pawn move or a capture.
    FiftyMoveRule,

    /// Neither player has enough material left to deliver checkmate.
    InsufficientMaterial,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            Self::Stalemate => write!(f, "stalemate"),
            Self::FiftyMoveRule => write!(f, "draw by the fifty-move rule"),
            Self::InsufficientMaterial => write!(f, "draw by insufficient material"),
        }
    }
}

/// A complete snapshot of a game in progress.
///
/// A [`GameState`] is only ever changed by [`GameState::apply_move`], which leaves `self` untouched
/// and returns the successor state. A rejected move therefore never alters anything.
///
/// # Example
/// ```
/// # use arbiter::{Color, GameState};
/// let start = GameState::new();
/// let mv = start.parse_move("e2e4").unwrap();
/// let next = start.apply_move(mv).unwrap();
///
/// assert_eq!(next.side_to_move(), Color::Black);
/// assert_eq!(next.ep_square(), Some("e3".parse().unwrap()));
/// assert_eq!(start, GameState::new());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    /// Placement of every piece.
    board: Board,

    /// The [`Color`] of the current player.
    side_to_move: Color,

    /// Castling rights for each player.
    castling_rights: CastlingRights,

    /// The square a Pawn skipped over on the previous ply, if it advanced two squares.
    ep_square: Option<Square>,

    /// Used to enforce the fifty-move rule.
    ///
    /// - Incremented after each move.
    /// - Reset after a capture or a pawn moves.
    halfmove: usize,

    /// Number of moves since the beginning of the game.
    ///
    /// A fullmove is a complete turn by white and then by black.
    fullmove: usize,

    /// Every move applied since this state was created, in order.
    history: Vec<Move>,
}

impl GameState {
    /// Creates a [`GameState`] for the standard starting position, White to move.
    ///
    /// # Example
    /// ```
    /// # use arbiter::GameState;
    /// let state = GameState::new();
    /// assert_eq!(state.generate_legal_moves().len(), 20);
    /// ```
    pub fn new() -> Self {
        Self {
            board: Board::standard(),
            side_to_move: Color::White,
            castling_rights: CastlingRights::ALL,
            ep_square: None,
            halfmove: 0,
            fullmove: 1,
            history: Vec::new(),
        }
    }

    /// Creates a [`GameState`] from a text diagram (see [`Board::from_diagram`]) and the side to move.
    ///
    /// Each player must have exactly one King, and no Pawn may stand on the first or last rank.
    /// Castling rights are granted wherever a King and Rook are still on their home squares;
    /// use [`GameState::with_castling_rights`] to remove them.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, GameState, DIAGRAM_STARTPOS};
    /// let state = GameState::from_diagram(DIAGRAM_STARTPOS, Color::White).unwrap();
    /// assert_eq!(state, GameState::new());
    ///
    /// let no_black_king = DIAGRAM_STARTPOS.replace('k', ".");
    /// assert!(GameState::from_diagram(&no_black_king, Color::White).is_err());
    /// ```
    pub fn from_diagram(diagram: &str, side_to_move: Color) -> Result<Self, ParseError> {
        let board = Board::from_diagram(diagram)?;

        for color in Color::all() {
            let kings = board.count(Piece::new(color, PieceKind::King));
            if kings != 1 {
                return Err(ParseError::InvalidDiagram(format!(
                    "{color} must have exactly one king, found {kings}"
                )));
            }
        }

        if let Some((square, _)) = board
            .pieces()
            .find(|(square, piece)| piece.is_pawn() && matches!(square.rank(), Rank::ONE | Rank::EIGHT))
        {
            return Err(ParseError::InvalidDiagram(format!(
                "pawn on {square} cannot be on the first or last rank"
            )));
        }

        let mut castling_rights = CastlingRights::ALL;
        for color in Color::all() {
            let home = Rank::first(color);
            let rook = Some(Piece::new(color, PieceKind::Rook));

            if board.piece_at(Square::new(File::E, home)) != Some(Piece::new(color, PieceKind::King)) {
                castling_rights.revoke_all(color);
            }
            if board.piece_at(Square::new(File::H, home)) != rook {
                castling_rights.revoke_kingside(color);
            }
            if board.piece_at(Square::new(File::A, home)) != rook {
                castling_rights.revoke_queenside(color);
            }
        }

        Ok(Self {
            board,
            side_to_move,
            castling_rights,
            ep_square: None,
            halfmove: 0,
            fullmove: 1,
            history: Vec::new(),
        })
    }

    /// Replaces the castling rights of this state.
    ///
    /// Rights are only meaningful where the King and Rook actually stand on their home squares;
    /// castling is still refused if they do not.
    #[inline(always)]
    pub fn with_castling_rights(mut self, castling_rights: CastlingRights) -> Self {
        self.castling_rights = castling_rights;
        self
    }

    /// Replaces the en passant target square of this state.
    ///
    /// The target must be the square skipped by an opposing Pawn that could have just advanced two
    /// squares: on the opponent's third rank, with that Pawn directly beyond it. Any other target
    /// is discarded.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, Square};
    /// let state = GameState::new().play(["e2e4", "a7a6", "e4e5", "d7d5"]).unwrap();
    /// assert_eq!(state.clone().with_ep_square(Some(Square::E6)).ep_square(), None);
    /// assert_eq!(state.clone().with_ep_square(Some(Square::C6)).ep_square(), None);
    /// assert_eq!(state.with_ep_square(Some(Square::D6)).ep_square(), Some(Square::D6));
    /// ```
    pub fn with_ep_square(mut self, ep_square: Option<Square>) -> Self {
        let opponent = self.side_to_move.opponent();
        let pawn = Some(Piece::new(opponent, PieceKind::Pawn));

        self.ep_square = ep_square.filter(|&target| {
            let valid = target.rank() == Rank::third(opponent)
                && self.board.is_empty_at(target)
                && target.forward_by(opponent, 1).and_then(|sq| self.board.piece_at(sq)) == pawn;

            if !valid {
                debug!("Discarding en passant target {target}");
            }
            valid
        });
        self
    }

    /// Replaces the halfmove clock of this state.
    #[inline(always)]
    pub fn with_halfmove(mut self, halfmove: usize) -> Self {
        self.halfmove = halfmove;
        self
    }

    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub const fn castling_rights(&self) -> &CastlingRights {
        &self.castling_rights
    }

    #[inline(always)]
    pub const fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    #[inline(always)]
    pub const fn halfmove(&self) -> usize {
        self.halfmove
    }

    #[inline(always)]
    pub const fn fullmove(&self) -> usize {
        self.fullmove
    }

    /// Every move applied since this state was created, oldest first.
    #[inline(always)]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Parses a move in coordinate notation. See [`Move::from_uci`].
    #[inline(always)]
    pub fn parse_move(&self, text: &str) -> Result<Move, ParseError> {
        Move::from_uci(self, text)
    }

    /// Returns `true` if `mv` may be played by the side to move.
    ///
    /// # Example
    /// ```
    /// # use arbiter::GameState;
    /// let state = GameState::new();
    /// assert!(state.is_legal(state.parse_move("g1f3").unwrap()));
    /// assert!(!state.is_legal(state.parse_move("e2e5").unwrap()));
    /// assert!(!state.is_legal(state.parse_move("e7e5").unwrap()));
    /// ```
    #[inline(always)]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.check_legality(mv).is_ok()
    }

    /// Determines whether `mv` may be played by the side to move, and if not, why not.
    ///
    /// The move's [`MoveKind`] and promotion must agree with the board;
    /// a capture tagged as [`MoveKind::Quiet`], for example, is rejected.
    pub fn check_legality(&self, mv: Move) -> Result<(), IllegalReason> {
        let color = self.side_to_move;

        let piece = self
            .board
            .piece_at(mv.from())
            .ok_or(IllegalReason::NoPiece)?;
        if piece.color() != color {
            return Err(IllegalReason::NotYourTurn);
        }

        if let Some(victim) = self.board.piece_at(mv.to()) {
            if victim.color() == color {
                return Err(IllegalReason::CapturesOwnPiece);
            }
            if victim.is_king() {
                return Err(IllegalReason::CapturesKing);
            }
        }

        if MoveKind::new(&self.board, self.ep_square, mv.from(), mv.to()) != mv.kind() {
            return Err(IllegalReason::WrongKind);
        }

        self.check_promotion(piece, mv)?;

        if mv.is_castle() {
            self.check_castling(mv)?;
        } else if !self.is_reachable(piece, mv) {
            return Err(IllegalReason::Unreachable);
        }

        if self.leaves_king_in_check(mv) {
            return Err(IllegalReason::LeavesKingInCheck);
        }

        Ok(())
    }

    /// A Pawn reaching its last rank must promote, and nothing else may.
    fn check_promotion(&self, piece: Piece, mv: Move) -> Result<(), IllegalReason> {
        let reaches_last_rank =
            piece.is_pawn() && mv.to().rank() == Rank::eighth(piece.color());

        match mv.promotion() {
            None if reaches_last_rank => Err(IllegalReason::MissingPromotion),
            Some(_) if !reaches_last_rank => Err(IllegalReason::UnexpectedPromotion),
            Some(kind) if !kind.is_promotion_target() => Err(IllegalReason::InvalidPromotion),
            _ => Ok(()),
        }
    }

    /// Whether `piece` can travel from the move's source to its destination under its movement rule,
    /// ignoring the safety of its own King.
    fn is_reachable(&self, piece: Piece, mv: Move) -> bool {
        let (from, to) = (mv.from(), mv.to());
        let color = piece.color();

        if !piece.is_pawn() {
            return attacks_for(piece, from, self.board.occupied()).contains(to);
        }

        match mv.kind() {
            MoveKind::Quiet => {
                let Some(single) = from.forward_by(color, 1) else {
                    return false;
                };

                if to == single {
                    return true;
                }

                from.rank() == Rank::second(color)
                    && self.board.is_empty_at(single)
                    && from.forward_by(color, 2) == Some(to)
            }

            MoveKind::Capture => pawn_attacks(from, color).contains(to),

            MoveKind::EnPassant => {
                let victim = to.backward_by(color, 1).and_then(|sq| self.board.piece_at(sq));
                pawn_attacks(from, color).contains(to)
                    && victim == Some(Piece::new(color.opponent(), PieceKind::Pawn))
            }

            MoveKind::ShortCastle | MoveKind::LongCastle => false,
        }
    }

    /// Castling requires the right, the Rook at home, an empty path, and a King that is never attacked
    /// on its home square, the square it crosses, or the square it lands on.
    fn check_castling(&self, mv: Move) -> Result<(), IllegalReason> {
        let color = self.side_to_move;
        let opponent = color.opponent();

        let has_right = if mv.is_short_castle() {
            self.castling_rights.kingside(color)
        } else {
            self.castling_rights.queenside(color)
        };
        if !has_right {
            return Err(IllegalReason::NoCastlingRights);
        }

        let Some((rook_square, _)) = mv.castling_rook_squares() else {
            return Err(IllegalReason::WrongKind);
        };
        if self.board.piece_at(rook_square) != Some(Piece::new(color, PieceKind::Rook)) {
            return Err(IllegalReason::NoCastlingRights);
        }

        let step: i8 = if mv.is_short_castle() { 1 } else { -1 };
        let mut between = mv.from().offset(step, 0);
        while let Some(square) = between.filter(|&sq| sq != rook_square) {
            if !self.board.is_empty_at(square) {
                return Err(IllegalReason::CastlingPathBlocked);
            }
            between = square.offset(step, 0);
        }

        if self.in_check(color) {
            return Err(IllegalReason::CastlingOutOfCheck);
        }

        let crossed = mv.from().offset(step, 0);
        for square in [crossed, Some(mv.to())].into_iter().flatten() {
            if is_attacked(&self.board, square, opponent) {
                return Err(IllegalReason::CastlingThroughCheck);
            }
        }

        Ok(())
    }

    /// Plays `mv` on a scratch copy of the board and checks whether the mover's King is then attacked.
    fn leaves_king_in_check(&self, mv: Move) -> bool {
        let color = self.side_to_move;
        let mut board = self.board;
        board.make_move(mv);

        board
            .king(color)
            .is_some_and(|king| is_attacked(&board, king, color.opponent()))
    }

    /// Validates `mv` and, if it is legal, returns the state after playing it.
    ///
    /// `self` is never modified, so a rejected move leaves the game exactly as it was.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, IllegalReason};
    /// let state = GameState::new();
    /// let err = state.apply_move(state.parse_move("e1e2").unwrap()).unwrap_err();
    /// assert_eq!(err.reason, IllegalReason::CapturesOwnPiece);
    /// ```
    pub fn apply_move(&self, mv: Move) -> Result<Self, IllegalMoveError> {
        if let Err(reason) = self.check_legality(mv) {
            debug!("Rejected {mv:?} for {}: {reason}", self.side_to_move);
            return Err(IllegalMoveError::new(mv, reason));
        }

        let next = self.with_move_made(mv);
        trace!(
            "Applied {mv:?}; {} to move, castling {}, halfmove {}",
            next.side_to_move,
            next.castling_rights,
            next.halfmove
        );

        Ok(next)
    }

    /// Parses `text` and applies the resulting move.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, MoveError};
    /// let state = GameState::new();
    /// assert!(state.play_move("e2e4").is_ok());
    /// assert!(matches!(state.play_move("e2"), Err(MoveError::Parse(_))));
    /// assert!(matches!(state.play_move("e2e5"), Err(MoveError::Illegal(_))));
    /// ```
    pub fn play_move(&self, text: &str) -> Result<Self, MoveError> {
        let mv = self.parse_move(text)?;
        Ok(self.apply_move(mv)?)
    }

    /// Parses and applies each move in order, stopping at the first one that fails.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, GameState};
    /// let state = GameState::new().play(["e2e4", "e7e5", "g1f3"]).unwrap();
    /// assert_eq!(state.side_to_move(), Color::Black);
    /// assert_eq!(state.fullmove(), 2);
    /// assert_eq!(state.history().len(), 3);
    /// ```
    pub fn play<I, S>(&self, moves: I) -> Result<Self, MoveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        moves
            .into_iter()
            .try_fold(self.clone(), |state, text| state.play_move(text.as_ref()))
    }

    /// Updates this state as if `mv` were played, without checking whether it is legal.
    pub(crate) fn make_move_unchecked(&mut self, mv: Move) {
        let color = self.side_to_move;
        let Some(piece) = self.board.piece_at(mv.from()) else {
            return;
        };

        let captured = self.board.make_move(mv);

        // Moving the King or a Rook from its home square forfeits the matching rights
        if piece.is_king() {
            self.castling_rights.revoke_all(color);
        } else if piece.is_rook() {
            self.castling_rights.revoke_for_rook_square(color, mv.from());
        }

        // So does losing a Rook on its home square
        if captured.is_some_and(|victim| victim.is_rook()) {
            self.castling_rights
                .revoke_for_rook_square(color.opponent(), mv.to());
        }

        self.ep_square = if piece.is_pawn() && mv.from().rank().abs_diff(mv.to().rank()) == 2 {
            mv.from().forward_by(color, 1)
        } else {
            None
        };

        if piece.is_pawn() || captured.is_some() {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }

        if color == Color::Black {
            self.fullmove += 1;
        }

        self.side_to_move = color.opponent();
        self.history.push(mv);
    }

    /// Returns the state after playing `mv`, without checking whether it is legal.
    #[inline(always)]
    pub(crate) fn with_move_made(&self, mv: Move) -> Self {
        let mut next = self.clone();
        next.make_move_unchecked(mv);
        next
    }

    /// Every square attacked by at least one piece of `color`.
    #[inline(always)]
    pub fn attacks_by(&self, color: Color) -> Bitboard {
        attacks_by(&self.board, color)
    }

    /// Returns `true` if `color`'s King is attacked by any opposing piece.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, GameState};
    /// let state = GameState::new().play(["f2f3", "e7e5", "g2g4", "d8h4"]).unwrap();
    /// assert!(state.in_check(Color::White));
    /// assert!(!state.in_check(Color::Black));
    /// ```
    pub fn in_check(&self, color: Color) -> bool {
        self.board
            .king(color)
            .is_some_and(|king| is_attacked(&self.board, king, color.opponent()))
    }

    /// Generates every legal move for the side to move.
    pub fn generate_legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        for (from, piece) in self.board.pieces_of(self.side_to_move) {
            self.generate_moves_for(from, piece, &mut moves);
        }
        moves
    }

    /// Generates the legal moves of whatever piece stands on `square`.
    ///
    /// Yields nothing if the square is empty or holds a piece of the side not on move.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{GameState, Square};
    /// let state = GameState::new();
    /// assert_eq!(state.legal_moves_from(Square::E2).len(), 2);
    /// assert_eq!(state.legal_moves_from(Square::E1).len(), 0);
    /// assert_eq!(state.legal_moves_from(Square::E7).len(), 0);
    /// ```
    pub fn legal_moves_from(&self, square: Square) -> MoveList {
        let mut moves = MoveList::new();
        if let Some(piece) = self.board.piece_at(square) {
            if piece.color() == self.side_to_move {
                self.generate_moves_for(square, piece, &mut moves);
            }
        }
        moves
    }

    /// Collects pseudo-legal destinations for `piece` and keeps the candidates that pass [`GameState::is_legal`].
    fn generate_moves_for(&self, from: Square, piece: Piece, moves: &mut MoveList) {
        let color = piece.color();
        let own = self.board.color(color);
        let blockers = self.board.occupied();

        let mut targets = match piece.kind() {
            PieceKind::Pawn => {
                let mut targets = pawn_attacks(from, color)
                    & (self.board.color(color.opponent()) | self.ep_bitboard());

                if let Some(single) = from.forward_by(color, 1).filter(|sq| !blockers.contains(*sq)) {
                    targets.set(single);
                    if from.rank() == Rank::second(color) {
                        if let Some(double) = from.forward_by(color, 2) {
                            targets |= double.bitboard() & !blockers;
                        }
                    }
                }

                targets
            }

            PieceKind::King => {
                let mut targets = attacks_for(piece, from, blockers) & !own;
                if from == Square::new(File::E, Rank::first(color)) {
                    if self.castling_rights.kingside(color) {
                        targets |= from.offset(2, 0).map(Bitboard::from).unwrap_or_default();
                    }
                    if self.castling_rights.queenside(color) {
                        targets |= from.offset(-2, 0).map(Bitboard::from).unwrap_or_default();
                    }
                }
                targets
            }

            _ => attacks_for(piece, from, blockers) & !own,
        };

        let promotes = piece.is_pawn();
        while let Some(to) = targets.pop_lsb() {
            let mv = Move::new(from, to, MoveKind::new(&self.board, self.ep_square, from, to));

            if promotes && to.rank() == Rank::eighth(color) {
                for promotion in PieceKind::promotions() {
                    let mv = mv.with_promotion(promotion);
                    if self.is_legal(mv) {
                        moves.push(mv);
                    }
                }
            } else if self.is_legal(mv) {
                moves.push(mv);
            }
        }
    }

    #[inline(always)]
    fn ep_bitboard(&self) -> Bitboard {
        self.ep_square.map(Bitboard::from).unwrap_or_default()
    }

    /// Returns `true` if the side to move is in check and has no legal moves.
    pub fn is_checkmate(&self) -> bool {
        self.in_check(self.side_to_move) && self.generate_legal_moves().is_empty()
    }

    /// Returns `true` if the side to move is not in check but has no legal moves.
    pub fn is_stalemate(&self) -> bool {
        !self.in_check(self.side_to_move) && self.generate_legal_moves().is_empty()
    }

    /// Returns `true` if the halfmove clock has reached 100 plies.
    #[inline(always)]
    pub const fn can_draw_by_fifty(&self) -> bool {
        self.halfmove >= 100
    }

    /// Returns `true` if there is insufficient material on the board to cause a checkmate.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, GameState};
    /// let rows = |bishops: &str| format!("........\n{bishops}\n........\n........\n...K....\n........\n.....B..\n........");
    ///
    /// // Opposing Bishops on the same color square
    /// let same = GameState::from_diagram(&rows("..b.k..."), Color::White).unwrap();
    /// assert!(same.can_draw_by_insufficient_material());
    ///
    /// // Opposing Bishops on different color squares
    /// let different = GameState::from_diagram(&rows("...bk..."), Color::White).unwrap();
    /// assert!(!different.can_draw_by_insufficient_material());
    /// ```
    pub fn can_draw_by_insufficient_material(&self) -> bool {
        let mut minors = Vec::new();
        for (square, piece) in self.board.pieces() {
            match piece.kind() {
                PieceKind::King => {}
                PieceKind::Knight | PieceKind::Bishop => minors.push((square, piece)),
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            }
        }

        match minors.as_slice() {
            // Lone kings, or a single minor piece
            [] | [_] => true,

            // Each King has a single Bishop, both on the same square color
            [(a, first), (b, second)] => {
                first.kind() == PieceKind::Bishop
                    && second.kind() == PieceKind::Bishop
                    && first.color() != second.color()
                    && a.is_light() == b.is_light()
            }

            _ => false,
        }
    }

    /// Determines whether the game has ended, and how.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, GameState, Outcome};
    /// let mated = GameState::new().play(["f2f3", "e7e5", "g2g4", "d8h4"]).unwrap();
    /// assert_eq!(mated.outcome(), Some(Outcome::Checkmate { winner: Color::Black }));
    /// assert_eq!(GameState::new().outcome(), None);
    /// ```
    pub fn outcome(&self) -> Option<Outcome> {
        if self.generate_legal_moves().is_empty() {
            return Some(if self.in_check(self.side_to_move) {
                Outcome::Checkmate {
                    winner: self.side_to_move.opponent(),
                }
            } else {
                Outcome::Stalemate
            });
        }

        if self.can_draw_by_fifty() {
            Some(Outcome::FiftyMoveRule)
        } else if self.can_draw_by_insufficient_material() {
            Some(Outcome::InsufficientMaterial)
        } else {
            None
        }
    }
}

impl Default for GameState {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    /// Displays the board diagram with rank and file labels.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, row) in Rank::iter().rev().zip(self.board.to_diagram().lines()) {
            write!(f, "{rank}|")?;
            for c in row.chars() {
                write!(f, " {c}")?;
            }

            if rank == Rank::SEVEN {
                write!(f, "          Side: {}", self.side_to_move)?;
            } else if rank == Rank::SIX {
                write!(f, "      Castling: {}", self.castling_rights)?;
            } else if rank == Rank::FIVE {
                let ep = self
                    .ep_square
                    .map(|t| t.to_uci())
                    .unwrap_or(String::from("-"));
                write!(f, "            EP: {ep}")?;
            } else if rank == Rank::FOUR {
                write!(f, "     Half-move: {}", self.halfmove)?;
            } else if rank == Rank::THREE {
                write!(f, "     Full-move: {}", self.fullmove)?;
            } else if rank == Rank::TWO {
                write!(f, "         Moves: {}", self.history.len())?;
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

#[cfg(test)]
mod tests {
    use super::*;

    const CASTLING_DIAGRAM: &str = "\
r...k..r
........
........
........
........
........
........
R...K..R";

    fn state(diagram: &str, color: Color) -> GameState {
        GameState::from_diagram(diagram, color).unwrap()
    }

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    // There are 4 scenarios in which castling rights are lost:
    //  1. The King was moved
    //  2. A Rook was moved
    //  3. A Rook was captured
    //  4. Castling was performed

    #[test]
    fn test_castling_rights_update_on_king_move() {
        let pos = state(CASTLING_DIAGRAM, Color::White);
        assert_eq!(pos.castling_rights().to_uci(), "KQkq");

        // Moving the White King should remove White's castling rights
        let pos = pos.play_move("e1d1").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "kq");

        // Same for Black
        let pos = pos.play_move("e8f8").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "-");

        // Moving the Kings back should NOT restore castling rights
        let pos = pos.play(["d1e1", "f8e8"]).unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "-");
    }

    #[test]
    fn test_castling_rights_update_on_rook_move() {
        let pos = state(CASTLING_DIAGRAM, Color::White);

        // Moving a Rook should disable castling for that side
        let pos = pos.play_move("a1b1").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "Kkq");

        // Same for Black
        let pos = pos.play_move("a8b8").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "Kk");

        // Moving the Rooks back should NOT re-enable castling for that side
        let pos = pos.play(["b1a1", "b8a8"]).unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "Kk");
    }

    #[test]
    fn test_castling_rights_update_on_rook_captured() {
        // The Bishop on d8 keeps the capturing Rook from checking Black's King
        let diagram = CASTLING_DIAGRAM.replacen("r...k..r", "r..bk..r", 1);
        let pos = state(&diagram, Color::White);
        assert_eq!(pos.castling_rights().to_uci(), "KQkq");

        // Capturing a Rook disables castling on that side for both the capturer and the captured
        let pos = pos.play_move("a1a8").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "Kk");

        // Same for Black, on the other side
        let pos = pos.play_move("h8h1").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "-");
    }

    #[test]
    fn test_castling_rights_update_on_castling_performed() {
        let pos = state(CASTLING_DIAGRAM, Color::White);

        let pos = pos.play_move("e1g1").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "kq");
        assert_eq!(pos.board().piece_at(Square::G1), Some(Piece::WHITE_KING));
        assert_eq!(pos.board().piece_at(Square::F1), Some(Piece::WHITE_ROOK));

        let pos = pos.play_move("e8c8").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "-");
        assert_eq!(pos.board().piece_at(Square::C8), Some(Piece::BLACK_KING));
        assert_eq!(pos.board().piece_at(sq("d8")), Some(Piece::BLACK_ROOK));
        assert_eq!(pos.board().piece_at(Square::A8), None);
    }

    #[test]
    fn test_castling_rights_update_on_promote_to_rook() {
        // Black will capture White's A1 Rook,
        //  but White will promote a Pawn to a Rook,
        //  then capture Black's Rook on A1.
        //
        // Queenside/Long castling rights for White should NOT be restored!
        let diagram = "\
....k..r
P.......
........
........
r.......
........
........
RB..K..R";
        let pos = state(diagram, Color::Black);
        assert_eq!(pos.castling_rights().to_uci(), "KQk");

        let pos = pos.play_move("a4a1").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "Kk");

        let pos = pos.play_move("a7a8r").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "Kk");

        // Black moves its King out of check
        let pos = pos.play_move("e8e7").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "K");

        // White captures Black's Rook on A1
        let pos = pos.play_move("a8a1").unwrap();
        assert_eq!(pos.castling_rights().to_uci(), "K");

        // Despite having a Rook back on A1, White should NOT be able to castle long
        assert!(!pos.castling_rights().queenside(Color::White));
    }

    #[test]
    fn test_ep_square_must_follow_a_double_push() {
        let diagram = "\
....k...
........
........
........
...pP...
........
........
....K...";
        let pos = state(diagram, Color::White);

        // d5 sits in front of the Black Pawn, not behind it
        let pos = pos.with_ep_square(Some(sq("d5")));
        assert_eq!(pos.ep_square(), None);

        let mv = pos.parse_move("e4d5").unwrap();
        assert_eq!(mv.kind(), MoveKind::Quiet);
        assert_eq!(pos.check_legality(mv), Err(IllegalReason::Unreachable));
        assert_eq!(pos.board().piece_at(sq("d4")).map(|p| p.char()), Some('p'));

        // No Pawn could have skipped d3 on its way to d4 with White to move
        assert_eq!(pos.with_ep_square(Some(sq("d3"))).ep_square(), None);
    }

    #[test]
    fn test_clocks_and_ep_square() {
        let pos = GameState::new();

        let pos = pos.play_move("g1f3").unwrap();
        assert_eq!(pos.halfmove(), 1);
        assert_eq!(pos.fullmove(), 1);
        assert_eq!(pos.ep_square(), None);

        let pos = pos.play_move("e7e5").unwrap();
        assert_eq!(pos.halfmove(), 0);
        assert_eq!(pos.fullmove(), 2);
        assert_eq!(pos.ep_square(), Some(sq("e6")));

        // The target is cleared after any other ply
        let pos = pos.play_move("b1c3").unwrap();
        assert_eq!(pos.ep_square(), None);
        assert_eq!(pos.halfmove(), 1);

        // Captures reset the clock
        let pos = pos.play(["d7d5", "f3e5"]).unwrap();
        assert_eq!(pos.halfmove(), 0);
        assert_eq!(pos.history().len(), 5);
    }

    #[test]
    fn test_promotion_rules() {
        let diagram = "\
....k...
P.......
........
........
........
........
........
....K...";
        let pos = state(diagram, Color::White);

        let missing = Move::new(sq("a7"), Square::A8, MoveKind::Quiet);
        assert_eq!(
            pos.check_legality(missing),
            Err(IllegalReason::MissingPromotion)
        );

        let to_king = missing.with_promotion(PieceKind::King);
        assert_eq!(
            pos.check_legality(to_king),
            Err(IllegalReason::InvalidPromotion)
        );

        let early = Move::new(Square::E1, Square::E2, MoveKind::Quiet).with_promotion(PieceKind::Queen);
        assert_eq!(
            pos.check_legality(early),
            Err(IllegalReason::UnexpectedPromotion)
        );

        let next = pos.play_move("a7a8n").unwrap();
        assert_eq!(
            next.board().piece_at(Square::A8),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
        assert_eq!(pos.legal_moves_from(sq("a7")).len(), 4);
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let pos = GameState::new().play(["e2e4", "d7d5"]).unwrap();
        let mislabeled = Move::new(Square::E4, Square::D5, MoveKind::Quiet);
        assert_eq!(pos.check_legality(mislabeled), Err(IllegalReason::WrongKind));

        let labeled = Move::new(Square::E4, Square::D5, MoveKind::Capture);
        assert!(pos.is_legal(labeled));
    }

    #[test]
    fn test_kings_cannot_be_captured() {
        // Black's King is already attacked, but capturing it is still refused
        let diagram = "\
....k...
........
........
........
........
........
........
....R..K";
        let pos = state(diagram, Color::White);
        let mv = pos.parse_move("e1e8").unwrap();
        assert_eq!(pos.check_legality(mv), Err(IllegalReason::CapturesKing));
    }

    #[test]
    fn test_outcomes() {
        let stalemate = "\
.......k
.....Q..
......K.
........
........
........
........
........";
        let pos = state(stalemate, Color::Black);
        assert!(pos.is_stalemate());
        assert_eq!(pos.outcome(), Some(Outcome::Stalemate));

        let bare = "\
....k...
........
........
........
........
........
........
....K...";
        let pos = state(bare, Color::White);
        assert_eq!(pos.outcome(), Some(Outcome::InsufficientMaterial));

        let pos = GameState::new().with_halfmove(100);
        assert_eq!(pos.outcome(), Some(Outcome::FiftyMoveRule));
        assert_eq!(GameState::new().with_halfmove(99).outcome(), None);
    }

    #[test]
    fn test_diagram_validation() {
        let two_kings = CASTLING_DIAGRAM.replacen("R...K..R", "R..KK..R", 1);
        assert!(matches!(
            GameState::from_diagram(&two_kings, Color::White),
            Err(ParseError::InvalidDiagram(_))
        ));

        let pawn_on_last_rank = CASTLING_DIAGRAM.replacen("r...k..r", "r...k.Pr", 1);
        assert!(matches!(
            GameState::from_diagram(&pawn_on_last_rank, Color::White),
            Err(ParseError::InvalidDiagram(_))
        ));

        // Rights are only granted where King and Rook are home
        let moved_rook = CASTLING_DIAGRAM.replacen("R...K..R", "R...K.R.", 1);
        let pos = state(&moved_rook, Color::White);
        assert_eq!(pos.castling_rights().to_uci(), "Qkq");
    }

    #[test]
    fn test_debug_shows_state() {
        let pos = GameState::new().play_move("e2e4").unwrap();
        let debug = format!("{pos:?}");
        assert!(debug.contains("Side: black"));
        assert!(debug.contains("Castling: KQkq"));
        assert!(debug.contains("EP: e3"));
    }
}
