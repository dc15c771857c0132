/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Bitboard, Board, Color, Piece, PieceKind, Square};

const KNIGHT_ATTACKS: [Bitboard; Square::COUNT] = generate_leaper_mobility(&KNIGHT_DELTAS);
const KING_ATTACKS: [Bitboard; Square::COUNT] = generate_leaper_mobility(&QUEEN_DELTAS);
const WHITE_PAWN_ATTACKS: [Bitboard; Square::COUNT] = generate_pawn_attacks(Color::White);
const BLACK_PAWN_ATTACKS: [Bitboard; Square::COUNT] = generate_pawn_attacks(Color::Black);

/// Deltas for the movement of the Queen (and the King, one step at a time).
pub const QUEEN_DELTAS: [(i8, i8); 8] = [
    /* Rook */
    (1, 0),
    (0, -1),
    (-1, 0),
    (0, 1),
    /* Bishop */
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// Deltas for the movement of the Rook.
pub const ROOK_DELTAS: [(i8, i8); 4] = [
    QUEEN_DELTAS[0],
    QUEEN_DELTAS[1],
    QUEEN_DELTAS[2],
    QUEEN_DELTAS[3],
];

/// Deltas for the movement of the Bishop.
pub const BISHOP_DELTAS: [(i8, i8); 4] = [
    QUEEN_DELTAS[4],
    QUEEN_DELTAS[5],
    QUEEN_DELTAS[6],
    QUEEN_DELTAS[7],
];

/// Deltas for the movement of the Knight.
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (2, 1),
    (2, -1),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

/// Fetch the pseudo-legal attacks for `piece` at `square`, given the occupied squares in `blockers`.
///
/// Sliding attacks stop at (and include) the first occupied square in each direction,
/// regardless of that occupant's color. Friendly pieces are filtered out by the caller.
///
/// Note: For Pawns, this is only the diagonal captures, not their pushes.
/// A Pawn that could push onto a square does not threaten it.
///
/// # Example
/// ```
/// # use arbiter::{attacks_for, Bitboard, Piece, Square};
/// let attacks = attacks_for(Piece::WHITE_ROOK, Square::A1, Bitboard::EMPTY_BOARD);
/// assert_eq!(attacks.population(), 14);
/// ```
#[inline(always)]
pub const fn attacks_for(piece: Piece, square: Square, blockers: Bitboard) -> Bitboard {
    match piece.kind() {
        PieceKind::Pawn => pawn_attacks(square, piece.color()),
        PieceKind::Knight => knight_attacks(square),
        PieceKind::Bishop => bishop_attacks(square, blockers),
        PieceKind::Rook => rook_attacks(square, blockers),
        PieceKind::Queen => queen_attacks(square, blockers),
        PieceKind::King => king_attacks(square),
    }
}

/// Computes every square attacked by at least one piece of `color` on `board`.
///
/// # Example
/// ```
/// # use arbiter::{attacks_by, Board, Color, Square};
/// let attacked = attacks_by(&Board::standard(), Color::White);
/// assert!(attacked.contains(Square::F1.offset(0, 2).unwrap()));
/// assert!(!attacked.contains(Square::E4));
/// ```
pub fn attacks_by(board: &Board, color: Color) -> Bitboard {
    let blockers = board.occupied();
    board
        .pieces_of(color)
        .fold(Bitboard::EMPTY_BOARD, |attacks, (square, piece)| {
            attacks | attacks_for(piece, square, blockers)
        })
}

/// Returns `true` if any piece of color `by` attacks `square` on `board`.
pub fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    let blockers = board.occupied();
    board
        .pieces_of(by)
        .any(|(from, piece)| attacks_for(piece, from, blockers).contains(square))
}

/// Attacks for a Rook at `square`, stopping at the first blocker in each direction.
#[inline(always)]
pub const fn rook_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    rider_attacks(square, &ROOK_DELTAS, blockers)
}

/// Attacks for a Bishop at `square`, stopping at the first blocker in each direction.
#[inline(always)]
pub const fn bishop_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    rider_attacks(square, &BISHOP_DELTAS, blockers)
}

/// Union of [`rook_attacks`] and [`bishop_attacks`].
#[inline(always)]
pub const fn queen_attacks(square: Square, blockers: Bitboard) -> Bitboard {
    rider_attacks(square, &QUEEN_DELTAS, blockers)
}

#[inline(always)]
pub const fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square.index()]
}

#[inline(always)]
pub const fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[square.index()]
}

/// Fetch the raw attacks for a pawn of the provided color on the provided square.
#[inline(always)]
pub const fn pawn_attacks(square: Square, color: Color) -> Bitboard {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square.index()],
        Color::Black => BLACK_PAWN_ATTACKS[square.index()],
    }
}

/// Casts a ray from `square` along each delta until it leaves the board or hits a blocker.
///
/// The blocker's square is included, since it may be captured.
const fn rider_attacks(square: Square, deltas: &[(i8, i8)], blockers: Bitboard) -> Bitboard {
    let mut movement = Bitboard::EMPTY_BOARD;

    let mut j = 0;
    while j < deltas.len() {
        let (df, dr) = deltas[j];
        let mut ray = square;

        while let Some(shifted) = ray.offset(df, dr) {
            movement = movement.or(shifted.bitboard());
            if blockers.contains(shifted) {
                break;
            }
            ray = shifted;
        }

        j += 1;
    }

    movement
}

/// Generates the moves from every location for the "Leaper" pieces.
/// Leapers may "leap" or "jump" to a square a specified distance away.
///
/// In standard chess, the Leapers are the King and Knight.
const fn generate_leaper_mobility(deltas: &[(i8, i8)]) -> [Bitboard; Square::COUNT] {
    let mut mobility = [Bitboard::EMPTY_BOARD; Square::COUNT];

    let mut i = 0;
    while i < Square::COUNT {
        let square = Square::from_index_unchecked(i);
        let mut movement = Bitboard::EMPTY_BOARD;

        let mut j = 0;
        while j < deltas.len() {
            let (df, dr) = deltas[j];
            if let Some(shifted) = square.offset(df, dr) {
                movement = movement.or(shifted.bitboard());
            }
            j += 1;
        }

        mobility[i] = movement;
        i += 1;
    }

    mobility
}

/// Pawns capture one step diagonally forward.
const fn generate_pawn_attacks(color: Color) -> [Bitboard; Square::COUNT] {
    let forward = color.forward();
    generate_leaper_mobility(&[(-1, forward), (1, forward)])
}
