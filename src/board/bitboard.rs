/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not};

use super::{File, Rank, Square};

/// A set of squares, stored as one bit per square.
///
/// Bit `i` corresponds to the [`Square`] with index `i`, so `a1` is the least-significant bit
/// and `h8` the most-significant.
///
/// The board itself is stored as a grid (see [`crate::Board`]); bitboards are only used to
/// collect attack sets and masks, where set operations are convenient.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY_BOARD: Self = Self(0);

    /// Constructs a [`Bitboard`] containing only `square`.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Bitboard, Square};
    /// let board = Bitboard::from_square(Square::H8);
    /// assert_eq!(board.inner(), 0x8000000000000000);
    /// ```
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.index())
    }

    /// Fetches the raw bits of this [`Bitboard`].
    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Const-friendly union, for building tables at compile time.
    #[inline(always)]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if `square` is a member of this set.
    #[inline(always)]
    pub const fn contains(&self, square: Square) -> bool {
        self.0 & (1 << square.index()) != 0
    }

    /// Returns `true` if `self` and `other` share at least one square.
    #[inline(always)]
    pub const fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Adds `square` to this set.
    #[inline(always)]
    pub fn set(&mut self, square: Square) {
        self.0 |= 1 << square.index();
    }

    /// Removes `square` from this set.
    #[inline(always)]
    pub fn clear(&mut self, square: Square) {
        self.0 &= !(1 << square.index());
    }

    /// Number of squares in this set.
    #[inline(always)]
    pub const fn population(&self) -> u32 {
        self.0.count_ones()
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Removes and returns the lowest square in this set, if there is one.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        if self.is_empty() {
            return None;
        }

        let square = Square::from_index_unchecked(self.0.trailing_zeros() as usize);
        self.0 &= self.0 - 1;
        Some(square)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), |mut bb, sq| {
            bb.set(sq);
            bb
        })
    }
}

macro_rules! impl_bitwise_op {
    ($op:tt, $op_assign:tt, $func:ident, $func_assign:ident) => {
        impl std::ops::$op for Bitboard {
            type Output = Self;
            #[inline(always)]
            fn $func(self, rhs: Self) -> Self::Output {
                Self(self.0.$func(rhs.0))
            }
        }

        impl std::ops::$op_assign for Bitboard {
            #[inline(always)]
            fn $func_assign(&mut self, rhs: Self) {
                self.0.$func_assign(rhs.0);
            }
        }
    };
}

impl_bitwise_op!(BitAnd, BitAndAssign, bitand, bitand_assign);
impl_bitwise_op!(BitOr, BitOrAssign, bitor, bitor_assign);

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl From<Square> for Bitboard {
    #[inline(always)]
    fn from(value: Square) -> Self {
        Self::from_square(value)
    }
}

impl fmt::Display for Bitboard {
    /// Displays the set as an 8x8 grid, rank 8 at the top, with `X` marking members.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}|")?;
            for file in File::iter() {
                let occupant = if self.contains(Square::new(file, rank)) {
                    'X'
                } else {
                    '.'
                };
                write!(f, " {occupant}")?;
            }
            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in File::iter() {
            write!(f, "--")?;
        }
        write!(f, "\n  ")?;
        for file in File::iter() {
            write!(f, " {file}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:0>16x}", self.0)
    }
}

/// An iterator over all squares in a [`Bitboard`], lowest index first.
pub struct BitboardIter {
    bitboard: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Square;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.bitboard.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bitboard.population() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: self }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut bb = Bitboard::EMPTY_BOARD;
        bb.set(Square::E4);
        bb.set(Square::A1);
        assert!(bb.contains(Square::E4));
        assert_eq!(bb.population(), 2);

        bb.clear(Square::E4);
        assert!(!bb.contains(Square::E4));
        assert_eq!(bb, Bitboard::from_square(Square::A1));
    }

    #[test]
    fn test_iteration_is_ascending() {
        let bb: Bitboard = [Square::H8, Square::A1, Square::E4].into_iter().collect();
        let squares = bb.into_iter().collect::<Vec<_>>();
        assert_eq!(squares, vec![Square::A1, Square::E4, Square::H8]);
    }

    #[test]
    fn test_display_grid() {
        let bb = Bitboard::from_square(Square::A8) | Bitboard::from_square(Square::H1);
        let rendered = bb.to_string();
        let rows = rendered.lines().collect::<Vec<_>>();
        assert_eq!(rows[0], "8| X . . . . . . .");
        assert_eq!(rows[7], "1| . . . . . . . X");
    }
}
