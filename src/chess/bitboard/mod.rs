//! Provides a representation of sets of squares
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryInto;
use std::iter::FusedIterator;
use std::iter::{FromIterator, Extend};
use std::ops;
use std::fmt;
use log::warn;
use super::*;

pub mod cache;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A set of squares with each bit representing one square
///
/// Bit `i` stands for the square with index `i`, so `A1` is the least significant bit and `H8`
/// the most significant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    /// Creates a new, empty bitboard
    pub fn new() -> Bitboard {
        Default::default()
    }

    /// Returns the raw bits
    pub fn bits(self) -> u64 {
        self.0
    }

    /// Returns the number of squares in the bitboard
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the bitboard is empty
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the bitboard contains `sq`
    pub fn contains(self, sq: Square) -> bool {
        !(self & sq.into()).is_empty()
    }

    /// Returns `true` if `self` intersects `other`
    pub fn intersects(self, other: Bitboard) -> bool {
        !(self & other).is_empty()
    }

    /// Returns `true` if `self` does not intersect `other`
    pub fn is_disjoint(self, other: Bitboard) -> bool {
        (self & other).is_empty()
    }

    /// Adds a square to the bitboard if it is not already present
    pub fn insert(&mut self, sq: Square) {
        *self |= sq.into();
    }

    /// Removes a square from the bitboard if it is present
    pub fn remove(&mut self, sq: Square) {
        *self &= !Bitboard::from(sq);
    }

    /// Removes the lowest square from the bitboard and returns it
    pub fn pop(&mut self) -> Option<Square> {
        if self.0 > 0 {
            // get the least significant bit
            let sq: Square = (self.0.trailing_zeros() as usize).try_into().expect("INFALLIBLE");
            // clear the least significant bit
            self.0 &= self.0 - 1;

            Some(sq)
        } else {
            None
        }
    }

    /// Returns the square that would be removed by a pop command
    pub fn peek(self) -> Option<Square> {
        if self.0 > 0 {
            Some((self.0.trailing_zeros() as usize).try_into().expect("INFALLIBLE"))
        } else {
            None
        }
    }

    /// Returns the highest square in the bitboard
    pub fn peek_last(self) -> Option<Square> {
        if self.0 > 0 {
            Some((63 - self.0.leading_zeros() as usize).try_into().expect("INFALLIBLE"))
        } else {
            None
        }
    }

    /// Toggles a square in the bitboard
    pub fn toggle(&mut self, sq: Square) {
        *self ^= sq.into();
    }

    /// Returns a bitboard with only the bit at `index` set, or an empty bitboard if `index` is
    /// not in `0..64`.
    pub fn from_index(index: i32) -> Bitboard {
        match Square::from_index(index) {
            Some(sq) => sq.into(),
            None => Bitboard::new(),
        }
    }

    /// Returns the index of the least significant set bit, or `-1` if the bitboard is empty.
    pub fn lsb_index(self) -> i32 {
        self.peek().map_or(-1, |sq| sq as i32)
    }

    /// Returns the index of the most significant set bit, or `-1` if the bitboard is empty.
    pub fn msb_index(self) -> i32 {
        self.peek_last().map_or(-1, |sq| sq as i32)
    }

    /// Returns `true` if the bit at `index` is set. Out-of-range indexes are never set.
    pub fn is_set(self, index: i32) -> bool {
        match Square::from_index(index) {
            Some(sq) => self.contains(sq),
            None => {
                warn!("bit index {} is out of range", index);
                false
            }
        }
    }

    /// Sets the bit at `index`. Out-of-range indexes leave the bitboard unchanged.
    pub fn set(&mut self, index: i32) {
        match Square::from_index(index) {
            Some(sq) => self.insert(sq),
            None => warn!("bit index {} is out of range", index),
        }
    }

    /// Clears the bit at `index`. Out-of-range indexes leave the bitboard unchanged.
    pub fn clear(&mut self, index: i32) {
        match Square::from_index(index) {
            Some(sq) => self.remove(sq),
            None => warn!("bit index {} is out of range", index),
        }
    }

    /// Returns the indexes of the set bits in ascending order
    pub fn indexes(self) -> Vec<i32> {
        self.into_iter().map(|sq| sq as i32).collect()
    }

    /// Returns the full diagonal (`a1`-`h8` direction) through `sq`
    pub fn diagonal(sq: Square) -> Bitboard {
        let diff = sq.rank() as i8 - sq.file() as i8;
        Square::all()
            .filter(|s| s.rank() as i8 - s.file() as i8 == diff)
            .collect()
    }

    /// Returns the full anti-diagonal (`a8`-`h1` direction) through `sq`
    pub fn anti_diagonal(sq: Square) -> Bitboard {
        let sum = sq.rank() as usize + sq.file() as usize;
        Square::all()
            .filter(|s| s.rank() as usize + s.file() as usize == sum)
            .collect()
    }
}

impl ops::Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl ops::BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl ops::BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl ops::BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0
    }
}

impl fmt::Display for Bitboard {
    /// Writes the bitboard as lowercase hex, or with `{:#}` as an 8x8 grid of `1`s and `0`s with
    /// rank 8 at the top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            for r in (0..Rank::COUNT).rev() {
                write!(f, "{} ", r + 1)?;
                for file in 0..File::COUNT {
                    let sq = Square::from_coord(
                        file.try_into().expect("INFALLIBLE"),
                        r.try_into().expect("INFALLIBLE"),
                    );
                    f.write_str(if self.contains(sq) { "1 " } else { "0 " })?;
                }
                f.write_str("\n")?;
            }
            f.write_str("  a b c d e f g h")
        } else {
            fmt::LowerHex::fmt(&self.0, f)
        }
    }
}

impl fmt::UpperHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Binary for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

impl From<u64> for Bitboard {
    fn from(val: u64) -> Bitboard {
        Bitboard(val)
    }
}

impl From<Bitboard> for u64 {
    fn from(bd: Bitboard) -> u64 {
        bd.0
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Bitboard {
        Bitboard(1 << sq as u64)
    }
}

impl From<File> for Bitboard {
    fn from(f: File) -> Bitboard {
        Bitboard(0x0101_0101_0101_0101 << f as u64)
    }
}

impl From<Rank> for Bitboard {
    fn from(r: Rank) -> Bitboard {
        Bitboard(0x0000_0000_0000_00ff << (8 * r as u64))
    }
}

impl From<IntoIter> for Bitboard {
    fn from(iter: IntoIter) -> Bitboard {
        iter.0
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    /// If converting from `bitboard::IntoIter`, use `Bitboard::from()` instead as that is faster
    fn from_iter<I: IntoIterator<Item=Square>>(iter: I) -> Self {
        let mut bd = Bitboard::new();

        for sq in iter {
            bd.insert(sq);
        }

        bd
    }
}

impl Extend<Square> for Bitboard {
    fn extend<I: IntoIterator<Item=Square>>(&mut self, iter: I) {
        for sq in iter {
            self.insert(sq);
        }
    }
}

/// Iterator over the squares of a `Bitboard`, from lowest to highest index
#[derive(Debug, Copy, Clone)]
pub struct IntoIter(Bitboard);

impl Iterator for IntoIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for IntoIter {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl FusedIterator for IntoIter { }
