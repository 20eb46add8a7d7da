//! Contains the `Move` value type and its packed encoding
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use std::fmt;
use std::mem;
use std::ops;
use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which piece to promote to for a promotion move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Promotion {
    ToKnight = 1,
    ToBishop = 2,
    ToRook = 3,
    ToQueen = 4,
}

use Promotion::*;

impl Promotion {
    /// All promotions, strongest first
    pub const ALL: [Promotion; 4] = [ToQueen, ToRook, ToBishop, ToKnight];

    fn from_bits(bits: u32) -> Option<Promotion> {
        match bits {
            1 => Some(ToKnight),
            2 => Some(ToBishop),
            3 => Some(ToRook),
            4 => Some(ToQueen),
            _ => None,
        }
    }
}

impl Default for Promotion {
    fn default() -> Self {
        ToQueen
    }
}

impl From<Promotion> for Piece {
    fn from(prom: Promotion) -> Self {
        unsafe { mem::transmute::<u8, Piece>(prom as u8) }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToKnight => 'n',
            ToBishop => 'b',
            ToRook => 'r',
            ToQueen => 'q',
        }.fmt(f)
    }
}

impl FromStr for Promotion {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.parse::<Piece>()? {
            Piece::Knight => Ok(ToKnight),
            Piece::Bishop => Ok(ToBishop),
            Piece::Rook => Ok(ToRook),
            Piece::Queen => Ok(ToQueen),
            _ => Err(ParsePieceError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A set of flags describing a move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags(u8);

impl MoveFlags {
    /// No flags
    pub const NONE: MoveFlags = MoveFlags(0);
    /// The move captures a piece on its destination square
    pub const CAPTURE: MoveFlags = MoveFlags(1 << 0);
    /// A pawn advancing two squares
    pub const PAWN_DOUBLE_PUSH: MoveFlags = MoveFlags(1 << 1);
    /// An en-passant capture
    pub const EN_PASSANT: MoveFlags = MoveFlags(1 << 2);
    /// A pawn promotion
    pub const PROMOTION: MoveFlags = MoveFlags(1 << 3);
    /// Castling on the king's side
    pub const KING_SIDE_CASTLE: MoveFlags = MoveFlags(1 << 4);
    /// Castling on the queen's side
    pub const QUEEN_SIDE_CASTLE: MoveFlags = MoveFlags(1 << 5);
    /// The move gives check
    pub const CHECK: MoveFlags = MoveFlags(1 << 6);
    /// The move gives checkmate
    pub const CHECKMATE: MoveFlags = MoveFlags(1 << 7);

    /// Returns `true` if every flag in `other` is set in `self`
    pub fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no flags are set
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the raw flag bits
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns the flags for the raw bits
    pub fn from_bits(bits: u8) -> MoveFlags {
        MoveFlags(bits)
    }
}

impl ops::BitOr for MoveFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        MoveFlags(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for MoveFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl ops::BitAnd for MoveFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        MoveFlags(self.0 & rhs.0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move from one square to another.
///
/// Moves are plain values and are not tied to a position. Two moves describe the same choice if
/// they render to the same text; see `Move::matches()`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
    captured: Option<Piece>,
    flags: MoveFlags,
}

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 6;
const PROMOTION_SHIFT: u32 = 12;
const CAPTURED_SHIFT: u32 = 15;
const FLAGS_SHIFT: u32 = 20;

const SQUARE_MASK: u32 = 0x3f;
const PROMOTION_MASK: u32 = 0x7;
const CAPTURED_MASK: u32 = 0x1f;
const FLAGS_MASK: u32 = 0xff;

impl Move {
    /// A move with no flags
    pub fn new(from: Square, to: Square) -> Move {
        Move::with_flags(from, to, MoveFlags::NONE)
    }

    /// A move with the given flags
    pub fn with_flags(from: Square, to: Square, flags: MoveFlags) -> Move {
        Move { from, to, promotion: None, captured: None, flags }
    }

    /// A move with the given flags and promotion piece
    pub fn with_promotion(from: Square, to: Square, flags: MoveFlags, promotion: Promotion)
        -> Move
    {
        Move { from, to, promotion: Some(promotion), captured: None, flags }
    }

    /// A capture of `captured`, with an optional promotion
    pub fn with_capture(
        from: Square,
        to: Square,
        flags: MoveFlags,
        captured: Piece,
        promotion: Option<Promotion>,
    ) -> Move {
        Move { from, to, promotion, captured: Some(captured), flags }
    }

    /// The square the piece moves from
    pub fn origin(&self) -> Square {
        self.from
    }

    /// The square the piece moves to
    pub fn destination(&self) -> Square {
        self.to
    }

    /// The piece a pawn is promoted to, if any
    pub fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    /// The type of the captured piece, if recorded
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// The move's flags
    pub fn flags(&self) -> MoveFlags {
        self.flags
    }

    /// Returns `true` if all of `flags` are set
    pub fn has_flag(&self, flags: MoveFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Returns `true` for ordinary captures and en-passant captures
    pub fn is_capture(&self) -> bool {
        self.has_flag(MoveFlags::CAPTURE) || self.has_flag(MoveFlags::EN_PASSANT)
    }

    /// Returns `true` for castling, en passant, promotion and two-square pawn advances
    pub fn is_special(&self) -> bool {
        self.has_flag(MoveFlags::KING_SIDE_CASTLE)
            || self.has_flag(MoveFlags::QUEEN_SIDE_CASTLE)
            || self.has_flag(MoveFlags::EN_PASSANT)
            || self.has_flag(MoveFlags::PROMOTION)
            || self.has_flag(MoveFlags::PAWN_DOUBLE_PUSH)
    }

    /// Returns `true` if both moves have the same text representation
    pub fn matches(&self, other: &Move) -> bool {
        self.to_string() == other.to_string()
    }

    /// Packs the move into an integer.
    ///
    /// Bits 0-5 hold the origin, 6-11 the destination, 12-14 the promotion (0 for none, 1 to 4
    /// for knight through queen), 15-19 the captured piece (0 for none, 1 to 6 for pawn through
    /// king) and 20-27 the flags.
    ///
    /// The flag field is eight bits wide rather than the usual four. Four bits only hold capture,
    /// double push, en passant and promotion; the castling, check and checkmate flags need the
    /// upper four.
    pub fn to_packed(&self) -> u32 {
        let promotion = self.promotion.map_or(0, |p| p as u32);
        let captured = self.captured.map_or(0, |p| p as u32 + 1);

        (self.from as u32) << FROM_SHIFT
            | (self.to as u32) << TO_SHIFT
            | promotion << PROMOTION_SHIFT
            | captured << CAPTURED_SHIFT
            | (self.flags.bits() as u32) << FLAGS_SHIFT
    }

    /// Unpacks a move packed by `to_packed()`. Each field is masked to its width, and promotion or
    /// capture codes outside their range decode as `None`.
    pub fn from_packed(bits: u32) -> Move {
        let square = |shift: u32| {
            Square::try_from(((bits >> shift) & SQUARE_MASK) as usize).expect("INFALLIBLE")
        };
        let captured = ((bits >> CAPTURED_SHIFT) & CAPTURED_MASK) as usize;

        Move {
            from: square(FROM_SHIFT),
            to: square(TO_SHIFT),
            promotion: Promotion::from_bits((bits >> PROMOTION_SHIFT) & PROMOTION_MASK),
            captured: captured.checked_sub(1).and_then(|p| Piece::try_from(p).ok()),
            flags: MoveFlags::from_bits(((bits >> FLAGS_SHIFT) & FLAGS_MASK) as u8),
        }
    }
}

impl fmt::Display for Move {
    /// Writes the move in coordinate notation (eg `e2e4` or `e7e8q`). The promotion letter is
    /// only written when the promotion flag is set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = self.from.to_string() + &self.to.to_string();

        if let (true, Some(prom)) = (self.has_flag(MoveFlags::PROMOTION), self.promotion) {
            s += &prom.to_string();
        }

        s.fmt(f)
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    /// Parses coordinate notation. A trailing promotion letter sets the promotion flag.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        lazy_static! {
            static ref COORD_MOVE: Regex =
                Regex::new(r"^([a-hA-H][1-8])([a-hA-H][1-8])([nbrqNBRQ])?$").expect("INFALLIBLE");
        }

        let caps = COORD_MOVE.captures(s.trim()).ok_or(ParseMoveError)?;
        let from = caps[1].parse::<Square>()?;
        let to = caps[2].parse::<Square>()?;

        match caps.get(3) {
            Some(prom) => {
                let prom = prom.as_str().parse::<Promotion>().map_err(|_| ParseMoveError)?;
                Ok(Move::with_promotion(from, to, MoveFlags::PROMOTION, prom))
            }
            None => Ok(Move::new(from, to)),
        }
    }
}
