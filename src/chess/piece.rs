//! Compact piece codes, as stored in a `Position`'s board array
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::convert::TryFrom;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A colored piece, or an empty square, packed into one byte.
///
/// The low six bits hold the piece type as a single set bit and the top two bits hold the color
/// as a single set bit. Zero means an empty square.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct PieceCode(u8);

impl PieceCode {
    /// An empty square
    pub const EMPTY: PieceCode = PieceCode(0);

    /// Pawn type bit
    pub const PAWN: u8 = 0b0000_0001;
    /// Knight type bit
    pub const KNIGHT: u8 = 0b0000_0010;
    /// Bishop type bit
    pub const BISHOP: u8 = 0b0000_0100;
    /// Rook type bit
    pub const ROOK: u8 = 0b0000_1000;
    /// Queen type bit
    pub const QUEEN: u8 = 0b0001_0000;
    /// King type bit
    pub const KING: u8 = 0b0010_0000;
    /// White color bit
    pub const WHITE: u8 = 0b0100_0000;
    /// Black color bit
    pub const BLACK: u8 = 0b1000_0000;

    const TYPE_MASK: u8 = 0b0011_1111;
    const COLOR_MASK: u8 = 0b1100_0000;

    /// Returns the code for a `color` `piece`
    pub fn new(color: Color, piece: Piece) -> PieceCode {
        let color_bit = match color {
            Color::White => PieceCode::WHITE,
            Color::Black => PieceCode::BLACK,
        };
        PieceCode(color_bit | 1 << piece as u8)
    }

    /// Returns the code stored as `bits`, or `None` if it isn't empty and doesn't have exactly
    /// one type bit and one color bit.
    pub fn from_bits(bits: u8) -> Option<PieceCode> {
        let code = PieceCode(bits);
        if bits == 0 || (code.piece().is_some() && code.color().is_some()) {
            Some(code)
        } else {
            None
        }
    }

    /// Returns the raw byte
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` for an empty square
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the piece type, if exactly one type bit is set
    pub fn piece(self) -> Option<Piece> {
        let t = self.0 & PieceCode::TYPE_MASK;
        if t.count_ones() == 1 {
            Piece::try_from(t.trailing_zeros() as usize).ok()
        } else {
            None
        }
    }

    /// Returns the color, if exactly one color bit is set
    pub fn color(self) -> Option<Color> {
        match self.0 & PieceCode::COLOR_MASK {
            PieceCode::WHITE => Some(Color::White),
            PieceCode::BLACK => Some(Color::Black),
            _ => None,
        }
    }

    /// Returns the color and type together, or `None` for an empty square
    pub fn unpack(self) -> Option<(Color, Piece)> {
        match (self.color(), self.piece()) {
            (Some(c), Some(p)) => Some((c, p)),
            _ => None,
        }
    }

    /// Returns `true` for bishops, rooks and queens
    pub fn is_sliding(self) -> bool {
        self.piece().map_or(false, Piece::is_sliding)
    }

    /// Returns `true` if both codes carry the same color bits
    pub fn same_color(self, other: PieceCode) -> bool {
        self.0 & PieceCode::COLOR_MASK == other.0 & PieceCode::COLOR_MASK
    }

    /// Returns `true` if both codes are colored and the colors differ
    pub fn opposite_color(self, other: PieceCode) -> bool {
        self.0 & PieceCode::COLOR_MASK != 0
            && other.0 & PieceCode::COLOR_MASK != 0
            && !self.same_color(other)
    }

    /// Returns the same piece type with the other color. Empty stays empty.
    pub fn flip_color(self) -> PieceCode {
        match self.unpack() {
            Some((c, p)) => PieceCode::new(!c, p),
            None => self,
        }
    }

    /// Returns the index of the piece's bitboard in a `Position`: `color * 6 + type`
    pub fn bitboard_index(self) -> Option<usize> {
        self.unpack().map(|(c, p)| c as usize * Piece::COUNT + p as usize)
    }

    /// Returns the code for the piece whose bitboard is at `index`
    pub fn from_bitboard_index(index: usize) -> Option<PieceCode> {
        let color = Color::try_from(index / Piece::COUNT).ok()?;
        let piece = Piece::try_from(index % Piece::COUNT).ok()?;
        Some(PieceCode::new(color, piece))
    }

    /// Returns the signed standard value: `1` to `6` for white pawn through king, negated for
    /// black, and `0` for an empty square.
    pub fn to_standard(self) -> i8 {
        match self.unpack() {
            Some((Color::White, p)) => p as i8 + 1,
            Some((Color::Black, p)) => -(p as i8 + 1),
            None => 0,
        }
    }

    /// Inverse of `to_standard()`. Values outside `-6..=6` give an empty square.
    pub fn from_standard(value: i8) -> PieceCode {
        let color = if value > 0 { Color::White } else { Color::Black };
        match value.checked_abs() {
            Some(v @ 1..=6) => {
                PieceCode::new(color, Piece::try_from(v as usize - 1).expect("INFALLIBLE"))
            }
            _ => PieceCode::EMPTY,
        }
    }

    /// Returns the code for a FEN piece letter. Any other character gives an empty square.
    pub fn from_fen_char(c: char) -> PieceCode {
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        match c.to_string().parse::<Piece>() {
            Ok(piece) => PieceCode::new(color, piece),
            Err(_) => PieceCode::EMPTY,
        }
    }

    /// Returns the FEN letter for the piece, or `'.'` for an empty square
    pub fn to_fen_char(self) -> char {
        match self.unpack() {
            Some((Color::White, p)) => p.to_string().chars().next().unwrap_or('?'),
            Some((Color::Black, p)) => p.to_string().to_lowercase().chars().next().unwrap_or('?'),
            None if self.is_empty() => '.',
            None => '?',
        }
    }
}

impl fmt::Display for PieceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_fen_char().fmt(f)
    }
}

impl From<(Color, Piece)> for PieceCode {
    fn from((color, piece): (Color, Piece)) -> PieceCode {
        PieceCode::new(color, piece)
    }
}

impl From<PieceCode> for u8 {
    fn from(code: PieceCode) -> u8 {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_bit_layout() {
        assert_eq!(PieceCode::new(Color::White, Piece::Pawn).bits(), 0b0100_0001);
        assert_eq!(PieceCode::new(Color::Black, Piece::King).bits(), 0b1010_0000);
        assert_eq!(PieceCode::new(Color::White, Piece::Queen).bits(), 64 | 16);
        assert_eq!(PieceCode::EMPTY.bits(), 0);
    }

    #[test]
    fn every_code_has_one_type_bit_and_one_color_bit() {
        for i in 0..12 {
            let code = PieceCode::from_bitboard_index(i).unwrap();
            assert_eq!((code.bits() & 0b0011_1111).count_ones(), 1);
            assert_eq!((code.bits() & 0b1100_0000).count_ones(), 1);
            assert_eq!(code.bitboard_index(), Some(i));
        }
        assert_eq!(PieceCode::from_bitboard_index(12), None);
    }

    #[test]
    fn from_bits_rejects_malformed_codes() {
        assert_eq!(PieceCode::from_bits(0), Some(PieceCode::EMPTY));
        assert!(PieceCode::from_bits(0b0100_0010).is_some());
        assert!(PieceCode::from_bits(0b0100_0011).is_none());
        assert!(PieceCode::from_bits(0b1100_0001).is_none());
        assert!(PieceCode::from_bits(0b0000_0001).is_none());
    }

    #[test]
    fn standard_values() {
        assert_eq!(PieceCode::new(Color::White, Piece::Pawn).to_standard(), 1);
        assert_eq!(PieceCode::new(Color::White, Piece::King).to_standard(), 6);
        assert_eq!(PieceCode::new(Color::Black, Piece::Knight).to_standard(), -2);
        assert_eq!(PieceCode::EMPTY.to_standard(), 0);
        for v in -6..=6 {
            assert_eq!(PieceCode::from_standard(v).to_standard(), v);
        }
        assert_eq!(PieceCode::from_standard(7), PieceCode::EMPTY);
        assert_eq!(PieceCode::from_standard(-128), PieceCode::EMPTY);
    }

    #[test]
    fn fen_characters() {
        assert_eq!(PieceCode::from_fen_char('N'), PieceCode::new(Color::White, Piece::Knight));
        assert_eq!(PieceCode::from_fen_char('q'), PieceCode::new(Color::Black, Piece::Queen));
        assert_eq!(PieceCode::from_fen_char('x'), PieceCode::EMPTY);
        assert_eq!(PieceCode::new(Color::Black, Piece::Rook).to_fen_char(), 'r');
        assert_eq!(PieceCode::new(Color::White, Piece::Bishop).to_string(), "B");
        assert_eq!(PieceCode::EMPTY.to_fen_char(), '.');
    }

    #[test]
    fn color_helpers() {
        let wp = PieceCode::new(Color::White, Piece::Pawn);
        let wk = PieceCode::new(Color::White, Piece::King);
        let bq = PieceCode::new(Color::Black, Piece::Queen);
        assert!(wp.same_color(wk));
        assert!(wp.opposite_color(bq));
        assert!(!wp.opposite_color(PieceCode::EMPTY));
        assert_eq!(bq.flip_color(), PieceCode::new(Color::White, Piece::Queen));
        assert_eq!(PieceCode::EMPTY.flip_color(), PieceCode::EMPTY);
        assert!(bq.is_sliding());
        assert!(!wk.is_sliding());
    }
}
