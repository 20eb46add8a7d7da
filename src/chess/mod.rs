//! The `chess` module provides a bitboard board representation and a pseudo-legal move generator.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::ops;
use std::fmt;
use std::mem;
use std::str::FromStr;
use std::convert::TryFrom;
use error::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which side a piece or player is on, based on the color of the pieces for that side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The number of colors
    pub const COUNT: usize = 2;

    /// Returns `1` for `White` and `-1` for `Black`: the rank direction its pawns advance in
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Returns the rank the color's pawns start on
    pub fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::R2,
            Color::Black => Rank::R7,
        }
    }

    /// Returns the rank on which the color's pawns promote
    pub fn promotion_rank(self) -> Rank {
        match self {
            Color::White => Rank::R8,
            Color::Black => Rank::R1,
        }
    }
}

impl ops::Not for Color {
    type Output = Color;

    /// Returns the opposite color
    ///
    /// # Example
    /// ```
    /// use chesscore::chess::Color;
    /// assert_eq!(!Color::White, Color::Black);
    /// assert_eq!(!Color::Black, Color::White);
    /// ```
    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => 'w'.fmt(f),
            Color::Black => 'b'.fmt(f),
        }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "w" => Ok(Color::White),
            "b" => Ok(Color::Black),
            _   => Err(ParseColorError),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::White
    }
}

impl TryFrom<usize> for Color {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> std::result::Result<Self, Self::Error> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Color>(value as u8)) }
        } else {
            Err(TryFromIntError)
        }
    }
}

impl From<Color> for usize {
    fn from(value: Color) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The type of a chess piece
///
/// The order matches the order of the per-type bitboards in a `Position`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// The number of piece types
    pub const COUNT: usize = Piece::King as usize + 1;

    /// All piece types, in bitboard order
    pub const ALL: [Piece; Piece::COUNT] =
        [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King];

    /// Returns `true` for bishops, rooks and queens
    pub fn is_sliding(self) -> bool {
        match self {
            Piece::Bishop | Piece::Rook | Piece::Queen => true,
            _ => false,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Piece::Pawn => "P",
            Piece::Knight => "N",
            Piece::Bishop => "B",
            Piece::Rook => "R",
            Piece::Queen => "Q",
            Piece::King => "K",
        }.fmt(f)
    }
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "P"|"p" => Ok(Piece::Pawn),
            "N"|"n" => Ok(Piece::Knight),
            "B"|"b" => Ok(Piece::Bishop),
            "R"|"r" => Ok(Piece::Rook),
            "Q"|"q" => Ok(Piece::Queen),
            "K"|"k" => Ok(Piece::King),
            _       => Err(ParsePieceError),
        }
    }
}

impl Default for Piece {
    fn default() -> Self {
        Piece::Pawn
    }
}

impl TryFrom<usize> for Piece {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> std::result::Result<Self, Self::Error> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Piece>(value as u8)) }
        } else {
            Err(TryFromIntError)
        }
    }
}

impl From<Piece> for usize {
    fn from(value: Piece) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Vertical column of the board, labeled from left to right from `White`'s perspective as
/// `A` through `H`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum File {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    A = 0, B = 1, C = 2, D = 3, E = 4, F = 5, G = 6, H = 7,
}

impl File {
    /// The number of files
    pub const COUNT: usize = File::H as usize + 1;
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ((b'a' + *self as u8) as char).fmt(f)
    }
}

impl FromStr for File {
    type Err = ParseFileError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.as_bytes() {
            [c @ b'a'..=b'h'] => File::try_from((c - b'a') as usize).map_err(|_| ParseFileError),
            [c @ b'A'..=b'H'] => File::try_from((c - b'A') as usize).map_err(|_| ParseFileError),
            _ => Err(ParseFileError),
        }
    }
}

impl Default for File {
    fn default() -> Self {
        File::A
    }
}

impl TryFrom<usize> for File {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> std::result::Result<Self, Self::Error> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, File>(value as u8)) }
        } else {
            Err(TryFromIntError)
        }
    }
}

impl From<File> for usize {
    fn from(value: File) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Horizontal row of the board, labeled from nearest to farthest from `White`'s perspective
/// as `R1` through `R8`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Rank {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    R1 = 0, R2 = 1, R3 = 2, R4 = 3, R5 = 4, R6 = 5, R7 = 6, R8 = 7,
}

impl Rank {
    /// The number of ranks
    pub const COUNT: usize = Rank::R8 as usize + 1;
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ((b'1' + *self as u8) as char).fmt(f)
    }
}

impl FromStr for Rank {
    type Err = ParseRankError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.as_bytes() {
            [c @ b'1'..=b'8'] => Rank::try_from((c - b'1') as usize).map_err(|_| ParseRankError),
            _ => Err(ParseRankError),
        }
    }
}

impl Default for Rank {
    fn default() -> Self {
        Rank::R1
    }
}

impl TryFrom<usize> for Rank {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> std::result::Result<Self, Self::Error> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Rank>(value as u8)) }
        } else {
            Err(TryFromIntError)
        }
    }
}

impl From<Rank> for usize {
    fn from(value: Rank) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A specific square on the board, labeled using the `File` and `Rank` as coordinates.
///
/// Squares are numbered rank by rank from `White`'s side: `A1` is 0, `H1` is 7, `A2` is 8 and
/// `H8` is 63, so that `file = index % 8` and `rank = index / 8`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Square {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    A1 = 0o00, B1 = 0o01, C1 = 0o02, D1 = 0o03, E1 = 0o04, F1 = 0o05, G1 = 0o06, H1 = 0o07,
    A2 = 0o10, B2 = 0o11, C2 = 0o12, D2 = 0o13, E2 = 0o14, F2 = 0o15, G2 = 0o16, H2 = 0o17,
    A3 = 0o20, B3 = 0o21, C3 = 0o22, D3 = 0o23, E3 = 0o24, F3 = 0o25, G3 = 0o26, H3 = 0o27,
    A4 = 0o30, B4 = 0o31, C4 = 0o32, D4 = 0o33, E4 = 0o34, F4 = 0o35, G4 = 0o36, H4 = 0o37,
    A5 = 0o40, B5 = 0o41, C5 = 0o42, D5 = 0o43, E5 = 0o44, F5 = 0o45, G5 = 0o46, H5 = 0o47,
    A6 = 0o50, B6 = 0o51, C6 = 0o52, D6 = 0o53, E6 = 0o54, F6 = 0o55, G6 = 0o56, H6 = 0o57,
    A7 = 0o60, B7 = 0o61, C7 = 0o62, D7 = 0o63, E7 = 0o64, F7 = 0o65, G7 = 0o66, H7 = 0o67,
    A8 = 0o70, B8 = 0o71, C8 = 0o72, D8 = 0o73, E8 = 0o74, F8 = 0o75, G8 = 0o76, H8 = 0o77,
}

impl Square {
    /// The number of squares
    pub const COUNT: usize = Square::H8 as usize + 1;

    /// Returns a square from its file and rank
    pub fn from_coord(file: File, rank: Rank) -> Square {
        Square::try_from(((rank as usize) << 3) + file as usize).expect("INFALLIBLE")
    }

    /// Returns the square's file
    pub fn file(self) -> File {
        File::try_from((self as usize) & 7).expect("INFALLIBLE")
    }

    /// Returns the square's rank
    pub fn rank(self) -> Rank {
        Rank::try_from((self as usize) >> 3).expect("INFALLIBLE")
    }

    /// Returns the square `files` to the right and `ranks` up from `self`, or `None` if that
    /// would leave the board.
    pub fn offset(self, files: i8, ranks: i8) -> Option<Square> {
        let f = self.file() as i8 + files;
        let r = self.rank() as i8 + ranks;

        if (0..8).contains(&f) && (0..8).contains(&r) {
            Some(Square::try_from(((r as usize) << 3) + f as usize).expect("INFALLIBLE"))
        } else {
            None
        }
    }

    /// Returns the square for a raw index, or `None` if the index is not in `0..64`
    pub fn from_index(index: i32) -> Option<Square> {
        if index >= 0 {
            Square::try_from(index as usize).ok()
        } else {
            None
        }
    }

    /// Returns an iterator over all 64 squares in index order
    pub fn all() -> impl Iterator<Item = Square> + Clone {
        (0..Square::COUNT).map(|i| Square::try_from(i).expect("INFALLIBLE"))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.file().to_string() + &self.rank().to_string()).fmt(f)
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.len() == 2 && s.is_char_boundary(1) {
            Ok(Square::from_coord(s[..1].parse()?, s[1..].parse()?))
        } else {
            Err(ParseSquareError)
        }
    }
}

impl Default for Square {
    fn default() -> Self {
        Square::A1
    }
}

impl TryFrom<usize> for Square {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> std::result::Result<Self, Self::Error> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Square>(value as u8)) }
        } else {
            Err(TryFromIntError)
        }
    }
}

impl From<Square> for usize {
    fn from(value: Square) -> Self {
        value as Self
    }
}

/// Converts a raw square index to algebraic notation, or `"??"` if it is not in `0..64`.
///
/// # Example
/// ```
/// use chesscore::chess::index_to_coordinate;
/// assert_eq!(index_to_coordinate(28), "e4");
/// assert_eq!(index_to_coordinate(-1), "??");
/// ```
pub fn index_to_coordinate(index: i32) -> String {
    match Square::from_index(index) {
        Some(sq) => sq.to_string(),
        None => "??".to_owned(),
    }
}

/// Converts algebraic notation to a raw square index, or `-1` if it isn't a valid square.
///
/// # Example
/// ```
/// use chesscore::chess::coordinate_to_index;
/// assert_eq!(coordinate_to_index("e4"), 28);
/// assert_eq!(coordinate_to_index("??"), -1);
/// ```
pub fn coordinate_to_index(coord: &str) -> i32 {
    match coord.parse::<Square>() {
        Ok(sq) => sq as i32,
        Err(_) => -1,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
pub mod bitboard;
pub mod piece;
pub mod moves;
mod position;
pub use position::Position;
pub use position::fen::START_FEN;
pub use piece::PieceCode;
pub use moves::{Move, MoveFlags, Promotion};
pub use bitboard::Bitboard;
pub use bitboard::cache::{AttackCache, Direction};

pub mod movegen;
pub use movegen::{MoveGenerator, PromotionMode};

pub mod game;
pub use game::Game;

pub mod variations;

pub mod error;


#[cfg(test)]
mod piece_tests {
    use std::convert::TryFrom;
    use super::Piece;

    #[test]
    fn fromstr_accepts_both_cases() {
        for (i, s) in ["p", "n", "b", "r", "q", "k"].iter().enumerate() {
            let piece = Piece::try_from(i).unwrap();
            assert_eq!(s.parse::<Piece>().unwrap(), piece);
            assert_eq!(s.to_uppercase().parse::<Piece>().unwrap(), piece);
            assert_eq!(piece.to_string(), s.to_uppercase());
        }
        assert!("x".parse::<Piece>().is_err());
        assert!(Piece::try_from(6).is_err());
    }

    #[test]
    fn only_bishops_rooks_and_queens_slide() {
        let sliding: Vec<_> = Piece::ALL.iter().filter(|p| p.is_sliding()).collect();
        assert_eq!(sliding, vec![&Piece::Bishop, &Piece::Rook, &Piece::Queen]);
    }
}

#[cfg(test)]
mod square_tests {
    use std::convert::TryFrom;
    use super::*;

    #[test]
    fn squares_are_numbered_rank_by_rank() {
        assert_eq!(Square::A1 as usize, 0);
        assert_eq!(Square::H1 as usize, 7);
        assert_eq!(Square::A2 as usize, 8);
        assert_eq!(Square::E4 as usize, 28);
        assert_eq!(Square::H8 as usize, 63);
    }

    #[test]
    fn file_and_rank_methods_match_from_coord() {
        for sq in Square::all() {
            assert_eq!(Square::from_coord(sq.file(), sq.rank()), sq);
            assert_eq!(sq.file() as usize, sq as usize % 8);
            assert_eq!(sq.rank() as usize, sq as usize / 8);
        }
    }

    #[test]
    fn display_and_fromstr_agree() {
        for sq in Square::all() {
            assert_eq!(format!("{}", sq).parse::<Square>().unwrap(), sq);
        }
        assert_eq!(Square::E4.to_string(), "e4");
        assert_eq!("D6".parse::<Square>().unwrap(), Square::D6);
    }

    #[test]
    fn fromstr_trait_produces_errors_when_it_should() {
        assert!("a".parse::<Square>().is_err());
        assert!("ax".parse::<Square>().is_err());
        assert!("x1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a1x".parse::<Square>().is_err());
        assert!("é".parse::<Square>().is_err());
    }

    #[test]
    fn offset_stays_on_the_board() {
        assert_eq!(Square::A1.offset(1, 2), Some(Square::B3));
        assert_eq!(Square::H4.offset(1, 0), None);
        assert_eq!(Square::A4.offset(-1, 0), None);
        assert_eq!(Square::E8.offset(0, 1), None);
    }

    #[test]
    fn out_of_bound_usize_conversion_is_an_error() {
        assert!(Square::try_from(Square::COUNT).is_err());
        assert_eq!(Square::from_index(-1), None);
        assert_eq!(Square::from_index(64), None);
    }

    #[test]
    fn coordinate_sentinels() {
        assert_eq!(index_to_coordinate(-1), "??");
        assert_eq!(index_to_coordinate(64), "??");
        assert_eq!(index_to_coordinate(0), "a1");
        assert_eq!(index_to_coordinate(63), "h8");
        assert_eq!(coordinate_to_index("??"), -1);
        assert_eq!(coordinate_to_index("e"), -1);
        assert_eq!(coordinate_to_index("i1"), -1);
        assert_eq!(coordinate_to_index("h8"), 63);
    }
}
