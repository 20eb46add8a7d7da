//! Defines the error types needed by the chess module
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error type used by methods in the `chess` module
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cannot parse string
    ParseError,
    /// Failed to convert an integer to an another type
    TryFromIntError,
    /// The move is not in the list of generated moves
    IllegalMove,
    /// No position has been loaded
    MissingPosition,
    /// The attack cache failed its self-check while being built
    CacheConstruction,
    /// The bitboards, mailbox and king squares of a position disagree
    InconsistentPosition,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match self {
            ParseError => "cannot parse string",
            TryFromIntError => "integer out of range",
            IllegalMove => "illegal move",
            MissingPosition => "no position has been loaded",
            CacheConstruction => "attack cache failed to build",
            InconsistentPosition => "bitboards and board array disagree",
        }.fmt(f)
    }
}

impl std::error::Error for Error { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Result type used by methods in the `chess` module
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error converting an integer to an enum such as `Square` or `Color`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TryFromIntError;

impl fmt::Display for TryFromIntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "integer out of range".fmt(f)
    }
}

impl std::error::Error for TryFromIntError { }

impl From<TryFromIntError> for Error {
    fn from(_: TryFromIntError) -> Self {
        Error::TryFromIntError
    }
}

macro_rules! parse_error {
    ($name:ident, $what:expr) => {
        #[doc = concat!("Error parsing a ", $what)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        pub struct $name;

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "cannot parse {}", $what)
            }
        }

        impl std::error::Error for $name { }

        impl From<$name> for Error {
            fn from(_: $name) -> Self {
                Error::ParseError
            }
        }
    };
}

parse_error!(ParseColorError, "color");
parse_error!(ParsePieceError, "piece");
parse_error!(ParseFileError, "file");
parse_error!(ParseRankError, "rank");
parse_error!(ParseSquareError, "square");
parse_error!(ParseMoveError, "move");

impl From<ParseFileError> for ParseSquareError {
    fn from(_: ParseFileError) -> Self {
        ParseSquareError
    }
}

impl From<ParseRankError> for ParseSquareError {
    fn from(_: ParseRankError) -> Self {
        ParseSquareError
    }
}

impl From<ParseSquareError> for ParseMoveError {
    fn from(_: ParseSquareError) -> Self {
        ParseMoveError
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error parsing a position from Forsyth-Edwards Notation
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseFenError {
    /// The string contains no fields
    Empty,
    /// The piece placement field is malformed
    ParseBoard,
    /// The side-to-move field is missing or malformed
    ParseTurn,
    /// The castling field is malformed
    ParseCastling,
    /// The en-passant field is not `-` or a square
    ParseEnPassant,
    /// The halfmove clock is not a non-negative integer
    ParseHalfMoveClock,
    /// The fullmove number is not a non-negative integer
    ParseMoveNumber,
}

impl fmt::Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseFenError::*;

        match self {
            Empty => "empty FEN string",
            ParseBoard => "invalid piece placement in FEN string",
            ParseTurn => "invalid side to move in FEN string",
            ParseCastling => "invalid castling flags in FEN string",
            ParseEnPassant => "invalid en-passant square in FEN string",
            ParseHalfMoveClock => "invalid halfmove clock in FEN string",
            ParseMoveNumber => "invalid fullmove number in FEN string",
        }.fmt(f)
    }
}

impl std::error::Error for ParseFenError { }

impl From<ParseColorError> for ParseFenError {
    fn from(_: ParseColorError) -> Self {
        ParseFenError::ParseTurn
    }
}

impl From<ParseSquareError> for ParseFenError {
    fn from(_: ParseSquareError) -> Self {
        ParseFenError::ParseEnPassant
    }
}

impl From<ParseFenError> for Error {
    fn from(_: ParseFenError) -> Self {
        Error::ParseError
    }
}
