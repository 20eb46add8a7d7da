//! Reading and writing positions in Forsyth-Edwards Notation
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryInto;
use std::result::Result;
use super::*;

/// The standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parse a position from a FEN string.
    ///
    /// Only the piece placement and side to move are required. Missing castling and en-passant
    /// fields mean none, and missing counters default to `0` and `1`. A letter that doesn't name
    /// a piece leaves its square empty but still takes up a file.
    pub fn from_fen_str(s: &str) -> Result<Position, ParseFenError> {
        use ParseFenError::*;

        let mut pos = Position::empty();
        let mut fields = s.trim().split_whitespace();

        // parse the board
        if let Some(board) = fields.next() {
            let mut r = Rank::COUNT - 1;
            let mut f = 0;
            for c in board.chars() {
                match c {
                    '1'..='8' => {
                        f += c.to_digit(10).expect("INFALLIBLE") as usize;
                        if f > File::COUNT {
                            return Err(ParseBoard);
                        }
                    }
                    '/' => {
                        if f == File::COUNT && r > 0 {
                            r -= 1;
                            f = 0;
                        } else {
                            return Err(ParseBoard);
                        }
                    }
                    _ if c.is_ascii_digit() || c.is_whitespace() => return Err(ParseBoard),
                    _ => {
                        let sq = match (f.try_into(), r.try_into()) {
                            (Ok(f), Ok(r)) => Square::from_coord(f, r),
                            _ => return Err(ParseBoard),
                        };
                        pos.put(sq, PieceCode::from_fen_char(c));
                        f += 1;
                    }
                }
            }
            if r > 0 || f < File::COUNT {
                return Err(ParseBoard);
            }
        } else {
            return Err(Empty);
        }

        // parse the turn
        match fields.next() {
            Some(turn) => pos.turn = turn.parse()?,
            None => return Err(ParseTurn),
        }

        // parse the castling flags, if present
        match fields.next() {
            Some("-") | None => {},
            Some(castling_flags) => {
                for c in castling_flags.chars() {
                    match c {
                        'K' => pos.castling_rights[White as usize] |= CASTLE_KING_SIDE,
                        'Q' => pos.castling_rights[White as usize] |= CASTLE_QUEEN_SIDE,
                        'k' => pos.castling_rights[Black as usize] |= CASTLE_KING_SIDE,
                        'q' => pos.castling_rights[Black as usize] |= CASTLE_QUEEN_SIDE,
                        _ => return Err(ParseCastling),
                    }
                }
            },
        }

        // parse en passant square, if present
        match fields.next() {
            Some("-") | None => {},
            Some(ep_square) => pos.ep_square = Some(ep_square.parse()?),
        }

        // parse half move clock, if present
        if let Some(plies) = fields.next() {
            match plies.parse() {
                Ok(plies) => pos.halfmove_clock = plies,
                Err(_) => return Err(ParseHalfMoveClock),
            }
        }

        // parse move number, if present
        if let Some(move_num) = fields.next() {
            match move_num.parse() {
                Ok(move_num) => pos.fullmove_number = move_num,
                Err(_) => return Err(ParseMoveNumber),
            }
        }

        Ok(pos)
    }

    /// Replaces the whole position with the one described by `fen`. On error `self` is left as
    /// it was.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), ParseFenError> {
        *self = Position::from_fen_str(fen)?;
        Ok(())
    }

    /// Converts the position to a FEN string
    pub fn to_fen_str(&self) -> String {
        // the board
        let mut board = String::new();
        for r in (0..Rank::COUNT).rev() {
            let mut count = 0;
            for code in self.board[r * File::COUNT..(r + 1) * File::COUNT].iter() {
                if code.is_empty() {
                    count += 1;
                } else {
                    if count > 0 {
                        board += &count.to_string();
                        count = 0;
                    }
                    board.push(code.to_fen_char());
                }
            }
            if count > 0 {
                board += &count.to_string();
            }
            if r > 0 {
                board += "/";
            }
        }

        // castling rights
        let mut castling = String::new();
        for &(color, king_side, queen_side) in [(White, 'K', 'Q'), (Black, 'k', 'q')].iter() {
            if self.can_castle_king_side(color) {
                castling.push(king_side);
            }
            if self.can_castle_queen_side(color) {
                castling.push(queen_side);
            }
        }
        if castling.is_empty() {
            castling += "-";
        }

        // en passant square
        let ep_square = match self.ep_square {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!("{} {} {} {} {} {}", board, self.turn, castling, ep_square,
                                     self.halfmove_clock, self.fullmove_number)
    }
}
