//! Contains structures related to the `Position`
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryInto;
use std::fmt;
use std::str::FromStr;
use super::*;

use bitboard::cache::AttackCache;

use Color::*;
use Piece::*;

pub mod fen;

const PIECE_BOARDS: usize = Color::COUNT * Piece::COUNT;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A representation of the arrangement of pieces on the board at a given point in the game, as
/// well as the side to move, castling availability, en-passant target and move counters.
///
/// Pieces are held twice: as twelve bitboards indexed by `color * 6 + piece`, and as a 64-entry
/// array of `PieceCode`s. All changes go through `put()` and `take()`, which keep the two in step
/// along with the cached king squares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pieces: [Bitboard; PIECE_BOARDS],
    board: [PieceCode; Square::COUNT],
    turn: Color,

    ep_square: Option<Square>,
    castling_rights: [u8; Color::COUNT],

    halfmove_clock: usize,
    fullmove_number: usize,

    kings: [Option<Square>; Color::COUNT],
}

const CASTLE_KING_SIDE: u8 = 0x1;
const CASTLE_QUEEN_SIDE: u8 = 0x2;

impl Position {
    /// Returns the standard starting position
    pub fn new() -> Position {
        Position::from_fen_str(fen::START_FEN).expect("INFALLIBLE")
    }

    /// Returns a position with an empty board, `White` to move and the move number set to one
    pub fn empty() -> Position {
        Position {
            pieces: [Bitboard::new(); PIECE_BOARDS],
            board: [PieceCode::EMPTY; Square::COUNT],
            turn: White,
            ep_square: None,
            castling_rights: [0, 0],
            halfmove_clock: 0,
            fullmove_number: 1,
            kings: [None, None],
        }
    }

    fn index(color: Color, piece: Piece) -> usize {
        color as usize * Piece::COUNT + piece as usize
    }

    /// Removes whatever is on `sq` from every bitboard and the board array, and returns it
    fn take(&mut self, sq: Square) -> PieceCode {
        let code = self.board[sq as usize];

        for bd in self.pieces.iter_mut() {
            bd.remove(sq);
        }
        self.board[sq as usize] = PieceCode::EMPTY;

        if let Some((c, King)) = code.unpack() {
            self.kings[c as usize] = self.pieces[Position::index(c, King)].peek();
        }

        code
    }

    /// Replaces whatever is on `sq` with `code`
    fn put(&mut self, sq: Square, code: PieceCode) {
        self.take(sq);

        if let Some((c, p)) = code.unpack() {
            self.pieces[Position::index(c, p)].insert(sq);
            self.board[sq as usize] = code;

            if p == King {
                self.kings[c as usize] = self.pieces[Position::index(c, King)].peek();
            }
        }
    }

    /// Moves the piece on `from` to `to`, replacing anything on `to`.
    ///
    /// Nothing else changes: the turn, counters and en-passant square are left alone and the move
    /// is not checked for legality. Moving from an empty square does nothing.
    pub fn move_piece(&mut self, from: Square, to: Square) {
        if from == to || self.board[from as usize].is_empty() {
            return;
        }

        let code = self.take(from);
        self.put(to, code);
    }

    /// Places `code` on `sq`, replacing anything already there. Placing `PieceCode::EMPTY`
    /// clears the square.
    pub fn place_piece(&mut self, sq: Square, code: PieceCode) {
        self.put(sq, code);
    }

    /// Removes any piece from `sq`
    pub fn clear_square(&mut self, sq: Square) {
        self.take(sq);
    }

    /// Gives the move to the other side
    pub fn switch_turn(&mut self) {
        self.turn = !self.turn;
    }

    /// Applies `mv` the way a game would: moves the piece, substitutes the promotion piece,
    /// removes a pawn captured en passant, updates the en-passant square and both counters, and
    /// gives the move to the other side.
    ///
    /// The move is not checked for legality.
    pub fn make_move(&mut self, mv: &Move) {
        let (from, to) = (mv.origin(), mv.destination());
        let mover = self.board[from as usize];
        let captured = !self.board[to as usize].is_empty() || mv.is_capture();
        let is_pawn = mover.piece() == Some(Pawn);

        self.move_piece(from, to);

        if mv.has_flag(MoveFlags::EN_PASSANT) {
            self.take(Square::from_coord(to.file(), from.rank()));
        }

        if let (true, Some(prom), Some(color)) =
            (mv.has_flag(MoveFlags::PROMOTION), mv.promotion(), mover.color())
        {
            self.put(to, PieceCode::new(color, prom.into()));
        }

        self.ep_square = if mv.has_flag(MoveFlags::PAWN_DOUBLE_PUSH) {
            let rank = (from.rank() as usize + to.rank() as usize) / 2;
            Some(Square::from_coord(from.file(), rank.try_into().expect("INFALLIBLE")))
        } else {
            None
        };

        if is_pawn || captured {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if self.turn == Black {
            self.fullmove_number += 1;
        }

        self.switch_turn();
    }

    /// Returns the color whose turn it is
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Sets the side to move
    pub fn set_turn(&mut self, color: Color) {
        self.turn = color;
    }

    /// Returns the en-passant target square, if any
    pub fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Sets the en-passant target square
    pub fn set_ep_square(&mut self, sq: Option<Square>) {
        self.ep_square = sq;
    }

    /// Returns `true` if `color` may still castle on the king's side
    pub fn can_castle_king_side(&self, color: Color) -> bool {
        self.castling_rights[color as usize] & CASTLE_KING_SIDE != 0
    }

    /// Returns `true` if `color` may still castle on the queen's side
    pub fn can_castle_queen_side(&self, color: Color) -> bool {
        self.castling_rights[color as usize] & CASTLE_QUEEN_SIDE != 0
    }

    /// Sets both castling flags for `color`
    pub fn set_castling(&mut self, color: Color, king_side: bool, queen_side: bool) {
        let mut rights = 0;
        if king_side {
            rights |= CASTLE_KING_SIDE;
        }
        if queen_side {
            rights |= CASTLE_QUEEN_SIDE;
        }
        self.castling_rights[color as usize] = rights;
    }

    /// Returns the number of plies since the last capture or pawn move
    pub fn halfmove_clock(&self) -> usize {
        self.halfmove_clock
    }

    /// Sets the halfmove clock
    pub fn set_halfmove_clock(&mut self, plies: usize) {
        self.halfmove_clock = plies;
    }

    /// Returns the full move number, starting at one and incremented after each `Black` move
    pub fn fullmove_number(&self) -> usize {
        self.fullmove_number
    }

    /// Sets the full move number
    pub fn set_fullmove_number(&mut self, n: usize) {
        self.fullmove_number = n;
    }

    /// Returns the square of `color`'s king, or `None` if it has none
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color as usize]
    }

    /// Returns the bitboard of `color`'s pieces of type `piece`
    pub fn bitboard(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[Position::index(color, piece)]
    }

    /// Returns the bitboard at `index` (`color * 6 + piece`), or an empty bitboard if the index
    /// is out of range
    pub fn bitboard_at(&self, index: usize) -> Bitboard {
        self.pieces.get(index).copied().unwrap_or_default()
    }

    /// Returns the index of the bitboard holding the piece on `sq`
    pub fn bitboard_index_at(&self, sq: Square) -> Option<usize> {
        self.pieces.iter().position(|bd| bd.contains(sq))
    }

    /// Returns all squares occupied by `color`
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        let start = color as usize * Piece::COUNT;
        self.pieces[start..start + Piece::COUNT]
            .iter()
            .fold(Bitboard::new(), |acc, &bd| acc | bd)
    }

    /// Returns all occupied squares
    pub fn occupied(&self) -> Bitboard {
        self.occupied_by(White) | self.occupied_by(Black)
    }

    /// Returns the piece on `sq`
    pub fn piece_at(&self, sq: Square) -> PieceCode {
        self.board[sq as usize]
    }

    /// Returns `true` if a white piece is on `sq`
    pub fn is_white_at(&self, sq: Square) -> bool {
        self.board[sq as usize].color() == Some(White)
    }

    /// Returns the board as 64 piece codes in square order, rebuilt from the bitboards
    pub fn board(&self) -> [u8; Square::COUNT] {
        let mut board = [0; Square::COUNT];

        for (i, &bd) in self.pieces.iter().enumerate() {
            let code = PieceCode::from_bitboard_index(i).unwrap_or_default();
            for sq in bd {
                board[sq as usize] = code.bits();
            }
        }

        board
    }

    /// Returns `true` if any piece of color `by` attacks `sq`
    pub fn is_square_attacked(&self, cache: &AttackCache, sq: Square, by: Color) -> bool {
        if cache.pawn_attacks(!by, sq).intersects(self.bitboard(by, Pawn))
            || cache.knight_attacks(sq).intersects(self.bitboard(by, Knight))
            || cache.king_attacks(sq).intersects(self.bitboard(by, King))
        {
            return true;
        }

        let occupied = self.occupied();
        let queens = self.bitboard(by, Queen);
        let diagonal = self.bitboard(by, Bishop) | queens;
        let orthogonal = self.bitboard(by, Rook) | queens;

        for &dir in Direction::ALL.iter() {
            let sliders = if dir.is_diagonal() { diagonal } else { orthogonal };
            if cache.ray(sq, dir).is_disjoint(sliders) {
                continue;
            }
            for &step in cache.path(sq, dir) {
                if step.intersects(occupied) {
                    if step.intersects(sliders) {
                        return true;
                    }
                    break;
                }
            }
        }

        false
    }

    /// Returns `true` if `color`'s king is attacked. A side without a king is never in check.
    pub fn is_in_check(&self, cache: &AttackCache, color: Color) -> bool {
        match self.king_square(color) {
            Some(sq) => self.is_square_attacked(cache, sq, !color),
            None => false,
        }
    }

    /// Checks that the bitboards, board array and king squares agree
    pub fn validate(&self) -> Result<()> {
        let mut seen = Bitboard::new();
        for &bd in self.pieces.iter() {
            if seen.intersects(bd) {
                return Err(Error::InconsistentPosition);
            }
            seen |= bd;
        }

        for sq in Square::all() {
            let expected = self.bitboard_index_at(sq)
                .and_then(PieceCode::from_bitboard_index)
                .unwrap_or_default();
            if self.board[sq as usize] != expected {
                return Err(Error::InconsistentPosition);
            }
        }

        for &c in [White, Black].iter() {
            if self.kings[c as usize] != self.bitboard(c, King).peek() {
                return Err(Error::InconsistentPosition);
            }
        }

        Ok(())
    }
}

impl Default for Position {
    /// Returns the standard starting position
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    /// Writes out the position using FEN, or with `{:#}` as a text diagram with rank 8 at the top
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            for r in (0..Rank::COUNT).rev() {
                write!(f, "{} ", r + 1)?;
                for file in 0..File::COUNT {
                    write!(f, "{} ", self.board[r * File::COUNT + file])?;
                }
                f.write_str("\n")?;
            }
            f.write_str("  a b c d e f g h")
        } else {
            self.to_fen_str().fmt(f)
        }
    }
}

impl FromStr for Position {
    type Err = ParseFenError;

    /// Parse a position from a FEN string
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Position::from_fen_str(s)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    fn code(color: Color, piece: Piece) -> PieceCode {
        PieceCode::new(color, piece)
    }

    #[test]
    fn new_returns_the_standard_starting_position() {
        let pos = Position::new();
        assert_eq!(pos.to_fen_str(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(pos.occupied().len(), 32);
        assert_eq!(pos.bitboard(White, Pawn), Bitboard::from(Rank::R2));
        assert_eq!(pos.bitboard_at(11), Bitboard::from(Square::E8));
        assert_eq!(pos.king_square(White), Some(Square::E1));
        assert_eq!(pos.king_square(Black), Some(Square::E8));
        pos.validate().unwrap();
    }

    #[test]
    fn empty_position() {
        let pos = Position::empty();
        assert!(pos.occupied().is_empty());
        assert_eq!(pos.king_square(White), None);
        assert_eq!(pos.fullmove_number(), 1);
        assert_eq!(pos.bitboard_at(12), Bitboard::new());
        pos.validate().unwrap();
    }

    #[test]
    fn place_and_clear_keep_views_in_step() {
        let mut pos = Position::empty();
        pos.place_piece(Square::D4, code(White, Rook));
        pos.place_piece(Square::D4, code(Black, Queen));
        assert!(pos.bitboard(White, Rook).is_empty());
        assert_eq!(pos.piece_at(Square::D4), code(Black, Queen));
        assert_eq!(pos.bitboard_index_at(Square::D4), Some(10));
        assert!(!pos.is_white_at(Square::D4));
        pos.validate().unwrap();

        pos.clear_square(Square::D4);
        assert!(pos.occupied().is_empty());
        assert_eq!(pos.piece_at(Square::D4), PieceCode::EMPTY);
        pos.validate().unwrap();
    }

    #[test]
    fn move_piece_replaces_destination() {
        let mut pos: Position = "4k3/8/8/3p4/8/8/8/3RK3 w - - 0 1".parse().unwrap();
        pos.move_piece(Square::D1, Square::D5);
        assert_eq!(pos.piece_at(Square::D5), code(White, Rook));
        assert!(pos.bitboard(Black, Pawn).is_empty());
        assert_eq!(pos.piece_at(Square::D1), PieceCode::EMPTY);
        // turn and counters are untouched
        assert_eq!(pos.turn(), White);
        assert_eq!(pos.halfmove_clock(), 0);
        pos.validate().unwrap();
    }

    #[test]
    fn move_piece_tracks_king() {
        let mut pos = Position::new();
        pos.move_piece(Square::E1, Square::E4);
        assert_eq!(pos.king_square(White), Some(Square::E4));
        pos.clear_square(Square::E4);
        assert_eq!(pos.king_square(White), None);
        pos.validate().unwrap();
    }

    #[test]
    fn move_from_empty_square_does_nothing() {
        let mut pos = Position::new();
        let before = pos.clone();
        pos.move_piece(Square::E4, Square::E5);
        assert_eq!(pos, before);
    }

    #[test]
    fn clones_are_independent() {
        let original = Position::new();
        let mut copy = original.clone();
        copy.move_piece(Square::E2, Square::E4);
        copy.switch_turn();
        assert_eq!(original, Position::new());
        assert_ne!(original, copy);
    }

    #[test]
    fn make_move_updates_counters() {
        let mut pos = Position::new();
        pos.make_move(&Move::with_flags(Square::E2, Square::E4, MoveFlags::PAWN_DOUBLE_PUSH));
        assert_eq!(pos.to_fen_str(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");

        pos.make_move(&Move::new(Square::G8, Square::F6));
        assert_eq!(pos.to_fen_str(),
            "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2");
    }

    #[test]
    fn make_move_promotes() {
        let mut pos: Position = "4k3/1P6/8/8/8/8/8/4K3 w - - 3 40".parse().unwrap();
        pos.make_move(&"b7b8q".parse().unwrap());
        assert_eq!(pos.piece_at(Square::B8), code(White, Queen));
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.turn(), Black);
        pos.validate().unwrap();
    }

    #[test]
    fn make_move_en_passant_removes_pawn() {
        let mut pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        pos.make_move(&Move::with_flags(Square::E5, Square::D6, MoveFlags::EN_PASSANT));
        assert!(pos.bitboard(Black, Pawn).is_empty());
        assert_eq!(pos.piece_at(Square::D6), code(White, Pawn));
        pos.validate().unwrap();
    }

    #[test]
    fn board_array_matches_piece_codes() {
        let pos = Position::new();
        let board = pos.board();
        assert_eq!(board[Square::A1 as usize], code(White, Rook).bits());
        assert_eq!(board[Square::E8 as usize], code(Black, King).bits());
        assert_eq!(board[Square::E4 as usize], 0);
        for sq in Square::all() {
            assert_eq!(board[sq as usize], pos.piece_at(sq).bits());
        }
    }

    #[test]
    fn castling_flags() {
        let mut pos = Position::new();
        assert!(pos.can_castle_king_side(White));
        pos.set_castling(White, false, true);
        assert!(!pos.can_castle_king_side(White));
        assert!(pos.can_castle_queen_side(White));
        assert_eq!(pos.to_fen_str(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Qkq - 0 1");
    }

    #[test]
    fn square_attacks() {
        let cache = AttackCache::build().unwrap();
        let pos: Position = "4k3/8/8/3p4/8/8/1N6/R3K3 w - - 0 1".parse().unwrap();
        assert!(pos.is_square_attacked(&cache, Square::A8, White));
        assert!(pos.is_square_attacked(&cache, Square::D3, White));
        assert!(pos.is_square_attacked(&cache, Square::C4, Black));
        assert!(pos.is_square_attacked(&cache, Square::E4, Black));
        assert!(!pos.is_square_attacked(&cache, Square::D4, Black));
        assert!(!pos.is_in_check(&cache, Black));

        let pos: Position = "4k3/8/8/8/8/8/4r3/4K3 w - - 0 1".parse().unwrap();
        assert!(pos.is_in_check(&cache, White));

        let pos: Position = "4k3/8/8/8/4P3/8/4r3/4K3 w - - 0 1".parse().unwrap();
        assert!(pos.is_in_check(&cache, White));
        assert!(!pos.is_square_attacked(&cache, Square::E5, Black));

        assert!(!Position::empty().is_in_check(&cache, White));
    }

    #[test]
    fn diagram_display() {
        let pos: Position = "7k/8/8/8/8/8/8/K7 w - - 0 1".parse().unwrap();
        let text = format!("{:#}", pos);
        assert!(text.starts_with("8 . . . . . . . k \n"));
        assert!(text.contains("1 K . . . . . . . \n"));
    }
}
