//! Pseudo-legal move generation driven by the precomputed attack tables
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use log::{debug, error, trace};
use super::*;

use Piece::*;

/// The order in which piece types are visited
const GENERATION_ORDER: [Piece; Piece::COUNT] = [Pawn, King, Bishop, Rook, Knight, Queen];

/// Room for the moves of any reasonable position without reallocating
const MOVE_CAPACITY: usize = 128;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which promotion moves to produce when a pawn reaches the last rank
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PromotionMode {
    /// The pawn move is produced as an ordinary move with no promotion
    None,
    /// Queen, rook, bishop and knight promotions
    All,
    /// Queen promotions only
    QueenOnly,
    /// Queen and knight promotions
    QueenAndKnight,
}

impl PromotionMode {
    /// Returns `true` if `prom` is one of the promotions produced in this mode
    pub fn allows(self, prom: Promotion) -> bool {
        match self {
            PromotionMode::None => false,
            PromotionMode::All => true,
            PromotionMode::QueenOnly => prom == Promotion::ToQueen,
            PromotionMode::QueenAndKnight => {
                prom == Promotion::ToQueen || prom == Promotion::ToKnight
            }
        }
    }
}

impl Default for PromotionMode {
    fn default() -> Self {
        PromotionMode::None
    }
}

impl fmt::Display for PromotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionMode::None => "none",
            PromotionMode::All => "all",
            PromotionMode::QueenOnly => "queen",
            PromotionMode::QueenAndKnight => "queen-knight",
        }.fmt(f)
    }
}

impl FromStr for PromotionMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(PromotionMode::None),
            "all" => Ok(PromotionMode::All),
            "queen" => Ok(PromotionMode::QueenOnly),
            "queen-knight" => Ok(PromotionMode::QueenAndKnight),
            _ => Err(Error::ParseError),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Produces the pseudo-legal moves for the side to move.
///
/// Moves are not checked for leaving the king in check, and neither castling nor en-passant
/// captures are produced. The generator only borrows the cache; it holds no reference to a
/// position once `generate()` returns.
#[derive(Debug, Copy, Clone)]
pub struct MoveGenerator<'a> {
    cache: &'a AttackCache,
    promotions: PromotionMode,
}

impl<'a> MoveGenerator<'a> {
    /// Creates a generator which reads its tables from `cache`
    pub fn new(cache: &'a AttackCache) -> MoveGenerator<'a> {
        MoveGenerator { cache, promotions: PromotionMode::default() }
    }

    /// Returns the same generator, producing promotions according to `mode`
    pub fn with_promotions(self, mode: PromotionMode) -> MoveGenerator<'a> {
        MoveGenerator { promotions: mode, ..self }
    }

    /// Returns the promotion mode
    pub fn promotions(&self) -> PromotionMode {
        self.promotions
    }

    /// Returns the moves available to the side to move in `pos`.
    ///
    /// Piece types are visited in the order pawn, king, bishop, rook, knight, queen, and pieces
    /// of one type by ascending square. With `include_quiet` set to `false`, only captures and
    /// promotions are returned.
    ///
    /// If generation fails part way through, the failure is logged and the moves found so far
    /// are returned.
    pub fn generate(&self, pos: &Position, include_quiet: bool) -> Vec<Move> {
        let mut moves = Vec::with_capacity(MOVE_CAPACITY);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.generate_into(pos, include_quiet, &mut moves)
        }));
        if let Err(cause) = outcome {
            error!("move generation for '{}' aborted after {} moves: {}",
                pos, moves.len(), panic_message(&*cause));
        }

        debug!("generated {} moves for {}", moves.len(), pos.turn());
        for mv in moves.iter() {
            trace!("  {}", mv);
        }

        moves
    }

    fn generate_into(&self, pos: &Position, include_quiet: bool, moves: &mut Vec<Move>) {
        let us = pos.turn();

        for &piece in GENERATION_ORDER.iter() {
            for from in pos.bitboard(us, piece) {
                match piece {
                    Pawn => self.pawn_moves(pos, from, include_quiet, moves),
                    King => self.king_moves(pos, from, include_quiet, moves),
                    Knight => self.knight_moves(pos, from, include_quiet, moves),
                    Bishop | Rook | Queen => {
                        self.slider_moves(pos, piece, from, include_quiet, moves)
                    }
                }
            }
        }
    }

    fn pawn_moves(
        &self,
        pos: &Position,
        from: Square,
        include_quiet: bool,
        moves: &mut Vec<Move>,
    ) {
        let us = pos.turn();
        let occupied = pos.occupied();
        let mut blocked = true;

        // single push
        if let Some(to) = self.cache.pawn_push(us, from).peek() {
            if !occupied.contains(to) {
                blocked = false;
                self.add_pawn_move(us, from, to, None, include_quiet, moves);
            }
        }

        // captures
        for to in self.cache.pawn_captures(us, from) & pos.occupied_by(!us) {
            self.add_pawn_move(us, from, to, pos.piece_at(to).piece(), include_quiet, moves);
        }

        // double push
        if !blocked && include_quiet {
            if let Some(to) = self.cache.pawn_double_push(us, from).peek() {
                if !occupied.contains(to) {
                    moves.push(Move::with_flags(from, to, MoveFlags::PAWN_DOUBLE_PUSH));
                }
            }
        }
    }

    fn add_pawn_move(
        &self,
        us: Color,
        from: Square,
        to: Square,
        captured: Option<Piece>,
        include_quiet: bool,
        moves: &mut Vec<Move>,
    ) {
        if to.rank() == us.promotion_rank() && self.promotions != PromotionMode::None {
            for &prom in Promotion::ALL.iter().filter(|&&p| self.promotions.allows(p)) {
                moves.push(match captured {
                    Some(p) => Move::with_capture(
                        from, to, MoveFlags::PROMOTION | MoveFlags::CAPTURE, p, Some(prom)),
                    None => Move::with_promotion(from, to, MoveFlags::PROMOTION, prom),
                });
            }
        } else {
            match captured {
                Some(p) => moves.push(Move::with_capture(from, to, MoveFlags::CAPTURE, p, None)),
                None if include_quiet => moves.push(Move::new(from, to)),
                None => {},
            }
        }
    }

    fn knight_moves(
        &self,
        pos: &Position,
        from: Square,
        include_quiet: bool,
        moves: &mut Vec<Move>,
    ) {
        let attacks = self.cache.knight_attacks(from);

        if include_quiet {
            for to in attacks & !pos.occupied() {
                moves.push(Move::new(from, to));
            }
        }
        for to in attacks & pos.occupied_by(!pos.turn()) {
            self.add_capture(pos, from, to, moves);
        }
    }

    fn king_moves(
        &self,
        pos: &Position,
        from: Square,
        include_quiet: bool,
        moves: &mut Vec<Move>,
    ) {
        let us = pos.turn();

        for &offset in self.cache.king_offsets(from) {
            let to = match Square::from_index(from as i32 + offset as i32) {
                Some(to) => to,
                None => continue,
            };
            let target = pos.piece_at(to);

            if target.is_empty() {
                if include_quiet {
                    moves.push(Move::new(from, to));
                }
            } else if target.color() != Some(us) {
                self.add_capture(pos, from, to, moves);
            }
        }
    }

    fn slider_moves(
        &self,
        pos: &Position,
        piece: Piece,
        from: Square,
        include_quiet: bool,
        moves: &mut Vec<Move>,
    ) {
        let friends = pos.occupied_by(pos.turn());
        let enemies = pos.occupied_by(!pos.turn());

        for &dir in Direction::for_piece(piece) {
            for &step in self.cache.path(from, dir) {
                let to = match step.peek() {
                    Some(to) => to,
                    None => break,
                };

                if step.intersects(friends) {
                    break;
                } else if step.intersects(enemies) {
                    self.add_capture(pos, from, to, moves);
                    break;
                } else if include_quiet {
                    moves.push(Move::new(from, to));
                }
            }
        }
    }

    fn add_capture(&self, pos: &Position, from: Square, to: Square, moves: &mut Vec<Move>) {
        match pos.piece_at(to).piece() {
            Some(captured) => {
                moves.push(Move::with_capture(from, to, MoveFlags::CAPTURE, captured, None))
            }
            None => moves.push(Move::with_flags(from, to, MoveFlags::CAPTURE)),
        }
    }
}

fn panic_message(cause: &(dyn Any + Send)) -> &str {
    if let Some(s) = cause.downcast_ref::<&str>() {
        s
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s
    } else {
        "unknown cause"
    }
}
