//! Module to host a chess game: a loaded position, its generated moves and the shared tables
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::sync::Arc;
use log::{debug, info, warn};
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A chess game session.
///
/// Holds the current position together with the moves generated for it. The move list is
/// regenerated whenever the position changes, and moves are only accepted if they appear in it.
/// Cloning a game copies its position and history; only the attack tables are shared.
#[derive(Debug, Clone)]
pub struct Game {
    cache: Arc<AttackCache>,
    promotions: PromotionMode,
    position: Option<Position>,
    moves: Vec<Move>,
    history: Vec<Move>,
}

impl Game {
    /// Creates a game with no position loaded
    pub fn new(cache: Arc<AttackCache>) -> Self {
        Game {
            cache,
            promotions: PromotionMode::default(),
            position: None,
            moves: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Creates a new game using `pos` as the starting position
    pub fn starting_at(cache: Arc<AttackCache>, pos: Position) -> Self {
        let mut game = Game::new(cache);
        game.set_position(pos);
        game
    }

    /// Sets which promotions are generated, and regenerates the moves
    pub fn set_promotions(&mut self, mode: PromotionMode) -> &mut Self {
        self.promotions = mode;
        self.regenerate();
        self
    }

    /// Returns the attack tables used by the game
    pub fn cache(&self) -> &Arc<AttackCache> {
        &self.cache
    }

    /// Replaces the position with the one described by `fen`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParseError` if `fen` is malformed, in which case the game is unchanged.
    pub fn load_fen(&mut self, fen: &str) -> Result<()> {
        let pos = Position::from_fen_str(fen)?;
        debug!("loaded position '{}'", pos);
        self.set_position(pos);
        Ok(())
    }

    /// Replaces the position and forgets the moves played so far
    pub fn set_position(&mut self, pos: Position) {
        self.position = Some(pos);
        self.history.clear();
        self.regenerate();
    }

    /// Returns the current position
    pub fn position(&self) -> Result<&Position> {
        self.position.as_ref().ok_or(Error::MissingPosition)
    }

    /// Returns the current position in FEN
    pub fn fen(&self) -> Result<String> {
        Ok(self.position()?.to_fen_str())
    }

    /// Returns the board as 64 piece codes in square order
    pub fn board(&self) -> Result<[u8; Square::COUNT]> {
        Ok(self.position()?.board())
    }

    /// Returns the moves available in the current position
    pub fn moves(&self) -> Result<&[Move]> {
        self.position()?;
        Ok(&self.moves)
    }

    /// Returns the moves played since the position was loaded, oldest first
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the destinations of the moves which start at `from`, in generation order and
    /// without repeats
    pub fn moves_from(&self, from: Square) -> Result<Vec<Square>> {
        let mut targets = Vec::new();
        for mv in self.moves()?.iter().filter(|mv| mv.origin() == from) {
            if !targets.contains(&mv.destination()) {
                targets.push(mv.destination());
            }
        }
        Ok(targets)
    }

    /// Returns the generated move which reads the same as `from`, `to` and `promotion`
    ///
    /// # Errors
    ///
    /// Returns `Error::IllegalMove` if no generated move matches.
    pub fn find_move(&self, from: Square, to: Square, promotion: Option<Promotion>)
        -> Result<Move>
    {
        let wanted = match promotion {
            Some(prom) => Move::with_promotion(from, to, MoveFlags::PROMOTION, prom),
            None => Move::new(from, to),
        };

        self.moves()?
            .iter()
            .find(|mv| mv.matches(&wanted))
            .copied()
            .ok_or(Error::IllegalMove)
    }

    /// Plays the move from `from` to `to` and returns it
    ///
    /// # Errors
    ///
    /// Returns `Error::IllegalMove` if the piece on `from` doesn't belong to the side to move or
    /// the move is not among the generated moves.
    pub fn play(&mut self, from: Square, to: Square) -> Result<Move> {
        self.play_matching(from, to, None)
    }

    /// Plays a move given in coordinate notation, such as `e2e4` or `e7e8q`
    pub fn play_str(&mut self, s: &str) -> Result<Move> {
        let wanted: Move = s.parse()?;
        self.play_matching(wanted.origin(), wanted.destination(), wanted.promotion())
    }

    fn play_matching(&mut self, from: Square, to: Square, promotion: Option<Promotion>)
        -> Result<Move>
    {
        let turn = self.position()?.turn();
        if self.position()?.piece_at(from).color() != Some(turn) {
            warn!("{} has no piece to move on {}", turn, from);
            return Err(Error::IllegalMove);
        }

        let mv = self.find_move(from, to, promotion)?;
        if let Some(pos) = self.position.as_mut() {
            pos.make_move(&mv);
        }
        info!("played {}", mv);
        self.history.push(mv);
        self.regenerate();

        Ok(mv)
    }

    /// Places `code` on `sq` (or clears it, for `PieceCode::EMPTY`) and regenerates the moves
    pub fn place_piece(&mut self, sq: Square, code: PieceCode) -> Result<()> {
        match self.position.as_mut() {
            Some(pos) => pos.place_piece(sq, code),
            None => return Err(Error::MissingPosition),
        }
        self.regenerate();
        Ok(())
    }

    fn regenerate(&mut self) {
        self.moves = match &self.position {
            Some(pos) => MoveGenerator::new(&self.cache)
                .with_promotions(self.promotions)
                .generate(pos, true),
            None => Vec::new(),
        };
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> Arc<AttackCache> {
        Arc::new(AttackCache::build().unwrap())
    }

    #[test]
    fn nothing_loaded() {
        let mut game = Game::new(cache());
        assert_eq!(game.moves().unwrap_err(), Error::MissingPosition);
        assert_eq!(game.fen().unwrap_err(), Error::MissingPosition);
        assert_eq!(game.play(Square::E2, Square::E4).unwrap_err(), Error::MissingPosition);
        assert_eq!(game.place_piece(Square::E2, PieceCode::EMPTY), Err(Error::MissingPosition));
    }

    #[test]
    fn load_and_play() {
        let mut game = Game::new(cache());
        game.load_fen(START_FEN).unwrap();
        assert_eq!(game.moves().unwrap().len(), 20);
        assert_eq!(game.moves_from(Square::G1).unwrap(), vec![Square::F3, Square::H3]);
        assert!(game.moves_from(Square::E4).unwrap().is_empty());

        let mv = game.play(Square::E2, Square::E4).unwrap();
        assert!(mv.has_flag(MoveFlags::PAWN_DOUBLE_PUSH));
        assert_eq!(game.fen().unwrap(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        assert_eq!(game.moves().unwrap().len(), 20);

        game.play_str("g8f6").unwrap();
        assert_eq!(game.position().unwrap().turn(), Color::White);
        assert_eq!(game.position().unwrap().fullmove_number(), 2);
    }

    #[test]
    fn rejects_illegal_moves() {
        let mut game = Game::starting_at(cache(), Position::new());
        // wrong color
        assert_eq!(game.play(Square::E7, Square::E5), Err(Error::IllegalMove));
        // not generated
        assert_eq!(game.play(Square::E2, Square::E5), Err(Error::IllegalMove));
        // empty square
        assert_eq!(game.play(Square::E4, Square::E5), Err(Error::IllegalMove));
        assert_eq!(game.fen().unwrap(), START_FEN);
    }

    #[test]
    fn history_is_kept_and_copied() {
        let mut game = Game::starting_at(cache(), Position::new());
        assert!(game.history().is_empty());
        game.play_str("e2e4").unwrap();
        game.play_str("e7e5").unwrap();

        let mut copy = game.clone();
        copy.play_str("g1f3").unwrap();
        assert_eq!(copy.history().len(), 3);
        assert_eq!(game.history().iter().map(|m| m.to_string()).collect::<Vec<_>>(),
                   vec!["e2e4", "e7e5"]);
        assert_eq!(game.fen().unwrap(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2");

        // a failed move is not recorded
        assert!(game.play_str("e4e5").is_err());
        assert_eq!(game.history().len(), 2);

        game.load_fen(START_FEN).unwrap();
        assert!(game.history().is_empty());
    }

    #[test]
    fn bad_fen_leaves_game_alone() {
        let mut game = Game::starting_at(cache(), Position::new());
        assert_eq!(game.load_fen("not a position"), Err(Error::ParseError));
        assert_eq!(game.fen().unwrap(), START_FEN);
    }

    #[test]
    fn promotions() {
        let mut game = Game::new(cache());
        game.set_promotions(PromotionMode::All);
        game.load_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game.moves_from(Square::A7).unwrap(), vec![Square::A8]);
        assert_eq!(game.play(Square::A7, Square::A8), Err(Error::IllegalMove));

        let mv = game.play_str("a7a8n").unwrap();
        assert_eq!(mv.promotion(), Some(Promotion::ToKnight));
        assert_eq!(game.board().unwrap()[Square::A8 as usize],
                   PieceCode::new(Color::White, Piece::Knight).bits());
    }

    #[test]
    fn placing_pieces_regenerates() {
        let mut game = Game::starting_at(cache(), Position::empty());
        assert!(game.moves().unwrap().is_empty());
        game.place_piece(Square::D4, PieceCode::new(Color::White, Piece::Rook)).unwrap();
        assert_eq!(game.moves().unwrap().len(), 14);
        game.place_piece(Square::D4, PieceCode::EMPTY).unwrap();
        assert!(game.moves().unwrap().is_empty());
    }
}
