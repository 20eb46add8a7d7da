//! Tests the move generator (chess module)
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////

mod move_gen {
    use std::sync::Arc;
    use std::thread;
    use chesscore::chess::*;

    fn moves(cache: &AttackCache, fen: &str, include_quiet: bool) -> Vec<String> {
        let pos: Position = fen.parse().unwrap();
        MoveGenerator::new(cache)
            .generate(&pos, include_quiet)
            .iter()
            .map(|m| m.to_string())
            .collect()
    }

    #[test]
    fn position_001() {
        assert_eq!(count(START_FEN, 1), 20);
        assert_eq!(count(START_FEN, 2), 400);
        assert_eq!(count(START_FEN, 3), 8902);
    }

    #[test]
    fn position_002() {
        // a lone king in the corner, and a lone knight in the middle
        assert_eq!(count("8/8/8/8/8/8/8/K7 w - - 0 1", 1), 3);
        assert_eq!(count("8/8/8/8/3N4/8/8/8 w - - 0 1", 1), 8);
        assert_eq!(count("8/8/8/8/3N4/8/8/8 w - - 0 1", 2), 0);
    }

    #[test]
    fn start_position_moves() {
        let cache = AttackCache::build().unwrap();
        let list = moves(&cache, START_FEN, true);

        assert_eq!(list.len(), 20);
        assert_eq!(list.iter().filter(|m| m.starts_with('b') || m.starts_with('g'))
            .filter(|m| &m[1..2] == "1").count(), 4);
        assert!(moves(&cache, START_FEN, false).is_empty());
    }

    #[test]
    fn rook_on_open_board() {
        let cache = AttackCache::build().unwrap();
        let list = moves(&cache, "8/8/8/8/3R4/8/8/8 w - - 0 1", true);
        assert_eq!(list.len(), 14);
        assert_eq!(&list[..4], &["d4d3", "d4d2", "d4d1", "d4e4"]);

        let list = moves(&cache, "8/8/3p4/8/3R4/8/8/8 w - - 0 1", true);
        assert_eq!(list.len(), 12);
        assert!(list.contains(&"d4d6".to_string()));
        assert!(!list.contains(&"d4d7".to_string()));
        assert!(!list.contains(&"d4d8".to_string()));
    }

    #[test]
    fn queen_in_the_corner() {
        let cache = AttackCache::build().unwrap();
        // 7 along the rank, 7 along the file, 7 along the diagonal
        assert_eq!(moves(&cache, "8/8/8/8/8/8/8/Q7 w - - 0 1", true).len(), 21);
        // the king comes first and the queen last, stopping short of the king
        let list = moves(&cache, "8/8/8/8/8/8/8/Q6K w - - 0 1", true);
        assert_eq!(list.first().map(String::as_str), Some("h1g1"));
        assert_eq!(list[3], "a1b1");
        assert_eq!(list[8], "a1g1");
        assert_eq!(list.last().map(String::as_str), Some("a1a8"));
        assert_eq!(list.len(), 3 + 20);
    }

    #[test]
    fn cache_is_shared_between_threads() {
        let cache = Arc::new(AttackCache::build().unwrap());

        let handles: Vec<_> = (0..2).map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || variations::count(&cache, &Position::new(), 2))
        }).collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 400);
        }
    }

    #[test]
    fn a_short_game() {
        let cache = Arc::new(AttackCache::build().unwrap());
        let mut game = Game::starting_at(cache.clone(), Position::new());

        for mv in ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5c6", "d7c6"].iter() {
            game.play_str(mv).unwrap();
        }

        assert_eq!(game.fen().unwrap(),
            "r1bqkbnr/1pp2ppp/p1p5/4p3/4P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 5");
        let pos = game.position().unwrap();
        assert!(!pos.is_in_check(&cache, Color::White));
        assert_eq!(pos.bitboard(Color::White, Piece::Bishop).len(), 1);
        pos.validate().unwrap();

        // the knight on f3 can take on e5
        let capture = game.find_move(Square::F3, Square::E5, None).unwrap();
        assert_eq!(capture.captured(), Some(Piece::Pawn));
    }

    #[test]
    fn moves_leaving_the_king_in_check_are_generated() {
        let cache = AttackCache::build().unwrap();
        // the bishop on e2 is pinned but may still move
        let list = moves(&cache, "4r3/8/8/8/8/8/4B3/4K3 w - - 0 1", true);
        assert!(list.contains(&"e2d3".to_string()));

        let mut pos: Position = "4r3/8/8/8/8/8/4B3/4K3 w - - 0 1".parse().unwrap();
        pos.make_move(&"e2d3".parse().unwrap());
        assert!(pos.is_in_check(&cache, Color::White));
    }

    fn count(fen: &str, depth: usize) -> usize {
        println!("\n{}", fen);
        let cache = AttackCache::build().unwrap();
        let pos = fen.parse().unwrap();

        let count = variations::print(&cache, &pos, depth);
        println!("Depth {} total:\t{:12}", depth, count);

        count
    }
}
