//! Module for counting and printing the number of variations from a given position
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::chess::*;

/// Print the number of variations of the given `depth` for each generated move from `pos`
pub fn print(cache: &AttackCache, pos: &Position, depth: usize) -> usize {
    if depth < 1 {
        return 1;
    }

    let mut total = 0;

    let moves = MoveGenerator::new(cache).generate(pos, true);
    for m in moves {
        let mut next = pos.clone();
        next.make_move(&m);
        let count = count(cache, &next, depth - 1);
        total += count;
        println!("\t{:7}\t{:12}\t{}", m.to_string(), count, next);
    }

    total
}

/// Count the number of variations of the given `depth` from `pos`.
///
/// Every generated move is followed, so moves which leave the king in check are counted too.
pub fn count(cache: &AttackCache, pos: &Position, depth: usize) -> usize {
    if depth < 1 {
        return 1;
    }

    let moves = MoveGenerator::new(cache).generate(pos, true);
    if depth == 1 {
        return moves.len();
    }

    let mut total = 0;
    for m in moves {
        let mut next = pos.clone();
        next.make_move(&m);
        total += count(cache, &next, depth - 1);
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_counts() {
        let cache = AttackCache::build().unwrap();
        let pos = Position::new();
        assert_eq!(count(&cache, &pos, 0), 1);
        assert_eq!(count(&cache, &pos, 1), 20);
        assert_eq!(count(&cache, &pos, 2), 400);
    }
}
