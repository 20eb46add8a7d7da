//! Precomputed per-square attack, path, distance and direction tables
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::fmt::Write;
use log::{info, error};
use crate::chess::*;
use crate::chess::error::{Error, Result};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// One of the eight compass directions, as seen from `White`'s side of the board.
///
/// Directions are numbered by index offset as `-9, -8, -7, +1, +9, +8, +7, -1`. Drawn with rank
/// 1 at the top this runs clockwise from the top left corner; from `White`'s side it starts at
/// south-west and turns anticlockwise. Even numbers are diagonal and odd numbers are orthogonal.
/// Bishop direction `d` is compass direction `2 * d`, and rook direction `d` is compass direction
/// `2 * d + 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Direction {
    SouthWest = 0,
    South = 1,
    SouthEast = 2,
    East = 3,
    NorthEast = 4,
    North = 5,
    NorthWest = 6,
    West = 7,
}

impl Direction {
    /// The number of directions
    pub const COUNT: usize = 8;

    /// All directions in compass order
    pub const ALL: [Direction; Direction::COUNT] = [
        Direction::SouthWest, Direction::South, Direction::SouthEast, Direction::East,
        Direction::NorthEast, Direction::North, Direction::NorthWest, Direction::West,
    ];

    /// The four diagonal directions, indexed by bishop direction
    pub const DIAGONAL: [Direction; 4] =
        [Direction::SouthWest, Direction::SouthEast, Direction::NorthEast, Direction::NorthWest];

    /// The four orthogonal directions, indexed by rook direction
    pub const ORTHOGONAL: [Direction; 4] =
        [Direction::South, Direction::East, Direction::North, Direction::West];

    /// Returns the change in file and rank of one step in this direction
    pub fn step(self) -> (i8, i8) {
        match self {
            Direction::SouthWest => (-1, -1),
            Direction::South => (0, -1),
            Direction::SouthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::North => (0, 1),
            Direction::NorthWest => (-1, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Returns the direction whose step has the same signs as the file and rank changes, or
    /// `None` if both are zero
    pub fn toward(files: i8, ranks: i8) -> Option<Direction> {
        let signs = (files.signum(), ranks.signum());
        Direction::ALL.iter().copied().find(|dir| dir.step() == signs)
    }

    /// Returns the change in square index of one step in this direction
    pub fn offset(self) -> i8 {
        let (files, ranks) = self.step();
        ranks * 8 + files
    }

    /// Returns `true` for the four diagonal directions
    pub fn is_diagonal(self) -> bool {
        self as usize % 2 == 0
    }

    /// Returns the directions a sliding piece moves in, or an empty slice for other pieces
    pub fn for_piece(piece: Piece) -> &'static [Direction] {
        match piece {
            Piece::Bishop => &Direction::DIAGONAL,
            Piece::Rook => &Direction::ORTHOGONAL,
            Piece::Queen => &Direction::ALL,
            _ => &[],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::SouthWest => "SW",
            Direction::South => "S",
            Direction::SouthEast => "SE",
            Direction::East => "E",
            Direction::NorthEast => "NE",
            Direction::North => "N",
            Direction::NorthWest => "NW",
            Direction::West => "W",
        }.fmt(f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Ordered single-square steps away from a square in one direction, nearest first
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
struct Path {
    steps: [Bitboard; 8],
    len: usize,
}

impl Path {
    fn push(&mut self, step: Bitboard) {
        self.steps[self.len] = step;
        self.len += 1;
    }

    fn as_slice(&self) -> &[Bitboard] {
        &self.steps[..self.len]
    }
}

/// Index offsets which stay on the board, in ascending order
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
struct Offsets {
    items: [i8; 8],
    len: usize,
}

impl Offsets {
    fn push(&mut self, offset: i8) {
        self.items[self.len] = offset;
        self.len += 1;
    }

    fn as_slice(&self) -> &[i8] {
        &self.items[..self.len]
    }
}

// (files, ranks) deltas, in ascending order of index offset
const KNIGHT_DELTAS: [(i8, i8); 8] =
    [(-1, -2), (1, -2), (-2, -1), (2, -1), (-2, 1), (2, 1), (-1, 2), (1, 2)];
const KING_DELTAS: [(i8, i8); 8] =
    [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

fn pair(from: Square, to: Square) -> usize {
    from as usize * Square::COUNT + to as usize
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Immutable lookup tables used for move generation.
///
/// Build it once with `AttackCache::build()` and share it by reference (or behind an `Arc`).
#[derive(Clone)]
pub struct AttackCache {
    knight_attacks: [Bitboard; Square::COUNT],
    king_attacks: [Bitboard; Square::COUNT],
    knight_offsets: [Offsets; Square::COUNT],
    king_offsets: [Offsets; Square::COUNT],

    pawn_pushes: [[Bitboard; Square::COUNT]; Color::COUNT],
    pawn_double_pushes: [[Bitboard; Square::COUNT]; Color::COUNT],
    pawn_attacks: [[Bitboard; Square::COUNT]; Color::COUNT],
    pawn_captures: [[Bitboard; Square::COUNT]; Color::COUNT],

    rank_masks: [Bitboard; Square::COUNT],
    file_masks: [Bitboard; Square::COUNT],
    diagonal_masks: [Bitboard; Square::COUNT],
    anti_diagonal_masks: [Bitboard; Square::COUNT],

    paths: Vec<[Path; Direction::COUNT]>,
    rays: Vec<[Bitboard; Direction::COUNT]>,
    bishop_rays: [Bitboard; Square::COUNT],
    rook_rays: [Bitboard; Square::COUNT],
    queen_rays: [Bitboard; Square::COUNT],

    between: Vec<Bitboard>,
    line: Vec<Bitboard>,
    manhattan: Vec<u8>,
    chebyshev: Vec<u8>,
    direction: Vec<Option<Direction>>,
}

impl fmt::Debug for AttackCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackCache").finish()
    }
}

impl AttackCache {
    /// Builds every table and checks them for consistency.
    ///
    /// Returns `Error::CacheConstruction` if any table fails its self-check; a partially built
    /// cache is never returned.
    pub fn build() -> Result<AttackCache> {
        let mut cache = AttackCache {
            knight_attacks: [Bitboard::new(); Square::COUNT],
            king_attacks: [Bitboard::new(); Square::COUNT],
            knight_offsets: [Offsets::default(); Square::COUNT],
            king_offsets: [Offsets::default(); Square::COUNT],
            pawn_pushes: [[Bitboard::new(); Square::COUNT]; Color::COUNT],
            pawn_double_pushes: [[Bitboard::new(); Square::COUNT]; Color::COUNT],
            pawn_attacks: [[Bitboard::new(); Square::COUNT]; Color::COUNT],
            pawn_captures: [[Bitboard::new(); Square::COUNT]; Color::COUNT],
            rank_masks: [Bitboard::new(); Square::COUNT],
            file_masks: [Bitboard::new(); Square::COUNT],
            diagonal_masks: [Bitboard::new(); Square::COUNT],
            anti_diagonal_masks: [Bitboard::new(); Square::COUNT],
            paths: vec![[Path::default(); Direction::COUNT]; Square::COUNT],
            rays: vec![[Bitboard::new(); Direction::COUNT]; Square::COUNT],
            bishop_rays: [Bitboard::new(); Square::COUNT],
            rook_rays: [Bitboard::new(); Square::COUNT],
            queen_rays: [Bitboard::new(); Square::COUNT],
            between: vec![Bitboard::new(); Square::COUNT * Square::COUNT],
            line: vec![Bitboard::new(); Square::COUNT * Square::COUNT],
            manhattan: vec![0; Square::COUNT * Square::COUNT],
            chebyshev: vec![0; Square::COUNT * Square::COUNT],
            direction: vec![None; Square::COUNT * Square::COUNT],
        };

        cache.init_line_masks();
        cache.init_distances();
        cache.init_paths();
        cache.init_pawns();
        cache.init_leapers();

        if let Err(what) = cache.self_check() {
            error!("attack cache failed to build: {}", what);
            return Err(Error::CacheConstruction);
        }

        info!("attack cache built");
        Ok(cache)
    }

    fn init_line_masks(&mut self) {
        for sq in Square::all() {
            let i = sq as usize;
            self.rank_masks[i] = Bitboard::from(sq.rank());
            self.file_masks[i] = Bitboard::from(sq.file());
            self.diagonal_masks[i] = Bitboard::diagonal(sq) & !Bitboard::from(sq);
            self.anti_diagonal_masks[i] = Bitboard::anti_diagonal(sq) & !Bitboard::from(sq);
        }
    }

    fn init_distances(&mut self) {
        for from in Square::all() {
            for to in Square::all() {
                let df = to.file() as i8 - from.file() as i8;
                let dr = to.rank() as i8 - from.rank() as i8;
                let p = pair(from, to);

                self.manhattan[p] = (df.abs() + dr.abs()) as u8;
                self.chebyshev[p] = df.abs().max(dr.abs()) as u8;
                self.direction[p] = Direction::toward(df, dr);

                let n = df.abs().max(dr.abs());
                let aligned = self.direction[p].filter(|dir| {
                    let (sf, sr) = dir.step();
                    df == sf * n && dr == sr * n
                });

                let mut between = Bitboard::new();
                if let Some(dir) = aligned {
                    let (sf, sr) = dir.step();
                    let mut cur = from.offset(sf, sr);
                    while let Some(sq) = cur {
                        if sq == to {
                            break;
                        }
                        between.insert(sq);
                        cur = sq.offset(sf, sr);
                    }
                }
                self.between[p] = between;
                self.line[p] = between | from.into() | to.into();
            }
        }
    }

    fn init_paths(&mut self) {
        for sq in Square::all() {
            let i = sq as usize;
            for dir in Direction::ALL.iter().copied() {
                let (sf, sr) = dir.step();
                let mut path = Path::default();
                let mut cur = sq.offset(sf, sr);
                while let Some(next) = cur {
                    path.push(next.into());
                    cur = next.offset(sf, sr);
                }
                self.rays[i][dir as usize] = path.as_slice().iter()
                    .fold(Bitboard::new(), |acc, &step| acc | step);
                self.paths[i][dir as usize] = path;
            }

            let rays = self.rays[i];
            self.bishop_rays[i] = Direction::DIAGONAL.iter()
                .fold(Bitboard::new(), |acc, &d| acc | rays[d as usize]);
            self.rook_rays[i] = Direction::ORTHOGONAL.iter()
                .fold(Bitboard::new(), |acc, &d| acc | rays[d as usize]);
            self.queen_rays[i] = self.bishop_rays[i] | self.rook_rays[i];
        }
    }

    fn init_pawns(&mut self) {
        for &color in [Color::White, Color::Black].iter() {
            let c = color as usize;
            let fwd = color.forward();

            for sq in Square::all() {
                let i = sq as usize;

                if let Some(push) = sq.offset(0, fwd) {
                    self.pawn_pushes[c][i] = push.into();
                    if sq.rank() == color.pawn_rank() {
                        if let Some(double) = push.offset(0, fwd) {
                            self.pawn_double_pushes[c][i] = double.into();
                        }
                    }
                }

                // attacks by rank/file stepping
                for &df in [-1, 1].iter() {
                    if let Some(target) = sq.offset(df, fwd) {
                        self.pawn_attacks[c][i].insert(target);
                    }
                }

                // captures by index offset, with wrap-around rejected by distance
                for &offset in [7 * fwd, 9 * fwd].iter() {
                    if let Some(target) = Square::from_index(i as i32 + offset as i32) {
                        if self.chebyshev[pair(sq, target)] == 1 {
                            self.pawn_captures[c][i].insert(target);
                        }
                    }
                }
            }
        }
    }

    fn init_leapers(&mut self) {
        for sq in Square::all() {
            let i = sq as usize;

            for &(df, dr) in KNIGHT_DELTAS.iter() {
                if let Some(target) = sq.offset(df, dr) {
                    self.knight_attacks[i].insert(target);
                    self.knight_offsets[i].push(target as i8 - sq as i8);
                }
            }

            for &(df, dr) in KING_DELTAS.iter() {
                if let Some(target) = sq.offset(df, dr) {
                    self.king_attacks[i].insert(target);
                    self.king_offsets[i].push(target as i8 - sq as i8);
                }
            }
        }
    }

    fn self_check(&self) -> std::result::Result<(), String> {
        for sq in Square::all() {
            let i = sq as usize;

            let knight = self.knight_attacks[i];
            if !(2..=8).contains(&knight.len()) || knight.into_iter().any(|t| {
                self.chebyshev(sq, t) != 2 || self.manhattan(sq, t) != 3
            }) {
                return Err(format!("knight attacks from {} are invalid", sq));
            }

            let king = self.king_attacks[i];
            if !(3..=8).contains(&king.len())
                || king.into_iter().any(|t| self.chebyshev(sq, t) != 1)
            {
                return Err(format!("king attacks from {} are invalid", sq));
            }

            if self.knight_offsets[i].len != knight.len()
                || self.king_offsets[i].len != king.len()
            {
                return Err(format!("offset lists for {} disagree with attacks", sq));
            }

            for c in 0..Color::COUNT {
                if self.pawn_attacks[c][i] != self.pawn_captures[c][i] {
                    return Err(format!("pawn capture mask for {} disagrees with attacks", sq));
                }
            }

            for dir in Direction::ALL.iter().copied() {
                let path = self.path(sq, dir);
                if path.len() > 8 || path.iter().any(|step| step.len() != 1) {
                    return Err(format!("{} path from {} is malformed", dir, sq));
                }
            }

            let lines = self.rank_masks[i] | self.file_masks[i]
                | self.diagonal_masks[i] | self.anti_diagonal_masks[i];
            if self.queen_rays[i] != lines & !Bitboard::from(sq) {
                return Err(format!("queen rays from {} disagree with line masks", sq));
            }

            for to in Square::all() {
                let p = pair(sq, to);
                if self.between[p] != self.between[pair(to, sq)]
                    || !self.line[p].contains(sq)
                    || self.between[p].contains(sq)
                    || self.between[p].contains(to)
                {
                    return Err(format!("between mask {}-{} is invalid", sq, to));
                }
            }
        }

        Ok(())
    }

    /// Squares a knight on `sq` attacks
    pub fn knight_attacks(&self, sq: Square) -> Bitboard {
        self.knight_attacks[sq as usize]
    }

    /// Squares a king on `sq` attacks
    pub fn king_attacks(&self, sq: Square) -> Bitboard {
        self.king_attacks[sq as usize]
    }

    /// Index offsets of the knight moves that stay on the board from `sq`, in ascending order
    pub fn knight_offsets(&self, sq: Square) -> &[i8] {
        self.knight_offsets[sq as usize].as_slice()
    }

    /// Index offsets of the king moves that stay on the board from `sq`, in ascending order
    pub fn king_offsets(&self, sq: Square) -> &[i8] {
        self.king_offsets[sq as usize].as_slice()
    }

    /// The square directly in front of a `color` pawn on `sq`
    pub fn pawn_push(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_pushes[color as usize][sq as usize]
    }

    /// The double-push target of a `color` pawn on `sq`; empty unless `sq` is on the pawn rank
    pub fn pawn_double_push(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_double_pushes[color as usize][sq as usize]
    }

    /// Squares a `color` pawn on `sq` attacks
    pub fn pawn_attacks(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_attacks[color as usize][sq as usize]
    }

    /// Squares a `color` pawn on `sq` can capture on
    pub fn pawn_captures(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_captures[color as usize][sq as usize]
    }

    /// The whole rank through `sq`, `sq` included
    pub fn rank_mask(&self, sq: Square) -> Bitboard {
        self.rank_masks[sq as usize]
    }

    /// The whole file through `sq`, `sq` included
    pub fn file_mask(&self, sq: Square) -> Bitboard {
        self.file_masks[sq as usize]
    }

    /// The rest of the `a1`-`h8` diagonal through `sq`
    pub fn diagonal_mask(&self, sq: Square) -> Bitboard {
        self.diagonal_masks[sq as usize]
    }

    /// The rest of the `a8`-`h1` diagonal through `sq`
    pub fn anti_diagonal_mask(&self, sq: Square) -> Bitboard {
        self.anti_diagonal_masks[sq as usize]
    }

    /// Single-square steps from `sq` in direction `dir`, nearest first
    pub fn path(&self, sq: Square, dir: Direction) -> &[Bitboard] {
        self.paths[sq as usize][dir as usize].as_slice()
    }

    /// Bishop path from `sq` in bishop direction `index` (`0..4`)
    pub fn bishop_path(&self, sq: Square, index: usize) -> &[Bitboard] {
        self.path(sq, Direction::ALL[2 * index])
    }

    /// Rook path from `sq` in rook direction `index` (`0..4`)
    pub fn rook_path(&self, sq: Square, index: usize) -> &[Bitboard] {
        self.path(sq, Direction::ALL[2 * index + 1])
    }

    /// Queen path from `sq` in compass direction `index` (`0..8`)
    pub fn queen_path(&self, sq: Square, index: usize) -> &[Bitboard] {
        self.path(sq, Direction::ALL[index])
    }

    /// All squares of the path from `sq` in direction `dir`
    pub fn ray(&self, sq: Square, dir: Direction) -> Bitboard {
        self.rays[sq as usize][dir as usize]
    }

    /// Union of the four diagonal rays from `sq`
    pub fn bishop_rays(&self, sq: Square) -> Bitboard {
        self.bishop_rays[sq as usize]
    }

    /// Union of the four orthogonal rays from `sq`
    pub fn rook_rays(&self, sq: Square) -> Bitboard {
        self.rook_rays[sq as usize]
    }

    /// Union of all eight rays from `sq`
    pub fn queen_rays(&self, sq: Square) -> Bitboard {
        self.queen_rays[sq as usize]
    }

    /// Squares strictly between `from` and `to` if they share a line, otherwise empty
    pub fn between(&self, from: Square, to: Square) -> Bitboard {
        self.between[pair(from, to)]
    }

    /// `between(from, to)` plus both endpoints
    pub fn line(&self, from: Square, to: Square) -> Bitboard {
        self.line[pair(from, to)]
    }

    /// Number of rank and file steps between two squares
    pub fn manhattan(&self, from: Square, to: Square) -> u8 {
        self.manhattan[pair(from, to)]
    }

    /// Number of king steps between two squares
    pub fn chebyshev(&self, from: Square, to: Square) -> u8 {
        self.chebyshev[pair(from, to)]
    }

    /// Direction from `from` to `to` by the signs of the file and rank changes, or `None` if they
    /// are the same square. Squares need not share a line: `a1` to `b3` is north-east.
    pub fn direction(&self, from: Square, to: Square) -> Option<Direction> {
        self.direction[pair(from, to)]
    }

    /// Returns a printable dump of every table entry for `sq`
    pub fn describe(&self, sq: Square) -> String {
        let mut s = String::new();
        let mut table = |name: &str, bd: Bitboard| {
            let _ = write!(s, "{} ({}):\n{:#}\n\n", name, sq, bd);
        };

        table("knight attacks", self.knight_attacks(sq));
        table("king attacks", self.king_attacks(sq));
        table("white pawn push", self.pawn_push(Color::White, sq));
        table("white pawn double push", self.pawn_double_push(Color::White, sq));
        table("white pawn captures", self.pawn_captures(Color::White, sq));
        table("black pawn push", self.pawn_push(Color::Black, sq));
        table("black pawn double push", self.pawn_double_push(Color::Black, sq));
        table("black pawn captures", self.pawn_captures(Color::Black, sq));
        table("rank", self.rank_mask(sq));
        table("file", self.file_mask(sq));
        table("diagonal", self.diagonal_mask(sq));
        table("anti-diagonal", self.anti_diagonal_mask(sq));
        table("bishop rays", self.bishop_rays(sq));
        table("rook rays", self.rook_rays(sq));
        table("queen rays", self.queen_rays(sq));

        let _ = write!(s, "king offsets: {:?}\nknight offsets: {:?}",
            self.king_offsets(sq), self.knight_offsets(sq));
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> AttackCache {
        AttackCache::build().unwrap()
    }

    #[test]
    fn knight_attacks_are_two_by_one_jumps() {
        let cache = cache();
        for sq in Square::all() {
            let attacks = cache.knight_attacks(sq);
            assert!((2..=8).contains(&attacks.len()), "{}", sq);
            for t in attacks {
                assert_eq!(cache.chebyshev(sq, t), 2);
                assert_eq!(cache.manhattan(sq, t), 3);
            }
        }
        assert_eq!(cache.knight_attacks(Square::A1).len(), 2);
        assert_eq!(cache.knight_attacks(Square::D4).len(), 8);
        assert!(cache.knight_attacks(Square::G1).contains(Square::F3));
    }

    #[test]
    fn king_attacks_are_adjacent() {
        let cache = cache();
        for sq in Square::all() {
            let attacks = cache.king_attacks(sq);
            assert!((3..=8).contains(&attacks.len()), "{}", sq);
            for t in attacks {
                assert_eq!(cache.chebyshev(sq, t), 1);
            }
        }
        assert_eq!(cache.king_attacks(Square::H8).len(), 3);
        assert_eq!(cache.king_attacks(Square::E1).len(), 5);
    }

    #[test]
    fn offsets_never_wrap_around_the_board() {
        let cache = cache();
        assert_eq!(cache.king_offsets(Square::A4), &[-8, -7, 1, 8, 9]);
        assert_eq!(cache.king_offsets(Square::D4), &[-9, -8, -7, -1, 1, 7, 8, 9]);
        assert_eq!(cache.knight_offsets(Square::H1), &[6, 15]);
        assert_eq!(cache.knight_offsets(Square::D4), &[-17, -15, -10, -6, 6, 10, 15, 17]);
    }

    #[test]
    fn pawn_tables() {
        let cache = cache();
        assert_eq!(cache.pawn_push(Color::White, Square::E2), Square::E3.into());
        assert_eq!(cache.pawn_double_push(Color::White, Square::E2), Square::E4.into());
        assert!(cache.pawn_double_push(Color::White, Square::E3).is_empty());
        assert_eq!(cache.pawn_push(Color::Black, Square::D7), Square::D6.into());
        assert_eq!(cache.pawn_double_push(Color::Black, Square::D7), Square::D5.into());
        assert!(cache.pawn_push(Color::White, Square::A8).is_empty());
        assert_eq!(cache.pawn_captures(Color::White, Square::A2), Square::B3.into());
        assert_eq!(cache.pawn_captures(Color::White, Square::H2), Square::G3.into());
        assert_eq!(cache.pawn_captures(Color::Black, Square::E5),
            Bitboard::from(Square::D4) | Square::F4.into());
        assert_eq!(cache.pawn_attacks(Color::Black, Square::E5),
            cache.pawn_captures(Color::Black, Square::E5));
    }

    #[test]
    fn line_masks() {
        let cache = cache();
        assert_eq!(cache.rank_mask(Square::A1), Bitboard::from(0xff));
        assert_eq!(cache.file_mask(Square::A1), Bitboard::from(0x0101_0101_0101_0101));
        assert!(cache.rank_mask(Square::D4).contains(Square::D4));
        assert!(cache.file_mask(Square::D4).contains(Square::D4));
        assert_eq!(cache.rank_mask(Square::D4).len(), 8);
        assert_eq!(cache.file_mask(Square::D4).len(), 8);
        // the diagonals leave the square out
        assert!(!cache.diagonal_mask(Square::D4).contains(Square::D4));
        assert_eq!(cache.diagonal_mask(Square::A1), Bitboard::from(0x8040_2010_0804_0200));
        assert!(cache.anti_diagonal_mask(Square::A1).is_empty());
    }

    #[test]
    fn direction_numbering_is_consistent() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(*dir as usize, i);
            assert_eq!(dir.is_diagonal(), i % 2 == 0);
        }
        for i in 0..4 {
            assert_eq!(Direction::DIAGONAL[i], Direction::ALL[2 * i]);
            assert_eq!(Direction::ORTHOGONAL[i], Direction::ALL[2 * i + 1]);
        }
        let offsets: Vec<i8> = Direction::ALL.iter().map(|dir| dir.offset()).collect();
        assert_eq!(offsets, vec![-9, -8, -7, 1, 9, 8, 7, -1]);
        let bishop: Vec<i8> = Direction::DIAGONAL.iter().map(|dir| dir.offset()).collect();
        assert_eq!(bishop, vec![-9, -7, 9, 7]);
        let rook: Vec<i8> = Direction::ORTHOGONAL.iter().map(|dir| dir.offset()).collect();
        assert_eq!(rook, vec![-8, 1, 8, -1]);
    }

    #[test]
    fn paths_step_outward_from_the_square() {
        let cache = cache();
        let north: Vec<_> = cache.path(Square::D4, Direction::North).iter()
            .map(|bd| bd.peek().unwrap())
            .collect();
        assert_eq!(north, vec![Square::D5, Square::D6, Square::D7, Square::D8]);
        assert!(cache.path(Square::H4, Direction::East).is_empty());
        assert!(cache.path(Square::A1, Direction::SouthWest).is_empty());
        assert_eq!(cache.path(Square::A1, Direction::NorthEast).len(), 7);
        assert_eq!(cache.rook_path(Square::D4, 0), cache.path(Square::D4, Direction::South));
        assert_eq!(cache.bishop_path(Square::D4, 3), cache.path(Square::D4, Direction::NorthWest));
        let first: Vec<_> = cache.queen_path(Square::D4, 0).iter()
            .map(|bd| bd.peek().unwrap())
            .collect();
        assert_eq!(first, vec![Square::C3, Square::B2, Square::A1]);
        assert_eq!(cache.queen_path(Square::D4, 3), cache.path(Square::D4, Direction::East));
        assert_eq!(cache.rook_rays(Square::D4).len(), 14);
        assert_eq!(cache.bishop_rays(Square::D4).len(), 13);
        assert_eq!(cache.queen_rays(Square::D4).len(), 27);
        assert_eq!(cache.ray(Square::D4, Direction::South),
            Bitboard::from(Square::D3) | Square::D2.into() | Square::D1.into());
    }

    #[test]
    fn between_and_line() {
        let cache = cache();
        assert_eq!(cache.between(Square::A1, Square::D4),
            Bitboard::from(Square::B2) | Square::C3.into());
        assert_eq!(cache.between(Square::D4, Square::A1), cache.between(Square::A1, Square::D4));
        assert!(cache.between(Square::A1, Square::B2).is_empty());
        assert!(cache.between(Square::A1, Square::B3).is_empty());
        assert!(cache.between(Square::H1, Square::A2).is_empty());
        assert_eq!(cache.line(Square::A1, Square::D4).len(), 4);
        assert_eq!(cache.line(Square::A1, Square::B3),
            Bitboard::from(Square::A1) | Square::B3.into());
    }

    #[test]
    fn distances_and_directions() {
        let cache = cache();
        assert_eq!(cache.manhattan(Square::A1, Square::H8), 14);
        assert_eq!(cache.chebyshev(Square::A1, Square::H8), 7);
        assert_eq!(cache.manhattan(Square::E4, Square::E4), 0);
        assert_eq!(cache.direction(Square::A1, Square::H8), Some(Direction::NorthEast));
        assert_eq!(cache.direction(Square::E4, Square::E1), Some(Direction::South));
        assert_eq!(cache.direction(Square::E4, Square::A8), Some(Direction::NorthWest));
        assert_eq!(cache.direction(Square::E4, Square::E4), None);
    }

    #[test]
    fn every_distinct_pair_has_a_direction() {
        let cache = cache();
        assert_eq!(cache.direction(Square::A1, Square::B3), Some(Direction::NorthEast));
        assert_eq!(cache.direction(Square::G1, Square::F3), Some(Direction::NorthWest));
        assert_eq!(cache.direction(Square::E4, Square::D1), Some(Direction::SouthWest));
        for from in Square::all() {
            for to in Square::all() {
                assert_eq!(cache.direction(from, to).is_none(), from == to, "{}-{}", from, to);
            }
        }
        // only aligned pairs have squares between them
        assert!(cache.between(Square::A1, Square::C2).is_empty());
    }

    #[test]
    fn describe_lists_every_table() {
        let text = cache().describe(Square::E4);
        assert!(text.contains("knight attacks (e4):"));
        assert!(text.contains("queen rays (e4):"));
        assert!(text.ends_with("knight offsets: [-17, -15, -10, -6, 6, 10, 15, 17]"));
    }
}
