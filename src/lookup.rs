/*
  Perftwright, a chess move-generation and perft engine.
  Copyright (C) 2022 The Perftwright Authors.

  Perftwright is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Perftwright is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! The precomputed attack lookup table: knight/king rings, sliding-piece attacks, and the
//! between-squares/line-of-sight tables derived from them. Built once and then treated as
//! read-only for the lifetime of the program.

use std::path::{Path, PathBuf};

use crate::{
    bitboard::Bitboard,
    direction::{KING_STEPS, KNIGHT_STEPS},
    error::LookupTableError,
    piece::PieceType,
    square::{Square, ALL_SQUARES},
};

#[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
use crate::magic::MagicTables;
#[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
use crate::pext::MagicTables;

/// The environment variable that overrides the default magic-numbers file path. Unused on
/// BMI2-enabled builds, since those never touch the filesystem.
pub const MAGIC_FILE_ENV_VAR: &str = "PERFTWRIGHT_MAGIC_FILE";

/// The default magic-numbers path, relative to the current working directory.
const DEFAULT_MAGIC_FILE: &str = "magic_numbers/magics.txt";

#[must_use]
/// The magic-numbers file path: `$PERFTWRIGHT_MAGIC_FILE` if set, else [`DEFAULT_MAGIC_FILE`].
pub fn default_magic_file_path() -> PathBuf {
    std::env::var_os(MAGIC_FILE_ENV_VAR).map_or_else(|| PathBuf::from(DEFAULT_MAGIC_FILE), PathBuf::from)
}

/// A precomputed attack table for every piece type, on every square, under every occupancy.
/// Immutable once built; `Sync` so a caller may freely share it across threads (this crate never
/// does so itself).
pub struct LookupTable {
    knight_attacks: [Bitboard; 64],
    king_attacks: [Bitboard; 64],
    sliders: MagicTables,
    squares_between: Box<[[Bitboard; 64]; 64]>,
    line_of_sight: Box<[[Bitboard; 64]; 64]>,
}

impl LookupTable {
    /// Build a lookup table, using a freshly-seeded PRNG and the default (or
    /// `PERFTWRIGHT_MAGIC_FILE`-overridden) magic-numbers path. This is the entry point almost
    /// every caller wants; [`LookupTable::with_magic_file`] exists for tests that need a scratch
    /// path instead of the repository's working copy.
    pub fn new() -> Result<LookupTable, LookupTableError> {
        Self::with_magic_file(&mut fastrand::Rng::new(), &default_magic_file_path())
    }

    /// Build a lookup table, sourcing (and persisting new) magic numbers at `path` using `rng`.
    /// On BMI2-enabled builds `rng` and `path` are accepted but ignored: there is no magic search
    /// to seed and no file to persist to, since `pext` is already a perfect hash.
    #[cfg_attr(
        all(target_arch = "x86_64", target_feature = "bmi2"),
        allow(unused_variables)
    )]
    pub fn with_magic_file(
        rng: &mut fastrand::Rng,
        path: &Path,
    ) -> Result<LookupTable, LookupTableError> {
        let knight_attacks = step_attacks(&KNIGHT_STEPS, 2);
        let king_attacks = step_attacks(&KING_STEPS, 1);

        #[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
        let sliders = MagicTables::build();
        #[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
        let sliders = MagicTables::load_or_build(rng, path)?;

        let mut table = LookupTable {
            knight_attacks,
            king_attacks,
            sliders,
            squares_between: Box::new([[Bitboard::EMPTY; 64]; 64]),
            line_of_sight: Box::new([[Bitboard::EMPTY; 64]; 64]),
        };
        table.fill_between_and_line_of_sight();
        Ok(table)
    }

    #[must_use]
    /// The set of squares attacked by a `piece_type` standing on `square`, given `occupancy`
    /// (color-agnostic: every occupied square blocks, regardless of whose piece it is).
    ///
    /// # Panics
    ///
    /// Panics if `piece_type` is [`PieceType::Empty`]: there is no such thing as an "attack" by
    /// no piece, and this crate's own move generator never asks the table for one.
    pub fn attacks(&self, square: Square, piece_type: PieceType, occupancy: Bitboard) -> Bitboard {
        match piece_type {
            PieceType::Knight => self.knight_attacks[square as usize],
            PieceType::King => self.king_attacks[square as usize],
            PieceType::Bishop => self.sliders.bishop[square as usize].attacks(occupancy),
            PieceType::Rook => self.sliders.rook[square as usize].attacks(occupancy),
            PieceType::Queen => {
                self.sliders.bishop[square as usize].attacks(occupancy)
                    | self.sliders.rook[square as usize].attacks(occupancy)
            }
            PieceType::Pawn | PieceType::Empty => {
                unreachable!("pawn attacks are computed by shifts, not looked up; Empty has none")
            }
        }
    }

    #[must_use]
    /// The exclusive ray of squares strictly between `s1` and `s2` if they share a rank, file, or
    /// diagonal; [`Bitboard::EMPTY`] otherwise (including when `s1 == s2`).
    pub fn squares_between(&self, s1: Square, s2: Square) -> Bitboard {
        self.squares_between[s1 as usize][s2 as usize]
    }

    #[must_use]
    /// The full rank/file/diagonal line through `s1` and `s2`, extended to both board edges,
    /// inclusive of both squares, if they are colinear; [`Bitboard::EMPTY`] otherwise.
    pub fn line_of_sight(&self, s1: Square, s2: Square) -> Bitboard {
        self.line_of_sight[s1 as usize][s2 as usize]
    }

    /// Populate `squares_between` and `line_of_sight` from the now-complete slider attack tables.
    fn fill_between_and_line_of_sight(&mut self) {
        for &s1 in &ALL_SQUARES {
            for &s2 in &ALL_SQUARES {
                if s1 == s2 {
                    continue;
                }
                let piece_type =
                    if same_rank_or_file(s1, s2) { PieceType::Rook } else { PieceType::Bishop };
                if !colinear(s1, s2) {
                    continue;
                }
                let both = Bitboard::from_square(s1).with_square(s2);
                let rays1 = self.attacks(s1, piece_type, both);
                let rays2 = self.attacks(s2, piece_type, both);
                self.squares_between[s1 as usize][s2 as usize] = rays1 & rays2;

                let full1 = self.attacks(s1, piece_type, Bitboard::EMPTY);
                let full2 = self.attacks(s2, piece_type, Bitboard::EMPTY);
                let line = (full1 & full2).with_square(s1).with_square(s2);
                self.line_of_sight[s1 as usize][s2 as usize] = line;
            }
        }
    }
}

#[must_use]
fn same_rank_or_file(a: Square, b: Square) -> bool {
    a.rank() == b.rank() || a.file() == b.file()
}

#[must_use]
fn same_diagonal(a: Square, b: Square) -> bool {
    let (ar, af) = (i16::from(a.rank()), i16::from(a.file()));
    let (br, bf) = (i16::from(b.rank()), i16::from(b.file()));
    ar - af == br - bf || ar + af == br + bf
}

#[must_use]
fn colinear(a: Square, b: Square) -> bool {
    same_rank_or_file(a, b) || same_diagonal(a, b)
}

/// Build a leaper's (knight or king) attack table by enumerating `(file, rank)` offsets and
/// discarding any that would leave the board or, for the king, travel more than one square in
/// either axis (this guards against the two-square wraparound a naive delta could produce).
fn step_attacks(steps: &[(i8, i8)], max_chebyshev: i8) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    for &sq in &ALL_SQUARES {
        let mut attacks = Bitboard::EMPTY;
        for &(df, dr) in steps {
            let file = sq.file() as i8 + df;
            let rank = sq.rank() as i8 + dr;
            if df.abs().max(dr.abs()) > max_chebyshev {
                continue;
            }
            if let Some(target) = Square::from_file_rank(file, rank) {
                attacks.insert(target);
            }
        }
        table[sq as usize] = attacks;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_attacks_from_corner() {
        let table = LookupTable::new().unwrap();
        let attacks = table.attacks(Square::A1, PieceType::Knight, Bitboard::EMPTY);
        assert_eq!(attacks.len(), 2);
        assert!(attacks.contains(Square::B3));
        assert!(attacks.contains(Square::C2));
    }

    #[test]
    fn king_attacks_from_center() {
        let table = LookupTable::new().unwrap();
        let attacks = table.attacks(Square::D4, PieceType::King, Bitboard::EMPTY);
        assert_eq!(attacks.len(), 8);
    }

    #[test]
    fn queen_is_union_of_rook_and_bishop() {
        let table = LookupTable::new().unwrap();
        let occ = Bitboard::from_square(Square::D1).with_square(Square::A4);
        let queen = table.attacks(Square::D4, PieceType::Queen, occ);
        let rook = table.attacks(Square::D4, PieceType::Rook, occ);
        let bishop = table.attacks(Square::D4, PieceType::Bishop, occ);
        assert_eq!(queen, rook | bishop);
    }

    #[test]
    fn between_is_symmetric_and_empty_off_line() {
        let table = LookupTable::new().unwrap();
        assert_eq!(
            table.squares_between(Square::A1, Square::A8),
            table.squares_between(Square::A8, Square::A1)
        );
        assert!(table.squares_between(Square::A1, Square::A8).contains(Square::A4));
        assert_eq!(table.squares_between(Square::A1, Square::B3), Bitboard::EMPTY);
    }

    #[test]
    fn line_of_sight_is_symmetric_and_extends_to_edges() {
        let table = LookupTable::new().unwrap();
        let line = table.line_of_sight(Square::D4, Square::F6);
        assert_eq!(line, table.line_of_sight(Square::F6, Square::D4));
        assert!(line.contains(Square::A1));
        assert!(line.contains(Square::H8));
    }
}
