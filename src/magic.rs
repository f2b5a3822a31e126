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

//! Magic-bitboard hashing for sliding-piece attacks. Compiled only when the target does not
//! support BMI2's `pext` instruction; see [`crate::pext`] for the alternative. Both backends
//! share the mask/ray-casting geometry in [`crate::geometry`]; this module adds the
//! multiply-shift search and on-disk persistence the magic-bitboard technique itself needs.
//!
//! A magic number *M* for a square/mask pair is a 64-bit constant such that
//! `((occupancy & mask) * M) >> shift` is a perfect hash over every subset of `mask`: distinct
//! occupancy subsets map to distinct indices. Searching for one is a matter of trying random
//! sparse constants until one happens to produce zero collisions over all `2^popcount(mask)`
//! subsets; there is no known closed-form construction.

use std::{
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    bitboard::Bitboard,
    direction::Direction,
    error::LookupTableError,
    geometry::{bishop_mask, index_to_occupancy, rook_mask, slider_attacks},
    square::{Square, ALL_SQUARES},
};

/// The number of candidate magics to try before giving up on a square. In practice a working
/// magic for either piece type is found within a few thousand tries.
const NUM_MAGIC_TRIES: u32 = 1_000_000;

/// Everything needed to hash an occupancy into an index for one piece type on one square.
pub(crate) struct SquareMagic {
    /// The relevant-occupancy mask: the interior ray squares, excluding the source square and
    /// the board edge in each ray direction (edge squares never change whether a ray is blocked).
    mask: Bitboard,
    magic: u64,
    /// `64 - popcount(mask)`; the right-shift applied after multiplying by `magic`.
    shift: u8,
    /// Precomputed attacks, indexed by `(occupancy & mask).wrapping_mul(magic) >> shift`.
    attacks: Vec<Bitboard>,
}

impl SquareMagic {
    #[must_use]
    fn index(&self, occupancy: Bitboard) -> usize {
        let relevant = occupancy.as_u64() & self.mask.as_u64();
        (relevant.wrapping_mul(self.magic) >> self.shift) as usize
    }

    #[must_use]
    pub(crate) fn attacks(&self, occupancy: Bitboard) -> Bitboard {
        self.attacks[self.index(occupancy)]
    }
}

/// The complete set of magic tables for both sliding piece types.
pub(crate) struct MagicTables {
    pub(crate) rook: [SquareMagic; 64],
    pub(crate) bishop: [SquareMagic; 64],
}

impl MagicTables {
    /// Build magic tables, reusing magic numbers from `path` where present and searching for
    /// (and appending) any that are missing. `rng` is the source of randomness for any search
    /// this call performs; passing the same seeded `rng` across runs makes the search
    /// deterministic.
    pub(crate) fn load_or_build(
        rng: &mut fastrand::Rng,
        path: &Path,
    ) -> Result<MagicTables, LookupTableError> {
        let mut saved = read_saved_magics(path)?;
        // The file stores 128 entries in bishop-then-rook order, per square, squares 0..=63.
        let mut rook = Vec::with_capacity(64);
        let mut bishop = Vec::with_capacity(64);
        let mut newly_found = Vec::new();

        for &sq in &ALL_SQUARES {
            let idx = sq as usize;
            let bishop_mask = bishop_mask(sq);
            let rook_mask = rook_mask(sq);

            let bishop_magic = saved
                .get(idx * 2)
                .copied()
                .filter(|&m| verify_magic(sq, bishop_mask, Direction::BISHOP_DIRECTIONS, m))
                .unwrap_or_else(|| {
                    let m = search_magic(rng, sq, bishop_mask, Direction::BISHOP_DIRECTIONS);
                    newly_found.push(m);
                    m
                });
            let rook_magic = saved
                .get(idx * 2 + 1)
                .copied()
                .filter(|&m| verify_magic(sq, rook_mask, Direction::ROOK_DIRECTIONS, m))
                .unwrap_or_else(|| {
                    let m = search_magic(rng, sq, rook_mask, Direction::ROOK_DIRECTIONS);
                    newly_found.push(m);
                    m
                });

            bishop.push(build_table(sq, bishop_mask, Direction::BISHOP_DIRECTIONS, bishop_magic));
            rook.push(build_table(sq, rook_mask, Direction::ROOK_DIRECTIONS, rook_magic));
        }

        if !newly_found.is_empty() {
            append_magics(path, &newly_found)?;
        }

        Ok(MagicTables {
            rook: rook.try_into().unwrap_or_else(|_| unreachable!()),
            bishop: bishop.try_into().unwrap_or_else(|_| unreachable!()),
        })
    }
}

/// Check that `magic` is a collision-free hash for every subset of `mask`.
fn verify_magic(sq: Square, mask: Bitboard, dirs: [Direction; 4], magic: u64) -> bool {
    let shift = 64 - mask.len() as u8;
    let mut seen = vec![None; 1usize << mask.len()];
    for subset in 0..(1usize << mask.len()) {
        let occupancy = index_to_occupancy(subset, mask);
        let attack = slider_attacks(sq, dirs, occupancy);
        let key = ((occupancy.as_u64().wrapping_mul(magic)) >> shift) as usize;
        match seen[key] {
            None => seen[key] = Some(attack),
            Some(existing) if existing == attack => {}
            Some(_) => return false,
        }
    }
    true
}

/// Draw random sparse 64-bit candidates until one hashes `mask` collision-free.
fn search_magic(rng: &mut fastrand::Rng, sq: Square, mask: Bitboard, dirs: [Direction; 4]) -> u64 {
    for _ in 0..NUM_MAGIC_TRIES {
        let candidate = random_sparse_u64(rng);
        if verify_magic(sq, mask, dirs, candidate) {
            return candidate;
        }
    }
    panic!("failed to find a magic number for square {sq} after {NUM_MAGIC_TRIES} tries");
}

/// ANDing three random 64-bit draws together biases the result towards a low popcount, which in
/// turn biases the multiply-shift hash towards fewer collisions. This is the standard trick used
/// by every magic-bitboard implementation.
fn random_sparse_u64(rng: &mut fastrand::Rng) -> u64 {
    rng.u64(..) & rng.u64(..) & rng.u64(..)
}

fn build_table(sq: Square, mask: Bitboard, dirs: [Direction; 4], magic: u64) -> SquareMagic {
    let shift = 64 - mask.len() as u8;
    let mut attacks = vec![Bitboard::EMPTY; 1usize << mask.len()];
    for subset in 0..(1usize << mask.len()) {
        let occupancy = index_to_occupancy(subset, mask);
        let key = ((occupancy.as_u64().wrapping_mul(magic)) >> shift) as usize;
        attacks[key] = slider_attacks(sq, dirs, occupancy);
    }
    SquareMagic { mask, magic, shift, attacks }
}

/// Read whatever magic numbers are already on disk. Returns an empty list (not an error) if the
/// file does not exist yet; any other I/O failure, or a line that fails to parse as a `u64`, is
/// reported.
fn read_saved_magics(path: &Path) -> Result<Vec<u64>, LookupTableError> {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(LookupTableError::Io(e)),
    };
    let reader = BufReader::new(file);
    let mut magics = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(LookupTableError::Io)?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed
            .parse::<u64>()
            .map_err(|_| LookupTableError::Parse { line: i + 1, text: trimmed.to_string() })?;
        magics.push(value);
    }
    Ok(magics)
}

/// Append newly-found magic numbers to the magic-numbers file, creating its parent directory and
/// the file itself if necessary.
fn append_magics(path: &Path, magics: &[u64]) -> Result<(), LookupTableError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(LookupTableError::Io)?;
        }
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(LookupTableError::Io)?;
    let mut writer = BufWriter::new(file);
    for magic in magics {
        writeln!(writer, "{magic}").map_err(LookupTableError::Io)?;
    }
    writer.flush().map_err(LookupTableError::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_tables_build_and_answer_queries() {
        let mut rng = fastrand::Rng::with_seed(42);
        let dir = std::env::temp_dir().join(format!("perftwright-test-{}", std::process::id()));
        let path = dir.join("magics.txt");
        let tables = MagicTables::load_or_build(&mut rng, &path).unwrap();
        let occ = Bitboard::from_square(Square::A3).with_square(Square::C1);
        assert_eq!(
            tables.rook[Square::A1 as usize].attacks(occ),
            slider_attacks(Square::A1, Direction::ROOK_DIRECTIONS, occ)
        );
        let _ = std::fs::remove_dir_all(&dir);
    }
}
