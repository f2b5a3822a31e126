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

//! Sliding-piece attacks hashed with `x86_64`'s BMI2 `pext` instruction instead of magic
//! bitboards. `pext(occupancy, mask)` gathers the bits of `occupancy` selected by `mask` into
//! contiguous low-order bits, which is already a perfect, collision-free hash over the subsets of
//! `mask` - no search, no persistence, no PRNG required. This module is compiled in place of
//! [`crate::magic`] whenever the target supports the instruction; see `LookupTable::new`.

use std::arch::x86_64::_pext_u64;

use crate::{
    bitboard::Bitboard,
    direction::Direction,
    geometry::{bishop_mask, index_to_occupancy, rook_mask, slider_attacks},
    square::{Square, ALL_SQUARES},
};

/// A square's mask plus its precomputed attack table, indexed by `pext(occupancy, mask)`.
pub(crate) struct SquareAttacks {
    mask: Bitboard,
    attacks: Vec<Bitboard>,
}

impl SquareAttacks {
    #[must_use]
    pub(crate) fn attacks(&self, occupancy: Bitboard) -> Bitboard {
        // SAFETY: this module is only compiled on x86_64 targets with BMI2 enabled.
        let idx = unsafe { _pext_u64(occupancy.as_u64(), self.mask.as_u64()) };
        self.attacks[idx as usize]
    }
}

/// The complete set of PEXT-indexed tables for both sliding piece types.
pub(crate) struct MagicTables {
    pub(crate) rook: [SquareAttacks; 64],
    pub(crate) bishop: [SquareAttacks; 64],
}

impl MagicTables {
    /// Build the PEXT attack tables. Unlike the magic-bitboard fallback this can never fail:
    /// there is no search and no file I/O, so the `rng`/`path` parameters the fallback needs are
    /// absent entirely (the whole point of compiling this module in is to delete that machinery).
    pub(crate) fn build() -> MagicTables {
        let rook = build_tables(rook_mask, Direction::ROOK_DIRECTIONS);
        let bishop = build_tables(bishop_mask, Direction::BISHOP_DIRECTIONS);
        MagicTables { rook, bishop }
    }
}

fn build_tables(mask_fn: fn(Square) -> Bitboard, dirs: [Direction; 4]) -> [SquareAttacks; 64] {
    let mut out = Vec::with_capacity(64);
    for &sq in &ALL_SQUARES {
        let mask = mask_fn(sq);
        let mut attacks = vec![Bitboard::EMPTY; 1usize << mask.len()];
        for subset in 0..attacks.len() {
            let occupancy = index_to_occupancy(subset, mask);
            // SAFETY: this module is only compiled on x86_64 targets with BMI2 enabled.
            let idx = unsafe { _pext_u64(occupancy.as_u64(), mask.as_u64()) };
            attacks[idx as usize] = slider_attacks(sq, dirs, occupancy);
        }
        out.push(SquareAttacks { mask, attacks });
    }
    out.try_into().unwrap_or_else(|_| unreachable!())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pext_matches_plain_slider_attacks() {
        let tables = MagicTables::build();
        let occ = Bitboard::from_square(Square::A3).with_square(Square::C1);
        assert_eq!(
            tables.rook[Square::A1 as usize].attacks(occ),
            slider_attacks(Square::A1, Direction::ROOK_DIRECTIONS, occ)
        );
    }
}
