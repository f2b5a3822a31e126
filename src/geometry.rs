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

//! Slider geometry shared by both attack-hashing backends: the relevant-occupancy masks,
//! true ray-casting attacks, and the subset-enumeration scheme used to build either backend's
//! tables. Unlike [`crate::magic`] and [`crate::pext`], this module is always compiled - both
//! backends need the same masks and the same ground-truth attack function to build against.

use crate::{
    bitboard::Bitboard,
    direction::Direction,
    square::Square,
};

#[must_use]
/// The relevant-occupancy mask for a rook standing on `sq`.
pub(crate) fn rook_mask(sq: Square) -> Bitboard {
    directional_rays(sq, Direction::ROOK_DIRECTIONS, Bitboard::EMPTY, true)
}

#[must_use]
/// The relevant-occupancy mask for a bishop standing on `sq`.
pub(crate) fn bishop_mask(sq: Square) -> Bitboard {
    directional_rays(sq, Direction::BISHOP_DIRECTIONS, Bitboard::EMPTY, true)
}

#[must_use]
/// True slider attacks (no edge truncation): ground truth for both the magic and PEXT backends,
/// and for the `squares_between`/`line_of_sight` derivation in [`crate::lookup`].
pub(crate) fn slider_attacks(sq: Square, dirs: [Direction; 4], occupancy: Bitboard) -> Bitboard {
    directional_rays(sq, dirs, occupancy, false)
}

/// Attacks for a slider on `sq` moving along `dirs`, terminating on (and including) the first
/// occupied square in each direction. If `stop_before_edge` is set, the final square of each ray
/// is excluded (used to build masks, since edge squares can never block anything further).
fn directional_rays(
    sq: Square,
    dirs: [Direction; 4],
    occupancy: Bitboard,
    stop_before_edge: bool,
) -> Bitboard {
    let mut result = Bitboard::EMPTY;
    for dir in dirs {
        let mut rank = sq.rank() as i8;
        let mut file = sq.file() as i8;
        loop {
            let (dr, df) = step_delta(dir);
            rank += dr;
            file += df;
            let Some(next) = Square::from_file_rank(file, rank) else { break };
            let is_edge = stop_before_edge
                && (next.rank() == 0 || next.rank() == 7 || next.file() == 0 || next.file() == 7);
            let blocked = occupancy.contains(next);
            if is_edge && !blocked {
                break;
            }
            result.insert(next);
            if blocked {
                break;
            }
        }
    }
    result
}

/// The (rank, file) delta of a single step in `dir`. `Direction` only knows how to shift whole
/// bitboards, so this geometry (which walks one square at a time to detect board edges) recovers
/// the per-axis deltas directly.
fn step_delta(dir: Direction) -> (i8, i8) {
    match dir {
        Direction::NORTH => (-1, 0),
        Direction::SOUTH => (1, 0),
        Direction::EAST => (0, 1),
        Direction::WEST => (0, -1),
        Direction::NORTHEAST => (-1, 1),
        Direction::NORTHWEST => (-1, -1),
        Direction::SOUTHEAST => (1, 1),
        Direction::SOUTHWEST => (1, -1),
        _ => unreachable!("no other directions are used for sliding attacks"),
    }
}

#[must_use]
/// The `index`th subset of `mask`'s set bits, per a standard bit-enumeration scheme: bit *i* of
/// `index` selects whether the *i*th lowest set bit of `mask` is present in the result.
pub(crate) fn index_to_occupancy(index: usize, mask: Bitboard) -> Bitboard {
    let mut result = Bitboard::EMPTY;
    let mut remaining = mask;
    let mut i = 0;
    while let Some(sq) = remaining.pop_square() {
        if index & (1 << i) != 0 {
            result.insert(sq);
        }
        i += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_mask_excludes_edges() {
        // a1's rook mask should run up the a-file and along rank 1, excluding both the h1 and
        // a8 edge squares and the source square itself.
        let mask = rook_mask(Square::A1);
        assert!(!mask.contains(Square::H1));
        assert!(!mask.contains(Square::A8));
        assert!(!mask.contains(Square::A1));
        assert!(mask.contains(Square::A2));
        assert!(mask.contains(Square::B1));
    }

    #[test]
    fn bishop_mask_excludes_ring() {
        let mask = bishop_mask(Square::D4);
        assert!(!mask.contains(Square::A1));
        assert!(!mask.contains(Square::G7));
        assert!(mask.contains(Square::C3));
    }

    #[test]
    fn index_to_occupancy_round_trips() {
        let mask = Bitboard(0b1111);
        for i in 0..16u64 {
            assert_eq!(index_to_occupancy(i as usize, mask), Bitboard(i));
        }
    }

    #[test]
    fn rook_attacks_stop_at_first_blocker() {
        // Rook on a1, blockers on a3 and c1: attacks reach a2,a3 (inclusive) and b1,c1
        // (inclusive), but not past either blocker.
        let occ = Bitboard::from_square(Square::A3).with_square(Square::C1);
        let attacks = slider_attacks(Square::A1, Direction::ROOK_DIRECTIONS, occ);
        assert!(attacks.contains(Square::A2));
        assert!(attacks.contains(Square::A3));
        assert!(!attacks.contains(Square::A4));
        assert!(attacks.contains(Square::B1));
        assert!(attacks.contains(Square::C1));
        assert!(!attacks.contains(Square::D1));
    }
}
