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

//! The perft tree-walker: counts the leaves of the legal move tree rooted at a position, to a
//! given depth. This is the canonical correctness benchmark for a move generator - a single wrong
//! node count at some depth pinpoints a move-generation bug long before it would otherwise surface.
//!
//! Two optimizations keep this from being a naive `depth` nested loops:
//! - At `depth == 1`, moves are counted via [`MoveSet::count`] rather than played one at a time,
//!   since the leaf count *is* the move count and playing each move just to immediately undo it
//!   and return `1` wastes a full play/undo cycle per leaf.
//! - At `depth == 2` (gated behind the `multiply` feature, on by default), many of the position's
//!   legal moves provably leave the opponent's reply count unchanged from a `baseline` figure; see
//!   [`crate::moveset::multiply`] for the derivation. Those moves are credited `baseline` nodes
//!   each without recursing into them at all.

use crate::{
    board::{ChessBoard, Move},
    lookup::LookupTable,
    moveset::MoveSet,
};

#[must_use]
/// Count the leaves of the legal move tree rooted at `board`, to `depth` plies. `board` is
/// restored to its original state before this function returns (every played move is undone).
pub fn perft(lookup: &LookupTable, board: &mut ChessBoard, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    if depth == 1 {
        return MoveSet::fill(lookup, board).count();
    }

    let mut ms = MoveSet::fill(lookup, board);
    let mut nodes = 0u64;

    #[cfg(feature = "multiply")]
    if depth == 2 {
        nodes += crate::moveset::multiply(lookup, board, &mut ms);
    }

    while let Some(m) = ms.pop() {
        board.play(m);
        nodes += perft(lookup, board, depth - 1);
        board.undo(m);
    }
    nodes
}

#[must_use]
/// Run perft at the root, returning the per-root-move breakdown (standard perft "divide" output)
/// alongside the total node count. Unlike [`perft`], this never applies the depth-2 multiply
/// optimization at its own level: a divide is only meaningful if every root move is accounted for
/// individually, so the root loop always recurses into each move rather than batching any of them.
/// The multiply optimization may still fire one or more levels below the root, inside the nested
/// [`perft`] calls this function makes.
///
/// Printing is the caller's responsibility (see the `perft` binary); this function only computes.
pub fn divide(lookup: &LookupTable, board: &mut ChessBoard, depth: u8) -> (Vec<(Move, u64)>, u64) {
    if depth == 0 {
        return (Vec::new(), 1);
    }

    let mut ms = MoveSet::fill(lookup, board);
    let mut results = Vec::new();
    let mut total = 0u64;

    while let Some(m) = ms.pop() {
        board.play(m);
        let count = perft(lookup, board, depth - 1);
        board.undo(m);
        total += count;
        results.push((m, count));
    }
    (results, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> LookupTable {
        LookupTable::new().unwrap()
    }

    #[test]
    fn depth_zero_is_always_one() {
        let table = lookup();
        let mut board =
            ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        assert_eq!(perft(&table, &mut board, 0), 1);
    }

    #[test]
    fn perft_restores_the_board() {
        let table = lookup();
        let mut board =
            ChessBoard::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        let before = board;
        perft(&table, &mut board, 3);
        assert_eq!(board, before);
    }

    #[test]
    fn starting_position_shallow_depths() {
        let table = lookup();
        let mut board =
            ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        assert_eq!(perft(&table, &mut board, 1), 20);
        assert_eq!(perft(&table, &mut board, 2), 400);
        assert_eq!(perft(&table, &mut board, 3), 8_902);
    }

    #[test]
    fn divide_sums_to_the_same_total_as_perft() {
        let table = lookup();
        let mut board =
            ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        let (breakdown, total) = divide(&table, &mut board, 3);
        assert_eq!(total, 8_902);
        assert_eq!(breakdown.iter().map(|(_, c)| c).sum::<u64>(), total);
        assert_eq!(breakdown.len(), 20);
    }
}
