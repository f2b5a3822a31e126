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

//! Legal move enumeration. Each piece's reachable squares form a "map" from an origin square (or
//! set of origin squares, for pawn pushes/attacks) to a set of destinations: a single piece's
//! moves are an *injective* map (one origin, many destinations), a pawn push/attack is a
//! *bijective* map (shift every origin by a constant offset), and nothing in this generator
//! produces the rarer *surjective* shape (many origins collapsing onto one destination), though
//! it is a meaningful map shape for e.g. multiple pieces attacking the same square. Every map is
//! expanded into concrete [`Move`] values up front rather than walked lazily, so the generator is
//! a flat, easily-audited list builder instead of a lazily-stepped iterator.

use crate::{
    bitboard::Bitboard,
    board::{ChessBoard, Move},
    castling,
    color::Color,
    lookup::LookupTable,
    piece::{Piece, PieceType},
    square::Square,
};

/// Every legal move available to the side to move in a given position, in the order they were
/// generated. Consumed back-to-front via [`MoveSet::pop`], which is cheap (`Vec::pop`) and whose
/// order has no bearing on perft node counts.
pub struct MoveSet {
    moves: Vec<Move>,
}

impl MoveSet {
    #[must_use]
    /// Generate every legal move available to `board.turn` in `board`.
    pub fn fill(lookup: &LookupTable, board: &ChessBoard) -> MoveSet {
        let mut moves = Vec::with_capacity(48);
        let us_color = board.turn;
        let king_sq = board.king_square(us_color);
        let checking = board.checking(lookup);
        let num_checks = checking.len();
        let check_mask = match num_checks {
            0 => Bitboard::ALL,
            1 => {
                let checker = checking.lowest_square().expect("num_checks == 1");
                checking | lookup.squares_between(king_sq, checker)
            }
            _ => Bitboard::EMPTY,
        };
        let attacked = board.attacked(lookup);
        let pinned = board.pinned(lookup);
        let occ = board.occupancy();
        let us = board.us();
        let them = board.them();

        generate_king_moves(board, lookup, &mut moves, king_sq, us, attacked);

        if num_checks == 0 {
            generate_castling(board, &mut moves, attacked, occ);
        }

        if num_checks == 2 {
            // Double check: only the king may move.
            return MoveSet { moves };
        }

        for &piece_type in &[PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen] {
            for sq in board.types[piece_type as usize] & us {
                let mut to = lookup.attacks(sq, piece_type, occ) & !us & check_mask;
                if pinned.contains(sq) {
                    to &= lookup.line_of_sight(king_sq, sq);
                }
                for dest in to {
                    moves.push(simple_move(board, piece_type, sq, dest));
                }
            }
        }

        generate_pawn_moves(board, lookup, &mut moves, king_sq, pinned, check_mask, occ, them);
        generate_en_passant(board, lookup, &mut moves, king_sq, pinned, check_mask);

        MoveSet { moves }
    }

    #[must_use]
    /// The number of legal moves in this set.
    pub fn count(&self) -> u64 {
        self.moves.len() as u64
    }

    #[must_use]
    /// Whether this set has any moves left.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Remove and return one move, or `None` once the set is exhausted.
    pub fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    #[cfg(feature = "multiply")]
    pub(crate) fn moves_mut(&mut self) -> &mut Vec<Move> {
        &mut self.moves
    }
}

fn simple_move(board: &ChessBoard, piece_type: PieceType, from: Square, to: Square) -> Move {
    Move {
        from: Piece::new(piece_type, from),
        to: Piece::new(piece_type, to),
        captured: Piece::new(board.squares[to as usize], to),
        prior_en_passant: board.en_passant,
        prior_castling: board.castling,
    }
}

fn generate_king_moves(
    board: &ChessBoard,
    lookup: &LookupTable,
    moves: &mut Vec<Move>,
    king_sq: Square,
    us: Bitboard,
    attacked: Bitboard,
) {
    let to = lookup.attacks(king_sq, PieceType::King, Bitboard::EMPTY) & !us & !attacked;
    for dest in to {
        moves.push(simple_move(board, PieceType::King, king_sq, dest));
    }
}

fn generate_castling(board: &ChessBoard, moves: &mut Vec<Move>, attacked: Bitboard, occ: Bitboard) {
    let color = board.turn;
    let king_home = castling::king_home(color);
    let has_right = |sq: Square| board.castling.contains(king_home) && board.castling.contains(sq);

    if has_right(castling::kingside_rook_home(color))
        && (castling::kingside_occupancy_mask(color) & occ).is_empty()
        && (castling::kingside_attack_mask(color) & attacked).is_empty()
    {
        let dest = castling::kingside_king_dest(color);
        moves.push(Move {
            from: Piece::new(PieceType::King, king_home),
            to: Piece::new(PieceType::King, dest),
            captured: Piece::empty(dest),
            prior_en_passant: board.en_passant,
            prior_castling: board.castling,
        });
    }
    if has_right(castling::queenside_rook_home(color))
        && (castling::queenside_occupancy_mask(color) & occ).is_empty()
        && (castling::queenside_attack_mask(color) & attacked).is_empty()
    {
        let dest = castling::queenside_king_dest(color);
        moves.push(Move {
            from: Piece::new(PieceType::King, king_home),
            to: Piece::new(PieceType::King, dest),
            captured: Piece::empty(dest),
            prior_en_passant: board.en_passant,
            prior_castling: board.castling,
        });
    }
}

/// Push `from -> to` as either a plain pawn move or, if `to` lands on the promotion rank, all four
/// promotion variants.
fn push_pawn_move(board: &ChessBoard, moves: &mut Vec<Move>, from: Square, to: Square, color: Color) {
    let captured = Piece::new(board.squares[to as usize], to);
    if to.rank() == color.promotion_rank() {
        for &promo in &PieceType::PROMOTIONS {
            moves.push(Move {
                from: Piece::new(PieceType::Pawn, from),
                to: Piece::new(promo, to),
                captured,
                prior_en_passant: board.en_passant,
                prior_castling: board.castling,
            });
        }
    } else {
        moves.push(Move {
            from: Piece::new(PieceType::Pawn, from),
            to: Piece::new(PieceType::Pawn, to),
            captured,
            prior_en_passant: board.en_passant,
            prior_castling: board.castling,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn generate_pawn_moves(
    board: &ChessBoard,
    lookup: &LookupTable,
    moves: &mut Vec<Move>,
    king_sq: Square,
    pinned: Bitboard,
    check_mask: Bitboard,
    occ: Bitboard,
    them: Bitboard,
) {
    let color = board.turn;
    let forward: i8 = if color == Color::White { -1 } else { 1 };

    for sq in board.types[PieceType::Pawn as usize] & board.us() {
        let file = sq.file() as i8;
        let rank = sq.rank() as i8;
        let allowed = if pinned.contains(sq) { lookup.line_of_sight(king_sq, sq) } else { Bitboard::ALL };

        if let Some(push1) = Square::from_file_rank(file, rank + forward) {
            let push1_empty = !occ.contains(push1);
            if push1_empty && check_mask.contains(push1) && allowed.contains(push1) {
                push_pawn_move(board, moves, sq, push1, color);
            }
            if push1_empty && sq.rank() == color.pawn_start_rank() {
                if let Some(push2) = Square::from_file_rank(file, rank + 2 * forward) {
                    if !occ.contains(push2) && check_mask.contains(push2) && allowed.contains(push2) {
                        push_pawn_move(board, moves, sq, push2, color);
                    }
                }
            }
        }

        for &df in &[-1i8, 1i8] {
            let Some(diag) = Square::from_file_rank(file + df, rank + forward) else { continue };
            if them.contains(diag) && check_mask.contains(diag) && allowed.contains(diag) {
                push_pawn_move(board, moves, sq, diag, color);
            }
        }
    }
}

/// The full rank mask (all 8 squares) containing `sq`.
fn rank_mask(sq: Square) -> Bitboard {
    Bitboard(0xFFu64 << (8 * sq.rank()))
}

fn generate_en_passant(
    board: &ChessBoard,
    lookup: &LookupTable,
    moves: &mut Vec<Move>,
    king_sq: Square,
    pinned: Bitboard,
    check_mask: Bitboard,
) {
    let Some(target) = board.en_passant else { return };
    let color = board.turn;
    let forward: i8 = if color == Color::White { -1 } else { 1 };
    let target_file = target.file() as i8;
    let captured_sq = Square::from_file_rank(target_file, target.rank() as i8 - forward)
        .expect("en-passant target always has an adjacent captured pawn");

    for &df in &[-1i8, 1i8] {
        let Some(from) = Square::from_file_rank(target_file + df, target.rank() as i8 - forward) else {
            continue;
        };
        if board.squares[from as usize] != PieceType::Pawn || !board.us().contains(from) {
            continue;
        }
        if !check_mask.contains(target) && !check_mask.contains(captured_sq) {
            continue;
        }
        if pinned.contains(from) && !lookup.line_of_sight(king_sq, from).contains(target) {
            continue;
        }

        let occ_after = board.occupancy() & !Bitboard::from_square(from) & !Bitboard::from_square(captured_sq);
        let enemy_rank_attackers = (board.types[PieceType::Rook as usize] | board.types[PieceType::Queen as usize])
            & board.them();
        let exposed = lookup.attacks(king_sq, PieceType::Rook, occ_after)
            & rank_mask(king_sq)
            & enemy_rank_attackers;
        if !exposed.is_empty() {
            continue;
        }

        moves.push(Move {
            from: Piece::new(PieceType::Pawn, from),
            to: Piece::new(PieceType::Pawn, target),
            captured: Piece::new(PieceType::Pawn, captured_sq),
            prior_en_passant: board.en_passant,
            prior_castling: board.castling,
        });
    }
}

#[cfg(feature = "multiply")]
/// The depth-2 "multiply" optimization: partitions `ms` into moves that disrupt the opponent's
/// mobility from `baseline` (a position with only the side to move flipped) and moves that
/// provably don't, crediting the latter `baseline` nodes each without recursing into them.
/// Returns the node count contributed by the non-disrupting moves; the caller is left to recurse
/// over whatever remains in `ms`.
///
/// A move is conservatively classified as disrupting whenever it: captures, castles, is an
/// en-passant capture, is a promotion, or touches (as origin or destination) the disruption mask
/// computed by [`disruption_mask`]. Anything not flagged by one of those checks is assumed to
/// leave the opponent's move count unchanged from `baseline`.
pub(crate) fn multiply(lookup: &LookupTable, board: &ChessBoard, ms: &mut MoveSet) -> u64 {
    let mut flipped = *board;
    flipped.turn = !board.turn;
    let baseline = MoveSet::fill(lookup, &flipped).count();

    let disruption = disruption_mask(board);
    let mut removed = 0u64;
    ms.moves_mut().retain(|m| {
        let disrupts = m.is_capture()
            || m.is_castle()
            || m.is_en_passant()
            || m.is_promotion()
            || disruption.contains(m.from.square)
            || disruption.contains(m.to.square);
        if disrupts {
            true
        } else {
            removed += 1;
            false
        }
    });
    removed * baseline
}

#[cfg(feature = "multiply")]
/// The union of squares a move might touch that would change the opponent's mobility count:
/// their own pieces (captures), squares their sliders could move to (blocks), their king's ring,
/// our pin rays against their king, our double-push/en-passant squares, our promotion rank, and
/// our castling king-destination squares. See `SPEC_FULL.md` section 4.4 for the derivation.
fn disruption_mask(board: &ChessBoard) -> Bitboard {
    let us = board.turn;
    let opp = !us;
    let occ = board.occupancy();
    let opp_king_sq = board.king_square(opp);

    let mut mask = board.colors[opp as usize];

    for piece_type in [PieceType::Bishop, PieceType::Rook, PieceType::Queen] {
        for sq in board.types[piece_type as usize] & board.colors[opp as usize] {
            mask |= slider_reach(board, sq, piece_type, occ);
        }
    }

    mask |= Bitboard::from_square(opp_king_sq);
    mask |= king_ring(opp_king_sq);

    for piece_type in [PieceType::Bishop, PieceType::Rook, PieceType::Queen] {
        for sq in board.types[piece_type as usize] & board.colors[us as usize] {
            mask |= colinear_ray(board, opp_king_sq, sq, piece_type);
        }
    }

    mask |= rank_mask(Square::from_file_rank(0, us.double_push_rank() as i8).unwrap());
    if let Some(ep) = board.en_passant {
        mask.insert(ep);
    }
    mask |= rank_mask(Square::from_file_rank(0, us.promotion_rank() as i8).unwrap());
    mask.insert(castling::kingside_king_dest(us));
    mask.insert(castling::queenside_king_dest(us));

    mask
}

#[cfg(feature = "multiply")]
fn slider_reach(board: &ChessBoard, sq: Square, piece_type: PieceType, occ: Bitboard) -> Bitboard {
    match piece_type {
        PieceType::Bishop => crate::geometry::slider_attacks(sq, crate::direction::Direction::BISHOP_DIRECTIONS, occ),
        PieceType::Rook => crate::geometry::slider_attacks(sq, crate::direction::Direction::ROOK_DIRECTIONS, occ),
        PieceType::Queen => {
            crate::geometry::slider_attacks(sq, crate::direction::Direction::BISHOP_DIRECTIONS, occ)
                | crate::geometry::slider_attacks(sq, crate::direction::Direction::ROOK_DIRECTIONS, occ)
        }
        _ => Bitboard::EMPTY,
    }
}

#[cfg(feature = "multiply")]
fn king_ring(king_sq: Square) -> Bitboard {
    let mut ring = Bitboard::EMPTY;
    for &(df, dr) in &crate::direction::KING_STEPS {
        if let Some(sq) = Square::from_file_rank(king_sq.file() as i8 + df, king_sq.rank() as i8 + dr) {
            ring.insert(sq);
        }
    }
    ring
}

#[cfg(feature = "multiply")]
fn colinear_ray(board: &ChessBoard, king_sq: Square, slider_sq: Square, piece_type: PieceType) -> Bitboard {
    let occ = board.occupancy();
    let reach = slider_reach(board, slider_sq, piece_type, occ);
    if reach.contains(king_sq) || crate::geometry::slider_attacks(
        king_sq,
        if piece_type == PieceType::Bishop {
            crate::direction::Direction::BISHOP_DIRECTIONS
        } else {
            crate::direction::Direction::ROOK_DIRECTIONS
        },
        occ,
    )
    .contains(slider_sq)
    {
        Bitboard::from_square(slider_sq).with_square(king_sq)
    } else {
        Bitboard::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ChessBoard;

    fn lookup() -> LookupTable {
        LookupTable::new().unwrap()
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        let table = lookup();
        let board =
            ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        let ms = MoveSet::fill(&table, &board);
        assert_eq!(ms.count(), 20);
    }

    #[test]
    fn single_check_restricts_to_block_or_capture_or_king_move() {
        let table = lookup();
        let board = ChessBoard::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        let ms = MoveSet::fill(&table, &board);
        // King has no safe squares on the e-file or flanking the rook except off the file;
        // every legal move must either move the king off the check ray or capture the rook.
        assert!(ms.count() > 0);
    }

    #[test]
    fn double_check_only_allows_king_moves() {
        let table = lookup();
        // White king on e1, attacked by both a rook on e8 and a knight delivering check from d3.
        let board = ChessBoard::from_fen("4r3/8/8/8/8/3n4/8/4K3 w - - 0 1").unwrap();
        let ms = MoveSet::fill(&table, &board);
        for m in &ms.moves {
            assert_eq!(m.from.piece_type, PieceType::King);
        }
    }

    #[test]
    fn en_passant_pseudo_pin_is_rejected() {
        let table = lookup();
        // White king a5, black rook h5, white pawn b5, black pawn c7-c5 just played (ep target c6).
        // Capturing en passant would remove both b5 and c5 from the 5th rank, exposing the king
        // to the rook on h5.
        let mut board = ChessBoard::from_fen("8/2p5/8/KP5r/8/8/8/8 b - - 0 1").unwrap();
        let m = Move {
            from: Piece::new(PieceType::Pawn, Square::C7),
            to: Piece::new(PieceType::Pawn, Square::C5),
            captured: Piece::empty(Square::C5),
            prior_en_passant: None,
            prior_castling: Bitboard::EMPTY,
        };
        board.play(m);
        assert_eq!(board.en_passant, Some(Square::C6));
        let ms = MoveSet::fill(&table, &board);
        assert!(!ms.moves.iter().any(|mv| mv.is_en_passant()));
    }
}
