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

//! End-to-end perft reference scenarios: each checks that this crate's public API reproduces a
//! published node count for a well-known test position. These are the authoritative fixtures for
//! this crate regardless of any other numbers that may appear elsewhere.

use perftwright::{perft::perft, piece::PieceType, ChessBoard, LookupTable, Move, MoveSet, Piece, Square};

fn perft_assistant(fen: &str, node_counts: &[u64]) {
    let lookup = LookupTable::new().unwrap();
    for (depth, &expected) in node_counts.iter().enumerate() {
        let mut board = ChessBoard::from_fen(fen).unwrap();
        assert_eq!(
            perft(&lookup, &mut board, depth as u8),
            expected,
            "fen {fen:?} depth {depth}"
        );
    }
}

#[test]
fn starting_position() {
    perft_assistant(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        &[1, 20, 400, 8_902, 197_281, 4_865_609],
    );
}

#[test]
fn kiwipete() {
    perft_assistant(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[1, 48, 2_039, 97_862, 4_085_603],
    );
}

#[test]
fn endgame_rook_and_pawns() {
    perft_assistant(
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        &[1, 14, 191, 2_812, 43_238, 674_624],
    );
}

#[test]
fn unbalanced_position() {
    perft_assistant(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2pP/R2Q1RK1 w kq - 0 1",
        &[1, 6, 264, 9_467, 422_333],
    );
}

#[test]
fn edwards_position() {
    perft_assistant(
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        &[1, 44, 1_486, 62_379, 2_103_487],
    );
}

#[test]
fn edwards_position_two() {
    perft_assistant(
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        &[1, 46, 2_079, 62_379],
    );
}

#[test]
fn depth_zero_is_always_one_node() {
    let lookup = LookupTable::new().unwrap();
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    ] {
        let mut board = ChessBoard::from_fen(fen).unwrap();
        assert_eq!(perft(&lookup, &mut board, 0), 1);
    }
}

#[test]
fn en_passant_pseudo_pin_is_rejected_end_to_end() {
    // White king a5, rook h5 on black's side, white pawn b5. Black plays c7-c5, setting the
    // en-passant target c6. Capturing en passant would clear both b5 and c5 from the 5th rank,
    // exposing White's king to the rook on h5, so the capture must not appear among White's
    // legal moves even though the pawn sits right next to the target.
    let lookup = LookupTable::new().unwrap();
    let mut board = ChessBoard::from_fen("8/2p5/8/KP5r/8/8/8/8 b - - 0 1").unwrap();
    let double_push = Move {
        from: Piece::new(PieceType::Pawn, Square::C7),
        to: Piece::new(PieceType::Pawn, Square::C5),
        captured: Piece::empty(Square::C5),
        prior_en_passant: board.en_passant,
        prior_castling: board.castling,
    };
    board.play(double_push);
    assert_eq!(board.en_passant, Some(Square::C6));

    let mut ms = MoveSet::fill(&lookup, &board);
    let mut moves = Vec::new();
    while let Some(m) = ms.pop() {
        moves.push(m);
    }
    assert!(!moves.iter().any(|m| m.is_en_passant()));
}
