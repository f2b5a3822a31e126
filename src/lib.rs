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

//! Perftwright: a bitboard chess move generator and perft (move-path enumeration) engine.
//!
//! The crate is organized leaves-first: [`bitboard`] and [`square`] give the raw square-set
//! representation; [`lookup`] builds the precomputed attack tables on top of them (via either
//! [`magic`] or [`pext`], chosen at compile time); [`board`] is the position representation with
//! play/undo semantics; [`moveset`] is the legal move generator; [`perft`] walks the move tree and
//! counts leaves.
//!
//! ```
//! use perftwright::{ChessBoard, LookupTable};
//!
//! let lookup = LookupTable::new().unwrap();
//! let mut board =
//!     ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
//! assert_eq!(perftwright::perft::perft(&lookup, &mut board, 1), 20);
//! ```

pub mod bitboard;
pub mod board;
pub mod castling;
pub mod color;
pub mod direction;
pub mod error;
pub mod fen;
pub mod geometry;
pub mod lookup;
pub mod moveset;
pub mod perft;
pub mod piece;
pub mod square;

#[cfg(not(all(target_arch = "x86_64", target_feature = "bmi2")))]
pub mod magic;
#[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
pub mod pext;

pub use bitboard::Bitboard;
pub use board::{ChessBoard, Move};
pub use color::Color;
pub use error::{FenError, LookupTableError, PerftError};
pub use lookup::LookupTable;
pub use moveset::MoveSet;
pub use piece::{Piece, PieceType};
pub use square::Square;
