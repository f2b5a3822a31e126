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

//! The error types this crate's fallible operations can produce.

use std::{error::Error, fmt::{Display, Formatter}, io};

#[derive(Debug)]
/// A FEN string failed to parse.
pub enum FenError {
    /// The piece-placement field did not describe exactly 64 squares.
    BadPlacement,
    /// An unrecognized character appeared in the piece-placement field.
    BadPiece(char),
    /// The side-to-move field was not `w` or `b`.
    BadSideToMove,
    /// The castling-availability field contained something other than `KQkq` or `-`.
    BadCastling,
    /// The en-passant field was not a valid algebraic square or `-`.
    BadEnPassant,
    /// The FEN did not have at least 4 whitespace-separated fields.
    TooFewFields,
}

impl Display for FenError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            FenError::BadPlacement => write!(f, "piece-placement field did not cover 64 squares"),
            FenError::BadPiece(c) => write!(f, "unrecognized piece character '{c}'"),
            FenError::BadSideToMove => write!(f, "side to move must be 'w' or 'b'"),
            FenError::BadCastling => write!(f, "malformed castling-availability field"),
            FenError::BadEnPassant => write!(f, "malformed en-passant target square"),
            FenError::TooFewFields => write!(f, "FEN must have at least 4 fields"),
        }
    }
}

impl Error for FenError {}

#[derive(Debug)]
/// Construction of the [`LookupTable`](crate::LookupTable) failed.
pub enum LookupTableError {
    /// The magic-numbers file could not be opened or written to.
    Io(io::Error),
    /// The magic-numbers file contained a line that was not a valid unsigned 64-bit decimal.
    Parse { line: usize, text: String },
}

impl Display for LookupTableError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            LookupTableError::Io(e) => write!(f, "magic-numbers file I/O error: {e}"),
            LookupTableError::Parse { line, text } => {
                write!(f, "magic-numbers file line {line} is not a valid u64: {text:?}")
            }
        }
    }
}

impl Error for LookupTableError {}

impl From<io::Error> for LookupTableError {
    fn from(e: io::Error) -> LookupTableError {
        LookupTableError::Io(e)
    }
}

#[derive(Debug)]
/// A top-level error from a command-line invocation of this crate's binaries.
pub enum PerftError {
    Fen(FenError),
    Lookup(LookupTableError),
    Usage(String),
}

impl Display for PerftError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            PerftError::Fen(e) => write!(f, "{e}"),
            PerftError::Lookup(e) => write!(f, "{e}"),
            PerftError::Usage(msg) => write!(f, "{msg}"),
        }
    }
}

impl Error for PerftError {}

impl From<FenError> for PerftError {
    fn from(e: FenError) -> PerftError {
        PerftError::Fen(e)
    }
}

impl From<LookupTableError> for PerftError {
    fn from(e: LookupTableError) -> PerftError {
        PerftError::Lookup(e)
    }
}
