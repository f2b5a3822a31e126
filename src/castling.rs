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

//! Castling rights, represented as a bitboard of the king/rook *origin* squares that still carry
//! the right to castle. A right exists iff both the king's origin square and the corresponding
//! rook's origin square are still set; any move from or to one of those six squares naturally
//! clears the right by clearing that square's bit, with no separate flag bookkeeping.

use crate::{bitboard::Bitboard, color::Color, square::Square};

/// The six squares whose presence in `ChessBoard::castling` can affect castling rights.
pub const ALL_RIGHTS: Bitboard = Bitboard(
    (1 << Square::E1 as u8)
        | (1 << Square::H1 as u8)
        | (1 << Square::A1 as u8)
        | (1 << Square::E8 as u8)
        | (1 << Square::H8 as u8)
        | (1 << Square::A8 as u8),
);

#[must_use]
/// The king's home square for `color`.
pub const fn king_home(color: Color) -> Square {
    match color {
        Color::White => Square::E1,
        Color::Black => Square::E8,
    }
}

#[must_use]
/// The kingside rook's home square for `color`.
pub const fn kingside_rook_home(color: Color) -> Square {
    match color {
        Color::White => Square::H1,
        Color::Black => Square::H8,
    }
}

#[must_use]
/// The queenside rook's home square for `color`.
pub const fn queenside_rook_home(color: Color) -> Square {
    match color {
        Color::White => Square::A1,
        Color::Black => Square::A8,
    }
}

#[must_use]
/// The kingside castling destination square for the king.
pub const fn kingside_king_dest(color: Color) -> Square {
    match color {
        Color::White => Square::G1,
        Color::Black => Square::G8,
    }
}

#[must_use]
/// The queenside castling destination square for the king.
pub const fn queenside_king_dest(color: Color) -> Square {
    match color {
        Color::White => Square::C1,
        Color::Black => Square::C8,
    }
}

#[must_use]
/// The kingside rook's destination square.
pub const fn kingside_rook_dest(color: Color) -> Square {
    match color {
        Color::White => Square::F1,
        Color::Black => Square::F8,
    }
}

#[must_use]
/// The queenside rook's destination square.
pub const fn queenside_rook_dest(color: Color) -> Square {
    match color {
        Color::White => Square::D1,
        Color::Black => Square::D8,
    }
}

#[must_use]
/// Whether a king move from `from` to `to` is a castling move (a two-file king step).
pub const fn is_castle(from: Square, to: Square) -> bool {
    let df = from.file() as i8 - to.file() as i8;
    matches!(from.rank(), 0 | 7) && (df == 2 || df == -2) && from.rank() == to.rank()
}

#[must_use]
/// The squares that must be empty for a kingside castle (excludes king/rook origins).
pub const fn kingside_occupancy_mask(color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard((1 << Square::F1 as u8) | (1 << Square::G1 as u8)),
        Color::Black => Bitboard((1 << Square::F8 as u8) | (1 << Square::G8 as u8)),
    }
}

#[must_use]
/// The squares the king passes through (inclusive of start and end) for a kingside castle, which
/// must not be attacked.
pub const fn kingside_attack_mask(color: Color) -> Bitboard {
    match color {
        Color::White => {
            Bitboard((1 << Square::E1 as u8) | (1 << Square::F1 as u8) | (1 << Square::G1 as u8))
        }
        Color::Black => {
            Bitboard((1 << Square::E8 as u8) | (1 << Square::F8 as u8) | (1 << Square::G8 as u8))
        }
    }
}

#[must_use]
/// The squares that must be empty for a queenside castle (excludes king/rook origins).
pub const fn queenside_occupancy_mask(color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard(
            (1 << Square::B1 as u8) | (1 << Square::C1 as u8) | (1 << Square::D1 as u8),
        ),
        Color::Black => Bitboard(
            (1 << Square::B8 as u8) | (1 << Square::C8 as u8) | (1 << Square::D8 as u8),
        ),
    }
}

#[must_use]
/// The squares the king passes through (inclusive) for a queenside castle, which must not be
/// attacked. Note `b1`/`b8` is excluded: the king never transits it.
pub const fn queenside_attack_mask(color: Color) -> Bitboard {
    match color {
        Color::White => {
            Bitboard((1 << Square::E1 as u8) | (1 << Square::D1 as u8) | (1 << Square::C1 as u8))
        }
        Color::Black => {
            Bitboard((1 << Square::E8 as u8) | (1 << Square::D8 as u8) | (1 << Square::C8 as u8))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_rights_has_six_squares() {
        assert_eq!(ALL_RIGHTS.len(), 6);
    }

    #[test]
    fn castle_detection() {
        assert!(is_castle(Square::E1, Square::G1));
        assert!(is_castle(Square::E1, Square::C1));
        assert!(!is_castle(Square::E1, Square::F1));
    }
}
