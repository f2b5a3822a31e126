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

//! The position representation: piece placement, side to move, castling rights, and the
//! en-passant target, together with the play/undo move semantics and the derived check/pin
//! queries the move generator relies on.

use crate::{
    bitboard::Bitboard,
    castling,
    color::Color,
    error::FenError,
    fen,
    lookup::LookupTable,
    piece::{Piece, PieceType},
    square::Square,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// One fully-reversible move: everything needed to play it and, later, undo it without
/// consulting any other state. `captured.square` differs from `to.square` only for en-passant,
/// where it names the captured pawn's square rather than the landing square.
pub struct Move {
    pub from: Piece,
    pub to: Piece,
    pub captured: Piece,
    /// The en-passant target in effect *before* this move was played.
    pub prior_en_passant: Option<Square>,
    /// The castling-rights mask in effect *before* this move was played.
    pub prior_castling: Bitboard,
}

impl Move {
    #[must_use]
    pub const fn is_capture(self) -> bool {
        !self.captured.is_empty()
    }

    #[must_use]
    pub const fn is_promotion(self) -> bool {
        matches!(self.from.piece_type, PieceType::Pawn)
            && !matches!(self.to.piece_type, PieceType::Pawn)
    }

    #[must_use]
    /// Whether this move is an en-passant capture: a pawn move where the captured piece does not
    /// sit on the destination square.
    pub const fn is_en_passant(self) -> bool {
        matches!(self.from.piece_type, PieceType::Pawn)
            && self.is_capture()
            && self.captured.square as u8 != self.to.square as u8
    }

    #[must_use]
    pub const fn is_castle(self) -> bool {
        matches!(self.from.piece_type, PieceType::King)
            && castling::is_castle(self.from.square, self.to.square)
    }
}

impl std::fmt::Display for Move {
    /// `<file><rank><file><rank>[promo]`, e.g. `e2e4` or `b7b8q`. En-passant moves print the
    /// landing square, not the captured pawn's square.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.from.square, self.to.square)?;
        if self.is_promotion() {
            let c = match self.to.piece_type {
                PieceType::Queen => 'q',
                PieceType::Rook => 'r',
                PieceType::Bishop => 'b',
                PieceType::Knight => 'n',
                _ => unreachable!("is_promotion implies to.piece_type is a promotion piece"),
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A chess position: piece placement plus the irreversible state (side to move, castling
/// rights, en-passant target) needed to make and unmake moves.
pub struct ChessBoard {
    /// One bitboard per piece type, holding every square occupied by a piece of that type,
    /// regardless of color.
    pub types: [Bitboard; 6],
    /// One bitboard per color, holding every square occupied by a piece of that color.
    pub colors: [Bitboard; 2],
    /// Per-square piece type, for O(1) "what's on this square" queries.
    pub squares: [PieceType; 64],
    pub turn: Color,
    /// The en-passant target square - the empty square a pawn just jumped over - or `None`.
    pub en_passant: Option<Square>,
    /// Bitboard of the king/rook *origin* squares that still carry castling rights. A right
    /// exists iff both the king's origin square and the relevant rook's origin square remain set.
    pub castling: Bitboard,
}

impl ChessBoard {
    #[must_use]
    /// A board with no pieces on it, White to move, full (vacuous) castling rights, and no
    /// en-passant target. Used as the accumulator [`fen::parse`] fills in.
    pub fn empty() -> ChessBoard {
        ChessBoard {
            types: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            squares: [PieceType::Empty; 64],
            turn: Color::White,
            en_passant: None,
            castling: Bitboard::EMPTY,
        }
    }

    /// Parse `fen` into a `ChessBoard`. See [`fen::parse`] for the accepted grammar.
    ///
    /// # Errors
    ///
    /// Returns [`FenError`] if `fen` is not well-formed. Does not validate position legality.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use perftwright::{ChessBoard, Color};
    ///
    /// let board = ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")?;
    /// assert_eq!(board.turn, Color::White);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_fen(fen: &str) -> Result<ChessBoard, FenError> {
        fen::parse(fen)
    }

    /// Place `piece_type` of `color` on `sq`, overwriting whatever was previously there. Used
    /// only during FEN ingest; `play`/`undo` maintain the invariant incrementally instead.
    pub(crate) fn set_piece(&mut self, sq: Square, piece_type: PieceType, color: Color) {
        self.remove_piece(sq);
        self.types[piece_type as usize].insert(sq);
        self.colors[color as usize].insert(sq);
        self.squares[sq as usize] = piece_type;
    }

    fn remove_piece(&mut self, sq: Square) {
        let existing = self.squares[sq as usize];
        if existing != PieceType::Empty {
            self.types[existing as usize].remove(sq);
            self.colors[Color::White as usize].remove(sq);
            self.colors[Color::Black as usize].remove(sq);
            self.squares[sq as usize] = PieceType::Empty;
        }
    }

    #[must_use]
    /// Every occupied square, of either color.
    ///
    /// # Examples
    ///
    /// ```
    /// use perftwright::ChessBoard;
    ///
    /// let board =
    ///     ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    /// assert_eq!(board.occupancy().len(), 32);
    /// ```
    pub fn occupancy(&self) -> Bitboard {
        self.colors[Color::White as usize] | self.colors[Color::Black as usize]
    }

    #[must_use]
    pub fn us(&self) -> Bitboard {
        self.colors[self.turn as usize]
    }

    #[must_use]
    pub fn them(&self) -> Bitboard {
        self.colors[!self.turn as usize]
    }

    #[must_use]
    /// The color of the piece occupying `sq`, or `None` if it is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use perftwright::{ChessBoard, Color, Square};
    ///
    /// let board =
    ///     ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    /// assert_eq!(board.color_at(Square::E1), Some(Color::White));
    /// assert_eq!(board.color_at(Square::E4), None);
    /// ```
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        if self.colors[Color::White as usize].contains(sq) {
            Some(Color::White)
        } else if self.colors[Color::Black as usize].contains(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    #[must_use]
    /// The square of `color`'s king.
    ///
    /// # Panics
    ///
    /// Panics if `color` has no king, which should never happen for a board produced by this
    /// crate's own play/undo/FEN-ingest code (invariant 4 in the data model).
    pub fn king_square(&self, color: Color) -> Square {
        (self.types[PieceType::King as usize] & self.colors[color as usize])
            .lowest_square()
            .expect("every reachable position has exactly one king per side")
    }

    /// Apply `m` to this board, flipping `turn` and updating all derived state. `m` must be a
    /// legal move generated against this exact position; this function performs no legality
    /// checking of its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use perftwright::{ChessBoard, Move, Piece, PieceType, Square};
    ///
    /// let mut board = ChessBoard::from_fen(
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    /// )
    /// .unwrap();
    /// let after_e4 = ChessBoard::from_fen(
    ///     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
    /// )
    /// .unwrap();
    ///
    /// let e4 = Move {
    ///     from: Piece::new(PieceType::Pawn, Square::E2),
    ///     to: Piece::new(PieceType::Pawn, Square::E4),
    ///     captured: Piece::empty(Square::E4),
    ///     prior_en_passant: None,
    ///     prior_castling: board.castling,
    /// };
    /// board.play(e4);
    /// assert_eq!(board, after_e4);
    /// ```
    pub fn play(&mut self, m: Move) {
        self.remove_piece(m.from.square);
        if m.is_capture() {
            self.remove_piece(m.captured.square);
        }
        self.types[m.to.piece_type as usize].insert(m.to.square);
        self.colors[self.turn as usize].insert(m.to.square);
        self.squares[m.to.square as usize] = m.to.piece_type;

        if m.is_castle() {
            let (rook_from, rook_to) = if m.to.square.file() > m.from.square.file() {
                (castling::kingside_rook_home(self.turn), castling::kingside_rook_dest(self.turn))
            } else {
                (
                    castling::queenside_rook_home(self.turn),
                    castling::queenside_rook_dest(self.turn),
                )
            };
            self.remove_piece(rook_from);
            self.types[PieceType::Rook as usize].insert(rook_to);
            self.colors[self.turn as usize].insert(rook_to);
            self.squares[rook_to as usize] = PieceType::Rook;
        }

        self.en_passant = None;
        if m.from.piece_type == PieceType::Pawn
            && m.from.square.rank().abs_diff(m.to.square.rank()) == 2
        {
            let skipped_rank = (m.from.square.rank() + m.to.square.rank()) / 2;
            self.en_passant = Square::from_file_rank(m.from.square.file() as i8, skipped_rank as i8);
        }

        self.castling.remove(m.from.square);
        self.castling.remove(m.to.square);
        if m.is_capture() {
            self.castling.remove(m.captured.square);
        }

        self.turn = !self.turn;
    }

    /// Reverse `m`, which must be the most recently played move on this exact board (i.e. the
    /// value returned by the matching call to [`ChessBoard::play`]).
    pub fn undo(&mut self, m: Move) {
        self.turn = !self.turn;
        self.castling = m.prior_castling;
        self.en_passant = m.prior_en_passant;

        self.remove_piece(m.to.square);
        if m.is_castle() {
            let (rook_from, rook_to) = if m.to.square.file() > m.from.square.file() {
                (castling::kingside_rook_home(self.turn), castling::kingside_rook_dest(self.turn))
            } else {
                (
                    castling::queenside_rook_home(self.turn),
                    castling::queenside_rook_dest(self.turn),
                )
            };
            self.remove_piece(rook_to);
            self.types[PieceType::Rook as usize].insert(rook_from);
            self.colors[self.turn as usize].insert(rook_from);
            self.squares[rook_from as usize] = PieceType::Rook;
        }

        self.types[m.from.piece_type as usize].insert(m.from.square);
        self.colors[self.turn as usize].insert(m.from.square);
        self.squares[m.from.square as usize] = m.from.piece_type;

        if m.is_capture() {
            let captured_color = !self.turn;
            self.types[m.captured.piece_type as usize].insert(m.captured.square);
            self.colors[captured_color as usize].insert(m.captured.square);
            self.squares[m.captured.square as usize] = m.captured.piece_type;
        }
    }

    #[must_use]
    /// Every square attacked by the side **not** to move, with the side-to-move's king removed
    /// from the occupancy first - so that a slider attacking through where the king currently
    /// stands is correctly reported as attacking the squares behind it too. This is what makes
    /// legal king moves "can't step along the same ray the checker already threatens" correct.
    pub fn attacked(&self, lookup: &LookupTable) -> Bitboard {
        let occ = self.occupancy() & !Bitboard::from_square(self.king_square(self.turn));
        let enemy = !self.turn;
        let mut attacked = Bitboard::EMPTY;
        for sq in self.colors[enemy as usize] {
            let piece_type = self.squares[sq as usize];
            attacked |= match piece_type {
                PieceType::Pawn => pawn_attack_targets(sq, enemy),
                _ => lookup.attacks(sq, piece_type, occ),
            };
        }
        attacked
    }

    #[must_use]
    /// The set of enemy pieces currently giving check to our king.
    pub fn checking(&self, lookup: &LookupTable) -> Bitboard {
        let king_sq = self.king_square(self.turn);
        let occ = self.occupancy();
        let enemy = !self.turn;
        let mut checkers = Bitboard::EMPTY;
        checkers |= lookup.attacks(king_sq, PieceType::Knight, occ) & self.types[PieceType::Knight as usize];
        checkers |= lookup.attacks(king_sq, PieceType::Bishop, occ)
            & (self.types[PieceType::Bishop as usize] | self.types[PieceType::Queen as usize]);
        checkers |= lookup.attacks(king_sq, PieceType::Rook, occ)
            & (self.types[PieceType::Rook as usize] | self.types[PieceType::Queen as usize]);
        checkers |= pawn_attack_targets(king_sq, self.turn) & self.types[PieceType::Pawn as usize];
        checkers & self.colors[enemy as usize]
    }

    #[must_use]
    /// Our pieces that, if removed, would expose our king to an enemy slider: for every enemy
    /// slider whose ray to the king (ignoring our own blockers) passes through the king, if the
    /// squares strictly between contain exactly one of our pieces, that piece is pinned.
    pub fn pinned(&self, lookup: &LookupTable) -> Bitboard {
        let king_sq = self.king_square(self.turn);
        let enemy = !self.turn;
        let enemy_bishops = self.types[PieceType::Bishop as usize] | self.types[PieceType::Queen as usize];
        let enemy_rooks = self.types[PieceType::Rook as usize] | self.types[PieceType::Queen as usize];
        let candidate_sliders = (lookup.attacks(king_sq, PieceType::Bishop, Bitboard::EMPTY) & enemy_bishops)
            | (lookup.attacks(king_sq, PieceType::Rook, Bitboard::EMPTY) & enemy_rooks);

        let mut pinned = Bitboard::EMPTY;
        for slider_sq in candidate_sliders & self.colors[enemy as usize] {
            let between = lookup.squares_between(king_sq, slider_sq);
            let blockers = between & self.occupancy();
            if blockers.has_single_square() && (blockers & self.colors[self.turn as usize]).len() == 1 {
                pinned |= blockers;
            }
        }
        pinned
    }
}

#[must_use]
/// The squares a pawn of `color` standing on `sq` attacks diagonally (not including pushes).
/// Pawn attacks are computed by directional shift rather than stored in the lookup table (see
/// the representation note in section 9 of the design document).
pub(crate) fn pawn_attack_targets(sq: Square, color: Color) -> Bitboard {
    let from = Bitboard::from_square(sq);
    let (left, right) = match color {
        Color::White => (crate::direction::Direction::NORTHWEST, crate::direction::Direction::NORTHEAST),
        Color::Black => (crate::direction::Direction::SOUTHWEST, crate::direction::Direction::SOUTHEAST),
    };
    from.shift(left) | from.shift(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_undo_round_trips_a_quiet_move() {
        let mut board =
            ChessBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        let before = board;
        let m = Move {
            from: Piece::new(PieceType::Pawn, Square::E2),
            to: Piece::new(PieceType::Pawn, Square::E4),
            captured: Piece::empty(Square::E4),
            prior_en_passant: board.en_passant,
            prior_castling: board.castling,
        };
        board.play(m);
        assert_eq!(board.en_passant, Some(Square::E3));
        board.undo(m);
        assert_eq!(board, before);
    }

    #[test]
    fn play_undo_round_trips_a_capture() {
        let mut board =
            ChessBoard::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
                .unwrap();
        let before = board;
        let m = Move {
            from: Piece::new(PieceType::Pawn, Square::E4),
            to: Piece::new(PieceType::Pawn, Square::D5),
            captured: Piece::new(PieceType::Pawn, Square::D5),
            prior_en_passant: board.en_passant,
            prior_castling: board.castling,
        };
        board.play(m);
        assert_eq!(board.squares[Square::D5 as usize], PieceType::Pawn);
        board.undo(m);
        assert_eq!(board, before);
    }

    #[test]
    fn castling_moves_the_rook_too() {
        let mut board = ChessBoard::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let before = board;
        let m = Move {
            from: Piece::new(PieceType::King, Square::E1),
            to: Piece::new(PieceType::King, Square::G1),
            captured: Piece::empty(Square::G1),
            prior_en_passant: board.en_passant,
            prior_castling: board.castling,
        };
        board.play(m);
        assert_eq!(board.squares[Square::F1 as usize], PieceType::Rook);
        assert_eq!(board.squares[Square::H1 as usize], PieceType::Empty);
        board.undo(m);
        assert_eq!(board, before);
    }

    #[test]
    fn castling_right_is_lost_when_rook_moves() {
        let mut board = ChessBoard::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let m = Move {
            from: Piece::new(PieceType::Rook, Square::A1),
            to: Piece::new(PieceType::Rook, Square::A2),
            captured: Piece::empty(Square::A2),
            prior_en_passant: board.en_passant,
            prior_castling: board.castling,
        };
        board.play(m);
        assert!(!board.castling.contains(Square::A1));
    }

    #[test]
    fn checking_detects_a_simple_check() {
        let lookup = LookupTable::new().unwrap();
        let board = ChessBoard::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        assert_eq!(board.checking(&lookup).len(), 1);
        assert!(board.checking(&lookup).contains(Square::E2));
    }

    #[test]
    fn pinned_detects_an_absolute_pin() {
        let lookup = LookupTable::new().unwrap();
        let board = ChessBoard::from_fen("4k3/8/8/8/8/8/8/4KN1r w - - 0 1").unwrap();
        let pinned = board.pinned(&lookup);
        assert!(pinned.contains(Square::F1));
    }
}
