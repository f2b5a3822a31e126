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

//! Parsing of Forsyth-Edwards Notation into a [`ChessBoard`]. Only the first four fields
//! (placement, side to move, castling availability, en-passant target) are meaningful to this
//! crate; the halfmove clock and fullmove number, if present, are parsed far enough to be skipped
//! and then discarded. No attempt is made to validate that the resulting position is reachable or
//! otherwise legal - only that the FEN is syntactically well-formed.

use crate::{
    board::ChessBoard,
    castling,
    color::Color,
    error::FenError,
    piece::PieceType,
    square::Square,
};

/// Parse `fen` into a [`ChessBoard`].
///
/// # Errors
///
/// Returns [`FenError`] if `fen` does not have at least four whitespace-separated fields, or if
/// any of those four fields is malformed. Does not validate position legality (e.g. a FEN with
/// two white kings parses successfully).
pub fn parse(fen: &str) -> Result<ChessBoard, FenError> {
    let mut fields = fen.split_whitespace();
    let placement = fields.next().ok_or(FenError::TooFewFields)?;
    let side = fields.next().ok_or(FenError::TooFewFields)?;
    let castling_field = fields.next().ok_or(FenError::TooFewFields)?;
    let en_passant_field = fields.next().ok_or(FenError::TooFewFields)?;
    // Halfmove clock / fullmove number, if present, are read and ignored.

    let mut board = ChessBoard::empty();
    parse_placement(placement, &mut board)?;
    board.turn = parse_side(side)?;
    board.castling = parse_castling(castling_field)?;
    board.en_passant = parse_en_passant(en_passant_field)?;
    Ok(board)
}

fn parse_placement(field: &str, board: &mut ChessBoard) -> Result<(), FenError> {
    let mut rank = 0u8;
    let mut file = 0u8;
    for row in field.split('/') {
        if rank > 7 {
            return Err(FenError::BadPlacement);
        }
        file = 0;
        for c in row.chars() {
            if let Some(blanks) = c.to_digit(10) {
                file += blanks as u8;
            } else {
                let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                let piece_type = piece_type_from_char(c.to_ascii_lowercase())
                    .ok_or(FenError::BadPiece(c))?;
                if file > 7 {
                    return Err(FenError::BadPlacement);
                }
                let sq = Square::from_file_rank(file as i8, rank as i8)
                    .ok_or(FenError::BadPlacement)?;
                board.set_piece(sq, piece_type, color);
                file += 1;
            }
        }
        if file != 8 {
            return Err(FenError::BadPlacement);
        }
        rank += 1;
    }
    if rank != 8 {
        return Err(FenError::BadPlacement);
    }
    Ok(())
}

fn piece_type_from_char(c: char) -> Option<PieceType> {
    match c {
        'p' => Some(PieceType::Pawn),
        'n' => Some(PieceType::Knight),
        'b' => Some(PieceType::Bishop),
        'r' => Some(PieceType::Rook),
        'q' => Some(PieceType::Queen),
        'k' => Some(PieceType::King),
        _ => None,
    }
}

fn parse_side(field: &str) -> Result<Color, FenError> {
    match field {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(FenError::BadSideToMove),
    }
}

fn parse_castling(field: &str) -> Result<crate::bitboard::Bitboard, FenError> {
    use crate::bitboard::Bitboard;
    if field == "-" {
        return Ok(Bitboard::EMPTY);
    }
    let mut rights = Bitboard::EMPTY;
    for c in field.chars() {
        let sq = match c {
            'K' => castling::kingside_rook_home(Color::White),
            'Q' => castling::queenside_rook_home(Color::White),
            'k' => castling::kingside_rook_home(Color::Black),
            'q' => castling::queenside_rook_home(Color::Black),
            _ => return Err(FenError::BadCastling),
        };
        rights.insert(sq);
        let king_sq = match c {
            'K' | 'Q' => castling::king_home(Color::White),
            'k' | 'q' => castling::king_home(Color::Black),
            _ => unreachable!(),
        };
        rights.insert(king_sq);
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    Square::from_algebraic(field).map(Some).ok_or(FenError::BadEnPassant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_parses() {
        let board =
            parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(board.turn, Color::White);
        assert_eq!(board.en_passant, None);
        assert_eq!(board.castling, castling::ALL_RIGHTS);
    }

    #[test]
    fn bare_four_field_fen_is_accepted() {
        let board = parse("8/8/8/8/8/8/8/4K2k w - -").unwrap();
        assert_eq!(board.turn, Color::White);
    }

    #[test]
    fn en_passant_target_parses() {
        let board =
            parse("rnbqkbnr/ppppp1pp/8/5p2/4P3/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 2").unwrap();
        assert_eq!(board.en_passant, Some(Square::F6));
    }

    #[test]
    fn missing_fields_is_an_error() {
        assert!(matches!(parse("8/8/8/8/8/8/8/8"), Err(FenError::TooFewFields)));
    }

    #[test]
    fn bad_piece_char_is_an_error() {
        assert!(matches!(
            parse("8/8/8/8/8/8/8/7x w - -"),
            Err(FenError::BadPiece('x'))
        ));
    }

    #[test]
    fn short_rank_is_an_error() {
        assert!(matches!(parse("7/8/8/8/8/8/8/8 w - -"), Err(FenError::BadPlacement)));
    }
}
