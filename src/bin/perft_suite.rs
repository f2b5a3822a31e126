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

//! `perft-suite <positions-file>` - batch regression runner for perft reference positions.
//!
//! Each non-blank, non-`#`-prefixed line of the positions file is
//! `<fen> <depth> <expected-node-count>`, whitespace-separated (the FEN itself may contain
//! internal whitespace between its own fields; only the trailing depth and count are split off).
//! Every position is run through [`perft`] and checked against its expected count; mismatches are
//! reported to stderr and the process exits non-zero if any position fails.

use std::{env, fs, process::ExitCode};

use perftwright::{perft::perft, ChessBoard, LookupTable, PerftError};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("usage: perft-suite <positions-file>");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(true)` if every position in the file matched its expected count.
fn run(args: &[String]) -> Result<bool, PerftError> {
    let [_, path] = args else {
        return Err(PerftError::Usage(format!(
            "expected 1 argument (positions file), got {}",
            args.len().saturating_sub(1)
        )));
    };
    let contents = fs::read_to_string(path)
        .map_err(|e| PerftError::Usage(format!("could not read {path}: {e}")))?;

    let lookup = LookupTable::new()?;
    let mut all_passed = true;
    let mut checked = 0usize;

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((fen, depth, expected)) = parse_entry(line) else {
            eprintln!("line {}: malformed entry: {line:?}", line_no + 1);
            all_passed = false;
            continue;
        };

        let mut board = ChessBoard::from_fen(&fen)?;
        let actual = perft(&lookup, &mut board, depth);
        checked += 1;
        if actual == expected {
            println!("ok   {fen} depth {depth}: {actual}");
        } else {
            println!("FAIL {fen} depth {depth}: expected {expected}, got {actual}");
            all_passed = false;
        }
    }

    println!("{checked} position(s) checked");
    Ok(all_passed)
}

/// Split a positions-file line into its FEN, depth, and expected node count. The last two
/// whitespace-separated tokens are the depth and count; everything before them is the FEN.
fn parse_entry(line: &str) -> Option<(String, u8, u64)> {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    let expected = tokens.pop()?.parse::<u64>().ok()?;
    let depth = tokens.pop()?.parse::<u8>().ok()?;
    if tokens.is_empty() {
        return None;
    }
    Some((tokens.join(" "), depth, expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_entry_splits_fen_depth_and_count() {
        let (fen, depth, expected) =
            parse_entry("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 5 4865609")
                .unwrap();
        assert_eq!(fen, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(depth, 5);
        assert_eq!(expected, 4_865_609);
    }

    #[test]
    fn parse_entry_rejects_too_few_tokens() {
        assert!(parse_entry("5 4865609").is_none());
    }
}
