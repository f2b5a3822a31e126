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

//! `perft <fen> <depth>` - print the standard perft "divide" output for a position.

use std::env;

use perftwright::{perft::divide, ChessBoard, LookupTable, PerftError};

fn main() {
    let args: Vec<String> = env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        eprintln!("usage: perft <fen> <depth>");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), PerftError> {
    let [_, fen, depth_arg] = args else {
        return Err(PerftError::Usage(format!(
            "expected 2 arguments (fen, depth), got {}",
            args.len().saturating_sub(1)
        )));
    };
    let depth: u8 = depth_arg
        .parse()
        .map_err(|_| PerftError::Usage(format!("invalid depth {depth_arg:?}")))?;

    let lookup = LookupTable::new()?;
    let mut board = ChessBoard::from_fen(fen)?;

    let (breakdown, total) = divide(&lookup, &mut board, depth);
    for (m, count) in breakdown {
        println!("{m}: {count}");
    }
    println!();
    println!("Nodes searched: {total}");
    Ok(())
}
