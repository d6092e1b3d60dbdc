//! The tile-list line format.
//!
//! One puzzle per line, as a comma-space separated list of `(row,col)`
//! tuples: `(0,1), (2,3), (4,0)`. Blank lines are ignored. A malformed line
//! is a warning, not an error; bulk files from long discovery runs should
//! not die on one bad row.

use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;

use sudodle_core::{canonicalize_tiles, Coord, TileSet};
use tracing::warn;

use crate::error::IoError;

/// Parse a whole text of puzzle lines, skipping blanks and (with a warning)
/// malformed lines. With `canonical_dedup`, only the first line of each
/// transpose orbit is kept.
pub fn parse_puzzle_lines(text: &str, canonical_dedup: bool) -> Vec<TileSet> {
    let mut seen: HashSet<TileSet> = HashSet::new();
    let mut puzzles = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_tiles_line(line) {
            Ok(tiles) => {
                if canonical_dedup && !seen.insert(canonicalize_tiles(&tiles)) {
                    continue;
                }
                puzzles.push(tiles);
            }
            Err(err) => {
                warn!(line = idx + 1, %err, "skipping malformed puzzle line");
            }
        }
    }

    puzzles
}

/// Parse a single tile list. Whitespace around tuples and separators is
/// tolerated.
pub fn parse_tiles_line(line: &str) -> Result<TileSet, IoError> {
    let malformed = || IoError::MalformedTileList(line.to_string());
    let mut it = line.chars().peekable();
    let mut tiles = TileSet::new();

    loop {
        skip_spaces(&mut it);
        if it.next() != Some('(') {
            return Err(malformed());
        }
        let row = parse_u8(&mut it).ok_or_else(malformed)?;
        skip_spaces(&mut it);
        if it.next() != Some(',') {
            return Err(malformed());
        }
        let col = parse_u8(&mut it).ok_or_else(malformed)?;
        skip_spaces(&mut it);
        if it.next() != Some(')') {
            return Err(malformed());
        }
        tiles.push(Coord::new(row, col));

        skip_spaces(&mut it);
        match it.next() {
            Some(',') => continue,
            None => break,
            Some(_) => return Err(malformed()),
        }
    }

    Ok(tiles)
}

/// Render a tile set back into the line format.
pub fn format_tiles(tiles: &[Coord]) -> String {
    tiles
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn skip_spaces(it: &mut Peekable<Chars<'_>>) {
    while it.peek().is_some_and(|c| c.is_whitespace()) {
        it.next();
    }
}

fn parse_u8(it: &mut Peekable<Chars<'_>>) -> Option<u8> {
    skip_spaces(it);
    let mut value: u32 = 0;
    let mut any = false;
    while let Some(&c) = it.peek() {
        let Some(digit) = c.to_digit(10) else { break };
        it.next();
        any = true;
        value = value * 10 + digit;
        if value > u8::MAX as u32 {
            return None;
        }
    }
    if any { Some(value as u8) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pairs: &[(u8, u8)]) -> TileSet {
        pairs.iter().map(|&(i, j)| Coord::new(i, j)).collect()
    }

    #[test]
    fn parses_the_reference_line() {
        let tiles = parse_tiles_line("(0,1), (2,3), (4,0)").unwrap();
        assert_eq!(tiles, coords(&[(0, 1), (2, 3), (4, 0)]));
    }

    #[test]
    fn tolerates_loose_whitespace() {
        let tiles = parse_tiles_line("  ( 0 , 1 ) ,(2,3)  ").unwrap();
        assert_eq!(tiles, coords(&[(0, 1), (2, 3)]));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_tiles_line("(0,1), nope").is_err());
        assert!(parse_tiles_line("0,1").is_err());
        assert!(parse_tiles_line("(0,1,2)").is_err());
        assert!(parse_tiles_line("(0,999)").is_err());
    }

    #[test]
    fn roundtrips_through_format() {
        let tiles = coords(&[(0, 1), (2, 3), (4, 0)]);
        let line = format_tiles(&tiles);
        assert_eq!(line, "(0,1), (2,3), (4,0)");
        assert_eq!(parse_tiles_line(&line).unwrap(), tiles);
    }

    #[test]
    fn bulk_parse_skips_blank_and_malformed_lines() {
        let text = "(0,1), (1,0)\n\nnot a puzzle\n(2,2)\n";
        let puzzles = parse_puzzle_lines(text, false);
        assert_eq!(puzzles.len(), 2);
        assert_eq!(puzzles[1], coords(&[(2, 2)]));
    }

    #[test]
    fn bulk_parse_can_dedup_transpose_orbits() {
        let text = "(0,1), (2,3)\n(1,0), (3,2)\n(0,2)\n";
        let puzzles = parse_puzzle_lines(text, true);
        assert_eq!(puzzles.len(), 2);
    }
}
