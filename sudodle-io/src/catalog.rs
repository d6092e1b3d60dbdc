//! Catalog records for the external puzzle-book renderer.
//!
//! A compacted puzzle is a single string: the grid-size digit first, then
//! two lowercase hex characters per revealed cell (row-major cell index).
//! The renderer treats the whole thing as an opaque key; only this module
//! knows the layout.

use serde::{Deserialize, Serialize};
use sudodle_core::{Coord, TileSet};
use tracing::warn;

use crate::error::IoError;

const COLUMNS: [&str; 3] = ["compacted_puzzle", "level", "difficulty"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub compacted_puzzle: String,
    pub level: u32,
    pub difficulty: u32,
}

/// Encode a tile set as a compacted puzzle string.
///
/// Only single-digit orders can be compacted; the catalog format reserves
/// exactly one leading character for the grid size.
pub fn compact_puzzle(n: u8, tiles: &[Coord]) -> Result<String, IoError> {
    if !(1..=9).contains(&n) {
        return Err(IoError::UncompactableGridSize(n));
    }
    let mut out = String::with_capacity(1 + tiles.len() * 2);
    out.push((b'0' + n) as char);
    for tile in tiles {
        if tile.row >= n || tile.col >= n {
            return Err(sudodle_core::CoreError::CoordOutOfRange { n, at: *tile }.into());
        }
        let index = (tile.row as usize) * (n as usize) + tile.col as usize;
        out.push_str(&format!("{index:02x}"));
    }
    Ok(out)
}

/// Decode a compacted puzzle string back into its order and tile set.
pub fn expand_puzzle(compacted: &str) -> Result<(u8, TileSet), IoError> {
    let mut chars = compacted.chars();
    let Some(first) = chars.next() else {
        return Err(IoError::EmptyCompactPuzzle);
    };
    let n = match first.to_digit(10) {
        Some(d) if (1..=9).contains(&d) => d as u8,
        _ => return Err(IoError::InvalidGridSizeChar(first)),
    };

    let payload: Vec<char> = chars.collect();
    if payload.len() % 2 != 0 {
        return Err(IoError::OddPayloadLength);
    }

    let mut tiles = TileSet::new();
    for pair in payload.chunks(2) {
        let hi = hex_value(pair[0])?;
        let lo = hex_value(pair[1])?;
        let index = (hi * 16 + lo) as usize;
        if index >= (n as usize) * (n as usize) {
            return Err(IoError::CellIndexOutOfRange { n, index });
        }
        tiles.push(Coord::new(
            (index / n as usize) as u8,
            (index % n as usize) as u8,
        ));
    }
    Ok((n, tiles))
}

fn hex_value(c: char) -> Result<u32, IoError> {
    c.to_digit(16).ok_or(IoError::InvalidHexDigit(c))
}

/// Render catalog records as CSV with the standard header.
pub fn format_catalog_csv(records: &[CatalogRecord]) -> String {
    let mut out = String::from("compacted_puzzle,level,difficulty\n");
    for record in records {
        out.push_str(&format!(
            "{},{},{}\n",
            record.compacted_puzzle, record.level, record.difficulty
        ));
    }
    out
}

/// Parse a catalog CSV. The three standard columns must be present (in any
/// order, other columns are ignored); rows that fail to parse are warned
/// about and skipped.
pub fn parse_catalog_csv(text: &str) -> Result<Vec<CatalogRecord>, IoError> {
    let mut lines = text.lines().enumerate();
    let Some((_, header)) = lines.next() else {
        return Err(IoError::MissingHeader);
    };

    let names: Vec<&str> = header.split(',').map(str::trim).collect();
    let mut positions = [0usize; 3];
    for (slot, column) in positions.iter_mut().zip(COLUMNS) {
        *slot = names
            .iter()
            .position(|&name| name == column)
            .ok_or(IoError::MissingColumn(column))?;
    }

    let mut records = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        match parse_row(&fields, positions) {
            Some(record) => records.push(record),
            None => warn!(line = idx + 1, "skipping malformed catalog row"),
        }
    }
    Ok(records)
}

fn parse_row(fields: &[&str], positions: [usize; 3]) -> Option<CatalogRecord> {
    let compacted_puzzle = fields.get(positions[0])?.to_string();
    let level = fields.get(positions[1])?.parse().ok()?;
    let difficulty = fields.get(positions[2])?.parse().ok()?;
    Some(CatalogRecord {
        compacted_puzzle,
        level,
        difficulty,
    })
}
