#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod catalog;
pub mod error;
pub mod puzzle_lines;

pub use crate::catalog::{
    compact_puzzle, expand_puzzle, format_catalog_csv, parse_catalog_csv, CatalogRecord,
};
pub use crate::error::IoError;
pub use crate::puzzle_lines::{format_tiles, parse_puzzle_lines, parse_tiles_line};
