#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod clues;
pub mod deadline;
pub mod error;
pub mod grid;
pub mod mask;
pub mod tiles;

pub use crate::clues::Clues;
pub use crate::deadline::Deadline;
pub use crate::error::CoreError;
pub use crate::grid::{
    compare_squares, cyclic_latin_square, validate_order, CellValue, Coord, Grid, MAX_ORDER,
};
pub use crate::tiles::{canonicalize_tiles, TileSet};
