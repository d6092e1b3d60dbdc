use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::error::CoreError;
use crate::grid::{validate_order, Coord, Grid};

/// Positive (`cell = v`) and negative (`cell ≠ v`) statements fed to the
/// solvers.
///
/// Both maps iterate in `(row, col)` order, so a solve over the same clue
/// set is deterministic no matter the order the clues were recorded in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clues {
    known: BTreeMap<Coord, u8>,
    forbidden: BTreeMap<Coord, SmallVec<[u8; 4]>>,
}

impl Clues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert that `at` holds `value`. A later assertion for the same cell
    /// replaces the earlier one; a cell carries at most one positive clue.
    pub fn insert_known(&mut self, at: Coord, value: u8) {
        self.known.insert(at, value);
    }

    /// Assert that `at` does not hold `value`.
    pub fn forbid(&mut self, at: Coord, value: u8) {
        let list = self.forbidden.entry(at).or_default();
        if !list.contains(&value) {
            list.push(value);
        }
    }

    pub fn known(&self) -> impl Iterator<Item = (Coord, u8)> + '_ {
        self.known.iter().map(|(&at, &v)| (at, v))
    }

    pub fn forbidden(&self) -> impl Iterator<Item = (Coord, &[u8])> + '_ {
        self.forbidden.iter().map(|(&at, list)| (at, list.as_slice()))
    }

    pub fn known_value(&self, at: Coord) -> Option<u8> {
        self.known.get(&at).copied()
    }

    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.forbidden.is_empty()
    }

    /// Check every coordinate and value against grid order `n`.
    pub fn validate(&self, n: u8) -> Result<(), CoreError> {
        validate_order(n)?;
        for (at, value) in self.known() {
            if at.row >= n || at.col >= n {
                return Err(CoreError::CoordOutOfRange { n, at });
            }
            if !(1..=n).contains(&value) {
                return Err(CoreError::ValueOutOfRange { n, value });
            }
        }
        for (at, values) in self.forbidden() {
            if at.row >= n || at.col >= n {
                return Err(CoreError::CoordOutOfRange { n, at });
            }
            for &value in values {
                if !(1..=n).contains(&value) {
                    return Err(CoreError::ValueOutOfRange { n, value });
                }
            }
        }
        Ok(())
    }

    /// The Sudodle clue encoding: revealed cells pin the base grid's value,
    /// every other cell forbids it (the player's starting guess there is
    /// known wrong).
    pub fn for_revealed_tiles(base: &Grid, tiles: &[Coord]) -> Self {
        let mut clues = Self::new();
        for (at, value) in base.cells() {
            let Some(value) = value else { continue };
            if tiles.contains(&at) {
                clues.insert_known(at, value);
            } else {
                clues.forbid(at, value);
            }
        }
        clues
    }
}
