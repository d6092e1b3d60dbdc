//! Bitmask constraint state for the completion engine.
//!
//! A [`PartialSquare`] tracks, besides the grid itself:
//! - `row_used[i]` / `col_used[j]`: value masks of what is already placed,
//! - `row_possible[i][v]`: a column mask of where value v may still land in
//!   row i, and `col_possible[j][v]` the row-mask mirror.
//!
//! The two possibility tables are kept mirrored eagerly: placing v at (i,j)
//! clears v's bit for column j in every other row and for row i in every
//! other column, so a single-bit possibility mask always points at a legal
//! placement. Backtracking uses whole-state snapshots; at N ≤ 16 the copy is
//! a few hundred bytes.

use smallvec::SmallVec;
use sudodle_core::mask::{bits, full_mask, lowest_bit, popcount, Mask};
use sudodle_core::{Clues, Grid};

#[derive(Debug, Clone)]
pub(crate) struct PartialSquare {
    n: usize,
    grid: Vec<u8>,
    row_used: Vec<Mask>,
    col_used: Vec<Mask>,
    row_possible: Vec<Mask>,
    col_possible: Vec<Mask>,
    full: Mask,
}

impl PartialSquare {
    pub(crate) fn new(n: u8) -> Self {
        let full = full_mask(n);
        let n = n as usize;
        Self {
            n,
            grid: vec![0; n * n],
            row_used: vec![0; n],
            col_used: vec![0; n],
            row_possible: vec![full; n * n],
            col_possible: vec![full; n * n],
            full,
        }
    }

    /// Seed a state from validated clues. `None` means the clues already
    /// contradict each other (duplicate in a line, or a cell both pinned to
    /// and forbidden from the same value).
    pub(crate) fn from_clues(n: u8, clues: &Clues) -> Option<Self> {
        let mut state = Self::new(n);
        for (at, value) in clues.known() {
            let bit = 1u32 << (value - 1);
            if state.row_used[at.row as usize] & bit != 0
                || state.col_used[at.col as usize] & bit != 0
            {
                return None;
            }
            state.place(at.row as usize, at.col as usize, value);
        }
        for (at, values) in clues.forbidden() {
            for &value in values {
                if state.grid[at.row as usize * state.n + at.col as usize] == value {
                    return None;
                }
                state.forbid(at.row as usize, at.col as usize, value);
            }
        }
        Some(state)
    }

    pub(crate) fn is_filled(&self, row: usize, col: usize) -> bool {
        self.grid[row * self.n + col] != 0
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.grid.iter().all(|&v| v != 0)
    }

    pub(crate) fn to_grid(&self) -> Grid {
        Grid::from_cells(self.n as u8, self.grid.clone())
            .unwrap_or_else(|_| unreachable!("state cells stay in range"))
    }

    /// Place `value` at (row, col) and run the full constraint maintenance.
    pub(crate) fn place(&mut self, row: usize, col: usize, value: u8) {
        let n = self.n;
        let v = (value - 1) as usize;
        debug_assert_eq!(self.grid[row * n + col], 0);
        self.grid[row * n + col] = value;

        let bit = 1u32 << v;
        self.row_used[row] |= bit;
        self.col_used[col] |= bit;

        // v is pinned to this cell within its row and column.
        self.row_possible[row * n + v] = 1 << col;
        self.col_possible[col * n + v] = 1 << row;

        // v is spent for column `col` in every other row, and for row `row`
        // in every other column (mirror halves of the same fact).
        for r in 0..n {
            if r != row {
                self.row_possible[r * n + v] &= !(1 << col);
            }
        }
        for c in 0..n {
            if c != col {
                self.col_possible[c * n + v] &= !(1 << row);
            }
        }

        // No other value fits this cell.
        for w in 0..n {
            if w != v {
                self.row_possible[row * n + w] &= !(1 << col);
                self.col_possible[col * n + w] &= !(1 << row);
            }
        }
    }

    /// Record a negative clue: `value` cannot sit at (row, col).
    pub(crate) fn forbid(&mut self, row: usize, col: usize, value: u8) {
        let v = (value - 1) as usize;
        self.row_possible[row * self.n + v] &= !(1 << col);
        self.col_possible[col * self.n + v] &= !(1 << row);
    }

    /// Value mask of what may still legally land at (row, col).
    pub(crate) fn candidates(&self, row: usize, col: usize) -> Mask {
        debug_assert!(!self.is_filled(row, col));
        let n = self.n;
        let avail = self.full & !(self.row_used[row] | self.col_used[col]);
        let mut out = 0;
        for v in bits(avail) {
            let v = v as usize;
            if self.row_possible[row * n + v] & (1 << col) != 0
                && self.col_possible[col * n + v] & (1 << row) != 0
            {
                out |= 1 << v;
            }
        }
        out
    }

    /// Run hidden-single and naked-single deductions to a fixpoint.
    ///
    /// Returns `false` on contradiction: an empty cell with no candidates,
    /// or an unplaced (line, value) pair with nowhere left to go.
    pub(crate) fn propagate(&mut self) -> bool {
        let n = self.n;
        loop {
            let mut changed = false;

            // Hidden singles in rows.
            for i in 0..n {
                for v in 0..n {
                    if self.row_used[i] & (1 << v) != 0 {
                        continue;
                    }
                    let mask = self.row_possible[i * n + v];
                    if mask == 0 {
                        return false;
                    }
                    if popcount(mask) == 1 {
                        let j = lowest_bit(mask) as usize;
                        if self.grid[i * n + j] == 0 {
                            self.place(i, j, v as u8 + 1);
                            changed = true;
                        }
                    }
                }
            }

            // Hidden singles in columns.
            for j in 0..n {
                for v in 0..n {
                    if self.col_used[j] & (1 << v) != 0 {
                        continue;
                    }
                    let mask = self.col_possible[j * n + v];
                    if mask == 0 {
                        return false;
                    }
                    if popcount(mask) == 1 {
                        let i = lowest_bit(mask) as usize;
                        if self.grid[i * n + j] == 0 {
                            self.place(i, j, v as u8 + 1);
                            changed = true;
                        }
                    }
                }
            }

            // Naked singles.
            for i in 0..n {
                for j in 0..n {
                    if self.grid[i * n + j] != 0 {
                        continue;
                    }
                    let mask = self.candidates(i, j);
                    if mask == 0 {
                        return false;
                    }
                    if popcount(mask) == 1 {
                        self.place(i, j, lowest_bit(mask) + 1);
                        changed = true;
                    }
                }
            }

            if !changed {
                return true;
            }
        }
    }

    /// MRV: the empty cell with the fewest candidates, with its candidate
    /// mask. `None` when the grid is complete. A zero mask means a dead end.
    pub(crate) fn most_constrained_cell(&self) -> Option<(usize, usize, Mask)> {
        let n = self.n;
        let mut best: Option<(usize, usize, Mask, u32)> = None;
        for i in 0..n {
            for j in 0..n {
                if self.grid[i * n + j] != 0 {
                    continue;
                }
                let mask = self.candidates(i, j);
                let count = popcount(mask);
                if count == 0 {
                    return Some((i, j, 0));
                }
                match best {
                    Some((_, _, _, best_count)) if count >= best_count => {}
                    _ => best = Some((i, j, mask, count)),
                }
            }
        }
        best.map(|(i, j, mask, _)| (i, j, mask))
    }

    /// LCV score for placing `value` at (row, col): how many still-empty
    /// peers in the same row and column currently admit it. Lower scores
    /// prune less and are tried first.
    pub(crate) fn constraint_score(&self, row: usize, col: usize, value: u8) -> u32 {
        let n = self.n;
        let v = (value - 1) as usize;
        let mut score = 0;
        for k in 0..n {
            if k != col
                && self.grid[row * n + k] == 0
                && self.row_possible[row * n + v] & (1 << k) != 0
            {
                score += 1;
            }
            if k != row
                && self.grid[k * n + col] == 0
                && self.col_possible[col * n + v] & (1 << k) != 0
            {
                score += 1;
            }
        }
        score
    }

    /// Candidate values at (row, col), least constraining first.
    pub(crate) fn ordered_candidates(&self, row: usize, col: usize) -> SmallVec<[u8; 16]> {
        let mut values: SmallVec<[u8; 16]> = bits(self.candidates(row, col))
            .map(|v| v + 1)
            .collect();
        values.sort_by_key(|&value| (self.constraint_score(row, col, value), value));
        values
    }
}

#[cfg(test)]
mod tests {
    use sudodle_core::Coord;

    use super::*;

    fn clue(known: &[(u8, u8, u8)], forbidden: &[(u8, u8, u8)]) -> Clues {
        let mut clues = Clues::new();
        for &(i, j, v) in known {
            clues.insert_known(Coord::new(i, j), v);
        }
        for &(i, j, v) in forbidden {
            clues.forbid(Coord::new(i, j), v);
        }
        clues
    }

    #[test]
    fn duplicate_in_row_is_rejected() {
        let clues = clue(&[(0, 0, 1), (0, 2, 1)], &[]);
        assert!(PartialSquare::from_clues(3, &clues).is_none());
    }

    #[test]
    fn pinned_and_forbidden_same_value_is_rejected() {
        let clues = clue(&[(1, 1, 2)], &[(1, 1, 2)]);
        assert!(PartialSquare::from_clues(3, &clues).is_none());
    }

    #[test]
    fn placement_prunes_mirrored_masks() {
        let mut state = PartialSquare::new(3);
        state.place(0, 0, 2);
        // Value 2 can no longer land anywhere else in row 0 or column 0.
        assert_eq!(state.candidates(0, 1) & 0b010, 0);
        assert_eq!(state.candidates(1, 0) & 0b010, 0);
        // And the mirror halves agree: row 1 lost column 0 for value 2,
        // column 1 lost row 0 for value 2.
        assert_eq!(state.row_possible[3 + 1] & 1, 0);
        assert_eq!(state.col_possible[3 + 1] & 1, 0);
    }

    #[test]
    fn propagation_is_idempotent() {
        let clues = clue(&[(0, 0, 1), (1, 1, 2)], &[(0, 1, 1), (0, 1, 3)]);
        let mut state = PartialSquare::from_clues(3, &clues).unwrap();
        assert!(state.propagate());
        let settled = state.clone();
        assert!(state.propagate());
        assert_eq!(state.grid, settled.grid);
        assert_eq!(state.row_possible, settled.row_possible);
        assert_eq!(state.col_possible, settled.col_possible);
    }

    #[test]
    fn all_values_forbidden_contradicts() {
        let clues = clue(&[], &[(0, 0, 1), (0, 0, 2), (0, 0, 3)]);
        let mut state = PartialSquare::from_clues(3, &clues).unwrap();
        assert!(!state.propagate());
    }

    #[test]
    fn order_one_solves_by_propagation() {
        let mut state = PartialSquare::new(1);
        assert!(state.propagate());
        assert!(state.is_complete());
        assert_eq!(state.to_grid().value(Coord::new(0, 0)), Some(1));
    }
}
