//! Difficulty-scoring solver restricted to human-grade deductions.
//!
//! Unlike the completion engine, this solver only ever applies three rules:
//! cells whose domain shrank to one value, rows where a value has exactly
//! one open column, and columns where a value has exactly one open row. When
//! none fires it guesses at the smallest open domain and counts the guess.
//! The guess count on a valid puzzle is that puzzle's difficulty score; zero
//! means pure deduction was enough.
//!
//! Peer domains are deliberately *not* pruned when a value is placed; the
//! position masks alone carry that information. A full assignment that
//! duplicates a value in a line starves some (line, value) pair of positions
//! and is rejected by the contradiction check, so every reported solution is
//! a Latin square.

use sudodle_core::mask::{full_mask, lowest_bit, mask_values, popcount, Mask};
use sudodle_core::{Clues, Grid};

use crate::error::SolveError;

/// Outcome of a heuristic solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicOutcome {
    pub solutions: Vec<Grid>,
    /// Number of times the solver had to guess rather than deduce.
    pub branch_count: u32,
}

/// Solve with naked/hidden singles only, guessing when stuck.
///
/// Stops once `max_solutions` solutions have been collected. For a puzzle
/// with a unique solution the solver always finds it.
pub fn solve_by_heuristics(
    n: u8,
    clues: &Clues,
    max_solutions: usize,
) -> Result<HeuristicOutcome, SolveError> {
    clues.validate(n)?;

    let mut state = DeductionState::new(n);
    for (at, value) in clues.known() {
        state.assign(at.row as usize, at.col as usize, value);
    }
    for (at, values) in clues.forbidden() {
        for &value in values {
            state.exclude(at.row as usize, at.col as usize, value);
        }
    }

    let mut search = HeuristicSearch {
        max_solutions,
        solutions: Vec::new(),
        branch_count: 0,
    };
    search.descend(&mut state);

    Ok(HeuristicOutcome {
        solutions: search.solutions,
        branch_count: search.branch_count,
    })
}

#[derive(Debug, Clone)]
struct DeductionState {
    n: usize,
    /// Per-cell value masks.
    domains: Vec<Mask>,
    /// `row_pos[i * n + v]`: column mask of where value v+1 can still go in
    /// row i; `col_pos` is the column-wise twin.
    row_pos: Vec<Mask>,
    col_pos: Vec<Mask>,
    /// Explicit placement flags per (line, value), checked instead of the
    /// position masks once a value has landed in its line.
    row_placed: Vec<bool>,
    col_placed: Vec<bool>,
    assigned: Vec<bool>,
}

impl DeductionState {
    fn new(n: u8) -> Self {
        let full = full_mask(n);
        let n = n as usize;
        Self {
            n,
            domains: vec![full; n * n],
            row_pos: vec![full; n * n],
            col_pos: vec![full; n * n],
            row_placed: vec![false; n * n],
            col_placed: vec![false; n * n],
            assigned: vec![false; n * n],
        }
    }

    /// Fix (row, col) to `value` and prune the position masks.
    fn assign(&mut self, row: usize, col: usize, value: u8) {
        let n = self.n;
        let v = (value - 1) as usize;
        if self.assigned[row * n + col] {
            self.domains[row * n + col] = 1 << v;
            return;
        }
        self.assigned[row * n + col] = true;
        self.domains[row * n + col] = 1 << v;
        self.row_placed[row * n + v] = true;
        self.col_placed[col * n + v] = true;

        for r in 0..n {
            if r != row {
                self.row_pos[r * n + v] &= !(1 << col);
            }
        }
        for c in 0..n {
            if c != col {
                self.col_pos[c * n + v] &= !(1 << row);
            }
        }
        // The cell itself is spent for every value.
        for w in 0..n {
            self.row_pos[row * n + w] &= !(1 << col);
            self.col_pos[col * n + w] &= !(1 << row);
        }
    }

    /// Apply a negative clue.
    fn exclude(&mut self, row: usize, col: usize, value: u8) {
        let n = self.n;
        let v = (value - 1) as usize;
        self.domains[row * n + col] &= !(1 << v);
        self.row_pos[row * n + v] &= !(1 << col);
        self.col_pos[col * n + v] &= !(1 << row);
    }

    /// Apply forced moves until nothing changes or a contradiction shows.
    fn propagate(&mut self) -> bool {
        let n = self.n;
        'fixpoint: loop {
            for &domain in &self.domains {
                if domain == 0 {
                    return false;
                }
            }

            // Singleton domains not yet propagated.
            for idx in 0..n * n {
                if popcount(self.domains[idx]) == 1 && !self.assigned[idx] {
                    let value = lowest_bit(self.domains[idx]) + 1;
                    self.assign(idx / n, idx % n, value);
                    continue 'fixpoint;
                }
            }

            // Rows where a value has exactly one open column.
            for r in 0..n {
                for v in 0..n {
                    if self.row_placed[r * n + v] {
                        continue;
                    }
                    let mask = self.row_pos[r * n + v];
                    if mask == 0 {
                        return false;
                    }
                    if popcount(mask) == 1 {
                        let c = lowest_bit(mask) as usize;
                        if !self.assigned[r * n + c] {
                            self.assign(r, c, v as u8 + 1);
                            continue 'fixpoint;
                        }
                    }
                }
            }

            // Columns, symmetrically.
            for c in 0..n {
                for v in 0..n {
                    if self.col_placed[c * n + v] {
                        continue;
                    }
                    let mask = self.col_pos[c * n + v];
                    if mask == 0 {
                        return false;
                    }
                    if popcount(mask) == 1 {
                        let r = lowest_bit(mask) as usize;
                        if !self.assigned[r * n + c] {
                            self.assign(r, c, v as u8 + 1);
                            continue 'fixpoint;
                        }
                    }
                }
            }

            return true;
        }
    }

    fn fully_assigned(&self) -> bool {
        self.domains.iter().all(|&d| popcount(d) == 1)
    }

    /// Row-major first cell among those with the smallest open domain.
    fn branch_cell(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (idx, &domain) in self.domains.iter().enumerate() {
            let count = popcount(domain);
            if count <= 1 {
                continue;
            }
            match best {
                Some((_, best_count)) if count >= best_count => {}
                _ => best = Some((idx, count)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    fn to_grid(&self) -> Grid {
        let cells: Vec<u8> = self.domains.iter().map(|&d| lowest_bit(d) + 1).collect();
        Grid::from_cells(self.n as u8, cells)
            .unwrap_or_else(|_| unreachable!("assigned domains are singletons in range"))
    }
}

struct HeuristicSearch {
    max_solutions: usize,
    solutions: Vec<Grid>,
    branch_count: u32,
}

impl HeuristicSearch {
    /// Returns `true` once enough solutions were collected, which unwinds
    /// the whole search.
    fn descend(&mut self, state: &mut DeductionState) -> bool {
        if !state.propagate() {
            return false;
        }

        if state.fully_assigned() {
            self.solutions.push(state.to_grid());
            return self.solutions.len() >= self.max_solutions;
        }

        let Some(idx) = state.branch_cell() else {
            return false;
        };
        self.branch_count += 1;

        let n = state.n;
        let saved = state.clone();
        for value in mask_values(saved.domains[idx]) {
            *state = saved.clone();
            state.assign(idx / n, idx % n, value);
            if self.descend(state) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use sudodle_core::{cyclic_latin_square, Clues, Coord};

    use super::*;

    #[test]
    fn fully_given_square_deduces_with_zero_branches() {
        let base = cyclic_latin_square(4).unwrap();
        let mut clues = Clues::new();
        for (at, value) in base.cells() {
            clues.insert_known(at, value.unwrap());
        }
        let out = solve_by_heuristics(4, &clues, 2).unwrap();
        assert_eq!(out.solutions, vec![base]);
        assert_eq!(out.branch_count, 0);
    }

    #[test]
    fn order_one_solves_immediately() {
        let out = solve_by_heuristics(1, &Clues::new(), 2).unwrap();
        assert_eq!(out.solutions.len(), 1);
        assert_eq!(out.branch_count, 0);
    }

    #[test]
    fn contradictory_clues_produce_nothing() {
        let mut clues = Clues::new();
        for v in 1..=3 {
            clues.forbid(Coord::new(0, 0), v);
        }
        let out = solve_by_heuristics(3, &clues, 2).unwrap();
        assert!(out.solutions.is_empty());
    }

    #[test]
    fn every_solution_is_latin_and_consistent() {
        // Sudodle encoding of a 4x4 puzzle: two revealed cells, the cyclic
        // value forbidden everywhere else.
        let base = cyclic_latin_square(4).unwrap();
        let tiles = vec![Coord::new(0, 0), Coord::new(1, 2)];
        let clues = Clues::for_revealed_tiles(&base, &tiles);
        let out = solve_by_heuristics(4, &clues, 10).unwrap();
        assert!(!out.solutions.is_empty());
        for grid in &out.solutions {
            assert!(grid.is_latin_square());
            assert_eq!(grid.value(Coord::new(0, 0)), Some(1));
            assert_eq!(grid.value(Coord::new(1, 2)), Some(4));
            // Every unrevealed cell must differ from the base.
            for (at, value) in grid.cells() {
                if !tiles.contains(&at) {
                    assert_ne!(value, base.value(at));
                }
            }
        }
    }

    #[test]
    fn matches_the_completion_engine_on_unique_puzzles() {
        use sudodle_core::Deadline;

        let base = cyclic_latin_square(4).unwrap();
        // A revealed set known to pin down a unique alternative square.
        let tiles: Vec<Coord> = (0..4).map(|i| Coord::new(i, i)).collect();
        let clues = Clues::for_revealed_tiles(&base, &tiles);
        let reference = crate::solver::complete_all(4, &clues, Deadline::never(), None).unwrap();
        let out = solve_by_heuristics(4, &clues, reference.solutions.len().max(2) + 1).unwrap();
        let mut ours = out.solutions.clone();
        let mut theirs = reference.solutions.clone();
        ours.sort_by(|a, b| a.as_cells().cmp(b.as_cells()));
        theirs.sort_by(|a, b| a.as_cells().cmp(b.as_cells()));
        assert_eq!(ours, theirs);
    }
}
