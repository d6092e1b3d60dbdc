//! Completion search for partially-constrained Latin squares.
//!
//! Design goals:
//! - **Deterministic**: fixed propagation order, MRV with row-major ties,
//!   LCV with value ties, sorted clue iteration.
//! - **Library-first**: inconsistent clues are an empty result, deadlines
//!   produce partial results, and only malformed input is an error.
//!
//! Feature flags:
//! - `tracing`: enables `tracing::trace!` in the search (no subscriber
//!   required by the library).

use sudodle_core::{Clues, Deadline, Grid};

#[cfg(feature = "tracing")]
use tracing::trace;

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

use crate::error::SolveError;
use crate::state::PartialSquare;

/// Everything a completion run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completions {
    /// Distinct Latin squares consistent with the clues, up to the requested
    /// maximum.
    pub solutions: Vec<Grid>,
    /// One entry per branching decision: how many candidate values the
    /// search weighed there. Used downstream as a difficulty proxy.
    pub branch_samples: Vec<u32>,
    /// The deadline cut the search short; `solutions` holds whatever was
    /// found before that.
    pub timed_out: bool,
}

/// Find completions of an N×N Latin square under positive and negative
/// clues.
///
/// Propagates hidden singles (row and column) and naked singles to a
/// fixpoint, then branches on the most constrained cell, trying the least
/// constraining values first. The state is snapshotted before each branch
/// and restored after it, so the visible state after a failed branch equals
/// the state right before the placement.
///
/// Inconsistent clues yield `Ok` with no solutions. A `max_solutions` of
/// `None` enumerates everything.
pub fn complete_all(
    n: u8,
    clues: &Clues,
    deadline: Deadline,
    max_solutions: Option<usize>,
) -> Result<Completions, SolveError> {
    clues.validate(n)?;

    let mut out = Completions::default();
    let Some(mut state) = PartialSquare::from_clues(n, clues) else {
        return Ok(out);
    };

    let mut search = Search {
        deadline,
        max_solutions,
        out: &mut out,
    };
    search.descend(&mut state);
    Ok(out)
}

/// First completion only, or `None`.
pub fn complete_first(
    n: u8,
    clues: &Clues,
    deadline: Deadline,
) -> Result<Option<Grid>, SolveError> {
    let mut found = complete_all(n, clues, deadline, Some(1))?;
    Ok(if found.solutions.is_empty() {
        None
    } else {
        Some(found.solutions.swap_remove(0))
    })
}

struct Search<'a> {
    deadline: Deadline,
    max_solutions: Option<usize>,
    out: &'a mut Completions,
}

impl Search<'_> {
    fn saturated(&self) -> bool {
        self.out.timed_out
            || self
                .max_solutions
                .is_some_and(|k| self.out.solutions.len() >= k)
    }

    fn descend(&mut self, state: &mut PartialSquare) {
        if self.deadline.expired() {
            self.out.timed_out = true;
            return;
        }
        if self.saturated() {
            return;
        }

        if !state.propagate() {
            return;
        }

        if state.is_complete() {
            let grid = state.to_grid();
            // Revalidate before recording; a propagation defect must not
            // surface as a bogus solution.
            if grid.is_latin_square() {
                trace!(found = self.out.solutions.len() + 1, "solution");
                self.out.solutions.push(grid);
            }
            return;
        }

        let Some((row, col, mask)) = state.most_constrained_cell() else {
            return;
        };
        if mask == 0 {
            return;
        }

        let candidates = state.ordered_candidates(row, col);
        trace!(row, col, width = candidates.len(), "branch");
        self.out.branch_samples.push(candidates.len() as u32);

        for &value in &candidates {
            if self.saturated() {
                return;
            }
            let saved = state.clone();
            state.place(row, col, value);
            self.descend(state);
            *state = saved;
        }
    }
}
