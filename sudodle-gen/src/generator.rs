//! Seeded backtracking generator for single Latin squares.
//!
//! Cells are filled in row-major order. At each cell the still-available
//! values (row and column masks) are collected, shuffled under the seeded
//! rng, and tried in that order; contradictions backtrack. The deadline is
//! checked at the top of every frame, so a slow run fails with
//! [`GenError::Timeout`] rather than stalling the caller.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use smallvec::SmallVec;
use sudodle_core::mask::{full_mask, mask_values, Mask};
use sudodle_core::{validate_order, Deadline, Grid};

use crate::seed::{derive_attempt_seed, resolve_seed, rng_from_u64};
use crate::GenError;

/// Cap on reseeded attempts in [`random_latin_square_with_retries`].
pub const RETRY_ATTEMPTS: u32 = 64;

/// One pseudo-random N×N Latin square, reproducible for a fixed (n, seed).
pub fn random_latin_square(
    n: u8,
    seed: Option<u64>,
    deadline: Deadline,
) -> Result<Grid, GenError> {
    validate_order(n)?;
    let mut rng = rng_from_u64(resolve_seed(seed));

    let mut fill = Fill {
        n: n as usize,
        grid: vec![0; (n as usize) * (n as usize)],
        row_used: vec![0; n as usize],
        col_used: vec![0; n as usize],
        full: full_mask(n),
        deadline,
    };

    if fill.descend(0, &mut rng)? {
        Ok(Grid::from_cells(n, fill.grid)?)
    } else {
        // Exhaustive search from an empty square always completes; only the
        // deadline can stop it, and that path returned above.
        unreachable!("an empty square always admits a completion")
    }
}

/// Retry [`random_latin_square`] under a per-attempt deadline, reseeding
/// each attempt so a pathological schedule is not replayed forever. Attempt
/// zero runs on the caller's seed unchanged.
pub fn random_latin_square_with_retries(
    n: u8,
    seed: Option<u64>,
    per_attempt: Duration,
) -> Result<Grid, GenError> {
    validate_order(n)?;
    let base = resolve_seed(seed);
    for attempt in 0..RETRY_ATTEMPTS {
        let attempt_seed = derive_attempt_seed(base, attempt);
        match random_latin_square(n, Some(attempt_seed), Deadline::after(per_attempt)) {
            Ok(grid) => return Ok(grid),
            Err(GenError::Timeout) => continue,
            Err(err) => return Err(err),
        }
    }
    Err(GenError::AttemptsExhausted {
        attempts: RETRY_ATTEMPTS,
    })
}

struct Fill {
    n: usize,
    grid: Vec<u8>,
    row_used: Vec<Mask>,
    col_used: Vec<Mask>,
    full: Mask,
    deadline: Deadline,
}

impl Fill {
    fn descend(&mut self, cell: usize, rng: &mut ChaCha20Rng) -> Result<bool, GenError> {
        if self.deadline.expired() {
            return Err(GenError::Timeout);
        }
        if cell == self.n * self.n {
            return Ok(true);
        }

        let (i, j) = (cell / self.n, cell % self.n);
        let avail = self.full & !(self.row_used[i] | self.col_used[j]);
        if avail == 0 {
            return Ok(false);
        }

        let mut candidates: SmallVec<[u8; 16]> = mask_values(avail);
        candidates.shuffle(rng);

        for &value in &candidates {
            let bit = 1u32 << (value - 1);
            self.grid[cell] = value;
            self.row_used[i] |= bit;
            self.col_used[j] |= bit;

            if self.descend(cell + 1, rng)? {
                return Ok(true);
            }

            self.row_used[i] ^= bit;
            self.col_used[j] ^= bit;
            self.grid[cell] = 0;
        }

        Ok(false)
    }
}
