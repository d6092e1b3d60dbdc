//! Jacobson–Matthews intercalate-flip sampling.
//!
//! Starting from a backtracked square, repeatedly pick two rows and two
//! columns; when the 2×2 submatrix is an intercalate `[[a,b],[b,a]]`, swap
//! it to `[[b,a],[a,b]]`. Each flip preserves the Latin property, and after
//! the burn-in the chain's state is approximately uniform over all Latin
//! squares of that order.

use std::time::Duration;

use rand::seq::index;
use rand::Rng;
use sudodle_core::{validate_order, Grid};

use crate::generator::random_latin_square_with_retries;
use crate::seed::{resolve_seed, rng_from_u64};
use crate::GenError;

/// Per-attempt budget for producing the chain's starting square.
const SEED_SQUARE_TIMEOUT: Duration = Duration::from_secs(1);

/// A near-uniformly random N×N Latin square.
///
/// `burn_in` defaults to `50 * n²` flips. The same (n, seed, burn_in)
/// reproduces the same square.
pub fn uniform_random_latin_square(
    n: u8,
    seed: Option<u64>,
    burn_in: Option<u64>,
) -> Result<Grid, GenError> {
    validate_order(n)?;
    let base_seed = resolve_seed(seed);

    let start = random_latin_square_with_retries(n, Some(base_seed), SEED_SQUARE_TIMEOUT)?;
    let mut cells = start.as_cells().to_vec();
    let mut rng = rng_from_u64(base_seed);

    let steps = burn_in.unwrap_or(50 * (n as u64) * (n as u64));
    for _ in 0..steps {
        intercalate_step(n as usize, &mut cells, &mut rng);
    }

    Ok(Grid::from_cells(n, cells)?)
}

/// Attempt one random intercalate swap in place. Returns whether a swap
/// happened; a miss (no intercalate at the sampled corners) is simply a
/// no-op step of the chain.
fn intercalate_step<R: Rng + ?Sized>(n: usize, cells: &mut [u8], rng: &mut R) -> bool {
    if n < 2 {
        return false;
    }
    let rows = index::sample(rng, n, 2);
    let cols = index::sample(rng, n, 2);
    let (r1, r2) = (rows.index(0), rows.index(1));
    let (c1, c2) = (cols.index(0), cols.index(1));

    let a = cells[r1 * n + c1];
    let b = cells[r1 * n + c2];
    if a == b {
        return false;
    }
    if cells[r2 * n + c1] == b && cells[r2 * n + c2] == a {
        cells[r1 * n + c1] = b;
        cells[r1 * n + c2] = a;
        cells[r2 * n + c1] = a;
        cells[r2 * n + c2] = b;
        return true;
    }
    false
}
