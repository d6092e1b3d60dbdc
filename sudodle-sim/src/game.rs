//! The Sudodle feedback loop.
//!
//! A game starts from the player's first guess, usually the cyclic square.
//! Each round grades the guess against the hidden solution, folds the
//! feedback into the clue set (right cells become positive clues, wrong
//! cells forbid the guessed value), and asks the completion engine for the
//! next guess.

use std::time::Duration;

use sudodle_core::{compare_squares, Clues, Deadline, Grid};
use sudodle_gen::uniform_random_latin_square;
use sudodle_solver::complete_first;

#[cfg(feature = "tracing")]
use tracing::trace;

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

use crate::SimError;

/// Games end after this many guesses, win or lose.
pub const MAX_ROUNDS: usize = 5;

/// How a simulated game ended.
///
/// `known_counts` traces `|known_values|` round by round: on a win it starts
/// at the count after the first feedback (the pre-game zero is dropped), on
/// a loss it carries all five entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    /// The guess matched the hidden square within five rounds.
    Solved { known_counts: Vec<usize> },
    /// Five rounds were played and wrong cells remained.
    OutOfTurns { known_counts: Vec<usize> },
    /// The completion engine found no square consistent with the feedback
    /// before its deadline.
    SolverStalled,
}

/// Play one game against a freshly sampled hidden square.
///
/// The hidden square is drawn with [`uniform_random_latin_square`]; passing
/// a seed makes the whole game reproducible.
pub fn simulate_game(
    first_guess: &Grid,
    solve_deadline: Duration,
    seed: Option<u64>,
) -> Result<GameOutcome, SimError> {
    let solution = uniform_random_latin_square(first_guess.order(), seed, None)?;
    simulate_game_against(first_guess, &solution, solve_deadline)
}

/// Play one game against a known hidden square.
pub fn simulate_game_against(
    first_guess: &Grid,
    solution: &Grid,
    solve_deadline: Duration,
) -> Result<GameOutcome, SimError> {
    let n = first_guess.order();
    let mut clues = Clues::new();
    let mut known_counts = Vec::with_capacity(MAX_ROUNDS);
    let mut guess = first_guess.clone();

    for round in 1..=MAX_ROUNDS {
        let (right, wrong) = compare_squares(&guess, solution)?;
        known_counts.push(clues.known_count());

        if wrong.is_empty() {
            trace!(round, "solved");
            return Ok(GameOutcome::Solved {
                known_counts: known_counts[1..].to_vec(),
            });
        }

        for cell in right {
            clues.insert_known(cell.at, cell.value);
        }
        for cell in wrong {
            clues.forbid(cell.at, cell.value);
        }
        trace!(round, known = clues.known_count(), "feedback folded");

        match complete_first(n, &clues, Deadline::after(solve_deadline))? {
            Some(next) => guess = next,
            None => return Ok(GameOutcome::SolverStalled),
        }
    }

    Ok(GameOutcome::OutOfTurns { known_counts })
}
