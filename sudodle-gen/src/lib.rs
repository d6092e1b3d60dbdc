#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod discovery;
pub mod generator;
pub mod sampler;
pub mod seed;

pub use crate::discovery::{find_single_solution_puzzles, score_puzzle_difficulty, DiscoveredPuzzle};
pub use crate::generator::{
    random_latin_square, random_latin_square_with_retries, RETRY_ATTEMPTS,
};
pub use crate::sampler::uniform_random_latin_square;
pub use sudodle_core::{cyclic_latin_square, Grid};

#[derive(thiserror::Error, Debug)]
pub enum GenError {
    #[error(transparent)]
    Core(#[from] sudodle_core::CoreError),
    #[error(transparent)]
    Solve(#[from] sudodle_solver::SolveError),
    #[error("backtracking timed out before completing a square")]
    Timeout,
    #[error("generation exhausted attempts ({attempts})")]
    AttemptsExhausted { attempts: u32 },
    #[error("tile set admits more than one completion")]
    AmbiguousPuzzle,
    #[error("base grid has unknown cells")]
    IncompleteBaseGrid,
}
