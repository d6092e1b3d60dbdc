#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod game;
pub mod parallel;

pub use crate::game::{simulate_game, simulate_game_against, GameOutcome, MAX_ROUNDS};
pub use crate::parallel::{
    run_cyclic_simulations, run_parallel, run_simulations_in_parallel, TaskResult,
};

#[derive(thiserror::Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] sudodle_core::CoreError),
    #[error(transparent)]
    Solve(#[from] sudodle_solver::SolveError),
    #[error(transparent)]
    Gen(#[from] sudodle_gen::GenError),
}
