#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod error;
pub mod heuristics;
pub mod solver;

mod state;

pub use crate::error::SolveError;
pub use crate::heuristics::{solve_by_heuristics, HeuristicOutcome};
pub use crate::solver::{complete_all, complete_first, Completions};
pub use sudodle_core::{Clues, Deadline, Grid};
