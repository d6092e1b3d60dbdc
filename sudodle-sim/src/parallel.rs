//! Worker-pool harness for independent CPU-bound tasks.
//!
//! Tasks are self-contained closures with no shared mutable state; each one
//! receives its own [`Deadline`] and is expected to honor it cooperatively,
//! the way the solver and generator do. Results are collected in completion
//! order. A task whose wall clock overruns the per-task budget yields a
//! [`TaskResult::TimedOut`] sentinel — whatever it returned is discarded —
//! and the harness itself never fails.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use sudodle_core::{Deadline, Grid};
use sudodle_gen::cyclic_latin_square;

use crate::game::{simulate_game, GameOutcome};
use crate::SimError;

/// Per-round solve budget used by the simulation batch, matching the single
/// game default.
const BATCH_SOLVE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult<T> {
    Done(T),
    TimedOut,
}

impl<T> TaskResult<T> {
    pub fn is_timed_out(&self) -> bool {
        matches!(self, TaskResult::TimedOut)
    }
}

/// Run every task on a pool of `workers` threads, collecting results as
/// they finish (order is arbitrary).
pub fn run_parallel<T, F>(tasks: Vec<F>, workers: usize, per_task: Duration) -> Vec<TaskResult<T>>
where
    T: Send,
    F: FnOnce(Deadline) -> T + Send,
{
    let expected = tasks.len();
    let (tx, rx) = mpsc::channel();

    // The sender moves into the closure and dies with it, which is what
    // lets the receiver below run dry.
    let run_all = move || {
        rayon::scope(|scope| {
            for task in tasks {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let started = Instant::now();
                    let value = task(Deadline::after(per_task));
                    let result = if started.elapsed() > per_task {
                        TaskResult::TimedOut
                    } else {
                        TaskResult::Done(value)
                    };
                    let _ = tx.send(result);
                });
            }
        });
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
    {
        Ok(pool) => pool.install(run_all),
        // Pool construction only fails on resource exhaustion; fall back to
        // the global pool rather than dropping the batch.
        Err(_) => run_all(),
    }

    let results: Vec<TaskResult<T>> = rx.into_iter().collect();
    debug_assert_eq!(results.len(), expected);
    results
}

/// Simulate one game per first guess across the worker pool.
pub fn run_simulations_in_parallel(
    first_guesses: Vec<Grid>,
    workers: usize,
    per_task: Duration,
) -> Vec<TaskResult<Result<GameOutcome, SimError>>> {
    let tasks: Vec<_> = first_guesses
        .into_iter()
        .map(|guess| move |_deadline: Deadline| simulate_game(&guess, BATCH_SOLVE_TIMEOUT, None))
        .collect();
    run_parallel(tasks, workers, per_task)
}

/// Convenience: simulate `games` cyclic-first-guess games of order `n`.
pub fn run_cyclic_simulations(
    n: u8,
    games: usize,
    workers: usize,
    per_task: Duration,
) -> Result<Vec<TaskResult<Result<GameOutcome, SimError>>>, SimError> {
    let guess = cyclic_latin_square(n)?;
    Ok(run_simulations_in_parallel(
        vec![guess; games],
        workers,
        per_task,
    ))
}
