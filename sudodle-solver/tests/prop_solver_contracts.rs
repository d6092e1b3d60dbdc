//! Property-based tests for the completion engine's public contract.
//!
//! These tests verify:
//! - Every returned solution is a Latin square honoring all clues
//! - `max_solutions` bounds the result
//! - Solving is deterministic, including the branch-sample trace
//! - The heuristic solver agrees with the engine on the solution set

use proptest::prelude::*;
use sudodle_core::{cyclic_latin_square, Clues, Coord, Deadline};
use sudodle_solver::{complete_all, solve_by_heuristics};

/// Sudodle-style clues over the order-n cyclic square: cells in `revealed`
/// pin the cyclic value, cells in `poisoned` forbid it.
fn sudodle_clues(n: u8, revealed: &[usize], poisoned: &[usize]) -> Clues {
    let base = cyclic_latin_square(n).unwrap();
    let mut clues = Clues::new();
    for &idx in revealed {
        let at = Coord::new((idx / n as usize) as u8, (idx % n as usize) as u8);
        clues.insert_known(at, base.value(at).unwrap());
    }
    for &idx in poisoned {
        let at = Coord::new((idx / n as usize) as u8, (idx % n as usize) as u8);
        if clues.known_value(at).is_none() {
            clues.forbid(at, base.value(at).unwrap());
        }
    }
    clues
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Solutions are Latin squares satisfying every positive and negative
    /// clue, and their number respects `max_solutions`.
    #[test]
    fn solutions_honor_clues_and_bound(
        n in 3u8..=5,
        revealed in prop::collection::vec(0usize..25, 0..5),
        poisoned in prop::collection::vec(0usize..25, 0..8),
        limit in 1usize..=4,
    ) {
        let a = n as usize * n as usize;
        let revealed: Vec<usize> = revealed.into_iter().map(|i| i % a).collect();
        let poisoned: Vec<usize> = poisoned.into_iter().map(|i| i % a).collect();
        let clues = sudodle_clues(n, &revealed, &poisoned);

        let out = complete_all(n, &clues, Deadline::never(), Some(limit)).unwrap();
        prop_assert!(out.solutions.len() <= limit);
        for grid in &out.solutions {
            prop_assert!(grid.is_latin_square());
            for (at, value) in clues.known() {
                prop_assert_eq!(grid.value(at), Some(value));
            }
            for (at, forbidden) in clues.forbidden() {
                let held = grid.value(at).unwrap();
                prop_assert!(!forbidden.contains(&held));
            }
        }
    }

    /// Same clues in, same solutions and same branch trace out.
    #[test]
    fn solving_is_deterministic(
        n in 3u8..=5,
        revealed in prop::collection::vec(0usize..25, 0..4),
    ) {
        let a = n as usize * n as usize;
        let revealed: Vec<usize> = revealed.into_iter().map(|i| i % a).collect();
        let clues = sudodle_clues(n, &revealed, &[]);

        let first = complete_all(n, &clues, Deadline::never(), Some(8)).unwrap();
        let second = complete_all(n, &clues, Deadline::never(), Some(8)).unwrap();
        prop_assert_eq!(first, second);
    }

    /// The guess-counting solver finds the same solution set as the engine.
    #[test]
    fn heuristic_solver_agrees_with_engine(
        n in 3u8..=4,
        revealed in prop::collection::vec(0usize..16, 0..4),
    ) {
        let a = n as usize * n as usize;
        let revealed: Vec<usize> = revealed.into_iter().map(|i| i % a).collect();
        let poisoned: Vec<usize> = (0..a).collect();
        let clues = sudodle_clues(n, &revealed, &poisoned);

        let engine = complete_all(n, &clues, Deadline::never(), None).unwrap();
        let heuristic = solve_by_heuristics(n, &clues, engine.solutions.len() + 1).unwrap();

        let mut lhs: Vec<Vec<u8>> =
            engine.solutions.iter().map(|g| g.as_cells().to_vec()).collect();
        let mut rhs: Vec<Vec<u8>> =
            heuristic.solutions.iter().map(|g| g.as_cells().to_vec()).collect();
        lhs.sort();
        rhs.sort();
        prop_assert_eq!(lhs, rhs);
    }
}
