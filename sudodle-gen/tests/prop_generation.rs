//! Property-based tests for the generators.
//!
//! These tests verify:
//! - Every generated square is Latin, whatever the seed
//! - Generation and sampling are deterministic for a fixed seed
//! - The sampler's chain never leaves the Latin-square manifold

use std::time::Duration;

use proptest::prelude::*;
use sudodle_core::Deadline;
use sudodle_gen::{random_latin_square, random_latin_square_with_retries, uniform_random_latin_square};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn backtracked_squares_are_latin(n in 1u8..=8, seed: u64) {
        let grid = random_latin_square(n, Some(seed), Deadline::never()).unwrap();
        prop_assert_eq!(grid.order(), n);
        prop_assert!(grid.is_latin_square());
    }

    #[test]
    fn backtracking_is_deterministic(n in 2u8..=7, seed: u64) {
        let a = random_latin_square(n, Some(seed), Deadline::never()).unwrap();
        let b = random_latin_square(n, Some(seed), Deadline::never()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn retry_wrapper_agrees_with_the_direct_call(n in 2u8..=6, seed: u64) {
        let direct = random_latin_square(n, Some(seed), Deadline::never()).unwrap();
        let retried =
            random_latin_square_with_retries(n, Some(seed), Duration::from_secs(10)).unwrap();
        prop_assert_eq!(direct, retried);
    }

    #[test]
    fn sampled_squares_are_latin_and_reproducible(n in 1u8..=6, seed: u64) {
        let a = uniform_random_latin_square(n, Some(seed), Some(200)).unwrap();
        prop_assert!(a.is_latin_square());
        let b = uniform_random_latin_square(n, Some(seed), Some(200)).unwrap();
        prop_assert_eq!(a, b);
    }
}
