use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

pub fn rng_from_u64(seed: u64) -> ChaCha20Rng {
    // Deterministic across platforms and Rust versions for the same algorithm.
    // Uses the canonical SeedableRng mapping from `u64` to the full seed.
    ChaCha20Rng::seed_from_u64(seed)
}

/// A caller-supplied seed, or a fresh one from the thread rng. Everything
/// downstream goes through `rng_from_u64`, so a logged seed replays exactly.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Derive attempt-local seed streams deterministically.
pub fn derive_attempt_seed(base: u64, attempt: u32) -> u64 {
    base ^ (attempt as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
