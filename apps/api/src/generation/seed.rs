//! Seed resolution and the per-request PRNG.
//!
//! A request's seed string is hashed with 64-bit FNV-1a so the same string
//! always reproduces the same placement stream. An empty seed falls back to
//! the wall clock; the resolved value is echoed back so a caller can replay it.

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FNV_OFFSET_BASIS: i64 = 1_469_598_103_934_665_603;
const FNV_PRIME: i64 = 1_099_511_628_211;

/// Hashes `seed` to a signed 64-bit value, or reads the clock when empty.
pub fn seed_from_string(seed: &str) -> i64 {
    if seed.is_empty() {
        return Utc::now().timestamp_nanos_opt().unwrap_or_default();
    }
    seed.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ i64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Builds the deterministic random stream for one generation call.
pub fn seeded_rng(seed: i64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed as u64)
}
