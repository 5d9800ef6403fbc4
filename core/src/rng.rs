//! Deterministic random number generation.
//!
//! RULE: Nothing in the game core may call any platform RNG.
//! All randomness flows through LuckRng instances seeded from a
//! string key. The same key yields the same stream in every process,
//! on every run, forever.
//!
//! The key is hashed with 64-bit FNV-1a (stable across Rust versions,
//! unlike `std::hash`), and the hash seeds a PCG stream.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME:  u64 = 0x0000_0100_0000_01b3;

/// Stable 64-bit FNV-1a hash.
pub fn stable_hash(key: &str) -> u64 {
    key.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
    })
}

/// A deterministic RNG stream derived from a string key.
pub struct LuckRng {
    inner: Pcg64Mcg,
}

impl LuckRng {
    pub fn from_key(key: &str) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(stable_hash(key)),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// The first roll of the stream for `key`: a float in [0.0, 1.0).
pub fn luck(key: &str) -> f64 {
    LuckRng::from_key(key).next_f64()
}
