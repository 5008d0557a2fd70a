//! Deterministic key populations.

use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Default key prefix, matching typical `user:<id>` cache keys.
pub const DEFAULT_PREFIX: &str = "user";

/// Unbounded, reproducible stream of pseudo-random keys.
///
/// Key `i` is `"{prefix}:{h:016x}"` where `h = xxh3(i, seed)`; the same
/// `(prefix, seed)` always produces the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySampler {
    prefix: String,
    seed: u64,
}

impl KeySampler {
    pub fn new(seed: u64) -> Self {
        Self::with_prefix(DEFAULT_PREFIX, seed)
    }

    pub fn with_prefix(prefix: impl Into<String>, seed: u64) -> Self {
        Self {
            prefix: prefix.into(),
            seed,
        }
    }

    /// The `index`-th key of the stream.
    pub fn key(&self, index: u64) -> String {
        let h = xxh3_64_with_seed(&index.to_le_bytes(), self.seed);
        format!("{}:{:016x}", self.prefix, h)
    }

    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        (0u64..).map(move |i| self.key(i))
    }

    /// The first `n` keys.
    pub fn keys(&self, n: usize) -> Vec<String> {
        self.iter().take(n).collect()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
