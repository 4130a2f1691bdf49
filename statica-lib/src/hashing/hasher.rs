use core::hash::{BuildHasher, Hash};

use ahash::{AHasher, RandomState};

use super::{hashing_parameters, HashingParameters};

/// Builds hashers keyed by the process seed pair.
#[derive(Clone, Debug)]
pub struct SeededState(RandomState);

impl SeededState {
    pub fn new() -> Self {
        Self::with_parameters(hashing_parameters())
    }
    pub fn with_parameters(p: &HashingParameters) -> Self {
        Self(RandomState::with_seeds(p.seed0, p.seed1, !p.seed0, !p.seed1))
    }
    #[inline(always)]
    pub fn hash<T: Hash + ?Sized>(&self, value: &T) -> u64 {
        self.0.hash_one(value)
    }
}

impl Default for SeededState {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildHasher for SeededState {
    type Hasher = AHasher;
    #[inline(always)]
    fn build_hasher(&self) -> AHasher {
        self.0.build_hasher()
    }
}
