use std::{
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hasher},
};

use rand_chacha::{
    rand_core::{RngCore, SeedableRng},
    ChaCha20Rng,
};

use crate::error::EntropyError;

use super::EntropySource;

/// A ChaCha engine seeded once from the OS random device, drawing uniform
/// 64-bit values.
pub struct DeviceSeeded {
    rng: ChaCha20Rng,
}

impl DeviceSeeded {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: ChaCha20Rng::from_seed(seed),
        }
    }
}

impl Default for DeviceSeeded {
    fn default() -> Self {
        Self::from_seed(device_seed())
    }
}

/// `RandomState` keys come from the OS random device.
fn device_seed() -> [u8; 32] {
    let random_state = RandomState::new();
    let mut seed = [0u8; 32];
    for (i, chunk) in seed.chunks_exact_mut(8).enumerate() {
        let mut hasher = random_state.build_hasher();
        hasher.write_usize(i);
        chunk.copy_from_slice(&hasher.finish().to_le_bytes());
    }
    seed
}

impl EntropySource for DeviceSeeded {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError> {
        for chunk in buf.chunks_mut(8) {
            let value = self.rng.next_u64().to_ne_bytes();
            chunk.copy_from_slice(&value[..chunk.len()]);
        }
        Ok(())
    }
}
