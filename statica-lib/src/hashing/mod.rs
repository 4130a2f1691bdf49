//! The process-wide hashing seed.
//!
//! [`hashing_parameters`] returns the same value for the whole life of the
//! process. It is computed once, by whichever thread gets there first, before
//! any hash is computed with it.
pub mod config;
pub mod entropy;
mod global;
mod hasher;

pub use config::{HashingConfig, DETERMINISTIC_HASHING_ENV};
pub use global::initializations;
pub use hasher::SeededState;

use crate::error::{fatal_entropy_error, EntropyError};

use self::entropy::{random_u64, EntropySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParameters {
    pub seed0: u64,
    pub seed1: u64,
    pub deterministic: bool,
}

impl HashingParameters {
    pub const DETERMINISTIC: Self = Self {
        seed0: 0,
        seed1: 0,
        deterministic: true,
    };
    /// Draws two independent seeds unless `config` asks for determinism.
    pub fn try_new(
        config: &HashingConfig,
        source: &mut impl EntropySource,
    ) -> Result<Self, EntropyError> {
        if config.deterministic {
            return Ok(Self::DETERMINISTIC);
        }
        let seed0 = random_u64(source)?;
        let seed1 = random_u64(source)?;
        if seed0 == 0 && seed1 == 0 {
            return Err(EntropyError::ZeroSeed);
        }
        Ok(Self {
            seed0,
            seed1,
            deterministic: false,
        })
    }
    pub fn new(config: &HashingConfig, source: &mut impl EntropySource) -> Self {
        match Self::try_new(config, source) {
            Ok(parameters) => parameters,
            Err(e) => fatal_entropy_error(e),
        }
    }
}

/// The parameters of this process. The first call initializes them.
#[inline(always)]
pub fn hashing_parameters() -> &'static HashingParameters {
    global::get()
}

/// Computes the parameters ahead of any hash. Binaries call this first
/// thing in `main`.
pub fn initialize() {
    global::get();
}

#[cfg(test)]
mod test {
    use std::ptr;

    use wasm_bindgen_test::wasm_bindgen_test;

    use crate::{error::EntropyError, hashing::entropy::EntropySource};

    use super::*;

    struct Fixed(u8);

    impl EntropySource for Fixed {
        fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError> {
            buf.fill(self.0);
            self.0 = self.0.wrapping_add(1);
            Ok(())
        }
    }

    struct Silent();

    impl EntropySource for Silent {
        fn fill(&mut self, _: &mut [u8]) -> Result<(), EntropyError> {
            Ok(())
        }
    }

    struct Untouchable();

    impl EntropySource for Untouchable {
        fn fill(&mut self, _: &mut [u8]) -> Result<(), EntropyError> {
            panic!("deterministic mode must not draw entropy")
        }
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_deterministic() {
        let config = HashingConfig {
            deterministic: true,
        };
        assert_eq!(
            HashingParameters::new(&config, &mut Untouchable()),
            HashingParameters {
                seed0: 0,
                seed1: 0,
                deterministic: true
            }
        );
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_random() {
        let p = HashingParameters::new(&HashingConfig::default(), &mut Fixed(1));
        assert_eq!(p.seed0, 0x0101_0101_0101_0101);
        assert_eq!(p.seed1, 0x0202_0202_0202_0202);
        assert!(!p.deterministic);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_zero_seed_is_an_error() {
        assert_eq!(
            HashingParameters::try_new(&HashingConfig::default(), &mut Silent()),
            Err(EntropyError::ZeroSeed)
        );
    }

    #[test]
    fn test_process_parameters() {
        let p = hashing_parameters();
        assert!(ptr::eq(p, hashing_parameters()));
        initialize();
        assert!(ptr::eq(p, hashing_parameters()));
        assert_eq!(initializations(), 1);
        assert_eq!(p.deterministic, HashingConfig::from_env().deterministic);
        if p.deterministic {
            assert_eq!(*p, HashingParameters::DETERMINISTIC);
        } else {
            assert!(p.seed0 != 0 || p.seed1 != 0);
        }
    }
}
