use std::error::Error;
use std::{fmt, process};

/// The secure randomness source could not produce the requested bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntropyError {
    /// The platform call failed with this OS error code.
    Os(i32),
    /// The source kept returning zero bytes.
    Exhausted,
    /// The source reported success but the seed pair is all zeros.
    ZeroSeed,
}

impl fmt::Display for EntropyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Os(code) => write!(f, "entropy source failed with os error {code}"),
            Self::Exhausted => write!(f, "entropy source returned no data"),
            Self::ZeroSeed => write!(f, "entropy source produced an all-zero seed"),
        }
    }
}

impl Error for EntropyError {}

fn fatal_message(e: EntropyError) -> String {
    format!("hashing seed initialization failed: {e}")
}

/// Seeds are never degraded: a failing source terminates the process,
/// whichever thread observes it.
#[cold]
#[inline(never)]
pub fn fatal_entropy_error(e: EntropyError) -> ! {
    eprintln!("{}", fatal_message(e));
    process::abort()
}

#[cfg(test)]
mod test {
    use wasm_bindgen_test::wasm_bindgen_test;

    use super::{fatal_message, EntropyError};

    #[test]
    #[wasm_bindgen_test]
    fn test_display() {
        assert_eq!(
            EntropyError::Os(4).to_string(),
            "entropy source failed with os error 4"
        );
        assert_eq!(
            EntropyError::Exhausted.to_string(),
            "entropy source returned no data"
        );
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_fatal_message() {
        assert_eq!(
            fatal_message(EntropyError::ZeroSeed),
            "hashing seed initialization failed: entropy source produced an all-zero seed"
        );
    }
}
