//! Secure randomness behind one capability: fill a buffer completely or fail.
//!
//! The concrete source is chosen at build time:
//! - Apple and BSD targets fill buffers with `arc4random_buf`;
//! - Linux and Android draw from `getrandom(2)` in bounded chunks;
//! - everything else runs a ChaCha engine seeded from the OS random device.
mod bounded;
mod device;

pub use bounded::{fill_bounded, MAX_EMPTY_DRAWS};
pub use device::DeviceSeeded;

use crate::error::EntropyError;

pub trait EntropySource {
    /// Fills all of `buf` or returns an error. Never leaves it partially filled on `Ok`.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError>;
}

cfg_if::cfg_if! {
    if #[cfg(any(
        target_vendor = "apple",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))] {
        mod arc4random;
        pub use arc4random::Arc4Random as SystemEntropy;
    } else if #[cfg(any(target_os = "linux", target_os = "android"))] {
        mod getrandom;
        pub use getrandom::GetRandom as SystemEntropy;
    } else {
        pub use device::DeviceSeeded as SystemEntropy;
    }
}

pub fn random_u64(source: &mut impl EntropySource) -> Result<u64, EntropyError> {
    let mut buf = [0u8; 8];
    source.fill(&mut buf)?;
    Ok(u64::from_ne_bytes(buf))
}
