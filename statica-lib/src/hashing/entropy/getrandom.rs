use std::io;

use crate::error::EntropyError;

use super::{fill_bounded, EntropySource};

/// Upper bound for a single `getrandom(2)` request. Requests up to 256 bytes
/// are never interrupted by signals once the pool is initialized.
pub const MAX_DRAW_LEN: usize = 256;

#[derive(Debug, Default)]
pub struct GetRandom();

impl EntropySource for GetRandom {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError> {
        fill_bounded(buf, MAX_DRAW_LEN, |chunk| {
            let result = unsafe { libc::getrandom(chunk.as_mut_ptr().cast(), chunk.len(), 0) };
            if result >= 0 {
                return Ok(result as usize);
            }
            match io::Error::last_os_error().raw_os_error() {
                Some(libc::EINTR) => Ok(0),
                Some(code) => Err(EntropyError::Os(code)),
                None => Err(EntropyError::Exhausted),
            }
        })
    }
}

#[cfg(test)]
mod test {
    use crate::hashing::entropy::EntropySource;

    use super::{GetRandom, MAX_DRAW_LEN};

    #[test]
    fn test_large() {
        let mut buf = vec![0u8; MAX_DRAW_LEN * 3 + 5];
        GetRandom().fill(&mut buf).unwrap();
        assert!(buf.iter().any(|b| *b != 0));
        assert!(buf[MAX_DRAW_LEN * 3..].iter().any(|b| *b != 0));
    }
}
