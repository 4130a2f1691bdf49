use crate::error::EntropyError;

use super::EntropySource;

/// `arc4random_buf` never fails and always fills the whole buffer.
#[derive(Debug, Default)]
pub struct Arc4Random();

impl EntropySource for Arc4Random {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), EntropyError> {
        unsafe { libc::arc4random_buf(buf.as_mut_ptr().cast(), buf.len()) };
        Ok(())
    }
}
