use core::cmp::min;

use crate::error::EntropyError;

/// Consecutive zero-length draws tolerated before giving up.
pub const MAX_EMPTY_DRAWS: usize = 64;

/// Fills `buf` with repeated draws of at most `max_len` bytes each.
///
/// `draw` returns how many bytes it wrote into the slice it was given. Short
/// and zero-length draws are retried until the buffer is full.
pub fn fill_bounded(
    buf: &mut [u8],
    max_len: usize,
    mut draw: impl FnMut(&mut [u8]) -> Result<usize, EntropyError>,
) -> Result<(), EntropyError> {
    assert!(max_len > 0);
    let mut offset = 0;
    let mut empty_draws = 0;
    while offset < buf.len() {
        let end = min(buf.len(), offset + max_len);
        let actual = draw(&mut buf[offset..end])?;
        if actual == 0 {
            empty_draws += 1;
            if empty_draws >= MAX_EMPTY_DRAWS {
                return Err(EntropyError::Exhausted);
            }
            continue;
        }
        empty_draws = 0;
        offset += min(actual, end - offset);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use wasm_bindgen_test::wasm_bindgen_test;

    use crate::error::EntropyError;

    use super::{fill_bounded, MAX_EMPTY_DRAWS};

    #[test]
    #[wasm_bindgen_test]
    fn test_chunks() {
        let mut buf = [0u8; 8];
        let mut lens = Vec::new();
        let mut next = 0u8;
        fill_bounded(&mut buf, 3, |chunk| {
            lens.push(chunk.len());
            for b in chunk.iter_mut() {
                next += 1;
                *b = next;
            }
            Ok(chunk.len())
        })
        .unwrap();
        assert_eq!(lens, [3, 3, 2]);
        assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_short_draws() {
        let mut buf = [0u8; 8];
        let mut calls = 0;
        fill_bounded(&mut buf, 256, |chunk| {
            calls += 1;
            if calls % 2 == 0 {
                return Ok(0);
            }
            chunk[0] = 0xAA;
            Ok(1)
        })
        .unwrap();
        assert_eq!(buf, [0xAA; 8]);
        assert_eq!(calls, 15);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_error() {
        let mut buf = [0u8; 8];
        let mut calls = 0;
        let result = fill_bounded(&mut buf, 4, |chunk| {
            calls += 1;
            if calls == 2 {
                return Err(EntropyError::Os(4));
            }
            Ok(chunk.len())
        });
        assert_eq!(result, Err(EntropyError::Os(4)));
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_exhausted() {
        let mut buf = [0u8; 8];
        let mut calls = 0;
        let result = fill_bounded(&mut buf, 8, |_| {
            calls += 1;
            Ok(0)
        });
        assert_eq!(result, Err(EntropyError::Exhausted));
        assert_eq!(calls, MAX_EMPTY_DRAWS);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_empty_buffer() {
        fill_bounded(&mut [], 8, |_| panic!()).unwrap();
    }
}
