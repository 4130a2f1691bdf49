use core::ptr::NonNull;

pub const WORD_BITS: usize = usize::BITS as usize;

/// A bit per slot, set when the slot holds an initialized entry.
#[repr(C)]
#[derive(Debug)]
pub struct Bitmap {
    words: NonNull<usize>,
    bit_count: usize,
}

impl Bitmap {
    #[inline(always)]
    pub const fn new(words: NonNull<usize>, bit_count: usize) -> Self {
        Self { words, bit_count }
    }
    #[inline(always)]
    pub const fn word_count_for(bit_count: usize) -> usize {
        bit_count.div_ceil(WORD_BITS)
    }
    #[inline(always)]
    pub const fn bit_count(&self) -> usize {
        self.bit_count
    }
    #[inline(always)]
    pub const fn words(&self) -> NonNull<usize> {
        self.words
    }
    #[inline(always)]
    pub unsafe fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.bit_count);
        (*self.words.as_ptr().add(i / WORD_BITS) >> (i % WORD_BITS)) & 1 != 0
    }
    #[inline(always)]
    pub unsafe fn set(&mut self, i: usize) {
        debug_assert!(i < self.bit_count);
        *self.words.as_ptr().add(i / WORD_BITS) |= 1 << (i % WORD_BITS);
    }
    #[inline(always)]
    pub unsafe fn clear(&mut self, i: usize) {
        debug_assert!(i < self.bit_count);
        *self.words.as_ptr().add(i / WORD_BITS) &= !(1 << (i % WORD_BITS));
    }
}
