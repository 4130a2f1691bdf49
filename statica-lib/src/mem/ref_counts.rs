use core::sync::atomic::{fence, AtomicIsize, Ordering};

/// Update a reference count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefUpdate {
    AddRef = 1,
    Read = 0,
    Release = -1,
}

/// The number of references beyond the first one.
///
/// `0` means the object is uniquely owned. Statically allocated objects hold
/// [`RefCounts::IMMORTAL`] and ignore every update.
#[repr(transparent)]
#[derive(Debug)]
pub struct RefCounts {
    counter: AtomicIsize,
}

impl RefCounts {
    pub const IMMORTAL: isize = isize::MIN;
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            counter: AtomicIsize::new(0),
        }
    }
    #[inline(always)]
    pub const fn immortal() -> Self {
        Self {
            counter: AtomicIsize::new(Self::IMMORTAL),
        }
    }
    #[inline(always)]
    pub fn is_immortal(&self) -> bool {
        self.counter.load(Ordering::Relaxed) == Self::IMMORTAL
    }
    /// Returns the value before the update.
    pub fn update(&self, val: RefUpdate) -> isize {
        if self.is_immortal() {
            return Self::IMMORTAL;
        }
        match val {
            RefUpdate::Read => self.counter.load(Ordering::Acquire),
            RefUpdate::AddRef => self.counter.fetch_add(1, Ordering::Relaxed),
            RefUpdate::Release => {
                let result = self.counter.fetch_sub(1, Ordering::Release);
                if result == 0 {
                    fence(Ordering::Acquire);
                }
                result
            }
        }
    }
    #[inline(always)]
    pub fn is_unique(&self) -> bool {
        self.update(RefUpdate::Read) == 0
    }
    #[inline(always)]
    pub fn retain(&self) {
        self.update(RefUpdate::AddRef);
    }
    /// Returns `true` when the last reference is gone and the object must be destroyed.
    #[inline(always)]
    pub fn release(&self) -> bool {
        self.update(RefUpdate::Release) == 0
    }
}

impl Default for RefCounts {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use wasm_bindgen_test::wasm_bindgen_test;

    use super::{RefCounts, RefUpdate};

    #[test]
    #[wasm_bindgen_test]
    fn test() {
        let x = RefCounts::default();
        assert!(x.is_unique());
        assert_eq!(x.update(RefUpdate::Read), 0);
        assert_eq!(x.update(RefUpdate::AddRef), 0);
        assert!(!x.is_unique());
        assert_eq!(x.update(RefUpdate::Release), 1);
        assert_eq!(x.update(RefUpdate::Read), 0);
        assert!(x.release());
        assert_eq!(x.update(RefUpdate::Read), -1);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_immortal() {
        let x = RefCounts::immortal();
        assert!(x.is_immortal());
        assert!(!x.is_unique());
        x.retain();
        for _ in 0..10 {
            assert!(!x.release());
        }
        assert_eq!(x.update(RefUpdate::Read), RefCounts::IMMORTAL);
        assert!(!RefCounts::new().is_immortal());
    }
}
