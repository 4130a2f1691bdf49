use core::{
    alloc::Layout,
    sync::atomic::{AtomicUsize, Ordering},
};

use super::{global::GLOBAL, manager::Manager};

/// A manager that tracks how many blocks and bytes are alive.
#[derive(Debug, Default)]
pub struct Local {
    counter: AtomicUsize,
    size: AtomicUsize,
}

impl Local {
    pub fn counter(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }
}

impl Manager for &Local {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.counter.fetch_add(1, Ordering::Relaxed);
        self.size.fetch_add(layout.size(), Ordering::Relaxed);
        GLOBAL.alloc(layout)
    }
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.counter.fetch_sub(1, Ordering::Relaxed);
        self.size.fetch_sub(layout.size(), Ordering::Relaxed);
        GLOBAL.dealloc(ptr, layout)
    }
}
