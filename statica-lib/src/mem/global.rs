use core::alloc::Layout;
use std::alloc::{alloc, dealloc, handle_alloc_error};

use super::manager::Manager;

#[derive(Debug, Clone, Copy, Default)]
pub struct Global();

pub const GLOBAL: Global = Global();

impl Manager for Global {
    #[inline(always)]
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let p = alloc(layout);
        if p.is_null() {
            handle_alloc_error(layout)
        }
        p
    }
    #[inline(always)]
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        dealloc(ptr, layout)
    }
}
