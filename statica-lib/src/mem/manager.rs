use core::alloc::Layout;

/// Owns the memory of heap objects. Static singletons never reach a manager.
pub trait Manager: Clone {
    // required:
    unsafe fn alloc(&self, layout: Layout) -> *mut u8;
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout);
}
