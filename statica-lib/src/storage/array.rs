use core::{
    alloc::Layout,
    mem::{align_of, size_of},
    ptr::{self, NonNull},
};

use crate::mem::{
    field_layout::FieldLayout,
    heap_object::HeapObject,
    manager::Manager,
    metadata::{self, ARRAY_STORAGE_BASE},
};

/// Low bit of `capacity_and_flags`.
pub const ELEMENT_TYPE_IS_BRIDGED_VERBATIM: usize = 1;

#[repr(C)]
#[derive(Debug)]
pub struct ArrayBody {
    count: usize,
    capacity_and_flags: usize,
}

impl ArrayBody {
    pub const fn new(count: usize, capacity: usize, bridged_verbatim: bool) -> Self {
        Self {
            count,
            capacity_and_flags: (capacity << 1) | bridged_verbatim as usize,
        }
    }
    #[inline(always)]
    pub const fn count(&self) -> usize {
        self.count
    }
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.capacity_and_flags >> 1
    }
    #[inline(always)]
    pub const fn capacity_and_flags(&self) -> usize {
        self.capacity_and_flags
    }
    #[inline(always)]
    pub const fn element_type_is_bridged_verbatim(&self) -> bool {
        self.capacity_and_flags & ELEMENT_TYPE_IS_BRIDGED_VERBATIM != 0
    }
}

/// Common prefix of the empty singleton and of every allocated array buffer.
/// Elements, if any, follow it in the same block.
#[repr(C)]
#[derive(Debug)]
pub struct ArrayStorage {
    pub object: HeapObject,
    pub body: ArrayBody,
}

impl ArrayStorage {
    #[inline(always)]
    pub fn is_array_storage(&self) -> bool {
        self.object.metadata().is_subclass_of(&ARRAY_STORAGE_BASE)
    }
}

pub static EMPTY_ARRAY_STORAGE: ArrayStorage = ArrayStorage {
    object: HeapObject::immortal(&metadata::EMPTY_ARRAY_STORAGE),
    body: ArrayBody::new(0, 0, true),
};

#[inline(always)]
pub fn empty_array_storage() -> NonNull<ArrayStorage> {
    NonNull::from(&EMPTY_ARRAY_STORAGE)
}

#[inline(always)]
pub fn is_empty_array_storage(p: NonNull<ArrayStorage>) -> bool {
    ptr::eq(p.as_ptr(), &EMPTY_ARRAY_STORAGE)
}

/// Allocation helpers for buffers holding `T` elements.
pub struct ArrayBuffer<T>(core::marker::PhantomData<T>);

impl<T> ArrayBuffer<T> {
    const ELEMENTS: FieldLayout<ArrayStorage, T> = FieldLayout::align_to(align_of::<T>());
    pub fn layout(capacity: usize) -> Layout {
        match Self::ELEMENTS.array_layout(capacity) {
            Some(layout) => layout,
            None => capacity_overflow(),
        }
    }
    /// Allocates a uniquely owned buffer with `count == 0`.
    pub fn allocate<M: Manager>(manager: &M, capacity: usize) -> NonNull<ArrayStorage> {
        let capacity = if size_of::<T>() == 0 {
            usize::MAX >> 1
        } else {
            capacity
        };
        unsafe {
            let p = manager.alloc(Self::layout(capacity)) as *mut ArrayStorage;
            p.write(ArrayStorage {
                object: HeapObject::new(&metadata::CONTIGUOUS_ARRAY_STORAGE),
                body: ArrayBody::new(0, capacity, false),
            });
            NonNull::new_unchecked(p)
        }
    }
    #[inline(always)]
    pub unsafe fn elements(p: NonNull<ArrayStorage>) -> *mut T {
        Self::ELEMENTS.to_adjacent_mut(p.as_ptr())
    }
    #[inline(always)]
    pub unsafe fn set_count(p: NonNull<ArrayStorage>, count: usize) {
        debug_assert!(!is_empty_array_storage(p));
        (*p.as_ptr()).body.count = count;
    }
    /// Drops the elements and returns the block to the manager.
    pub unsafe fn destroy<M: Manager>(manager: &M, p: NonNull<ArrayStorage>) {
        debug_assert!(!is_empty_array_storage(p));
        let body = &(*p.as_ptr()).body;
        let (count, capacity) = (body.count(), body.capacity());
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(Self::elements(p), count));
        manager.dealloc(p.as_ptr() as *mut u8, Self::layout(capacity));
    }
}

#[cold]
#[inline(never)]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

const _: () = assert!(size_of::<ArrayStorage>() == 4 * size_of::<usize>());

#[cfg(test)]
mod test {
    use core::ptr;

    use wasm_bindgen_test::wasm_bindgen_test;

    use crate::mem::{
        local::Local,
        metadata::{CONTIGUOUS_ARRAY_STORAGE, EMPTY_ARRAY_STORAGE as EMPTY_METADATA},
    };

    use super::*;

    #[test]
    #[wasm_bindgen_test]
    fn test_empty_singleton() {
        let a = empty_array_storage();
        let b = empty_array_storage();
        assert_eq!(a, b);
        assert!(is_empty_array_storage(a));
        let s = unsafe { a.as_ref() };
        assert_eq!(s.body.count(), 0);
        assert_eq!(s.body.capacity(), 0);
        assert_eq!(s.body.capacity_and_flags(), 1);
        assert!(s.body.element_type_is_bridged_verbatim());
        assert!(s.is_array_storage());
        assert!(s.object.is_immortal());
        assert!(ptr::eq(s.object.metadata(), &EMPTY_METADATA));
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_buffer() {
        let local = Local::default();
        let m = &local;
        let p = ArrayBuffer::<u64>::allocate(&m, 3);
        assert_eq!(local.counter(), 1);
        assert_eq!(local.size(), 4 * size_of::<usize>() + 3 * 8);
        assert!(!is_empty_array_storage(p));
        unsafe {
            let s = p.as_ref();
            assert!(s.is_array_storage());
            assert!(ptr::eq(s.object.metadata(), &CONTIGUOUS_ARRAY_STORAGE));
            assert!(!s.body.element_type_is_bridged_verbatim());
            assert_eq!(s.body.capacity(), 3);
            let e = ArrayBuffer::<u64>::elements(p);
            e.write(5);
            e.add(1).write(6);
            ArrayBuffer::<u64>::set_count(p, 2);
            assert_eq!(p.as_ref().body.count(), 2);
            ArrayBuffer::<u64>::destroy(&m, p);
        }
        assert_eq!(local.counter(), 0);
    }

    #[test]
    #[should_panic]
    #[wasm_bindgen_test]
    fn test_overflow() {
        ArrayBuffer::<u64>::layout(usize::MAX);
    }
}
