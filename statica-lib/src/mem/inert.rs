use core::mem::align_of;

use super::{heap_object::HeapObject, metadata::Metadata};

/// Writes only a heap object header at `address` and returns it typed.
///
/// The object is immortal: nothing retains, releases or frees it. The caller
/// owns the memory and must provide at least `size_of::<HeapObject>()` bytes
/// aligned to `align_of::<HeapObject>()`.
#[inline(always)]
pub unsafe fn instantiate_inert_heap_object(
    address: *mut u8,
    metadata: &'static Metadata,
) -> *mut HeapObject {
    debug_assert!(!address.is_null());
    debug_assert_eq!(address as usize % align_of::<HeapObject>(), 0);
    let p = address as *mut HeapObject;
    p.write(HeapObject::immortal(metadata));
    p
}

#[cfg(test)]
mod test {
    use core::{
        mem::{size_of, MaybeUninit},
        ptr,
    };

    use wasm_bindgen_test::wasm_bindgen_test;

    use crate::mem::{heap_object::HeapObject, metadata::RAW_SET_STORAGE};

    use super::instantiate_inert_heap_object;

    #[test]
    #[wasm_bindgen_test]
    fn test() {
        #[repr(C)]
        struct Object {
            header: MaybeUninit<HeapObject>,
            tail: usize,
        }
        let mut buffer = Object {
            header: MaybeUninit::uninit(),
            tail: 0x1234,
        };
        let address = buffer.header.as_mut_ptr() as *mut u8;
        let p = unsafe { instantiate_inert_heap_object(address, &RAW_SET_STORAGE) };
        assert_eq!(p as *mut u8, address);
        let object = unsafe { &*p };
        assert!(ptr::eq(object.metadata(), &RAW_SET_STORAGE));
        assert!(object.is_immortal());
        assert!(!object.ref_counts().release());
        // Bytes past the header are untouched.
        assert_eq!(buffer.tail, 0x1234);
        assert_eq!(size_of::<Object>(), size_of::<HeapObject>() + size_of::<usize>());
    }
}
