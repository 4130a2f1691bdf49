use core::{
    alloc::Layout,
    marker::PhantomData,
    mem::{align_of, size_of},
};

const fn max(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}

/// Placement of a tail `A` directly after a header `T` in one block.
pub struct FieldLayout<T, A> {
    pub align: usize,
    pub size: usize,
    _0: PhantomData<(T, A)>,
}

impl<T, A> FieldLayout<T, A> {
    pub const fn align_to(adjacent_align: usize) -> FieldLayout<T, A> {
        assert!(adjacent_align.is_power_of_two());
        assert!(adjacent_align >= align_of::<A>());
        FieldLayout {
            align: max(align_of::<T>(), adjacent_align),
            size: {
                let mask = adjacent_align - 1;
                (size_of::<T>() + mask) & !mask
            },
            _0: PhantomData,
        }
    }
    /// The block layout for a header followed by `len` items of `A`.
    pub const fn array_layout(&self, len: usize) -> Option<Layout> {
        let items = match size_of::<A>().checked_mul(len) {
            Some(items) => items,
            None => return None,
        };
        let size = match self.size.checked_add(items) {
            Some(size) => size,
            None => return None,
        };
        match Layout::from_size_align(size, self.align) {
            Ok(layout) => Some(layout),
            Err(_) => None,
        }
    }
    #[inline(always)]
    pub fn to_adjacent(&self, r: *const T) -> *const A {
        unsafe { (r as *const u8).add(self.size) as *const A }
    }
    #[inline(always)]
    pub fn to_adjacent_mut(&self, r: *mut T) -> *mut A {
        unsafe { (r as *mut u8).add(self.size) as *mut A }
    }
}

#[cfg(test)]
mod test {
    use core::ptr::{addr_of, addr_of_mut};

    use wasm_bindgen_test::wasm_bindgen_test;

    use super::FieldLayout;

    const _A_4_1: FieldLayout<u32, u8> = FieldLayout::align_to(1);
    const _: () = assert!(_A_4_1.align == 4 && _A_4_1.size == 4);

    const _A_4_8: FieldLayout<u32, u8> = FieldLayout::align_to(8);
    const _: () = assert!(_A_4_8.align == 8 && _A_4_8.size == 8);

    const _A_1_4: FieldLayout<[u8; 3], u8> = FieldLayout::align_to(4);
    const _: () = assert!(_A_1_4.align == 4 && _A_1_4.size == 4);

    const _A_16_2: FieldLayout<[usize; 2], u16> = FieldLayout::align_to(2);
    const _: () = assert!(_A_16_2.size == 2 * core::mem::size_of::<usize>());

    #[test]
    #[wasm_bindgen_test]
    fn test_array_layout() {
        let layout = _A_4_8.array_layout(3).unwrap();
        assert_eq!(layout.size(), 11);
        assert_eq!(layout.align(), 8);
        assert!(_A_4_1.array_layout(usize::MAX).is_none());
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_to_adjacent() {
        #[repr(C)]
        struct Block {
            header: u32,
            items: [u8; 2],
        }
        let mut b = Block {
            header: 7,
            items: [1, 2],
        };
        let items = _A_4_1.to_adjacent_mut(addr_of_mut!(b) as *mut u32);
        unsafe {
            assert_eq!(*items, 1);
            *items.add(1) = 3;
        }
        assert_eq!(b.header, 7);
        assert_eq!(b.items, [1, 3]);
        assert_eq!(unsafe { *_A_4_1.to_adjacent(addr_of!(b) as *const u32) }, 1);
    }

    #[test]
    #[should_panic]
    #[wasm_bindgen_test]
    fn test_invalid_align1() {
        FieldLayout::<u32, u8>::align_to(3);
    }

    #[test]
    #[should_panic]
    #[wasm_bindgen_test]
    fn test_invalid_align2() {
        FieldLayout::<u32, u16>::align_to(1);
    }
}
