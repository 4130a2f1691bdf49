use core::{
    cmp::max,
    fmt,
    marker::PhantomData,
    mem::replace,
    ptr::{self, NonNull},
    slice,
};

use crate::{
    mem::{
        global::{Global, GLOBAL},
        manager::Manager,
    },
    storage::array::{empty_array_storage, is_empty_array_storage, ArrayBuffer, ArrayStorage},
};

pub struct Array<T, M: Manager = Global> {
    storage: NonNull<ArrayStorage>,
    manager: M,
    _0: PhantomData<T>,
}

unsafe impl<T: Send + Sync, M: Manager + Send> Send for Array<T, M> {}
unsafe impl<T: Send + Sync, M: Manager + Sync> Sync for Array<T, M> {}

impl<T> Array<T> {
    #[inline(always)]
    pub fn new() -> Self {
        Self::new_in(GLOBAL)
    }
}

impl<T> Default for Array<T> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, M: Manager> Array<T, M> {
    #[inline(always)]
    pub fn new_in(manager: M) -> Self {
        Self {
            storage: empty_array_storage(),
            manager,
            _0: PhantomData,
        }
    }
    #[inline(always)]
    fn storage(&self) -> &ArrayStorage {
        unsafe { self.storage.as_ref() }
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.storage().body.count()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage().body.capacity()
    }
    #[inline(always)]
    pub fn is_empty_singleton(&self) -> bool {
        is_empty_array_storage(self.storage)
    }
    /// The address of the backing buffer. Equal for all empty arrays.
    #[inline(always)]
    pub fn storage_address(&self) -> *const ArrayStorage {
        self.storage.as_ptr()
    }
    pub fn as_slice(&self) -> &[T] {
        let len = self.len();
        if len == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(ArrayBuffer::<T>::elements(self.storage), len) }
    }
    #[inline(always)]
    pub fn get(&self, i: usize) -> Option<&T> {
        self.as_slice().get(i)
    }
    /// Points back at the empty singleton, dropping this reference to the buffer.
    pub fn remove_all(&mut self) {
        let old = replace(&mut self.storage, empty_array_storage());
        self.release(old);
    }
    fn release(&self, p: NonNull<ArrayStorage>) {
        unsafe {
            if p.as_ref().object.ref_counts().release() {
                ArrayBuffer::<T>::destroy(&self.manager, p);
            }
        }
    }
}

impl<T: Clone, M: Manager> Array<T, M> {
    pub fn push(&mut self, value: T) {
        let count = self.len();
        if !self.storage().object.ref_counts().is_unique() || count == self.capacity() {
            self.reallocate(max(count + 1, self.capacity() * 2));
        }
        unsafe {
            ArrayBuffer::<T>::elements(self.storage).add(count).write(value);
            ArrayBuffer::<T>::set_count(self.storage, count + 1);
        }
    }
    pub fn pop(&mut self) -> Option<T> {
        let count = self.len();
        if count == 0 {
            return None;
        }
        if !self.storage().object.ref_counts().is_unique() {
            self.reallocate(self.capacity());
        }
        unsafe {
            ArrayBuffer::<T>::set_count(self.storage, count - 1);
            Some(ArrayBuffer::<T>::elements(self.storage).add(count - 1).read())
        }
    }
    /// Moves to a uniquely owned buffer. Elements are moved out of a unique
    /// buffer and cloned out of a shared one.
    fn reallocate(&mut self, capacity: usize) {
        let count = self.len();
        let new = ArrayBuffer::<T>::allocate(&self.manager, capacity);
        // The singleton has no element area, not even an aligned one.
        if count != 0 {
            unsafe {
                let src = ArrayBuffer::<T>::elements(self.storage);
                let dst = ArrayBuffer::<T>::elements(new);
                if self.storage().object.ref_counts().is_unique() {
                    ptr::copy_nonoverlapping(src, dst, count);
                    ArrayBuffer::<T>::set_count(self.storage, 0);
                } else {
                    for i in 0..count {
                        dst.add(i).write((*src.add(i)).clone());
                    }
                }
                ArrayBuffer::<T>::set_count(new, count);
            }
        }
        let old = replace(&mut self.storage, new);
        self.release(old);
    }
}

impl<T, M: Manager> Clone for Array<T, M> {
    fn clone(&self) -> Self {
        self.storage().object.ref_counts().retain();
        Self {
            storage: self.storage,
            manager: self.manager.clone(),
            _0: PhantomData,
        }
    }
}

impl<T, M: Manager> Drop for Array<T, M> {
    fn drop(&mut self) {
        self.release(self.storage);
    }
}

impl<T: fmt::Debug, M: Manager> fmt::Debug for Array<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Clone> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut result = Self::new();
        for value in iter {
            result.push(value);
        }
        result
    }
}
