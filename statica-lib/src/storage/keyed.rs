use core::{
    alloc::{Layout, LayoutError},
    marker::PhantomData,
    mem::{offset_of, size_of},
    ptr::{self, addr_of, NonNull},
};

use crate::mem::{
    heap_object::HeapObject,
    manager::Manager,
    metadata::{self, Metadata},
};

use super::{array::capacity_overflow, bitmap::Bitmap};

/// The body shared by dictionary and set storage.
#[repr(C)]
#[derive(Debug)]
pub struct KeyedBody {
    capacity: usize,
    count: usize,
    initialized_entries: Bitmap,
    keys: NonNull<u8>,
}

impl KeyedBody {
    #[inline(always)]
    pub const fn new(capacity: usize, initialized_entries: Bitmap, keys: NonNull<u8>) -> Self {
        Self {
            capacity,
            count: 0,
            initialized_entries,
            keys,
        }
    }
    /// One slot, no entries, a single-bit bitmap over `entries`. The key
    /// pointer is non-null and never dereferenced.
    const fn singleton(entries: *const usize) -> Self {
        Self::new(
            1,
            Bitmap::new(unsafe { NonNull::new_unchecked(entries as *mut usize) }, 1),
            NonNull::dangling(),
        )
    }
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
    #[inline(always)]
    pub const fn count(&self) -> usize {
        self.count
    }
    #[inline(always)]
    pub const fn initialized_entries(&self) -> &Bitmap {
        &self.initialized_entries
    }
    #[inline(always)]
    pub fn initialized_entries_mut(&mut self) -> &mut Bitmap {
        &mut self.initialized_entries
    }
    #[inline(always)]
    pub const fn keys(&self) -> NonNull<u8> {
        self.keys
    }
    #[inline(always)]
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct DictionaryBody {
    keyed: KeyedBody,
    values: NonNull<u8>,
}

/// What differs between the dictionary and the set storage shapes.
pub trait KeyedShape: Sized + 'static {
    fn storage_metadata() -> &'static Metadata;
    fn raw_metadata() -> &'static Metadata;
    fn empty() -> NonNull<KeyedStorage<Self>>;
    fn keyed(&self) -> &KeyedBody;
    fn keyed_mut(&mut self) -> &mut KeyedBody;
    fn values(&self) -> NonNull<u8>;
    fn from_parts(keyed: KeyedBody, values: NonNull<u8>) -> Self;
}

impl KeyedShape for DictionaryBody {
    fn storage_metadata() -> &'static Metadata {
        &metadata::DICTIONARY_STORAGE
    }
    fn raw_metadata() -> &'static Metadata {
        &metadata::RAW_DICTIONARY_STORAGE
    }
    #[inline(always)]
    fn empty() -> NonNull<KeyedStorage<Self>> {
        NonNull::from(&EMPTY_DICTIONARY_STORAGE.storage)
    }
    #[inline(always)]
    fn keyed(&self) -> &KeyedBody {
        &self.keyed
    }
    #[inline(always)]
    fn keyed_mut(&mut self) -> &mut KeyedBody {
        &mut self.keyed
    }
    #[inline(always)]
    fn values(&self) -> NonNull<u8> {
        self.values
    }
    fn from_parts(keyed: KeyedBody, values: NonNull<u8>) -> Self {
        Self { keyed, values }
    }
}

impl KeyedShape for KeyedBody {
    fn storage_metadata() -> &'static Metadata {
        &metadata::SET_STORAGE
    }
    fn raw_metadata() -> &'static Metadata {
        &metadata::RAW_SET_STORAGE
    }
    #[inline(always)]
    fn empty() -> NonNull<KeyedStorage<Self>> {
        NonNull::from(&EMPTY_SET_STORAGE.storage)
    }
    #[inline(always)]
    fn keyed(&self) -> &KeyedBody {
        self
    }
    #[inline(always)]
    fn keyed_mut(&mut self) -> &mut KeyedBody {
        self
    }
    #[inline(always)]
    fn values(&self) -> NonNull<u8> {
        NonNull::dangling()
    }
    fn from_parts(keyed: KeyedBody, _: NonNull<u8>) -> Self {
        keyed
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct KeyedStorage<B> {
    pub object: HeapObject,
    pub body: B,
}

pub type DictionaryStorage = KeyedStorage<DictionaryBody>;
pub type SetStorage = KeyedStorage<KeyedBody>;

impl<B: KeyedShape> KeyedStorage<B> {
    #[inline(always)]
    pub fn keyed(&self) -> &KeyedBody {
        self.body.keyed()
    }
    #[inline(always)]
    pub fn is_keyed_storage(&self) -> bool {
        self.object.metadata().is_subclass_of(B::raw_metadata())
    }
    #[inline(always)]
    pub fn is_empty_singleton(p: NonNull<Self>) -> bool {
        p == B::empty()
    }
}

/// A statically allocated keyed storage: the header followed by the one
/// zeroed bitmap word its `initialized_entries` points at.
#[repr(C)]
pub struct EmptyKeyedStorage<B> {
    storage: KeyedStorage<B>,
    entries: usize,
}

// SAFETY: the singletons are never written. The key and value pointers are
// never dereferenced and the bitmap word is only read.
unsafe impl<B> Sync for EmptyKeyedStorage<B> {}

impl<B> EmptyKeyedStorage<B> {
    #[inline(always)]
    pub fn storage(&self) -> &KeyedStorage<B> {
        &self.storage
    }
    #[inline(always)]
    pub fn entries_address(&self) -> *const usize {
        &self.entries
    }
}

pub static EMPTY_DICTIONARY_STORAGE: EmptyKeyedStorage<DictionaryBody> = EmptyKeyedStorage {
    storage: KeyedStorage {
        object: HeapObject::immortal(&metadata::RAW_DICTIONARY_STORAGE),
        body: DictionaryBody {
            keyed: KeyedBody::singleton(addr_of!(EMPTY_DICTIONARY_STORAGE.entries)),
            values: NonNull::dangling(),
        },
    },
    entries: 0,
};

pub static EMPTY_SET_STORAGE: EmptyKeyedStorage<KeyedBody> = EmptyKeyedStorage {
    storage: KeyedStorage {
        object: HeapObject::immortal(&metadata::RAW_SET_STORAGE),
        body: KeyedBody::singleton(addr_of!(EMPTY_SET_STORAGE.entries)),
    },
    entries: 0,
};

const _: () = assert!(offset_of!(DictionaryBody, values) == 5 * size_of::<usize>());
const _: () = assert!(size_of::<SetStorage>() == 7 * size_of::<usize>());
const _: () = assert!(offset_of!(EmptyKeyedStorage<DictionaryBody>, entries) == 8 * size_of::<usize>());

/// Byte offsets of the tail arrays inside one keyed storage block.
#[derive(Debug, Clone, Copy)]
pub struct KeyedLayout {
    pub layout: Layout,
    pub words: usize,
    pub keys: usize,
    pub values: usize,
}

/// Allocation helpers for tables holding `K` keys and `V` values.
pub struct KeyedBuffer<B, K, V>(PhantomData<(B, K, V)>);

impl<B: KeyedShape, K, V> KeyedBuffer<B, K, V> {
    fn try_layout(capacity: usize) -> Result<KeyedLayout, LayoutError> {
        let header = Layout::new::<KeyedStorage<B>>();
        let (layout, words) =
            header.extend(Layout::array::<usize>(Bitmap::word_count_for(capacity))?)?;
        let (layout, keys) = layout.extend(Layout::array::<K>(capacity)?)?;
        let (layout, values) = layout.extend(Layout::array::<V>(capacity)?)?;
        Ok(KeyedLayout {
            layout: layout.pad_to_align(),
            words,
            keys,
            values,
        })
    }
    pub fn layout(capacity: usize) -> KeyedLayout {
        match Self::try_layout(capacity) {
            Ok(layout) => layout,
            Err(_) => capacity_overflow(),
        }
    }
    /// Allocates a uniquely owned table with every slot empty.
    pub fn allocate<M: Manager>(manager: &M, capacity: usize) -> NonNull<KeyedStorage<B>> {
        assert!(capacity.is_power_of_two());
        let l = Self::layout(capacity);
        unsafe {
            let base = manager.alloc(l.layout);
            let words = base.add(l.words) as *mut usize;
            ptr::write_bytes(words, 0, Bitmap::word_count_for(capacity));
            let keyed = KeyedBody::new(
                capacity,
                Bitmap::new(NonNull::new_unchecked(words), capacity),
                NonNull::new_unchecked(base.add(l.keys)),
            );
            let p = base as *mut KeyedStorage<B>;
            p.write(KeyedStorage {
                object: HeapObject::new(B::storage_metadata()),
                body: B::from_parts(keyed, NonNull::new_unchecked(base.add(l.values))),
            });
            NonNull::new_unchecked(p)
        }
    }
    #[inline(always)]
    pub unsafe fn keys(p: NonNull<KeyedStorage<B>>) -> *mut K {
        (*p.as_ptr()).keyed().keys().as_ptr() as *mut K
    }
    #[inline(always)]
    pub unsafe fn values(p: NonNull<KeyedStorage<B>>) -> *mut V {
        (*p.as_ptr()).body.values().as_ptr() as *mut V
    }
    /// Returns the block to the manager without dropping any entry.
    pub unsafe fn deallocate<M: Manager>(manager: &M, p: NonNull<KeyedStorage<B>>) {
        debug_assert!(!KeyedStorage::is_empty_singleton(p));
        let capacity = (*p.as_ptr()).keyed().capacity();
        manager.dealloc(p.as_ptr() as *mut u8, Self::layout(capacity).layout);
    }
    /// Drops the initialized entries and returns the block to the manager.
    pub unsafe fn destroy<M: Manager>(manager: &M, p: NonNull<KeyedStorage<B>>) {
        debug_assert!(!KeyedStorage::is_empty_singleton(p));
        let keyed = (*p.as_ptr()).keyed();
        let (keys, values) = (Self::keys(p), Self::values(p));
        for i in 0..keyed.capacity() {
            if keyed.initialized_entries().get(i) {
                ptr::drop_in_place(keys.add(i));
                ptr::drop_in_place(values.add(i));
            }
        }
        Self::deallocate(manager, p);
    }
}
