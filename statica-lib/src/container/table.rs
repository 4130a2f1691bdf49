use core::{
    borrow::Borrow,
    cmp::max,
    hash::Hash,
    marker::PhantomData,
    mem::{forget, replace},
    ptr::NonNull,
};

use crate::{
    hashing::SeededState,
    mem::manager::Manager,
    storage::{
        array::capacity_overflow,
        keyed::{KeyedBody, KeyedBuffer, KeyedShape, KeyedStorage},
    },
};

/// The most entries a table of `capacity` slots holds. Always leaves a hole.
#[inline(always)]
const fn max_load(capacity: usize) -> usize {
    capacity / 4 * 3 + capacity % 4 * 3 / 4
}

/// The smallest power of two, at least `2`, that can hold `count` entries.
fn capacity_for(count: usize) -> usize {
    let mut capacity = 2;
    while max_load(capacity) < count {
        capacity = match capacity.checked_mul(2) {
            Some(c) => c,
            None => capacity_overflow(),
        };
    }
    capacity
}

/// Linear probing over the keyed body shared by dictionaries and sets.
///
/// A fresh table points at the empty singleton of `B`. The singleton has one
/// slot that is always a hole, so lookups on it touch only its bitmap word.
pub(crate) struct RawTable<B: KeyedShape, K, V, M: Manager> {
    storage: NonNull<KeyedStorage<B>>,
    manager: M,
    state: SeededState,
    _0: PhantomData<(K, V)>,
}

unsafe impl<B: KeyedShape, K: Send + Sync, V: Send + Sync, M: Manager + Send> Send
    for RawTable<B, K, V, M>
{
}
unsafe impl<B: KeyedShape, K: Send + Sync, V: Send + Sync, M: Manager + Sync> Sync
    for RawTable<B, K, V, M>
{
}

type Buffer<B, K, V> = KeyedBuffer<B, K, V>;

impl<B: KeyedShape, K, V, M: Manager> RawTable<B, K, V, M> {
    pub fn new_in(manager: M) -> Self {
        Self {
            storage: B::empty(),
            manager,
            state: SeededState::new(),
            _0: PhantomData,
        }
    }
    #[inline(always)]
    pub fn keyed(&self) -> &KeyedBody {
        unsafe { self.storage.as_ref() }.keyed()
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.keyed().count()
    }
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.keyed().capacity()
    }
    #[inline(always)]
    pub fn is_empty_singleton(&self) -> bool {
        KeyedStorage::is_empty_singleton(self.storage)
    }
    #[inline(always)]
    pub fn storage_address(&self) -> *const KeyedStorage<B> {
        self.storage.as_ptr()
    }
    #[inline(always)]
    fn is_unique(&self) -> bool {
        unsafe { self.storage.as_ref() }.object.ref_counts().is_unique()
    }
    /// `Ok` with the slot holding a key equal to `eq`, or `Err` with the
    /// first hole on the probe sequence of `hash`.
    unsafe fn probe(
        p: NonNull<KeyedStorage<B>>,
        hash: u64,
        mut eq: impl FnMut(&K) -> bool,
    ) -> Result<usize, usize> {
        let keyed = (*p.as_ptr()).keyed();
        let mask = keyed.capacity() - 1;
        let keys = Buffer::<B, K, V>::keys(p);
        let mut i = hash as usize & mask;
        loop {
            if !keyed.initialized_entries().get(i) {
                return Err(i);
            }
            if eq(&*keys.add(i)) {
                return Ok(i);
            }
            i = (i + 1) & mask;
        }
    }
    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.state.hash(key);
        unsafe { Self::probe(self.storage, hash, |k| k.borrow() == key) }.ok()
    }
    pub fn get<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let i = self.find(key)?;
        unsafe {
            Some((
                &*Buffer::<B, K, V>::keys(self.storage).add(i),
                &*Buffer::<B, K, V>::values(self.storage).add(i),
            ))
        }
    }
    unsafe fn write(p: NonNull<KeyedStorage<B>>, i: usize, key: K, value: V) {
        Buffer::<B, K, V>::keys(p).add(i).write(key);
        Buffer::<B, K, V>::values(p).add(i).write(value);
        let keyed = (*p.as_ptr()).body.keyed_mut();
        keyed.initialized_entries_mut().set(i);
        keyed.set_count(keyed.count() + 1);
    }
    pub fn iter(&self) -> Iter<'_, K, V> {
        let keyed = self.keyed();
        unsafe {
            Iter {
                keyed,
                keys: Buffer::<B, K, V>::keys(self.storage),
                values: Buffer::<B, K, V>::values(self.storage),
                index: 0,
                remaining: keyed.count(),
                _0: PhantomData,
            }
        }
    }
    /// Points back at the empty singleton, dropping this reference to the table.
    pub fn remove_all(&mut self) {
        let old = replace(&mut self.storage, B::empty());
        self.release(old);
    }
    fn release(&self, p: NonNull<KeyedStorage<B>>) {
        unsafe {
            if p.as_ref().object.ref_counts().release() {
                Buffer::<B, K, V>::destroy(&self.manager, p);
            }
        }
    }
}

impl<B: KeyedShape, K: Hash + Eq + Clone, V: Clone, M: Manager> RawTable<B, K, V, M> {
    /// Makes the table uniquely owned with room for `additional` more entries.
    fn reserve(&mut self, additional: usize) {
        let capacity = self.capacity();
        let needed = self.len() + additional;
        if self.is_unique() && needed <= max_load(capacity) {
            return;
        }
        self.resize(max(capacity_for(needed), capacity));
    }
    /// Rehashes into a fresh table. Entries are moved out of a unique table
    /// and cloned out of a shared one.
    ///
    /// A moved entry leaves the old bitmap before its key is hashed, so an
    /// unwinding `Hash` or `Clone` drops every entry exactly once.
    fn resize(&mut self, capacity: usize) {
        let new = Rehash::<B, K, V, M> {
            manager: &self.manager,
            storage: Buffer::<B, K, V>::allocate(&self.manager, capacity),
            _0: PhantomData,
        };
        let unique = self.is_unique();
        let old = self.storage;
        unsafe {
            let (keys, values) = (Buffer::<B, K, V>::keys(old), Buffer::<B, K, V>::values(old));
            for i in 0..old.as_ref().keyed().capacity() {
                if !old.as_ref().keyed().initialized_entries().get(i) {
                    continue;
                }
                let (key, value) = if unique {
                    let keyed = (*old.as_ptr()).body.keyed_mut();
                    keyed.initialized_entries_mut().clear(i);
                    keyed.set_count(keyed.count() - 1);
                    (keys.add(i).read(), values.add(i).read())
                } else {
                    ((*keys.add(i)).clone(), (*values.add(i)).clone())
                };
                let hash = self.state.hash(&key);
                let j = match Self::probe(new.storage, hash, |_| false) {
                    Err(j) => j,
                    Ok(_) => unreachable!(),
                };
                Self::write(new.storage, j, key, value);
            }
        }
        self.storage = new.into_storage();
        if unique {
            unsafe { Buffer::<B, K, V>::deallocate(&self.manager, old) };
        } else {
            self.release(old);
        }
    }
    /// Returns the value previously stored under an equal key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.state.hash(&key);
        if !self.is_empty_singleton() {
            self.reserve(0);
            if let Ok(i) = unsafe { Self::probe(self.storage, hash, |k| *k == key) } {
                return Some(unsafe {
                    replace(&mut *Buffer::<B, K, V>::values(self.storage).add(i), value)
                });
            }
        }
        self.reserve(1);
        unsafe {
            let i = match Self::probe(self.storage, hash, |k| *k == key) {
                Err(i) => i,
                Ok(_) => unreachable!(),
            };
            Self::write(self.storage, i, key, value);
        }
        None
    }
}

impl<B: KeyedShape, K, V, M: Manager> Clone for RawTable<B, K, V, M> {
    fn clone(&self) -> Self {
        unsafe { self.storage.as_ref() }.object.ref_counts().retain();
        Self {
            storage: self.storage,
            manager: self.manager.clone(),
            state: self.state.clone(),
            _0: PhantomData,
        }
    }
}

impl<B: KeyedShape, K, V, M: Manager> Drop for RawTable<B, K, V, M> {
    fn drop(&mut self) {
        self.release(self.storage);
    }
}

/// A table being filled by a rehash. Destroyed unless the rehash completes.
struct Rehash<'a, B: KeyedShape, K, V, M: Manager> {
    manager: &'a M,
    storage: NonNull<KeyedStorage<B>>,
    _0: PhantomData<(K, V)>,
}

impl<B: KeyedShape, K, V, M: Manager> Rehash<'_, B, K, V, M> {
    fn into_storage(self) -> NonNull<KeyedStorage<B>> {
        let storage = self.storage;
        forget(self);
        storage
    }
}

impl<B: KeyedShape, K, V, M: Manager> Drop for Rehash<'_, B, K, V, M> {
    fn drop(&mut self) {
        unsafe { Buffer::<B, K, V>::destroy(self.manager, self.storage) }
    }
}

/// Entries of a dictionary or a set in slot order.
pub struct Iter<'a, K, V> {
    keyed: &'a KeyedBody,
    keys: *const K,
    values: *const V,
    index: usize,
    remaining: usize,
    _0: PhantomData<(&'a K, &'a V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            let i = self.index;
            self.index += 1;
            unsafe {
                if self.keyed.initialized_entries().get(i) {
                    self.remaining -= 1;
                    return Some((&*self.keys.add(i), &*self.values.add(i)));
                }
            }
        }
        None
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
