use core::{borrow::Borrow, fmt, hash::Hash, iter::Map};

use crate::{
    mem::{
        global::{Global, GLOBAL},
        manager::Manager,
    },
    storage::keyed::{KeyedBody, SetStorage},
};

use super::table::{Iter, RawTable};

/// A copy-on-write hash set. Empty sets share one static table.
pub struct Set<K, M: Manager = Global>(RawTable<KeyedBody, K, (), M>);

impl<K> Set<K> {
    #[inline(always)]
    pub fn new() -> Self {
        Self::new_in(GLOBAL)
    }
}

impl<K> Default for Set<K> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

pub type SetIter<'a, K> = Map<Iter<'a, K, ()>, fn((&'a K, &'a ())) -> &'a K>;

impl<K, M: Manager> Set<K, M> {
    #[inline(always)]
    pub fn new_in(manager: M) -> Self {
        Self(RawTable::new_in(manager))
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }
    #[inline(always)]
    pub fn is_empty_singleton(&self) -> bool {
        self.0.is_empty_singleton()
    }
    #[inline(always)]
    pub fn storage_address(&self) -> *const SetStorage {
        self.0.storage_address()
    }
    #[inline(always)]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.0.get(key).is_some()
    }
    pub fn iter(&self) -> SetIter<'_, K> {
        fn key<'a, K>(entry: (&'a K, &'a ())) -> &'a K {
            entry.0
        }
        self.0.iter().map(key as fn(_) -> _)
    }
    #[inline(always)]
    pub fn remove_all(&mut self) {
        self.0.remove_all()
    }
}

impl<K: Hash + Eq + Clone, M: Manager> Set<K, M> {
    /// Returns `true` when `key` was not in the set.
    #[inline(always)]
    pub fn insert(&mut self, key: K) -> bool {
        self.0.insert(key, ()).is_none()
    }
}

impl<K, M: Manager> Clone for Set<K, M> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<K: fmt::Debug, M: Manager> fmt::Debug for Set<K, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for Set<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut result = Self::new();
        for k in iter {
            result.insert(k);
        }
        result
    }
}

#[cfg(test)]
mod test {
    use wasm_bindgen_test::wasm_bindgen_test;

    use crate::{
        mem::local::Local,
        storage::keyed::{SetStorage, EMPTY_SET_STORAGE},
    };

    use super::Set;

    fn empty_address() -> *const SetStorage {
        EMPTY_SET_STORAGE.storage()
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_empty() {
        let local = Local::default();
        let s = Set::<u64, _>::new_in(&local);
        assert_eq!(s.capacity(), 1);
        assert_eq!(s.len(), 0);
        assert!(s.is_empty_singleton());
        assert_eq!(s.storage_address(), empty_address());
        assert!(!s.contains(&0));
        assert_eq!(s.iter().count(), 0);
        assert_eq!(local.counter(), 0);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_copy_on_first_write() {
        let local = Local::default();
        {
            let mut s = Set::new_in(&local);
            assert!(s.insert("a"));
            assert!(s.capacity() > 1);
            assert!(!s.is_empty_singleton());
            assert_ne!(s.storage_address(), empty_address());
            assert!(!s.insert("a"));
            assert!(s.insert("b"));
            assert_eq!(s.len(), 2);
            assert!(s.contains("a"));
            assert!(!s.contains("c"));
            let t = s.clone();
            s.insert("c");
            assert_eq!(t.len(), 2);
            assert_eq!(local.counter(), 2);
        }
        assert_eq!(local.counter(), 0);
        assert_eq!(EMPTY_SET_STORAGE.storage().keyed().count(), 0);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_iter() {
        let s: Set<_> = (0..50u32).chain(0..50).collect();
        assert_eq!(s.len(), 50);
        let mut v: Vec<_> = s.iter().copied().collect();
        v.sort();
        assert_eq!(v, (0..50).collect::<Vec<_>>());
        assert_eq!(format!("{:?}", Set::<u8>::new()), "{}");
    }
}
