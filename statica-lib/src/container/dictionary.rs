use core::{borrow::Borrow, fmt, hash::Hash, iter::Map};

use crate::{
    mem::{
        global::{Global, GLOBAL},
        manager::Manager,
    },
    storage::keyed::{DictionaryBody, DictionaryStorage},
};

use super::table::{Iter, RawTable};

/// A copy-on-write hash map. Empty dictionaries share one static table.
pub struct Dictionary<K, V, M: Manager = Global>(RawTable<DictionaryBody, K, V, M>);

impl<K, V> Dictionary<K, V> {
    #[inline(always)]
    pub fn new() -> Self {
        Self::new_in(GLOBAL)
    }
}

impl<K, V> Default for Dictionary<K, V> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, M: Manager> Dictionary<K, V, M> {
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
    pub fn storage_address(&self) -> *const DictionaryStorage {
        self.0.storage_address()
    }
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.0.get(key).map(|(_, v)| v)
    }
    #[inline(always)]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.0.get(key).is_some()
    }
    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.0.iter()
    }
    #[inline(always)]
    pub fn remove_all(&mut self) {
        self.0.remove_all()
    }
}

impl<K: Hash + Eq + Clone, V: Clone, M: Manager> Dictionary<K, V, M> {
    #[inline(always)]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.0.insert(key, value)
    }
}

impl<K, V, M: Manager> Clone for Dictionary<K, V, M> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, M: Manager> fmt::Debug for Dictionary<K, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq + Clone, V: Clone> FromIterator<(K, V)> for Dictionary<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (k, v) in iter {
            result.insert(k, v);
        }
        result
    }
}

impl<'a, K, V, M: Manager> IntoIterator for &'a Dictionary<K, V, M> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Keys of a dictionary.
pub type Keys<'a, K, V> = Map<Iter<'a, K, V>, fn((&'a K, &'a V)) -> &'a K>;

impl<K, V, M: Manager> Dictionary<K, V, M> {
    pub fn keys(&self) -> Keys<'_, K, V> {
        fn key<'a, K, V>(entry: (&'a K, &'a V)) -> &'a K {
            entry.0
        }
        self.iter().map(key as fn(_) -> _)
    }
}
