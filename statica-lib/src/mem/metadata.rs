use core::ptr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Array,
    Dictionary,
    Set,
}

/// A type descriptor referenced from every heap object header.
#[derive(Debug)]
pub struct Metadata {
    name: &'static str,
    kind: StorageKind,
    superclass: Option<&'static Metadata>,
}

impl Metadata {
    pub const fn new(
        name: &'static str,
        kind: StorageKind,
        superclass: Option<&'static Metadata>,
    ) -> Self {
        Self {
            name,
            kind,
            superclass,
        }
    }
    pub const fn name(&self) -> &'static str {
        self.name
    }
    pub const fn kind(&self) -> StorageKind {
        self.kind
    }
    pub const fn superclass(&self) -> Option<&'static Metadata> {
        self.superclass
    }
    /// Identity walk up the superclass chain, `self` included.
    pub fn is_subclass_of(&self, other: &Metadata) -> bool {
        let mut current = Some(self);
        while let Some(m) = current {
            if ptr::eq(m, other) {
                return true;
            }
            current = m.superclass;
        }
        false
    }
}

pub static ARRAY_STORAGE_BASE: Metadata =
    Metadata::new("ArrayStorageBase", StorageKind::Array, None);

pub static EMPTY_ARRAY_STORAGE: Metadata = Metadata::new(
    "EmptyArrayStorage",
    StorageKind::Array,
    Some(&ARRAY_STORAGE_BASE),
);

pub static CONTIGUOUS_ARRAY_STORAGE: Metadata = Metadata::new(
    "ContiguousArrayStorage",
    StorageKind::Array,
    Some(&ARRAY_STORAGE_BASE),
);

pub static RAW_DICTIONARY_STORAGE: Metadata =
    Metadata::new("RawDictionaryStorage", StorageKind::Dictionary, None);

pub static DICTIONARY_STORAGE: Metadata = Metadata::new(
    "DictionaryStorage",
    StorageKind::Dictionary,
    Some(&RAW_DICTIONARY_STORAGE),
);

pub static RAW_SET_STORAGE: Metadata = Metadata::new("RawSetStorage", StorageKind::Set, None);

pub static SET_STORAGE: Metadata =
    Metadata::new("SetStorage", StorageKind::Set, Some(&RAW_SET_STORAGE));
