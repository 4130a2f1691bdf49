use core::mem::{offset_of, size_of};

use super::{metadata::Metadata, ref_counts::RefCounts};

/// The header every heap-managed object starts with, at offset 0, whether it
/// was allocated by a manager or lives in static memory.
#[repr(C)]
#[derive(Debug)]
pub struct HeapObject {
    metadata: &'static Metadata,
    ref_counts: RefCounts,
}

impl HeapObject {
    #[inline(always)]
    pub const fn new(metadata: &'static Metadata) -> Self {
        Self {
            metadata,
            ref_counts: RefCounts::new(),
        }
    }
    /// A header for an object that is never retained, released, or freed.
    #[inline(always)]
    pub const fn immortal(metadata: &'static Metadata) -> Self {
        Self {
            metadata,
            ref_counts: RefCounts::immortal(),
        }
    }
    #[inline(always)]
    pub const fn metadata(&self) -> &'static Metadata {
        self.metadata
    }
    #[inline(always)]
    pub fn ref_counts(&self) -> &RefCounts {
        &self.ref_counts
    }
    #[inline(always)]
    pub fn is_immortal(&self) -> bool {
        self.ref_counts.is_immortal()
    }
}

const _: () = assert!(offset_of!(HeapObject, metadata) == 0);
const _: () = assert!(size_of::<HeapObject>() == 2 * size_of::<usize>());
