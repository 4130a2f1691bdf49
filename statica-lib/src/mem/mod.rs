pub mod field_layout;
pub mod global;
pub mod heap_object;
pub mod inert;
pub mod local;
pub mod manager;
pub mod metadata;
pub mod ref_counts;
