//! Layouts shared by allocated container buffers and by the statically
//! allocated empty singletons that stand in for them.
pub mod array;
pub mod bitmap;
pub mod keyed;
