//! Copy-on-write containers whose empty state is a shared static buffer.
//!
//! A fresh container points at the empty singleton of its shape and
//! allocates nothing. The first mutation, or any mutation of a buffer shared
//! with a clone, moves the container to a uniquely owned buffer.
pub mod array;
pub mod dictionary;
pub mod set;
mod table;

pub use array::Array;
pub use dictionary::Dictionary;
pub use set::Set;
pub use table::Iter;
