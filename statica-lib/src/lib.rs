#![allow(clippy::assertions_on_constants)]
#![allow(clippy::missing_safety_doc)]
pub mod app;
pub mod container;
pub mod error;
pub mod hashing;
pub mod mem;
pub mod storage;
