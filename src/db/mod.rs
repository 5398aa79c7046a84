//! Database-backed signal storage

pub mod questdb;

pub use questdb::*;
