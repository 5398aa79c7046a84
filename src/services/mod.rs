//! Read-only sources of raw signal series.

pub mod json;
pub mod memory;
pub mod signal_store;

pub use json::*;
pub use memory::*;
pub use signal_store::*;
