//! Core application primitives (bootstrap, scheduling)

pub mod bootstrap;
pub mod scheduler;

pub use bootstrap::*;
pub use scheduler::*;
