//! Feature extraction: point-in-time features and composites from raw signals.

pub mod composite;
pub mod extractor;
pub mod matrix;

pub use composite::*;
pub use extractor::*;
pub use matrix::*;
