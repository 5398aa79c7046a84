//! Regime classification and crisis scoring.

pub mod aggregation;
pub mod categories;
pub mod classifier;
pub mod clustering;
pub mod confidence;
pub mod engine;
pub mod rules;
pub mod scoring;

pub use aggregation::*;
pub use categories::*;
pub use classifier::*;
pub use clustering::*;
pub use confidence::*;
pub use engine::*;
pub use rules::*;
pub use scoring::*;
