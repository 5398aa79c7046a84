//! Shared data models spanning the engine layers.

pub mod crisis;
pub mod features;
pub mod record;
pub mod regime;
pub mod signal;

pub use crisis::{CrisisScore, StressCategory, Warning};
pub use features::{Composite, FeatureKey, FeatureSnapshot};
pub use record::CacheRecord;
pub use regime::{ClassifierSource, ConfidenceTier, RegimeClassification, RegimeState, TrendLabel};
pub use signal::{ChangeMode, Indicator, Observation, Signal, SignalSet, Unit};
