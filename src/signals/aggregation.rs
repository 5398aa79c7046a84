//! Category-capped accumulation of rule hits.

use crate::models::crisis::{CrisisScore, StressCategory, Warning};
use crate::signals::categories::CategoryCaps;
use crate::signals::rules::RuleHit;
use std::collections::HashMap;

/// Running tally of points per category, in evaluation order.
#[derive(Debug, Default)]
pub struct CategoryTally {
    awarded: HashMap<StressCategory, u32>,
    total: u32,
    warnings: Vec<Warning>,
}

impl CategoryTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points counted so far, after caps, before clamping.
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn awarded(&self, category: StressCategory) -> u32 {
        self.awarded.get(&category).copied().unwrap_or(0)
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Record a hit. The warning is always kept; points stop at the category cap.
    /// Returns the points actually added.
    pub fn add(&mut self, category: StressCategory, hit: RuleHit) -> u32 {
        let already = self.awarded(category);
        let added = hit.points.min(CategoryCaps::get(category).saturating_sub(already));

        *self.awarded.entry(category).or_insert(0) += added;
        self.total += added;
        self.warnings.push(Warning::new(category, hit.message));
        added
    }

    /// Final score, clamped to 0-100.
    pub fn finish(self) -> CrisisScore {
        CrisisScore {
            score: clamp_score(self.total),
            warnings: self.warnings,
        }
    }
}

pub fn clamp_score(total: u32) -> u8 {
    total.min(100) as u8
}
