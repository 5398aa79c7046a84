//! Crisis score aggregator

use crate::models::crisis::CrisisScore;
use crate::models::features::FeatureSnapshot;
use crate::signals::aggregation::CategoryTally;
use crate::signals::rules::RULE_TABLE;
use tracing::trace;

pub struct CrisisScorer;

impl CrisisScorer {
    /// Run the rule table and return the raw (uncapped by 100) tally.
    pub fn evaluate(snapshot: &FeatureSnapshot) -> CategoryTally {
        let mut tally = CategoryTally::new();

        for rule in RULE_TABLE.iter() {
            if let Some(hit) = (rule.evaluate)(snapshot, tally.total()) {
                let added = tally.add(rule.category, hit);
                trace!(rule = rule.name, added, total = tally.total(), "rule fired");
            }
        }

        tally
    }

    /// Bounded 0-100 score with warnings in rule-table order.
    pub fn score(snapshot: &FeatureSnapshot) -> CrisisScore {
        Self::evaluate(snapshot).finish()
    }
}
