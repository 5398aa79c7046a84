//! Stress category point caps

use crate::models::crisis::StressCategory;

/// Maximum points each category may contribute to the crisis score.
///
/// The caps sum past 100, so the final score is clamped, not renormalised.
pub struct CategoryCaps;

impl CategoryCaps {
    pub const CREDIT: u32 = 25;
    pub const SAFE_HAVEN: u32 = 25;
    pub const DIVERGENCE: u32 = 25;
    pub const BREADTH: u32 = 15;
    pub const VOLATILITY: u32 = 10;
    pub const RISK_ASSET: u32 = 10;

    /// Get cap for a category
    pub fn get(category: StressCategory) -> u32 {
        match category {
            StressCategory::Credit => Self::CREDIT,
            StressCategory::SafeHaven => Self::SAFE_HAVEN,
            StressCategory::Divergence => Self::DIVERGENCE,
            StressCategory::Breadth => Self::BREADTH,
            StressCategory::Volatility => Self::VOLATILITY,
            StressCategory::RiskAsset => Self::RISK_ASSET,
        }
    }
}
