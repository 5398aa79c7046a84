//! Crisis score output and the categories that contribute to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Independent stress categories, each capped separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressCategory {
    Credit,
    SafeHaven,
    Divergence,
    Breadth,
    Volatility,
    RiskAsset,
}

impl fmt::Display for StressCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StressCategory::Credit => "Credit",
            StressCategory::SafeHaven => "Safe Haven",
            StressCategory::Divergence => "Divergence",
            StressCategory::Breadth => "Market Breadth",
            StressCategory::Volatility => "Volatility",
            StressCategory::RiskAsset => "Risk Asset",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub category: StressCategory,
    pub message: String,
}

impl Warning {
    pub fn new(category: StressCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Bounded 0-100 stress index with warnings in rule-table order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrisisScore {
    pub score: u8,
    pub warnings: Vec<Warning>,
}

impl CrisisScore {
    pub fn messages(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.message.clone()).collect()
    }
}
