//! Ordered threshold rule table behind the crisis score.
//!
//! Rules are evaluated top to bottom. Each one reads the feature snapshot
//! (and, for conditional rules, the running total so far) and either stays
//! silent or returns points plus a warning. A missing feature means the
//! rule does not fire.

use crate::models::crisis::StressCategory;
use crate::models::features::{Composite, FeatureSnapshot};
use crate::models::signal::Indicator;

pub const HY_EXTREMELY_TIGHT_BP: f64 = 250.0;
pub const HY_VERY_TIGHT_BP: f64 = 300.0;
pub const IG_EXTREMELY_TIGHT_BP: f64 = 80.0;

pub const BREADTH_WEAK: f64 = 95.0;
pub const BREADTH_SOFT: f64 = 98.0;

pub const VIX_CRISIS: f64 = 30.0;
pub const VIX_ELEVATED: f64 = 25.0;
pub const VIX_COMPLACENT: f64 = 15.0;
/// Running total above which a calm VIX counts as complacency.
pub const COMPLACENCY_SCORE_FLOOR: u32 = 30;
pub const COMPLACENCY_POINTS: u32 = 5;

/// Trading days behind the "30d" risk-asset and safe-haven moves.
pub const RISK_ASSET_LOOKBACK: usize = 20;
pub const RISK_ASSET_WEAK_PCT: f64 = -10.0;
pub const RISK_ASSET_DECLINING_PCT: f64 = -5.0;
/// Absolute 30d gold move that counts as safe-haven activity. Either
/// direction fires the liquidity warning; the message names which one.
pub const SAFE_HAVEN_MOVE_PCT: f64 = 5.0;

/// One step of a mutually exclusive ladder: the highest threshold met wins.
#[derive(Debug, Clone, Copy)]
pub struct Tier {
    pub threshold: f64,
    pub points: u32,
    pub label: &'static str,
}

/// Gold spot tiers, highest first.
pub const GOLD_TIERS: [Tier; 4] = [
    Tier { threshold: 4500.0, points: 25, label: "Gold EXTREME" },
    Tier { threshold: 4000.0, points: 20, label: "Gold very elevated" },
    Tier { threshold: 3500.0, points: 15, label: "Gold elevated" },
    Tier { threshold: 3000.0, points: 10, label: "Gold high" },
];

/// Divergence gap tiers in bp, highest first.
pub const DIVERGENCE_TIERS: [Tier; 4] = [
    Tier { threshold: 800.0, points: 25, label: "EXTREME divergence gap" },
    Tier { threshold: 600.0, points: 20, label: "Very large divergence gap" },
    Tier { threshold: 400.0, points: 15, label: "Large divergence gap" },
    Tier { threshold: 200.0, points: 10, label: "Moderate divergence gap" },
];

/// First tier whose threshold `value` strictly exceeds.
pub fn highest_tier(value: f64, tiers: &[Tier]) -> Option<&Tier> {
    tiers.iter().find(|t| value > t.threshold)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleHit {
    pub points: u32,
    pub message: String,
}

impl RuleHit {
    fn new(points: u32, message: String) -> Self {
        Self { points, message }
    }
}

/// `(snapshot, running_total) -> hit`
pub type RuleFn = fn(&FeatureSnapshot, u32) -> Option<RuleHit>;

#[derive(Clone, Copy)]
pub struct StressRule {
    pub name: &'static str,
    pub category: StressCategory,
    pub evaluate: RuleFn,
}

impl std::fmt::Debug for StressRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StressRule")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

/// Evaluation order is part of the output contract: warnings follow it.
pub const RULE_TABLE: [StressRule; 8] = [
    StressRule { name: "hy_spread", category: StressCategory::Credit, evaluate: hy_spread },
    StressRule { name: "ig_spread", category: StressCategory::Credit, evaluate: ig_spread },
    StressRule { name: "gold_level", category: StressCategory::SafeHaven, evaluate: gold_level },
    StressRule {
        name: "divergence_gap",
        category: StressCategory::Divergence,
        evaluate: divergence_gap,
    },
    StressRule { name: "market_breadth", category: StressCategory::Breadth, evaluate: breadth },
    StressRule { name: "vix_level", category: StressCategory::Volatility, evaluate: vix_level },
    StressRule {
        name: "risk_asset_drawdown",
        category: StressCategory::RiskAsset,
        evaluate: risk_asset_drawdown,
    },
    StressRule {
        name: "liquidity_divergence",
        category: StressCategory::RiskAsset,
        evaluate: liquidity_divergence,
    },
];

fn hy_spread(snapshot: &FeatureSnapshot, _running: u32) -> Option<RuleHit> {
    let hy = snapshot.current(Indicator::HighYieldSpread)?;
    if hy < HY_EXTREMELY_TIGHT_BP {
        Some(RuleHit::new(15, format!("HY spreads extremely tight ({:.0} bp)", hy)))
    } else if hy < HY_VERY_TIGHT_BP {
        Some(RuleHit::new(10, format!("HY spreads very tight ({:.0} bp)", hy)))
    } else {
        None
    }
}

fn ig_spread(snapshot: &FeatureSnapshot, _running: u32) -> Option<RuleHit> {
    let ig = snapshot.current(Indicator::InvestmentGradeSpread)?;
    (ig < IG_EXTREMELY_TIGHT_BP)
        .then(|| RuleHit::new(10, format!("IG spreads extremely tight ({:.0} bp)", ig)))
}

fn gold_level(snapshot: &FeatureSnapshot, _running: u32) -> Option<RuleHit> {
    let gold = snapshot.current(Indicator::GoldPrice)?;
    let tier = highest_tier(gold, &GOLD_TIERS)?;
    Some(RuleHit::new(tier.points, format!("{} (${:.0})", tier.label, gold)))
}

fn divergence_gap(snapshot: &FeatureSnapshot, _running: u32) -> Option<RuleHit> {
    let gap = snapshot.composite(Composite::DivergenceGap)?;
    let tier = highest_tier(gap, &DIVERGENCE_TIERS)?;
    Some(RuleHit::new(tier.points, format!("{} ({:.0} bp)", tier.label, gap)))
}

fn breadth(snapshot: &FeatureSnapshot, _running: u32) -> Option<RuleHit> {
    let ratio = snapshot.composite(Composite::BreadthRatio)?;
    if ratio < BREADTH_WEAK {
        Some(RuleHit::new(10, format!("Market breadth weak - narrow rally ({:.1})", ratio)))
    } else if ratio < BREADTH_SOFT {
        Some(RuleHit::new(5, format!("Market breadth deteriorating ({:.1})", ratio)))
    } else {
        None
    }
}

fn vix_level(snapshot: &FeatureSnapshot, running: u32) -> Option<RuleHit> {
    let vix = snapshot.current(Indicator::VixPrice)?;
    if vix > VIX_CRISIS {
        Some(RuleHit::new(10, format!("VIX elevated ({:.1}) - fear rising", vix)))
    } else if vix > VIX_ELEVATED {
        Some(RuleHit::new(5, format!("VIX moderately elevated ({:.1})", vix)))
    } else if vix < VIX_COMPLACENT && running > COMPLACENCY_SCORE_FLOOR {
        Some(RuleHit::new(
            COMPLACENCY_POINTS,
            format!("VIX low ({:.1}) - complacency despite other warnings", vix),
        ))
    } else {
        None
    }
}

fn risk_asset_drawdown(snapshot: &FeatureSnapshot, _running: u32) -> Option<RuleHit> {
    let change = snapshot.change(Indicator::BitcoinPrice, RISK_ASSET_LOOKBACK)?;
    if change < RISK_ASSET_WEAK_PCT {
        Some(RuleHit::new(10, format!("Bitcoin weak ({:.1}% 30d)", change)))
    } else if change < RISK_ASSET_DECLINING_PCT {
        Some(RuleHit::new(5, format!("Bitcoin declining ({:.1}% 30d)", change)))
    } else {
        None
    }
}

/// Warning only: a falling risk asset while gold makes a large move.
fn liquidity_divergence(snapshot: &FeatureSnapshot, _running: u32) -> Option<RuleHit> {
    let btc = snapshot.change(Indicator::BitcoinPrice, RISK_ASSET_LOOKBACK)?;
    let gold = snapshot.change(Indicator::GoldPrice, RISK_ASSET_LOOKBACK)?;
    if btc >= 0.0 || gold.abs() <= SAFE_HAVEN_MOVE_PCT {
        return None;
    }
    let reading = if gold > 0.0 {
        "liquidity tight despite safe-haven demand"
    } else {
        "liquidity tight as safe havens sell off too"
    };
    Some(RuleHit::new(
        0,
        format!(
            "Bitcoin falling ({:.1}% 30d) while gold moves {:+.1}% - {}",
            btc, gold, reading
        ),
    ))
}
