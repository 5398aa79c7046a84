//! Raw time-series input: one named indicator and its dated observations.

use crate::error::SignalError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unit semantics of the raw values a store delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Percentage points (credit spreads, yields, policy rates).
    Percent,
    Price,
    Index,
    Ratio,
    Count,
}

/// How an N-period change is expressed for an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeMode {
    /// `(latest / past - 1) * 100`
    Percent,
    /// `(latest - past) * scale`, e.g. spread moves in basis points
    Absolute,
}

/// Supported indicators, keyed by semantic name rather than column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    HighYieldSpread,
    InvestmentGradeSpread,
    CccSpread,
    GoldPrice,
    VixPrice,
    BitcoinPrice,
    MarketBreadthRatio,
    Sp500Price,
    Sp500EqualWeightPrice,
    YieldCurve10y2y,
    Nfci,
    InitialClaims,
    FedFundsRate,
}

impl Indicator {
    pub const ALL: [Indicator; 13] = [
        Indicator::HighYieldSpread,
        Indicator::InvestmentGradeSpread,
        Indicator::CccSpread,
        Indicator::GoldPrice,
        Indicator::VixPrice,
        Indicator::BitcoinPrice,
        Indicator::MarketBreadthRatio,
        Indicator::Sp500Price,
        Indicator::Sp500EqualWeightPrice,
        Indicator::YieldCurve10y2y,
        Indicator::Nfci,
        Indicator::InitialClaims,
        Indicator::FedFundsRate,
    ];

    /// Stable identifier used by stores (file stem, table key).
    pub fn key(&self) -> &'static str {
        match self {
            Indicator::HighYieldSpread => "high_yield_spread",
            Indicator::InvestmentGradeSpread => "investment_grade_spread",
            Indicator::CccSpread => "ccc_spread",
            Indicator::GoldPrice => "gold_price",
            Indicator::VixPrice => "vix_price",
            Indicator::BitcoinPrice => "bitcoin_price",
            Indicator::MarketBreadthRatio => "market_breadth_ratio",
            Indicator::Sp500Price => "sp500_price",
            Indicator::Sp500EqualWeightPrice => "sp500_equal_weight_price",
            Indicator::YieldCurve10y2y => "yield_curve_10y2y",
            Indicator::Nfci => "nfci",
            Indicator::InitialClaims => "initial_claims",
            Indicator::FedFundsRate => "fed_funds_rate",
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            Indicator::HighYieldSpread
            | Indicator::InvestmentGradeSpread
            | Indicator::CccSpread
            | Indicator::YieldCurve10y2y
            | Indicator::FedFundsRate => Unit::Percent,
            Indicator::GoldPrice
            | Indicator::BitcoinPrice
            | Indicator::Sp500Price
            | Indicator::Sp500EqualWeightPrice => Unit::Price,
            Indicator::VixPrice | Indicator::Nfci => Unit::Index,
            Indicator::MarketBreadthRatio => Unit::Ratio,
            Indicator::InitialClaims => Unit::Count,
        }
    }

    /// Multiplier from stored units to the units the scoring rules speak.
    ///
    /// Credit spreads are stored in percent and scored in basis points; the
    /// gold series is an ETF trading near one tenth of spot.
    pub fn scale(&self) -> f64 {
        match self {
            Indicator::HighYieldSpread
            | Indicator::InvestmentGradeSpread
            | Indicator::CccSpread => 100.0,
            Indicator::GoldPrice => 10.0,
            _ => 1.0,
        }
    }

    pub fn change_mode(&self) -> ChangeMode {
        match self {
            Indicator::HighYieldSpread
            | Indicator::InvestmentGradeSpread
            | Indicator::CccSpread
            | Indicator::YieldCurve10y2y
            | Indicator::Nfci
            | Indicator::FedFundsRate => ChangeMode::Absolute,
            _ => ChangeMode::Percent,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One dated value, as delivered by the time-series store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A chronologically ordered series for one indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    indicator: Indicator,
    observations: Vec<Observation>,
}

impl Signal {
    /// Build a signal, dropping non-finite values.
    ///
    /// Dates must be strictly increasing; duplicates are rejected.
    pub fn new(indicator: Indicator, observations: Vec<Observation>) -> Result<Self, SignalError> {
        let observations: Vec<Observation> = observations
            .into_iter()
            .filter(|o| o.value.is_finite())
            .collect();

        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SignalError::UnorderedDates {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }

        Ok(Self {
            indicator,
            observations,
        })
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Observation `periods` steps before the latest one.
    pub fn lookback(&self, periods: usize) -> Option<&Observation> {
        let idx = self.observations.len().checked_sub(periods.checked_add(1)?)?;
        self.observations.get(idx)
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }
}

/// The signals available for one evaluation, keyed by indicator.
#[derive(Debug, Clone, Default)]
pub struct SignalSet {
    signals: BTreeMap<Indicator, Signal>,
}

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signal; empty series are treated as absent.
    pub fn insert(&mut self, signal: Signal) {
        if !signal.is_empty() {
            self.signals.insert(signal.indicator(), signal);
        }
    }

    pub fn get(&self, indicator: Indicator) -> Option<&Signal> {
        self.signals.get(&indicator)
    }

    pub fn contains(&self, indicator: Indicator) -> bool {
        self.signals.contains_key(&indicator)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.signals.values()
    }
}

impl FromIterator<Signal> for SignalSet {
    fn from_iter<T: IntoIterator<Item = Signal>>(iter: T) -> Self {
        let mut set = SignalSet::new();
        for signal in iter {
            set.insert(signal);
        }
        set
    }
}
