use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{common::MonthKey, money::Money};

/// Fully derived aggregate state. A snapshot is a pure function of the three
/// caches it was computed from and is rebuilt from scratch on every change
/// notification; it is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateSnapshot {
    pub total_income: Money,
    pub total_expense: Money,
    /// `total_income - total_expense`, exactly.
    pub balance: Money,
    /// Spend per category. Income never contributes here.
    pub category_totals: BTreeMap<String, Money>,
    pub monthly_income: BTreeMap<MonthKey, Money>,
    pub monthly_expense: BTreeMap<MonthKey, Money>,
    /// One row per budgeted category, ordered by category name. Categories
    /// without a budget are absent here but still appear in
    /// `category_totals`.
    pub utilization: Vec<BudgetUtilization>,
}

/// How far one category's spend has eaten into its budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetUtilization {
    pub category: String,
    pub limit: Money,
    pub spent: Money,
    /// `min(100, 100 * spent / limit)` when the limit is positive, else 0.
    pub percent_used: f64,
    pub tier: UtilizationTier,
}

impl BudgetUtilization {
    pub fn new(category: String, limit: Money, spent: Money) -> Self {
        let percent_used = if limit.is_positive() {
            let raw = spent.minor() as f64 * 100.0 / limit.minor() as f64;
            raw.min(100.0)
        } else {
            0.0
        };
        Self {
            category,
            limit,
            spent,
            percent_used,
            tier: UtilizationTier::from_percent(percent_used),
        }
    }
}

/// Severity banding for budget utilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UtilizationTier {
    Green,
    Yellow,
    Red,
}

impl UtilizationTier {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            Self::Red
        } else if percent >= 90.0 {
            Self::Yellow
        } else {
            Self::Green
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_bands_match_thresholds() {
        assert_eq!(UtilizationTier::from_percent(89.9), UtilizationTier::Green);
        assert_eq!(UtilizationTier::from_percent(90.0), UtilizationTier::Yellow);
        assert_eq!(UtilizationTier::from_percent(100.0), UtilizationTier::Red);
    }

    #[test]
    fn zero_limit_reads_as_zero_percent() {
        let row = BudgetUtilization::new("Food".into(), Money::ZERO, Money::from_minor(5_000));
        assert_eq!(row.percent_used, 0.0);
        assert_eq!(row.tier, UtilizationTier::Green);
    }
}
