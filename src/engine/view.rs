//! Presentation-facing derived data. Nothing here draws anything; the
//! presentation layer receives plain values and renders them however it
//! likes.

use std::collections::BTreeSet;

use serde::Serialize;

use super::snapshot::AggregateSnapshot;
use crate::domain::{
    common::MonthKey,
    entry::{ExpenseEntry, IncomeEntry},
    money::Money,
};

/// Everything the presentation layer needs to draw one dashboard frame: the
/// derived snapshot plus the two raw caches for list views.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub snapshot: &'a AggregateSnapshot,
    pub income: &'a [IncomeEntry],
    pub expenses: &'a [ExpenseEntry],
}

/// Chart-ready dataset for the category pie: parallel label/value vectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub labels: Vec<String>,
    pub values: Vec<Money>,
}

/// Chart-ready dataset for the income/expense line chart: the sorted union
/// of both monthly maps' keys, zero-filled where a series has no data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub months: Vec<MonthKey>,
    pub income: Vec<Money>,
    pub expense: Vec<Money>,
}

impl AggregateSnapshot {
    pub fn category_breakdown(&self) -> CategoryBreakdown {
        let mut labels = Vec::with_capacity(self.category_totals.len());
        let mut values = Vec::with_capacity(self.category_totals.len());
        for (category, total) in &self.category_totals {
            labels.push(category.clone());
            values.push(*total);
        }
        CategoryBreakdown { labels, values }
    }

    pub fn monthly_series(&self) -> MonthlySeries {
        let months: BTreeSet<&MonthKey> = self
            .monthly_income
            .keys()
            .chain(self.monthly_expense.keys())
            .collect();
        let mut series = MonthlySeries {
            months: Vec::with_capacity(months.len()),
            income: Vec::with_capacity(months.len()),
            expense: Vec::with_capacity(months.len()),
        };
        for month in months {
            series.income.push(
                self.monthly_income
                    .get(month)
                    .copied()
                    .unwrap_or(Money::ZERO),
            );
            series.expense.push(
                self.monthly_expense
                    .get(month)
                    .copied()
                    .unwrap_or(Money::ZERO),
            );
            series.months.push(month.clone());
        }
        series
    }

    /// The textual summary shown next to the charts: totals, balance, and
    /// one line per budgeted category.
    pub fn render_summary(&self) -> String {
        let mut lines = vec![
            format!("Total Income: ${}", self.total_income),
            format!("Total Expense: ${}", self.total_expense),
            format!("Balance: ${}", self.balance),
            "Budgets:".to_string(),
        ];
        if self.utilization.is_empty() {
            lines.push("  No budgets set.".to_string());
        } else {
            for row in &self.utilization {
                lines.push(format!(
                    "  {}: ${} used ${} ({:.1}%) [{}]",
                    row.category,
                    row.limit,
                    row.spent,
                    row.percent_used,
                    row.tier.as_str()
                ));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn monthly_series_unions_and_zero_fills() {
        let mut snapshot = AggregateSnapshot::default();
        snapshot.monthly_income =
            BTreeMap::from([(MonthKey::new(2024, 1), Money::from_minor(100_000))]);
        snapshot.monthly_expense =
            BTreeMap::from([(MonthKey::new(2024, 2), Money::from_minor(40_000))]);

        let series = snapshot.monthly_series();
        assert_eq!(
            series.months,
            vec![MonthKey::new(2024, 1), MonthKey::new(2024, 2)]
        );
        assert_eq!(series.income, vec![Money::from_minor(100_000), Money::ZERO]);
        assert_eq!(series.expense, vec![Money::ZERO, Money::from_minor(40_000)]);
    }

    #[test]
    fn breakdown_tracks_category_totals_order() {
        let mut snapshot = AggregateSnapshot::default();
        snapshot.category_totals = BTreeMap::from([
            ("Housing".to_string(), Money::from_minor(60_000)),
            ("Food".to_string(), Money::from_minor(15_000)),
        ]);
        let breakdown = snapshot.category_breakdown();
        assert_eq!(breakdown.labels, vec!["Food", "Housing"]);
        assert_eq!(
            breakdown.values,
            vec![Money::from_minor(15_000), Money::from_minor(60_000)]
        );
    }
}
