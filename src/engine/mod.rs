pub mod snapshot;
pub mod view;

pub use snapshot::{AggregateSnapshot, BudgetUtilization, UtilizationTier};
pub use view::{CategoryBreakdown, DashboardView, MonthlySeries};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
    config::{EngineConfig, MonthFallback},
    domain::{
        budget::BudgetBook,
        common::MonthKey,
        entry::{ExpenseEntry, IncomeEntry},
        money::Money,
    },
};

/// Maintains the three local caches mirroring one user's remote collections
/// and the snapshot derived from them.
///
/// Entry caches keep the remote ordering (timestamp descending) for list
/// views; aggregation itself is order-independent. Each replacement is
/// wholesale: a change anywhere in a remote collection resends that
/// collection's entire current state.
pub struct Aggregator {
    config: EngineConfig,
    income: Vec<IncomeEntry>,
    expenses: Vec<ExpenseEntry>,
    budgets: BudgetBook,
    snapshot: AggregateSnapshot,
}

impl Aggregator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            income: Vec::new(),
            expenses: Vec::new(),
            budgets: BudgetBook::new(),
            snapshot: AggregateSnapshot::default(),
        }
    }

    pub fn replace_income(&mut self, entries: Vec<IncomeEntry>) {
        tracing::debug!(count = entries.len(), "income cache replaced");
        self.income = entries;
        self.rebuild();
    }

    pub fn replace_expenses(&mut self, entries: Vec<ExpenseEntry>) {
        tracing::debug!(count = entries.len(), "expense cache replaced");
        self.expenses = entries;
        self.rebuild();
    }

    pub fn replace_budgets(&mut self, budgets: BudgetBook) {
        tracing::debug!(count = budgets.len(), "budget cache replaced");
        self.budgets = budgets;
        self.rebuild();
    }

    /// Drops all cached data and the derived snapshot.
    pub fn clear(&mut self) {
        self.income.clear();
        self.expenses.clear();
        self.budgets = BudgetBook::new();
        self.snapshot = AggregateSnapshot::default();
    }

    fn rebuild(&mut self) {
        self.snapshot = self.recompute();
    }

    /// Rebuilds the aggregate from scratch: one pass over each entry cache,
    /// then one over the budget book. Pure arithmetic over already-validated
    /// data; cannot fail.
    pub fn recompute(&self) -> AggregateSnapshot {
        let mut snapshot = AggregateSnapshot::default();

        for entry in &self.income {
            snapshot.total_income = snapshot.total_income.saturating_add(entry.amount);
            if let Some(month) = self.month_key(entry.recorded_at) {
                accumulate(&mut snapshot.monthly_income, month, entry.amount);
            }
        }

        for entry in &self.expenses {
            snapshot.total_expense = snapshot.total_expense.saturating_add(entry.amount);
            let category = self.normalize_category(&entry.category);
            accumulate(&mut snapshot.category_totals, category, entry.amount);
            if let Some(month) = self.month_key(entry.recorded_at) {
                accumulate(&mut snapshot.monthly_expense, month, entry.amount);
            }
        }

        snapshot.balance = snapshot.total_income.saturating_sub(snapshot.total_expense);

        for (category, limit) in self.budgets.iter() {
            let spent = snapshot
                .category_totals
                .get(category)
                .copied()
                .unwrap_or(Money::ZERO);
            snapshot
                .utilization
                .push(BudgetUtilization::new(category.clone(), *limit, spent));
        }

        snapshot
    }

    pub fn snapshot(&self) -> &AggregateSnapshot {
        &self.snapshot
    }

    pub fn income_entries(&self) -> &[IncomeEntry] {
        &self.income
    }

    pub fn expense_entries(&self) -> &[ExpenseEntry] {
        &self.expenses
    }

    pub fn budgets(&self) -> &BudgetBook {
        &self.budgets
    }

    pub fn view(&self) -> DashboardView<'_> {
        DashboardView {
            snapshot: &self.snapshot,
            income: &self.income,
            expenses: &self.expenses,
        }
    }

    fn normalize_category(&self, category: &str) -> String {
        let trimmed = category.trim();
        if trimmed.is_empty() {
            self.config.default_category.clone()
        } else {
            trimmed.to_string()
        }
    }

    fn month_key(&self, recorded_at: Option<DateTime<Utc>>) -> Option<MonthKey> {
        match recorded_at {
            Some(timestamp) => Some(MonthKey::from_datetime(&timestamp)),
            None => match &self.config.month_fallback {
                MonthFallback::CurrentMonth => Some(MonthKey::current()),
                MonthFallback::Fixed(month) => Some(month.clone()),
                MonthFallback::Skip => None,
            },
        }
    }
}

fn accumulate<K: Ord>(map: &mut BTreeMap<K, Money>, key: K, amount: Money) {
    let slot = map.entry(key).or_insert(Money::ZERO);
    *slot = slot.saturating_add(amount);
}
