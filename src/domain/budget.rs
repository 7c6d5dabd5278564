use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::money::Money;
use crate::errors::TallyError;

/// Per-category spending ceilings: at most one limit per category, keyed by
/// the category name. Setting a limit for an existing category overwrites it
/// in place; there is no delete operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetBook {
    limits: BTreeMap<String, Money>,
}

impl BudgetBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: impl Into<String>, limit: Money) {
        self.limits.insert(category.into(), limit);
    }

    pub fn limit(&self, category: &str) -> Option<Money> {
        self.limits.get(category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Money)> {
        self.limits.iter()
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

/// Raw dashboard form input for a budget limit.
#[derive(Debug, Clone, Default)]
pub struct BudgetDraft {
    pub category: String,
    pub amount: String,
}

impl BudgetDraft {
    pub fn validate(&self) -> Result<BudgetInput, TallyError> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err(TallyError::InvalidInput(
                "budget category cannot be empty".into(),
            ));
        }
        let limit = Money::parse(&self.amount)?;
        if !limit.is_positive() {
            return Err(TallyError::InvalidInput(
                "budget limit must be a positive number".into(),
            ));
        }
        Ok(BudgetInput {
            category: category.to_string(),
            limit,
        })
    }
}

/// Validated budget fields, ready to hand to a store.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetInput {
    pub category: String,
    pub limit: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_same_category_overwrites_in_place() {
        let mut book = BudgetBook::new();
        book.set("Food", Money::from_minor(10_000));
        book.set("Food", Money::from_minor(25_000));
        assert_eq!(book.len(), 1);
        assert_eq!(book.limit("Food"), Some(Money::from_minor(25_000)));
    }

    #[test]
    fn draft_rejects_blank_category_and_bad_amounts() {
        let blank = BudgetDraft {
            category: " ".into(),
            amount: "100".into(),
        };
        assert!(blank.validate().is_err());

        let zero = BudgetDraft {
            category: "Food".into(),
            amount: "0".into(),
        };
        assert!(zero.validate().is_err());
    }
}
