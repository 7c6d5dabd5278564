use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;
use crate::errors::TallyError;

/// A single income record. `recorded_at` is assigned by the store at
/// creation and preserved across edits; it can be absent when the backing
/// store never materialized a server timestamp.
///
/// Deserialization tolerates records missing an amount: they decode to zero
/// and contribute nothing to aggregation, keeping the dashboard rendering
/// even with corrupt upstream data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub id: Uuid,
    pub source: String,
    #[serde(default)]
    pub amount: Money,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl IncomeEntry {
    pub fn new(
        source: impl Into<String>,
        amount: Money,
        recorded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            amount,
            recorded_at,
        }
    }
}

/// A single expense record. An empty category buckets under the configured
/// default at aggregation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub id: Uuid,
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: Money,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl ExpenseEntry {
    pub fn new(
        description: impl Into<String>,
        category: impl Into<String>,
        amount: Money,
        recorded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            category: category.into(),
            amount,
            recorded_at,
        }
    }
}

/// Raw dashboard form input for an income entry, validated before any
/// request reaches the store.
#[derive(Debug, Clone, Default)]
pub struct IncomeDraft {
    pub source: String,
    pub amount: String,
}

impl IncomeDraft {
    pub fn validate(&self) -> Result<IncomeInput, TallyError> {
        let source = self.source.trim();
        if source.is_empty() {
            return Err(TallyError::InvalidInput(
                "income source cannot be empty".into(),
            ));
        }
        let amount = Money::parse(&self.amount)?;
        if !amount.is_positive() {
            return Err(TallyError::InvalidInput(
                "amount must be a positive number".into(),
            ));
        }
        Ok(IncomeInput {
            source: source.to_string(),
            amount,
        })
    }
}

/// Validated income fields, ready to hand to a store.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeInput {
    pub source: String,
    pub amount: Money,
}

/// Raw dashboard form input for an expense entry.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub description: String,
    pub category: String,
    pub amount: String,
}

impl ExpenseDraft {
    /// A blank category falls back to `default_category` at validation time,
    /// so the stored record already carries the bucket it aggregates under.
    pub fn validate(&self, default_category: &str) -> Result<ExpenseInput, TallyError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(TallyError::InvalidInput(
                "expense description cannot be empty".into(),
            ));
        }
        let category = self.category.trim();
        let category = if category.is_empty() {
            default_category.to_string()
        } else {
            category.to_string()
        };
        let amount = Money::parse(&self.amount)?;
        if !amount.is_positive() {
            return Err(TallyError::InvalidInput(
                "amount must be a positive number".into(),
            ));
        }
        Ok(ExpenseInput {
            description: description.to_string(),
            category,
            amount,
        })
    }
}

/// Validated expense fields, ready to hand to a store.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    pub description: String,
    pub category: String,
    pub amount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_draft_rejects_blank_source() {
        let draft = IncomeDraft {
            source: "   ".into(),
            amount: "10".into(),
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn income_draft_rejects_non_positive_amounts() {
        for amount in ["0", "-5", "oops"] {
            let draft = IncomeDraft {
                source: "Salary".into(),
                amount: amount.into(),
            };
            assert!(draft.validate().is_err(), "`{amount}` should be rejected");
        }
    }

    #[test]
    fn expense_draft_defaults_blank_category() {
        let draft = ExpenseDraft {
            description: "Lunch".into(),
            category: "  ".into(),
            amount: "12.50".into(),
        };
        let input = draft.validate("Other").unwrap();
        assert_eq!(input.category, "Other");
        assert_eq!(input.amount, Money::from_minor(1_250));
    }

    #[test]
    fn entry_missing_amount_decodes_to_zero() {
        let raw = format!(r#"{{"id":"{}","source":"Salary"}}"#, Uuid::new_v4());
        let entry: IncomeEntry = serde_json::from_str(&raw).unwrap();
        assert_eq!(entry.amount, Money::ZERO);
        assert!(entry.recorded_at.is_none());
    }
}
