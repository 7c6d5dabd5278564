//! Validated write path for budget limits.

use crate::{
    domain::{budget::BudgetDraft, common::UserId},
    errors::TallyError,
    store::StoreBackend,
};

pub struct BudgetService;

impl BudgetService {
    /// Validates and upserts the limit for one category. Re-setting an
    /// existing category overwrites its limit in place.
    pub fn set(
        store: &dyn StoreBackend,
        user: &UserId,
        draft: &BudgetDraft,
    ) -> Result<(), TallyError> {
        let input = draft.validate()?;
        store.set_budget(user, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::money::Money, store::MemoryStore};

    #[test]
    fn set_validates_before_writing() {
        let store = MemoryStore::new();
        let user = UserId::new("user-1");
        let bad = BudgetDraft {
            category: "Food".into(),
            amount: "nope".into(),
        };
        assert!(BudgetService::set(&store, &user, &bad).is_err());

        let good = BudgetDraft {
            category: "Food".into(),
            amount: "250".into(),
        };
        BudgetService::set(&store, &user, &good).unwrap();
        let subscription = store.subscribe_budgets(&user).unwrap();
        match subscription.poll() {
            Some(crate::feed::FeedMessage::Snapshot(book)) => {
                assert_eq!(book.limit("Food"), Some(Money::from_minor(25_000)));
            }
            other => panic!("expected seeded budgets, got {other:?}"),
        }
    }
}
