//! Validated write paths for income and expense entries.
//!
//! Every mutation validates its draft first, so malformed input is rejected
//! before any request reaches the store. The store call itself is
//! fire-and-forget: the caches only change once the change feed reflects
//! the mutation back.

use uuid::Uuid;

use crate::{
    config::EngineConfig,
    domain::{
        common::UserId,
        entry::{ExpenseDraft, IncomeDraft},
    },
    errors::TallyError,
    store::StoreBackend,
};

pub struct EntryService;

impl EntryService {
    pub fn add_income(
        store: &dyn StoreBackend,
        user: &UserId,
        draft: &IncomeDraft,
    ) -> Result<Uuid, TallyError> {
        let input = draft.validate()?;
        store.add_income(user, input)
    }

    pub fn update_income(
        store: &dyn StoreBackend,
        user: &UserId,
        id: Uuid,
        draft: &IncomeDraft,
    ) -> Result<(), TallyError> {
        let input = draft.validate()?;
        store.update_income(user, id, input)
    }

    pub fn delete_income(
        store: &dyn StoreBackend,
        user: &UserId,
        id: Uuid,
    ) -> Result<(), TallyError> {
        store.delete_income(user, id)
    }

    pub fn add_expense(
        store: &dyn StoreBackend,
        user: &UserId,
        draft: &ExpenseDraft,
        config: &EngineConfig,
    ) -> Result<Uuid, TallyError> {
        let input = draft.validate(&config.default_category)?;
        store.add_expense(user, input)
    }

    pub fn update_expense(
        store: &dyn StoreBackend,
        user: &UserId,
        id: Uuid,
        draft: &ExpenseDraft,
        config: &EngineConfig,
    ) -> Result<(), TallyError> {
        let input = draft.validate(&config.default_category)?;
        store.update_expense(user, id, input)
    }

    pub fn delete_expense(
        store: &dyn StoreBackend,
        user: &UserId,
        id: Uuid,
    ) -> Result<(), TallyError> {
        store.delete_expense(user, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn rejected_drafts_never_reach_the_store() {
        let store = MemoryStore::new();
        let user = UserId::new("user-1");
        let draft = IncomeDraft {
            source: "Salary".into(),
            amount: "-10".into(),
        };
        assert!(EntryService::add_income(&store, &user, &draft).is_err());
        assert!(store.fetch_income(&user).unwrap().is_empty());
    }

    #[test]
    fn valid_draft_lands_in_the_store() {
        let store = MemoryStore::new();
        let user = UserId::new("user-1");
        let draft = IncomeDraft {
            source: "  Salary  ".into(),
            amount: "1000".into(),
        };
        let id = EntryService::add_income(&store, &user, &draft).unwrap();
        let entries = store.fetch_income(&user).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].source, "Salary");
    }
}
