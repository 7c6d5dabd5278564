//! Reference in-memory store with live change feeds and an optional JSON
//! snapshot on disk, standing in for the hosted document store during tests
//! and local development.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
    sync::Mutex,
};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StoreBackend;
use crate::{
    domain::{
        budget::{BudgetBook, BudgetInput},
        common::UserId,
        entry::{ExpenseEntry, ExpenseInput, IncomeEntry, IncomeInput},
    },
    errors::TallyError,
    feed::{FeedHub, FeedSubscription},
};

struct UserSpace {
    income: Vec<IncomeEntry>,
    expenses: Vec<ExpenseEntry>,
    budgets: BudgetBook,
    income_feed: FeedHub<Vec<IncomeEntry>>,
    expense_feed: FeedHub<Vec<ExpenseEntry>>,
    budget_feed: FeedHub<BudgetBook>,
}

impl UserSpace {
    fn new() -> Self {
        Self {
            income: Vec::new(),
            expenses: Vec::new(),
            budgets: BudgetBook::new(),
            income_feed: FeedHub::new(),
            expense_feed: FeedHub::new(),
            budget_feed: FeedHub::new(),
        }
    }

    fn publish_income(&self) {
        self.income_feed.publish(ordered_income(&self.income));
    }

    fn publish_expenses(&self) {
        self.expense_feed.publish(ordered_expenses(&self.expenses));
    }

    fn publish_budgets(&self) {
        self.budget_feed.publish(self.budgets.clone());
    }
}

/// Collections persisted for one user in the snapshot file.
#[derive(Serialize, Deserialize)]
struct PersistedSpace {
    income: Vec<IncomeEntry>,
    expenses: Vec<ExpenseEntry>,
    budgets: BudgetBook,
}

pub struct MemoryStore {
    spaces: Mutex<HashMap<UserId, UserSpace>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            spaces: Mutex::new(HashMap::new()),
        }
    }

    /// Writes every user's collections as pretty JSON, atomically
    /// (temp file, then rename).
    pub fn save_to_path(&self, path: &Path) -> Result<(), TallyError> {
        let spaces = self.lock_spaces()?;
        let persisted: BTreeMap<String, PersistedSpace> = spaces
            .iter()
            .map(|(user, space)| {
                (
                    user.as_str().to_string(),
                    PersistedSpace {
                        income: space.income.clone(),
                        expenses: space.expenses.clone(),
                        budgets: space.budgets.clone(),
                    },
                )
            })
            .collect();
        drop(spaces);

        let json = serde_json::to_string_pretty(&persisted)?;
        let mut tmp = path.to_path_buf();
        tmp.set_extension("json.tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Rebuilds a store from a snapshot written by [`Self::save_to_path`].
    /// Feeds start fresh; subscriptions do not survive a reload.
    pub fn load_from_path(path: &Path) -> Result<Self, TallyError> {
        let data = fs::read_to_string(path)?;
        let persisted: BTreeMap<String, PersistedSpace> = serde_json::from_str(&data)?;
        let store = Self::new();
        {
            let mut spaces = store.lock_spaces()?;
            for (user, collections) in persisted {
                let mut space = UserSpace::new();
                space.income = collections.income;
                space.expenses = collections.expenses;
                space.budgets = collections.budgets;
                spaces.insert(UserId::new(user), space);
            }
        }
        Ok(store)
    }

    fn lock_spaces(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<UserId, UserSpace>>, TallyError> {
        self.spaces
            .lock()
            .map_err(|_| TallyError::Store("store lock poisoned".into()))
    }

    fn with_space<R>(
        &self,
        user: &UserId,
        op: impl FnOnce(&mut UserSpace) -> R,
    ) -> Result<R, TallyError> {
        let mut spaces = self.lock_spaces()?;
        let space = spaces.entry(user.clone()).or_insert_with(UserSpace::new);
        Ok(op(space))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBackend for MemoryStore {
    fn add_income(&self, user: &UserId, input: IncomeInput) -> Result<Uuid, TallyError> {
        self.with_space(user, |space| {
            let entry = IncomeEntry::new(input.source, input.amount, Some(Utc::now()));
            let id = entry.id;
            space.income.push(entry);
            space.publish_income();
            tracing::debug!(%user, %id, "income entry added");
            id
        })
    }

    fn update_income(&self, user: &UserId, id: Uuid, input: IncomeInput) -> Result<(), TallyError> {
        self.with_space(user, |space| {
            // Edit-in-place: identifier and creation timestamp are preserved.
            let entry = space
                .income
                .iter_mut()
                .find(|entry| entry.id == id)
                .ok_or(TallyError::UnknownEntry(id))?;
            entry.source = input.source;
            entry.amount = input.amount;
            space.publish_income();
            Ok(())
        })?
    }

    fn delete_income(&self, user: &UserId, id: Uuid) -> Result<(), TallyError> {
        self.with_space(user, |space| {
            let position = space
                .income
                .iter()
                .position(|entry| entry.id == id)
                .ok_or(TallyError::UnknownEntry(id))?;
            space.income.remove(position);
            space.publish_income();
            Ok(())
        })?
    }

    fn add_expense(&self, user: &UserId, input: ExpenseInput) -> Result<Uuid, TallyError> {
        self.with_space(user, |space| {
            let entry = ExpenseEntry::new(
                input.description,
                input.category,
                input.amount,
                Some(Utc::now()),
            );
            let id = entry.id;
            space.expenses.push(entry);
            space.publish_expenses();
            tracing::debug!(%user, %id, "expense entry added");
            id
        })
    }

    fn update_expense(
        &self,
        user: &UserId,
        id: Uuid,
        input: ExpenseInput,
    ) -> Result<(), TallyError> {
        self.with_space(user, |space| {
            let entry = space
                .expenses
                .iter_mut()
                .find(|entry| entry.id == id)
                .ok_or(TallyError::UnknownEntry(id))?;
            entry.description = input.description;
            entry.category = input.category;
            entry.amount = input.amount;
            space.publish_expenses();
            Ok(())
        })?
    }

    fn delete_expense(&self, user: &UserId, id: Uuid) -> Result<(), TallyError> {
        self.with_space(user, |space| {
            let position = space
                .expenses
                .iter()
                .position(|entry| entry.id == id)
                .ok_or(TallyError::UnknownEntry(id))?;
            space.expenses.remove(position);
            space.publish_expenses();
            Ok(())
        })?
    }

    fn set_budget(&self, user: &UserId, input: BudgetInput) -> Result<(), TallyError> {
        self.with_space(user, |space| {
            space.budgets.set(input.category, input.limit);
            space.publish_budgets();
        })
    }

    fn subscribe_income(
        &self,
        user: &UserId,
    ) -> Result<FeedSubscription<Vec<IncomeEntry>>, TallyError> {
        self.with_space(user, |space| {
            space
                .income_feed
                .subscribe_seeded(ordered_income(&space.income))
        })
    }

    fn subscribe_expenses(
        &self,
        user: &UserId,
    ) -> Result<FeedSubscription<Vec<ExpenseEntry>>, TallyError> {
        self.with_space(user, |space| {
            space
                .expense_feed
                .subscribe_seeded(ordered_expenses(&space.expenses))
        })
    }

    fn subscribe_budgets(&self, user: &UserId) -> Result<FeedSubscription<BudgetBook>, TallyError> {
        self.with_space(user, |space| {
            space.budget_feed.subscribe_seeded(space.budgets.clone())
        })
    }

    fn user_ids(&self) -> Result<Vec<UserId>, TallyError> {
        let spaces = self.lock_spaces()?;
        let mut ids: Vec<UserId> = spaces.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn fetch_income(&self, user: &UserId) -> Result<Vec<IncomeEntry>, TallyError> {
        let spaces = self.lock_spaces()?;
        Ok(spaces
            .get(user)
            .map(|space| ordered_income(&space.income))
            .unwrap_or_default())
    }

    fn fetch_expenses(&self, user: &UserId) -> Result<Vec<ExpenseEntry>, TallyError> {
        let spaces = self.lock_spaces()?;
        Ok(spaces
            .get(user)
            .map(|space| ordered_expenses(&space.expenses))
            .unwrap_or_default())
    }
}

fn ordered_income(entries: &[IncomeEntry]) -> Vec<IncomeEntry> {
    let mut ordered = entries.to_vec();
    ordered.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    ordered
}

fn ordered_expenses(entries: &[ExpenseEntry]) -> Vec<ExpenseEntry> {
    let mut ordered = entries.to_vec();
    ordered.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    ordered
}
