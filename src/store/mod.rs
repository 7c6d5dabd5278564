pub mod memory;

pub use memory::MemoryStore;

use uuid::Uuid;

use crate::{
    domain::{
        budget::{BudgetBook, BudgetInput},
        common::UserId,
        entry::{ExpenseEntry, ExpenseInput, IncomeEntry, IncomeInput},
    },
    errors::TallyError,
    feed::FeedSubscription,
};

/// Abstraction over backends that expose per-user collections with live
/// change feeds.
///
/// Mutations are fire-and-forget: a successful call only means the request
/// was accepted. The caller observes the effect through the corresponding
/// feed, never through an optimistic local update. Entry collections are
/// delivered in timestamp-descending order; budgets are keyed by category
/// with no inherent order.
pub trait StoreBackend: Send + Sync {
    fn add_income(&self, user: &UserId, input: IncomeInput) -> Result<Uuid, TallyError>;
    fn update_income(&self, user: &UserId, id: Uuid, input: IncomeInput) -> Result<(), TallyError>;
    fn delete_income(&self, user: &UserId, id: Uuid) -> Result<(), TallyError>;

    fn add_expense(&self, user: &UserId, input: ExpenseInput) -> Result<Uuid, TallyError>;
    fn update_expense(&self, user: &UserId, id: Uuid, input: ExpenseInput)
        -> Result<(), TallyError>;
    fn delete_expense(&self, user: &UserId, id: Uuid) -> Result<(), TallyError>;

    /// Upserts the limit for one category; there is no budget delete.
    fn set_budget(&self, user: &UserId, input: BudgetInput) -> Result<(), TallyError>;

    fn subscribe_income(
        &self,
        user: &UserId,
    ) -> Result<FeedSubscription<Vec<IncomeEntry>>, TallyError>;
    fn subscribe_expenses(
        &self,
        user: &UserId,
    ) -> Result<FeedSubscription<Vec<ExpenseEntry>>, TallyError>;
    fn subscribe_budgets(&self, user: &UserId) -> Result<FeedSubscription<BudgetBook>, TallyError>;

    /// Administrative bulk read path: non-realtime, read-only, across users.
    fn user_ids(&self) -> Result<Vec<UserId>, TallyError>;
    fn fetch_income(&self, user: &UserId) -> Result<Vec<IncomeEntry>, TallyError>;
    fn fetch_expenses(&self, user: &UserId) -> Result<Vec<ExpenseEntry>, TallyError>;
}
