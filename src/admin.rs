//! Read-only cross-user aggregation for the administrative overview.
//!
//! This is the one sanctioned crossing of the per-user boundary: a bulk,
//! non-realtime read over every user's entry collections. It never writes.

use serde::Serialize;

use crate::{
    domain::{
        common::{Role, UserId, UserProfile},
        money::Money,
    },
    errors::TallyError,
    store::StoreBackend,
};

/// Lifetime totals for one user, as shown on the admin overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTotals {
    pub user: UserId,
    pub total_income: Money,
    pub total_expense: Money,
    pub balance: Money,
}

pub struct AdminService;

impl AdminService {
    /// Totals across every user, ordered by user identifier. Only the
    /// master identity may call this.
    pub fn overview(
        store: &dyn StoreBackend,
        viewer: &UserProfile,
    ) -> Result<Vec<UserTotals>, TallyError> {
        if viewer.role != Role::Master {
            return Err(TallyError::PermissionDenied(
                "administrative overview requires the master identity".into(),
            ));
        }

        let mut rows = Vec::new();
        for user in store.user_ids()? {
            let mut total_income = Money::ZERO;
            for entry in store.fetch_income(&user)? {
                total_income = total_income.saturating_add(entry.amount);
            }
            let mut total_expense = Money::ZERO;
            for entry in store.fetch_expenses(&user)? {
                total_expense = total_expense.saturating_add(entry.amount);
            }
            rows.push(UserTotals {
                user,
                total_income,
                total_expense,
                balance: total_income.saturating_sub(total_expense),
            });
        }
        Ok(rows)
    }
}
