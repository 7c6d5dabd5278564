//! Per-identity session lifecycle.
//!
//! A [`Session`] binds one signed-in identity to three live change feeds and
//! the [`Aggregator`] they drive. The [`SessionManager`] reacts to
//! identity-provider transitions and guarantees the ordering that keeps
//! caches from leaking across identities: the previous session is always
//! torn down before anything attaches for the next one.

use std::sync::Arc;

use crate::{
    config::EngineConfig,
    domain::{
        budget::BudgetBook,
        common::{AuthState, Role, UserProfile},
        entry::{ExpenseEntry, IncomeEntry},
    },
    engine::{Aggregator, DashboardView},
    errors::TallyError,
    feed::{FeedMessage, FeedSubscription},
    store::StoreBackend,
};

/// One identity's live aggregation state: three feed subscriptions plus the
/// aggregator fed by them.
pub struct Session {
    profile: UserProfile,
    aggregator: Aggregator,
    income_feed: Option<FeedSubscription<Vec<IncomeEntry>>>,
    expense_feed: Option<FeedSubscription<Vec<ExpenseEntry>>>,
    budget_feed: Option<FeedSubscription<BudgetBook>>,
}

impl Session {
    /// Subscribes to the user's three collections. The store seeds each
    /// subscription with the current contents, so the first [`Self::pump`]
    /// populates all caches.
    pub fn attach(
        store: &dyn StoreBackend,
        profile: UserProfile,
        config: EngineConfig,
    ) -> Result<Self, TallyError> {
        let income_feed = store.subscribe_income(&profile.id)?;
        let expense_feed = store.subscribe_expenses(&profile.id)?;
        let budget_feed = store.subscribe_budgets(&profile.id)?;
        tracing::info!(user = %profile.id, "session attached");
        Ok(Self {
            profile,
            aggregator: Aggregator::new(config),
            income_feed: Some(income_feed),
            expense_feed: Some(expense_feed),
            budget_feed: Some(budget_feed),
        })
    }

    /// Drains every pending feed delivery, applying each as a wholesale
    /// cache replacement. Deliveries never run concurrently; this is the
    /// single cooperative dispatch point. Returns the number of snapshots
    /// applied.
    ///
    /// A lapsed feed leaves its cache at the last-known contents.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;

        if let Some(feed) = &self.income_feed {
            while let Some(message) = feed.poll() {
                match message {
                    FeedMessage::Snapshot(entries) => {
                        self.aggregator.replace_income(entries);
                        applied += 1;
                    }
                    FeedMessage::Lapsed(reason) => {
                        tracing::warn!(user = %self.profile.id, %reason, "income feed lapsed");
                    }
                }
            }
        }
        if let Some(feed) = &self.expense_feed {
            while let Some(message) = feed.poll() {
                match message {
                    FeedMessage::Snapshot(entries) => {
                        self.aggregator.replace_expenses(entries);
                        applied += 1;
                    }
                    FeedMessage::Lapsed(reason) => {
                        tracing::warn!(user = %self.profile.id, %reason, "expense feed lapsed");
                    }
                }
            }
        }
        if let Some(feed) = &self.budget_feed {
            while let Some(message) = feed.poll() {
                match message {
                    FeedMessage::Snapshot(budgets) => {
                        self.aggregator.replace_budgets(budgets);
                        applied += 1;
                    }
                    FeedMessage::Lapsed(reason) => {
                        tracing::warn!(user = %self.profile.id, %reason, "budget feed lapsed");
                    }
                }
            }
        }

        applied
    }

    /// Detaches all three subscriptions, then clears the caches. Safe to
    /// call with no active subscriptions, and safe to call repeatedly.
    /// Deliveries queued before the detach are never applied afterwards.
    pub fn teardown(&mut self) {
        let was_active = self.is_active();
        if let Some(mut feed) = self.income_feed.take() {
            feed.detach();
        }
        if let Some(mut feed) = self.expense_feed.take() {
            feed.detach();
        }
        if let Some(mut feed) = self.budget_feed.take() {
            feed.detach();
        }
        self.aggregator.clear();
        if was_active {
            tracing::info!(user = %self.profile.id, "session torn down");
        }
    }

    pub fn is_active(&self) -> bool {
        self.income_feed.is_some() || self.expense_feed.is_some() || self.budget_feed.is_some()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn view(&self) -> DashboardView<'_> {
        self.aggregator.view()
    }
}

/// Owns at most one live session and drives it from authentication-state
/// transitions.
pub struct SessionManager {
    store: Arc<dyn StoreBackend>,
    config: EngineConfig,
    active: Option<Session>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn StoreBackend>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            active: None,
        }
    }

    /// Handles a sign-in, sign-out, or identity switch. The previous
    /// session, if any, is torn down before a new one attaches; a stale
    /// feed must never outlive its identity.
    ///
    /// The master identity gets no per-user session: its overview is served
    /// by the pull-based administrative read path.
    pub fn on_auth_state_changed(&mut self, state: AuthState) -> Result<(), TallyError> {
        if let Some(mut previous) = self.active.take() {
            previous.teardown();
        }
        match state {
            AuthState::SignedOut => Ok(()),
            AuthState::SignedIn(profile) if profile.role == Role::Master => {
                tracing::info!(user = %profile.id, "master signed in; no per-user session");
                Ok(())
            }
            AuthState::SignedIn(profile) => {
                let session = Session::attach(self.store.as_ref(), profile, self.config.clone())?;
                self.active = Some(session);
                Ok(())
            }
        }
    }

    pub fn active(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut Session> {
        self.active.as_mut()
    }

    pub fn store(&self) -> &dyn StoreBackend {
        self.store.as_ref()
    }
}
