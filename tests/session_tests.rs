use std::sync::Arc;

use tally_core::{
    config::EngineConfig,
    domain::{
        budget::BudgetDraft,
        common::{AuthState, UserId, UserProfile},
        entry::{ExpenseDraft, IncomeDraft},
        money::Money,
    },
    services::{BudgetService, EntryService},
    session::{Session, SessionManager},
    store::{MemoryStore, StoreBackend},
};

fn income_draft(source: &str, amount: &str) -> IncomeDraft {
    IncomeDraft {
        source: source.into(),
        amount: amount.into(),
    }
}

fn expense_draft(description: &str, category: &str, amount: &str) -> ExpenseDraft {
    ExpenseDraft {
        description: description.into(),
        category: category.into(),
        amount: amount.into(),
    }
}

#[test]
fn pump_reflects_store_mutations_back_into_the_caches() {
    let store = MemoryStore::new();
    let user = UserId::new("user-1");
    let config = EngineConfig::default();
    let mut session =
        Session::attach(&store, UserProfile::member("user-1"), config.clone()).unwrap();

    // Nothing is applied optimistically: the write only shows up after the
    // feed delivery is pumped.
    EntryService::add_income(&store, &user, &income_draft("Salary", "1000")).unwrap();
    EntryService::add_expense(&store, &user, &expense_draft("Rent", "Housing", "600"), &config)
        .unwrap();
    BudgetService::set(
        &store,
        &user,
        &BudgetDraft {
            category: "Housing".into(),
            amount: "700".into(),
        },
    )
    .unwrap();

    assert!(session.pump() > 0);
    let snapshot = session.aggregator().snapshot();
    assert_eq!(snapshot.total_income, Money::from_minor(100_000));
    assert_eq!(snapshot.total_expense, Money::from_minor(60_000));
    assert_eq!(snapshot.balance, Money::from_minor(40_000));
    assert_eq!(session.view().income.len(), 1);
    assert_eq!(session.view().expenses.len(), 1);
}

#[test]
fn teardown_is_safe_without_subscriptions_and_when_repeated() {
    let store = MemoryStore::new();
    let mut session =
        Session::attach(&store, UserProfile::member("user-1"), EngineConfig::default()).unwrap();
    session.teardown();
    session.teardown();
    assert!(!session.is_active());
}

#[test]
fn deliveries_queued_before_teardown_are_never_applied() {
    let store = MemoryStore::new();
    let user = UserId::new("user-1");
    let mut session =
        Session::attach(&store, UserProfile::member("user-1"), EngineConfig::default()).unwrap();

    // Delivered to the subscription's queue, but not yet pumped.
    EntryService::add_income(&store, &user, &income_draft("Salary", "1000")).unwrap();

    session.teardown();
    assert_eq!(session.pump(), 0);
    let snapshot = session.aggregator().snapshot();
    assert_eq!(snapshot.total_income, Money::ZERO);
    assert!(session.aggregator().income_entries().is_empty());
}

#[test]
fn identity_switch_never_leaks_the_previous_users_data() {
    let store: Arc<dyn StoreBackend> = Arc::new(MemoryStore::new());
    let alice = UserId::new("alice");
    let mut manager = SessionManager::new(Arc::clone(&store), EngineConfig::default());

    manager
        .on_auth_state_changed(AuthState::SignedIn(UserProfile::member("alice")))
        .unwrap();
    EntryService::add_income(manager.store(), &alice, &income_draft("Salary", "1000")).unwrap();
    let session = manager.active_mut().unwrap();
    session.pump();
    assert_eq!(
        session.aggregator().snapshot().total_income,
        Money::from_minor(100_000)
    );

    manager
        .on_auth_state_changed(AuthState::SignedIn(UserProfile::member("bob")))
        .unwrap();
    // More activity on the previous identity's collections.
    EntryService::add_income(manager.store(), &alice, &income_draft("Bonus", "500")).unwrap();

    let session = manager.active_mut().unwrap();
    session.pump();
    assert_eq!(session.profile().id, UserId::new("bob"));
    assert_eq!(session.aggregator().snapshot().total_income, Money::ZERO);
    assert!(session.aggregator().income_entries().is_empty());
}

#[test]
fn sign_out_clears_the_active_session() {
    let store: Arc<dyn StoreBackend> = Arc::new(MemoryStore::new());
    let mut manager = SessionManager::new(store, EngineConfig::default());
    manager
        .on_auth_state_changed(AuthState::SignedIn(UserProfile::member("alice")))
        .unwrap();
    assert!(manager.active().is_some());

    manager.on_auth_state_changed(AuthState::SignedOut).unwrap();
    assert!(manager.active().is_none());
}

#[test]
fn master_identity_gets_no_per_user_session() {
    let store: Arc<dyn StoreBackend> = Arc::new(MemoryStore::new());
    let mut manager = SessionManager::new(store, EngineConfig::default());
    manager
        .on_auth_state_changed(AuthState::SignedIn(UserProfile::master("root")))
        .unwrap();
    assert!(manager.active().is_none());
}

#[test]
fn attach_seeds_existing_collections_on_first_pump() {
    let store = MemoryStore::new();
    let user = UserId::new("user-1");
    EntryService::add_income(&store, &user, &income_draft("Salary", "1000")).unwrap();

    let mut session =
        Session::attach(&store, UserProfile::member("user-1"), EngineConfig::default()).unwrap();
    assert!(session.pump() >= 3);
    assert_eq!(
        session.aggregator().snapshot().total_income,
        Money::from_minor(100_000)
    );
}
