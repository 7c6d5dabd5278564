pub mod budget_service;
pub mod entry_service;
pub mod suggestions;

pub use budget_service::BudgetService;
pub use entry_service::EntryService;
pub use suggestions::CategorySuggester;
