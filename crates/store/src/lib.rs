//! Remote-store boundary.
//!
//! The authoritative data lives in a hosted relational service exposing
//! six user-scoped tables over a REST interface. This crate owns that
//! boundary: the [`Store`] trait the finance container is generic over,
//! the wire row types carrying the service's native column names, the
//! row↔model mapping, the HTTP implementation ([`RestStore`]) and an
//! in-memory implementation ([`MemoryStore`]) used as a test double.

pub use error::StoreError;
pub use memory::MemoryStore;
pub use rest::RestStore;

use model::{Account, Budget, Category, Goal, Polarity, Session, Transaction};
use uuid::Uuid;

mod error;
mod memory;
mod rest;
pub mod rows;

pub type ResultStore<T> = Result<T, StoreError>;

/// Scoped access to the six remote tables.
///
/// Every call carries the active [`Session`]: reads select only rows owned
/// by `session.user_id`, writes stamp it. Implementors translate between
/// the service's native rows and the internal model; callers never see a
/// native column name.
///
/// Transaction updates take the entry's previous polarity because the
/// service stores income and expense movements in separate tables; a
/// polarity change moves the row between them under the same id.
#[allow(async_fn_in_trait)]
pub trait Store {
    async fn fetch_accounts(&self, session: &Session) -> ResultStore<Vec<Account>>;
    async fn fetch_categories(&self, session: &Session) -> ResultStore<Vec<Category>>;
    async fn fetch_incomes(&self, session: &Session) -> ResultStore<Vec<Transaction>>;
    async fn fetch_expenses(&self, session: &Session) -> ResultStore<Vec<Transaction>>;
    async fn fetch_goals(&self, session: &Session) -> ResultStore<Vec<Goal>>;
    async fn fetch_budgets(&self, session: &Session) -> ResultStore<Vec<Budget>>;

    async fn insert_account(&self, session: &Session, account: &Account) -> ResultStore<()>;
    async fn update_account(&self, session: &Session, account: &Account) -> ResultStore<()>;
    async fn delete_account(&self, session: &Session, id: Uuid) -> ResultStore<()>;

    async fn insert_category(&self, session: &Session, category: &Category) -> ResultStore<()>;
    async fn update_category(&self, session: &Session, category: &Category) -> ResultStore<()>;
    async fn delete_category(&self, session: &Session, id: Uuid) -> ResultStore<()>;

    async fn insert_transaction(&self, session: &Session, tx: &Transaction) -> ResultStore<()>;
    async fn update_transaction(
        &self,
        session: &Session,
        previous: Polarity,
        tx: &Transaction,
    ) -> ResultStore<()>;
    async fn delete_transaction(
        &self,
        session: &Session,
        polarity: Polarity,
        id: Uuid,
    ) -> ResultStore<()>;

    async fn insert_goal(&self, session: &Session, goal: &Goal) -> ResultStore<()>;
    async fn update_goal(&self, session: &Session, goal: &Goal) -> ResultStore<()>;
    async fn delete_goal(&self, session: &Session, id: Uuid) -> ResultStore<()>;

    async fn insert_budget(&self, session: &Session, budget: &Budget) -> ResultStore<()>;
    async fn update_budget(&self, session: &Session, budget: &Budget) -> ResultStore<()>;
    async fn delete_budget(&self, session: &Session, id: Uuid) -> ResultStore<()>;
}
