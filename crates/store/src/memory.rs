//! In-memory implementation of [`Store`].
//!
//! Behaves like the remote service as far as callers can observe: rows
//! are scoped per user, writes address single rows, and unknown ids are
//! rejected. Used as the test double for the finance container and for
//! exercising code paths without a hosted backend.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use model::{Account, Budget, Category, Goal, Polarity, Session, Transaction};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::{ResultStore, Store, StoreError};

#[derive(Clone, Debug, Default)]
struct UserRows {
    accounts: Vec<Account>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    goals: Vec<Goal>,
    budgets: Vec<Budget>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: Mutex<HashMap<Uuid, UserRows>>,
    fail_next: Mutex<Option<String>>,
    hold_next_fetch: Mutex<Option<Arc<Notify>>>,
}

/// User-scoped in-memory store. Cheap to clone; clones share state.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: the next store call fails with a server error carrying
    /// `message`, leaving the stored rows untouched.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.inner.fail_next.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    /// Test hook: the next `fetch_accounts` call parks until the returned
    /// handle is notified. Lets tests interleave a second load or a
    /// mutation inside an in-flight load deterministically.
    pub fn hold_next_fetch(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self
            .inner
            .hold_next_fetch
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(gate.clone());
        gate
    }

    fn guard(&self) -> ResultStore<()> {
        let pending = self
            .inner
            .fail_next
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match pending {
            Some(message) => Err(StoreError::Server(message)),
            None => Ok(()),
        }
    }

    fn with_rows<T>(&self, session: &Session, f: impl FnOnce(&mut UserRows) -> T) -> T {
        let mut rows = self.inner.rows.lock().unwrap_or_else(|e| e.into_inner());
        f(rows.entry(session.user_id).or_default())
    }

    fn insert_row<T>(
        items: &mut Vec<T>,
        id: Uuid,
        item: T,
        id_of: impl Fn(&T) -> Uuid,
    ) -> ResultStore<()> {
        if items.iter().any(|existing| id_of(existing) == id) {
            return Err(StoreError::Conflict(format!("duplicate id {id}")));
        }
        items.push(item);
        Ok(())
    }

    fn update_row<T>(
        items: &mut [T],
        id: Uuid,
        item: T,
        id_of: impl Fn(&T) -> Uuid,
    ) -> ResultStore<()> {
        match items.iter_mut().find(|existing| id_of(existing) == id) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete_row<T>(items: &mut Vec<T>, id: Uuid, id_of: impl Fn(&T) -> Uuid) -> ResultStore<()> {
        let before = items.len();
        items.retain(|existing| id_of(existing) != id);
        if items.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    async fn fetch_accounts(&self, session: &Session) -> ResultStore<Vec<Account>> {
        let gate = self
            .inner
            .hold_next_fetch
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.guard()?;
        Ok(self.with_rows(session, |rows| rows.accounts.clone()))
    }

    async fn fetch_categories(&self, session: &Session) -> ResultStore<Vec<Category>> {
        self.guard()?;
        Ok(self.with_rows(session, |rows| rows.categories.clone()))
    }

    async fn fetch_incomes(&self, session: &Session) -> ResultStore<Vec<Transaction>> {
        self.guard()?;
        Ok(self.with_rows(session, |rows| {
            rows.transactions
                .iter()
                .filter(|tx| tx.polarity == Polarity::Income)
                .cloned()
                .collect()
        }))
    }

    async fn fetch_expenses(&self, session: &Session) -> ResultStore<Vec<Transaction>> {
        self.guard()?;
        Ok(self.with_rows(session, |rows| {
            rows.transactions
                .iter()
                .filter(|tx| tx.polarity == Polarity::Expense)
                .cloned()
                .collect()
        }))
    }

    async fn fetch_goals(&self, session: &Session) -> ResultStore<Vec<Goal>> {
        self.guard()?;
        Ok(self.with_rows(session, |rows| rows.goals.clone()))
    }

    async fn fetch_budgets(&self, session: &Session) -> ResultStore<Vec<Budget>> {
        self.guard()?;
        Ok(self.with_rows(session, |rows| rows.budgets.clone()))
    }

    async fn insert_account(&self, session: &Session, account: &Account) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::insert_row(&mut rows.accounts, account.id, account.clone(), |a| a.id)
        })
    }

    async fn update_account(&self, session: &Session, account: &Account) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::update_row(&mut rows.accounts, account.id, account.clone(), |a| a.id)
        })
    }

    async fn delete_account(&self, session: &Session, id: Uuid) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::delete_row(&mut rows.accounts, id, |a| a.id)
        })
    }

    async fn insert_category(&self, session: &Session, category: &Category) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::insert_row(&mut rows.categories, category.id, category.clone(), |c| c.id)
        })
    }

    async fn update_category(&self, session: &Session, category: &Category) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::update_row(&mut rows.categories, category.id, category.clone(), |c| c.id)
        })
    }

    async fn delete_category(&self, session: &Session, id: Uuid) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::delete_row(&mut rows.categories, id, |c| c.id)?;
            // Mirror the remote schema's set-null rule: referencing
            // movements survive with the reference cleared.
            for tx in &mut rows.transactions {
                if tx.category_id == Some(id) {
                    tx.category_id = None;
                }
            }
            Ok(())
        })
    }

    async fn insert_transaction(&self, session: &Session, tx: &Transaction) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::insert_row(&mut rows.transactions, tx.id, tx.clone(), |t| t.id)
        })
    }

    async fn update_transaction(
        &self,
        session: &Session,
        _previous: Polarity,
        tx: &Transaction,
    ) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::update_row(&mut rows.transactions, tx.id, tx.clone(), |t| t.id)
        })
    }

    async fn delete_transaction(
        &self,
        session: &Session,
        _polarity: Polarity,
        id: Uuid,
    ) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::delete_row(&mut rows.transactions, id, |t| t.id)
        })
    }

    async fn insert_goal(&self, session: &Session, goal: &Goal) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::insert_row(&mut rows.goals, goal.id, goal.clone(), |g| g.id)
        })
    }

    async fn update_goal(&self, session: &Session, goal: &Goal) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::update_row(&mut rows.goals, goal.id, goal.clone(), |g| g.id)
        })
    }

    async fn delete_goal(&self, session: &Session, id: Uuid) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| Self::delete_row(&mut rows.goals, id, |g| g.id))
    }

    async fn insert_budget(&self, session: &Session, budget: &Budget) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::insert_row(&mut rows.budgets, budget.id, budget.clone(), |b| b.id)
        })
    }

    async fn update_budget(&self, session: &Session, budget: &Budget) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::update_row(&mut rows.budgets, budget.id, budget.clone(), |b| b.id)
        })
    }

    async fn delete_budget(&self, session: &Session, id: Uuid) -> ResultStore<()> {
        self.guard()?;
        self.with_rows(session, |rows| {
            Self::delete_row(&mut rows.budgets, id, |b| b.id)
        })
    }
}

#[cfg(test)]
mod tests {
    use model::{AccountKind, Money};

    use super::*;

    fn session(user: Uuid) -> Session {
        Session::new(user, "teste@webcash.dev", "token")
    }

    #[tokio::test]
    async fn rows_are_scoped_per_user() {
        let store = MemoryStore::new();
        let alice = session(Uuid::new_v4());
        let bob = session(Uuid::new_v4());

        let account = Account::new("Conta", AccountKind::Bank, Money::ZERO, "#fff");
        store.insert_account(&alice, &account).await.unwrap();

        assert_eq!(store.fetch_accounts(&alice).await.unwrap().len(), 1);
        assert!(store.fetch_accounts(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn transactions_split_into_polarity_fetches() {
        let store = MemoryStore::new();
        let user = session(Uuid::new_v4());
        let account = Uuid::new_v4();

        let income = Transaction::new(Polarity::Income, Money::new(100), "a", account);
        let expense = Transaction::new(Polarity::Expense, Money::new(50), "b", account);
        store.insert_transaction(&user, &income).await.unwrap();
        store.insert_transaction(&user, &expense).await.unwrap();

        assert_eq!(store.fetch_incomes(&user).await.unwrap(), vec![income]);
        assert_eq!(store.fetch_expenses(&user).await.unwrap(), vec![expense]);
    }

    #[tokio::test]
    async fn unknown_ids_are_rejected() {
        let store = MemoryStore::new();
        let user = session(Uuid::new_v4());

        let missing = store.delete_account(&user, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(StoreError::NotFound)));

        let account = Account::new("Conta", AccountKind::Bank, Money::ZERO, "#fff");
        store.insert_account(&user, &account).await.unwrap();
        let duplicate = store.insert_account(&user, &account).await;
        assert!(matches!(duplicate, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn fail_next_fails_exactly_once() {
        let store = MemoryStore::new();
        let user = session(Uuid::new_v4());
        store.fail_next("connection reset");

        let failed = store.fetch_goals(&user).await;
        assert!(matches!(failed, Err(StoreError::Server(_))));
        assert!(store.fetch_goals(&user).await.unwrap().is_empty());
    }
}
