//! The finance state container.
//!
//! [`Finance`] owns the in-memory, derived view of one user's financial
//! data and mediates every read and write against the remote store. It
//! reacts to "the session changed" by re-fetching the six tables
//! concurrently, merging the two movement tables into one ledger and
//! folding derived account balances; mutations go to the store first and
//! are applied locally only on confirmed success (optimistic update,
//! no reconciliation pass).
//!
//! Loads are generation-tagged: a fetch that completes after a newer
//! session change is discarded instead of overwriting newer state.
//! Mutations are deliberately not serialized against an in-flight load;
//! last write wins.

pub use book::Book;
pub use commands::{AccountDraft, BudgetDraft, CategoryDraft, GoalDraft, TransactionDraft};
pub use error::FinanceError;
pub use reports::{BudgetProgress, CategoryTotal, MonthlySummary, RangeTotals};

use chrono::{Local, NaiveDate, Utc};
use model::{Account, Budget, Category, Goal, Money, MonthKey, Session, Transaction};
use store::Store;
use tokio::sync::RwLock;
use uuid::Uuid;

mod book;
mod commands;
mod error;
mod reports;

pub type FinanceResult<T> = Result<T, FinanceError>;

#[derive(Debug, Default)]
struct State {
    book: Book,
    session: Option<Session>,
    generation: u64,
    loaded: bool,
    error: Option<String>,
}

/// The finance state container, generic over its injected store.
#[derive(Debug)]
pub struct Finance<S> {
    store: S,
    state: RwLock<State>,
}

impl<S: Store> Finance<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: RwLock::new(State::default()),
        }
    }

    /// Reacts to a session change.
    ///
    /// `None` (signed out) clears all five collections without touching
    /// the store. `Some` re-fetches everything for the new identity;
    /// a load failure keeps the previous collections and is exposed via
    /// [`Finance::load_error`].
    pub async fn set_session(&self, session: Option<Session>) {
        let (session, generation) = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.session = session.clone();
            match session {
                None => {
                    state.book = Book::default();
                    state.loaded = true;
                    state.error = None;
                    return;
                }
                Some(session) => (session, state.generation),
            }
        };
        self.load(session, generation).await;
    }

    /// Re-runs the load for the current session; the retry path after a
    /// failed load. Does nothing when signed out.
    pub async fn reload(&self) {
        let (session, generation) = {
            let mut state = self.state.write().await;
            let Some(session) = state.session.clone() else {
                return;
            };
            state.generation += 1;
            (session, state.generation)
        };
        self.load(session, generation).await;
    }

    async fn load(&self, session: Session, generation: u64) {
        // No lock is held across the fetch window; the generation check
        // below decides whether the result may still be applied.
        let (accounts, categories, incomes, expenses, goals, budgets) = tokio::join!(
            self.store.fetch_accounts(&session),
            self.store.fetch_categories(&session),
            self.store.fetch_incomes(&session),
            self.store.fetch_expenses(&session),
            self.store.fetch_goals(&session),
            self.store.fetch_budgets(&session),
        );
        let merged = (|| {
            let accounts = accounts?;
            let categories = categories?;
            let mut ledger = incomes?;
            ledger.extend(expenses?);
            Ok::<_, store::StoreError>((accounts, categories, ledger, goals?, budgets?))
        })();

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(generation, "discarding stale load result");
            return;
        }
        state.loaded = true;
        match merged {
            Err(err) => {
                tracing::warn!(%err, "finance load failed");
                state.error = Some(err.to_string());
            }
            Ok((accounts, categories, ledger, goals, budgets)) => {
                let mut book = Book {
                    accounts,
                    categories,
                    ledger,
                    goals,
                    budgets,
                };
                book.rebuild_balances();
                tracing::debug!(
                    accounts = book.accounts.len(),
                    entries = book.ledger.len(),
                    "finance data loaded"
                );
                state.book = book;
                state.error = None;
            }
        }
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }

    /// Whether the latest load attempt (or sign-out) has finished.
    pub async fn loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    /// The last load failure, if any. Cleared by the next successful
    /// load.
    pub async fn load_error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// A snapshot of the five collections with derived balances.
    pub async fn book(&self) -> Book {
        self.state.read().await.book.clone()
    }

    async fn require_session(&self) -> FinanceResult<Session> {
        self.state
            .read()
            .await
            .session
            .clone()
            .ok_or(FinanceError::Unauthenticated)
    }

    // ----- transactions ---------------------------------------------------

    pub async fn add_transaction(&self, draft: TransactionDraft) -> FinanceResult<Transaction> {
        let session = self.require_session().await?;
        Self::check_magnitude(draft.amount)?;

        let mut tx = Transaction::new(
            draft.polarity,
            draft.amount,
            draft.description,
            draft.account_id,
        );
        tx.category_id = draft.category_id;
        tx.date = draft.date;
        tx.recurrence = draft.recurrence;

        self.store.insert_transaction(&session, &tx).await?;
        self.state.write().await.book.insert_entry(tx.clone());
        Ok(tx)
    }

    pub async fn update_transaction(&self, updated: Transaction) -> FinanceResult<Transaction> {
        let session = self.require_session().await?;
        Self::check_magnitude(updated.amount)?;
        let previous = self.existing_entry(updated.id).await?;

        let mut updated = updated;
        updated.created_at = previous.created_at;
        updated.updated_at = Utc::now();

        self.store
            .update_transaction(&session, previous.polarity, &updated)
            .await?;
        self.state.write().await.book.replace_entry(updated.clone());
        Ok(updated)
    }

    pub async fn delete_transaction(&self, id: Uuid) -> FinanceResult<()> {
        let session = self.require_session().await?;
        let previous = self.existing_entry(id).await?;

        self.store
            .delete_transaction(&session, previous.polarity, id)
            .await?;
        self.state.write().await.book.remove_entry(id);
        Ok(())
    }

    async fn existing_entry(&self, id: Uuid) -> FinanceResult<Transaction> {
        self.state
            .read()
            .await
            .book
            .entry(id)
            .cloned()
            .ok_or_else(|| FinanceError::KeyNotFound(id.to_string()))
    }

    fn check_magnitude(amount: Money) -> FinanceResult<()> {
        if amount.is_negative() {
            return Err(FinanceError::InvalidAmount(
                "magnitude must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    // ----- accounts -------------------------------------------------------

    pub async fn add_account(&self, draft: AccountDraft) -> FinanceResult<Account> {
        let session = self.require_session().await?;
        let account = Account::new(draft.name, draft.kind, draft.initial_balance, draft.color);

        self.store.insert_account(&session, &account).await?;
        self.state.write().await.book.upsert_account(account.clone());
        Ok(account)
    }

    pub async fn update_account(&self, updated: Account) -> FinanceResult<Account> {
        let session = self.require_session().await?;
        let previous = {
            let state = self.state.read().await;
            state
                .book
                .account(updated.id)
                .cloned()
                .ok_or_else(|| FinanceError::KeyNotFound(updated.id.to_string()))?
        };

        let mut updated = updated;
        updated.created_at = previous.created_at;
        updated.updated_at = Utc::now();

        self.store.update_account(&session, &updated).await?;

        let mut state = self.state.write().await;
        let id = updated.id;
        state.book.upsert_account(updated);
        state
            .book
            .account(id)
            .cloned()
            .ok_or_else(|| FinanceError::KeyNotFound(id.to_string()))
    }

    pub async fn delete_account(&self, id: Uuid) -> FinanceResult<()> {
        let session = self.require_session().await?;
        {
            let state = self.state.read().await;
            if state.book.account(id).is_none() {
                return Err(FinanceError::KeyNotFound(id.to_string()));
            }
        }

        self.store.delete_account(&session, id).await?;
        self.state.write().await.book.remove_account(id);
        Ok(())
    }

    // ----- categories -----------------------------------------------------

    pub async fn add_category(&self, draft: CategoryDraft) -> FinanceResult<Category> {
        let session = self.require_session().await?;
        let category = Category::new(draft.name, draft.polarity, draft.icon, draft.color);

        self.store.insert_category(&session, &category).await?;
        self.state.write().await.book.upsert_category(category.clone());
        Ok(category)
    }

    pub async fn update_category(&self, updated: Category) -> FinanceResult<Category> {
        let session = self.require_session().await?;
        self.ensure_category(updated.id).await?;

        self.store.update_category(&session, &updated).await?;
        self.state.write().await.book.upsert_category(updated.clone());
        Ok(updated)
    }

    /// Deletes a category. Ledger entries that referenced it survive with
    /// their reference cleared, locally and (via the store's set-null
    /// rule) remotely.
    pub async fn delete_category(&self, id: Uuid) -> FinanceResult<()> {
        let session = self.require_session().await?;
        self.ensure_category(id).await?;

        self.store.delete_category(&session, id).await?;
        self.state.write().await.book.remove_category(id);
        Ok(())
    }

    async fn ensure_category(&self, id: Uuid) -> FinanceResult<()> {
        let state = self.state.read().await;
        if state.book.categories.iter().any(|c| c.id == id) {
            return Ok(());
        }
        Err(FinanceError::KeyNotFound(id.to_string()))
    }

    // ----- goals ----------------------------------------------------------

    pub async fn add_goal(&self, draft: GoalDraft) -> FinanceResult<Goal> {
        let session = self.require_session().await?;
        let mut goal = Goal::new(draft.name, draft.target);
        goal.target_date = draft.target_date;
        goal.note = draft.note;

        self.store.insert_goal(&session, &goal).await?;
        self.state.write().await.book.upsert_goal(goal.clone());
        Ok(goal)
    }

    pub async fn update_goal(&self, updated: Goal) -> FinanceResult<Goal> {
        let session = self.require_session().await?;
        let previous = {
            let state = self.state.read().await;
            state
                .book
                .goals
                .iter()
                .find(|g| g.id == updated.id)
                .cloned()
                .ok_or_else(|| FinanceError::KeyNotFound(updated.id.to_string()))?
        };

        let mut updated = updated;
        updated.created_at = previous.created_at;

        self.store.update_goal(&session, &updated).await?;
        self.state.write().await.book.upsert_goal(updated.clone());
        Ok(updated)
    }

    pub async fn delete_goal(&self, id: Uuid) -> FinanceResult<()> {
        let session = self.require_session().await?;
        {
            let state = self.state.read().await;
            if !state.book.goals.iter().any(|g| g.id == id) {
                return Err(FinanceError::KeyNotFound(id.to_string()));
            }
        }

        self.store.delete_goal(&session, id).await?;
        self.state.write().await.book.remove_goal(id);
        Ok(())
    }

    // ----- budgets --------------------------------------------------------

    pub async fn add_budget(&self, draft: BudgetDraft) -> FinanceResult<Budget> {
        let session = self.require_session().await?;
        let mut budget = Budget::new(draft.category_id, draft.amount, draft.period);
        budget.alert_threshold = draft.alert_threshold;

        self.store.insert_budget(&session, &budget).await?;
        self.state.write().await.book.upsert_budget(budget.clone());
        Ok(budget)
    }

    pub async fn update_budget(&self, updated: Budget) -> FinanceResult<Budget> {
        let session = self.require_session().await?;
        {
            let state = self.state.read().await;
            if !state.book.budgets.iter().any(|b| b.id == updated.id) {
                return Err(FinanceError::KeyNotFound(updated.id.to_string()));
            }
        }

        self.store.update_budget(&session, &updated).await?;
        self.state.write().await.book.upsert_budget(updated.clone());
        Ok(updated)
    }

    pub async fn delete_budget(&self, id: Uuid) -> FinanceResult<()> {
        let session = self.require_session().await?;
        {
            let state = self.state.read().await;
            if !state.book.budgets.iter().any(|b| b.id == id) {
                return Err(FinanceError::KeyNotFound(id.to_string()));
            }
        }

        self.store.delete_budget(&session, id).await?;
        self.state.write().await.book.remove_budget(id);
        Ok(())
    }

    // ----- aggregates -----------------------------------------------------

    pub async fn total_balance(&self) -> Money {
        self.state.read().await.book.total_balance()
    }

    /// Income total for `month`, defaulting to the current calendar
    /// month.
    pub async fn monthly_income(&self, month: Option<MonthKey>) -> Money {
        let month = month.unwrap_or_else(Self::current_month);
        self.state.read().await.book.monthly_income(month)
    }

    /// Expense total for `month`, defaulting to the current calendar
    /// month.
    pub async fn monthly_expense(&self, month: Option<MonthKey>) -> Money {
        let month = month.unwrap_or_else(Self::current_month);
        self.state.read().await.book.monthly_expense(month)
    }

    /// Ledger-derived progress of every budget as of `today`.
    pub async fn budget_progress(&self, today: NaiveDate) -> Vec<BudgetProgress> {
        self.state.read().await.book.budget_progress(today)
    }

    fn current_month() -> MonthKey {
        MonthKey::from_date(Local::now().date_naive())
    }
}
