//! The `Book` holds one user's five collections and keeps the derived
//! account balances consistent with the ledger.
//!
//! Balances are never authoritative: each account's `balance` is its
//! stored seed plus the signed sum of every ledger entry referencing it.
//! [`Book::rebuild_balances`] re-derives all of them from scratch; the
//! single-entry helpers apply the equivalent delta incrementally so a
//! mutation does not have to re-fold the whole ledger.

use model::{Account, Budget, Category, Goal, Money, Transaction};
use uuid::Uuid;

/// One user's in-memory finance data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Book {
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub ledger: Vec<Transaction>,
    pub goals: Vec<Goal>,
    pub budgets: Vec<Budget>,
}

impl Book {
    /// Re-derives every account balance: seed, then one fold over the
    /// ledger. Entries whose account no longer resolves are skipped, so
    /// a dangling reference is tolerated rather than fatal.
    pub fn rebuild_balances(&mut self) {
        for account in &mut self.accounts {
            account.balance = account.initial_balance;
        }
        for tx in &self.ledger {
            if let Some(account) = self.accounts.iter_mut().find(|a| a.id == tx.account_id) {
                account.balance += tx.signed_amount();
            }
        }
    }

    fn credit(&mut self, account_id: Uuid, delta: Money) {
        if let Some(account) = self.accounts.iter_mut().find(|a| a.id == account_id) {
            account.balance += delta;
        }
    }

    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn entry(&self, id: Uuid) -> Option<&Transaction> {
        self.ledger.iter().find(|t| t.id == id)
    }

    /// Appends a ledger entry and credits its account.
    pub fn insert_entry(&mut self, tx: Transaction) {
        self.credit(tx.account_id, tx.signed_amount());
        self.ledger.push(tx);
    }

    /// Removes a ledger entry and reverses its effect on the balance.
    pub fn remove_entry(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.ledger.iter().position(|t| t.id == id)?;
        let tx = self.ledger.remove(index);
        self.credit(tx.account_id, -tx.signed_amount());
        Some(tx)
    }

    /// Replaces an entry in place: the old value is reversed, the new one
    /// applied. Handles amount, polarity and account changes uniformly.
    pub fn replace_entry(&mut self, updated: Transaction) {
        let Some(index) = self.ledger.iter().position(|t| t.id == updated.id) else {
            return;
        };
        let old = self.ledger[index].clone();
        self.credit(old.account_id, -old.signed_amount());
        self.credit(updated.account_id, updated.signed_amount());
        self.ledger[index] = updated;
    }

    pub fn upsert_account(&mut self, account: Account) {
        match self.accounts.iter_mut().find(|a| a.id == account.id) {
            Some(slot) => *slot = account,
            None => self.accounts.push(account),
        }
        self.rebuild_balances();
    }

    /// Drops an account together with its ledger entries. Other balances
    /// are unaffected.
    pub fn remove_account(&mut self, id: Uuid) {
        self.accounts.retain(|a| a.id != id);
        self.ledger.retain(|t| t.account_id != id);
    }

    pub fn upsert_category(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.id == category.id) {
            Some(slot) => *slot = category,
            None => self.categories.push(category),
        }
    }

    /// Drops a category and clears the reference on every ledger entry
    /// that pointed at it; the entries themselves stay.
    pub fn remove_category(&mut self, id: Uuid) {
        self.categories.retain(|c| c.id != id);
        for tx in &mut self.ledger {
            if tx.category_id == Some(id) {
                tx.category_id = None;
            }
        }
    }

    pub fn upsert_goal(&mut self, goal: Goal) {
        match self.goals.iter_mut().find(|g| g.id == goal.id) {
            Some(slot) => *slot = goal,
            None => self.goals.push(goal),
        }
    }

    pub fn remove_goal(&mut self, id: Uuid) {
        self.goals.retain(|g| g.id != id);
    }

    pub fn upsert_budget(&mut self, budget: Budget) {
        match self.budgets.iter_mut().find(|b| b.id == budget.id) {
            Some(slot) => *slot = budget,
            None => self.budgets.push(budget),
        }
    }

    pub fn remove_budget(&mut self, id: Uuid) {
        self.budgets.retain(|b| b.id != id);
    }
}
