//! Draft structs for container write operations.
//!
//! These group the caller-supplied fields of a new entity, keeping call
//! sites readable and leaving id and timestamp stamping to the container.

use chrono::NaiveDate;
use model::{AccountKind, Money, Polarity, Recurrence};
use uuid::Uuid;

/// Fields of a new account.
#[derive(Clone, Debug)]
pub struct AccountDraft {
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: Money,
    pub color: String,
}

impl AccountDraft {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: AccountKind,
        initial_balance: Money,
        color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            initial_balance,
            color: color.into(),
        }
    }
}

/// Fields of a new category.
#[derive(Clone, Debug)]
pub struct CategoryDraft {
    pub name: String,
    pub polarity: Polarity,
    pub icon: String,
    pub color: String,
}

impl CategoryDraft {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        polarity: Polarity,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            polarity,
            icon: icon.into(),
            color: color.into(),
        }
    }
}

/// Fields of a new ledger entry.
#[derive(Clone, Debug)]
pub struct TransactionDraft {
    pub polarity: Polarity,
    pub amount: Money,
    pub description: String,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub recurrence: Recurrence,
}

impl TransactionDraft {
    #[must_use]
    pub fn new(
        polarity: Polarity,
        amount: Money,
        description: impl Into<String>,
        account_id: Uuid,
    ) -> Self {
        Self {
            polarity,
            amount,
            description: description.into(),
            account_id,
            category_id: None,
            date: None,
            recurrence: Recurrence::None,
        }
    }

    #[must_use]
    pub fn category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }
}

/// Fields of a new savings goal.
#[derive(Clone, Debug)]
pub struct GoalDraft {
    pub name: String,
    pub target: Money,
    pub target_date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl GoalDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, target: Money) -> Self {
        Self {
            name: name.into(),
            target,
            target_date: None,
            note: None,
        }
    }

    #[must_use]
    pub fn target_date(mut self, date: NaiveDate) -> Self {
        self.target_date = Some(date);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Fields of a new budget.
#[derive(Clone, Debug)]
pub struct BudgetDraft {
    pub category_id: Uuid,
    pub amount: Money,
    pub period: model::BudgetPeriod,
    pub alert_threshold: f64,
}

impl BudgetDraft {
    #[must_use]
    pub fn new(category_id: Uuid, amount: Money, period: model::BudgetPeriod) -> Self {
        Self {
            category_id,
            amount,
            period,
            alert_threshold: 0.8,
        }
    }

    #[must_use]
    pub fn alert_threshold(mut self, threshold: f64) -> Self {
        self.alert_threshold = threshold;
        self
    }
}
