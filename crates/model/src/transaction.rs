//! The module contains the `Transaction` ledger entry type.
//!
//! The remote service stores income and expense movements in two separate
//! tables; once mapped they are merged into one logical ledger of
//! `Transaction` values, distinguished by [`Polarity`].

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{ModelError, Money};

/// Whether a ledger entry increases or decreases its account's balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    Income,
    Expense,
}

impl Polarity {
    /// The code used by the remote service's `tipo` columns.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Income => "receita",
            Self::Expense => "despesa",
        }
    }
}

impl TryFrom<&str> for Polarity {
    type Error = ModelError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        match code {
            "receita" => Ok(Self::Income),
            "despesa" => Ok(Self::Expense),
            other => Err(ModelError::UnknownCode(other.to_string())),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Income => "income",
            Self::Expense => "expense",
        })
    }
}

/// Advisory recurrence tag. Nothing re-generates recurring entries; the
/// tag only informs the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Recurrence {
    #[default]
    None,
    Weekly,
    Monthly,
}

impl Recurrence {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::None => "nenhuma",
            Self::Weekly => "semanal",
            Self::Monthly => "mensal",
        }
    }
}

impl TryFrom<&str> for Recurrence {
    type Error = ModelError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        match code {
            "nenhuma" => Ok(Self::None),
            "semanal" => Ok(Self::Weekly),
            "mensal" => Ok(Self::Monthly),
            other => Err(ModelError::UnknownCode(other.to_string())),
        }
    }
}

/// One ledger entry.
///
/// `amount` is a non-negative magnitude; [`Polarity`] supplies the sign.
/// `date` is a calendar day with no time-of-day. A stored date the mapping
/// layer could not parse becomes `None`: the entry still counts toward
/// balances but drops out of date-scoped aggregates.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub polarity: Polarity,
    pub amount: Money,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub account_id: Uuid,
    pub date: Option<NaiveDate>,
    pub recurrence: Recurrence,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        polarity: Polarity,
        amount: Money,
        description: impl Into<String>,
        account_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            polarity,
            amount,
            description: description.into(),
            category_id: None,
            account_id,
            date: None,
            recurrence: Recurrence::None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The entry's effect on its account: `+amount` for income, `-amount`
    /// for expense.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        match self.polarity {
            Polarity::Income => self.amount,
            Polarity::Expense => -self.amount,
        }
    }
}
