//! The module contains the `Account` type and its kind codes.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{ModelError, Money};

/// Where an account's money lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountKind {
    Bank,
    Wallet,
    Cash,
    CreditCard,
}

impl AccountKind {
    /// The code stored in the remote service's `tipo` column.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Bank => "banco",
            Self::Wallet => "carteira",
            Self::Cash => "dinheiro",
            Self::CreditCard => "cartao_credito",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = ModelError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        match code {
            "banco" => Ok(Self::Bank),
            "carteira" => Ok(Self::Wallet),
            "dinheiro" => Ok(Self::Cash),
            "cartao_credito" => Ok(Self::CreditCard),
            other => Err(ModelError::UnknownCode(other.to_string())),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bank => "bank",
            Self::Wallet => "wallet",
            Self::Cash => "cash",
            Self::CreditCard => "credit card",
        };
        f.write_str(label)
    }
}

/// An account: a bank account, a physical wallet, loose cash or a credit
/// card.
///
/// `initial_balance` is the stored seed. `balance` is derived: seed plus
/// the signed sum of every ledger entry referencing this account. The
/// store never holds the derived value; the finance container rebuilds it
/// whenever the ledger or the account list changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: Money,
    pub balance: Money,
    pub color: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        name: impl Into<String>,
        kind: AccountKind,
        initial_balance: Money,
        color: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            initial_balance,
            balance: initial_balance,
            color: color.into(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
