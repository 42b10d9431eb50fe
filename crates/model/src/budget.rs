//! The module contains the `Budget` type.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{ModelError, Money};

/// Budgeting window kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetPeriod {
    Monthly,
    Weekly,
}

impl BudgetPeriod {
    /// The code stored in the remote service's `periodo` column.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Monthly => "mensal",
            Self::Weekly => "semanal",
        }
    }
}

impl TryFrom<&str> for BudgetPeriod {
    type Error = ModelError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        match code {
            "mensal" => Ok(Self::Monthly),
            "semanal" => Ok(Self::Weekly),
            other => Err(ModelError::UnknownCode(other.to_string())),
        }
    }
}

/// A spending cap on one expense category.
///
/// `spent_hint` mirrors the remote `gasto` column as-is. Budget progress
/// is derived from the ledger instead (see the finance crate); the stored
/// value is kept only so older rows survive a round trip unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub amount: Money,
    pub period: BudgetPeriod,
    pub spent_hint: Money,
    pub alert_threshold: f64,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(category_id: Uuid, amount: Money, period: BudgetPeriod) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            amount,
            period,
            spent_hint: Money::ZERO,
            alert_threshold: 0.8,
            created_at: Utc::now(),
        }
    }
}
