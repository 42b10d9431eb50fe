//! The module contains the `Goal` savings-goal type.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::Money;

/// A savings goal.
///
/// Completion is never stored: a goal is complete exactly when the saved
/// amount has reached the target.
#[derive(Clone, Debug, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub target: Money,
    pub saved: Money,
    pub target_date: Option<NaiveDate>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(name: impl Into<String>, target: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target,
            saved: Money::ZERO,
            target_date: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.saved >= self.target
    }

    /// Fraction saved so far, `None` for a zero target.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.saved.ratio_of(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_is_derived_from_amounts() {
        let mut goal = Goal::new("Viagem", Money::new(100_000));
        assert!(!goal.is_completed());

        goal.saved = Money::new(100_000);
        assert!(goal.is_completed());

        goal.saved = Money::new(120_000);
        assert!(goal.is_completed());
        assert_eq!(goal.progress(), Some(1.2));
    }
}
