//! The module contains the `Category` type.

use uuid::Uuid;

use crate::transaction::Polarity;

/// A transaction category, tied to exactly one polarity: a category is
/// either an income category or an expense category, never both.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub polarity: Polarity,
    pub icon: String,
    pub color: String,
    pub active: bool,
}

impl Category {
    pub fn new(
        name: impl Into<String>,
        polarity: Polarity,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            polarity,
            icon: icon.into(),
            color: color.into(),
            active: true,
        }
    }
}
