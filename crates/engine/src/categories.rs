//! The closed set of spending categories.
//!
//! Expense transactions and budgets always carry one of these values;
//! unknown strings are rejected at the boundary instead of flowing through
//! as free-form text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Spending category of an expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Groceries,
    Rent,
    Utilities,
    Transportation,
    Entertainment,
    Dining,
    Health,
    Insurance,
    Savings,
    Clothing,
    Personal,
    Others,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Self::Groceries,
        Self::Rent,
        Self::Utilities,
        Self::Transportation,
        Self::Entertainment,
        Self::Dining,
        Self::Health,
        Self::Insurance,
        Self::Savings,
        Self::Clothing,
        Self::Personal,
        Self::Others,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Groceries => "groceries",
            Self::Rent => "rent",
            Self::Utilities => "utilities",
            Self::Transportation => "transportation",
            Self::Entertainment => "entertainment",
            Self::Dining => "dining",
            Self::Health => "health",
            Self::Insurance => "insurance",
            Self::Savings => "savings",
            Self::Clothing => "clothing",
            Self::Personal => "personal",
            Self::Others => "others",
        }
    }

    /// Human-readable label, used in budget warnings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Groceries => "Groceries",
            Self::Rent => "Rent",
            Self::Utilities => "Utilities",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Dining => "Dining",
            Self::Health => "Health",
            Self::Insurance => "Insurance",
            Self::Savings => "Savings",
            Self::Clothing => "Clothing",
            Self::Personal => "Personal",
            Self::Others => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    /// Parses a category value, tolerating surrounding whitespace and case.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "groceries" => Ok(Self::Groceries),
            "rent" => Ok(Self::Rent),
            "utilities" => Ok(Self::Utilities),
            "transportation" => Ok(Self::Transportation),
            "entertainment" => Ok(Self::Entertainment),
            "dining" => Ok(Self::Dining),
            "health" => Ok(Self::Health),
            "insurance" => Ok(Self::Insurance),
            "savings" => Ok(Self::Savings),
            "clothing" => Ok(Self::Clothing),
            "personal" => Ok(Self::Personal),
            "others" => Ok(Self::Others),
            other => Err(EngineError::Validation(format!("unknown category: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_category() {
        for category in Category::ALL {
            assert_eq!(Category::try_from(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn parse_tolerates_case_and_whitespace() {
        assert_eq!(Category::try_from(" Dining ").unwrap(), Category::Dining);
        assert_eq!(Category::try_from("GROCERIES").unwrap(), Category::Groceries);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = Category::try_from("lottery").unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("unknown category: lottery".to_string())
        );
    }
}
