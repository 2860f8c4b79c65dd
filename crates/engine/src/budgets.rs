//! The module contains the representation of a category budget.
//!
//! A budget caps spending for one category over a fixed, inclusive date
//! window. Its `spent` field is a cache of the matching expense amounts,
//! maintained incrementally as transactions commit and void; it is never
//! recomputed on read. Budgets can run over their limit: crossing 100% is
//! reported, not blocked.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, EngineError, ResultEngine};

/// Fraction of the limit at which [`Budget::record_spend`] starts warning.
const WARN_NUMERATOR: i64 = 9;
const WARN_DENOMINATOR: i64 = 10;

/// A spending cap for one category over a date window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub uid: String,
    pub category: Category,
    pub limit_minor: i64,
    pub spent_minor: i64,
    /// First day of the window (inclusive).
    pub window_start: NaiveDate,
    /// Last day of the window (inclusive).
    pub window_end: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Threshold warning produced when a budget's spent reaches 90% of its
/// limit. Presentation is the caller's concern; the engine only carries the
/// structured value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetWarning {
    pub budget_id: Uuid,
    pub category_label: String,
    /// Spent as a rounded percentage of the limit.
    pub percent: u32,
}

/// What fanning an expense out to the covering budgets did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BudgetOutcome {
    /// Budgets whose `spent` was incremented. Empty when no budget covers
    /// the expense, which is the neutral, non-error case.
    pub updated: Vec<Uuid>,
    /// Highest-percentage threshold warning raised along the way.
    pub warning: Option<BudgetWarning>,
}

impl Budget {
    /// Creates a budget with a zeroed spent cache.
    pub fn new(
        uid: impl Into<String>,
        category: Category,
        limit_minor: i64,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> ResultEngine<Self> {
        if limit_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "limit_minor must be > 0".to_string(),
            ));
        }
        if window_start > window_end {
            return Err(EngineError::Validation(
                "window_start must not be after window_end".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            uid: uid.into(),
            category,
            limit_minor,
            spent_minor: 0,
            window_start,
            window_end,
            created_at: Utc::now(),
        })
    }

    /// Whether `on` falls inside the inclusive window.
    pub fn covers(&self, on: NaiveDate) -> bool {
        self.window_start <= on && on <= self.window_end
    }

    /// Adds an expense to the spent cache.
    ///
    /// Returns a warning once the cache reaches 90% of the limit. Going over
    /// the limit does not block; the budget is advisory.
    pub fn record_spend(&mut self, amount_minor: i64) -> Option<BudgetWarning> {
        self.spent_minor += amount_minor;
        self.threshold_warning()
    }

    /// Takes a previously recorded expense back out, clamping at zero.
    pub fn unrecord_spend(&mut self, amount_minor: i64) {
        self.spent_minor = (self.spent_minor - amount_minor).max(0);
    }

    /// Spent as a rounded percentage of the limit.
    pub fn percent_spent(&self) -> u32 {
        if self.limit_minor <= 0 || self.spent_minor <= 0 {
            return 0;
        }
        ((self.spent_minor * 100 + self.limit_minor / 2) / self.limit_minor) as u32
    }

    fn threshold_warning(&self) -> Option<BudgetWarning> {
        if self.spent_minor * WARN_DENOMINATOR >= self.limit_minor * WARN_NUMERATOR {
            Some(BudgetWarning {
                budget_id: self.id,
                category_label: self.category.label().to_string(),
                percent: self.percent_spent(),
            })
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub uid: String,
    pub category: String,
    pub limit_minor: i64,
    pub spent_minor: i64,
    pub window_start: Date,
    pub window_end: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id.to_string()),
            uid: ActiveValue::Set(budget.uid.clone()),
            category: ActiveValue::Set(budget.category.as_str().to_string()),
            limit_minor: ActiveValue::Set(budget.limit_minor),
            spent_minor: ActiveValue::Set(budget.spent_minor),
            window_start: ActiveValue::Set(budget.window_start),
            window_end: ActiveValue::Set(budget.window_end),
            created_at: ActiveValue::Set(budget.created_at),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("budget not exists".to_string()))?,
            uid: model.uid,
            category: Category::try_from(model.category.as_str())?,
            limit_minor: model.limit_minor,
            spent_minor: model.spent_minor,
            window_start: model.window_start,
            window_end: model.window_end,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn budget(limit_minor: i64) -> Budget {
        Budget::new(
            "alice",
            Category::Dining,
            limit_minor,
            date(2026, 1, 1),
            date(2026, 1, 31),
        )
        .unwrap()
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let budget = budget(5000);

        assert!(budget.covers(date(2026, 1, 1)));
        assert!(budget.covers(date(2026, 1, 15)));
        assert!(budget.covers(date(2026, 1, 31)));
        assert!(!budget.covers(date(2025, 12, 31)));
        assert!(!budget.covers(date(2026, 2, 1)));
    }

    #[test]
    fn spend_accumulates_and_warns_on_the_crossing_step() {
        let mut budget = budget(5000);

        assert!(budget.record_spend(1000).is_none());
        assert!(budget.record_spend(2000).is_none());
        assert_eq!(budget.spent_minor, 3000);

        let warning = budget.record_spend(2000).unwrap();
        assert_eq!(budget.spent_minor, 5000);
        assert_eq!(warning.percent, 100);
        assert_eq!(warning.category_label, "Dining");
        assert_eq!(warning.budget_id, budget.id);
    }

    #[test]
    fn warning_fires_at_exactly_ninety_percent() {
        let mut budget = budget(5000);

        let warning = budget.record_spend(4500).unwrap();
        assert_eq!(warning.percent, 90);
    }

    #[test]
    fn spend_below_ninety_percent_stays_quiet() {
        let mut budget = budget(5000);
        assert!(budget.record_spend(4499).is_none());
    }

    #[test]
    fn overspending_is_reported_not_blocked() {
        let mut budget = budget(1000);

        let warning = budget.record_spend(2500).unwrap();
        assert_eq!(budget.spent_minor, 2500);
        assert_eq!(warning.percent, 250);
    }

    #[test]
    fn unrecord_clamps_at_zero() {
        let mut budget = budget(5000);
        budget.record_spend(1000);

        budget.unrecord_spend(400);
        assert_eq!(budget.spent_minor, 600);

        budget.unrecord_spend(5000);
        assert_eq!(budget.spent_minor, 0);
    }

    #[test]
    fn new_validates_limit_and_window() {
        let err = Budget::new("alice", Category::Dining, 0, date(2026, 1, 1), date(2026, 1, 31))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidAmount("limit_minor must be > 0".to_string())
        );

        let err = Budget::new(
            "alice",
            Category::Dining,
            5000,
            date(2026, 2, 1),
            date(2026, 1, 1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("window_start must not be after window_end".to_string())
        );
    }
}
