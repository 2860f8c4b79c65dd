//! Command structs for engine operations.
//!
//! These types group parameters for the write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{AttachmentSource, Category, Money, TransactionKind};

/// Record a new transaction against a wallet.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub uid: String,
    pub wallet_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Money,
    /// Required when `kind` is `Expense`; ignored for income.
    pub category: Option<Category>,
    pub description: Option<String>,
    /// Receipt image to keep alongside the record.
    pub attachment: Option<AttachmentSource>,
    pub occurred_at: DateTime<Utc>,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        uid: impl Into<String>,
        wallet_id: Uuid,
        kind: TransactionKind,
        amount: Money,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            uid: uid.into(),
            wallet_id,
            kind,
            amount,
            category: None,
            description: None,
            attachment: None,
            occurred_at,
        }
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn attachment(mut self, attachment: AttachmentSource) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Create a wallet, or rename/re-icon an existing one.
///
/// Only the profile side is reachable from here; balances and totals are
/// initialized to zero on creation and moved exclusively by transactions.
#[derive(Clone, Debug)]
pub struct UpsertWalletCmd {
    /// `None` creates; `Some` updates name and icon of an existing wallet.
    pub id: Option<Uuid>,
    pub uid: String,
    pub name: String,
    pub icon: Option<AttachmentSource>,
}

impl UpsertWalletCmd {
    #[must_use]
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            uid: uid.into(),
            name: name.into(),
            icon: None,
        }
    }

    #[must_use]
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: AttachmentSource) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Create a budget for one category over an inclusive date window.
#[derive(Clone, Debug)]
pub struct CreateBudgetCmd {
    pub uid: String,
    pub category: Category,
    pub limit: Money,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
}

impl CreateBudgetCmd {
    #[must_use]
    pub fn new(
        uid: impl Into<String>,
        category: Category,
        limit: Money,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Self {
        Self {
            uid: uid.into(),
            category,
            limit,
            window_start,
            window_end,
        }
    }
}
