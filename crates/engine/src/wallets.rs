//! The module contains the `Wallet` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, TransactionKind};

/// A wallet.
///
/// A wallet is a named pool of funds belonging to one user: a physical
/// wallet, a bank account, or anything else money is kept in. Besides the
/// running balance it tracks lifetime income and expense totals, and the
/// three always satisfy `balance == total_income - total_expenses` with a
/// non-negative balance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Stable identifier, generated once and persisted so the wallet can be
    /// renamed without breaking references.
    pub id: Uuid,
    pub uid: String,
    pub name: String,
    pub balance_minor: i64,
    pub total_income_minor: i64,
    pub total_expenses_minor: i64,
    pub icon_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The three denormalized wallet aggregates, moved together or not at all.
///
/// Doubles as the optimistic-concurrency token: aggregate updates are
/// conditioned on the values read beforehand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalletAggregates {
    pub balance_minor: i64,
    pub total_income_minor: i64,
    pub total_expenses_minor: i64,
}

impl Wallet {
    /// Creates a wallet with zeroed balance and totals.
    pub fn new(uid: impl Into<String>, name: impl Into<String>, icon_ref: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            uid: uid.into(),
            name: name.into(),
            balance_minor: 0,
            total_income_minor: 0,
            total_expenses_minor: 0,
            icon_ref,
            created_at: Utc::now(),
        }
    }

    pub fn aggregates(&self) -> WalletAggregates {
        WalletAggregates {
            balance_minor: self.balance_minor,
            total_income_minor: self.total_income_minor,
            total_expenses_minor: self.total_expenses_minor,
        }
    }

    /// Returns a copy with the effect of one transaction applied.
    ///
    /// An expense that would drive the balance below zero is rejected with
    /// [`EngineError::InsufficientFunds`]; `self` is never touched.
    pub fn with_effect(&self, kind: TransactionKind, amount_minor: i64) -> ResultEngine<Wallet> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }

        let mut updated = self.clone();
        match kind {
            TransactionKind::Income => {
                updated.balance_minor += amount_minor;
                updated.total_income_minor += amount_minor;
            }
            TransactionKind::Expense => {
                let new_balance = self.balance_minor - amount_minor;
                if new_balance < 0 {
                    return Err(EngineError::InsufficientFunds(self.name.clone()));
                }
                updated.balance_minor = new_balance;
                updated.total_expenses_minor += amount_minor;
            }
        }
        Ok(updated)
    }

    /// Returns a copy with the effect of one transaction undone.
    ///
    /// Reversing an income hits the same floor as spending: the balance must
    /// stay non-negative. Reversing more than the recorded totals is a
    /// caller bug and rejected.
    pub fn with_effect_reversed(
        &self,
        kind: TransactionKind,
        amount_minor: i64,
    ) -> ResultEngine<Wallet> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }

        let mut updated = self.clone();
        match kind {
            TransactionKind::Income => {
                let new_balance = self.balance_minor - amount_minor;
                if new_balance < 0 {
                    return Err(EngineError::InsufficientFunds(self.name.clone()));
                }
                if self.total_income_minor < amount_minor {
                    return Err(EngineError::InvalidAmount(
                        "reversal exceeds recorded income".to_string(),
                    ));
                }
                updated.balance_minor = new_balance;
                updated.total_income_minor -= amount_minor;
            }
            TransactionKind::Expense => {
                if self.total_expenses_minor < amount_minor {
                    return Err(EngineError::InvalidAmount(
                        "reversal exceeds recorded expenses".to_string(),
                    ));
                }
                updated.balance_minor += amount_minor;
                updated.total_expenses_minor -= amount_minor;
            }
        }
        Ok(updated)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub uid: String,
    pub name: String,
    pub balance_minor: i64,
    pub total_income_minor: i64,
    pub total_expenses_minor: i64,
    pub icon_ref: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(wallet: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(wallet.id.to_string()),
            uid: ActiveValue::Set(wallet.uid.clone()),
            name: ActiveValue::Set(wallet.name.clone()),
            balance_minor: ActiveValue::Set(wallet.balance_minor),
            total_income_minor: ActiveValue::Set(wallet.total_income_minor),
            total_expenses_minor: ActiveValue::Set(wallet.total_expenses_minor),
            icon_ref: ActiveValue::Set(wallet.icon_ref.clone()),
            created_at: ActiveValue::Set(wallet.created_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id).map_err(|_| EngineError::WalletNotFound)?,
            uid: model.uid,
            name: model.name,
            balance_minor: model.balance_minor,
            total_income_minor: model.total_income_minor,
            total_expenses_minor: model.total_expenses_minor,
            icon_ref: model.icon_ref,
            created_at: model.created_at,
        })
    }
}
