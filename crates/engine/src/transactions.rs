//! Transaction primitives.
//!
//! A `Transaction` is the immutable record of one income or expense event
//! against exactly one wallet. After creation the only thing that ever
//! changes is the void marker; amounts, category, and timestamps are fixed.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub uid: String,
    pub wallet_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    /// Present on expenses, absent on income.
    pub category: Option<Category>,
    pub description: Option<String>,
    /// Reference into the attachment store, when a receipt was kept.
    pub receipt_ref: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub voided_at: Option<DateTime<Utc>>,
    pub voided_by: Option<String>,
}

impl Transaction {
    /// Builds a new record, enforcing the shape rules: a positive amount,
    /// and a category exactly when the kind is `Expense`.
    pub fn new(
        uid: impl Into<String>,
        wallet_id: Uuid,
        kind: TransactionKind,
        amount_minor: i64,
        category: Option<Category>,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let category = match kind {
            TransactionKind::Expense => match category {
                Some(category) => Some(category),
                None => {
                    return Err(EngineError::Validation(
                        "category is required for expenses".to_string(),
                    ));
                }
            },
            // Income carries no category.
            TransactionKind::Income => None,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            uid: uid.into(),
            wallet_id,
            kind,
            amount_minor,
            category,
            description: None,
            receipt_ref: None,
            occurred_at,
            created_at: Utc::now(),
            voided_at: None,
            voided_by: None,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn with_receipt_ref(mut self, receipt_ref: Option<String>) -> Self {
        self.receipt_ref = receipt_ref;
        self
    }

    pub fn is_voided(&self) -> bool {
        self.voided_at.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub uid: String,
    pub wallet_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub receipt_ref: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub voided_at: Option<DateTimeUtc>,
    pub voided_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Wallets,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            uid: ActiveValue::Set(tx.uid.clone()),
            wallet_id: ActiveValue::Set(tx.wallet_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            category: ActiveValue::Set(tx.category.map(|c| c.as_str().to_string())),
            description: ActiveValue::Set(tx.description.clone()),
            receipt_ref: ActiveValue::Set(tx.receipt_ref.clone()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            created_at: ActiveValue::Set(tx.created_at),
            voided_at: ActiveValue::Set(tx.voided_at),
            voided_by: ActiveValue::Set(tx.voided_by.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            uid: model.uid,
            wallet_id: Uuid::parse_str(&model.wallet_id)
                .map_err(|_| EngineError::WalletNotFound)?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            category: model
                .category
                .as_deref()
                .map(Category::try_from)
                .transpose()?,
            description: model.description,
            receipt_ref: model.receipt_ref,
            occurred_at: model.occurred_at,
            created_at: model.created_at,
            voided_at: model.voided_at,
            voided_by: model.voided_by,
        })
    }
}
