//! sea-orm implementation of the ledger store.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Budget, Category, EngineError, ResultEngine, Transaction, TransactionKind, Wallet, budgets,
    store::LedgerStore, transactions, wallets, wallets::WalletAggregates,
};

/// Production [`LedgerStore`] backed by a sea-orm [`DatabaseConnection`].
#[derive(Clone, Debug)]
pub struct DbStore {
    database: DatabaseConnection,
}

impl DbStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

/// Timestamp bounds covering an inclusive date window.
///
/// The upper bound is exclusive (start of the day after `end`) so the whole
/// final day is inside the window.
fn window_bounds(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let opening = start.and_time(NaiveTime::MIN).and_utc();
    let closing = match end.succ_opt() {
        Some(next_day) => next_day.and_time(NaiveTime::MIN).and_utc(),
        None => DateTime::<Utc>::MAX_UTC,
    };
    (opening, closing)
}

impl LedgerStore for DbStore {
    async fn wallet(&self, id: Uuid) -> ResultEngine<Option<Wallet>> {
        wallets::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .map(Wallet::try_from)
            .transpose()
    }

    async fn wallets_for_user(&self, uid: &str) -> ResultEngine<Vec<Wallet>> {
        wallets::Entity::find()
            .filter(wallets::Column::Uid.eq(uid))
            .order_by_asc(wallets::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Wallet::try_from)
            .collect()
    }

    async fn insert_wallet(&self, wallet: &Wallet) -> ResultEngine<()> {
        wallets::ActiveModel::from(wallet)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn update_wallet_profile(
        &self,
        id: Uuid,
        name: &str,
        icon_ref: Option<&str>,
    ) -> ResultEngine<()> {
        let result = wallets::Entity::update_many()
            .col_expr(wallets::Column::Name, Expr::value(name))
            .col_expr(
                wallets::Column::IconRef,
                Expr::value(icon_ref.map(ToString::to_string)),
            )
            .filter(wallets::Column::Id.eq(id.to_string()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::WalletNotFound);
        }
        Ok(())
    }

    async fn update_wallet_aggregates(
        &self,
        id: Uuid,
        expected: WalletAggregates,
        updated: WalletAggregates,
    ) -> ResultEngine<bool> {
        // Single UPDATE moving all three aggregates together, guarded by the
        // values the caller read. Zero affected rows means a concurrent
        // writer invalidated that read.
        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::BalanceMinor,
                Expr::value(updated.balance_minor),
            )
            .col_expr(
                wallets::Column::TotalIncomeMinor,
                Expr::value(updated.total_income_minor),
            )
            .col_expr(
                wallets::Column::TotalExpensesMinor,
                Expr::value(updated.total_expenses_minor),
            )
            .filter(wallets::Column::Id.eq(id.to_string()))
            .filter(wallets::Column::BalanceMinor.eq(expected.balance_minor))
            .filter(wallets::Column::TotalIncomeMinor.eq(expected.total_income_minor))
            .filter(wallets::Column::TotalExpensesMinor.eq(expected.total_expenses_minor))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn delete_wallet(&self, id: Uuid) -> ResultEngine<()> {
        let result = wallets::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::WalletNotFound);
        }
        Ok(())
    }

    async fn find_budgets(
        &self,
        uid: &str,
        category: Category,
        on: NaiveDate,
    ) -> ResultEngine<Vec<Budget>> {
        budgets::Entity::find()
            .filter(budgets::Column::Uid.eq(uid))
            .filter(budgets::Column::Category.eq(category.as_str()))
            .filter(budgets::Column::WindowStart.lte(on))
            .filter(budgets::Column::WindowEnd.gte(on))
            .all(&self.database)
            .await?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }

    async fn budgets_for_user(&self, uid: &str) -> ResultEngine<Vec<Budget>> {
        budgets::Entity::find()
            .filter(budgets::Column::Uid.eq(uid))
            .order_by_asc(budgets::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }

    async fn insert_budget(&self, budget: &Budget) -> ResultEngine<()> {
        budgets::ActiveModel::from(budget)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn update_budget_spent(&self, id: Uuid, spent_minor: i64) -> ResultEngine<()> {
        let result = budgets::Entity::update_many()
            .col_expr(budgets::Column::SpentMinor, Expr::value(spent_minor))
            .filter(budgets::Column::Id.eq(id.to_string()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }
        Ok(())
    }

    async fn delete_budget(&self, id: Uuid) -> ResultEngine<()> {
        let result = budgets::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }
        Ok(())
    }

    async fn insert_transaction(&self, transaction: &Transaction) -> ResultEngine<()> {
        transactions::ActiveModel::from(transaction)
            .insert(&self.database)
            .await?;
        Ok(())
    }

    async fn transaction(&self, id: Uuid) -> ResultEngine<Option<Transaction>> {
        transactions::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .map(Transaction::try_from)
            .transpose()
    }

    async fn mark_transaction_voided(
        &self,
        id: Uuid,
        voided_at: DateTime<Utc>,
        voided_by: &str,
    ) -> ResultEngine<()> {
        let result = transactions::Entity::update_many()
            .col_expr(transactions::Column::VoidedAt, Expr::value(voided_at))
            .col_expr(
                transactions::Column::VoidedBy,
                Expr::value(voided_by.to_string()),
            )
            .filter(transactions::Column::Id.eq(id.to_string()))
            .filter(transactions::Column::VoidedAt.is_null())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(
                "transaction not exists".to_string(),
            ));
        }
        Ok(())
    }

    async fn transactions_for_wallet(
        &self,
        wallet_id: Uuid,
        limit: u64,
        include_voided: bool,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::WalletId.eq(wallet_id.to_string()))
            .order_by_desc(transactions::Column::OccurredAt)
            .limit(limit);
        if !include_voided {
            query = query.filter(transactions::Column::VoidedAt.is_null());
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    async fn sum_expenses(
        &self,
        uid: &str,
        category: Category,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<i64> {
        let (opening, closing) = window_bounds(start, end);
        let models = transactions::Entity::find()
            .filter(transactions::Column::Uid.eq(uid))
            .filter(transactions::Column::Category.eq(category.as_str()))
            .filter(transactions::Column::Kind.eq(TransactionKind::Expense.as_str()))
            .filter(transactions::Column::VoidedAt.is_null())
            .filter(transactions::Column::OccurredAt.gte(opening))
            .filter(transactions::Column::OccurredAt.lt(closing))
            .all(&self.database)
            .await?;

        Ok(models.iter().map(|model| model.amount_minor).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_bounds_cover_the_whole_final_day() {
        let (opening, closing) = window_bounds(date(2026, 1, 1), date(2026, 1, 31));

        assert_eq!(opening.to_rfc3339(), "2026-01-01T00:00:00+00:00");
        assert_eq!(closing.to_rfc3339(), "2026-02-01T00:00:00+00:00");

        let inside = date(2026, 1, 31)
            .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap())
            .and_utc();
        assert!(opening <= inside && inside < closing);
    }
}
