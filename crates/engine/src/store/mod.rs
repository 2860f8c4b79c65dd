//! Read/write access to persisted wallets, budgets, and transactions.
//!
//! The engine never reaches into an ambient database handle: every operation
//! goes through a [`LedgerStore`] injected at construction. Each trait
//! method is one atomic storage call; there is deliberately **no**
//! transaction spanning several calls, so recovery across wallet, budget,
//! and transaction writes belongs to the calling flow, not the store.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    Budget, Category, ResultEngine, Transaction, Wallet, wallets::WalletAggregates,
};

mod db;

pub use db::DbStore;

/// Storage interface the engine operates through.
#[allow(async_fn_in_trait)]
pub trait LedgerStore {
    /// Looks a wallet up by id. Ownership checks are the caller's job.
    async fn wallet(&self, id: Uuid) -> ResultEngine<Option<Wallet>>;

    /// All wallets of one user, oldest first.
    async fn wallets_for_user(&self, uid: &str) -> ResultEngine<Vec<Wallet>>;

    async fn insert_wallet(&self, wallet: &Wallet) -> ResultEngine<()>;

    /// Renames/re-icons a wallet. Balances are out of reach on purpose.
    async fn update_wallet_profile(
        &self,
        id: Uuid,
        name: &str,
        icon_ref: Option<&str>,
    ) -> ResultEngine<()>;

    /// Writes all three wallet aggregates in one update, conditioned on the
    /// values read beforehand. Returns `false` when another writer got there
    /// first and nothing was written; the caller retries from a fresh read.
    async fn update_wallet_aggregates(
        &self,
        id: Uuid,
        expected: WalletAggregates,
        updated: WalletAggregates,
    ) -> ResultEngine<bool>;

    /// Deletes a wallet. The schema cascades to its transactions.
    async fn delete_wallet(&self, id: Uuid) -> ResultEngine<()>;

    /// Budgets of `uid` for `category` whose window contains `on`.
    async fn find_budgets(
        &self,
        uid: &str,
        category: Category,
        on: NaiveDate,
    ) -> ResultEngine<Vec<Budget>>;

    /// All budgets of one user, oldest first.
    async fn budgets_for_user(&self, uid: &str) -> ResultEngine<Vec<Budget>>;

    async fn insert_budget(&self, budget: &Budget) -> ResultEngine<()>;

    async fn update_budget_spent(&self, id: Uuid, spent_minor: i64) -> ResultEngine<()>;

    async fn delete_budget(&self, id: Uuid) -> ResultEngine<()>;

    async fn insert_transaction(&self, transaction: &Transaction) -> ResultEngine<()>;

    async fn transaction(&self, id: Uuid) -> ResultEngine<Option<Transaction>>;

    /// Stamps the void marker onto a not-yet-voided transaction.
    async fn mark_transaction_voided(
        &self,
        id: Uuid,
        voided_at: DateTime<Utc>,
        voided_by: &str,
    ) -> ResultEngine<()>;

    /// Recent transactions against one wallet, newest first.
    async fn transactions_for_wallet(
        &self,
        wallet_id: Uuid,
        limit: u64,
        include_voided: bool,
    ) -> ResultEngine<Vec<Transaction>>;

    /// Sum of non-voided expense amounts inside an inclusive date window,
    /// used for the catch-up scan when a budget is created.
    async fn sum_expenses(
        &self,
        uid: &str,
        category: Category,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<i64>;
}
