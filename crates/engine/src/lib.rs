//! Ledger consistency engine for a personal-finance tracker.
//!
//! Users record income and expense transactions against named wallets, and
//! optionally cap spending per category with time-bounded budgets. The
//! engine's job is to keep three aggregates correct on every committed
//! transaction (the wallet balance, the wallet lifetime income/expense
//! totals, and the `spent` cache of every budget whose category and window
//! cover it) while rejecting anything that would drive a wallet balance
//! negative.
//!
//! Storage is reached exclusively through the injected [`LedgerStore`];
//! receipt images and wallet icons go through the [`AttachmentStore`]
//! collaborator. See [`Engine`] for the operations.

pub use attachments::{AttachmentKind, AttachmentSource, AttachmentStore, LocalAttachmentStore};
pub use budgets::{Budget, BudgetOutcome, BudgetWarning};
pub use categories::Category;
pub use commands::{CreateBudgetCmd, CreateTransactionCmd, UpsertWalletCmd};
pub use error::EngineError;
pub use money::Money;
pub use ops::{CreatedTransaction, Engine, EngineBuilder};
pub use store::{DbStore, LedgerStore};
pub use transactions::{Transaction, TransactionKind};
pub use wallets::{Wallet, WalletAggregates};

mod attachments;
mod budgets;
mod categories;
mod commands;
mod error;
mod money;
mod ops;
mod store;
mod transactions;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
