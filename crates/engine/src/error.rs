//! The module contains the errors the engine can throw.
//!
//! Every operation returns these explicitly instead of panicking; callers
//! are expected to branch on the variant. [`BudgetUpdate`] is special: the
//! transaction flow only ever logs it, because a stale budget cache must not
//! fail the transaction that produced it.
//!
//! [`BudgetUpdate`]: EngineError::BudgetUpdate
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The request shape was invalid; nothing was written.
    #[error("invalid input: {0}")]
    Validation(String),
    /// A monetary amount was empty, zero, negative, or out of range.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The referenced wallet does not exist for the requesting user.
    #[error("wallet not found")]
    WalletNotFound,
    /// An expense would drive the wallet balance below zero.
    #[error("insufficient funds in wallet \"{0}\"")]
    InsufficientFunds(String),
    /// A budget or transaction lookup came up empty.
    #[error("\"{0}\" not found")]
    KeyNotFound(String),
    /// The attachment collaborator failed to store a receipt or icon.
    #[error("attachment upload failed: {0}")]
    AttachmentUpload(String),
    /// A budget-side write failed. Logged and carried on; never fatal to the
    /// containing transaction.
    #[error("budget update failed: {0}")]
    BudgetUpdate(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::WalletNotFound, Self::WalletNotFound) => true,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::AttachmentUpload(a), Self::AttachmentUpload(b)) => a == b,
            (Self::BudgetUpdate(a), Self::BudgetUpdate(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
