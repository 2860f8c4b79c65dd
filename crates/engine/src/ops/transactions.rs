//! Transaction flows: create, void, list.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    AttachmentKind, BudgetOutcome, BudgetWarning, Category, CreateTransactionCmd, EngineError,
    ResultEngine, Transaction, TransactionKind, store::LedgerStore,
};

use super::{Engine, normalize_optional_text};

/// A committed transaction plus the budget warning raised along the way.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatedTransaction {
    pub transaction: Transaction,
    pub budget_warning: Option<BudgetWarning>,
}

impl<S: LedgerStore> Engine<S> {
    /// Records one transaction.
    ///
    /// The flow runs strictly in sequence: validate the request, apply the
    /// wallet effect, fan the expense out to covering budgets, store the
    /// receipt, persist the record. Validation and wallet-level failures
    /// abort before anything is written. Once the wallet effect has
    /// committed, a later failure reverses the budget increments and the
    /// wallet effect before it surfaces, so a failed flow never leaves a
    /// debit without a record.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<CreatedTransaction> {
        // Validate the request shape before any write.
        let amount_minor = cmd.amount.minor_units();
        if amount_minor <= 0 {
            return Err(EngineError::Validation("amount must be positive".to_string()));
        }
        let category = match cmd.kind {
            TransactionKind::Expense => match cmd.category {
                Some(category) => Some(category),
                None => {
                    return Err(EngineError::Validation(
                        "category is required for expenses".to_string(),
                    ));
                }
            },
            TransactionKind::Income => None,
        };
        let description = normalize_optional_text(cmd.description.as_deref());
        self.require_wallet(&cmd.uid, cmd.wallet_id).await?;

        // The one step whose failure has nothing to roll back.
        self.apply_transaction_effect(cmd.wallet_id, cmd.kind, amount_minor)
            .await?;

        let occurred_on = cmd.occurred_at.date_naive();
        let budget_outcome = match category {
            Some(category) => {
                self.apply_expense_to_budgets(&cmd.uid, category, amount_minor, occurred_on)
                    .await
            }
            None => BudgetOutcome::default(),
        };

        let receipt_ref = match &cmd.attachment {
            Some(source) => match self.store_attachment(source, AttachmentKind::Receipt) {
                Ok(reference) => Some(reference),
                Err(err) => {
                    self.roll_back_transaction_effects(&cmd, category, &budget_outcome)
                        .await;
                    return Err(err);
                }
            },
            None => None,
        };

        let transaction = Transaction::new(
            cmd.uid.clone(),
            cmd.wallet_id,
            cmd.kind,
            amount_minor,
            category,
            cmd.occurred_at,
        )?
        .with_description(description)
        .with_receipt_ref(receipt_ref);

        if let Err(err) = self.store.insert_transaction(&transaction).await {
            self.roll_back_transaction_effects(&cmd, category, &budget_outcome)
                .await;
            return Err(err);
        }

        tracing::debug!(
            transaction_id = %transaction.id,
            kind = ?transaction.kind,
            "transaction committed"
        );
        Ok(CreatedTransaction {
            transaction,
            budget_warning: budget_outcome.warning,
        })
    }

    /// Compensates a flow that failed after the wallet effect committed.
    async fn roll_back_transaction_effects(
        &self,
        cmd: &CreateTransactionCmd,
        category: Option<Category>,
        budget_outcome: &BudgetOutcome,
    ) {
        if let Some(category) = category
            && !budget_outcome.updated.is_empty()
        {
            self.unwind_budget_spend(
                &cmd.uid,
                category,
                cmd.amount.minor_units(),
                cmd.occurred_at.date_naive(),
                Some(&budget_outcome.updated),
            )
            .await;
        }
        if let Err(err) = self
            .reverse_transaction_effect(cmd.wallet_id, cmd.kind, cmd.amount.minor_units())
            .await
        {
            tracing::warn!(
                wallet_id = %cmd.wallet_id,
                "failed to reverse wallet effect while rolling back: {err}"
            );
        }
    }

    /// Voids a committed transaction.
    ///
    /// Restores the wallet aggregates, stamps the void marker, and takes the
    /// amount back out of covering budgets. Voided rows disappear from
    /// listings and catch-up scans.
    pub async fn void_transaction(&self, uid: &str, transaction_id: Uuid) -> ResultEngine<()> {
        let transaction = self
            .store
            .transaction(transaction_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        if transaction.uid != uid {
            return Err(EngineError::KeyNotFound("transaction not exists".to_string()));
        }
        if transaction.is_voided() {
            return Err(EngineError::Validation(
                "transaction already voided".to_string(),
            ));
        }

        // Reverse the wallet side first: if the balance floor rejects the
        // reversal (voiding an income that was already spent), nothing else
        // may move.
        self.reverse_transaction_effect(
            transaction.wallet_id,
            transaction.kind,
            transaction.amount_minor,
        )
        .await?;

        if let Err(err) = self
            .store
            .mark_transaction_voided(transaction_id, Utc::now(), uid)
            .await
        {
            // The void did not happen; put the wallet effect back.
            if let Err(apply_err) = self
                .apply_transaction_effect(
                    transaction.wallet_id,
                    transaction.kind,
                    transaction.amount_minor,
                )
                .await
            {
                tracing::warn!(
                    wallet_id = %transaction.wallet_id,
                    "failed to restore wallet effect after void failure: {apply_err}"
                );
            }
            return Err(err);
        }

        if let (TransactionKind::Expense, Some(category)) =
            (transaction.kind, transaction.category)
        {
            self.reverse_expense_from_budgets(
                uid,
                category,
                transaction.amount_minor,
                transaction.occurred_at.date_naive(),
            )
            .await;
        }

        tracing::debug!(%transaction_id, "transaction voided");
        Ok(())
    }

    /// Recent transactions against one wallet, newest first. Voided rows are
    /// excluded unless asked for.
    pub async fn transactions_for_wallet(
        &self,
        uid: &str,
        wallet_id: Uuid,
        limit: u64,
        include_voided: bool,
    ) -> ResultEngine<Vec<Transaction>> {
        self.require_wallet(uid, wallet_id).await?;
        self.store
            .transactions_for_wallet(wallet_id, limit, include_voided)
            .await
    }
}
