//! Budget operations: spent fan-out and CRUD.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    Budget, BudgetOutcome, Category, CreateBudgetCmd, EngineError, ResultEngine,
    store::LedgerStore,
};

use super::Engine;

impl<S: LedgerStore> Engine<S> {
    /// Fans an expense out to every budget of `uid` for `category` whose
    /// window contains `occurred_on`.
    ///
    /// Zero matching budgets is the neutral outcome. Budget-side storage
    /// failures are logged and skipped, budget by budget: the financial
    /// truth lives in the wallet, so nothing here can fail the caller.
    pub async fn apply_expense_to_budgets(
        &self,
        uid: &str,
        category: Category,
        amount_minor: i64,
        occurred_on: NaiveDate,
    ) -> BudgetOutcome {
        let budgets = match self.store.find_budgets(uid, category, occurred_on).await {
            Ok(budgets) => budgets,
            Err(err) => {
                tracing::warn!(%category, "budget lookup failed: {err}");
                return BudgetOutcome::default();
            }
        };

        let mut outcome = BudgetOutcome::default();
        for mut budget in budgets {
            let warning = budget.record_spend(amount_minor);
            if let Err(err) = self
                .store
                .update_budget_spent(budget.id, budget.spent_minor)
                .await
            {
                let err = EngineError::BudgetUpdate(err.to_string());
                tracing::warn!(budget_id = %budget.id, "{err}");
                continue;
            }
            outcome.updated.push(budget.id);

            if let Some(warning) = warning {
                tracing::debug!(
                    budget_id = %warning.budget_id,
                    percent = warning.percent,
                    "budget threshold crossed"
                );
                let replaces = outcome
                    .warning
                    .as_ref()
                    .is_none_or(|current| warning.percent > current.percent);
                if replaces {
                    outcome.warning = Some(warning);
                }
            }
        }
        outcome
    }

    /// Takes a voided expense back out of the budgets covering it.
    /// Best-effort, mirroring the forward fan-out.
    pub async fn reverse_expense_from_budgets(
        &self,
        uid: &str,
        category: Category,
        amount_minor: i64,
        occurred_on: NaiveDate,
    ) {
        self.unwind_budget_spend(uid, category, amount_minor, occurred_on, None)
            .await;
    }

    /// Decrements `spent` on covering budgets, optionally restricted to the
    /// budgets a forward fan-out actually updated.
    pub(super) async fn unwind_budget_spend(
        &self,
        uid: &str,
        category: Category,
        amount_minor: i64,
        occurred_on: NaiveDate,
        restrict_to: Option<&[Uuid]>,
    ) {
        let budgets = match self.store.find_budgets(uid, category, occurred_on).await {
            Ok(budgets) => budgets,
            Err(err) => {
                tracing::warn!(%category, "budget lookup failed during unwind: {err}");
                return;
            }
        };

        for mut budget in budgets {
            if let Some(ids) = restrict_to
                && !ids.contains(&budget.id)
            {
                continue;
            }
            budget.unrecord_spend(amount_minor);
            if let Err(err) = self
                .store
                .update_budget_spent(budget.id, budget.spent_minor)
                .await
            {
                let err = EngineError::BudgetUpdate(err.to_string());
                tracing::warn!(budget_id = %budget.id, "{err}");
            }
        }
    }

    /// Creates a budget.
    ///
    /// `spent` starts from a catch-up scan over the non-voided expenses
    /// already inside the window, not from zero.
    pub async fn create_budget(&self, cmd: CreateBudgetCmd) -> ResultEngine<Budget> {
        let mut budget = Budget::new(
            cmd.uid,
            cmd.category,
            cmd.limit.minor_units(),
            cmd.window_start,
            cmd.window_end,
        )?;
        budget.spent_minor = self
            .store
            .sum_expenses(
                &budget.uid,
                budget.category,
                budget.window_start,
                budget.window_end,
            )
            .await?;
        self.store.insert_budget(&budget).await?;
        tracing::debug!(
            budget_id = %budget.id,
            spent_minor = budget.spent_minor,
            "created budget"
        );
        Ok(budget)
    }

    /// All budgets of one user, oldest first.
    pub async fn budgets(&self, uid: &str) -> ResultEngine<Vec<Budget>> {
        self.store.budgets_for_user(uid).await
    }

    /// Deletes a budget owned by `uid`.
    pub async fn delete_budget(&self, uid: &str, budget_id: Uuid) -> ResultEngine<()> {
        let owned = self
            .store
            .budgets_for_user(uid)
            .await?
            .iter()
            .any(|budget| budget.id == budget_id);
        if !owned {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }
        self.store.delete_budget(budget_id).await
    }
}
