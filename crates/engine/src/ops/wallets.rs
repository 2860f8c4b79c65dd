//! Wallet operations: aggregate maintenance and profile CRUD.

use sea_orm::DbErr;
use uuid::Uuid;

use crate::{
    AttachmentKind, EngineError, ResultEngine, TransactionKind, UpsertWalletCmd, Wallet,
    store::LedgerStore,
};

use super::{Engine, normalize_required_name};

/// Attempts before a contended aggregate update gives up.
const AGGREGATE_UPDATE_ATTEMPTS: u32 = 5;

impl<S: LedgerStore> Engine<S> {
    /// Applies the effect of one transaction to a wallet.
    ///
    /// Reads the latest wallet state, checks the non-negative balance guard
    /// against that read, and writes balance plus the matching lifetime
    /// total back in a single conditional update. A concurrent writer
    /// invalidates the read and the whole sequence restarts from a fresh
    /// one, so two racing expenses can never both pass the guard.
    pub async fn apply_transaction_effect(
        &self,
        wallet_id: Uuid,
        kind: TransactionKind,
        amount_minor: i64,
    ) -> ResultEngine<Wallet> {
        self.shift_wallet_aggregates(wallet_id, kind, amount_minor, false)
            .await
    }

    /// Undoes the effect of one transaction, restoring the prior balance and
    /// totals. The inverse of [`Engine::apply_transaction_effect`].
    pub async fn reverse_transaction_effect(
        &self,
        wallet_id: Uuid,
        kind: TransactionKind,
        amount_minor: i64,
    ) -> ResultEngine<Wallet> {
        self.shift_wallet_aggregates(wallet_id, kind, amount_minor, true)
            .await
    }

    async fn shift_wallet_aggregates(
        &self,
        wallet_id: Uuid,
        kind: TransactionKind,
        amount_minor: i64,
        reverse: bool,
    ) -> ResultEngine<Wallet> {
        for attempt in 1..=AGGREGATE_UPDATE_ATTEMPTS {
            let wallet = self
                .store
                .wallet(wallet_id)
                .await?
                .ok_or(EngineError::WalletNotFound)?;
            let updated = if reverse {
                wallet.with_effect_reversed(kind, amount_minor)?
            } else {
                wallet.with_effect(kind, amount_minor)?
            };

            if self
                .store
                .update_wallet_aggregates(wallet_id, wallet.aggregates(), updated.aggregates())
                .await?
            {
                return Ok(updated);
            }
            tracing::warn!(
                %wallet_id,
                attempt,
                "wallet aggregate update conflicted, retrying from a fresh read"
            );
        }

        Err(EngineError::Database(DbErr::Custom(format!(
            "wallet {wallet_id} aggregate update kept conflicting"
        ))))
    }

    /// Creates a wallet, or renames/re-icons an existing one.
    ///
    /// Creation starts from zeroed balance and totals. Updates only touch
    /// the profile; nothing here can move money.
    pub async fn create_or_update_wallet(&self, cmd: UpsertWalletCmd) -> ResultEngine<Wallet> {
        let name = normalize_required_name(&cmd.name, "wallet")?;
        let icon_ref = match &cmd.icon {
            Some(source) => Some(self.store_attachment(source, AttachmentKind::WalletIcon)?),
            None => None,
        };

        match cmd.id {
            None => {
                let wallet = Wallet::new(cmd.uid, name, icon_ref);
                self.store.insert_wallet(&wallet).await?;
                tracing::debug!(wallet_id = %wallet.id, "created wallet");
                Ok(wallet)
            }
            Some(wallet_id) => {
                let mut wallet = self.require_wallet(&cmd.uid, wallet_id).await?;
                self.store
                    .update_wallet_profile(wallet_id, &name, icon_ref.as_deref())
                    .await?;
                wallet.name = name;
                wallet.icon_ref = icon_ref;
                Ok(wallet)
            }
        }
    }

    /// Returns one wallet owned by `uid`.
    pub async fn wallet(&self, uid: &str, wallet_id: Uuid) -> ResultEngine<Wallet> {
        self.require_wallet(uid, wallet_id).await
    }

    /// All wallets of one user, oldest first.
    pub async fn wallets(&self, uid: &str) -> ResultEngine<Vec<Wallet>> {
        self.store.wallets_for_user(uid).await
    }

    /// Deletes a wallet; the storage schema cascades to its transactions.
    pub async fn delete_wallet(&self, uid: &str, wallet_id: Uuid) -> ResultEngine<()> {
        self.require_wallet(uid, wallet_id).await?;
        self.store.delete_wallet(wallet_id).await?;
        tracing::debug!(%wallet_id, "deleted wallet");
        Ok(())
    }

    /// Loads a wallet and checks ownership. Cross-user lookups read as
    /// absent rather than forbidden.
    pub(super) async fn require_wallet(&self, uid: &str, wallet_id: Uuid) -> ResultEngine<Wallet> {
        let wallet = self
            .store
            .wallet(wallet_id)
            .await?
            .ok_or(EngineError::WalletNotFound)?;
        if wallet.uid != uid {
            return Err(EngineError::WalletNotFound);
        }
        Ok(wallet)
    }
}
