//! Engine facade and its operations.
//!
//! Write flows live in the submodules, one file per concern: wallet
//! aggregate maintenance in [`wallets`](self::wallets), budget fan-out in
//! [`budgets`](self::budgets), and the transaction flows in
//! [`transactions`](self::transactions).

use crate::{
    AttachmentKind, AttachmentSource, AttachmentStore, DbStore, EngineError, ResultEngine,
    store::LedgerStore,
};

mod budgets;
mod transactions;
mod wallets;

pub use transactions::CreatedTransaction;

/// The ledger engine.
///
/// Owns the injected storage interface plus the optional attachment
/// collaborator; every operation works through these, never through ambient
/// state.
pub struct Engine<S = DbStore> {
    store: S,
    attachments: Option<Box<dyn AttachmentStore>>,
}

impl<S: LedgerStore> Engine<S> {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder<S> {
        EngineBuilder::default()
    }

    /// Resolves an attachment into a stored reference.
    ///
    /// Already-stored references pass through without consulting the
    /// collaborator; fresh material requires one to be configured.
    fn store_attachment(
        &self,
        source: &AttachmentSource,
        kind: AttachmentKind,
    ) -> ResultEngine<String> {
        if let AttachmentSource::Stored(reference) = source {
            return Ok(reference.clone());
        }
        match &self.attachments {
            Some(attachments) => attachments.store(source, kind),
            None => Err(EngineError::AttachmentUpload(
                "no attachment store configured".to_string(),
            )),
        }
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
pub struct EngineBuilder<S> {
    store: Option<S>,
    attachments: Option<Box<dyn AttachmentStore>>,
}

impl<S> Default for EngineBuilder<S> {
    fn default() -> Self {
        Self {
            store: None,
            attachments: None,
        }
    }
}

impl<S: LedgerStore> EngineBuilder<S> {
    /// Pass the required storage interface.
    pub fn store(mut self, store: S) -> EngineBuilder<S> {
        self.store = Some(store);
        self
    }

    /// Pass the attachment collaborator. Without one, flows that carry fresh
    /// attachment material fail with `AttachmentUpload`.
    pub fn attachments(mut self, attachments: Box<dyn AttachmentStore>) -> EngineBuilder<S> {
        self.attachments = Some(attachments);
        self
    }

    /// Construct `Engine`.
    pub fn build(self) -> ResultEngine<Engine<S>> {
        let store = self
            .store
            .ok_or_else(|| EngineError::Validation("a ledger store is required".to_string()))?;
        Ok(Engine {
            store,
            attachments: self.attachments,
        })
    }
}
