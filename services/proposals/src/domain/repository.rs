#![allow(async_fn_in_trait)]

use bytes::Bytes;

use proposta_domain::id::ProposalId;
use proposta_domain::status::ProposalStatus;

use crate::domain::types::{
    DeliveryReceipt, Envelope, HistoryCursor, NewProposal, PageOptions, Proposal,
};
use crate::error::ProposalsServiceError;

/// Durable proposal records.
pub trait ProposalRepository: Send + Sync {
    /// Insert a new `Pending` record. Id and `submitted_at` come from the store.
    async fn create(&self, proposal: &NewProposal) -> Result<Proposal, ProposalsServiceError>;

    /// Overwrite the status of one record. Returns `false` if no row matched.
    async fn update_status(
        &self,
        id: ProposalId,
        status: ProposalStatus,
    ) -> Result<bool, ProposalsServiceError>;

    /// Set `to` only if the current status is `from`. Returns `true` if applied.
    async fn transition_status(
        &self,
        id: ProposalId,
        from: ProposalStatus,
        to: ProposalStatus,
    ) -> Result<bool, ProposalsServiceError>;

    async fn find_by_id(&self, id: ProposalId) -> Result<Option<Proposal>, ProposalsServiceError>;

    /// One keyset page in `(submitted_at DESC, id DESC)` order, strictly after `after`.
    async fn list_page(
        &self,
        after: Option<HistoryCursor>,
        limit: u64,
    ) -> Result<Vec<Proposal>, ProposalsServiceError>;
}

// ── Document rendering ───────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("renderer unreachable: {0}")]
    Unreachable(String),
    #[error("renderer rejected document ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("renderer returned an empty document")]
    EmptyDocument,
    #[error("document could not be composed: {0}")]
    Compose(String),
}

/// HTML to PDF conversion.
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, markup: &str, page: &PageOptions) -> Result<Bytes, RenderError>;
}

// ── Mail delivery ────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("delivery rejected: {0}")]
    Rejected(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("delivery error: {0}")]
    Other(String),
}

/// Outbound email transport.
pub trait MailTransport: Send + Sync {
    async fn send(&self, envelope: &Envelope) -> Result<DeliveryReceipt, DeliveryError>;
}
