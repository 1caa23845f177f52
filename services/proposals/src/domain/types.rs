use bytes::Bytes;
use chrono::{DateTime, Utc};

use proposta_domain::id::ProposalId;
use proposta_domain::status::ProposalStatus;
use proposta_domain::validity::ValidityDate;

/// A stored commercial proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub id: ProposalId,
    pub client_name: String,
    pub company_name: String,
    /// Decimal amount kept as the text the caller supplied.
    pub amount: String,
    pub description: String,
    pub recipient_email: String,
    pub validity: Option<ValidityDate>,
    pub submitted_at: DateTime<Utc>,
    pub status: ProposalStatus,
}

/// Fields supplied at creation. The store assigns id, timestamp and status.
#[derive(Debug, Clone)]
pub struct NewProposal {
    pub client_name: String,
    pub company_name: String,
    pub amount: String,
    pub description: String,
    pub recipient_email: String,
    pub validity: Option<ValidityDate>,
}

/// Keyset position in the history order `(submitted_at DESC, id DESC)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryCursor {
    pub submitted_at: DateTime<Utc>,
    pub id: ProposalId,
}

impl From<&Proposal> for HistoryCursor {
    fn from(proposal: &Proposal) -> Self {
        Self {
            submitted_at: proposal.submitted_at,
            id: proposal.id,
        }
    }
}

// ── Rendering ────────────────────────────────────────────────────────────────

/// Physical page layout handed to the renderer, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageOptions {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageOptions {
    pub const A4: PageOptions = PageOptions {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm: 10.0,
    };
}

impl Default for PageOptions {
    fn default() -> Self {
        Self::A4
    }
}

// ── Delivery ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Attachment {
    pub bytes: Bytes,
    pub filename: String,
    pub mime_type: String,
}

/// One outbound email.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: String,
    pub attachments: Vec<Attachment>,
}

/// What the mail provider reported on acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub code: String,
    pub message: Option<String>,
}

// ── Outcomes ─────────────────────────────────────────────────────────────────

/// Result of one dispatch run that got past validation.
///
/// Every variant refers to a record whose status is already final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent {
        id: ProposalId,
        validity: ValidityDate,
    },
    RenderFailed {
        id: ProposalId,
        reason: String,
    },
    DeliveryFailed {
        id: ProposalId,
        reason: String,
    },
}

impl DispatchOutcome {
    pub fn id(&self) -> ProposalId {
        match self {
            Self::Sent { id, .. }
            | Self::RenderFailed { id, .. }
            | Self::DeliveryFailed { id, .. } => *id,
        }
    }

    /// Status the record was finalized with.
    pub fn status(&self) -> ProposalStatus {
        match self {
            Self::Sent { .. } => ProposalStatus::Sent,
            Self::RenderFailed { .. } | Self::DeliveryFailed { .. } => ProposalStatus::Failed,
        }
    }

    /// Error kind reported for a run that ended in `Failed`.
    pub fn failure_kind(&self) -> Option<&'static str> {
        match self {
            Self::Sent { .. } => None,
            Self::RenderFailed { .. } => Some("RENDER_FAILED"),
            Self::DeliveryFailed { .. } => Some("DELIVERY_FAILED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The record moved from `Sent` to the given status.
    Recorded(ProposalStatus),
    /// The same decision was already on record; nothing changed.
    AlreadyRecorded(ProposalStatus),
}

impl DecisionOutcome {
    pub fn status(self) -> ProposalStatus {
        match self {
            Self::Recorded(status) | Self::AlreadyRecorded(status) => status,
        }
    }
}
