use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use proposta_domain::id::ProposalId;
use proposta_domain::status::ProposalStatus;
use proposta_domain::validity::InvalidTerm;

use crate::domain::repository::RenderError;

/// Proposals service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ProposalsServiceError {
    #[error("invalid term: {0}")]
    InvalidTerm(#[from] InvalidTerm),
    #[error("invalid proposal id")]
    InvalidProposalId,
    #[error("proposal not found")]
    ProposalNotFound,
    #[error("proposal is {from}; cannot become {to}")]
    InvalidTransition {
        from: ProposalStatus,
        to: ProposalStatus,
    },
    #[error("document rendering failed")]
    RenderFailed(#[source] RenderError),
    #[error("proposal {id} outcome could not be recorded")]
    Unfinalized {
        id: ProposalId,
        intended: ProposalStatus,
        #[source]
        source: anyhow::Error,
    },
    #[error("storage unavailable")]
    Storage(#[from] anyhow::Error),
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl ProposalsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTerm(_) => "INVALID_TERM",
            Self::InvalidProposalId => "INVALID_PROPOSAL_ID",
            Self::ProposalNotFound => "PROPOSAL_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::RenderFailed(_) => "RENDER_FAILED",
            Self::Unfinalized { .. } => "FINALIZATION_FAILED",
            Self::Storage(_) => "STORAGE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ProposalsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidTerm(_) | Self::InvalidProposalId => StatusCode::BAD_REQUEST,
            Self::ProposalNotFound => StatusCode::NOT_FOUND,
            Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::RenderFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unfinalized { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Client errors are left to TraceLayer. Unfinalized is logged at its source.
        match &self {
            Self::RenderFailed(e) => {
                tracing::warn!(error = %e, kind = self.kind(), "preview render failed");
            }
            Self::Storage(e) | Self::Internal(e) => {
                tracing::error!(error = format!("{e:#}"), kind = self.kind(), "request failed");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
