use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use proposta_domain::id::ProposalId;
use proposta_domain::status::ProposalStatus;
use proposta_domain::validity::ValidityDate;

use crate::domain::types::{DispatchOutcome, Proposal};
use crate::error::ProposalsServiceError;
use crate::state::AppState;
use crate::usecase::dispatch::{DispatchProposalInput, DispatchProposalUseCase, detached};
use crate::usecase::history::{DEFAULT_PAGE_SIZE, GetProposalUseCase, ListProposalsUseCase};
use crate::usecase::preview::{PreviewProposalInput, PreviewProposalUseCase};

// ── Request types ────────────────────────────────────────────────────────────

/// A term clients send either as a JSON number or as a string.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Number(serde_json::Number),
    Text(String),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Number(n) => n.to_string(),
            TextOrNumber::Text(s) => s,
        }
    }
}

#[derive(Deserialize)]
pub struct SendProposalRequest {
    pub client_name: String,
    pub company_name: String,
    /// Decimal text, kept exactly as sent.
    pub amount: String,
    pub description: String,
    /// Recipient address.
    pub to: String,
    pub subject: String,
    pub term_days: TextOrNumber,
}

#[derive(Deserialize)]
pub struct PreviewProposalRequest {
    pub client_name: String,
    pub company_name: String,
    pub amount: String,
    pub description: String,
}

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProposalResponse {
    pub id: ProposalId,
    pub client_name: String,
    pub company_name: String,
    pub amount: String,
    pub description: String,
    pub recipient_email: String,
    pub validity: Option<ValidityDate>,
    #[serde(serialize_with = "proposta_core::serde::to_rfc3339_ms")]
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub status: ProposalStatus,
}

impl From<Proposal> for ProposalResponse {
    fn from(p: Proposal) -> Self {
        Self {
            id: p.id,
            client_name: p.client_name,
            company_name: p.company_name,
            amount: p.amount,
            description: p.description,
            recipient_email: p.recipient_email,
            validity: p.validity,
            submitted_at: p.submitted_at,
            status: p.status,
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum DispatchResponse {
    Sent {
        id: ProposalId,
        status: ProposalStatus,
        validity: ValidityDate,
    },
    Failed {
        id: ProposalId,
        status: ProposalStatus,
        kind: &'static str,
        message: String,
    },
}

fn dispatch_response(outcome: DispatchOutcome) -> (StatusCode, Json<DispatchResponse>) {
    let status = outcome.status();
    let kind = outcome.failure_kind();
    match outcome {
        DispatchOutcome::Sent { id, validity } => (
            StatusCode::CREATED,
            Json(DispatchResponse::Sent {
                id,
                status,
                validity,
            }),
        ),
        DispatchOutcome::RenderFailed { id, reason }
        | DispatchOutcome::DeliveryFailed { id, reason } => (
            StatusCode::BAD_GATEWAY,
            Json(DispatchResponse::Failed {
                id,
                status,
                kind: kind.unwrap_or("DISPATCH_FAILED"),
                message: reason,
            }),
        ),
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<ProposalId, ProposalsServiceError> {
    raw.parse()
        .map_err(|_| ProposalsServiceError::InvalidProposalId)
}

// ── POST /proposals ──────────────────────────────────────────────────────────

pub async fn create_proposal(
    State(state): State<AppState>,
    Json(body): Json<SendProposalRequest>,
) -> Result<(StatusCode, Json<DispatchResponse>), ProposalsServiceError> {
    let usecase = DispatchProposalUseCase {
        repo: state.proposal_repo(),
        renderer: state.renderer.clone(),
        mailer: state.mailer.clone(),
        composer: Arc::clone(&state.composer),
        settings: state.dispatch.clone(),
    };
    let input = DispatchProposalInput {
        client_name: body.client_name,
        company_name: body.company_name,
        amount: body.amount,
        description: body.description,
        recipient_email: body.to,
        subject: body.subject,
        term_days: body.term_days.into(),
    };
    let outcome = detached(async move { usecase.execute(input).await }).await?;
    Ok(dispatch_response(outcome))
}

// ── POST /proposals/preview ──────────────────────────────────────────────────

pub async fn preview_proposal(
    State(state): State<AppState>,
    Json(body): Json<PreviewProposalRequest>,
) -> Result<Response, ProposalsServiceError> {
    let usecase = PreviewProposalUseCase {
        renderer: state.renderer.clone(),
        composer: Arc::clone(&state.composer),
    };
    let pdf = usecase
        .execute(PreviewProposalInput {
            client_name: body.client_name,
            company_name: body.company_name,
            amount: body.amount,
            description: body.description,
        })
        .await?;
    Ok(([(header::CONTENT_TYPE, "application/pdf")], pdf).into_response())
}

// ── GET /proposals ───────────────────────────────────────────────────────────

pub async fn get_proposals(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProposalResponse>>, ProposalsServiceError> {
    let usecase = ListProposalsUseCase {
        repo: state.proposal_repo(),
        page_size: DEFAULT_PAGE_SIZE,
    };
    let proposals = usecase.execute().await?;
    Ok(Json(proposals.into_iter().map(Into::into).collect()))
}

// ── GET /proposals/{id} ──────────────────────────────────────────────────────

pub async fn get_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProposalResponse>, ProposalsServiceError> {
    let id = parse_id(&id)?;
    let usecase = GetProposalUseCase {
        repo: state.proposal_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}
