use axum::extract::{Path, State};

use proposta_domain::status::Decision;

use crate::domain::types::DecisionOutcome;
use crate::error::ProposalsServiceError;
use crate::handlers::proposal::parse_id;
use crate::state::AppState;
use crate::usecase::decision::RecordDecisionUseCase;

async fn record(
    state: AppState,
    raw_id: &str,
    decision: Decision,
) -> Result<&'static str, ProposalsServiceError> {
    let id = parse_id(raw_id)?;
    let usecase = RecordDecisionUseCase {
        repo: state.proposal_repo(),
    };
    let outcome = usecase.execute(id, decision).await?;
    Ok(confirmation(decision, outcome))
}

fn confirmation(decision: Decision, outcome: DecisionOutcome) -> &'static str {
    match (decision, outcome) {
        (Decision::Accept, DecisionOutcome::Recorded(_)) => "Proposal accepted. Thank you!",
        (Decision::Reject, DecisionOutcome::Recorded(_)) => "Proposal rejected.",
        (Decision::Accept, DecisionOutcome::AlreadyRecorded(_)) => {
            "This proposal was already accepted."
        }
        (Decision::Reject, DecisionOutcome::AlreadyRecorded(_)) => {
            "This proposal was already rejected."
        }
    }
}

// ── GET /proposals/{id}/accept ───────────────────────────────────────────────

pub async fn accept_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<&'static str, ProposalsServiceError> {
    record(state, &id, Decision::Accept).await
}

// ── GET /proposals/{id}/reject ───────────────────────────────────────────────

pub async fn reject_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<&'static str, ProposalsServiceError> {
    record(state, &id, Decision::Reject).await
}
