use tracing::info;

use proposta_domain::id::ProposalId;
use proposta_domain::status::{Decision, ProposalStatus};

use crate::domain::repository::ProposalRepository;
use crate::domain::types::DecisionOutcome;
use crate::error::ProposalsServiceError;

/// Record a client's answer to a delivered proposal.
///
/// Applied only while the record is `Sent`, as one compare-and-set write.
pub struct RecordDecisionUseCase<R: ProposalRepository> {
    pub repo: R,
}

impl<R: ProposalRepository> RecordDecisionUseCase<R> {
    pub async fn execute(
        &self,
        id: ProposalId,
        decision: Decision,
    ) -> Result<DecisionOutcome, ProposalsServiceError> {
        let target = decision.target_status();
        if self
            .repo
            .transition_status(id, ProposalStatus::Sent, target)
            .await?
        {
            info!(proposal_id = %id, status = %target, "decision recorded");
            return Ok(DecisionOutcome::Recorded(target));
        }

        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ProposalsServiceError::ProposalNotFound)?;
        if current.status == target {
            return Ok(DecisionOutcome::AlreadyRecorded(target));
        }
        Err(ProposalsServiceError::InvalidTransition {
            from: current.status,
            to: target,
        })
    }
}
