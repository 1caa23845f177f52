use proposta_domain::id::ProposalId;
use proposta_domain::status::{Decision, ProposalStatus};
use proposta_proposals::domain::types::DecisionOutcome;
use proposta_proposals::error::ProposalsServiceError;
use proposta_proposals::usecase::decision::RecordDecisionUseCase;

use crate::helpers::{
    FakeMailer, FakeRenderer, InMemoryProposalRepo, dispatch_input, dispatch_usecase,
};

#[tokio::test]
async fn should_accept_a_delivered_proposal() {
    let repo = InMemoryProposalRepo::new();
    let outcome = dispatch_usecase(repo.clone(), FakeRenderer::default(), FakeMailer::default())
        .execute(dispatch_input("7"))
        .await
        .unwrap();
    let id = outcome.id();

    let uc = RecordDecisionUseCase { repo: repo.clone() };
    let result = uc.execute(id, Decision::Accept).await.unwrap();

    assert_eq!(result, DecisionOutcome::Recorded(ProposalStatus::Accepted));
    assert_eq!(repo.get(id).unwrap().status, ProposalStatus::Accepted);
}

#[tokio::test]
async fn should_keep_first_decision_when_contradicted() {
    let repo = InMemoryProposalRepo::new();
    let id = repo.seed(ProposalStatus::Sent);
    let uc = RecordDecisionUseCase { repo: repo.clone() };

    uc.execute(id, Decision::Reject).await.unwrap();
    let repeated = uc.execute(id, Decision::Reject).await.unwrap();
    let contradicting = uc.execute(id, Decision::Accept).await;

    assert_eq!(
        repeated,
        DecisionOutcome::AlreadyRecorded(ProposalStatus::Rejected)
    );
    assert!(
        matches!(
            contradicting,
            Err(ProposalsServiceError::InvalidTransition {
                from: ProposalStatus::Rejected,
                to: ProposalStatus::Accepted,
            })
        ),
        "expected InvalidTransition, got {contradicting:?}"
    );
    assert_eq!(repo.get(id).unwrap().status, ProposalStatus::Rejected);
}

#[tokio::test]
async fn should_refuse_decision_on_failed_dispatch() {
    let repo = InMemoryProposalRepo::new();
    let outcome = dispatch_usecase(repo.clone(), FakeRenderer::failing(), FakeMailer::default())
        .execute(dispatch_input("7"))
        .await
        .unwrap();

    let uc = RecordDecisionUseCase { repo: repo.clone() };
    let result = uc.execute(outcome.id(), Decision::Accept).await;

    assert!(
        matches!(result, Err(ProposalsServiceError::InvalidTransition { .. })),
        "expected InvalidTransition, got {result:?}"
    );
    assert_eq!(
        repo.get(outcome.id()).unwrap().status,
        ProposalStatus::Failed
    );
}

#[tokio::test]
async fn should_return_not_found_and_mutate_nothing_for_unknown_id() {
    let repo = InMemoryProposalRepo::new();
    let existing = repo.seed(ProposalStatus::Sent);
    let before = repo.all();

    let uc = RecordDecisionUseCase { repo: repo.clone() };
    let result = uc.execute(ProposalId(999), Decision::Accept).await;

    assert!(
        matches!(result, Err(ProposalsServiceError::ProposalNotFound)),
        "expected ProposalNotFound, got {result:?}"
    );
    assert_eq!(repo.all(), before);
    assert_eq!(repo.get(existing).unwrap().status, ProposalStatus::Sent);
}
