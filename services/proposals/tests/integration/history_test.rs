use chrono::Duration;
use futures::{StreamExt, TryStreamExt};

use proposta_domain::id::ProposalId;
use proposta_domain::status::ProposalStatus;
use proposta_proposals::usecase::history::{GetProposalUseCase, ListProposalsUseCase};
use proposta_proposals::error::ProposalsServiceError;

use crate::helpers::InMemoryProposalRepo;

fn ids(proposals: &[proposta_proposals::domain::types::Proposal]) -> Vec<i64> {
    proposals.iter().map(|p| p.id.0).collect()
}

#[tokio::test]
async fn should_list_newest_first_across_pages() {
    let repo = InMemoryProposalRepo::new();
    for _ in 0..5 {
        repo.seed(ProposalStatus::Sent);
    }

    let uc = ListProposalsUseCase {
        repo: repo.clone(),
        page_size: 2,
    };
    let proposals = uc.execute().await.unwrap();

    assert_eq!(ids(&proposals), vec![5, 4, 3, 2, 1]);
    assert!(
        proposals
            .windows(2)
            .all(|w| w[0].submitted_at > w[1].submitted_at),
        "submission times must be strictly descending"
    );
    // Pages of 2, 2 and a short final page of 1.
    assert_eq!(repo.list_calls(), 3);
}

#[tokio::test]
async fn should_break_timestamp_ties_by_id_descending() {
    let repo = InMemoryProposalRepo::with_clock_step(Duration::zero());
    for _ in 0..4 {
        repo.seed(ProposalStatus::Pending);
    }

    let uc = ListProposalsUseCase {
        repo: repo.clone(),
        page_size: 3,
    };
    let proposals = uc.execute().await.unwrap();

    assert_eq!(ids(&proposals), vec![4, 3, 2, 1]);
}

#[tokio::test]
async fn should_end_after_an_exactly_full_last_page() {
    let repo = InMemoryProposalRepo::new();
    for _ in 0..4 {
        repo.seed(ProposalStatus::Sent);
    }

    let uc = ListProposalsUseCase {
        repo: repo.clone(),
        page_size: 2,
    };
    let proposals = uc.execute().await.unwrap();

    assert_eq!(ids(&proposals), vec![4, 3, 2, 1]);
    // Two full pages, then one empty page ends the stream.
    assert_eq!(repo.list_calls(), 3);
}

#[tokio::test]
async fn should_fetch_pages_lazily() {
    let repo = InMemoryProposalRepo::new();
    for _ in 0..10 {
        repo.seed(ProposalStatus::Sent);
    }

    let uc = ListProposalsUseCase {
        repo: repo.clone(),
        page_size: 3,
    };
    let first_two: Vec<_> = uc.stream().take(2).try_collect().await.unwrap();

    assert_eq!(ids(&first_two), vec![10, 9]);
    assert_eq!(repo.list_calls(), 1);
}

#[tokio::test]
async fn should_restart_from_newest_on_each_stream() {
    let repo = InMemoryProposalRepo::new();
    for _ in 0..3 {
        repo.seed(ProposalStatus::Sent);
    }
    let uc = ListProposalsUseCase {
        repo: repo.clone(),
        page_size: 2,
    };

    let first: Vec<_> = uc.stream().try_collect().await.unwrap();
    repo.seed(ProposalStatus::Pending);
    let second: Vec<_> = uc.stream().try_collect().await.unwrap();

    assert_eq!(ids(&first), vec![3, 2, 1]);
    assert_eq!(ids(&second), vec![4, 3, 2, 1]);
}

#[tokio::test]
async fn should_return_empty_history() {
    let uc = ListProposalsUseCase {
        repo: InMemoryProposalRepo::new(),
        page_size: 10,
    };
    assert!(uc.execute().await.unwrap().is_empty());
}

#[tokio::test]
async fn should_get_single_proposal_or_not_found() {
    let repo = InMemoryProposalRepo::new();
    let id = repo.seed(ProposalStatus::Sent);
    let uc = GetProposalUseCase { repo };

    assert_eq!(uc.execute(id).await.unwrap().id, id);
    assert!(matches!(
        uc.execute(ProposalId(42)).await,
        Err(ProposalsServiceError::ProposalNotFound)
    ));
}
