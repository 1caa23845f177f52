use futures::{Stream, TryStreamExt, stream};

use proposta_domain::id::ProposalId;

use crate::domain::repository::ProposalRepository;
use crate::domain::types::{HistoryCursor, Proposal};
use crate::error::ProposalsServiceError;

pub const DEFAULT_PAGE_SIZE: u64 = 100;

// ── ListProposals ────────────────────────────────────────────────────────────

enum Position {
    Start,
    After(HistoryCursor),
    Exhausted,
}

/// All proposals, newest first, ties broken by id descending.
pub struct ListProposalsUseCase<R: ProposalRepository> {
    pub repo: R,
    pub page_size: u64,
}

impl<R: ProposalRepository> ListProposalsUseCase<R> {
    /// Lazy stream over keyset pages. Each call starts again from the newest record.
    pub fn stream(&self) -> impl Stream<Item = Result<Proposal, ProposalsServiceError>> + '_ {
        let limit = self.page_size.max(1);
        stream::try_unfold(Position::Start, move |position| async move {
            let after = match position {
                Position::Start => None,
                Position::After(cursor) => Some(cursor),
                Position::Exhausted => return Ok(None),
            };
            let page = self.repo.list_page(after, limit).await?;
            let next = match page.last() {
                Some(last) if page.len() as u64 == limit => Position::After(last.into()),
                Some(_) => Position::Exhausted,
                None => return Ok(None),
            };
            Ok::<_, ProposalsServiceError>(Some((page, next)))
        })
        .map_ok(|page| stream::iter(page.into_iter().map(Ok::<_, ProposalsServiceError>)))
        .try_flatten()
    }

    pub async fn execute(&self) -> Result<Vec<Proposal>, ProposalsServiceError> {
        self.stream().try_collect().await
    }
}

// ── GetProposal ──────────────────────────────────────────────────────────────

pub struct GetProposalUseCase<R: ProposalRepository> {
    pub repo: R,
}

impl<R: ProposalRepository> GetProposalUseCase<R> {
    pub async fn execute(&self, id: ProposalId) -> Result<Proposal, ProposalsServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ProposalsServiceError::ProposalNotFound)
    }
}
