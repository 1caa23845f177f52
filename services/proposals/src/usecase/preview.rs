use std::sync::Arc;

use bytes::Bytes;

use crate::domain::document::{DocumentComposer, ProposalContent};
use crate::domain::repository::{DocumentRenderer, RenderError};
use crate::domain::types::PageOptions;
use crate::error::ProposalsServiceError;

pub struct PreviewProposalInput {
    pub client_name: String,
    pub company_name: String,
    pub amount: String,
    pub description: String,
}

/// Render a proposal document without storing or sending anything.
pub struct PreviewProposalUseCase<D: DocumentRenderer> {
    pub renderer: D,
    pub composer: Arc<DocumentComposer>,
}

impl<D: DocumentRenderer> PreviewProposalUseCase<D> {
    pub async fn execute(&self, input: PreviewProposalInput) -> Result<Bytes, ProposalsServiceError> {
        let markup = self
            .composer
            .compose_preview(ProposalContent {
                client_name: &input.client_name,
                company_name: &input.company_name,
                amount: &input.amount,
                description: &input.description,
            })
            .map_err(|e| ProposalsServiceError::RenderFailed(RenderError::Compose(e.to_string())))?;
        self.renderer
            .render(&markup, &PageOptions::A4)
            .await
            .map_err(ProposalsServiceError::RenderFailed)
    }
}
