use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use proposta_domain::id::ProposalId;
use proposta_domain::status::ProposalStatus;
use proposta_domain::validity::compute_validity;

use crate::domain::document::{DecisionLinks, DocumentComposer};
use crate::domain::repository::{DocumentRenderer, MailTransport, ProposalRepository, RenderError};
use crate::domain::types::{Attachment, DispatchOutcome, Envelope, NewProposal, PageOptions};
use crate::error::ProposalsServiceError;

pub const ATTACHMENT_FILENAME: &str = "proposal.pdf";
pub const ATTACHMENT_MIME_TYPE: &str = "application/pdf";
const BODY_TEXT: &str = "Please find the commercial proposal attached.";

/// Sender identity and link policy for dispatched proposals.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub sender: String,
    /// Accept/reject links are embedded only when set.
    pub links: Option<DecisionLinks>,
}

pub struct DispatchProposalInput {
    pub client_name: String,
    pub company_name: String,
    pub amount: String,
    pub description: String,
    pub recipient_email: String,
    pub subject: String,
    /// Raw term length in days, validated before anything is stored.
    pub term_days: String,
}

/// Persist, render, send and finalize one proposal.
///
/// Once the record exists every exit path writes `Sent` or `Failed`.
/// Render and delivery failures are outcomes, not errors.
pub struct DispatchProposalUseCase<R, D, M>
where
    R: ProposalRepository,
    D: DocumentRenderer,
    M: MailTransport,
{
    pub repo: R,
    pub renderer: D,
    pub mailer: M,
    pub composer: Arc<DocumentComposer>,
    pub settings: DispatchSettings,
}

impl<R, D, M> DispatchProposalUseCase<R, D, M>
where
    R: ProposalRepository,
    D: DocumentRenderer,
    M: MailTransport,
{
    pub async fn execute(
        &self,
        input: DispatchProposalInput,
    ) -> Result<DispatchOutcome, ProposalsServiceError> {
        let validity = compute_validity(&input.term_days, Utc::now())?;

        let proposal = self
            .repo
            .create(&NewProposal {
                client_name: input.client_name,
                company_name: input.company_name,
                amount: input.amount,
                description: input.description,
                recipient_email: input.recipient_email,
                validity: Some(validity),
            })
            .await?;
        let id = proposal.id;
        info!(proposal_id = %id, %validity, "proposal stored as pending");

        let rendered = self
            .composer
            .compose_dispatch(&proposal, validity, self.settings.links.as_ref())
            .map_err(|e| RenderError::Compose(e.to_string()));
        let markup = match rendered {
            Ok(markup) => markup,
            Err(e) => return self.render_failed(id, e).await,
        };

        let pdf = match self.renderer.render(&markup, &PageOptions::A4).await {
            Ok(pdf) => pdf,
            Err(e) => return self.render_failed(id, e).await,
        };

        let envelope = Envelope {
            to: proposal.recipient_email.clone(),
            from: self.settings.sender.clone(),
            subject: input.subject,
            body_text: BODY_TEXT.to_owned(),
            body_html: markup,
            attachments: vec![Attachment {
                bytes: pdf,
                filename: ATTACHMENT_FILENAME.to_owned(),
                mime_type: ATTACHMENT_MIME_TYPE.to_owned(),
            }],
        };

        match self.mailer.send(&envelope).await {
            Ok(receipt) => {
                info!(proposal_id = %id, code = %receipt.code, "proposal delivered");
                self.finish(id, DispatchOutcome::Sent { id, validity }).await
            }
            Err(e) => {
                warn!(proposal_id = %id, error = %e, "proposal delivery failed");
                self.finish(
                    id,
                    DispatchOutcome::DeliveryFailed {
                        id,
                        reason: e.to_string(),
                    },
                )
                .await
            }
        }
    }

    async fn render_failed(
        &self,
        id: ProposalId,
        e: RenderError,
    ) -> Result<DispatchOutcome, ProposalsServiceError> {
        warn!(proposal_id = %id, error = %e, "proposal render failed");
        self.finish(
            id,
            DispatchOutcome::RenderFailed {
                id,
                reason: e.to_string(),
            },
        )
        .await
    }

    /// Move the record out of `Pending`. A record that already holds `intended`
    /// counts as finalized. Any other status is left untouched.
    async fn finish(
        &self,
        id: ProposalId,
        outcome: DispatchOutcome,
    ) -> Result<DispatchOutcome, ProposalsServiceError> {
        let intended = outcome.status();
        let source = match self.finalize(id, intended).await {
            Ok(()) => return Ok(outcome),
            Err(source) => source,
        };
        // The external effect already happened; the stored status may still read pending.
        error!(
            proposal_id = %id,
            intended = %intended,
            error = format!("{source:#}"),
            "failed to record dispatch outcome"
        );
        Err(ProposalsServiceError::Unfinalized {
            id,
            intended,
            source,
        })
    }

    async fn finalize(&self, id: ProposalId, intended: ProposalStatus) -> anyhow::Result<()> {
        if self
            .repo
            .transition_status(id, ProposalStatus::Pending, intended)
            .await?
        {
            return Ok(());
        }
        match self.repo.find_by_id(id).await? {
            Some(current) if current.status == intended => Ok(()),
            Some(current) => Err(anyhow::anyhow!(
                "proposal is {}; cannot become {intended}",
                current.status
            )),
            None => Err(anyhow::anyhow!("proposal row vanished before finalization")),
        }
    }
}

/// Run a dispatch on its own task and wait for it.
///
/// Dropping the returned future does not cancel the task, so a stored record
/// is still finalized when the caller goes away.
pub async fn detached<F>(run: F) -> Result<DispatchOutcome, ProposalsServiceError>
where
    F: Future<Output = Result<DispatchOutcome, ProposalsServiceError>> + Send + 'static,
{
    tokio::spawn(run)
        .await
        .map_err(|e| ProposalsServiceError::Internal(anyhow::Error::new(e)))?
}
