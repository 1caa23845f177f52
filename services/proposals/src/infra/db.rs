use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};

use proposta_domain::id::ProposalId;
use proposta_domain::status::ProposalStatus;
use proposta_domain::validity::ValidityDate;
use proposta_proposals_schema::proposals;

use crate::domain::repository::ProposalRepository;
use crate::domain::types::{HistoryCursor, NewProposal, Proposal};
use crate::error::ProposalsServiceError;

// ── Proposal repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProposalRepository {
    pub db: DatabaseConnection,
}

impl ProposalRepository for DbProposalRepository {
    async fn create(&self, proposal: &NewProposal) -> Result<Proposal, ProposalsServiceError> {
        let model = proposals::ActiveModel {
            client_name: Set(proposal.client_name.clone()),
            company_name: Set(proposal.company_name.clone()),
            amount: Set(proposal.amount.clone()),
            description: Set(proposal.description.clone()),
            recipient_email: Set(proposal.recipient_email.clone()),
            validity: Set(proposal.validity.map(ValidityDate::date)),
            status: Set(ProposalStatus::Pending.as_str().to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("insert proposal")?;
        Ok(proposal_from_model(model)?)
    }

    async fn update_status(
        &self,
        id: ProposalId,
        status: ProposalStatus,
    ) -> Result<bool, ProposalsServiceError> {
        let result = proposals::Entity::update_many()
            .col_expr(proposals::Column::Status, Expr::value(status.as_str()))
            .filter(proposals::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("update proposal status")?;
        Ok(result.rows_affected > 0)
    }

    async fn transition_status(
        &self,
        id: ProposalId,
        from: ProposalStatus,
        to: ProposalStatus,
    ) -> Result<bool, ProposalsServiceError> {
        let result = proposals::Entity::update_many()
            .col_expr(proposals::Column::Status, Expr::value(to.as_str()))
            .filter(proposals::Column::Id.eq(id.0))
            .filter(proposals::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await
            .context("transition proposal status")?;
        Ok(result.rows_affected > 0)
    }

    async fn find_by_id(&self, id: ProposalId) -> Result<Option<Proposal>, ProposalsServiceError> {
        let model = proposals::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find proposal by id")?;
        Ok(model.map(proposal_from_model).transpose()?)
    }

    async fn list_page(
        &self,
        after: Option<HistoryCursor>,
        limit: u64,
    ) -> Result<Vec<Proposal>, ProposalsServiceError> {
        let mut query = proposals::Entity::find();
        if let Some(cursor) = after {
            query = query.filter(
                Condition::any()
                    .add(proposals::Column::SubmittedAt.lt(cursor.submitted_at))
                    .add(
                        Condition::all()
                            .add(proposals::Column::SubmittedAt.eq(cursor.submitted_at))
                            .add(proposals::Column::Id.lt(cursor.id.0)),
                    ),
            );
        }
        let models = query
            .order_by_desc(proposals::Column::SubmittedAt)
            .order_by_desc(proposals::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list proposals")?;
        Ok(models
            .into_iter()
            .map(proposal_from_model)
            .collect::<anyhow::Result<_>>()?)
    }
}

// ── Model conversion ─────────────────────────────────────────────────────────

fn proposal_from_model(m: proposals::Model) -> anyhow::Result<Proposal> {
    let status = m
        .status
        .parse::<ProposalStatus>()
        .with_context(|| format!("proposal {} has unreadable status", m.id))?;
    Ok(Proposal {
        id: ProposalId(m.id),
        client_name: m.client_name,
        company_name: m.company_name,
        amount: m.amount,
        description: m.description,
        recipient_email: m.recipient_email,
        validity: m.validity.map(ValidityDate::new),
        submitted_at: m.submitted_at,
        status,
    })
}
