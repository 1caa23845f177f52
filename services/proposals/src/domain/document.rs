//! Proposal document markup.
//!
//! Templates are compiled once and shared by the preview and dispatch paths.
//! Every proposal-supplied field goes through tera's HTML autoescaping.

use serde::Serialize;
use tera::{Context, Tera};

use proposta_domain::id::ProposalId;
use proposta_domain::validity::ValidityDate;

use crate::domain::types::Proposal;

const BASE_TEMPLATE: &str = include_str!("../../templates/base.html");
const PREVIEW_TEMPLATE: &str = include_str!("../../templates/preview.html");
const DISPATCH_TEMPLATE: &str = include_str!("../../templates/dispatch.html");

const PREVIEW: &str = "preview.html";
const DISPATCH: &str = "dispatch.html";

/// The text fields shown on every proposal document.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProposalContent<'a> {
    pub client_name: &'a str,
    pub company_name: &'a str,
    pub amount: &'a str,
    pub description: &'a str,
}

impl<'a> From<&'a Proposal> for ProposalContent<'a> {
    fn from(p: &'a Proposal) -> Self {
        Self {
            client_name: &p.client_name,
            company_name: &p.company_name,
            amount: &p.amount,
            description: &p.description,
        }
    }
}

/// Builds the accept/reject URLs embedded in dispatched documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionLinks {
    base_url: String,
}

impl DecisionLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn accept_url(&self, id: ProposalId) -> String {
        format!("{}/proposals/{id}/accept", self.base_url)
    }

    pub fn reject_url(&self, id: ProposalId) -> String {
        format!("{}/proposals/{id}/reject", self.base_url)
    }
}

#[derive(Serialize)]
struct LinkPair {
    accept_url: String,
    reject_url: String,
}

#[derive(Serialize)]
struct DocumentContext<'a> {
    #[serde(flatten)]
    content: ProposalContent<'a>,
    validity: Option<String>,
    links: Option<LinkPair>,
}

#[derive(Debug, thiserror::Error)]
#[error("could not compose {template}: {source}")]
pub struct ComposeError {
    template: &'static str,
    #[source]
    source: tera::Error,
}

pub struct DocumentComposer {
    tera: Tera,
}

impl DocumentComposer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            (PREVIEW, PREVIEW_TEMPLATE),
            (DISPATCH, DISPATCH_TEMPLATE),
        ])?;
        Ok(Self { tera })
    }

    /// Document without validity or decision links.
    pub fn compose_preview(&self, content: ProposalContent<'_>) -> Result<String, ComposeError> {
        self.render(
            PREVIEW,
            DocumentContext {
                content,
                validity: None,
                links: None,
            },
        )
    }

    /// Document sent to the client. Links are embedded when `links` is set.
    pub fn compose_dispatch(
        &self,
        proposal: &Proposal,
        validity: ValidityDate,
        links: Option<&DecisionLinks>,
    ) -> Result<String, ComposeError> {
        self.render(
            DISPATCH,
            DocumentContext {
                content: proposal.into(),
                validity: Some(validity.to_string()),
                links: links.map(|l| LinkPair {
                    accept_url: l.accept_url(proposal.id),
                    reject_url: l.reject_url(proposal.id),
                }),
            },
        )
    }

    fn render(
        &self,
        template: &'static str,
        ctx: DocumentContext<'_>,
    ) -> Result<String, ComposeError> {
        Context::from_serialize(ctx)
            .and_then(|ctx| self.tera.render(template, &ctx))
            .map_err(|source| ComposeError { template, source })
    }
}
