use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::document::DocumentComposer;
use crate::infra::db::DbProposalRepository;
use crate::infra::mail::SmtpMailer;
use crate::infra::render::HttpPdfRenderer;
use crate::usecase::dispatch::DispatchSettings;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub renderer: HttpPdfRenderer,
    pub mailer: SmtpMailer,
    pub composer: Arc<DocumentComposer>,
    pub dispatch: DispatchSettings,
}

impl AppState {
    pub fn proposal_repo(&self) -> DbProposalRepository {
        DbProposalRepository {
            db: self.db.clone(),
        }
    }
}
