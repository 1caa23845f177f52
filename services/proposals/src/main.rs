use std::sync::Arc;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use proposta_proposals::config::ProposalsConfig;
use proposta_proposals::domain::document::{DecisionLinks, DocumentComposer};
use proposta_proposals::infra::mail::SmtpMailer;
use proposta_proposals::infra::render::HttpPdfRenderer;
use proposta_proposals::router::build_router;
use proposta_proposals::state::AppState;
use proposta_proposals::usecase::dispatch::DispatchSettings;
use proposta_proposals_migration::Migrator;

#[tokio::main]
async fn main() {
    proposta_core::tracing::init_tracing();

    let config = ProposalsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    Migrator::up(&db, None)
        .await
        .expect("failed to apply migrations");

    let renderer = HttpPdfRenderer::new(&config.renderer_url, config.renderer_timeout)
        .expect("failed to build renderer client");
    let mailer = SmtpMailer::new(&config.smtp).expect("failed to build SMTP transport");
    let composer = DocumentComposer::new().expect("failed to compile document templates");

    let links = config
        .decision_links_enabled
        .then(|| DecisionLinks::new(config.public_base_url.as_str()));

    let state = AppState {
        db,
        renderer,
        mailer,
        composer: Arc::new(composer),
        dispatch: DispatchSettings {
            sender: config.mail_from,
            links,
        },
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.proposals_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("proposals service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
