use std::time::Duration;

use crate::infra::mail::SmtpSettings;

/// Proposals service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ProposalsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3001). Env var: `PROPOSALS_PORT`.
    pub proposals_port: u16,
    /// Public origin of this service, used to build accept/reject links.
    pub public_base_url: String,
    /// Embed accept/reject links in dispatched documents (default true).
    /// Env var: `DECISION_LINKS_ENABLED`.
    pub decision_links_enabled: bool,
    /// Base URL of the HTML to PDF conversion service (e.g. "http://gotenberg:3000").
    pub renderer_url: String,
    /// Render request timeout (default 30s). Env var: `RENDERER_TIMEOUT_SECS`.
    pub renderer_timeout: Duration,
    /// SMTP relay. Env vars: `SMTP_HOST`, `SMTP_PORT` (default 587),
    /// `SMTP_SECURITY` (default starttls), `SMTP_USERNAME`, `SMTP_PASSWORD`.
    pub smtp: SmtpSettings,
    /// Sender mailbox, e.g. "Proposta <proposals@example.com>". Env var: `MAIL_FROM`.
    pub mail_from: String,
}

impl ProposalsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            proposals_port: std::env::var("PROPOSALS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            public_base_url: std::env::var("PUBLIC_BASE_URL").expect("PUBLIC_BASE_URL"),
            decision_links_enabled: std::env::var("DECISION_LINKS_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            renderer_url: std::env::var("RENDERER_URL").expect("RENDERER_URL"),
            renderer_timeout: Duration::from_secs(
                std::env::var("RENDERER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            smtp: SmtpSettings {
                host: std::env::var("SMTP_HOST").expect("SMTP_HOST"),
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(587),
                security: std::env::var("SMTP_SECURITY")
                    .ok()
                    .map(|v| v.parse().expect("SMTP_SECURITY"))
                    .unwrap_or_default(),
                username: std::env::var("SMTP_USERNAME").ok(),
                password: std::env::var("SMTP_PASSWORD").ok(),
            },
            mail_from: std::env::var("MAIL_FROM").expect("MAIL_FROM"),
        }
    }
}
