use lettre::message::header::ContentType;
use lettre::message::{Attachment as MailAttachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::repository::{DeliveryError, MailTransport};
use crate::domain::types::{DeliveryReceipt, Envelope};

/// Transport security for the SMTP connection. Env value: `tls`, `starttls` or `none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// Implicit TLS from the first byte (usually port 465).
    Tls,
    #[default]
    StartTls,
    /// Plaintext. Only for local relays and test catchers.
    None,
}

impl std::str::FromStr for SmtpSecurity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tls" => Ok(Self::Tls),
            "starttls" => Ok(Self::StartTls),
            "none" => Ok(Self::None),
            other => Err(format!("unknown SMTP security mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Async SMTP delivery through lettre.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, DeliveryError> {
        let builder = match settings.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host),
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            }
            SmtpSecurity::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                &settings.host,
            )),
        }
        .map_err(|e: lettre::transport::smtp::Error| {
            DeliveryError::ConnectionFailed(e.to_string())
        })?
        .port(settings.port);

        let builder = match (&settings.username, &settings.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn mailbox(raw: &str) -> Result<Mailbox, DeliveryError> {
    raw.parse()
        .map_err(|e: lettre::address::AddressError| {
            DeliveryError::InvalidAddress(format!("{raw}: {e}"))
        })
}

fn build_message(envelope: &Envelope) -> Result<Message, DeliveryError> {
    let mut body = MultiPart::mixed().multipart(MultiPart::alternative_plain_html(
        envelope.body_text.clone(),
        envelope.body_html.clone(),
    ));
    for attachment in &envelope.attachments {
        let content_type = ContentType::parse(&attachment.mime_type).map_err(|e| {
            DeliveryError::Other(format!("invalid attachment type {}: {e}", attachment.mime_type))
        })?;
        body = body.singlepart(
            MailAttachment::new(attachment.filename.clone())
                .body(attachment.bytes.to_vec(), content_type),
        );
    }

    Message::builder()
        .from(mailbox(&envelope.from)?)
        .to(mailbox(&envelope.to)?)
        .subject(envelope.subject.as_str())
        .multipart(body)
        .map_err(|e| DeliveryError::Other(format!("failed to build email: {e}")))
}

fn delivery_error(e: lettre::transport::smtp::Error) -> DeliveryError {
    if e.status().is_some_and(|code| code.to_string() == "535") {
        DeliveryError::AuthenticationFailed(e.to_string())
    } else if e.is_permanent() || e.is_transient() {
        DeliveryError::Rejected(e.to_string())
    } else {
        DeliveryError::ConnectionFailed(e.to_string())
    }
}

impl MailTransport for SmtpMailer {
    async fn send(&self, envelope: &Envelope) -> Result<DeliveryReceipt, DeliveryError> {
        let message = build_message(envelope)?;
        let response = self.transport.send(message).await.map_err(delivery_error)?;
        Ok(DeliveryReceipt {
            code: response.code().to_string(),
            message: response.first_line().map(str::to_owned),
        })
    }
}
