// SMTP mailer - sends the weekly report with its CSV attached
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid attachment content type: {0}")]
    InvalidContentType(String),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Mail task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, MailError>;

/// Where and as whom to send mail
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

// Keep the password out of debug output and logs
impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from_address", &self.from_address)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub to: String,
    pub attachment: Option<MailAttachment>,
}

pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    /// Assemble the MIME message without touching the network
    pub fn build_message(&self, mail: &OutgoingMail) -> Result<Message> {
        let from = parse_mailbox(&self.settings.from_address)?;
        let to = parse_mailbox(&mail.to)?;

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.clone());

        let message = match &mail.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.mime_type)
                    .map_err(|e| MailError::InvalidContentType(e.to_string()))?;
                let part = Attachment::new(attachment.filename.clone())
                    .body(attachment.bytes.clone(), content_type);

                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(mail.body.clone()))
                        .singlepart(part),
                )?
            }
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(mail.body.clone())?,
        };

        Ok(message)
    }

    /// Deliver over STARTTLS. The SMTP client blocks, so it runs on the
    /// blocking pool and the caller just awaits the outcome.
    pub async fn send(&self, mail: OutgoingMail) -> Result<()> {
        let message = self.build_message(&mail)?;
        let settings = self.settings.clone();

        tracing::debug!(
            "Sending '{}' via {}:{}",
            mail.subject,
            settings.host,
            settings.port
        );

        let outcome = tokio::task::spawn_blocking(move || {
            let creds = Credentials::new(settings.username, settings.password);
            let transport = SmtpTransport::starttls_relay(&settings.host)?
                .port(settings.port)
                .credentials(creds)
                .build();

            transport.send(&message).map(|_| ())
        })
        .await
        .map_err(|e| MailError::Task(e.to_string()))?;

        outcome.map_err(MailError::from)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}
