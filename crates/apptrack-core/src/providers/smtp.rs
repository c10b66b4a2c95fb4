// SMTP provider - bridges the mailer with the Notifier trait
use apptrack_api::{MailAttachment, OutgoingMail, SmtpMailer, SmtpSettings};
use async_trait::async_trait;

use super::{Notifier, OutgoingEmail};
use crate::config::SmtpConfig;
use crate::{Error, Result};

/// Sends mail through the relay described in `[smtp]`. Settings are
/// resolved on every send so a password exported mid-session is picked up.
pub struct SmtpNotifier {
    config: SmtpConfig,
}

impl SmtpNotifier {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let settings = resolve_settings(&self.config, |key| std::env::var(key).ok())?;
        let mailer = SmtpMailer::new(settings);

        let mail = OutgoingMail {
            subject: email.subject,
            body: email.body,
            to: email.recipient,
            attachment: email.attachment.map(|a| MailAttachment {
                filename: a.filename,
                mime_type: a.mime_type,
                bytes: a.bytes,
            }),
        };

        mailer
            .send(mail)
            .await
            .map_err(|e| Error::DeliveryError(e.to_string()))
    }
}

/// Turn config plus environment into complete SMTP settings
fn resolve_settings<F>(config: &SmtpConfig, env: F) -> Result<SmtpSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let host = config
        .host
        .clone()
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| Error::DeliveryError("SMTP host is not configured".to_string()))?;

    let username = config
        .username
        .clone()
        .ok_or_else(|| Error::DeliveryError("SMTP username is not configured".to_string()))?;

    let password = env(&config.password_env).ok_or_else(|| {
        Error::DeliveryError(format!(
            "SMTP password not found in ${}",
            config.password_env
        ))
    })?;

    let from_address = config
        .from_address
        .clone()
        .unwrap_or_else(|| username.clone());

    Ok(SmtpSettings {
        host,
        port: config.port,
        username,
        password,
        from_address,
    })
}
