//! RHub Notify — SMTP implementation of the core notification
//! collaborator.
//!
//! Delivery is best-effort by contract: callers log a failed send and
//! move on, so this crate only reports errors, it never retries.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use rhub_core::notify::{Notification, Notifier, NotifyError};
use tracing::debug;

/// SMTP connection settings.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// SMTP server address, e.g. "smtp.example.com".
    pub smtp_server: String,
    /// Usually 587 for STARTTLS.
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    /// Sender address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
}

/// [`Notifier`] delivering plain-text mail over SMTP.
#[derive(Clone)]
pub struct SmtpNotifier {
    config: MailerConfig,
    credentials: Credentials,
}

impl SmtpNotifier {
    pub fn new(config: MailerConfig) -> Self {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );
        Self {
            config,
            credentials,
        }
    }

    /// A fresh transport per send avoids connection pooling issues.
    fn build_transport(&self) -> Result<SmtpTransport, NotifyError> {
        Ok(SmtpTransport::relay(&self.config.smtp_server)
            .map_err(|e| NotifyError(format!("SMTP relay error: {e}")))?
            .port(self.config.smtp_port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn from_header(&self) -> String {
        format!("{} <{}>", self.config.from_name, self.config.from_email)
    }
}

impl Notifier for SmtpNotifier {
    async fn send(&self, to: &str, notification: Notification) -> Result<(), NotifyError> {
        let subject = notification.subject();
        let email = Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| NotifyError(format!("invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| NotifyError(format!("invalid to address: {e}")))?)
            .subject(&subject)
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body())
            .map_err(|e| NotifyError(format!("failed to build email: {e}")))?;

        let mailer = self.build_transport()?;
        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map_err(|e| NotifyError(format!("failed to send email: {e}")))
        })
        .await
        .map_err(|e| NotifyError(format!("email task failed: {e}")))??;

        debug!(to, subject, "Notification delivered");
        Ok(())
    }
}
