//! Email channel over SMTP.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use taskpipe_core::SmtpConfig;

use crate::channels::DeliveryChannel;
use crate::error::NotifyError;
use crate::request::EventContent;

/// Fixed subject line for task status emails.
const SUBJECT: &str = "Task Status Update";

struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

/// Sends a single-part plain-text message per event.
///
/// Without SMTP configuration the channel stays constructible and every
/// delivery attempt fails as `delivery-failed`, so a dispatcher deployment
/// that only serves chat does not need an SMTP server.
pub struct EmailChannel {
    inner: Option<SmtpMailer>,
}

impl EmailChannel {
    /// Build the channel from optional SMTP configuration.
    pub fn from_config(config: Option<&SmtpConfig>) -> Result<Self, NotifyError> {
        let Some(config) = config else {
            return Ok(Self { inner: None });
        };

        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        let builder = builder.port(config.port);
        let builder = match (&config.user, &config.password) {
            (Some(user), Some(password)) => {
                builder.credentials(Credentials::new(user.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            inner: Some(SmtpMailer {
                transport: builder.build(),
                from: config.from.clone(),
            }),
        })
    }
}

#[async_trait]
impl DeliveryChannel for EmailChannel {
    async fn deliver(&self, target: &str, event: &EventContent) -> Result<(), NotifyError> {
        let Some(mailer) = &self.inner else {
            return Err(NotifyError::DeliveryFailed(
                "SMTP transport not configured".to_string(),
            ));
        };

        let to: Mailbox = target
            .parse()
            .map_err(|e| NotifyError::DeliveryFailed(format!("invalid recipient: {e}")))?;
        let from: Mailbox = mailer
            .from
            .parse()
            .map_err(|e| NotifyError::DeliveryFailed(format!("invalid sender: {e}")))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(event.render_text())
            .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))?;

        mailer
            .transport
            .send(email)
            .await
            .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))?;

        debug!(task_id = %event.task_id, "Email notification delivered");
        Ok(())
    }
}
