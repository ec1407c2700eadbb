use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::config::EmailConfig;

#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("Invalid recipient address {0}")]
    InvalidAddress(String),
    #[error("Failed to build email: {0}")]
    Build(String),
    #[error("Failed to send email: {0}")]
    Transport(String),
    #[error("Send timed out after {0:?}")]
    Timeout(Duration),
    #[error("Batch deadline exceeded before this recipient was attempted")]
    BatchDeadline,
    #[error("Email sending is not configured")]
    NotConfigured,
}

impl MailError {
    /// Whether sending the same message again later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MailError::Transport(_) | MailError::Timeout(_) | MailError::BatchDeadline
        )
    }
}

/// Outbound mail collaborator. Returns the Message-ID of the sent email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<String, MailError>;
}

/// SMTP mailer using STARTTLS on the configured relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        info!(
            "📧 Initializing email service for SMTP server: {}:{}",
            config.smtp_server, config.smtp_port
        );

        let address: Address = config
            .from_email
            .parse()
            .with_context(|| format!("Failed to parse from email {:?}", config.from_email))?;
        let name = Some(config.from_name.clone()).filter(|n| !n.trim().is_empty());

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            .context("Failed to create SMTP relay")?
            .port(config.smtp_port)
            .timeout(Some(config.send_timeout()));

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: Mailbox::new(name, address),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<String, MailError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", recipient, e)))?;
        let message_id = format!("<{}@{}>", uuid::Uuid::new_v4(), self.from.email.domain());

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(message_id)
    }
}

/// Stand-in used when no sender is configured; every send fails fast
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _recipient: &str, _subject: &str, _html_body: &str) -> Result<String, MailError> {
        Err(MailError::NotConfigured)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct DispatchFailure {
    pub recipient: String,
    pub error: MailError,
}

/// Outcome of one dispatch batch
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub sent: u32,
    pub failures: Vec<DispatchFailure>,
}

/// Sends one message to a list of recipients, one at a time.
///
/// A failed recipient never aborts the batch. Each send is bounded by
/// `send_timeout`, and once `batch_timeout` has elapsed the remaining
/// recipients are reported as failed without being attempted.
#[derive(Clone)]
pub struct EmailDispatcher {
    mailer: Arc<dyn Mailer>,
    send_timeout: Duration,
    batch_timeout: Duration,
}

impl EmailDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, send_timeout: Duration, batch_timeout: Duration) -> Self {
        Self {
            mailer,
            send_timeout,
            batch_timeout,
        }
    }

    pub async fn dispatch(&self, recipients: &[String], content: &EmailContent) -> DispatchReport {
        info!("📧 Sending {:?} to {} recipients", content.subject, recipients.len());

        let deadline = Instant::now() + self.batch_timeout;
        let mut report = DispatchReport::default();

        for recipient in recipients {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!("Skipping {}: batch deadline exceeded", recipient);
                report.failures.push(DispatchFailure {
                    recipient: recipient.clone(),
                    error: MailError::BatchDeadline,
                });
                continue;
            }

            let limit = self.send_timeout.min(remaining);
            let outcome = match tokio::time::timeout(
                limit,
                self.mailer.send(recipient, &content.subject, &content.html),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(MailError::Timeout(limit)),
            };

            match outcome {
                Ok(message_id) => {
                    info!("Sent email to {} ({})", recipient, message_id);
                    report.sent += 1;
                }
                Err(e) => {
                    error!("Failed to send email to {}: {} (retryable: {})", recipient, e, e.is_retryable());
                    report.failures.push(DispatchFailure {
                        recipient: recipient.clone(),
                        error: e,
                    });
                }
            }
        }

        info!(
            "📧 Email summary: {} attempted, {} sent, {} failed",
            recipients.len(),
            report.sent,
            report.failures.len()
        );
        report
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingMailer;
    use super::*;

    fn recipients(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("bank{}@example.org", i)).collect()
    }

    fn content() -> EmailContent {
        EmailContent {
            subject: "URGENT".to_string(),
            html: "<p>help</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_abort_batch() {
        let mailer = Arc::new(RecordingMailer::failing_for(&["bank2@example.org", "bank4@example.org"]));
        let dispatcher = EmailDispatcher::new(mailer.clone(), Duration::from_secs(1), Duration::from_secs(5));

        let report = dispatcher.dispatch(&recipients(5), &content()).await;

        assert_eq!(report.sent, 3);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].recipient, "bank2@example.org");
        assert!(report.failures.iter().all(|f| f.error.is_retryable()));
        assert_eq!(
            mailer.sent(),
            vec!["bank1@example.org", "bank3@example.org", "bank5@example.org"]
        );
    }

    #[tokio::test]
    async fn test_slow_send_times_out() {
        let mailer = Arc::new(RecordingMailer {
            delay: Some(Duration::from_secs(10)),
            ..RecordingMailer::default()
        });
        let dispatcher = EmailDispatcher::new(mailer, Duration::from_millis(20), Duration::from_secs(5));

        let report = dispatcher.dispatch(&recipients(1), &content()).await;

        assert_eq!(report.sent, 0);
        assert!(matches!(report.failures[0].error, MailError::Timeout(_)));
        assert!(report.failures[0].error.is_retryable());
    }

    #[tokio::test]
    async fn test_batch_deadline_skips_remaining_recipients() {
        let mailer = Arc::new(RecordingMailer {
            delay: Some(Duration::from_millis(120)),
            ..RecordingMailer::default()
        });
        let dispatcher = EmailDispatcher::new(mailer.clone(), Duration::from_secs(1), Duration::from_millis(200));

        let report = dispatcher.dispatch(&recipients(4), &content()).await;

        assert_eq!(report.sent, 1);
        assert_eq!(report.failures.len(), 3);
        assert!(matches!(report.failures.last().unwrap().error, MailError::BatchDeadline));
    }

    #[tokio::test]
    async fn test_disabled_mailer_reports_non_retryable_failures() {
        let dispatcher = EmailDispatcher::new(Arc::new(DisabledMailer), Duration::from_secs(1), Duration::from_secs(5));

        let report = dispatcher.dispatch(&recipients(2), &content()).await;

        assert_eq!(report.sent, 0);
        assert_eq!(report.failures.len(), 2);
        assert!(!report.failures[0].error.is_retryable());
    }

    #[tokio::test]
    async fn test_empty_recipient_list() {
        let dispatcher = EmailDispatcher::new(Arc::new(DisabledMailer), Duration::from_secs(1), Duration::from_secs(5));
        let report = dispatcher.dispatch(&[], &content()).await;
        assert_eq!(report.sent, 0);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_smtp_mailer_rejects_bad_sender() {
        let config = EmailConfig {
            from_email: "not an address".to_string(),
            ..EmailConfig::default()
        };
        assert!(SmtpMailer::new(&config).is_err());
    }
}
