//! One-time code delivery over SMTP, with a log-only fallback for local
//! development when no mail server is configured.

use crate::domain::notification::OtpNotifier;
use crate::domain::otp::{OTP_TTL_MINUTES, OtpFlow};
use crate::infrastructure::config::{AppConfig, SmtpConfig};
use anyhow::Result;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

const APP_NAME: &str = "Fast Budget";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    #[error("Invalid SMTP transport settings: {0}")]
    Transport(String),
    #[error("Failed to build email: {0}")]
    Build(String),
    #[error("Failed to send email: {0}")]
    Send(String),
}

/// Subject and plain-text body for a code of the given flow.
pub fn otp_message(flow: OtpFlow, code: &str) -> (String, String) {
    let (subject, purpose) = match flow {
        OtpFlow::Signup => ("Email Verification", "email verification"),
        OtpFlow::Reset => ("Password Reset OTP", "resetting your password"),
    };
    let body = format!(
        "Your One-Time Password (OTP) for {purpose} is {code}. \
         It is valid for {OTP_TTL_MINUTES} minutes.\n\n\
         If you did not request this, you can safely ignore this email."
    );
    (format!("{subject} - {APP_NAME}"), body)
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    log_codes: bool,
}

impl SmtpNotifier {
    /// `log_codes` additionally writes codes to the debug log; never enable
    /// it in production.
    pub fn new(config: &SmtpConfig, log_codes: bool) -> Result<Self, MailerError> {
        let from = config
            .from
            .parse()
            .map_err(|e| MailerError::InvalidAddress(format!("{e}")))?;

        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| MailerError::Transport(e.to_string()))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from,
            log_codes,
        })
    }
}

#[async_trait]
impl OtpNotifier for SmtpNotifier {
    #[instrument(skip(self, code), fields(flow = %flow))]
    async fn send_otp(&self, to: &str, code: &str, flow: OtpFlow) -> Result<()> {
        let (subject, body) = otp_message(flow, code);
        let recipient: Mailbox = to
            .parse()
            .map_err(|e| MailerError::InvalidAddress(format!("{e}")))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailerError::Build(e.to_string()))?;

        if self.log_codes {
            debug!(to = to, code = code, "Issued OTP");
        }

        self.transport
            .send(email)
            .await
            .map_err(|e| MailerError::Send(e.to_string()))?;

        info!(to = to, "OTP email sent");
        Ok(())
    }
}

/// Stand-in used when SMTP is not configured: the code only reaches the log.
#[derive(Default)]
pub struct LogNotifier;

#[async_trait]
impl OtpNotifier for LogNotifier {
    async fn send_otp(&self, to: &str, code: &str, flow: OtpFlow) -> Result<()> {
        warn!("SMTP not configured. Logging OTP instead of sending email.");
        info!(to = to, flow = %flow, code = code, "OTP issued");
        Ok(())
    }
}

pub fn build_notifier(config: &AppConfig) -> Result<Arc<dyn OtpNotifier>> {
    match &config.smtp {
        Some(smtp) => Ok(Arc::new(SmtpNotifier::new(smtp, !config.is_production())?)),
        None => Ok(Arc::new(LogNotifier)),
    }
}
