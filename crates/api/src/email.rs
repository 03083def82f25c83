//! Outbound transactional email over SMTP.
//!
//! Only one message type exists today: the password-reset token. The mailer
//! is optional at runtime; when SMTP is not configured the forgot-password
//! handler reports a dispatch failure instead of panicking or hanging.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::EmailConfig;

/// Errors from building or sending mail.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// A malformed mailbox (`From:` setting or recipient).
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP conversation failed.
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// SMTP mailer for transactional messages.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Build a mailer from SMTP settings. The relay must support STARTTLS.
    ///
    /// Credentials are attached only when both username and password are
    /// configured. No connection is made here; that happens per send.
    pub fn from_config(config: &EmailConfig) -> Result<Self, MailerError> {
        let from: Mailbox = config.from.parse()?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Send the password-reset message carrying `reset_url` to `to`.
    pub async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), MailerError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject("Your password reset token (valid for 10 minutes)")
            .body(format!(
                "Forgot your password? Submit a PATCH request with your new password and \
                 password confirmation to: {reset_url}\nIf you didn't forget your password, \
                 please ignore this email."
            ))?;

        self.transport.send(message).await?;
        Ok(())
    }
}
