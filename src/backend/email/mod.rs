//! Outbound email.
//!
//! One concern: delivering password-reset codes over SMTP. Single attempt,
//! no retry; the caller decides what a failure means.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::backend::server::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("message build failed: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp failure: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailerError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    /// Send the password-reset code. The code is only ever in the mail body;
    /// the store holds its digest.
    pub async fn send_reset_code(
        &self,
        to: &str,
        username: &str,
        code: &str,
    ) -> Result<(), MailerError> {
        let body = reset_email_html(username, code);

        let message = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject("Your password reset code")
            .header(ContentType::TEXT_HTML)
            .body(body)?;

        self.transport.send(message).await?;
        Ok(())
    }
}

fn reset_email_html(username: &str, code: &str) -> String {
    format!(
        r#"<body style="font-family:sans-serif;">
  <div style="max-width:600px;margin:auto;padding:20px;">
    <h2 style="text-align:center;">Your password reset code</h2>
    <p>Hi <strong>{username}</strong>,<br><br>
       You asked to reset your Forkfeed password. Use the code below to continue.</p>
    <div style="text-align:center;margin:30px 0;">
      <span style="font-size:38px;font-weight:bold;letter-spacing:10px;">{code}</span>
    </div>
    <p style="font-size:14px;">The code expires in <strong>10 minutes</strong>.
       Do not share it with anyone.</p>
  </div>
</body>"#
    )
}
