//! SMTP client implementation for sending HTML emails through an
//! authenticated relay.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::{Credentials, Mechanism},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};

use crate::{error, EmailMessage, Error, NotificationClient};

/// Submission port with STARTTLS.
pub const DEFAULT_PORT: u16 = 587;

/// Configuration for the SMTP client.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// SMTP relay host, e.g. `smtp.gmail.com`.
    pub host: String,

    /// SMTP relay port.
    pub port: u16,

    /// Account used for LOGIN authentication.
    pub username: String,

    /// Password used for LOGIN authentication.
    pub password: String,

    /// Upper bound for one send, connection and handshake included.
    pub timeout: Duration,
}

/// SMTP client for sending emails.
#[derive(Clone)]
pub struct Client {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Client {
    /// Creates a new SMTP client. No connection is opened until the first
    /// email is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The host, username or password is empty
    /// - The TLS parameters for the host cannot be built
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    ///
    /// use notification::smtp::{Client, Config};
    ///
    /// # fn example() -> Result<(), notification::Error> {
    /// let config = Config {
    ///     host: "smtp.example.com".to_string(),
    ///     port: notification::smtp::DEFAULT_PORT,
    ///     username: "orders@example.com".to_string(),
    ///     password: "app-password".to_string(),
    ///     timeout: Duration::from_secs(30),
    /// };
    ///
    /// let client = Client::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: Config) -> Result<Self, Error> {
        let Config { host, port, username, password, timeout } = config;

        ensure!(!host.trim().is_empty(), error::MissingSmtpConfigSnafu { field: "host" });
        ensure!(!username.trim().is_empty(), error::MissingSmtpConfigSnafu { field: "username" });
        ensure!(!password.is_empty(), error::MissingSmtpConfigSnafu { field: "password" });

        tracing::info!(%host, port, %username, "Using SMTP relay with LOGIN authentication");

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
            .context(error::CreateMailerSnafu { host: host.clone() })?
            .port(port)
            .credentials(Credentials::new(username, password))
            .authentication(vec![Mechanism::Login])
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl NotificationClient for Client {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), Error> {
        let message = build_message(email)?;

        let _response = self.transport.send(message).await.context(error::SendEmailSnafu)?;

        tracing::info!(
            recipients = %email.recipients.join(", "),
            subject = %email.subject,
            "Successfully sent email"
        );
        Ok(())
    }
}

/// Builds a `text/html` message with every recipient in `To`.
///
/// # Errors
///
/// Returns an error if an address is invalid, there are no recipients, or the
/// message cannot be built.
pub fn build_message(email: &EmailMessage) -> Result<Message, Error> {
    let EmailMessage { sender, recipients, subject, html_body } = email;

    ensure!(!recipients.is_empty(), error::NoRecipientsSnafu);

    let builder = Message::builder().from(parse_mailbox(sender)?).subject(subject.as_str());

    let builder = recipients.iter().try_fold(builder, |builder, recipient| {
        parse_mailbox(recipient).map(|mailbox| builder.to(mailbox))
    })?;

    builder.header(ContentType::TEXT_HTML).body(html_body.clone()).context(error::BuildEmailSnafu)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, Error> {
    address.trim().parse().context(error::InvalidAddressSnafu { address: address.to_string() })
}
