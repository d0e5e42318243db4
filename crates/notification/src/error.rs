use snafu::Snafu;

/// Errors that can occur in the notification crate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// SMTP configuration is incomplete.
    #[snafu(display("SMTP configuration field `{field}` must not be empty"))]
    MissingSmtpConfig {
        /// Name of the empty configuration field.
        field: &'static str,
    },

    /// Failed to create mailer client.
    #[snafu(display("Failed to create mailer client for SMTP server `{host}`, error: {source}"))]
    CreateMailer {
        /// The SMTP host.
        host: String,
        /// The underlying transport error.
        source: lettre::transport::smtp::Error,
    },

    /// An address could not be parsed as a mailbox.
    #[snafu(display("Invalid email address `{address}`, error: {source}"))]
    InvalidAddress {
        /// The offending address.
        address: String,
        /// The underlying parse error.
        source: lettre::address::AddressError,
    },

    /// An email needs at least one recipient.
    #[snafu(display("Email has no recipients"))]
    NoRecipients,

    /// Failed to build email.
    #[snafu(display("Failed to build email message, error: {source}"))]
    BuildEmail {
        /// The underlying builder error.
        source: lettre::error::Error,
    },

    /// Failed to send email.
    #[snafu(display("Failed to send email, error: {source}"))]
    SendEmail {
        /// The underlying transport error.
        source: lettre::transport::smtp::Error,
    },
}
