//! # Notification Crate
//!
//! This crate provides functionality for sending notifications via various
//! channels. Currently supports HTML email over SMTP (STARTTLS, LOGIN
//! authentication).
//!
//! ## Features
//!
//! - SMTP transport built on `lettre`
//! - HTML email with multiple recipients
//! - Async/await support

mod error;
pub mod smtp;

use async_trait::async_trait;
pub use error::Error;

/// An email ready to be handed to a transport.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmailMessage {
    /// The sender address, used as `From`.
    pub sender: String,
    /// Recipient addresses, in the order they appear in `To`.
    pub recipients: Vec<String>,
    /// The subject line.
    pub subject: String,
    /// Rendered HTML body, sent as `text/html; charset=utf-8`.
    pub html_body: String,
}

/// Trait for notification clients that can send notifications.
#[async_trait]
pub trait NotificationClient: Send + Sync {
    /// Sends one email. A single attempt is made; there is no retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or the transport
    /// rejects it.
    async fn send_email(&self, email: &EmailMessage) -> Result<(), Error>;
}
