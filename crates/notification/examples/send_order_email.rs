//! Example: Send a new-order email through an SMTP relay.
//!
//! # Usage
//!
//! ```bash
//! export SMTP_SERVER="smtp.gmail.com"
//! export SENDER_EMAIL="orders@yourdomain.com"
//! export SENDER_PASSWORD="app-password"
//! export RECIPIENT_EMAIL="appraiser@yourdomain.com"
//! cargo run --example send_order_email
//! ```

use std::time::Duration;

use notification::{
    smtp::{Client, Config, DEFAULT_PORT},
    EmailMessage, NotificationClient,
};

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<(), notification::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let sender = env_or_default("SENDER_EMAIL", "orders@yourdomain.com");

    let client = Client::new(Config {
        host: env_or_default("SMTP_SERVER", "smtp.gmail.com"),
        port: DEFAULT_PORT,
        username: sender.clone(),
        password: env_or_default("SENDER_PASSWORD", ""),
        timeout: Duration::from_secs(30),
    })?;

    let email = EmailMessage {
        sender,
        recipients: vec![env_or_default("RECIPIENT_EMAIL", "appraiser@yourdomain.com")],
        subject: "New Order: Residential Property Appraisal".to_string(),
        html_body: "<h1>New order</h1><p>Subject property: 10234 104 St NW, Edmonton</p>"
            .to_string(),
    };

    tracing::info!("Sending order email");
    client.send_email(&email).await?;

    tracing::info!("Email sent successfully");
    Ok(())
}
