use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SmtpConfig {
    /// Overridden by `SMTP_SERVER`.
    #[serde(default)]
    pub host: String,

    #[serde(default = "SmtpConfig::default_port")]
    pub port: u16,

    /// Address notifications are sent from. Overridden by `SENDER_EMAIL`.
    #[serde(default)]
    pub sender: String,

    /// Login name, the sender address when empty.
    #[serde(default)]
    pub username: String,

    /// Overridden by `SENDER_PASSWORD`.
    #[serde(default)]
    pub password: String,

    #[serde(default = "SmtpConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SmtpConfig {
    #[inline]
    pub const fn default_port() -> u16 { notification::smtp::DEFAULT_PORT }

    #[inline]
    pub const fn default_timeout_secs() -> u64 { 30 }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: Self::default_port(),
            sender: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl From<SmtpConfig> for order_notifier_core::config::SmtpConfig {
    fn from(SmtpConfig { host, port, sender, username, password, timeout_secs }: SmtpConfig) -> Self {
        let username = if username.is_empty() { sender.clone() } else { username };

        Self {
            transport: notification::smtp::Config {
                host,
                port,
                username,
                password,
                timeout: Duration::from_secs(timeout_secs),
            },
            sender,
        }
    }
}
