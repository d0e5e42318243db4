mod error;
mod metrics;
mod postgres;
mod routing;
mod smtp;
mod squarespace;
mod web;

use std::path::{Path, PathBuf};

use notifier_cli_common::config::LogConfig;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{
    error::Error, metrics::MetricsConfig, postgres::PostgresConfig, routing::RoutingConfig,
    smtp::SmtpConfig, squarespace::SquarespaceConfig, web::WebConfig,
};

pub const SQUARESPACE_API_KEY_ENV: &str = "SQSPACE_API_KEY";
pub const SENDER_EMAIL_ENV: &str = "SENDER_EMAIL";
pub const SENDER_PASSWORD_ENV: &str = "SENDER_PASSWORD";
pub const SMTP_SERVER_ENV: &str = "SMTP_SERVER";
pub const IN_EDMONTON_RECIPIENTS_ENV: &str = "IN_ED_RECP";
pub const OUTSIDE_EDMONTON_RECIPIENTS_ENV: &str = "OUTSIDE_ED_RECP";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub postgres: PostgresConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub squarespace: SquarespaceConfig,

    #[serde(default)]
    pub smtp: SmtpConfig,

    #[serde(default)]
    pub routing: RoutingConfig,
}

impl Config {
    /// Configuration file under the platform config directory, or the first
    /// existing one among the fallback directories.
    #[inline]
    pub fn default_path() -> PathBuf {
        let primary: PathBuf = [
            order_notifier_core::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(order_notifier_core::CONFIG_NAME),
        ]
        .into_iter()
        .collect();

        if primary.exists() {
            return primary;
        }

        order_notifier_core::fallback_project_config_directories()
            .into_iter()
            .map(|dir| dir.join(order_notifier_core::CONFIG_NAME))
            .find(|path| path.exists())
            .unwrap_or(primary)
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let data = std::fs::read_to_string(&path)
                .context(error::OpenConfigSnafu { filename: path.as_ref().to_path_buf() })?;

            serde_yaml::from_str(&data)
                .context(error::ParseConfigSnafu { filename: path.as_ref().to_path_buf() })?
        };

        config.log.file_path = match config.log.file_path.map(|path| {
            path.try_resolve()
                .map(|path| path.to_path_buf())
                .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
        }) {
            Some(Ok(path)) => Some(path),
            Some(Err(err)) => return Err(err),
            None => None,
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Replaces secrets and recipients with the non-empty values `lookup`
    /// returns for their environment variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = lookup(SQUARESPACE_API_KEY_ENV) {
            self.squarespace.api_key = api_key;
        }
        if let Some(sender) = lookup(SENDER_EMAIL_ENV) {
            self.smtp.sender = sender;
        }
        if let Some(password) = lookup(SENDER_PASSWORD_ENV) {
            self.smtp.password = password;
        }
        if let Some(host) = lookup(SMTP_SERVER_ENV) {
            self.smtp.host = host;
        }
        if let Some(recipients) = lookup(IN_EDMONTON_RECIPIENTS_ENV) {
            self.routing.in_edmonton = routing::parse_recipients(&recipients);
        }
        if let Some(recipients) = lookup(OUTSIDE_EDMONTON_RECIPIENTS_ENV) {
            self.routing.outside_edmonton = routing::parse_recipients(&recipients);
        }
    }
}

#[inline]
pub fn load_server_config(
    Config { web, postgres, metrics, squarespace, smtp, routing, .. }: Config,
) -> Result<order_notifier_core::config::Config, Error> {
    Ok(order_notifier_core::config::Config {
        web: web.into(),
        postgres: postgres.into(),
        metrics: metrics.into(),
        squarespace: squarespace.try_into()?,
        smtp: smtp.into(),
        routing: routing.into(),
    })
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use super::*;

    const CONFIG: &str = r"
web:
  listen_address: 127.0.0.1:8080
squarespace:
  api_key: from-file
smtp:
  host: smtp.example.com
  sender: orders@example.com
  password: secret
routing:
  in_edmonton:
    - edmonton@example.com
";

    #[test]
    fn test_default_config_round_trips_through_yaml() {
        let text = serde_yaml::to_string(&Config::default()).unwrap();
        let config: Config = serde_yaml::from_str(&text).unwrap();

        assert_eq!(config.web.listen_address.port(), order_notifier_core::DEFAULT_WEB_PORT);
        assert_eq!(config.smtp.port, 587);
    }

    #[test]
    fn test_env_overrides_replace_secrets_and_recipients() {
        let mut config: Config = serde_yaml::from_str(CONFIG).unwrap();
        let env: HashMap<&str, &str> = [
            (SQUARESPACE_API_KEY_ENV, "from-env"),
            (SENDER_PASSWORD_ENV, ""),
            (OUTSIDE_EDMONTON_RECIPIENTS_ENV, "rural@example.com, backup@example.com,"),
        ]
        .into_iter()
        .collect();

        config.apply_env_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.squarespace.api_key, "from-env");
        assert_eq!(config.smtp.password, "secret");
        assert_eq!(config.routing.in_edmonton, vec!["edmonton@example.com"]);
        assert_eq!(config.routing.outside_edmonton, vec!["rural@example.com", "backup@example.com"]);
    }

    #[test]
    fn test_load_server_config() {
        let config: Config = serde_yaml::from_str(CONFIG).unwrap();
        let config = load_server_config(config).unwrap();

        assert_eq!(config.web.listen_address.port(), 8080);
        assert_eq!(
            config.squarespace.endpoint.to_string(),
            order_notifier_core::DEFAULT_SQUARESPACE_ORDERS_ENDPOINT
        );
        assert_eq!(config.smtp.transport.username, "orders@example.com");
        assert_eq!(config.smtp.transport.timeout, Duration::from_secs(30));
        assert_eq!(config.postgres.operation_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_squarespace_endpoint() {
        let mut config = Config::default();
        config.squarespace.endpoint = "not a uri".to_string();

        assert!(matches!(load_server_config(config), Err(Error::ParseSquarespaceEndpoint { .. })));
    }
}
