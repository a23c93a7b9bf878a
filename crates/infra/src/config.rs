use event_mailer_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Key clients have to send in the `x-api-key` header
    pub api_secret_key: String,
    /// Port for the application to run on
    pub port: usize,
    /// Sender address for events that do not configure their own
    pub mail_from: String,
    /// Mails are kept in an in-memory outbox when this is not set
    pub smtp: Option<SmtpConfig>,
    /// How often the dispatcher looks for scheduled mails that are due
    pub scheduled_mails_interval_secs: u64,
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T
where
    T: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => match value.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    pub fn new() -> Self {
        let api_secret_key = match std::env::var("API_SECRET_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find API_SECRET_KEY environment variable. Going to create one.");
                let key = create_random_secret(32);
                info!("Secret api key was generated and set to: {}", key);
                key
            }
        };
        let port = parse_env("PORT", 5000);
        let mail_from = optional_env("MAIL_FROM").unwrap_or_else(|| "noreply@localhost".into());
        let smtp = optional_env("SMTP_HOST").map(|host| SmtpConfig {
            host,
            port: optional_env("SMTP_PORT").and_then(|port| match port.parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!("The given SMTP_PORT: {} is not valid, using the default port.", port);
                    None
                }
            }),
            username: optional_env("SMTP_USERNAME"),
            password: optional_env("SMTP_PASSWORD"),
        });
        if smtp.is_none() {
            warn!("Did not find SMTP_HOST environment variable. Mails will only be kept in memory.");
        }
        let scheduled_mails_interval_secs = parse_env("SCHEDULED_MAILS_INTERVAL_SECS", 60);

        Self {
            api_secret_key,
            port,
            mail_from,
            smtp,
            scheduled_mails_interval_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
