use std::env;

use log::warn;
use url::Url;

use crate::error::{ConfigError, ValidationError};
use crate::notify::smtp::SmtpConfig;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Which notification transport the dispatcher hands messages to.
#[derive(Debug, Clone)]
pub enum TransportConfig {
    MailerSend { api_token: String, sender: String },
    Smtp(SmtpConfig),
    Disabled,
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub feed_url: Url,
    pub recipients: Vec<String>,
    pub transport: TransportConfig,
    pub poll_interval_secs: u64,
    /// Minimum seconds between alert emails. 0 re-sends on every tick while
    /// readings stay out of range.
    pub alert_cooldown_secs: u64,
}

impl MonitorConfig {
    pub fn new() -> Result<Self, ConfigError> {
        // Load environment variables
        dotenv::dotenv().ok();

        let raw_url = env::var("API_URL").map_err(|_| ConfigError::Missing("API_URL"))?;
        let feed_url = Url::parse(&raw_url).map_err(|e| ConfigError::Invalid {
            name: "API_URL",
            reason: e.to_string(),
        })?;

        let recipients = match env::var("ALERT_RECIPIENTS") {
            Ok(raw) => match parse_recipients(&raw) {
                Ok(list) => list,
                Err(e) => {
                    warn!("Ignoring ALERT_RECIPIENTS: {}", e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        let transport = load_transport();
        if matches!(transport, TransportConfig::Disabled) && !recipients.is_empty() {
            warn!("Alert recipients configured but no email transport is set up");
        }

        Ok(MonitorConfig {
            feed_url,
            recipients,
            transport,
            poll_interval_secs: secs_var("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?,
            alert_cooldown_secs: secs_var("ALERT_COOLDOWN_SECS", 0)?,
        })
    }
}

/// Split a comma-separated submission into addresses, trimming each entry
/// and dropping empty ones. A submission that filters down to nothing is a
/// validation error, not an empty list.
pub fn parse_recipients(raw: &str) -> Result<Vec<String>, ValidationError> {
    let recipients: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect();

    if recipients.is_empty() {
        Err(ValidationError)
    } else {
        Ok(recipients)
    }
}

fn secs_var(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            reason: format!("{:?} is not a number of seconds", raw),
        }),
        Err(_) => Ok(default),
    }
}

/// Pick the email transport from the environment. MAIL_TRANSPORT selects
/// explicitly; otherwise whichever credential set is present wins, with
/// MailerSend tried first. Incomplete credentials degrade to Disabled.
fn load_transport() -> TransportConfig {
    match env::var("MAIL_TRANSPORT").ok().as_deref() {
        Some("mailersend") => mailersend_from_env().unwrap_or_else(|| {
            warn!("MailerSend environment variables are not configured; alert emails disabled");
            TransportConfig::Disabled
        }),
        Some("smtp") => smtp_from_env().unwrap_or_else(|| {
            warn!("SMTP environment variables are not configured; alert emails disabled");
            TransportConfig::Disabled
        }),
        Some(other) => {
            warn!("Unknown MAIL_TRANSPORT {:?}; alert emails disabled", other);
            TransportConfig::Disabled
        }
        None => mailersend_from_env()
            .or_else(smtp_from_env)
            .unwrap_or(TransportConfig::Disabled),
    }
}

fn mailersend_from_env() -> Option<TransportConfig> {
    let api_token = env::var("MAILERSEND_API_TOKEN").ok()?;
    let sender = env::var("MAILERSEND_SENDER_EMAIL").ok()?;
    Some(TransportConfig::MailerSend { api_token, sender })
}

fn smtp_from_env() -> Option<TransportConfig> {
    let host = env::var("SMTP_HOST").ok()?;
    let username = env::var("SMTP_USERNAME").ok()?;
    let password = env::var("SMTP_PASSWORD").ok()?;
    let sender = env::var("SMTP_SENDER").ok()?;
    let port = env::var("SMTP_PORT")
        .ok()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(587);
    Some(TransportConfig::Smtp(SmtpConfig {
        host,
        port,
        username,
        password,
        sender,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipients_are_trimmed_and_filtered() {
        let list = parse_recipients(" a@example.com ,, b@example.com ,").unwrap();
        assert_eq!(list, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_single_recipient() {
        assert_eq!(parse_recipients("a@example.com").unwrap(), vec!["a@example.com"]);
    }

    #[test]
    fn test_blank_submission_is_a_validation_error() {
        assert!(parse_recipients("").is_err());
        assert!(parse_recipients("  , ,  ").is_err());
    }
}
