use thiserror::Error;

use crate::models::SensorKind;

/// Failure to retrieve or decode the upstream feed. Recovered locally by
/// logging and skipping the current tick's render.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned status {0}")]
    Status(u16),
    #[error("feed payload could not be decoded: {0}")]
    Decode(reqwest::Error),
}

/// A field value that cannot be coerced to a number.
#[derive(Debug, Error)]
pub enum InvalidReading {
    #[error("{kind} value {raw:?} is not a number")]
    NonNumeric { kind: SensorKind, raw: String },
    #[error("{kind} value missing from entry {entry_id}")]
    Missing { kind: SensorKind, entry_id: i64 },
}

/// Per-recipient transport failure. Reported as a notice, never fatal.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{transport} rejected the message with status {status}")]
    Rejected { transport: &'static str, status: u16 },
    #[error("invalid email address {address:?}: {reason}")]
    Address { address: String, reason: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("send timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// An empty or invalid recipient submission.
#[derive(Debug, Error)]
#[error("recipient list is empty after trimming and filtering")]
pub struct ValidationError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
