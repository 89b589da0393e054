pub mod mailersend;
pub mod smtp;

pub use mailersend::MailerSendTransport;
pub use smtp::SmtpMailTransport;

use async_trait::async_trait;
use log::{info, warn};

use crate::config::TransportConfig;
use crate::error::DeliveryError;

/// Delivers one rendered message to one email address.
///
/// The alerting pipeline is transport-agnostic; it only ever sees this
/// trait. Two bindings exist: the MailerSend HTTP API and direct SMTP
/// submission.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), DeliveryError>;

    fn name(&self) -> &str;
}

/// Build the configured transport, if any. Missing or unusable credentials
/// degrade to `None`; the dispatcher then warns and skips instead of
/// crashing.
pub fn build_transport(config: &TransportConfig) -> Option<Box<dyn NotificationTransport>> {
    match config {
        TransportConfig::Disabled => None,
        TransportConfig::MailerSend { api_token, sender } => {
            info!("Using MailerSend transport for alert emails");
            Some(Box::new(MailerSendTransport::new(
                api_token.clone(),
                sender.clone(),
            )))
        }
        TransportConfig::Smtp(smtp) => match SmtpMailTransport::new(smtp.clone()) {
            Ok(transport) => {
                info!("Using SMTP transport {} for alert emails", smtp.host);
                Some(Box::new(transport))
            }
            Err(e) => {
                warn!("Failed to initialize SMTP transport: {}", e);
                None
            }
        },
    }
}
